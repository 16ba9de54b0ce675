//! OpenAPI rendering of a route table.

use utoipa::openapi::path::OperationBuilder;
use utoipa::openapi::{OpenApi, response::Response};

use super::RouteTable;

impl RouteTable {
    /// Adds one OpenAPI operation per mounted route to `doc`, with every
    /// path placed under `prefix`. Shadowed duplicates are left out.
    pub fn extend_openapi(&self, doc: &mut OpenApi, prefix: &str) {
        let prefix = prefix.trim_end_matches('/');
        let mut seen = std::collections::HashSet::new();

        for route in self.routes() {
            if !seen.insert((route.method, route.path.as_str())) {
                continue;
            }

            let operation = OperationBuilder::new()
                .operation_id(Some(route.operation.name()))
                .tag(route.handler)
                .summary(Some(format!("{} {}", route.method, route.path)))
                .response("default", Response::new("Operation response"))
                .build();

            doc.paths.add_path_operation(
                format!("{prefix}{}", route.path),
                vec![route.method.openapi_method()],
                operation,
            );
        }
    }
}

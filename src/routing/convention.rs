//! Naming convention that derives an HTTP method and path suffix from an
//! operation name such as `CreateUser` or `GetUserProfile`.

use std::fmt;

use axum::routing::MethodFilter;
use serde::Serialize;
use utoipa::ToSchema;

/// HTTP methods a convention rule can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl RouteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Delete => "DELETE",
            RouteMethod::Patch => "PATCH",
        }
    }

    pub(crate) fn method_filter(&self) -> MethodFilter {
        match self {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
            RouteMethod::Put => MethodFilter::PUT,
            RouteMethod::Delete => MethodFilter::DELETE,
            RouteMethod::Patch => MethodFilter::PATCH,
        }
    }

    pub(crate) fn openapi_method(&self) -> utoipa::openapi::path::HttpMethod {
        use utoipa::openapi::path::HttpMethod;

        match self {
            RouteMethod::Get => HttpMethod::Get,
            RouteMethod::Post => HttpMethod::Post,
            RouteMethod::Put => HttpMethod::Put,
            RouteMethod::Delete => HttpMethod::Delete,
            RouteMethod::Patch => HttpMethod::Patch,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method and path suffix (relative to the handler's base path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub method: RouteMethod,
    pub suffix: &'static str,
}

impl RouteRule {
    const fn new(method: RouteMethod, suffix: &'static str) -> Self {
        Self { method, suffix }
    }
}

/// Maps an operation name to a route rule. First matching rule wins:
///
/// | Name                        | Method | Suffix            |
/// |-----------------------------|--------|-------------------|
/// | `Create*`                   | POST   | (collection)      |
/// | `GetAll*`                   | GET    | (collection)      |
/// | `Get*` containing `Profile` | GET    | `/{id}/profile`   |
/// | `Get*`                      | GET    | `/{id}`           |
/// | `Update*`                   | PUT    | `/{id}`           |
/// | `Delete*`                   | DELETE | `/{id}`           |
/// | `Change*` with `Password`   | PUT    | `/{id}/password`  |
///
/// Every other name yields `None` and is not routed. Note that `Get*By*`
/// names fall through to the generic `Get*` rule and share `/{id}` with the
/// single-item getter; `RouteTable::collisions` reports such pairs.
pub fn parse_operation_name(name: &str) -> Option<RouteRule> {
    use RouteMethod::*;

    let rule = if name.starts_with("Create") {
        RouteRule::new(Post, "")
    } else if name.starts_with("GetAll") {
        RouteRule::new(Get, "")
    } else if name.starts_with("Get") && name.contains("Profile") {
        RouteRule::new(Get, "/{id}/profile")
    } else if name.starts_with("Get") {
        RouteRule::new(Get, "/{id}")
    } else if name.starts_with("Update") {
        RouteRule::new(Put, "/{id}")
    } else if name.starts_with("Delete") {
        RouteRule::new(Delete, "/{id}")
    } else if name.starts_with("Change") && name.contains("Password") {
        RouteRule::new(Put, "/{id}/password")
    } else {
        return None;
    };

    Some(rule)
}

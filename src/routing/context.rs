//! Request context handed to every routed operation.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::middleware::RequestId;
use crate::error::{AppError, AppResult};

/// Everything an operation needs to parse its own input: path and query
/// parameters, headers, the raw body, and the actor resolved by route
/// middleware.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: Method,
    pub path_params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub request_id: Option<String>,
    pub actor: Option<i32>,
}

impl RequestContext {
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parses the `{id}` path parameter. `entity` names the resource in the
    /// error message ("Invalid user ID").
    pub fn path_id(&self, entity: &str) -> AppResult<i32> {
        self.path_param("id")
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| AppError::bad_request(format!("Invalid {entity} ID")))
    }

    /// Deserializes the JSON body.
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))
    }

    /// Deserializes and validates the JSON body.
    pub fn valid_json<T: DeserializeOwned + Validate>(&self) -> AppResult<T> {
        let value: T = self.json()?;
        value.validate()?;
        Ok(value)
    }

    /// The acting user, or `Unauthorized` when no middleware resolved one.
    pub fn actor(&self) -> AppResult<i32> {
        self.actor
            .ok_or_else(|| AppError::unauthorized("Missing acting user"))
    }
}

impl<S> FromRequest<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let path_params = Option::<Path<HashMap<String, String>>>::from_request_parts(&mut parts, state)
            .await
            .map_err(IntoResponse::into_response)?
            .map(|Path(params)| params)
            .unwrap_or_default();
        let Query(query) = Query::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let request_id = parts.extensions.get::<RequestId>().map(|r| r.0.clone());
        let method = parts.method.clone();
        let headers = parts.headers.clone();

        let body = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self {
            method,
            path_params,
            query,
            headers,
            body,
            request_id,
            actor: None,
        })
    }
}

use std::collections::BTreeMap;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Value, json};

use crate::error::AppError;

/// Generic body for every failure past validation.
pub const SERVER_ERROR: &str = "Server error";

/// Response in the shape the API Gateway proxy integration expects.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn empty(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: String::new() }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

impl Serialize for HttpResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let headers: BTreeMap<&str, &str> = self
            .headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str(), v)))
            .collect();
        let mut s = serializer.serialize_struct("HttpResponse", 3)?;
        s.serialize_field("statusCode", &self.status.as_u16())?;
        s.serialize_field("headers", &headers)?;
        s.serialize_field("body", &self.body)?;
        s.end()
    }
}

pub fn error_response(err: &AppError) -> (StatusCode, Value) {
    match err {
        AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({"error": msg})),
        AppError::Credential(_) | AppError::Upstream(_) | AppError::Config(_) | AppError::Other(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": SERVER_ERROR}))
        }
    }
}

pub fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> anyhow::Result<HttpResponse> {
    let mut resp = HttpResponse::empty(status);
    resp.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp.body = serde_json::to_string(value)?;
    Ok(resp)
}

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{AppError, Result};

/// API Gateway proxy event, or a direct invocation payload.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct InboundEvent {
    #[serde(rename = "httpMethod", default)]
    pub http_method: Option<String>,
    /// Raw JSON text from the proxy integration, or an already-parsed value.
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(rename = "isBase64Encoded", default, deserialize_with = "null_as_false")]
    pub is_base64_encoded: bool,
    /// Every other top-level key of the event.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl InboundEvent {
    /// Build an event from the raw invocation payload. Payloads that do not
    /// fit the proxy shape are read field by field, so an `OPTIONS` method
    /// survives a malformed sibling field.
    pub fn from_raw(raw: Value) -> Self {
        match serde_json::from_value::<Self>(raw.clone()) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "event does not match the proxy shape");
                let mut rest = match raw {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                let http_method = rest
                    .remove("httpMethod")
                    .and_then(|m| m.as_str().map(str::to_string));
                let body = rest.remove("body").filter(|b| !b.is_null());
                let is_base64_encoded = rest
                    .remove("isBase64Encoded")
                    .and_then(|f| f.as_bool())
                    .unwrap_or(false);
                Self { http_method, body, is_base64_encoded, rest }
            }
        }
    }

    pub fn is_preflight(&self) -> bool {
        self.http_method
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("OPTIONS"))
    }

    /// Resolve the request body to a JSON value.
    ///
    /// A missing, `null` or empty body is rejected unless `allow_event_as_body`
    /// is set, in which case the remaining event keys stand in for it.
    pub fn body_value(&self, allow_event_as_body: bool) -> Result<Value> {
        match &self.body {
            Some(Value::String(raw)) if !raw.trim().is_empty() => self.parse_text(raw),
            Some(Value::Null) | Some(Value::String(_)) | None => {
                if allow_event_as_body {
                    Ok(Value::Object(self.rest.clone()))
                } else {
                    Err(AppError::validation("Missing request body"))
                }
            }
            Some(parsed) => Ok(parsed.clone()),
        }
    }

    fn parse_text(&self, raw: &str) -> Result<Value> {
        let invalid = || AppError::validation("Invalid JSON payload");
        if self.is_base64_encoded {
            let bytes = STANDARD.decode(raw.trim()).map_err(|_| invalid())?;
            serde_json::from_slice(&bytes).map_err(|_| invalid())
        } else {
            serde_json::from_str(raw).map_err(|_| invalid())
        }
    }
}

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use http::HeaderValue;

use crate::http::HttpResponse;

pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, X-Api-Key, Authorization";

pub fn add_cors(mut resp: HttpResponse, allowed_origin: &str) -> HttpResponse {
    let h = &mut resp.headers;
    // Origin comes from configuration; an unrepresentable value is left off.
    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => {
            h.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        Err(_) => tracing::warn!(origin = allowed_origin, "CORS origin is not a valid header value"),
    }
    h.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    h.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    resp
}

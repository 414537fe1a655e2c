use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::http::cors::add_cors;
use crate::http::response::{SERVER_ERROR, error_response, json_response};
use crate::http::HttpResponse;
use crate::models::{AssistantReply, ChatRequest, InboundEvent};
use crate::traits::{ChatUpstream, CredentialResolver};

/// Validates an inbound event, resolves the API key and forwards the
/// conversation upstream. Holds no per-request state.
#[derive(Clone)]
pub struct ChatHandler {
    config: Arc<Config>,
    credentials: Arc<dyn CredentialResolver>,
    upstream: Arc<dyn ChatUpstream>,
}

impl ChatHandler {
    pub fn new(
        config: Config,
        credentials: Arc<dyn CredentialResolver>,
        upstream: Arc<dyn ChatUpstream>,
    ) -> Self {
        Self { config: Arc::new(config), credentials, upstream }
    }

    /// Always produces a response; every failure is mapped to a status code.
    pub async fn handle(&self, event: InboundEvent) -> HttpResponse {
        if event.is_preflight() {
            debug!("answering CORS preflight");
            return add_cors(HttpResponse::empty(StatusCode::OK), &self.config.allowed_origin);
        }

        let resp = match self.process(&event).await {
            Ok(reply) => json_response(StatusCode::OK, &reply),
            Err(err) => {
                match &err {
                    AppError::Validation(msg) => warn!(reason = %msg, "rejecting request"),
                    other => error!(error = %other, "request failed"),
                }
                let (status, body) = error_response(&err);
                json_response(status, &body)
            }
        };
        let resp = resp.unwrap_or_else(|e| {
            error!(error = %e, "failed to encode response");
            let mut fallback = HttpResponse::empty(StatusCode::INTERNAL_SERVER_ERROR);
            fallback.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            fallback.body = format!(r#"{{"error":"{SERVER_ERROR}"}}"#);
            fallback
        });
        add_cors(resp, &self.config.allowed_origin)
    }

    async fn process(&self, event: &InboundEvent) -> Result<AssistantReply> {
        let body = event.body_value(self.config.allow_event_as_body)?;
        debug!(body = %body, "parsed request body");

        let request = ChatRequest::from_body(
            &body,
            &self.config.default_model,
            self.config.default_temperature,
        )?;
        info!(
            thread_id = %request.thread_id,
            model = %request.model,
            messages = request.messages.len(),
            "forwarding conversation"
        );

        let api_key = self.credentials.resolve().await?;

        let timeout = self.config.upstream_timeout;
        let reply = tokio::time::timeout(timeout, self.upstream.send(&api_key, &request))
            .await
            .map_err(|_| {
                AppError::Upstream(format!("no reply within {}ms", timeout.as_millis()))
            })??;
        debug!(choices = reply.choices.len(), "upstream replied");

        Ok(AssistantReply { assistant: reply.into_assistant() })
    }
}

use std::sync::Arc;

use chat_proxy::clients::{OpenAiUpstream, SecretsManagerStore};
use chat_proxy::http::HttpResponse;
use chat_proxy::models::InboundEvent;
use chat_proxy::services::StoreCredentialResolver;
use chat_proxy::{ChatHandler, Config, telemetry};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = Config::from_env()?;
    let store = SecretsManagerStore::from_env().await;
    let credentials = Arc::new(StoreCredentialResolver::new(store, &config));
    let upstream = Arc::new(OpenAiUpstream::new(config.api_base_url.clone()));
    let chat = ChatHandler::new(config, credentials, upstream);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let chat = chat.clone();
        async move { handler(&chat, event).await }
    }))
    .await
}

async fn handler(chat: &ChatHandler, event: LambdaEvent<Value>) -> Result<HttpResponse, Error> {
    let (payload, context) = event.into_parts();
    tracing::debug!(request_id = %context.request_id, event = %payload, "raw event");

    let inbound = InboundEvent::from_raw(payload);
    let resp = chat.handle(inbound).await;
    tracing::info!(request_id = %context.request_id, status = resp.status.as_u16(), "request done");
    Ok(resp)
}

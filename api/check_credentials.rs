use chat_proxy::clients::SecretsManagerStore;
use chat_proxy::services::StoreCredentialResolver;
use chat_proxy::traits::CredentialResolver;
use chat_proxy::{Config, telemetry};

/// Resolve the upstream API key once, the same way the Lambda does, and print
/// a masked form of it.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = Config::from_env()?;
    let source = if config.api_key.is_some() { "environment" } else { "secret store" };
    let store = SecretsManagerStore::from_env().await;
    let resolver = StoreCredentialResolver::new(store, &config);

    match resolver.resolve().await {
        Ok(key) => {
            println!("API key resolved from {source}: {}", key.masked());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error retrieving API key: {e}");
            Err(e.into())
        }
    }
}

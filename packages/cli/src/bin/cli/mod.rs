pub mod catalogue;
pub mod chat;
pub mod knowledge;
pub mod phases;

use anyhow::Context;
use leadflow_client::ApiClient;
use leadflow_config::Config;
use leadflow_offers::OfferRegistry;

pub fn api_client(config: &Config) -> anyhow::Result<ApiClient> {
    ApiClient::new(config).context("failed to build API client")
}

/// Built-in flows, plus saved custom questions unless offline
pub async fn registry(config: &Config, offline: bool) -> anyhow::Result<OfferRegistry> {
    let client = if offline {
        None
    } else {
        Some(api_client(config)?)
    };
    leadflow_cli::load_registry(client.as_ref())
        .await
        .context("invalid offer catalogue")
}

use async_trait::async_trait;
use tracing::debug;

use super::{DealRecord, DealsError, DealsSource};
use crate::config::DealsConfig;

/// HTTP client for the CheapShark deals listing.
#[derive(Debug, Clone)]
pub struct CheapSharkClient {
    http: reqwest::Client,
    config: DealsConfig,
}

impl CheapSharkClient {
    pub fn new(config: DealsConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl DealsSource for CheapSharkClient {
    async fn fetch_deals(&self) -> Result<Vec<DealRecord>, DealsError> {
        let upper_price = self.config.upper_price.to_string();
        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("storeID", self.config.store_id.as_str()),
                ("upperPrice", upper_price.as_str()),
            ])
            .send()
            .await
            .map_err(|err| DealsError::Retrieval(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DealsError::Retrieval(format!(
                "deals endpoint answered {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| DealsError::Retrieval(err.to_string()))?;
        let deals: Vec<DealRecord> =
            serde_json::from_slice(&body).map_err(|err| DealsError::Parse(err.to_string()))?;

        debug!(count = deals.len(), "fetched deal listing");
        Ok(deals)
    }
}

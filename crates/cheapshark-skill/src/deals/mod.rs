//! Deal retrieval and the fetch → normalize → rank → narrate pipeline.

pub mod client;
pub mod normalizer;
pub mod ranking;
pub mod service;
pub mod speech;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

pub use client::CheapSharkClient;
pub use normalizer::normalize;
pub use ranking::{rank, RankKey};
pub use service::{DealQueryError, DealService};
pub use speech::{format, DealPhrase};

/// One discount listing as supplied by the deals source.
///
/// Numeric fields stay textual: CheapShark sends them as JSON strings and the
/// spoken output repeats them verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    pub title: String,
    #[serde(deserialize_with = "text_or_number")]
    pub sale_price: String,
    #[serde(deserialize_with = "text_or_number")]
    pub savings: String,
    #[serde(deserialize_with = "text_or_number")]
    pub deal_rating: String,
    #[serde(default = "unrated", deserialize_with = "text_or_number")]
    pub metacritic_score: String,
    #[serde(rename = "dealID", default)]
    pub deal_id: Option<String>,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub normal_price: Option<String>,
}

fn unrated() -> String {
    "0".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}

/// Anything that can hand back the current deal listing.
#[async_trait]
pub trait DealsSource: Send + Sync {
    async fn fetch_deals(&self) -> Result<Vec<DealRecord>, DealsError>;
}

/// Failure to obtain a deal listing from the source.
#[derive(Debug, thiserror::Error)]
pub enum DealsError {
    #[error("deals request failed: {0}")]
    Retrieval(String),
    #[error("deals payload is not a list of deals: {0}")]
    Parse(String),
}

/// A deal field holds a value the pipeline cannot interpret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("deal '{title}' has unusable {field} value '{value}'")]
pub struct DataFormatError {
    pub title: String,
    pub field: &'static str,
    pub value: String,
}

impl DataFormatError {
    pub(crate) fn new(deal: &DealRecord, field: &'static str, value: &str) -> Self {
        Self {
            title: deal.title.clone(),
            field,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::DealRecord;

    pub(crate) fn deal(title: &str, savings: &str, rating: &str, score: &str) -> DealRecord {
        DealRecord {
            title: title.to_string(),
            sale_price: "1.99".to_string(),
            savings: savings.to_string(),
            deal_rating: rating.to_string(),
            metacritic_score: score.to_string(),
            deal_id: None,
            normal_price: None,
        }
    }
}

use std::sync::Arc;

use tracing::debug;

use super::normalizer::normalize;
use super::ranking::{rank, RankKey};
use super::{DataFormatError, DealRecord, DealsError, DealsSource};

/// Composes the deals source with normalization and ranking.
pub struct DealService<S> {
    source: Arc<S>,
}

impl<S> Clone for DealService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> DealService<S>
where
    S: DealsSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Current listing ordered by CheapShark's deal rating.
    pub async fn by_deal_rating(&self) -> Result<Vec<DealRecord>, DealQueryError> {
        self.ranked(RankKey::DealRating, None).await
    }

    /// Deals at least `percent` off, deepest discount first.
    pub async fn at_least_percent_off(
        &self,
        percent: i64,
    ) -> Result<Vec<DealRecord>, DealQueryError> {
        self.ranked(RankKey::Savings, Some(percent)).await
    }

    /// Current listing ordered by Metacritic score.
    pub async fn by_critic_score(&self) -> Result<Vec<DealRecord>, DealQueryError> {
        self.ranked(RankKey::MetacriticScore, None).await
    }

    async fn ranked(
        &self,
        key: RankKey,
        threshold: Option<i64>,
    ) -> Result<Vec<DealRecord>, DealQueryError> {
        let fetched = self.source.fetch_deals().await?;
        let total = fetched.len();
        let ranked = rank(normalize(fetched)?, key, threshold)?;
        debug!(?key, ?threshold, total, kept = ranked.len(), "ranked deals");
        Ok(ranked)
    }
}

/// Error raised while answering a deal query.
#[derive(Debug, thiserror::Error)]
pub enum DealQueryError {
    #[error(transparent)]
    Source(#[from] DealsError),
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
}

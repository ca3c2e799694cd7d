use std::cmp::Ordering;

use super::normalizer::savings_percent;
use super::{DataFormatError, DealRecord};

/// Field a deal listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKey {
    DealRating,
    Savings,
    MetacriticScore,
}

impl RankKey {
    fn field(self) -> &'static str {
        match self {
            RankKey::DealRating => "dealRating",
            RankKey::Savings => "savings",
            RankKey::MetacriticScore => "metacriticScore",
        }
    }

    fn value_of(self, deal: &DealRecord) -> Result<f64, DataFormatError> {
        let raw = match self {
            RankKey::DealRating => deal.deal_rating.as_str(),
            RankKey::Savings => return savings_percent(deal).map(f64::from),
            RankKey::MetacriticScore => deal.metacritic_score.as_str(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() && self == RankKey::MetacriticScore {
            return Ok(0.0);
        }

        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| DataFormatError::new(deal, self.field(), raw))
    }
}

/// Orders normalized deals by `key`, highest first.
///
/// With a `threshold`, only deals whose whole-number savings are at least that
/// percentage survive. Deals with equal keys keep their input order. The full
/// ordered list is returned; picking the top few is up to the caller.
pub fn rank(
    records: Vec<DealRecord>,
    key: RankKey,
    threshold: Option<i64>,
) -> Result<Vec<DealRecord>, DataFormatError> {
    let mut keyed = Vec::with_capacity(records.len());
    for deal in records {
        if let Some(minimum) = threshold {
            if i64::from(savings_percent(&deal)?) < minimum {
                continue;
            }
        }
        let value = key.value_of(&deal)?;
        keyed.push((value, deal));
    }

    // sort_by is stable, so ties keep source order.
    keyed.sort_by(|(left, _), (right, _)| right.partial_cmp(left).unwrap_or(Ordering::Equal));

    Ok(keyed.into_iter().map(|(_, deal)| deal).collect())
}

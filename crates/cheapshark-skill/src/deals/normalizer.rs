use super::{DataFormatError, DealRecord};

/// Rewrites every record's `savings` as a whole-number percentage.
///
/// Rounding is half away from zero (`49.5` becomes `"50"`). The rounded value
/// must land in `0..=100`; anything else, or text that is not a number, is a
/// [`DataFormatError`]. Applying this twice is the same as applying it once.
pub fn normalize(records: Vec<DealRecord>) -> Result<Vec<DealRecord>, DataFormatError> {
    records.into_iter().map(normalize_record).collect()
}

fn normalize_record(mut deal: DealRecord) -> Result<DealRecord, DataFormatError> {
    let percent = rounded_percent(&deal.savings)
        .ok_or_else(|| DataFormatError::new(&deal, "savings", &deal.savings))?;
    deal.savings = percent.to_string();
    Ok(deal)
}

fn rounded_percent(raw: &str) -> Option<u8> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let rounded = value.round();
    (0.0..=100.0).contains(&rounded).then_some(rounded as u8)
}

/// Integer form of an already-normalized `savings` value.
pub(crate) fn savings_percent(deal: &DealRecord) -> Result<u32, DataFormatError> {
    deal.savings
        .trim()
        .parse::<u32>()
        .map_err(|_| DataFormatError::new(deal, "savings", &deal.savings))
}

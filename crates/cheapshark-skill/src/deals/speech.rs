use super::DealRecord;

/// Sentence shape used for each narrated deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealPhrase {
    /// "{title} is currently {savings}% off for a price of ${price}."
    Discount,
    /// Like `Discount`, prefixed with the Metacritic score.
    CriticScore,
}

impl DealPhrase {
    fn render(self, deal: &DealRecord, out: &mut String) {
        out.push_str(&deal.title);
        if self == DealPhrase::CriticScore {
            out.push_str(" has a Metacritic score of ");
            out.push_str(&deal.metacritic_score);
            out.push_str(" and");
        }
        out.push_str(" is currently ");
        out.push_str(&deal.savings);
        out.push_str("% off for a price of $");
        out.push_str(&deal.sale_price);
        out.push_str(". ");
    }
}

/// Narrates the first `limit` ranked deals after `intro`.
///
/// Whether the intro says "the top five" or "all" is the caller's call; the
/// formatter only truncates. Titles are spoken as-is.
pub fn format(records: &[DealRecord], limit: usize, intro: &str, phrase: DealPhrase) -> String {
    let mut speech = String::from(intro);
    for deal in records.iter().take(limit) {
        phrase.render(deal, &mut speech);
    }
    speech.truncate(speech.trim_end().len());
    speech
}

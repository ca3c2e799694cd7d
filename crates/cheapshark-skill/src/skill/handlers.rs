use async_trait::async_trait;
use tracing::info;

use super::{SkillError, SkillRequest, SpokenResponse};
use crate::deals::{format, DealPhrase, DealService, DealsSource};

pub const DEAL_RATING_INTENT: &str = "CheapSharkIntent";
pub const PERCENT_FILTER_INTENT: &str = "CheapSharkPercentFilterIntent";
pub const SCORE_FILTER_INTENT: &str = "CheapSharkScoreFilterIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

pub const SALE_PERCENT_SLOT: &str = "salePercent";

/// How many deals a listing narrates at most.
pub const TOP_DEALS: usize = 5;

pub const WELCOME: &str = "Welcome, this skill returns deals for video games on the Steam marketplace. \
     You can say anything that has to do with deals for: cheap shark, steam, pc games, etc.";
pub const HELP: &str = "You can say hello to me! How can I help?";
pub const GOODBYE: &str = "Goodbye!";
pub const FALLBACK: &str = "Hmm, I'm not sure. You can say Hello or Help. What would you like to do?";
pub const FALLBACK_REPROMPT: &str = "I didn't catch that. What can I help you with?";

/// One entry of the dispatch table.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, request: &SkillRequest) -> bool;

    async fn handle(&self, request: &SkillRequest) -> Result<SpokenResponse, SkillError>;
}

/// Top five deals by CheapShark deal rating.
pub struct DealRatingHandler<S> {
    deals: DealService<S>,
}

impl<S> DealRatingHandler<S> {
    pub fn new(deals: DealService<S>) -> Self {
        Self { deals }
    }
}

#[async_trait]
impl<S> RequestHandler for DealRatingHandler<S>
where
    S: DealsSource + 'static,
{
    fn name(&self) -> &'static str {
        "deal_rating"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        request.is_intent(DEAL_RATING_INTENT)
    }

    async fn handle(&self, _request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        let deals = self.deals.by_deal_rating().await?;
        Ok(SpokenResponse::tell(format(
            &deals,
            TOP_DEALS,
            "Here are the top five best current Steam game deals based on deal rating: ",
            DealPhrase::Discount,
        )))
    }
}

/// Deals at or above the spoken discount, deepest first.
pub struct PercentFilterHandler<S> {
    deals: DealService<S>,
}

impl<S> PercentFilterHandler<S> {
    pub fn new(deals: DealService<S>) -> Self {
        Self { deals }
    }
}

#[async_trait]
impl<S> RequestHandler for PercentFilterHandler<S>
where
    S: DealsSource + 'static,
{
    fn name(&self) -> &'static str {
        "percent_filter"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        request.is_intent(PERCENT_FILTER_INTENT)
    }

    async fn handle(&self, request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        let percent = sale_percent(request)?;
        let deals = self.deals.at_least_percent_off(percent).await?;

        let intro = if deals.len() >= TOP_DEALS {
            format!("Here are five Steam game deals above {percent}%: ")
        } else {
            format!("Here are all Steam game deals above {percent}%: ")
        };

        Ok(SpokenResponse::tell(format(
            &deals,
            TOP_DEALS,
            &intro,
            DealPhrase::Discount,
        )))
    }
}

fn sale_percent(request: &SkillRequest) -> Result<i64, SkillError> {
    let raw = match request {
        SkillRequest::Intent(intent) => intent.slot(SALE_PERCENT_SLOT),
        _ => None,
    };
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SkillError::SlotValidation {
            slot: SALE_PERCENT_SLOT,
            reason: "is missing".to_string(),
        })?;

    raw.parse::<i64>().map_err(|_| SkillError::SlotValidation {
        slot: SALE_PERCENT_SLOT,
        reason: format!("must be a whole number, got '{raw}'"),
    })
}

/// Top five deals by Metacritic score.
pub struct ScoreFilterHandler<S> {
    deals: DealService<S>,
}

impl<S> ScoreFilterHandler<S> {
    pub fn new(deals: DealService<S>) -> Self {
        Self { deals }
    }
}

#[async_trait]
impl<S> RequestHandler for ScoreFilterHandler<S>
where
    S: DealsSource + 'static,
{
    fn name(&self) -> &'static str {
        "score_filter"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        request.is_intent(SCORE_FILTER_INTENT)
    }

    async fn handle(&self, _request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        let deals = self.deals.by_critic_score().await?;
        Ok(SpokenResponse::tell(format(
            &deals,
            TOP_DEALS,
            "Here are the top five best current Steam game deals based on Metacritic score: ",
            DealPhrase::CriticScore,
        )))
    }
}

/// Greets the user when the skill opens.
pub struct LaunchHandler;

#[async_trait]
impl RequestHandler for LaunchHandler {
    fn name(&self) -> &'static str {
        "launch"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        matches!(request, SkillRequest::Launch)
    }

    async fn handle(&self, _request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        Ok(SpokenResponse::ask(WELCOME, WELCOME))
    }
}

/// Explains what the user can ask for.
pub struct HelpHandler;

#[async_trait]
impl RequestHandler for HelpHandler {
    fn name(&self) -> &'static str {
        "help"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        request.is_intent(HELP_INTENT)
    }

    async fn handle(&self, _request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        Ok(SpokenResponse::ask(HELP, HELP))
    }
}

/// Says goodbye and closes the session.
pub struct CancelOrStopHandler;

#[async_trait]
impl RequestHandler for CancelOrStopHandler {
    fn name(&self) -> &'static str {
        "cancel_or_stop"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        request.is_intent(CANCEL_INTENT) || request.is_intent(STOP_INTENT)
    }

    async fn handle(&self, _request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        Ok(SpokenResponse::tell(GOODBYE))
    }
}

/// Answers utterances the model could not map to an intent.
pub struct FallbackHandler;

#[async_trait]
impl RequestHandler for FallbackHandler {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        request.is_intent(FALLBACK_INTENT)
    }

    async fn handle(&self, _request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        info!("fallback intent triggered");
        Ok(SpokenResponse::ask(FALLBACK, FALLBACK_REPROMPT))
    }
}

/// Acknowledges session teardown without speaking.
pub struct SessionEndedHandler;

#[async_trait]
impl RequestHandler for SessionEndedHandler {
    fn name(&self) -> &'static str {
        "session_ended"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        matches!(request, SkillRequest::SessionEnded)
    }

    async fn handle(&self, _request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        Ok(SpokenResponse::silent())
    }
}

/// Repeats any intent name back; must stay last in the table.
pub struct IntentReflectorHandler;

#[async_trait]
impl RequestHandler for IntentReflectorHandler {
    fn name(&self) -> &'static str {
        "intent_reflector"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        matches!(request, SkillRequest::Intent(_))
    }

    async fn handle(&self, request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        let name = request.intent_name().unwrap_or_default();
        Ok(SpokenResponse::tell(format!("You just triggered {name}.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::IntentRequest;

    #[test]
    fn sale_percent_requires_a_whole_number() {
        let request: SkillRequest = IntentRequest::new(PERCENT_FILTER_INTENT)
            .with_slot(SALE_PERCENT_SLOT, " 75 ")
            .into();
        assert_eq!(sale_percent(&request).expect("numeric"), 75);

        let request: SkillRequest = IntentRequest::new(PERCENT_FILTER_INTENT)
            .with_slot(SALE_PERCENT_SLOT, "seventy")
            .into();
        assert!(matches!(
            sale_percent(&request),
            Err(SkillError::SlotValidation { slot: SALE_PERCENT_SLOT, .. })
        ));

        let request = SkillRequest::intent(PERCENT_FILTER_INTENT);
        let err = sale_percent(&request).expect_err("slot missing");
        assert_eq!(err.to_string(), "slot 'salePercent' is missing");
    }

    #[test]
    fn sale_percent_accepts_any_integer() {
        for (raw, expected) in [("-5", -5), ("0", 0), ("5000000000", 5_000_000_000)] {
            let request: SkillRequest = IntentRequest::new(PERCENT_FILTER_INTENT)
                .with_slot(SALE_PERCENT_SLOT, raw)
                .into();
            assert_eq!(sale_percent(&request).expect("integer"), expected);
        }
    }

    #[tokio::test]
    async fn cancel_and_stop_share_a_goodbye() {
        for intent in [CANCEL_INTENT, STOP_INTENT] {
            let request = SkillRequest::intent(intent);
            assert!(CancelOrStopHandler.can_handle(&request));
            let response = CancelOrStopHandler.handle(&request).await.expect("static");
            assert_eq!(response, SpokenResponse::tell(GOODBYE));
        }
    }

    #[tokio::test]
    async fn reflector_accepts_any_intent_but_nothing_else() {
        assert!(IntentReflectorHandler.can_handle(&SkillRequest::intent("Anything")));
        assert!(!IntentReflectorHandler.can_handle(&SkillRequest::Launch));
        assert!(!IntentReflectorHandler.can_handle(&SkillRequest::SessionEnded));

        let response = IntentReflectorHandler
            .handle(&SkillRequest::intent("OrderPizzaIntent"))
            .await
            .expect("static");
        assert_eq!(
            response.speech.as_deref(),
            Some("You just triggered OrderPizzaIntent.")
        );
    }

    #[tokio::test]
    async fn launch_and_help_keep_session_open() {
        let launch = LaunchHandler
            .handle(&SkillRequest::Launch)
            .await
            .expect("static");
        assert!(launch.keeps_session_open());
        assert_eq!(launch.reprompt.as_deref(), Some(WELCOME));

        let help = HelpHandler
            .handle(&SkillRequest::intent(HELP_INTENT))
            .await
            .expect("static");
        assert!(help.keeps_session_open());
    }
}

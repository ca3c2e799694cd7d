use std::sync::Arc;

use tracing::{debug, error};

use super::handlers::{
    CancelOrStopHandler, DealRatingHandler, FallbackHandler, HelpHandler, IntentReflectorHandler,
    LaunchHandler, PercentFilterHandler, RequestHandler, ScoreFilterHandler, SessionEndedHandler,
};
use super::{SkillError, SkillRequest, SpokenResponse};
use crate::deals::{DealService, DealsSource};

pub const APOLOGY: &str = "Sorry, I had trouble doing what you asked. Please try again.";

/// Ordered handler table; the first handler that accepts a request answers it.
pub struct SkillDispatcher {
    handlers: Vec<Box<dyn RequestHandler>>,
}

impl SkillDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// The CheapShark skill's handler chain, deal intents first and the
    /// intent reflector last.
    pub fn standard<S>(source: Arc<S>) -> Self
    where
        S: DealsSource + 'static,
    {
        let deals = DealService::new(source);
        Self::new()
            .with_handler(DealRatingHandler::new(deals.clone()))
            .with_handler(PercentFilterHandler::new(deals.clone()))
            .with_handler(ScoreFilterHandler::new(deals))
            .with_handler(LaunchHandler)
            .with_handler(HelpHandler)
            .with_handler(CancelOrStopHandler)
            .with_handler(FallbackHandler)
            .with_handler(SessionEndedHandler)
            .with_handler(IntentReflectorHandler)
    }

    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: RequestHandler + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    /// Answers `request`, turning any handler failure into the apology.
    pub async fn dispatch(&self, request: &SkillRequest) -> SpokenResponse {
        match self.try_dispatch(request).await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    request_type = request.type_name(),
                    intent = request.intent_name().unwrap_or_default(),
                    error = %err,
                    "request failed"
                );
                SpokenResponse::ask(APOLOGY, APOLOGY)
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch) but hands the error back.
    pub async fn try_dispatch(&self, request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
        let handler = self
            .handlers
            .iter()
            .find(|handler| handler.can_handle(request))
            .ok_or_else(|| SkillError::Unhandled {
                request_type: request.type_name().to_string(),
            })?;

        debug!(handler = handler.name(), request_type = request.type_name(), "dispatching");
        handler.handle(request).await
    }
}

impl Default for SkillDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deals::{DealRecord, DealsError};
    use async_trait::async_trait;

    struct EmptySource;

    #[async_trait]
    impl DealsSource for EmptySource {
        async fn fetch_deals(&self) -> Result<Vec<DealRecord>, DealsError> {
            Ok(Vec::new())
        }
    }

    struct Named(&'static str, &'static str);

    #[async_trait]
    impl RequestHandler for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn can_handle(&self, request: &SkillRequest) -> bool {
            request.is_intent(self.1)
        }

        async fn handle(&self, _request: &SkillRequest) -> Result<SpokenResponse, SkillError> {
            Ok(SpokenResponse::tell(self.0))
        }
    }

    #[test]
    fn standard_chain_keeps_declared_order() {
        let dispatcher = SkillDispatcher::standard(Arc::new(EmptySource));
        assert_eq!(
            dispatcher.handler_names(),
            vec![
                "deal_rating",
                "percent_filter",
                "score_filter",
                "launch",
                "help",
                "cancel_or_stop",
                "fallback",
                "session_ended",
                "intent_reflector",
            ]
        );
    }

    #[tokio::test]
    async fn first_matching_handler_wins() {
        let dispatcher = SkillDispatcher::new()
            .with_handler(Named("first", "Shared"))
            .with_handler(Named("second", "Shared"));

        let response = dispatcher.dispatch(&SkillRequest::intent("Shared")).await;
        assert_eq!(response.speech.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn unmatched_request_gets_the_apology() {
        let dispatcher = SkillDispatcher::new().with_handler(Named("only", "Known"));

        let err = dispatcher
            .try_dispatch(&SkillRequest::Other("CanFulfillIntentRequest".to_string()))
            .await
            .expect_err("nothing matches");
        assert!(matches!(err, SkillError::Unhandled { .. }));

        let response = dispatcher.dispatch(&SkillRequest::intent("Unknown")).await;
        assert_eq!(response, SpokenResponse::ask(APOLOGY, APOLOGY));
    }
}

use crate::infra::{parse_slot, FileDealsSource};
use cheapshark_skill::config::AppConfig;
use cheapshark_skill::deals::CheapSharkClient;
use cheapshark_skill::error::AppError;
use cheapshark_skill::skill::{
    IntentRequest, ResponseEnvelope, SkillDispatcher, SkillRequest, SpokenResponse,
};
use cheapshark_skill::telemetry;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AskArgs {
    /// Intent name, e.g. CheapSharkIntent or CheapSharkPercentFilterIntent
    pub(crate) intent: String,
    /// Slot value as NAME=VALUE (repeatable), e.g. --slot salePercent=90
    #[arg(long = "slot", value_parser = parse_slot)]
    pub(crate) slots: Vec<(String, String)>,
    /// Read deals from a saved CheapShark JSON response instead of the API
    #[arg(long)]
    pub(crate) deals_file: Option<PathBuf>,
    /// Print the response envelope as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_ask(args: AskArgs) -> Result<(), AppError> {
    let AskArgs {
        intent,
        slots,
        deals_file,
        json,
    } = args;

    let dispatcher = build_dispatcher(deals_file)?;
    let request = slots
        .into_iter()
        .fold(IntentRequest::new(intent), |request, (name, value)| {
            request.with_slot(name, value)
        });

    let response = dispatcher.dispatch(&SkillRequest::from(request)).await;
    render(response, json)
}

pub(crate) async fn run_launch() -> Result<(), AppError> {
    let dispatcher = build_dispatcher(None)?;
    let response = dispatcher.dispatch(&SkillRequest::Launch).await;
    render(response, false)
}

fn build_dispatcher(deals_file: Option<PathBuf>) -> Result<SkillDispatcher, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let dispatcher = match deals_file {
        Some(path) => SkillDispatcher::standard(Arc::new(FileDealsSource::new(path))),
        None => SkillDispatcher::standard(Arc::new(CheapSharkClient::new(config.deals)?)),
    };
    Ok(dispatcher)
}

fn render(response: SpokenResponse, json: bool) -> Result<(), AppError> {
    if json {
        let envelope = ResponseEnvelope::from(response);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    match &response.speech {
        Some(speech) => println!("{speech}"),
        None => println!("(no speech)"),
    }
    if let Some(reprompt) = &response.reprompt {
        println!("Reprompt: {reprompt}");
    }
    if response.keeps_session_open() {
        println!("Session stays open");
    } else {
        println!("Session ends");
    }

    Ok(())
}

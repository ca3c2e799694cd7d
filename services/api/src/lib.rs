mod ask;
mod cli;
mod infra;
mod routes;
mod server;

use cheapshark_skill::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

mod cli;
mod infra;
mod report;
mod routes;
mod server;

use ehs_core::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

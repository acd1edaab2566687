mod cli;
mod infra;
mod report;
mod routes;
mod server;

use readiness_check::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use pkl_core::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

mod cli;
mod infra;
mod offline;
mod routes;
mod server;

use gsb_index::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

use std::process::ExitCode;

use tokio::net::TcpListener;
use todo_core::{MemoryStore, SqliteStore};
use todo_server::{telemetry, Config, ServerError, StorageMode};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init(config.log_format);

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Config) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, storage = ?config.storage, "listening");

    match config.storage {
        StorageMode::Sqlite => {
            let store = SqliteStore::connect(&config.database_url).await?;
            tracing::info!(url = %config.database_url, "sqlite store opened");
            todo_server::run(listener, store).await?;
        }
        StorageMode::InMemory => todo_server::run(listener, MemoryStore::new()).await?,
    }
    Ok(())
}

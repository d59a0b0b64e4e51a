//! calinvite server entry point.

use std::net::SocketAddr;
use std::process::ExitCode;

use tracing::info;

use calinvite_core::{TracingConfig, init_tracing};
use calinvite_providers::{AuthManager, GoogleConfig, OAuthCredentials};
use calinvite_server::{AppState, ServerConfig, ServerError, ServerResult, router};

#[tokio::main]
async fn main() -> ExitCode {
    // Pull in a local .env before reading the environment
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing(TracingConfig::server()) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ServerResult<()> {
    let config = ServerConfig::from_env().map_err(ServerError::config)?;

    let credentials = OAuthCredentials::from_file(&config.credentials_path)
        .map_err(ServerError::config)?;
    let google_config = GoogleConfig::new(credentials, &config.token_path);
    let auth = AuthManager::new(google_config)?;

    let app = router(AppState::new(auth).into_shared());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("server listening on http://{}", addr);
    info!("visit http://localhost:{}/auth to authenticate with Google", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

use code_server::{telemetry, ServerConfig, ServerError};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    telemetry::init_logging();
    let config = ServerConfig::from_env()?;
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        categories = config.codes.len(),
        "listening on {addr}"
    );
    code_server::run(listener, &config).await?;
    Ok(())
}

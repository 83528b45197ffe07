use server::{Environment, DEFAULT_PORT};
use std::env;
use std::net::SocketAddr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let environment = Environment::from_str(&env::var("RECAST_ENV").unwrap_or_default());

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| DEFAULT_PORT.to_string())
        .parse()?;

    let data_path = env::var("RECAST_DATA")
        .map(Into::into)
        .unwrap_or_else(|_| environment.default_data_path());

    // Absolute base URL handed back to callers in their feed URL; defaults
    // to localhost for local runs.
    let public_url = env::var("PUBLIC_URL").ok();

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    tracing::info!("Recast starting on port {}", port);
    server::run_server(
        addr,
        environment,
        &data_path.to_string_lossy(),
        public_url,
    )
    .await
}

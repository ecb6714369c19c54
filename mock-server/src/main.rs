use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;

    // MOCK_AUTHORIZATION holds a full header value, e.g. "Bearer secret".
    let router = match std::env::var("MOCK_AUTHORIZATION") {
        Ok(authorization) => mock_server::app_with_auth(authorization),
        Err(_) => mock_server::app(),
    };
    mock_server::run_router(listener, router).await
}

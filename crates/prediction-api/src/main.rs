fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter()).init();
    }

    tracing::info!("Starting flight delay prediction API");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(prediction_api::run_server())
}

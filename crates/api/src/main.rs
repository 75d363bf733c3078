use kafkagate_infra::AppConfig;

#[tokio::main]
async fn main() {
    kafkagate_observability::init();

    let config = AppConfig::from_env_or_yaml().unwrap_or_else(|e| {
        tracing::error!(error = %format!("{e:#}"), "invalid configuration");
        std::process::exit(1);
    });

    let app = kafkagate_api::app::build_app(&config).unwrap_or_else(|e| {
        tracing::error!(error = %format!("{e:#}"), "failed to build services");
        std::process::exit(1);
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app).await.unwrap();
}

#[tokio::main]
async fn main() {
    cradle_observability::init();

    let admin_email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| {
        tracing::warn!("ADMIN_EMAIL not set; using dev default");
        "admin@cradle.dev".to_string()
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = cradle_api::app::build_app(admin_email, true).await;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

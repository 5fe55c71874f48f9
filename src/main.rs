use std::net::SocketAddr;

use studentdesk_server::{app, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let db_url =
        std::env::var("STUDENTDESK_DB").unwrap_or_else(|_| "sqlite:students.db".to_string());
    let pool = store::connect(&db_url).await?;
    store::init_db(&pool).await?;

    let addr: SocketAddr = std::env::var("STUDENTDESK_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    log::info!("Starting StudentDesk HTTP server on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app(pool).into_make_service())
        .await?;
    Ok(())
}

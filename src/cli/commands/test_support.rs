use tokio::net::TcpListener;

use crate::api::{AppState, routes};
use crate::db::{Database, SqliteDatabase};

/// Spawn the REST API on an ephemeral port backed by an in-memory database.
pub async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    let app = routes::create_router(AppState::new(db), false);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (url, handle)
}

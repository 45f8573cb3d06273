//! API server command

use std::net::IpAddr;
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};

use crate::api::{self, Config};
use crate::db::{Database, SqliteDatabase};
use crate::paths::get_db_path;

/// Open and migrate the database, then serve the REST API until shutdown.
pub async fn run(
    host: IpAddr,
    port: u16,
    home: Option<PathBuf>,
    verbosity: u8,
    enable_docs: bool,
) -> Result<()> {
    let db_path = get_db_path(home.as_deref());

    println!("Opening database at {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }

    let db = SqliteDatabase::open(&db_path).await?;
    db.migrate().await?;
    println!("Database migrations complete");

    // Printed before tracing is initialized so it is always visible.
    println!();
    println!("estate API server starting...");
    println!("   API:      http://{}:{}/api/v1", host, port);
    if enable_docs {
        println!("   Docs:     http://{}:{}/docs", host, port);
    }
    println!("   Database: {}", db_path.display());
    println!();

    api::run(
        Config {
            host,
            port,
            verbosity,
            enable_docs,
        },
        db,
    )
    .await?;

    Ok(())
}

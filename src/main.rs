use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use mull::app::{App, AppEvent};
use mull::config::Config;
use mull::seed;
use mull::storage::{Database, DatabaseError};
use mull::ui;

/// Get the config directory path (~/.config/mull/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("mull"))
}

#[derive(Parser, Debug)]
#[command(name = "mull", about = "Terminal reading and publishing client for Thoughts")]
struct Args {
    /// Reset database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Import a browser localStorage snapshot (JSON file of thoughts_* keys)
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Open straight into an article by id
    #[arg(long, value_name = "ID")]
    article: Option<String>,

    /// Open straight into an author profile
    #[arg(long, value_name = "AUTHOR")]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // User-only access: the database holds the identity and reading history
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let db_path = config_dir.join("mull.db");

    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    let config = Config::load(&config_dir.join("config.toml")).context("Failed to load config")?;

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of mull appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    // Sync the seed catalog, then sweep local stories against the denylist.
    let records = seed::load_seed_records(config.seed_path.as_deref())
        .context("Failed to load seed catalog")?;
    let synced = db
        .sync_seed_articles(&records)
        .await
        .context("Failed to sync seed catalog")?;
    tracing::info!(articles = synced, "Seed catalog synced");

    let removed = db
        .apply_denylist()
        .await
        .context("Failed to apply content filter")?;
    if removed > 0 {
        tracing::info!(removed, "Removed filtered local stories");
    }

    if let Some(import_file) = &args.import {
        let raw = std::fs::read_to_string(import_file)
            .with_context(|| format!("Failed to read snapshot: {}", import_file.display()))?;
        let report = db
            .import_snapshot(&raw)
            .await
            .context("Failed to import snapshot")?;
        println!(
            "Imported: {} stories, {} bookmarks, {} follows, {} downloads, {} history entries{}",
            report.user_articles,
            report.bookmarks,
            report.followed_authors,
            report.downloads,
            report.history,
            if report.identity_set {
                ", identity restored"
            } else {
                ""
            }
        );
    }

    let mut app = App::new(db, config);
    app.load_all().await.context("Failed to load library")?;

    if let Some(id) = &args.article {
        app.open_article(id).await?;
    } else if let Some(author) = &args.profile {
        app.open_profile(author);
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}

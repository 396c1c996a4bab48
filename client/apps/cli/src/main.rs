//! Inkline Session CLI
//!
//! Command-line host for the session core: inspect, establish, and end a
//! session against an Inkline auth API from a terminal. Uses `anyhow`
//! for startup errors; session-level failures are already classified by
//! the session crate.
//!
//! Environment:
//! - `INKLINE_API_URL`  - auth API origin (default http://localhost:8000)
//! - `INKLINE_DATA_DIR` - storage directory override
//! - `INKLINE_PASSWORD` - password for the `login` command

use std::env;
use std::sync::Arc;

use anyhow::{Context, bail};
use platform::storage::{FileStorage, StorageBackend};
use session::{
    CacheJanitor, FieldErrors, HttpAuthGateway, HttpGatewayConfig, LoggingNavigator, LoginInput,
    LoginStatus, SessionConfig, SessionPhase, SessionStore, ValidationSink,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sink that prints field errors for the terminal user
struct StderrSink;

impl ValidationSink for StderrSink {
    fn reject(&self, errors: &FieldErrors) {
        eprintln!("Sign-in rejected: {}", errors.message);
        for (field, messages) in &errors.fields {
            for message in messages {
                eprintln!("  {field}: {message}");
            }
        }
    }
}

fn open_storage() -> anyhow::Result<Arc<dyn StorageBackend>> {
    match env::var("INKLINE_DATA_DIR") {
        Ok(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Cannot create data directory {dir}"))?;
            let storage = FileStorage::open(std::path::Path::new(&dir).join("storage.json"))
                .context("Cannot open storage document")?;
            Ok(Arc::new(storage))
        }
        Err(_) => Ok(platform::storage::open_default("inkline")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cli=info,session=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url =
        env::var("INKLINE_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let storage = open_storage()?;

    let gateway = HttpAuthGateway::new(&HttpGatewayConfig::default().with_base_url(&base_url))
        .context("Cannot construct auth gateway")?;
    let store = SessionStore::new(
        Arc::new(gateway),
        Arc::new(LoggingNavigator::new()),
        storage.clone(),
        SessionConfig::default(),
    );

    tracing::info!(api = %base_url, "Session CLI ready");

    let mut args = env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "status".to_string());

    match command.as_str() {
        "status" => {
            let snapshot = store.session().await;
            match snapshot.phase() {
                SessionPhase::Authenticated => {
                    let user = snapshot.user().expect("authenticated snapshot has a user");
                    println!("{}", serde_json::to_string_pretty(user)?);
                }
                SessionPhase::Unauthenticated => println!("Not signed in"),
                SessionPhase::Error => {
                    let error = snapshot.error.expect("error phase carries an error");
                    bail!("Session check failed: {}", error.message);
                }
                phase => println!("Session state: {phase:?}"),
            }
        }
        "login" => {
            let Some(email) = args.next() else {
                bail!("Usage: inkline login <email>");
            };
            let password = env::var("INKLINE_PASSWORD")
                .context("Set INKLINE_PASSWORD for the login command")?;

            let input = LoginInput {
                email,
                password,
                remember: true,
            };
            match store.login(input, &StderrSink).await? {
                LoginStatus::SignedIn => {
                    let snapshot = store.session().await;
                    match snapshot.user() {
                        Some(user) => println!("Signed in as {} ({})", user.name, user.username),
                        None => println!("Signed in"),
                    }
                }
                LoginStatus::Rejected => bail!("Credentials rejected"),
            }
        }
        "logout" => {
            store.logout().await;
            println!("Signed out");
        }
        "purge" => {
            CacheJanitor::new(storage).purge_all();
            println!("Local caches purged");
        }
        other => bail!("Unknown command: {other} (expected status, login, logout, purge)"),
    }

    Ok(())
}

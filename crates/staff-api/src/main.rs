//! staff-server binary.
//!
//! ```text
//! staff-server [--config config.toml] [serve]   # default
//! staff-server check-config                     # validate and exit
//! staff-server hash-password                    # PHC string for a principal
//! ```
//!
//! The configuration is refused before anything is opened if no principal
//! holds the admin role, a password hash does not parse, or the password
//! policy has no minimum length.

use std::{io::BufRead as _, path::Path, sync::Arc};

use anyhow::{Context as _, bail};
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::{Parser, Subcommand};
use rand_core::OsRng;
use staff_api::{AppState, ServerConfig, auth::Role};
use staff_core::StaffManager;
use staff_store_sqlite::{PasswordPolicy, SqliteStore};
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Hotel staff account server")]
struct Cli {
  /// TOML configuration file; `STAFF_*` environment variables override it.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Default)]
enum Command {
  /// Serve the staff management API.
  #[default]
  Serve,
  /// Load and validate the configuration, then exit.
  CheckConfig,
  /// Read a password from stdin and print its argon2 hash.
  ///
  /// The password must satisfy the configured password policy.
  HashPassword,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  match cli.command.unwrap_or_default() {
    Command::Serve => serve(load_config(&cli.config)?).await,
    Command::CheckConfig => {
      let cfg = load_config(&cli.config)?;
      let admins = cfg.principals.iter().filter(|p| p.has_role(Role::Admin)).count();
      println!(
        "configuration ok: {} principal(s), {admins} with the admin role",
        cfg.principals.len()
      );
      Ok(())
    }
    Command::HashPassword => {
      // The policy is all this needs, so a missing or partial config is fine.
      let policy = read_config(&cli.config)
        .map(|cfg| cfg.password_policy)
        .unwrap_or_else(|e| {
          warn!("using the default password policy: {e:#}");
          PasswordPolicy::default()
        });
      println!("{}", hash_password(&policy)?);
      Ok(())
    }
  }
}

fn read_config(path: &Path) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("STAFF"))
    .build()
    .with_context(|| format!("failed to read {}", path.display()))?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let cfg = read_config(path)?;
  cfg
    .validate()
    .with_context(|| format!("refusing configuration from {}", path.display()))?;
  Ok(cfg)
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {}", cfg.store_path.display()))?
    .with_policy(cfg.password_policy.clone());

  let address = cfg.address();
  info!(principals = cfg.principals.len(), store = %cfg.store_path.display(), "starting");
  let app = staff_api::router(AppState {
    manager:    Arc::new(StaffManager::new(store)),
    principals: Arc::new(cfg.principals),
  });

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  info!("listening on http://{address}");
  axum::serve(listener, app).await.context("server error")
}

fn hash_password(policy: &PasswordPolicy) -> anyhow::Result<String> {
  eprint!("Password: ");
  let mut line = String::new();
  std::io::stdin().lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\r', '\n']);

  let problems = policy.check(password);
  if !problems.is_empty() {
    bail!("password rejected by policy: {}", problems.join(" "));
  }

  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string(),
  )
}

//! `ident` — command-line access to the identity store.
//!
//! Reads `ident.toml` (or the path given with `--config`), opens the SQLite
//! store and runs a single operation, printing JSON to stdout.
//!
//! ```
//! ident create --json '{"identity_type":"individual","first_name":"Ada"}'
//! ident get idt_0b6f...
//! ident update idt_0b6f... --json '{"city":"Lagos"}'
//! ```

mod config;

use std::{
  io::{self, Read as _},
  path::PathBuf,
  process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use ident_core::{
  ApiError, ErrorKind,
  identity::{IdentityPatch, NewIdentity},
  store::IdentityStore,
};
use ident_store_sqlite::SqliteStore;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Identity store CLI")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "ident.toml")]
  config: PathBuf,

  /// SQLite file to use instead of `store_path` from the config.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create an identity from a JSON body (`--json` or stdin).
  Create {
    #[arg(long)]
    json: Option<String>,
  },
  /// Print one identity.
  Get { id: String },
  /// Print every identity, newest first.
  List,
  /// Apply a partial update from a JSON body (`--json` or stdin).
  Update {
    id:   String,
    #[arg(long)]
    json: Option<String>,
  },
  /// Delete an identity.
  Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  // Logs go to stderr so stdout stays machine-readable.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = CliConfig::load(&cli.config)?;

  let store_path = expand_tilde(cli.store.as_deref().unwrap_or(cfg.store_path.as_path()));
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open_with_options(&store_path, cfg.store_options())
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(path = ?store_path, "opened store");

  match run(&store, cli.command).await? {
    Ok(()) => Ok(ExitCode::SUCCESS),
    Err(e) => {
      eprintln!("error: {e}");
      Ok(exit_code(e.kind()))
    }
  }
}

/// Outer `Err` is a local failure (bad input, I/O); inner `Err` is a store
/// error reported to the user with its classification.
async fn run<S: IdentityStore>(
  store: &S,
  command: Command,
) -> anyhow::Result<Result<(), ApiError>> {
  let outcome = match command {
    Command::Create { json } => {
      let input: NewIdentity = parse_body(json)?;
      store.create_identity(input).await.map(|i| print_json(&i))
    }
    Command::Get { id } => store.get_identity_by_id(&id).await.map(|i| print_json(&i)),
    Command::List => store.get_all_identities().await.map(|all| print_json(&all)),
    Command::Update { id, json } => {
      let patch: IdentityPatch = parse_body(json)?;
      store.update_identity(&id, &patch).await
    }
    Command::Delete { id } => store.delete_identity(&id).await,
  };
  Ok(outcome)
}

fn parse_body<T: serde::de::DeserializeOwned>(json: Option<String>) -> anyhow::Result<T> {
  let raw = match json {
    Some(raw) => raw,
    None => {
      let mut buf = String::new();
      io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
      buf
    }
  };
  serde_json::from_str(&raw).context("invalid JSON body")
}

fn print_json<T: Serialize>(value: &T) {
  match serde_json::to_string_pretty(value) {
    Ok(s) => println!("{s}"),
    Err(e) => tracing::error!("failed to render output: {e}"),
  }
}

fn exit_code(kind: ErrorKind) -> ExitCode {
  match kind {
    ErrorKind::BadRequest => ExitCode::from(2),
    ErrorKind::NotFound => ExitCode::from(3),
    ErrorKind::InternalServer => ExitCode::FAILURE,
  }
}

//! Configuration for the `ident` binary.
//!
//! An optional TOML file is layered under `IDENT_*` environment variables,
//! e.g. `IDENT_STORE_PATH=/var/lib/ident/ident.db`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use ident_store_sqlite::StoreOptions;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
  /// SQLite file; a leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:        PathBuf,
  /// Overrides the one-minute bound on single-identity reads.
  pub read_timeout_secs: Option<u64>,
}

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/ident/ident.db") }

impl CliConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    ::config::Config::builder()
      .add_source(::config::File::from(path).required(false))
      .add_source(::config::Environment::with_prefix("IDENT"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise CliConfig")
  }

  pub fn store_options(&self) -> StoreOptions {
    let mut options = StoreOptions::default();
    if let Some(secs) = self.read_timeout_secs {
      options.read_timeout = Duration::from_secs(secs);
    }
    options
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use turbo_cache::Cache;
use turbo_cart::prelude::*;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Config file in use, if any.
    pub config_path: Option<PathBuf>,
    /// Directory relative paths in the config resolve against.
    pub base_dir: PathBuf,
}

impl Context {
    /// Load context from config file. `profile` overrides `storage.profile`.
    pub fn load(config_path: Option<&str>, profile: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, Path::new(path));
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        if let Some(profile) = profile {
            config.storage.profile = Some(profile.to_string());
        }

        let base_dir = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or(cwd);

        if let Some(path) = &config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            output,
            config_path,
            base_dir,
        })
    }

    /// Directory the cart slot lives in.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(&self.base_dir, Path::new(&self.config.storage.dir))
    }

    /// Open the cart saved in the storage directory.
    pub fn open_store(&self) -> Result<CartStore> {
        let dir = self.storage_dir();
        let cache = Cache::open(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        let key = self.config.storage.slot_key();
        self.output
            .debug(&format!("Cart slot '{}' in {}", key, dir.display()));

        let config = StoreConfig::default().with_storage_key(key);
        Ok(CartStore::open(cache, config))
    }

    /// Keys of every cart saved in the storage directory.
    pub fn saved_carts(&self) -> Result<Vec<String>> {
        let dir = self.storage_dir();
        let cache = Cache::open(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        cache
            .keys()
            .with_context(|| format!("Failed to list carts in {}", dir.display()))
    }

    /// Checkout settings with environment overrides applied.
    pub fn checkout_config(&self) -> Result<CheckoutConfig> {
        self.config.checkout_config()
    }

    /// Warn if the last change could not be saved.
    pub fn report_persist_warning(&self, store: &CartStore) {
        if let Some(warning) = store.persist_warning() {
            self.output.warn(&warning.to_string());
        }
    }
}

/// Find the first config file walking up from `start`.
///
/// A file that fails to parse is skipped with a warning.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    for dir in start.ancestors() {
        for name in &CONFIG_NAMES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            match CliConfig::load(&path) {
                Ok(config) => return Some((config, path)),
                Err(e) => tracing::warn!(path = %path.display(), error = %format!("{:#}", e), "skipping config file"),
            }
        }
    }
    None
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

//! # Configuration
//!
//! Settings are layered, highest priority first:
//!
//! 1. command-line flags
//! 2. `VAULT_DIFF_*` environment variables
//! 3. `.vault-diff.toml` in the repository root
//! 4. built-in defaults
//!
//! ```toml
//! vault_password_file = "secrets/prod.pass"   # relative to the repository root
//! vault_only = false
//! color = "auto"              # always | never | auto
//! vault_command = "ansible-vault"
//! colorizer = "colordiff"
//! ```
//!
//! The resolved [`RunConfig`] is built once at startup and passed by
//! reference; dropping it releases a prompted credential.

use crate::credential::Credential;
use crate::error::{Result, VaultDiffError};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".vault-diff.toml";
pub const ENV_PREFIX: &str = "VAULT_DIFF";

/// Password file looked up in the repository root when none is named.
pub const DEFAULT_PASSWORD_FILE: &str = ".vault-password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Always,
    Never,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub vault_password_file: Option<PathBuf>,
    #[serde(default)]
    pub vault_only: bool,
    #[serde(default)]
    pub color: Option<ColorMode>,
    #[serde(default = "default_vault_command")]
    pub vault_command: String,
    #[serde(default = "default_colorizer")]
    pub colorizer: String,
}

fn default_vault_command() -> String {
    "ansible-vault".into()
}

fn default_colorizer() -> String {
    "colordiff".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_password_file: None,
            vault_only: false,
            color: None,
            vault_command: default_vault_command(),
            colorizer: default_colorizer(),
        }
    }
}

impl Settings {
    /// Load settings from the repository's config file and the environment.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let config_path = repo_root.join(CONFIG_FILE);
        let path = config_path
            .to_str()
            .ok_or_else(|| VaultDiffError::Other("Invalid config path".into()))?;

        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// The configured password file, with relative paths taken from the
    /// repository root. Absolute paths are kept as written.
    pub fn password_file(&self, repo_root: &Path) -> Option<PathBuf> {
        self.vault_password_file
            .as_ref()
            .map(|path| repo_root.join(path))
    }
}

/// Where the color decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorChoice {
    pub enabled: bool,
    /// Requested by flag or settings rather than inherited from git
    pub explicit: bool,
}

/// Resolve whether color is wanted.
///
/// An explicit request (flag, then settings) wins; otherwise git's own
/// setting is used, with `auto` meaning "stdout is a terminal".
pub fn resolve_color(
    flag: Option<bool>,
    settings: Option<ColorMode>,
    git_default: Option<bool>,
    stdout_is_terminal: bool,
) -> ColorChoice {
    if let Some(enabled) = flag {
        return ColorChoice {
            enabled,
            explicit: true,
        };
    }

    match settings {
        Some(ColorMode::Always) => ColorChoice {
            enabled: true,
            explicit: true,
        },
        Some(ColorMode::Never) => ColorChoice {
            enabled: false,
            explicit: true,
        },
        Some(ColorMode::Auto) | None => ColorChoice {
            enabled: git_default.unwrap_or(stdout_is_terminal),
            explicit: false,
        },
    }
}

/// Options for one invocation, immutable once built.
#[derive(Debug)]
pub struct RunConfig {
    /// Revision arguments handed to `git diff`; empty compares the working
    /// tree with the index.
    pub revisions: Vec<String>,
    pub path_scope: Option<PathBuf>,
    pub credential: Credential,
    pub vault_only: bool,
    pub color: bool,
    pub verbose: bool,
}

/// Split a revision range such as `"HEAD~2 HEAD"` or `main..topic` into
/// separate git arguments.
pub fn split_revisions(range: Option<&str>) -> Vec<String> {
    range
        .map(|r| r.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

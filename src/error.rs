use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultDiffError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Required program not found in PATH: {0}")]
    MissingDependency(String),

    #[error("{program} {found} is too old, version {required} or newer is required")]
    UnsupportedVersion {
        program: String,
        found: String,
        required: String,
    },

    #[error("Vault password file not found: {}", .0.display())]
    CredentialNotFound(PathBuf),

    #[error("Vault password must not be empty")]
    EmptyCredential,

    #[error("Color output was requested but the colorizer '{0}' is not available")]
    ColorizerUnavailable(String),

    #[error("'{program}' failed ({}): {stderr}", code_label(.code))]
    Command {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{0}")]
    Other(String),
}

fn code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".into(),
    }
}

pub type Result<T> = std::result::Result<T, VaultDiffError>;

/// Per-file decryption failure. Never escalates to a fatal error.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecryptFailure {
    #[error("nothing to decrypt")]
    EmptyDocument,

    #[error("decryption failed ({}): {stderr}", code_label(.code))]
    Oracle { code: Option<i32>, stderr: String },

    #[error("could not run the decryption command: {0}")]
    Launch(String),
}

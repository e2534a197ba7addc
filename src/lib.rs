//! # vault-diff
//!
//! Readable `git diff` output for repositories that track Ansible Vault
//! encrypted files.
//!
//! Vault files change completely on every re-encryption, so their git diffs
//! are walls of hex. This crate rebuilds the old and new ciphertext of each
//! vault file from the diff text itself, decrypts both through
//! `ansible-vault`, and shows a unified diff of the plaintext under the
//! original git header. Other files are passed through unchanged.
//!
//! ## Usage
//!
//! ```bash
//! # Working tree against the index
//! git-vault-diff
//!
//! # Last commit, vault files only, password from a file
//! git-vault-diff -r HEAD~1..HEAD --vault-only --vault-password-file ~/.vault_pass
//!
//! # Limit to a subtree, force color (requires colordiff)
//! git-vault-diff -p group_vars/ --color
//! ```
//!
//! Without `--vault-password-file`, `.vault-password` in the repository root
//! is used when it exists; otherwise the password is prompted for and kept in
//! a private temporary file for the duration of the run.
//!
//! ## Module Overview
//!
//! - [`patch`] - Splitting a file's diff and rebuilding both sides
//! - [`vault`] - Vault detection and decryption through `ansible-vault`
//! - [`render`] - Plaintext unified diff and optional colorizer
//! - [`git`] - Repository discovery and `git diff` invocations
//! - [`pipeline`] - Per-file orchestration
//! - [`config`] - Settings file, environment and run options
//! - [`credential`] - Password file or prompted temporary password
//! - [`runner`] - External command abstraction
//! - [`error`] - Error types
//!
//! ## Exit Status
//!
//! `0` when the run completes, even if some vault files could not be
//! decrypted (each is reported as a warning). `1` when a precondition fails:
//! missing `git` or `ansible-vault`, not inside a repository, a named
//! password file that does not exist, or `--color` without a colorizer.

pub mod commands;
pub mod config;
pub mod credential;
pub mod error;
pub mod git;
pub mod patch;
pub mod pipeline;
pub mod render;
pub mod runner;
pub mod vault;

// Re-export commonly used types
pub use config::RunConfig;
pub use error::{DecryptFailure, Result, VaultDiffError};
pub use patch::{FilePatch, SyntheticDocument};
pub use pipeline::{Pipeline, Summary};
pub use vault::is_vault;

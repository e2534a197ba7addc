//! # Ansible Vault
//!
//! Detection of vault-encrypted documents and decryption through the
//! `ansible-vault` command.
//!
//! ## Detection
//!
//! A vault file starts with a header line such as
//!
//! ```text
//! $ANSIBLE_VAULT;1.1;AES256
//! $ANSIBLE_VAULT;1.2;AES256;prod
//! ```
//!
//! Only the first line is inspected. This is a structural check, not format
//! validation: a diff whose first hunk does not start at line 1 will not be
//! recognised as vault.
//!
//! ## Decryption
//!
//! Documents are piped to `ansible-vault decrypt --output -` together with a
//! password file. Failures are reported per document as [`DecryptFailure`]
//! and never abort a run.

use crate::error::{DecryptFailure, Result, VaultDiffError};
use crate::patch::SyntheticDocument;
use crate::runner::CommandRunner;
use std::path::Path;

/// Literal tag every vault header line starts with.
pub const VAULT_MARKER: &str = "$ANSIBLE_VAULT;";

/// Oldest `ansible-vault` able to decrypt stdin to stdout with a password file.
pub const MIN_VAULT_VERSION: (u32, u32) = (2, 4);

/// Check whether a document's first line carries the vault marker.
pub fn is_vault(document: &str) -> bool {
    document
        .lines()
        .next()
        .is_some_and(|line| line.starts_with(VAULT_MARKER))
}

impl SyntheticDocument {
    pub fn is_vault(&self) -> bool {
        self.first_line().is_some_and(is_vault)
    }
}

/// The external decryption command.
pub struct VaultCli<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
}

impl<'a> VaultCli<'a> {
    pub fn new(runner: &'a dyn CommandRunner, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Query the installed version and make sure it is recent enough.
    pub fn check_version(&self) -> Result<(u32, u32)> {
        let output = self
            .runner
            .run(&self.program, &["--version".to_string()], None)?
            .into_checked(&self.program)?;
        let text = output.stdout_lossy();

        let version = parse_version(&text).ok_or_else(|| {
            VaultDiffError::Other(format!(
                "Could not determine {} version from: {}",
                self.program,
                text.lines().next().unwrap_or_default()
            ))
        })?;

        if version < MIN_VAULT_VERSION {
            return Err(VaultDiffError::UnsupportedVersion {
                program: self.program.clone(),
                found: format!("{}.{}", version.0, version.1),
                required: format!("{}.{}", MIN_VAULT_VERSION.0, MIN_VAULT_VERSION.1),
            });
        }

        log::debug!("{} version {}.{}", self.program, version.0, version.1);
        Ok(version)
    }

    /// Decrypt one synthetic document with the given password file.
    ///
    /// Empty documents (the missing side of an added or deleted file) are
    /// rejected without invoking the command.
    pub fn decrypt(
        &self,
        document: &SyntheticDocument,
        credential: &Path,
    ) -> std::result::Result<String, DecryptFailure> {
        if document.is_empty() {
            return Err(DecryptFailure::EmptyDocument);
        }

        let args = vec![
            "decrypt".to_string(),
            "--vault-password-file".to_string(),
            credential.to_string_lossy().into_owned(),
            "--output".to_string(),
            "-".to_string(),
        ];
        let input = document.text();

        let output = self
            .runner
            .run(&self.program, &args, Some(input.as_bytes()))
            .map_err(|e| DecryptFailure::Launch(e.to_string()))?;

        if !output.is_success() {
            return Err(DecryptFailure::Oracle {
                code: output.code,
                stderr: output.stderr_lossy(),
            });
        }

        Ok(output.stdout_lossy())
    }
}

/// Extract `(major, minor)` from `ansible-vault --version` output.
///
/// Handles both `ansible-vault 2.9.27` and `ansible-vault [core 2.15.3]`.
fn parse_version(text: &str) -> Option<(u32, u32)> {
    let first = text.lines().next()?;
    let token = first
        .split_whitespace()
        .map(|t| t.trim_matches(|c| c == '[' || c == ']'))
        .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))?;

    let mut parts = token.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts
        .next()
        .map(|p| {
            p.chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);
    Some((major, minor))
}

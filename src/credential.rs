//! # Vault Password
//!
//! The vault command reads its password from a file. When no password file
//! is available the password is prompted for and written to a private
//! temporary file, which is removed when the [`Credential`] is dropped or the
//! process is interrupted.

use crate::error::{Result, VaultDiffError};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug)]
pub enum Credential {
    /// An existing password file, left untouched.
    File(PathBuf),
    /// A prompted password in a temporary file owned by this process.
    Prompted(NamedTempFile),
}

impl Credential {
    pub fn path(&self) -> &Path {
        match self {
            Credential::File(path) => path,
            Credential::Prompted(file) => file.path(),
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Credential::Prompted(_))
    }

    /// Pick the password source.
    ///
    /// An explicitly named file must exist. Otherwise `default` is used when
    /// present, and the password is prompted for as a last resort.
    pub fn resolve(
        explicit: Option<&Path>,
        default: &Path,
        prompt: impl FnOnce() -> Result<String>,
    ) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(VaultDiffError::CredentialNotFound(path.to_path_buf()));
            }
            return Ok(Credential::File(path.to_path_buf()));
        }

        if default.is_file() {
            log::debug!("using password file {}", default.display());
            return Ok(Credential::File(default.to_path_buf()));
        }

        Self::from_secret(&prompt()?)
    }

    /// Store a secret in a private temporary file.
    pub fn from_secret(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(VaultDiffError::EmptyCredential);
        }

        let mut file = tempfile::Builder::new()
            .prefix("vault-diff-")
            .suffix(".pass")
            .tempfile()?;
        file.write_all(secret.as_bytes())?;
        file.flush()?;

        Ok(Credential::Prompted(file))
    }

    /// Remove the temporary password file and exit when interrupted.
    ///
    /// Only one handler can be installed per process; a second call is
    /// ignored.
    pub fn remove_on_interrupt(&self) {
        if !self.is_temporary() {
            return;
        }
        let path = self.path().to_path_buf();
        if let Err(e) = ctrlc::set_handler(move || {
            let _ = fs::remove_file(&path);
            std::process::exit(130);
        }) {
            log::debug!("interrupt handler not installed: {e}");
        }
    }
}

/// Ask for the vault password.
///
/// Uses a masked terminal prompt when stdin is a terminal, otherwise reads
/// the first line of stdin so the password can be piped in.
pub fn prompt_password() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        Ok(rpassword::prompt_password("Vault password: ")?)
    } else {
        read_secret(&mut stdin.lock())
    }
}

/// Read a secret from any buffered reader, without its line terminator.
pub fn read_secret(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

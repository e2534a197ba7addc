//! # Diff Pipeline
//!
//! Walks the changed files in git's order and emits one block per file:
//!
//! ```text
//! changed file ─► default diff ─► reconstruct ─► vault? ─no─► raw diff (unless --vault-only)
//!                                                  │
//!                                                 yes
//!                                                  ▼
//!                 full-context diff ─► reconstruct ─► decrypt both sides
//!                                                  ─► header + plaintext diff
//! ```
//!
//! Decryption failures are per file: the header is still written, a warning
//! names the file and the run moves on.

use crate::config::RunConfig;
use crate::error::{DecryptFailure, Result};
use crate::git::{ChangedFile, DiffOptions, GitDiff};
use crate::patch::{leading_lines, FilePatch};
use crate::render::{render, Colorizer};
use crate::vault::VaultCli;
use std::io::Write;

/// What happened to each file during a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub rendered: usize,
    pub passed_through: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Pipeline<'a> {
    git: GitDiff<'a>,
    vault: VaultCli<'a>,
    colorizer: Option<Colorizer<'a>>,
}

enum Outcome {
    Rendered,
    PassedThrough,
    Skipped,
    Failed,
}

impl<'a> Pipeline<'a> {
    /// `colorizer` should only be given when color output is enabled.
    pub fn new(git: GitDiff<'a>, vault: VaultCli<'a>, colorizer: Option<Colorizer<'a>>) -> Self {
        Self {
            git,
            vault,
            colorizer,
        }
    }

    /// Process every changed file, writing diff blocks to `out` in order.
    pub fn run(&self, config: &RunConfig, out: &mut dyn Write) -> Result<Summary> {
        let files = self.git.changed_files()?;
        log::debug!("{} changed file(s)", files.len());

        let mut summary = Summary::default();
        for file in &files {
            match self.process(config, file, out)? {
                Outcome::Rendered => summary.rendered += 1,
                Outcome::PassedThrough => summary.passed_through += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }
        out.flush()?;

        let level = if config.verbose {
            log::Level::Info
        } else {
            log::Level::Debug
        };
        log::log!(
            level,
            "rendered {}, passed through {}, skipped {}, failed {}",
            summary.rendered,
            summary.passed_through,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    fn process(&self, config: &RunConfig, file: &ChangedFile, out: &mut dyn Write) -> Result<Outcome> {
        let path = file.path.display();
        let raw = self.git.file_diff(file, DiffOptions::default())?;
        let patch = FilePatch::parse(&raw);
        let (old, new) = patch.reconstruct();

        if !(old.is_vault() || new.is_vault()) {
            if config.vault_only {
                log::debug!("{path}: not a vault file, skipped");
                return Ok(Outcome::Skipped);
            }
            if config.color {
                let colored = self.git.file_diff(file, color_only(true))?;
                out.write_all(colored.as_bytes())?;
            } else {
                out.write_all(raw.as_bytes())?;
            }
            return Ok(Outcome::PassedThrough);
        }

        log::debug!("{path}: vault file");

        let header = if config.color {
            let colored = self.git.file_diff(file, color_only(true))?;
            leading_lines(&colored, patch.header_len())
        } else {
            patch.header_text()
        };
        out.write_all(header.as_bytes())?;

        let full = self.git.file_diff(
            file,
            DiffOptions {
                color: false,
                full_context: true,
            },
        )?;
        let (old, new) = FilePatch::parse(&full).reconstruct();
        let credential = config.credential.path();

        let (old_plain, new_plain) = match pair_sides(
            self.vault.decrypt(&old, credential),
            self.vault.decrypt(&new, credential),
        ) {
            Ok(pair) => pair,
            Err((side, e)) => {
                log::warn!("{path}: could not decrypt {side} version: {e}");
                return Ok(Outcome::Failed);
            }
        };
        if old.is_empty() {
            log::warn!("{path}: vault file added, showing its full content");
        } else if new.is_empty() {
            log::warn!("{path}: vault file deleted, showing its former content");
        }

        let body = render(&old_plain, &new_plain, self.colorizer.as_ref());
        if body.is_empty() {
            log::info!("{path}: re-encrypted without content changes");
        }
        out.write_all(body.as_bytes())?;
        Ok(Outcome::Rendered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Old,
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::Old => "old",
            Side::New => "new",
        })
    }
}

type Decrypted = std::result::Result<String, DecryptFailure>;

/// Combine both decrypted sides. An empty side stands for an added or
/// deleted file and diffs as empty text; any other failure is reported
/// against the side it happened on.
fn pair_sides(
    old: Decrypted,
    new: Decrypted,
) -> std::result::Result<(String, String), (Side, DecryptFailure)> {
    match (old, new) {
        (Ok(old), Ok(new)) => Ok((old, new)),
        (Err(DecryptFailure::EmptyDocument), Ok(new)) => Ok((String::new(), new)),
        (Ok(old), Err(DecryptFailure::EmptyDocument)) => Ok((old, String::new())),
        (Err(DecryptFailure::EmptyDocument), Err(e)) => Err((Side::New, e)),
        (Err(e), _) => Err((Side::Old, e)),
        (_, Err(e)) => Err((Side::New, e)),
    }
}

fn color_only(color: bool) -> DiffOptions {
    DiffOptions {
        color,
        full_context: false,
    }
}

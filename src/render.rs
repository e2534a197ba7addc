//! Plaintext diff rendering.
//!
//! Line diffing is done by [`similar`]. Only hunks are produced: the file
//! header for a vault file comes from git's own diff, so the synthetic
//! header lines a line-diff tool would print are never generated.

use crate::error::Result;
use crate::runner::CommandRunner;
use similar::TextDiff;

/// Lines of context around each change.
pub const CONTEXT_LINES: usize = 3;

/// External ANSI highlighter for unified diffs (`colordiff` by default).
pub struct Colorizer<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
}

impl<'a> Colorizer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn colorize(&self, text: &str) -> Result<String> {
        let output = self
            .runner
            .run(&self.program, &[], Some(text.as_bytes()))?
            .into_checked(&self.program)?;
        Ok(output.stdout_lossy())
    }
}

/// Unified diff hunks between two plaintexts, without file header lines.
pub fn unified_hunks(old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .to_string()
}

/// Render the plaintext diff, colorized when a colorizer is given.
///
/// A colorizer failure degrades to uncolored output.
pub fn render(old: &str, new: &str, colorizer: Option<&Colorizer<'_>>) -> String {
    let hunks = unified_hunks(old, new);
    if hunks.is_empty() {
        return hunks;
    }

    match colorizer {
        Some(colorizer) => match colorizer.colorize(&hunks) {
            Ok(colored) => colored,
            Err(e) => {
                log::warn!("{} failed, showing uncolored diff: {e}", colorizer.program());
                hunks
            }
        },
        None => hunks,
    }
}

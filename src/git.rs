use crate::error::{Result, VaultDiffError};
use crate::runner::CommandRunner;
use git2::Repository;
use std::path::{Path, PathBuf};

/// Context passed to git when a vault file's full text is needed.
pub const FULL_CONTEXT: u32 = 999_999_999;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open repository at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|_| VaultDiffError::NotInGitRepo)?;
        Ok(Self { repo })
    }

    /// Get repository root path
    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir().ok_or(VaultDiffError::Other(
            "Repository has no working directory".into(),
        ))
    }

    /// git's own color setting for diffs: `color.diff`, then `color.ui`.
    ///
    /// Returns `Some(true)`/`Some(false)` for explicit settings and `None`
    /// for `auto` or when nothing is configured.
    pub fn diff_color_default(&self) -> Result<Option<bool>> {
        let config = self.repo.config()?;
        for key in ["color.diff", "color.ui"] {
            if let Ok(value) = config.get_string(key) {
                return Ok(parse_color_value(&value));
            }
        }
        Ok(None)
    }
}

fn parse_color_value(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "always" | "true" | "yes" | "on" | "1" => Some(true),
        "never" | "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// A path that differs within the selected revision range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: PathBuf,
}

impl ChangedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// How a single file's diff should be produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    pub color: bool,
    pub full_context: bool,
}

/// `git diff` as the source of changed files and per-file diffs.
pub struct GitDiff<'a> {
    runner: &'a dyn CommandRunner,
    revisions: Vec<String>,
    scope: Option<PathBuf>,
}

impl<'a> GitDiff<'a> {
    pub fn new(runner: &'a dyn CommandRunner, revisions: &[String], scope: Option<&Path>) -> Self {
        Self {
            runner,
            revisions: revisions.to_vec(),
            scope: scope.map(Path::to_path_buf),
        }
    }

    /// Changed paths, in the order git lists them.
    pub fn changed_files(&self) -> Result<Vec<ChangedFile>> {
        let mut args = base_args();
        args.push("--color=never".into());
        args.push("--name-only".into());
        args.push("-z".into());
        args.extend(self.revisions.iter().cloned());
        if let Some(scope) = &self.scope {
            args.push("--".into());
            args.push(scope.to_string_lossy().into_owned());
        }

        let output = self.runner.run("git", &args, None)?.into_checked("git")?;
        let files = output
            .stdout
            .split(|b| *b == 0)
            .filter(|name| !name.is_empty())
            .map(|name| ChangedFile::new(String::from_utf8_lossy(name).into_owned()))
            .collect();
        Ok(files)
    }

    /// Raw unified diff of one file.
    pub fn file_diff(&self, file: &ChangedFile, options: DiffOptions) -> Result<String> {
        let mut args = base_args();
        args.push(if options.color {
            "--color=always".into()
        } else {
            "--color=never".into()
        });
        if options.full_context {
            args.push(format!("--unified={FULL_CONTEXT}"));
        }
        args.extend(self.revisions.iter().cloned());
        args.push("--".into());
        args.push(top_level_pathspec(&file.path));

        let output = self.runner.run("git", &args, None)?.into_checked("git")?;
        Ok(output.stdout_lossy())
    }
}

/// `git diff --name-only` prints paths relative to the repository root, so
/// per-file diffs must not be resolved against the current directory.
fn top_level_pathspec(path: &Path) -> String {
    format!(":(top,literal){}", path.to_string_lossy())
}

fn base_args() -> Vec<String> {
    ["diff", "--no-ext-diff", "--no-textconv", "--no-renames"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

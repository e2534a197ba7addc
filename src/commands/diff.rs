use crate::config::{resolve_color, split_revisions, RunConfig, Settings, DEFAULT_PASSWORD_FILE};
use crate::credential::{prompt_password, Credential};
use crate::error::{Result, VaultDiffError};
use crate::git::{GitDiff, GitRepo};
use crate::pipeline::{Pipeline, Summary};
use crate::render::Colorizer;
use crate::runner::SystemRunner;
use crate::vault::VaultCli;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// Options taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct DiffArgs {
    pub revision: Option<String>,
    pub path: Option<PathBuf>,
    pub vault_password_file: Option<PathBuf>,
    pub vault_only: bool,
    /// `Some(true)` for `--color`, `Some(false)` for `--no-color`
    pub color: Option<bool>,
    pub verbose: bool,
}

/// Show the diff, decrypting vault files
pub fn diff(args: DiffArgs) -> Result<Summary> {
    // Preconditions, checked before any file is looked at
    require("git")?;
    let repo = GitRepo::open(".")?;
    let root = repo.workdir()?.to_path_buf();

    let settings = Settings::load(&root)?;
    require(&settings.vault_command)?;

    let runner = SystemRunner;
    let vault = VaultCli::new(&runner, settings.vault_command.as_str());
    vault.check_version()?;

    let choice = resolve_color(
        args.color,
        settings.color,
        repo.diff_color_default()?,
        io::stdout().is_terminal(),
    );
    let color = if choice.enabled && which::which(&settings.colorizer).is_err() {
        if choice.explicit {
            return Err(VaultDiffError::ColorizerUnavailable(settings.colorizer));
        }
        log::warn!(
            "{} not found, showing uncolored output",
            settings.colorizer
        );
        false
    } else {
        choice.enabled
    };

    let explicit = args
        .vault_password_file
        .or_else(|| settings.password_file(&root));
    let credential = Credential::resolve(
        explicit.as_deref(),
        &root.join(DEFAULT_PASSWORD_FILE),
        prompt_password,
    )?;
    credential.remove_on_interrupt();

    let config = RunConfig {
        revisions: split_revisions(args.revision.as_deref()),
        path_scope: args.path,
        credential,
        vault_only: args.vault_only || settings.vault_only,
        color,
        verbose: args.verbose,
    };

    let git = GitDiff::new(&runner, &config.revisions, config.path_scope.as_deref());
    let colorizer = config
        .color
        .then(|| Colorizer::new(&runner, settings.colorizer.as_str()));
    let pipeline = Pipeline::new(git, vault, colorizer);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    pipeline.run(&config, &mut out)
}

fn require(program: &str) -> Result<()> {
    which::which(program)
        .map(|path| log::debug!("found {program} at {}", path.display()))
        .map_err(|_| VaultDiffError::MissingDependency(program.to_string()))
}

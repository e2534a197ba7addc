use clap::{ArgAction, Parser};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use vault_diff::commands::{self, DiffArgs};
use vault_diff::VaultDiffError;

#[derive(Parser)]
#[command(name = "git-vault-diff")]
#[command(version)]
#[command(about = "Show git diffs of Ansible Vault files as plaintext", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Revision range to compare (default: working tree against the index)
    #[arg(short = 'r', long = "revision", value_name = "RANGE")]
    revision: Option<String>,

    /// Limit the diff to this file or directory
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    path: Option<PathBuf>,

    /// File containing the vault password
    #[arg(long, value_name = "FILE")]
    vault_password_file: Option<PathBuf>,

    /// Only show vault files
    #[arg(long)]
    vault_only: bool,

    /// Always colorize output (fails if the colorizer is missing)
    #[arg(long, overrides_with = "no_color")]
    color: bool,

    /// Never colorize output
    #[arg(long, overrides_with = "color")]
    no_color: bool,

    /// Log what is being done to stderr
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Cli {
    fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl From<Cli> for DiffArgs {
    fn from(cli: Cli) -> Self {
        let color = cli.color_choice();
        DiffArgs {
            revision: cli.revision,
            path: cli.path,
            vault_password_file: cli.vault_password_file,
            vault_only: cli.vault_only,
            color,
            verbose: cli.verbose,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; --help and --version exit 0.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.verbose);

    let code = match commands::diff(cli.into()) {
        Ok(_) => 0,
        Err(VaultDiffError::Io(e)) if e.kind() == ErrorKind::BrokenPipe => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(code);
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,vault_diff=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let level = match record.level() {
                log::Level::Error => "error",
                log::Level::Warn => "warning",
                log::Level::Info => "info",
                log::Level::Debug => "debug",
                log::Level::Trace => "trace",
            };
            writeln!(buf, "{}: {}", level, record.args())
        })
        .init();
}

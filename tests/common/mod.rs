use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use tempfile::TempDir;

/// Header line every fake vault payload starts with.
pub const VAULT_HEADER: &str = "$ANSIBLE_VAULT;1.1;AES256";

/// Password the fake vault command accepts.
pub const PASSWORD: &str = "secret";

/// Stand-in for `ansible-vault`: checks the password file, fails on payloads
/// containing `CORRUPT`, and "decrypts" by dropping the header line.
/// `FAKE_VAULT_SLEEP` delays each decryption by that many seconds.
const FAKE_VAULT: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "ansible-vault [core ${FAKE_VAULT_VERSION:-2.15.0}]"
  exit 0
fi
if [ "$1" != "decrypt" ] || [ "$2" != "--vault-password-file" ]; then
  echo "unexpected arguments: $*" >&2
  exit 2
fi
if [ "$(cat "$3")" != "secret" ]; then
  echo "ERROR! Decryption failed (no vault secrets were found that could decrypt)" >&2
  exit 1
fi
if [ -n "$FAKE_VAULT_SLEEP" ]; then
  sleep "$FAKE_VAULT_SLEEP"
fi
input=$(cat)
case "$input" in
  *CORRUPT*)
    echo "ERROR! Decryption failed" >&2
    exit 1
    ;;
esac
printf '%s\n' "$input" | sed '1d'
"#;

/// Create a new temporary git repository with user config set.
#[allow(dead_code)]
pub fn create_git_repo() -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");

    git(temp.path(), &["init"]);
    git(temp.path(), &["config", "user.email", "test@example.com"]);
    git(temp.path(), &["config", "user.name", "Test User"]);

    temp
}

/// Run a git command in `dir`, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Stage everything and commit.
#[allow(dead_code)]
pub fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
}

/// Fake ciphertext for `plaintext` as understood by the fake vault command.
#[allow(dead_code)]
pub fn encrypt(plaintext: &str) -> String {
    format!("{VAULT_HEADER}\n{plaintext}")
}

/// Install the fake vault command into `dir` and return its path.
#[allow(dead_code)]
pub fn install_fake_vault(dir: &Path) -> PathBuf {
    let path = dir.join("ansible-vault");
    fs::write(&path, FAKE_VAULT).expect("failed to write fake vault");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to make fake vault executable");
    }

    path
}

/// Write the password file the tool picks up by default.
#[allow(dead_code)]
pub fn write_default_password(repo: &Path) {
    fs::write(repo.join(".vault-password"), PASSWORD).expect("failed to write password");
}

/// Absolute path to the git-vault-diff test binary.
#[allow(dead_code)]
pub fn vault_diff_bin() -> &'static str {
    env!("CARGO_BIN_EXE_git-vault-diff")
}

/// Convenience helper for spawning the binary via assert_cmd.
#[allow(dead_code)]
pub fn vault_diff_cmd() -> Command {
    cargo_bin_cmd!("git-vault-diff")
}

/// The binary pointed at a fake vault command, with colorizing disabled
/// unless a test opts in.
#[allow(dead_code)]
pub fn vault_diff_in(repo: &Path, fake_vault: &Path) -> Command {
    let mut cmd = vault_diff_cmd();
    cmd.current_dir(repo)
        .env("VAULT_DIFF_VAULT_COMMAND", fake_vault)
        .env("VAULT_DIFF_COLORIZER", "no-such-colorizer-for-tests")
        .env_remove("RUST_LOG");
    cmd
}

//! Shared helpers for the CLI surface specs.
//!
//! `cli()` builds an invocation of the tdb binary; `Project` gives it a
//! scratch debug-kit directory to run in, so specs never touch the real
//! working tree.

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Start building an invocation of the tdb binary.
pub fn cli() -> Spec {
    Spec { cmd: tdb_command() }
}

/// cargo exports `CARGO_BIN_EXE_<name>` only to tests of the package
/// that owns the binary, so tdb is resolved from this test binary's own
/// location under target/<profile>/deps/.
fn tdb_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push(format!("tdb{}", std::env::consts::EXE_SUFFIX));
    path
}

fn tdb_command() -> Command {
    Command::new(tdb_bin())
}

pub struct Spec {
    cmd: Command,
}

impl Spec {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Verdict {
        let output = self.cmd.output().unwrap();
        assert!(
            output.status.success(),
            "expected success, got {:?}\nstderr:\n{}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
        Verdict { output }
    }

    pub fn fails(mut self) -> Verdict {
        let output = self.cmd.output().unwrap();
        assert!(
            !output.status.success(),
            "expected failure, but the command succeeded\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        );
        Verdict { output }
    }
}

pub struct Verdict {
    output: std::process::Output,
}

impl Verdict {
    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(stdout.contains(needle), "stdout missing {needle:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(stderr.contains(needle), "stderr missing {needle:?}:\n{stderr}");
        self
    }
}

/// A scratch product tree with a debug-kit subdirectory the binary runs
/// from. Paths in `file`/`read` are relative to the tree root; the kit
/// lives at `kit/`.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("kit")).unwrap();
        Self { dir }
    }

    pub fn file(&self, path: &str, contents: &str) {
        let path = self.dir.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(path)).unwrap()
    }

    pub fn kit_dir(&self) -> PathBuf {
        self.dir.path().join("kit")
    }

    /// An invocation of tdb with the kit directory as its working
    /// directory.
    pub fn tdb(&self) -> Spec {
        let mut cmd = tdb_command();
        cmd.current_dir(self.kit_dir());
        Spec { cmd }
    }
}

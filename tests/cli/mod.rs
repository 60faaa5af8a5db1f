//! End-to-end tests of the `snapmig` binary that need no database server.
pub mod check;
pub mod errors;

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SCHEMA: &str = r#"
tables:
  - name: posts
    description: |
      id: id
      user_id* -> users(cascade): uint
      title*: string(200)
  - name: users
    description: |
      id: id
      email* U: string(128)
"#;

/// Temporary project directory; commands run inside it.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn with_file(self, name: &str, contents: &str) -> Self {
        fs::write(self.path().join(name), contents).expect("Failed to write project file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("snapmig").expect("snapmig binary");
        cmd.current_dir(self.path())
            .env_remove("DATABASE_URL")
            .env_remove("RUST_LOG");
        cmd
    }
}

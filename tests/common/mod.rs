#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TERRAFORM: &str = r#"#!/bin/sh
echo "terraform $* @ $(pwd -P)" >> "$FAKE_LOG"
case "$1 $2" in
  "workspace list")
    echo "* default"
    for ws in $FAKE_WORKSPACES; do echo "  $ws"; done
    ;;
  "workspace select")
    for ws in $FAKE_WORKSPACES; do [ "$ws" = "$3" ] && exit 0; done
    echo "Workspace \"$3\" doesn't exist." >&2
    exit 1
    ;;
esac
if [ "$1" = "apply" ] && [ -n "$FAKE_FAIL_APPLY" ]; then
  echo "Error: apply failed" >&2
  exit 1
fi
exit 0
"#;

const KUBECTL: &str = r#"#!/bin/sh
echo "kubectl $*" >> "$FAKE_LOG"
if [ "$1" = "get" ]; then
  for ns in $FAKE_NAMESPACES; do [ "$ns" = "$3" ] && exit 0; done
  echo "Error from server (NotFound): namespaces \"$3\" not found" >&2
  exit 1
fi
exit 0
"#;

const DOCKER: &str = r#"#!/bin/sh
echo "docker $*" >> "$FAKE_LOG"
exit 0
"#;

const GIT: &str = r#"#!/bin/sh
echo "git $*" >> "$FAKE_LOG"
echo "3f2a9c1"
"#;

/// A project root with the sample layout and fake tools on `PATH`.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        for (name, script) in [
            ("terraform", TERRAFORM),
            ("kubectl", KUBECTL),
            ("docker", DOCKER),
            ("git", GIT),
        ] {
            let path = bin.join(name);
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let project = dir.path().join("project");
        fs::create_dir_all(project.join("demo-app/infrastructure/local")).unwrap();
        fs::write(project.join("demo-app/Dockerfile"), "FROM scratch\n").unwrap();
        fs::write(dir.path().join("calls.log"), "").unwrap();
        Self { dir }
    }

    pub fn project(&self) -> PathBuf {
        self.dir.path().join("project")
    }

    pub fn infrastructure(&self) -> PathBuf {
        self.project().join("demo-app/infrastructure/local")
    }

    pub fn bin(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    /// The binary, wired to the fake tools and a private state directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("stagehand").unwrap();
        cmd.env_clear()
            .env("PATH", self.bin())
            .env("NO_COLOR", "1")
            .env("FAKE_LOG", self.dir.path().join("calls.log"))
            .env("STAGEHAND_ROOT", self.project())
            .env("STAGEHAND_STATE_DIR", self.dir.path().join("state"))
            .current_dir(self.dir.path());
        cmd
    }

    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

//! Fake collaborators that record every call.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use deckhand_core::{AppDir, ExecError, RevisionId};
use deckhand_deploy::{ContainerEngine, Vcs};
use deckhand_secrets::{Decryptor, SecretsError};
use tempfile::TempDir;

pub fn failure(what: &str) -> ExecError {
    ExecError::Spawn {
        program: what.to_string(),
        cwd: PathBuf::from("/"),
        source: std::io::Error::other(format!("{what} failed")),
    }
}

// ---------------------------------------------------------------------------
// Vcs
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeVcs {
    pub before: String,
    pub after: String,
    pub updated: Cell<bool>,
    pub fail_fetch: bool,
    pub fail_reset: bool,
    pub submodules: bool,
    pub calls: RefCell<Vec<String>>,
    /// Changed paths keyed by app dir name; missing means "no changes".
    pub changes: HashMap<String, Vec<String>>,
    /// App dir names whose diff fails.
    pub failing_diffs: HashSet<String>,
}

impl FakeVcs {
    pub fn moving(before: &str, after: &str) -> Self {
        Self {
            before: before.to_string(),
            after: after.to_string(),
            ..Self::default()
        }
    }

    pub fn with_change(mut self, app: &str, paths: &[&str]) -> Self {
        self.changes.insert(
            app.to_string(),
            paths.iter().map(|p| p.to_string()).collect(),
        );
        self
    }
}

impl Vcs for FakeVcs {
    fn current_revision(&self) -> Result<RevisionId, ExecError> {
        self.calls.borrow_mut().push("rev-parse".to_string());
        let rev = if self.updated.get() { &self.after } else { &self.before };
        Ok(RevisionId::from(rev.as_str()))
    }

    fn fetch(&self) -> Result<(), ExecError> {
        self.calls.borrow_mut().push("fetch".to_string());
        if self.fail_fetch {
            return Err(failure("git fetch"));
        }
        Ok(())
    }

    fn reset_hard(&self) -> Result<(), ExecError> {
        self.calls.borrow_mut().push("reset".to_string());
        if self.fail_reset {
            return Err(failure("git reset"));
        }
        self.updated.set(true);
        Ok(())
    }

    fn changed_paths(
        &self,
        from: &RevisionId,
        to: &RevisionId,
        scope: &Path,
    ) -> Result<Vec<String>, ExecError> {
        let name = scope
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls
            .borrow_mut()
            .push(format!("diff {from} {to} {name}"));
        if self.failing_diffs.contains(&name) {
            return Err(failure("git diff"));
        }
        Ok(self.changes.get(&name).cloned().unwrap_or_default())
    }

    fn has_submodules(&self) -> bool {
        self.submodules
    }

    fn update_submodules(&self) -> Result<(), ExecError> {
        self.calls.borrow_mut().push("submodules".to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ContainerEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Up { app: String, build: bool },
    Restart { app: String },
    Ps { app: String },
    Prune,
}

#[derive(Default)]
pub struct FakeEngine {
    pub calls: RefCell<Vec<EngineCall>>,
    /// Apps with running containers.
    pub running: HashSet<String>,
    pub failing_ps: HashSet<String>,
    pub failing_actions: HashSet<String>,
    pub fail_prune: bool,
}

impl FakeEngine {
    pub fn calls_for(&self, app: &str) -> Vec<EngineCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| match c {
                EngineCall::Up { app: a, .. } | EngineCall::Restart { app: a } | EngineCall::Ps { app: a } => a == app,
                EngineCall::Prune => false,
            })
            .cloned()
            .collect()
    }

    pub fn prune_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, EngineCall::Prune))
            .count()
    }

    fn action(&self, app: &AppDir, call: EngineCall) -> Result<(), ExecError> {
        self.calls.borrow_mut().push(call);
        if self.failing_actions.contains(&app.name()) {
            return Err(failure("docker compose"));
        }
        Ok(())
    }
}

impl ContainerEngine for FakeEngine {
    fn up(&self, app: &AppDir, build: bool) -> Result<(), ExecError> {
        self.action(app, EngineCall::Up { app: app.name(), build })
    }

    fn restart(&self, app: &AppDir) -> Result<(), ExecError> {
        self.action(app, EngineCall::Restart { app: app.name() })
    }

    fn running_containers(&self, app: &AppDir) -> Result<Vec<String>, ExecError> {
        self.calls.borrow_mut().push(EngineCall::Ps { app: app.name() });
        if self.failing_ps.contains(&app.name()) {
            return Err(failure("docker compose ps"));
        }
        if self.running.contains(&app.name()) {
            Ok(vec!["c0ffee".to_string()])
        } else {
            Ok(Vec::new())
        }
    }

    fn prune(&self, _fleet_root: &Path) -> Result<(), ExecError> {
        self.calls.borrow_mut().push(EngineCall::Prune);
        if self.fail_prune {
            return Err(failure("docker system prune"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decryptor
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeDecryptor {
    pub calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    pub fail: bool,
}

impl Decryptor for FakeDecryptor {
    fn decrypt(&self, encrypted: &Path, output: &Path) -> Result<(), SecretsError> {
        self.calls
            .borrow_mut()
            .push((encrypted.to_path_buf(), output.to_path_buf()));
        if self.fail {
            return Err(SecretsError::Exec(failure("sops")));
        }
        std::fs::write(output, "SECRET=plain\n").expect("write decrypted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fleet fixture
// ---------------------------------------------------------------------------

pub struct Fleet {
    pub root: TempDir,
}

impl Fleet {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("fleet root"),
        }
    }

    /// Create `<root>/<name>/compose.yaml` plus any extra files.
    pub fn app(&self, name: &str, files: &[&str]) -> AppDir {
        let dir = self.root.path().join(name);
        std::fs::create_dir_all(&dir).expect("mkdir app");
        std::fs::write(dir.join("compose.yaml"), "services: {}\n").expect("compose");
        for f in files {
            std::fs::write(dir.join(f), "x").expect("extra file");
        }
        AppDir::new(dir)
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

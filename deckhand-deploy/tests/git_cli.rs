use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use deckhand_core::{classify, AppDir, BuildVerdict, RevisionId, SystemRunner};
use deckhand_deploy::{secrets, GitCli, SecretAction, Vcs};
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=deckhand",
            "-c",
            "user.email=deckhand@example.invalid",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

#[test]
fn non_ascii_app_paths_are_reported_verbatim() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = TempDir::new().unwrap();
    let app_dir = repo.path().join("café");
    fs::create_dir_all(&app_dir).unwrap();
    fs::write(app_dir.join("compose.yaml"), "services: {}\n").unwrap();
    git(repo.path(), &["init", "-q"]);
    git(repo.path(), &["add", "."]);
    git(repo.path(), &["commit", "-q", "-m", "initial"]);

    let vcs = GitCli::new(repo.path(), "origin", "main", Arc::new(SystemRunner));
    let before = vcs.current_revision().unwrap();

    fs::write(app_dir.join("Dockerfile"), "FROM scratch\n").unwrap();
    fs::write(app_dir.join(".env.enc"), "TOKEN=ENC[...]\n").unwrap();
    git(repo.path(), &["add", "."]);
    git(repo.path(), &["commit", "-q", "-m", "secrets and image"]);
    let after = vcs.current_revision().unwrap();
    assert_ne!(before, after);

    let app = AppDir::new(&app_dir);
    let changed = vcs.changed_paths(&before, &after, app.path()).unwrap();

    assert_eq!(changed, vec!["café/.env.enc", "café/Dockerfile"]);
    assert_eq!(classify(&changed), BuildVerdict::BuildRequired);
    assert_eq!(secrets::decide(&app, &changed), SecretAction::Decrypt);
}

#[test]
fn unknown_revision_is_an_error() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let repo = TempDir::new().unwrap();
    git(repo.path(), &["init", "-q"]);
    let vcs = GitCli::new(repo.path(), "origin", "main", Arc::new(SystemRunner));
    let missing = RevisionId::from("0000000000000000000000000000000000000000");
    assert!(vcs.changed_paths(&missing, &missing, repo.path()).is_err());
}

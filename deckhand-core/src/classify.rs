//! Change classification.
//!
//! [`classify`] maps the repository-relative paths changed under one
//! application directory to a [`BuildVerdict`]. A path is build-relevant when
//! its final segment, compared case-insensitively, is one of
//! [`BUILD_RELEVANT_NAMES`]. Matching never looks at earlier segments, so
//! `Dockerfile-notes/README.md` stays runtime-only.
//!
//! Empty input is the caller's concern (it skips the application); the
//! classifier itself returns `RuntimeOnly` for it.

use crate::types::BuildVerdict;

/// Final path segments that invalidate a built image or the compose topology.
pub const BUILD_RELEVANT_NAMES: &[&str] = &[
    "dockerfile",
    "requirements",
    "requirements.txt",
    "compose.yml",
    "compose.yaml",
];

/// Classify a changed-file set. Pure and deterministic.
pub fn classify<S: AsRef<str>>(changed_paths: &[S]) -> BuildVerdict {
    if changed_paths.iter().any(|p| is_build_relevant(p.as_ref())) {
        BuildVerdict::BuildRequired
    } else {
        BuildVerdict::RuntimeOnly
    }
}

/// `true` when a single path's final segment is build-relevant.
pub fn is_build_relevant(path: &str) -> bool {
    let segment = final_segment(path);
    BUILD_RELEVANT_NAMES
        .iter()
        .any(|name| segment.eq_ignore_ascii_case(name))
}

fn final_segment(path: &str) -> &str {
    let trimmed = path.trim().trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("appX/Dockerfile")]
    #[case("Dockerfile")]
    #[case("appX/docker/DOCKERFILE")]
    #[case("appX/requirements")]
    #[case("appX/requirements.txt")]
    #[case("appX/Requirements.TXT")]
    #[case("appX/compose.yml")]
    #[case("appX/compose.yaml")]
    #[case("compose.YAML")]
    fn build_relevant_names(#[case] path: &str) {
        assert_eq!(classify(&[path]), BuildVerdict::BuildRequired);
    }

    #[rstest]
    #[case("appX/README.md")]
    #[case("appX/.env.enc")]
    #[case("appX/Dockerfile.prod")]
    #[case("appX/docker-compose.yml")]
    #[case("appX/requirements-dev.txt")]
    #[case("appX/Dockerfile-notes/README.md")]
    #[case("appX/compose.yaml.bak")]
    fn runtime_only_names(#[case] path: &str) {
        assert_eq!(classify(&[path]), BuildVerdict::RuntimeOnly);
    }

    #[test]
    fn any_build_relevant_path_wins() {
        let changed = ["appX/config/app.toml", "appX/README.md", "appX/Dockerfile"];
        assert_eq!(classify(&changed), BuildVerdict::BuildRequired);
    }

    #[test]
    fn empty_set_is_runtime_only_and_repeatable() {
        let empty: [&str; 0] = [];
        assert_eq!(classify(&empty), BuildVerdict::RuntimeOnly);
        assert_eq!(classify(&empty), BuildVerdict::RuntimeOnly);
    }

    #[test]
    fn accepts_owned_strings() {
        let changed = vec!["svc/compose.yaml".to_string()];
        assert_eq!(classify(&changed), BuildVerdict::BuildRequired);
    }
}

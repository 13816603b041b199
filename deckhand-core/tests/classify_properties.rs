use deckhand_core::{classify, BuildVerdict};
use rstest::rstest;

#[rstest]
#[case(&["web/Dockerfile"], BuildVerdict::BuildRequired)]
#[case(&["web/src/app.py", "web/requirements.txt"], BuildVerdict::BuildRequired)]
#[case(&["web/COMPOSE.YAML"], BuildVerdict::BuildRequired)]
#[case(&["web/config/settings.ini"], BuildVerdict::RuntimeOnly)]
#[case(&["web/Dockerfile.prod"], BuildVerdict::RuntimeOnly)]
#[case(&["web/Dockerfile-notes/README.md"], BuildVerdict::RuntimeOnly)]
fn verdict_follows_final_segment(#[case] paths: &[&str], #[case] expected: BuildVerdict) {
    assert_eq!(classify(paths), expected);
}

#[test]
fn any_build_relevant_path_wins_regardless_of_order() {
    let mut paths = vec![
        "gitea/app.ini".to_string(),
        "gitea/templates/home.tmpl".to_string(),
        "gitea/compose.yml".to_string(),
    ];
    assert_eq!(classify(&paths), BuildVerdict::BuildRequired);
    paths.reverse();
    assert_eq!(classify(&paths), BuildVerdict::BuildRequired);
}

#[test]
fn duplicates_do_not_change_the_verdict() {
    let once = ["n8n/.env.enc"];
    let twice = ["n8n/.env.enc", "n8n/.env.enc"];
    assert_eq!(classify(&once), classify(&twice));
    assert_eq!(classify(&twice), BuildVerdict::RuntimeOnly);
}

#[test]
fn empty_set_is_runtime_only() {
    let none: [&str; 0] = [];
    assert!(!classify(&none).build_required());
}

mod common;

use common::{EngineCall, FakeEngine, Fleet};
use deckhand_core::{BuildVerdict, ReconcileAction};
use deckhand_deploy::{DeployError, Reconciler};
use rstest::rstest;

#[rstest]
#[case(BuildVerdict::BuildRequired, false, ReconcileAction::Rebuild)]
#[case(BuildVerdict::BuildRequired, true, ReconcileAction::Rebuild)]
#[case(BuildVerdict::RuntimeOnly, true, ReconcileAction::Restart)]
#[case(BuildVerdict::RuntimeOnly, false, ReconcileAction::Create)]
fn action_table(
    #[case] verdict: BuildVerdict,
    #[case] running: bool,
    #[case] expected: ReconcileAction,
) {
    let fleet = Fleet::new();
    let app = fleet.app("web", &[]);
    let mut engine = FakeEngine::default();
    if running {
        engine.running.insert("web".to_string());
    }

    let action = Reconciler::new(&engine).reconcile(&app, verdict).unwrap();
    assert_eq!(action, expected);
}

#[test]
fn build_required_rebuilds_without_querying() {
    let fleet = Fleet::new();
    let app = fleet.app("web", &[]);
    let mut engine = FakeEngine::default();
    engine.running.insert("web".to_string());

    let action = Reconciler::new(&engine)
        .reconcile(&app, BuildVerdict::BuildRequired)
        .unwrap();

    assert_eq!(action, ReconcileAction::Rebuild);
    assert_eq!(
        engine.calls_for("web"),
        vec![EngineCall::Up {
            app: "web".to_string(),
            build: true
        }]
    );
}

#[test]
fn runtime_only_and_stopped_creates() {
    let fleet = Fleet::new();
    let app = fleet.app("web", &[]);
    let engine = FakeEngine::default();

    let action = Reconciler::new(&engine)
        .reconcile(&app, BuildVerdict::RuntimeOnly)
        .unwrap();

    assert_eq!(action, ReconcileAction::Create);
    assert_eq!(
        engine.calls_for("web").last(),
        Some(&EngineCall::Up {
            app: "web".to_string(),
            build: false
        })
    );
}

#[test]
fn failed_query_falls_back_to_create() {
    let fleet = Fleet::new();
    let app = fleet.app("web", &[]);
    let mut engine = FakeEngine::default();
    engine.running.insert("web".to_string());
    engine.failing_ps.insert("web".to_string());

    let action = Reconciler::new(&engine)
        .reconcile(&app, BuildVerdict::RuntimeOnly)
        .unwrap();
    assert_eq!(action, ReconcileAction::Create);
}

#[test]
fn action_failure_is_reported() {
    let fleet = Fleet::new();
    let app = fleet.app("web", &[]);
    let mut engine = FakeEngine::default();
    engine.running.insert("web".to_string());
    engine.failing_actions.insert("web".to_string());

    let err = Reconciler::new(&engine)
        .reconcile(&app, BuildVerdict::RuntimeOnly)
        .unwrap_err();
    assert!(matches!(
        err,
        DeployError::Engine {
            operation: "restart",
            ..
        }
    ));
}

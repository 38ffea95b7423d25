//! Supervised session tests: report ordering and control handling

use std::sync::Arc;

use steward::LifecycleController;
use steward::control::{AcceptedCommands, ControlRequest, StatusState};
use steward::descriptor::ServiceDescriptor;
use steward::dispatch::DispatchOutcome;
use steward::errors::{LifecyclePhase, StewardError};
use steward::host::RunContext;
use steward_tests::{FakeManager, RecordingClient, ScriptedHost};

fn supervised(client: &Arc<RecordingClient>, host: &Arc<ScriptedHost>) -> LifecycleController {
    LifecycleController::new(
        ServiceDescriptor::new("web"),
        client.clone(),
        Arc::new(FakeManager::new()),
        host.clone(),
    )
    .with_context(RunContext::supervised())
}

// ============================================================================
// Report ordering
// ============================================================================

/// A full session walks start-pending, running, stop-pending, stopped, in
/// that order, with one report each.
#[tokio::test]
async fn test_session_reports_in_lifecycle_order() {
    let client = Arc::new(RecordingClient::new());
    let host = Arc::new(ScriptedHost::stop_after_start());

    supervised(&client, &host).run().await.unwrap();

    assert_eq!(
        host.states(),
        vec![
            StatusState::StartPending,
            StatusState::Running,
            StatusState::StopPending,
            StatusState::Stopped,
        ]
    );
    assert_eq!(host.outcome(), Some(DispatchOutcome::Stopped));
    assert_eq!(host.seen(), ["web"]);
    assert_eq!(client.calls(), ["start", "stop"]);

    let reports = host.reports();
    assert!(reports[0].accepts.is_empty());
    assert!(reports[1].accepts.contains(AcceptedCommands::STOP));
    assert!(reports[1].accepts.contains(AcceptedCommands::SHUTDOWN));
    assert!(reports[2].accepts.is_empty());
}

/// Interrogate re-emits the current report verbatim and leaves the
/// session running.
#[tokio::test]
async fn test_interrogate_echoes_the_current_report() {
    let client = Arc::new(RecordingClient::new());
    let host = Arc::new(ScriptedHost::new(vec![
        ControlRequest::Interrogate,
        ControlRequest::Interrogate,
        ControlRequest::Stop,
    ]));

    supervised(&client, &host).run().await.unwrap();

    let reports = host.reports();
    assert_eq!(
        host.states(),
        vec![
            StatusState::StartPending,
            StatusState::Running,
            StatusState::Running,
            StatusState::Running,
            StatusState::StopPending,
            StatusState::Stopped,
        ]
    );
    assert_eq!(reports[2], reports[1]);
    assert_eq!(reports[3], reports[1]);
}

/// Requests the library does not handle are skipped without disturbing
/// the session.
#[tokio::test]
async fn test_unknown_requests_are_skipped() {
    let client = Arc::new(RecordingClient::new());
    let host = Arc::new(ScriptedHost::new(vec![
        ControlRequest::Other(200),
        ControlRequest::Other(7),
        ControlRequest::Stop,
    ]));

    supervised(&client, &host).run().await.unwrap();

    assert_eq!(
        host.states(),
        vec![
            StatusState::StartPending,
            StatusState::Running,
            StatusState::StopPending,
            StatusState::Stopped,
        ]
    );
    assert_eq!(client.calls(), ["start", "stop"]);
}

/// A request channel that closes with no stop request still winds the
/// application down, with no stop-pending report.
#[tokio::test]
async fn test_channel_teardown_stops_without_stop_pending() {
    let client = Arc::new(RecordingClient::new());
    let host = Arc::new(ScriptedHost::new(Vec::new()));

    supervised(&client, &host).run().await.unwrap();

    assert_eq!(
        host.states(),
        vec![
            StatusState::StartPending,
            StatusState::Running,
            StatusState::Stopped,
        ]
    );
    assert_eq!(client.calls(), ["start", "stop"]);
}

// ============================================================================
// Failure paths
// ============================================================================

/// A failing start never reports running and never enters the request
/// loop.
#[tokio::test]
async fn test_start_failure_never_reports_running() {
    let client = Arc::new(RecordingClient::new());
    client.fail_next_start("port already bound");
    let host = Arc::new(ScriptedHost::new(Vec::new()));

    let err = supervised(&client, &host).run().await.unwrap_err();

    match err {
        StewardError::Client { phase, fault } => {
            assert_eq!(phase, LifecyclePhase::Start);
            assert_eq!(fault.to_string(), "port already bound");
        }
        other => panic!("expected a start-phase client error, got {other:?}"),
    }
    assert_eq!(
        host.states(),
        vec![StatusState::StartPending, StatusState::Stopped]
    );
    assert_eq!(host.outcome(), Some(DispatchOutcome::StartFailed));
    assert_eq!(client.calls(), ["start"]);
}

/// A failing stop still reports stop-pending exactly once.
#[tokio::test]
async fn test_stop_failure_reports_single_stop_pending() {
    let client = Arc::new(RecordingClient::new());
    client.fail_next_stop("flush failed");
    let host = Arc::new(ScriptedHost::stop_after_start());

    let err = supervised(&client, &host).run().await.unwrap_err();

    match err {
        StewardError::Client { phase, .. } => assert_eq!(phase, LifecyclePhase::Stop),
        other => panic!("expected a stop-phase client error, got {other:?}"),
    }
    assert_eq!(
        host.states(),
        vec![
            StatusState::StartPending,
            StatusState::Running,
            StatusState::StopPending,
            StatusState::Stopped,
        ]
    );
    assert_eq!(host.outcome(), Some(DispatchOutcome::StopFailed));
}

// ============================================================================
// Shutdown dispatch
// ============================================================================

/// Shutdown goes to the shutdown handler when the client has one.
#[tokio::test]
async fn test_shutdown_request_uses_the_shutdown_handler() {
    let client = Arc::new(RecordingClient::with_shutdowner());
    let host = Arc::new(ScriptedHost::new(vec![ControlRequest::Shutdown]));

    supervised(&client, &host).run().await.unwrap();

    assert_eq!(client.calls(), ["start", "shutdown"]);
    assert_eq!(host.outcome(), Some(DispatchOutcome::Stopped));
}

/// Without a shutdown handler, shutdown falls back to the stop callback.
#[tokio::test]
async fn test_shutdown_without_handler_falls_back_to_stop() {
    let client = Arc::new(RecordingClient::new());
    let host = Arc::new(ScriptedHost::new(vec![ControlRequest::Shutdown]));

    supervised(&client, &host).run().await.unwrap();

    assert_eq!(client.calls(), ["start", "stop"]);
}

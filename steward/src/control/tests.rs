use super::*;

#[tokio::test]
async fn test_control_channel_roundtrip() {
    let (mut host, mut service) = control_channel();

    // Host delivers a request
    host.requests.send(ControlRequest::Interrogate).await.unwrap();
    let received = service.requests.recv().await.unwrap();
    assert_eq!(received, ControlRequest::Interrogate);

    // Service emits a report
    service.status.send(StatusReport::start_pending()).unwrap();
    let report = host.status.recv().await.unwrap();
    assert_eq!(report.state, StatusState::StartPending);
    assert!(report.accepts.is_empty());
}

#[test]
fn test_request_as_str() {
    assert_eq!(ControlRequest::Interrogate.as_str(), "interrogate");
    assert_eq!(ControlRequest::Stop.as_str(), "stop");
    assert_eq!(ControlRequest::Shutdown.as_str(), "shutdown");
    assert_eq!(ControlRequest::Other(130).as_str(), "other");
}

#[test]
fn test_accepted_commands_bits() {
    let both = AcceptedCommands::STOP | AcceptedCommands::SHUTDOWN;
    assert!(both.contains(AcceptedCommands::STOP));
    assert!(both.contains(AcceptedCommands::SHUTDOWN));
    assert!(!AcceptedCommands::STOP.contains(AcceptedCommands::SHUTDOWN));
    assert_eq!(both.bits(), 0b11);
}

#[test]
fn test_accepted_commands_default_is_empty() {
    let none = AcceptedCommands::default();
    assert!(none.is_empty());
    assert_eq!(none, AcceptedCommands::NONE);
    assert!(!none.contains(AcceptedCommands::STOP));
}

#[test]
fn test_status_report_constructors() {
    assert_eq!(StatusReport::start_pending().state, StatusState::StartPending);
    assert!(StatusReport::start_pending().accepts.is_empty());

    let running = StatusReport::running(AcceptedCommands::STOP | AcceptedCommands::SHUTDOWN);
    assert_eq!(running.state, StatusState::Running);
    assert!(running.accepts.contains(AcceptedCommands::STOP));

    assert_eq!(StatusReport::stop_pending().state, StatusState::StopPending);
    assert!(StatusReport::stop_pending().accepts.is_empty());

    assert_eq!(StatusReport::stopped().state, StatusState::Stopped);
}

#[test]
fn test_status_state_display() {
    assert_eq!(format!("{}", StatusState::StartPending), "start-pending");
    assert_eq!(format!("{}", StatusState::Stopped), "stopped");
}

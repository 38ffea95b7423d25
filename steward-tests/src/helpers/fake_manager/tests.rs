use super::*;

#[tokio::test]
async fn test_open_unknown_service_reports_not_installed() {
    let manager = FakeManager::new();
    let connection = manager.connect(ManagerAccess::Minimal).await.unwrap();

    let err = connection.open_service("ghost").await.unwrap_err();
    assert!(matches!(err, StewardError::NotInstalled(name) if name == "ghost"));
}

#[tokio::test]
async fn test_seeded_service_reports_its_state() {
    let manager = FakeManager::new();
    manager.seed_running("web");

    let connection = manager.connect(ManagerAccess::Minimal).await.unwrap();
    let service = connection.open_service("web").await.unwrap();

    assert_eq!(service.name(), "web");
    assert_eq!(service.query_status().await.unwrap(), RawServiceState::Running);
    assert_eq!(manager.status_polls("web"), 1);
    assert_eq!(manager.opens("web"), 1);
}

/// The scripted poll count flips the state on exactly that poll, not
/// before.
#[tokio::test]
async fn test_stop_after_polls_flips_on_the_exact_poll() {
    let manager = FakeManager::new();
    manager.seed_running("web");
    manager.set_stop_behavior("web", StopBehavior::AfterPolls(3));

    let connection = manager.connect(ManagerAccess::Full).await.unwrap();
    let service = connection.open_service("web").await.unwrap();

    let at_delivery = service.send_control(ControlSignal::Stop).await.unwrap();
    assert_eq!(at_delivery, RawServiceState::StopPending);

    assert_eq!(service.query_status().await.unwrap(), RawServiceState::StopPending);
    assert_eq!(service.query_status().await.unwrap(), RawServiceState::StopPending);
    assert_eq!(service.query_status().await.unwrap(), RawServiceState::Stopped);
    assert_eq!(manager.state_of("web"), Some(RawServiceState::Stopped));
}

#[tokio::test]
async fn test_stop_never_stays_pending() {
    let manager = FakeManager::new();
    manager.seed_running("web");
    manager.set_stop_behavior("web", StopBehavior::Never);

    let connection = manager.connect(ManagerAccess::Full).await.unwrap();
    let service = connection.open_service("web").await.unwrap();
    service.send_control(ControlSignal::Stop).await.unwrap();

    for _ in 0..10 {
        assert_eq!(service.query_status().await.unwrap(), RawServiceState::StopPending);
    }
}

#[tokio::test]
async fn test_immediate_stop_reports_stopped_at_delivery() {
    let manager = FakeManager::new();
    manager.seed_running("web");

    let connection = manager.connect(ManagerAccess::Full).await.unwrap();
    let service = connection.open_service("web").await.unwrap();

    let at_delivery = service.send_control(ControlSignal::Stop).await.unwrap();
    assert_eq!(at_delivery, RawServiceState::Stopped);
    assert_eq!(manager.status_polls("web"), 0);
}

/// Deletion with deferred removal keeps the registration visible for the
/// scripted number of probes.
#[tokio::test]
async fn test_deferred_removal_counts_probes() {
    let manager = FakeManager::new();
    manager.seed_running("web");
    manager.set_removal_behavior("web", RemovalBehavior::AfterProbes(2));

    let connection = manager.connect(ManagerAccess::Full).await.unwrap();
    let service = connection.open_service("web").await.unwrap();
    service.delete().await.unwrap();

    assert!(connection.open_service("web").await.is_ok());
    assert!(connection.open_service("web").await.is_ok());
    let err = connection.open_service("web").await.unwrap_err();
    assert!(matches!(err, StewardError::NotInstalled(_)));
    assert!(!manager.is_installed("web"));
}

#[tokio::test]
async fn test_never_removed_stays_visible() {
    let manager = FakeManager::new();
    manager.seed_running("web");
    manager.set_removal_behavior("web", RemovalBehavior::Never);

    let connection = manager.connect(ManagerAccess::Full).await.unwrap();
    let service = connection.open_service("web").await.unwrap();
    service.delete().await.unwrap();

    for _ in 0..5 {
        assert!(connection.open_service("web").await.is_ok());
    }
    assert!(manager.is_installed("web"));
}

#[tokio::test]
async fn test_connect_denied() {
    let manager = FakeManager::new();
    manager.deny_connections("access denied");

    let err = manager.connect(ManagerAccess::Full).await.unwrap_err();
    assert!(matches!(err, StewardError::Connection(message) if message == "access denied"));
}

#[tokio::test]
async fn test_create_registers_stopped() {
    let manager = FakeManager::new();
    let connection = manager.connect(ManagerAccess::Full).await.unwrap();

    let descriptor = ServiceDescriptor::new("web");
    connection.create_service(&descriptor).await.unwrap();
    assert!(manager.is_installed("web"));
    assert_eq!(manager.state_of("web"), Some(RawServiceState::Stopped));

    let err = connection.create_service(&descriptor).await.unwrap_err();
    assert!(matches!(err, StewardError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_failed_queries_surface() {
    let manager = FakeManager::new();
    manager.seed_running("web");
    manager.fail_queries("web", "rpc dropped");

    let connection = manager.connect(ManagerAccess::Minimal).await.unwrap();
    let service = connection.open_service("web").await.unwrap();

    let err = service.query_status().await.unwrap_err();
    assert!(matches!(err, StewardError::Connection(message) if message == "rpc dropped"));
}

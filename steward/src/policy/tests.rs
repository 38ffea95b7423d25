use super::*;
use std::sync::Mutex;

/// Serialize tests that touch STEWARD_KILL_TIMEOUT.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_default_when_env_unset() {
    let _guard = ENV_LOCK.lock().unwrap();
    // SAFETY: guard held; no other thread reads the variable concurrently
    unsafe { std::env::remove_var(KILL_TIMEOUT_ENV) };

    assert_eq!(HostPolicy.kill_timeout(), DEFAULT_KILL_TIMEOUT);
}

#[test]
fn test_env_override_parsed_with_duration_grammar() {
    let _guard = ENV_LOCK.lock().unwrap();
    // SAFETY: guard held; no other thread reads the variable concurrently
    unsafe { std::env::set_var(KILL_TIMEOUT_ENV, "1500ms") };

    assert_eq!(HostPolicy.kill_timeout(), Duration::from_millis(1500));

    // SAFETY: guard still held
    unsafe { std::env::remove_var(KILL_TIMEOUT_ENV) };
}

#[test]
fn test_unparsable_env_falls_back_to_default() {
    let _guard = ENV_LOCK.lock().unwrap();
    // SAFETY: guard held; no other thread reads the variable concurrently
    unsafe { std::env::set_var(KILL_TIMEOUT_ENV, "soon") };

    assert_eq!(HostPolicy.kill_timeout(), DEFAULT_KILL_TIMEOUT);

    // SAFETY: guard still held
    unsafe { std::env::remove_var(KILL_TIMEOUT_ENV) };
}

#[test]
fn test_env_resolved_on_every_call() {
    let _guard = ENV_LOCK.lock().unwrap();
    // SAFETY: guard held; no other thread reads the variable concurrently
    unsafe { std::env::set_var(KILL_TIMEOUT_ENV, "5s") };
    assert_eq!(HostPolicy.kill_timeout(), Duration::from_secs(5));

    // SAFETY: guard still held
    unsafe { std::env::set_var(KILL_TIMEOUT_ENV, "7s") };
    assert_eq!(HostPolicy.kill_timeout(), Duration::from_secs(7));

    // SAFETY: guard still held
    unsafe { std::env::remove_var(KILL_TIMEOUT_ENV) };
}

#[test]
fn test_fixed_policy_returns_its_budget() {
    let policy = FixedPolicy(Duration::from_millis(250));
    assert_eq!(policy.kill_timeout(), Duration::from_millis(250));
}

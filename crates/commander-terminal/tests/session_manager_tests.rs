use std::time::{Duration, Instant};

use commander_gate::CommandGate;
use commander_terminal::TerminalManager;
use commander_types::BLOCKED_SESSION_ID;

fn manager() -> TerminalManager {
    TerminalManager::new(CommandGate::new())
}

#[tokio::test]
async fn test_execute_captures_output() {
    let manager = manager();
    let result = manager.execute("echo hello", Some(300)).await.unwrap();

    assert!(!result.blocked);
    assert!(result.id >= 1);
    assert!(result.output.contains("hello"), "output: {:?}", result.output);
}

#[tokio::test]
async fn test_execute_captures_stderr_too() {
    let manager = manager();
    let result = manager
        .execute("echo oops 1>&2", Some(300))
        .await
        .unwrap();
    assert!(result.output.contains("oops"), "output: {:?}", result.output);
}

#[tokio::test]
async fn test_blocked_command_creates_no_session() {
    let manager = manager();
    let result = manager.execute("sudo rm -rf /", Some(100)).await.unwrap();

    assert!(result.blocked);
    assert_eq!(result.id, BLOCKED_SESSION_ID);
    assert!(result.output.contains("not allowed"));
    assert!(manager.list_sessions().is_empty());
}

#[tokio::test]
async fn test_gate_additions_apply_to_execute() {
    let manager = manager();
    manager.gate().block("forbidden-marker").unwrap();

    let result = manager
        .execute("echo forbidden-marker", Some(100))
        .await
        .unwrap();
    assert!(result.blocked);
    assert_eq!(result.id, BLOCKED_SESSION_ID);
}

#[tokio::test]
async fn test_session_ids_strictly_increase() {
    let manager = manager();
    let first = manager.execute("echo a", Some(50)).await.unwrap();
    let second = manager.execute("echo b", Some(50)).await.unwrap();
    let third = manager.execute("echo c", Some(50)).await.unwrap();

    assert!(first.id < second.id);
    assert!(second.id < third.id);
}

#[tokio::test]
async fn test_execute_returns_at_the_deadline() {
    let manager = manager();
    let started = Instant::now();
    let result = manager.execute("sleep 5", Some(100)).await.unwrap();
    let elapsed = started.elapsed();

    assert!(!result.blocked);
    assert!(
        elapsed < Duration::from_secs(2),
        "execute took {:?}, should be bounded by the timeout",
        elapsed
    );

    // The process is still running and listed.
    let sessions = manager.list_sessions();
    assert!(sessions.iter().any(|s| s.id == result.id && !s.blocked));

    manager.force_terminate(result.id).await.unwrap();
}

#[tokio::test]
async fn test_read_output_unknown_id_is_a_diagnostic() {
    let manager = manager();
    let text = manager.read_output(9999);
    assert!(text.contains("No session found"));
    assert!(text.contains("9999"));
}

#[tokio::test]
async fn test_archived_output_is_stable_and_complete() {
    let manager = manager();
    let result = manager.execute("echo finished", Some(300)).await.unwrap();

    // echo exits well within the deadline; give the monitor task a moment
    // to drain and archive.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let first = manager.read_output(result.id);
    let second = manager.read_output(result.id);
    assert_eq!(first, second, "archived output must not change");
    assert!(first.contains("finished"));
    // The archived record is a superset of what the deadline read saw.
    assert!(first.starts_with(&result.output) || result.output.is_empty());

    // Archived sessions are no longer listed.
    assert!(manager.list_sessions().iter().all(|s| s.id != result.id));
}

#[tokio::test]
async fn test_force_terminate_archives_the_session() {
    let manager = manager();
    let result = manager.execute("sleep 5", Some(50)).await.unwrap();

    assert!(manager.force_terminate(result.id).await.unwrap());

    // Already archived: a second request reports false.
    assert!(!manager.force_terminate(result.id).await.unwrap());

    // Reading the archived (possibly empty) output is not an error.
    let output = manager.read_output(result.id);
    assert!(!output.contains("No session found"));
    assert!(manager.list_sessions().iter().all(|s| s.id != result.id));
}

#[tokio::test]
async fn test_force_terminate_unknown_id_returns_false() {
    let manager = manager();
    assert!(!manager.force_terminate(12345).await.unwrap());
}

#[tokio::test]
async fn test_force_terminate_after_exit_returns_false() {
    let manager = manager();
    let result = manager.execute("echo done", Some(200)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(!manager.force_terminate(result.id).await.unwrap());
}

#[tokio::test]
async fn test_live_read_grows_and_archive_preserves_prefix() {
    let manager = manager();
    let result = manager
        .execute("echo first; sleep 1; echo second", Some(200))
        .await
        .unwrap();
    assert!(result.output.contains("first"));
    assert!(!result.output.contains("second"));

    let live = manager.read_output(result.id);
    assert!(live.starts_with(&result.output));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let archived = manager.read_output(result.id);
    assert!(archived.contains("first"));
    assert!(archived.contains("second"));
    assert!(archived.starts_with(&live));
}

#[tokio::test]
async fn test_session_log_written_when_log_dir_set() {
    let dir = tempfile::TempDir::new().unwrap();
    let manager =
        TerminalManager::new(CommandGate::new()).with_log_dir(dir.path().to_path_buf());

    let result = manager.execute("echo logged", Some(200)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let log_path = dir.path().join(format!("session-{}.jsonl", result.id));
    let contents = std::fs::read_to_string(log_path).unwrap();
    assert!(contents.contains("\"event\":\"spawn\""));
    assert!(contents.contains("\"event\":\"exit\""));
}

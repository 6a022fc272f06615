use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

use commander_gate::CommandGate;
use commander_types::{
    ActiveSessionInfo, CommanderError, ExecuteResult, SessionId, DEFAULT_EXEC_TIMEOUT_MS,
};

use super::logger::{SessionLogger, SharedSessionLogger};
use super::session::{ActiveSession, OutputBuffer, SessionState};
use super::store::SessionStore;

/// Orchestrates the session lifecycle: gate check, spawn, incremental
/// capture, deadline-bound initial response, background archival.
///
/// One instance is constructed at startup and threaded through the callers;
/// there is no ambient global. All event handlers (capture, exit, terminate)
/// go through the store mutex, which is never held across an await.
#[derive(Debug)]
pub struct TerminalManager {
    store: Arc<Mutex<SessionStore>>,
    gate: CommandGate,
    log_dir: Option<PathBuf>,
}

impl TerminalManager {
    pub fn new(gate: CommandGate) -> Self {
        Self {
            store: Arc::new(Mutex::new(SessionStore::new())),
            gate,
            log_dir: None,
        }
    }

    /// Enable per-session JSONL event logs under `log_dir`.
    pub fn with_log_dir(mut self, log_dir: PathBuf) -> Self {
        self.log_dir = Some(log_dir);
        self
    }

    pub fn gate(&self) -> &CommandGate {
        &self.gate
    }

    /// Start a command and return after at most `timeout_ms` (default
    /// 1000ms) with whatever output has accumulated; the process keeps
    /// running. A gate rejection returns the synthetic blocked result and
    /// creates no session. Only a spawn failure is an error.
    pub async fn execute(&self, command: &str, timeout_ms: Option<u64>) -> Result<ExecuteResult> {
        if self.gate.is_blocked(command) {
            return Ok(ExecuteResult::blocked(command));
        }

        let timeout = Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_EXEC_TIMEOUT_MS));
        let id = self.lock_store().allocate_id();

        let mut child = shell_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommanderError::Spawn {
                command: command.to_string(),
                source,
            })?;
        let pid = child.id();

        let buffer = OutputBuffer::new();
        let logger = SessionLogger::open(id, self.log_dir.as_deref());
        if let Some(ref logger) = logger {
            lock_logger(logger).log_spawn(command, pid);
        }

        // Both streams feed ONE shared buffer; interleaving is capture-time
        // arrival order.
        let stdout_task = spawn_capture(child.stdout.take(), buffer.clone(), logger.clone(), "stdout");
        let stderr_task = spawn_capture(child.stderr.take(), buffer.clone(), logger.clone(), "stderr");

        self.lock_store().insert_active(ActiveSession {
            id,
            pid,
            command: command.to_string(),
            buffer: buffer.clone(),
            start_time: Utc::now(),
            logger: logger.clone(),
        });

        // Exit path: wait for the process, drain both capture tasks so the
        // archived record holds the complete output, then archive. A no-op
        // if force_terminate archived this id first.
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let exit_code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    eprintln!("{} wait failed for session {}: {}", "error:".red(), id, e);
                    None
                }
            };
            let _ = stdout_task.await;
            let _ = stderr_task.await;

            store
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .archive(id, exit_code);
            if let Some(ref logger) = logger {
                lock_logger(logger).log_exit(exit_code);
            }
        });

        // Deadline: always sleep the full timeout, then read the buffer cell
        // directly. The id may already be archived; a store lookup here
        // would lose output captured around the exit.
        tokio::time::sleep(timeout).await;
        Ok(ExecuteResult {
            id,
            output: buffer.snapshot(),
            blocked: false,
        })
    }

    /// Accumulated output for an active session (live, may grow on later
    /// reads) or the final output of an archived one. An unknown id is a
    /// valid query outcome, reported as text.
    pub fn read_output(&self, id: SessionId) -> String {
        let store = self.lock_store();
        match store.get(id) {
            Some(SessionState::Active(active)) => active.buffer.snapshot(),
            Some(SessionState::Archived(archived)) => archived.buffer.snapshot(),
            None => format!("No session found for ID {}", id),
        }
    }

    /// Request termination of an active session: SIGTERM on POSIX, a
    /// forceful tree-kill on Windows, then archive immediately with no exit
    /// code (termination is requested, not confirmed). Returns false when
    /// the id is not active; only an OS-level signal denial is an error.
    pub async fn force_terminate(&self, id: SessionId) -> Result<bool> {
        let (pid, logger) = {
            let store = self.lock_store();
            match store.get(id) {
                Some(SessionState::Active(active)) => (active.pid, active.logger.clone()),
                _ => return Ok(false),
            }
        };

        if let Some(pid) = pid {
            signal_terminate(pid).await?;
        }

        self.lock_store().archive(id, None);
        if let Some(ref logger) = logger {
            lock_logger(logger).log_kill();
        }
        Ok(true)
    }

    /// Active sessions only, sorted by id, runtimes floored to whole
    /// seconds at call time.
    pub fn list_sessions(&self) -> Vec<ActiveSessionInfo> {
        let now = Utc::now();
        let store = self.lock_store();
        let mut infos: Vec<ActiveSessionInfo> = store
            .active_sessions()
            .map(|session| ActiveSessionInfo {
                id: session.id,
                blocked: false,
                runtime_secs: now
                    .signed_duration_since(session.start_time)
                    .num_seconds()
                    .max(0) as u64,
            })
            .collect();
        infos.sort_by_key(|info| info.id);
        infos
    }

    fn lock_store(&self) -> MutexGuard<'_, SessionStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Run the command string through the platform interpreter so shell
/// operators keep working.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("/bin/sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Drain one pipe into the shared buffer until EOF. Chunks are appended in
/// arrival order; decoding is lossy so partial UTF-8 never stalls capture.
fn spawn_capture<R>(
    reader: Option<R>,
    buffer: OutputBuffer,
    logger: Option<SharedSessionLogger>,
    stream: &'static str,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut reader) = reader else {
            return;
        };
        let mut chunk = [0u8; 4096];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let text = String::from_utf8_lossy(&chunk[..n]).into_owned();
                    buffer.append(&text);
                    if let Some(ref logger) = logger {
                        lock_logger(logger).log_output(stream, &text);
                    }
                }
            }
        }
    })
}

fn lock_logger(logger: &SharedSessionLogger) -> std::sync::MutexGuard<'_, SessionLogger> {
    logger.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(unix)]
async fn signal_terminate(pid: u32) -> Result<()> {
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc == 0 {
        return Ok(());
    }
    let err = std::io::Error::last_os_error();
    // The process beat us to the exit; the caller still gets `true`.
    if err.raw_os_error() == Some(libc::ESRCH) {
        return Ok(());
    }
    Err(CommanderError::Signal {
        pid,
        reason: err.to_string(),
    }
    .into())
}

#[cfg(windows)]
async fn signal_terminate(pid: u32) -> Result<()> {
    let status = Command::new("taskkill")
        .args(["/F", "/T", "/PID", &pid.to_string()])
        .status()
        .await
        .map_err(|e| CommanderError::Signal {
            pid,
            reason: e.to_string(),
        })?;
    if status.success() {
        Ok(())
    } else {
        // taskkill exits 128 when the pid no longer exists.
        match status.code() {
            Some(128) => Ok(()),
            _ => Err(CommanderError::Signal {
                pid,
                reason: format!("taskkill exited with {:?}", status.code()),
            }
            .into()),
        }
    }
}

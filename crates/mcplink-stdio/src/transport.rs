//! Child-process transport implementation.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use mcplink_transport::{
    StdioServerConfig, Transport, TransportError, TransportKind, TransportResult,
};
use mcplink_wire::{JsonRpcNotification, JsonRpcRequest, RequestId, SequentialId};

/// MCP protocol version literal sent in the stdio handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Grace period after spawn before the child is considered up.
const STARTUP_GRACE: Duration = Duration::from_millis(200);

/// A running child with its pipe handles.
#[derive(Debug)]
struct Process {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    stderr_task: JoinHandle<()>,
    ids: SequentialId,
}

/// JSON-RPC over a spawned subprocess's stdin/stdout.
///
/// Construction only validates the configuration; the child is spawned
/// on the first request. The whole write-then-correlate exchange runs
/// under one lock, so a shared `Arc` sees one in-flight request at a
/// time.
#[derive(Debug)]
pub struct SubprocessTransport {
    config: StdioServerConfig,
    process: Mutex<Option<Process>>,
}

impl SubprocessTransport {
    /// Validate `config` and build the transport without spawning.
    pub fn new(config: StdioServerConfig) -> TransportResult<Self> {
        if config.command.is_empty() || config.command[0].trim().is_empty() {
            return Err(TransportError::Configuration(
                "command must name an executable".to_string(),
            ));
        }
        Ok(Self {
            config,
            process: Mutex::new(None),
        })
    }

    /// Spawn the child, wait out the startup grace period, and handshake.
    async fn start(&self) -> TransportResult<Process> {
        let program = &self.config.command[0];
        let mut command = Command::new(program);
        command
            .args(&self.config.command[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(cwd) = &self.config.cwd {
            command.current_dir(cwd);
        }

        // The child gets exactly the configured environment, except
        // PATH, which always comes from the host so resolvable
        // binaries are found.
        command.env_clear();
        command.envs(&self.config.env);
        if let Ok(path) = std::env::var("PATH") {
            command.env("PATH", path);
        }

        debug!(command = ?self.config.command, "spawning MCP server process");
        let mut child = command
            .spawn()
            .map_err(|e| TransportError::StartupFailure(format!("failed to spawn {program}: {e}")))?;

        tokio::time::sleep(STARTUP_GRACE).await;

        if let Ok(Some(status)) = child.try_wait() {
            return Err(Self::capture_startup_failure(program, status, child).await);
        }

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::StartupFailure("child stdin not piped".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::StartupFailure("child stdout not piped".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TransportError::StartupFailure("child stderr not piped".to_string()))?;

        // Drain stderr in the background so the child never blocks on a
        // full pipe; diagnostics land in the logs.
        let stderr_program = program.clone();
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(program = %stderr_program, line, "server stderr");
            }
        });

        Self::handshake(&mut stdin).await?;

        Ok(Process {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            stderr_task,
            ids: SequentialId::new(),
        })
    }

    /// Two newline-terminated lines: `initialize`, then the id-less
    /// `initialized` notification. No response is awaited; the reply to
    /// id `"init"` is skipped by the correlation loop later.
    async fn handshake(stdin: &mut ChildStdin) -> TransportResult<()> {
        let initialize = JsonRpcRequest::new(
            "initialize",
            Some(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
            })),
            RequestId::from("init"),
        );
        let initialized = JsonRpcNotification::new("initialized", None);

        stdin
            .write_all(initialize.to_line()?.as_bytes())
            .await
            .map_err(|e| TransportError::transport("initialize", e))?;
        stdin
            .write_all(initialized.to_line()?.as_bytes())
            .await
            .map_err(|e| TransportError::transport("initialized", e))?;
        stdin
            .flush()
            .await
            .map_err(|e| TransportError::transport("initialize", e))?;
        Ok(())
    }

    /// The child died during the grace period. Reap it and collect its
    /// exit code, stderr, and stdout for the error message.
    async fn capture_startup_failure(
        program: &str,
        status: std::process::ExitStatus,
        mut child: Child,
    ) -> TransportError {
        let mut stderr_text = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_string(&mut stderr_text).await;
        }
        let mut stdout_text = String::new();
        if let Some(mut stdout) = child.stdout.take() {
            let _ = stdout.read_to_string(&mut stdout_text).await;
        }

        TransportError::StartupFailure(format!(
            "{program} exited during startup ({status}); stderr: {}; stdout: {}",
            stderr_text.trim(),
            stdout_text.trim(),
        ))
    }

    /// Read stdout lines until one parses as JSON with a matching id,
    /// or the deadline passes. Unparsable lines and foreign ids are
    /// skipped, not errors.
    async fn correlate(
        &self,
        process: &mut Process,
        action: &str,
        id: &RequestId,
    ) -> TransportResult<Value> {
        let deadline = Instant::now() + self.config.timeout_duration();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.timeout_error(id));
            }

            let line = match tokio::time::timeout(remaining, process.stdout.next_line()).await {
                Err(_) => return Err(self.timeout_error(id)),
                Ok(Err(e)) => return Err(TransportError::transport(action, e)),
                Ok(Ok(None)) => {
                    return Err(TransportError::transport(
                        action,
                        "server closed stdout before responding",
                    ));
                }
                Ok(Ok(Some(line))) => line,
            };

            let Ok(message) = serde_json::from_str::<Value>(&line) else {
                warn!(line, "skipping non-JSON output line");
                continue;
            };
            let Some(message_id) = message.get("id") else {
                debug!("skipping id-less server message");
                continue;
            };
            if !id.matches(message_id) {
                debug!(%message_id, expected = %id, "skipping response for another request");
                continue;
            }

            mcplink_wire::check_error(&message)?;
            return Ok(message
                .get("result")
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())));
        }
    }

    fn timeout_error(&self, id: &RequestId) -> TransportError {
        TransportError::Timeout {
            secs: self.config.timeout,
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl Transport for SubprocessTransport {
    async fn request(&self, action: &str, params: Option<Value>) -> TransportResult<Value> {
        let mut guard = self.process.lock().await;
        if guard.is_none() {
            *guard = Some(self.start().await?);
        }
        let process = guard
            .as_mut()
            .ok_or_else(|| TransportError::StartupFailure("process not running".to_string()))?;

        let id = process.ids.next_id();
        let request = JsonRpcRequest::new(action, params, id.clone());
        debug!(action, id = %id, "sending subprocess request");

        process
            .stdin
            .write_all(request.to_line()?.as_bytes())
            .await
            .map_err(|e| TransportError::transport(action, e))?;
        process
            .stdin
            .flush()
            .await
            .map_err(|e| TransportError::transport(action, e))?;

        self.correlate(process, action, &id).await
    }

    async fn close(&self) -> TransportResult<()> {
        let mut guard = self.process.lock().await;
        if let Some(mut process) = guard.take() {
            debug!(command = ?self.config.command, "stopping MCP server process");
            let _ = process.stdin.shutdown().await;
            let _ = process.child.start_kill();
            let _ = process.child.wait().await;
            process.stderr_task.abort();
        }
        Ok(())
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Stdio
    }
}

//! Stdio transport for the retrieval service.
//!
//! The client spawns the server process and exchanges newline-delimited
//! JSON-RPC messages over its stdin/stdout. The child is killed when the
//! transport is dropped.

use super::types::JsonRpcMessage;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

pub struct StdioTransport {
    stdin: tokio::process::ChildStdin,
    stdout: BufReader<tokio::process::ChildStdout>,
    child: Child,
}

impl StdioTransport {
    /// Spawns the server process with piped stdio.
    pub fn spawn(command: &str, args: &[String]) -> Result<Self> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to spawn retrieval server '{command}'"))?;

        let stdin = child.stdin.take().context("Failed to get stdin handle")?;
        let stdout = child.stdout.take().context("Failed to get stdout handle")?;

        Ok(Self {
            stdin,
            stdout: BufReader::new(stdout),
            child,
        })
    }

    /// Sends one message as a single line.
    pub async fn send(&mut self, message: &JsonRpcMessage) -> Result<()> {
        let json = serde_json::to_string(message).context("Failed to serialize message")?;
        debug!(frame = %json, "transport send");

        self.stdin
            .write_all(json.as_bytes())
            .await
            .context("Failed to write to server stdin")?;
        self.stdin
            .write_all(b"\n")
            .await
            .context("Failed to write frame delimiter")?;
        self.stdin
            .flush()
            .await
            .context("Failed to flush server stdin")?;

        Ok(())
    }

    /// Receives the next message, or fails on EOF (server exited).
    pub async fn receive(&mut self) -> Result<JsonRpcMessage> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .await
            .context("Failed to read from server stdout")?;

        if read == 0 {
            anyhow::bail!("retrieval server closed the connection");
        }

        let line = line.trim_end();
        debug!(frame = %line, "transport receive");

        serde_json::from_str(line).context("Failed to parse message from server")
    }

    /// Whether the server process is still running.
    pub fn is_alive(&mut self) -> bool {
        self.child.try_wait().map(|s| s.is_none()).unwrap_or(false)
    }
}

impl Drop for StdioTransport {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}

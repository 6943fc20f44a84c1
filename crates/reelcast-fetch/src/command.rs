//! Builder for executing an external tool with cancellation and timeout.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Default command timeout: 1 hour.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// How long output forwarding may lag behind a process that has exited.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// A builder for constructing and executing external tool invocations.
///
/// Output is not captured; each stdout/stderr line is forwarded to
/// `tracing::debug!` as it arrives. The process is killed (with its whole
/// process group on unix) when the cancellation token fires, when the
/// timeout elapses, or when the future driving [`ToolCommand::run`] is
/// dropped.
///
/// # Example
///
/// ```no_run
/// use reelcast_fetch::ToolCommand;
/// use std::path::PathBuf;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> reelcast_fetch::Result<()> {
/// let status = ToolCommand::new(PathBuf::from("yt-dlp"))
///     .arg("--version")
///     .run(&CancellationToken::new())
///     .await?;
/// assert!(status.success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// Arguments collected so far.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run the command to completion and return its exit status.
    ///
    /// A non-zero exit is returned as `Ok(status)`; only failures to start,
    /// wait on, or finish the process are errors.
    ///
    /// # Errors
    ///
    /// - [`Error::Spawn`] if the process cannot be started.
    /// - [`Error::Wait`] if waiting on the process fails.
    /// - [`Error::Cancelled`] if `cancel` fires first; the process is killed.
    /// - [`Error::TimedOut`] if the timeout elapses first; the process is killed.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<ExitStatus> {
        let tool = self.tool_name();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|source| Error::Spawn {
            tool: tool.clone(),
            source,
        })?;

        let readers: Vec<_> = [
            child
                .stdout
                .take()
                .map(|out| tokio::spawn(forward_lines(tool.clone(), "stdout", out))),
            child
                .stderr
                .take()
                .map(|err| tokio::spawn(forward_lines(tool.clone(), "stderr", err))),
        ]
        .into_iter()
        .flatten()
        .collect();

        enum Interrupt {
            Cancelled,
            TimedOut,
        }

        let waited = tokio::select! {
            status = child.wait() => Ok(status),
            _ = cancel.cancelled() => Err(Interrupt::Cancelled),
            _ = tokio::time::sleep(self.timeout) => Err(Interrupt::TimedOut),
        };

        match waited {
            Ok(status) => {
                drain_output(readers, cancel, &tool).await;
                status.map_err(|source| Error::Wait { tool, source })
            }
            Err(interrupt) => {
                terminate(&mut child, &tool).await;
                // Orphaned grandchildren may still hold the pipes open.
                for reader in readers {
                    reader.abort();
                }
                match interrupt {
                    Interrupt::Cancelled => {
                        tracing::info!("{} cancelled, process killed", tool);
                        Err(Error::Cancelled { tool })
                    }
                    Interrupt::TimedOut => {
                        tracing::warn!("{} timed out after {:?}, process killed", tool, self.timeout);
                        Err(Error::TimedOut {
                            tool,
                            timeout: self.timeout,
                        })
                    }
                }
            }
        }
    }
}

/// Kill the child (and its process group) and reap it.
async fn terminate(child: &mut Child, tool: &str) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            tracing::debug!("killpg for {} failed: {}", tool, e);
        }
    }

    if let Err(e) = child.kill().await {
        tracing::debug!("Failed to kill {}: {}", tool, e);
    }
}

/// Let the output forwarders finish, bounded by a grace period and `cancel`.
///
/// A detached grandchild can keep the pipes open after the child exits; its
/// remaining output is dropped.
async fn drain_output(readers: Vec<JoinHandle<()>>, cancel: &CancellationToken, tool: &str) {
    let handles: Vec<_> = readers.iter().map(|reader| reader.abort_handle()).collect();
    let joined = async {
        for reader in readers {
            let _ = reader.await;
        }
    };

    tokio::select! {
        _ = joined => {}
        _ = cancel.cancelled() => {}
        _ = tokio::time::sleep(OUTPUT_DRAIN_GRACE) => {
            tracing::debug!("{} exited but its output is still open, detaching", tool);
        }
    }

    for handle in handles {
        handle.abort();
    }
}

async fn forward_lines<R: AsyncRead + Unpin>(tool: String, stream: &'static str, reader: R) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if !line.is_empty() {
            tracing::debug!(tool = %tool, stream, "{}", line);
        }
    }
}

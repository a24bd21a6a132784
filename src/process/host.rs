//! ProcessHost trait and the tokio-backed production implementation.
//!
//! The production host spawns the agent with piped stdio, streams the prompt
//! into its stdin, and drains stdout and stderr concurrently - each chunk is
//! forwarded live to the parent's own stdout/stderr and appended to one
//! combined buffer. Interleaving between the two streams is not guaranteed;
//! only that all bytes from both end up in the buffer.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::Mutex;

/// One agent process to run: program, arguments, working directory, and the
/// bytes to stream into its stdin (None closes stdin without writing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: PathBuf,
    pub stdin: Option<Vec<u8>>,
}

/// What came back from one agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutput {
    /// All bytes from stdout and stderr, lossily decoded.
    pub combined: String,
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
}

/// Abstraction over spawning one agent process and collecting its output.
///
/// A spawn failure surfaces as `Err`; a process that runs and exits non-zero
/// is still `Ok` - the loop classifies iterations by output content, not by
/// exit status.
#[async_trait]
pub trait ProcessHost: Send + Sync {
    async fn run(&self, invocation: AgentInvocation) -> std::io::Result<AgentOutput>;
}

/// Production host backed by `tokio::process`.
pub struct TokioProcessHost;

#[async_trait]
impl ProcessHost for TokioProcessHost {
    async fn run(&self, invocation: AgentInvocation) -> std::io::Result<AgentOutput> {
        debug!(
            "Spawning {} {:?} in {}",
            invocation.program,
            invocation.args,
            invocation.workdir.display()
        );

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let buffer = Arc::new(Mutex::new(String::new()));

        let feed = async {
            if let Some(mut sink) = stdin {
                if let Some(data) = &invocation.stdin {
                    // The agent may exit without reading its stdin; a broken
                    // pipe here is not a failed iteration.
                    let _ = sink.write_all(data).await;
                }
                let _ = sink.shutdown().await;
            }
        };

        let (_, out_done, err_done) = tokio::join!(
            feed,
            drain(stdout, tokio::io::stdout(), Arc::clone(&buffer)),
            drain(stderr, tokio::io::stderr(), Arc::clone(&buffer)),
        );
        out_done?;
        err_done?;

        let status = child.wait().await?;
        let combined = buffer.lock().await.clone();

        Ok(AgentOutput {
            combined,
            exit_code: status.code(),
        })
    }
}

/// Read chunks from one child stream until EOF, teeing each chunk to the
/// parent stream and appending it to the shared buffer.
async fn drain<R, W>(reader: Option<R>, mut tee: W, buffer: Arc<Mutex<String>>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(());
    };

    let mut chunk = [0u8; 4096];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        tee.write_all(&chunk[..n]).await?;
        tee.flush().await?;
        buffer
            .lock()
            .await
            .push_str(&String::from_utf8_lossy(&chunk[..n]));
    }
    Ok(())
}

/// Bounded output collection for solver processes
///
/// Each stream is drained on its own thread so a solver that writes a lot
/// while still reading its input can never deadlock against the grader.
/// Bytes beyond the per-stream limit are read and discarded. Kept bytes are
/// forwarded as they arrive, so a stream cut off by the collection timeout
/// still yields everything read up to that point.
use crate::config::types::OutputIntegrity;
use std::io::Read;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Output limits configuration
#[derive(Debug, Clone)]
pub struct OutputLimits {
    /// Per-stream stdout limit (bytes)
    pub stdout_limit: usize,
    /// Per-stream stderr limit (bytes)
    pub stderr_limit: usize,
    /// How long to wait for streams to close after the process is gone (milliseconds)
    pub collection_timeout_ms: u64,
}

impl Default for OutputLimits {
    fn default() -> Self {
        OutputLimits {
            stdout_limit: 1024 * 1024,   // 1 MB stdout
            stderr_limit: 256 * 1024,    // 256 KB stderr
            collection_timeout_ms: 2000, // 2 seconds
        }
    }
}

/// Output collection result
#[derive(Debug, Clone, Default)]
pub struct OutputResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_integrity: OutputIntegrity,
    pub stderr_integrity: OutputIntegrity,
}

impl OutputResult {
    /// Worst integrity across both streams
    pub fn combined_integrity(&self) -> OutputIntegrity {
        for integrity in [&self.stdout_integrity, &self.stderr_integrity] {
            if *integrity == OutputIntegrity::ReadError {
                return OutputIntegrity::ReadError;
            }
        }
        if self.stdout_integrity != OutputIntegrity::Complete
            || self.stderr_integrity != OutputIntegrity::Complete
        {
            return OutputIntegrity::TruncatedByJudgeLimit;
        }
        OutputIntegrity::Complete
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

enum StreamMessage {
    Chunk(Vec<u8>),
    Closed(OutputIntegrity),
}

/// Output collector with bounded collection
pub struct OutputCollector {
    limits: OutputLimits,
}

/// Collection in progress; finished once the process has exited
pub struct PendingOutput {
    stdout_rx: Option<Receiver<StreamMessage>>,
    stderr_rx: Option<Receiver<StreamMessage>>,
    collection_timeout: Duration,
}

impl OutputCollector {
    pub fn new(limits: OutputLimits) -> Self {
        OutputCollector { limits }
    }

    /// Start draining both streams in the background.
    pub fn start<O, E>(&self, stdout: Option<O>, stderr: Option<E>) -> PendingOutput
    where
        O: Read + Send + 'static,
        E: Read + Send + 'static,
    {
        PendingOutput {
            stdout_rx: stdout.map(|s| spawn_reader(s, self.limits.stdout_limit)),
            stderr_rx: stderr.map(|s| spawn_reader(s, self.limits.stderr_limit)),
            collection_timeout: Duration::from_millis(self.limits.collection_timeout_ms),
        }
    }
}

impl PendingOutput {
    /// Wait for both readers. A stream still open after the collection
    /// timeout (e.g. inherited by a detached grandchild) keeps what was read
    /// so far, is reported as truncated, and its reader thread is left detached.
    pub fn finish(self) -> OutputResult {
        let deadline = Instant::now() + self.collection_timeout;
        let (stdout, stdout_integrity) = receive(self.stdout_rx, deadline);
        let (stderr, stderr_integrity) = receive(self.stderr_rx, deadline);
        OutputResult {
            stdout,
            stderr,
            stdout_integrity,
            stderr_integrity,
        }
    }
}

fn receive(
    rx: Option<Receiver<StreamMessage>>,
    deadline: Instant,
) -> (Vec<u8>, OutputIntegrity) {
    let Some(rx) = rx else {
        return (Vec::new(), OutputIntegrity::Complete);
    };
    let mut buffer = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(StreamMessage::Chunk(bytes)) => buffer.extend_from_slice(&bytes),
            Ok(StreamMessage::Closed(integrity)) => return (buffer, integrity),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("output stream still open after collection timeout");
                return (buffer, OutputIntegrity::TruncatedByJudgeLimit);
            }
            Err(RecvTimeoutError::Disconnected) => return (buffer, OutputIntegrity::ReadError),
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(stream: R, limit: usize) -> Receiver<StreamMessage> {
    let (tx, rx) = channel();
    thread::spawn(move || collect_stream(stream, limit, tx));
    rx
}

/// Collect from a single stream with limit
fn collect_stream<R: Read>(mut stream: R, limit: usize, tx: Sender<StreamMessage>) {
    let mut kept = 0usize;
    let mut chunk = [0u8; 8192];
    let mut integrity = OutputIntegrity::Complete;

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let take = n.min(limit.saturating_sub(kept));
                if take < n {
                    integrity = OutputIntegrity::TruncatedByJudgeLimit;
                }
                if take > 0 {
                    kept += take;
                    // Receiver may be gone after a collection timeout; keep draining.
                    let _ = tx.send(StreamMessage::Chunk(chunk[..take].to_vec()));
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => {
                integrity = OutputIntegrity::ReadError;
                break;
            }
        }
    }

    let _ = tx.send(StreamMessage::Closed(integrity));
}

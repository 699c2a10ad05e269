// Notification Channel - serialized status-line output
//
// Not a logging subsystem (tracing carries diagnostics); this is the
// user-facing notification stream, serialized so that lines from many
// workers interleave whole, never partially.

use std::io::{self, Write};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;

use crate::error::Result;

type Sink = Box<dyn Write + Send>;

struct Sinks {
    out: Sink,
    err: Sink,
}

/// Serialized output channel shared by all workers.
///
/// `emit` and `emit_error` take the same lock, so status lines and error
/// lines never garble each other even when they target different streams.
pub struct NotificationChannel {
    sinks: Mutex<Sinks>,
}

impl NotificationChannel {
    /// Channel writing to the process stdout/stderr.
    pub fn stdio() -> Self {
        Self::with_sinks(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_sinks(out: Sink, err: Sink) -> Self {
        Self {
            sinks: Mutex::new(Sinks { out, err }),
        }
    }

    /// Channel capturing both streams in memory, for tests and embedding.
    pub fn capture() -> (Self, CapturedOutput) {
        let out = CapturedOutput::default();
        let channel = Self::with_sinks(Box::new(out.writer()), Box::new(out.writer()));
        (channel, out)
    }

    /// Write one status line (plus terminator) to the output sink.
    pub async fn emit(&self, line: &str) -> Result<()> {
        let mut sinks = self.sinks.lock().await;
        writeln!(sinks.out, "{line}")?;
        sinks.out.flush()?;
        Ok(())
    }

    /// Write one line to the error sink, under the same lock as `emit`.
    pub async fn emit_error(&self, line: &str) -> Result<()> {
        let mut sinks = self.sinks.lock().await;
        writeln!(sinks.err, "{line}")?;
        sinks.err.flush()?;
        Ok(())
    }
}

/// In-memory capture of everything a channel emitted.
#[derive(Clone, Default)]
pub struct CapturedOutput {
    buf: Arc<StdMutex<Vec<u8>>>,
}

impl CapturedOutput {
    fn writer(&self) -> CapturedWriter {
        CapturedWriter {
            buf: Arc::clone(&self.buf),
        }
    }

    /// Captured output split into lines, in emission order.
    pub fn lines(&self) -> Vec<String> {
        let buf = self.buf.lock().expect("capture buffer poisoned");
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

struct CapturedWriter {
    buf: Arc<StdMutex<Vec<u8>>>,
}

impl Write for CapturedWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .expect("capture buffer poisoned")
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

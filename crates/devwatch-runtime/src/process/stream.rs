//! Line readers for child stdout/stderr.
//!
//! Tools are free to print bytes that are not valid UTF-8. Lines are read as
//! raw bytes and decoded lossily, so one bad byte never ends a reader early
//! the way `AsyncBufReadExt::lines` would.

use std::fmt;
use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

/// Which pipe of a child a reader is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pipe {
    Stdout,
    Stderr,
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        })
    }
}

/// Newline-delimited reader with lossy decoding. `\n` and `\r\n` endings
/// are stripped.
struct LossyLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LossyLines<R> {
    fn new(stream: R) -> Self {
        Self {
            reader: BufReader::new(stream),
            buf: Vec::with_capacity(256),
        }
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }

        let mut line = self.buf.as_slice();
        if let Some(rest) = line.strip_suffix(b"\n") {
            line = rest.strip_suffix(b"\r").unwrap_or(rest);
        }
        Ok(Some(String::from_utf8_lossy(line).into_owned()))
    }
}

/// Spawn a task feeding every line of `stream` to `on_line`, in order.
///
/// The task ends at EOF or on the first read error.
pub(crate) fn spawn_stream_reader<R, F>(stream: R, pipe: Pipe, mut on_line: F) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    F: FnMut(String) + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = LossyLines::new(stream);
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    debug!(%pipe, %line, "child output");
                    on_line(line);
                }
                Ok(None) => break,
                Err(e) => {
                    debug!(%pipe, error = %e, "read failed, closing reader");
                    break;
                }
            }
        }
        debug!(%pipe, "reader finished");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    async fn collect(input: &'static [u8]) -> Vec<String> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        spawn_stream_reader(input, Pipe::Stdout, move |line| sink.lock().unwrap().push(line))
            .await
            .unwrap();
        let lines = seen.lock().unwrap().clone();
        lines
    }

    #[tokio::test]
    async fn test_lines_arrive_in_order_without_endings() {
        assert_eq!(
            collect(b"first\r\nsecond\n\nlast").await,
            ["first", "second", "", "last"]
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced_not_fatal() {
        let lines = collect(b"bad \xff byte\nstill here\n").await;
        assert_eq!(lines, ["bad \u{fffd} byte", "still here"]);
    }

    #[tokio::test]
    async fn test_lone_carriage_return_is_kept() {
        assert_eq!(collect(b"progress\r").await, ["progress\r"]);
    }
}

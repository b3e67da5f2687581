use log::{debug, trace};
use std::fmt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A single status line for the control connection: a three-digit code and a
/// human-readable text, rendered as `<code> <text>` plus the line ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    code: u16,
    text: String,
}

impl Reply {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.text)
    }
}

/// Producer handle for a connection's reply writer. Clones share the same
/// queue, so replies from the command loop and from any helper land on the
/// wire in submission order, never interleaved.
#[derive(Clone)]
pub struct ReplySender(mpsc::UnboundedSender<Reply>);

impl ReplySender {
    /// Queues a reply for delivery. Replies are advisory status lines: once
    /// the connection writer is gone there is nobody left to tell, so a
    /// failed send is logged and dropped.
    pub fn send(&self, reply: Reply) {
        if let Err(e) = self.0.send(reply) {
            debug!("Reply discarded, writer task gone: {}", e.0);
        }
    }
}

/// Spawns the per-connection writer task owning the control connection's
/// write half. The task drains the queue in order and exits when every
/// `ReplySender` clone has been dropped, or on the first write failure;
/// the closing connection is the only signal the peer gets.
pub fn channel<W>(mut writer: W) -> (ReplySender, JoinHandle<()>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Reply>();

    let task = tokio::spawn(async move {
        while let Some(reply) = rx.recv().await {
            trace!("Sending reply: {}", reply);
            let line = format!("{}\r\n", reply);
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                debug!("Control connection write failed: {}", e);
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    (ReplySender(tx), task)
}

use crate::constants::MSG_CLOSING_CONTROL;
use crate::core_reply::{Reply, ReplySender};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the QUIT FTP command.
///
/// Queues the 221 farewell; the session loop tears the connection down
/// after this handler returns, and the reply writer drains the queue
/// before the control socket drops.
pub async fn handle_quit_command(
    replies: ReplySender,
    _session: Arc<Mutex<Session>>,
    _args: Vec<String>,
) -> Result<(), std::io::Error> {
    info!("Client requested QUIT, closing control connection");
    replies.send(Reply::new(221, MSG_CLOSING_CONTROL));
    Ok(())
}

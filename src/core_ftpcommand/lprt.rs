use crate::constants::MSG_OK;
use crate::core_reply::{Reply, ReplySender};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the LPRT FTP command.
///
/// Some clients try LPRT before falling back to PORT. The long address
/// form is never used for transfers here, so the argument is acknowledged
/// and otherwise ignored.
pub async fn handle_lprt_command(
    replies: ReplySender,
    _session: Arc<Mutex<Session>>,
    _args: Vec<String>,
) -> Result<(), std::io::Error> {
    replies.send(Reply::new(200, MSG_OK));
    Ok(())
}

use crate::core_reply::{Reply, ReplySender};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the USER FTP command.
///
/// There is no credential check: whatever name the client offers is
/// acknowledged as logged in.
pub async fn handle_user_command(
    replies: ReplySender,
    _session: Arc<Mutex<Session>>,
    args: Vec<String>,
) -> Result<(), std::io::Error> {
    let name = args.join(" ");
    info!("User logged in: {}", name);
    replies.send(Reply::new(230, format!("User {} logged in.", name)));
    Ok(())
}

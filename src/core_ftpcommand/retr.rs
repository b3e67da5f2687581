use crate::constants::MSG_SYNTAX_ERROR;
use crate::core_reply::{Reply, ReplySender};
use crate::core_transfer::{run_transfer, TransferJob};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the RETR FTP command.
///
/// Resolves the requested path against the session's current directory
/// and hands it to the transfer sequencer, which opens the file, dials
/// the client's data port, and streams the contents.
pub async fn handle_retr_command(
    replies: ReplySender,
    session: Arc<Mutex<Session>>,
    args: Vec<String>,
) -> Result<(), std::io::Error> {
    let [path_arg] = args.as_slice() else {
        replies.send(Reply::new(501, MSG_SYNTAX_ERROR));
        return Ok(());
    };

    let path = session.lock().await.resolve_path(path_arg);
    info!("Retrieving file: {:?}", path);

    run_transfer(replies, session, TransferJob::Retrieve { path }).await
}

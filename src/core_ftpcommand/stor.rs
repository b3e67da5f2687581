use crate::constants::MSG_SYNTAX_ERROR;
use crate::core_reply::{Reply, ReplySender};
use crate::core_transfer::{run_transfer, TransferJob};
use crate::session::Session;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the STOR FTP command.
///
/// The destination is resolved against the session's current directory.
/// Create/truncate happens before the data connection is dialed, so a
/// path the server cannot write gets a 550 and no connection attempt.
pub async fn handle_stor_command(
    replies: ReplySender,
    session: Arc<Mutex<Session>>,
    args: Vec<String>,
) -> Result<(), std::io::Error> {
    let [path_arg] = args.as_slice() else {
        replies.send(Reply::new(501, MSG_SYNTAX_ERROR));
        return Ok(());
    };

    let path = session.lock().await.resolve_path(path_arg);
    info!("Storing file: {:?}", path);

    run_transfer(replies, session, TransferJob::Store { path }).await
}

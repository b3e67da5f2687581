use crate::core_reply::ReplySender;
use crate::core_transfer::{run_transfer, TransferJob};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the LIST FTP command.
///
/// With no argument the session's current directory is listed; with an
/// argument the named directory is. Anything past the first argument is
/// ignored.
pub async fn handle_list_command(
    replies: ReplySender,
    session: Arc<Mutex<Session>>,
    args: Vec<String>,
) -> Result<(), std::io::Error> {
    let dir = {
        let session = session.lock().await;
        match args.first() {
            Some(arg) => session.resolve_path(arg),
            None => session.current_dir().to_path_buf(),
        }
    };

    run_transfer(replies, session, TransferJob::List { dir }).await
}

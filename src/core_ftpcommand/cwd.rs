use crate::constants::{MSG_FILE_UNAVAILABLE, MSG_OK, MSG_SYNTAX_ERROR};
use crate::core_reply::{Reply, ReplySender};
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the CWD (Change Working Directory) FTP command.
///
/// The candidate directory is resolved and checked against the filesystem
/// before anything is stored: a target that does not exist leaves the
/// session's working directory exactly as it was, so a following PWD still
/// reports the old location.
pub async fn handle_cwd_command(
    replies: ReplySender,
    session: Arc<Mutex<Session>>,
    args: Vec<String>,
) -> Result<(), std::io::Error> {
    let [dir] = args.as_slice() else {
        replies.send(Reply::new(501, MSG_SYNTAX_ERROR));
        return Ok(());
    };

    let candidate = {
        let session = session.lock().await;
        session.resolve_path(dir)
    };

    match fs::canonicalize(&candidate).await {
        Ok(absolute) => {
            info!("Working directory changed to {:?}", absolute);
            let mut session = session.lock().await;
            session.commit_working_dir(candidate, absolute);
            replies.send(Reply::new(200, MSG_OK));
        }
        Err(e) => {
            warn!("CWD to {:?} failed: {}", candidate, e);
            replies.send(Reply::new(550, MSG_FILE_UNAVAILABLE));
        }
    }

    Ok(())
}

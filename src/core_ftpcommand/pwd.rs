// src/core_ftpcommand/pwd.rs
use crate::core_reply::{Reply, ReplySender};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reports the resolved absolute form of the session's working directory.
pub async fn handle_pwd_command(
    replies: ReplySender,
    session: Arc<Mutex<Session>>,
    _args: Vec<String>,
) -> Result<(), std::io::Error> {
    let current = {
        let session = session.lock().await;
        session.absolute_dir().display().to_string()
    };
    replies.send(Reply::new(
        257,
        format!("\"{}\" is the current directory.", current),
    ));
    Ok(())
}

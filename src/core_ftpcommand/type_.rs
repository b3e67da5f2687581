use crate::constants::{MSG_OK, MSG_PARAM_NOT_IMPLEMENTED, MSG_SYNTAX_ERROR};
use crate::core_reply::{Reply, ReplySender};
use crate::session::{Representation, Session};
use log::warn;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the TYPE FTP command.
///
/// Only `A` (ASCII) and `I` (image) are supported; an unrecognized value
/// gets a 504 and the previous representation stays in effect.
pub async fn handle_type_command(
    replies: ReplySender,
    session: Arc<Mutex<Session>>,
    args: Vec<String>,
) -> Result<(), std::io::Error> {
    let Some(code) = args.first() else {
        replies.send(Reply::new(501, MSG_SYNTAX_ERROR));
        return Ok(());
    };

    match Representation::from_type_code(code) {
        Some(representation) => {
            session.lock().await.representation = representation;
            replies.send(Reply::new(200, MSG_OK));
        }
        None => {
            warn!("Unsupported TYPE argument: {}", code);
            replies.send(Reply::new(504, MSG_PARAM_NOT_IMPLEMENTED));
        }
    }

    Ok(())
}

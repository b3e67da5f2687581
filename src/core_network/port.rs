use crate::constants::{MSG_OK, MSG_SYNTAX_ERROR};
use crate::core_reply::{Reply, ReplySender};
use crate::session::Session;
use log::{info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataPortError {
    #[error("expected 6 comma-separated fields, got {0}")]
    WrongFieldCount(usize),

    #[error("field {0:?} is not a decimal byte")]
    InvalidField(String),
}

/// Decodes the PORT argument `h1,h2,h3,h4,p1,p2` into the socket address
/// `h1.h2.h3.h4:(p1*256+p2)`. Every field must be a decimal byte.
pub fn decode_data_port(arg: &str) -> Result<SocketAddr, DataPortError> {
    let fields: Vec<&str> = arg.split(',').collect();
    let [h1, h2, h3, h4, p1, p2] = fields.as_slice() else {
        return Err(DataPortError::WrongFieldCount(fields.len()));
    };

    let byte = |field: &&str| -> Result<u8, DataPortError> {
        field
            .parse::<u8>()
            .map_err(|_| DataPortError::InvalidField((*field).to_string()))
    };

    let host = Ipv4Addr::new(byte(h1)?, byte(h2)?, byte(h3)?, byte(h4)?);
    let port = u16::from(byte(p1)?) << 8 | u16::from(byte(p2)?);
    Ok(SocketAddr::new(IpAddr::V4(host), port))
}

/// Handles the PORT (active mode) FTP command.
///
/// The address is decoded, validated, and stored in the session; the
/// connection itself is dialed later, by the transfer that uses it. A
/// malformed argument gets a 501 and leaves any previous address
/// registered.
pub async fn handle_port_command(
    replies: ReplySender,
    session: Arc<Mutex<Session>>,
    args: Vec<String>,
) -> Result<(), std::io::Error> {
    let [arg] = args.as_slice() else {
        replies.send(Reply::new(501, MSG_SYNTAX_ERROR));
        return Ok(());
    };

    match decode_data_port(arg) {
        Ok(peer) => {
            info!("Registered data peer {} for active transfers", peer);
            session.lock().await.data_peer = Some(peer);
            replies.send(Reply::new(200, MSG_OK));
        }
        Err(err) => {
            warn!("Rejected PORT argument {:?}: {}", arg, err);
            replies.send(Reply::new(501, MSG_SYNTAX_ERROR));
        }
    }

    Ok(())
}

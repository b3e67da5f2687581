use crate::constants::{CONTROL_IDLE_TIMEOUT, MAX_COMMAND_LINE, MSG_GREETING, MSG_NOT_IMPLEMENTED};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::initialize_command_handlers;
use crate::core_reply::{self, Reply};
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Binds the control listener and serves forever, one task per accepted
/// connection. Sessions are rooted at the process's working directory.
pub async fn start_server(listen_port: u16) -> Result<()> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", listen_port))
        .await
        .with_context(|| format!("Failed to bind control listener on port {}", listen_port))?;
    info!("Server listening on port {}", listen_port);

    let root = PathBuf::from(".");
    let root_absolute = root
        .canonicalize()
        .context("Failed to resolve the server root directory")?;

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                // One refused connection must not take the listener down.
                warn!("Failed to accept a control connection: {}", e);
                continue;
            }
        };
        info!("New connection from {}", addr);

        let session = Arc::new(Mutex::new(Session::new(
            root.clone(),
            root_absolute.clone(),
        )));

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, session).await {
                error!("Connection error for {}: {:?}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

/// Runs one control connection: greet, then read commands line by line
/// and dispatch each until QUIT, EOF, idle expiry, an oversized line, or
/// a read failure.
///
/// All replies go through the connection's reply writer task, which owns
/// the write half of the socket. Handlers therefore never touch the
/// socket directly and their replies cannot interleave.
pub async fn handle_connection(socket: TcpStream, session: Arc<Mutex<Session>>) -> Result<()> {
    let (read_half, write_half) = socket.into_split();
    let (replies, writer_task) = core_reply::channel(write_half);

    replies.send(Reply::new(220, MSG_GREETING));

    let handlers = initialize_command_handlers();
    let mut reader = BufReader::new(read_half);
    let mut buffer = String::new();
    let mut result = Ok(());

    loop {
        buffer.clear();

        let read = match timeout(
            CONTROL_IDLE_TIMEOUT,
            (&mut reader).take(MAX_COMMAND_LINE).read_line(&mut buffer),
        )
        .await
        {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                result = Err(e.into());
                break;
            }
            Err(_) => {
                info!("Control connection idle, closing session");
                break;
            }
        };

        if read == 0 {
            debug!("Client disconnected");
            break;
        }

        // A line that fills the cap without its newline can never become a
        // command; cut the connection loose instead of buffering forever.
        if read as u64 == MAX_COMMAND_LINE && !buffer.ends_with('\n') {
            warn!(
                "Control line exceeded {} bytes, closing session",
                MAX_COMMAND_LINE
            );
            break;
        }

        let mut tokens = buffer.split_whitespace();
        let Some(verb) = tokens.next() else {
            // A line with no tokens is dropped without a reply.
            continue;
        };
        let args: Vec<String> = tokens.map(str::to_string).collect();

        debug!("Received command: {}", buffer.trim_end());

        let Some(command) = FtpCommand::from_str(verb) else {
            warn!("Unrecognized command: {}", verb);
            replies.send(Reply::new(502, MSG_NOT_IMPLEMENTED));
            continue;
        };

        if let Some(handler) = handlers.get(&command) {
            if let Err(e) = handler(replies.clone(), Arc::clone(&session), args).await {
                error!("Error handling command {:?}: {:?}", command, e);
                break;
            }
        }

        if matches!(command, FtpCommand::QUIT) {
            break;
        }
    }

    // Dropping the last sender ends the writer task, which drains queued
    // replies (QUIT's 221 included) before the socket's write half drops.
    drop(replies);
    if writer_task.await.is_err() {
        debug!("Reply writer task ended abnormally");
    }

    result
}

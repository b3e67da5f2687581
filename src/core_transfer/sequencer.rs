use crate::constants::{
    DATA_CONNECT_TIMEOUT, DATA_IO_TIMEOUT, MSG_CANT_OPEN_DATA, MSG_FILE_UNAVAILABLE, MSG_OK,
    MSG_TRANSFER_ABORTED, TRANSFER_BUFFER_SIZE,
};
use crate::core_reply::{Reply, ReplySender};
use crate::session::{Representation, Session};
use log::{debug, error, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// One data-bearing operation, named by what travels over the data
/// connection.
pub enum TransferJob {
    /// Send the names of a directory's entries, one per line.
    List { dir: PathBuf },
    /// Send a file's contents to the client.
    Retrieve { path: PathBuf },
    /// Receive a file's contents from the client.
    Store { path: PathBuf },
}

/// Local resource acquired up front, before anything is promised to the
/// client on the control connection.
enum Payload {
    Listing(Vec<String>),
    Source(File),
    Sink(File),
}

/// Drives one transfer end to end: acquire the local resource, announce
/// with 150, dial the client's data port, stream the payload, then
/// report 226 or a failure code.
///
/// Acquisition failures short-circuit with 550 before anything touches
/// the network. STOR is no exception: a destination that cannot be
/// created never triggers a data connection.
pub async fn run_transfer(
    replies: ReplySender,
    session: Arc<Mutex<Session>>,
    job: TransferJob,
) -> Result<(), std::io::Error> {
    let payload = match acquire_payload(&job).await {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Transfer resource unavailable: {}", err);
            replies.send(Reply::new(550, MSG_FILE_UNAVAILABLE));
            return Ok(());
        }
    };

    replies.send(Reply::new(150, MSG_OK));

    let (peer, representation) = {
        let session = session.lock().await;
        (session.data_peer, session.representation)
    };

    let Some(peer) = peer else {
        warn!("Data transfer requested before any PORT command");
        replies.send(Reply::new(425, MSG_CANT_OPEN_DATA));
        return Ok(());
    };

    let mut data = match connect_data(peer).await {
        Ok(stream) => stream,
        Err(err) => {
            warn!("Failed to open data connection to {}: {}", peer, err);
            replies.send(Reply::new(425, MSG_CANT_OPEN_DATA));
            return Ok(());
        }
    };

    let outcome = stream_payload(&mut data, payload, representation).await;

    // The data connection is closed whether the transfer survived or not.
    if let Err(err) = data.shutdown().await {
        debug!("Data connection shutdown failed: {}", err);
    }

    match outcome {
        Ok(()) => replies.send(Reply::new(226, MSG_OK)),
        Err(err) => {
            error!("Data transfer to {} failed: {}", peer, err);
            replies.send(Reply::new(426, MSG_TRANSFER_ABORTED));
        }
    }

    Ok(())
}

async fn acquire_payload(job: &TransferJob) -> Result<Payload, std::io::Error> {
    match job {
        TransferJob::List { dir } => {
            let mut entries = tokio::fs::read_dir(dir).await?;
            let mut names = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
            // Directory iteration order is platform-dependent.
            names.sort();
            Ok(Payload::Listing(names))
        }
        TransferJob::Retrieve { path } => Ok(Payload::Source(File::open(path).await?)),
        TransferJob::Store { path } => Ok(Payload::Sink(File::create(path).await?)),
    }
}

async fn connect_data(peer: SocketAddr) -> Result<TcpStream, std::io::Error> {
    timed(DATA_CONNECT_TIMEOUT, TcpStream::connect(peer)).await
}

async fn stream_payload<S>(
    data: &mut S,
    payload: Payload,
    representation: Representation,
) -> Result<(), std::io::Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match payload {
        Payload::Listing(names) => send_listing(data, &names, representation).await,
        Payload::Source(file) => send_file(data, file, representation).await,
        Payload::Sink(file) => receive_file(data, file).await,
    }
}

/// Writes one entry name per line, plus a trailing empty line, using the
/// line ending the session's representation calls for.
async fn send_listing<S>(
    data: &mut S,
    names: &[String],
    representation: Representation,
) -> Result<(), std::io::Error>
where
    S: AsyncWrite + Unpin,
{
    let eol = representation.line_ending();
    for name in names {
        timed(DATA_IO_TIMEOUT, data.write_all(name.as_bytes())).await?;
        timed(DATA_IO_TIMEOUT, data.write_all(eol.as_bytes())).await?;
    }
    timed(DATA_IO_TIMEOUT, data.write_all(eol.as_bytes())).await?;
    Ok(())
}

/// Copies the file to the data connection, then one line ending.
async fn send_file<S>(
    data: &mut S,
    mut file: File,
    representation: Representation,
) -> Result<(), std::io::Error>
where
    S: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; TRANSFER_BUFFER_SIZE];
    loop {
        let read = timed(DATA_IO_TIMEOUT, file.read(&mut buffer)).await?;
        if read == 0 {
            break;
        }
        timed(DATA_IO_TIMEOUT, data.write_all(&buffer[..read])).await?;
    }
    timed(
        DATA_IO_TIMEOUT,
        data.write_all(representation.line_ending().as_bytes()),
    )
    .await?;
    Ok(())
}

/// Copies the data connection into the file until the client closes its
/// end.
async fn receive_file<S>(data: &mut S, mut file: File) -> Result<(), std::io::Error>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; TRANSFER_BUFFER_SIZE];
    loop {
        let read = timed(DATA_IO_TIMEOUT, data.read(&mut buffer)).await?;
        if read == 0 {
            break;
        }
        timed(DATA_IO_TIMEOUT, file.write_all(&buffer[..read])).await?;
    }
    timed(DATA_IO_TIMEOUT, file.flush()).await?;
    Ok(())
}

/// Applies a deadline to one I/O step, surfacing expiry as a timeout
/// error. A stalled peer therefore aborts the transfer instead of
/// pinning its session task forever.
async fn timed<T>(
    limit: Duration,
    op: impl Future<Output = Result<T, std::io::Error>>,
) -> Result<T, std::io::Error> {
    match timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::from(std::io::ErrorKind::TimedOut)),
    }
}

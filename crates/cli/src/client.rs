//! Thin TCP client for talking to `pm0d`.

use pm0_wire::{read_message, write_message, FrameError, Request, Response};
use thiserror::Error;
use tokio::net::TcpStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach pm0d at {0}: {1}")]
    Connect(String, std::io::Error),
    #[error("{0}")]
    Frame(#[from] FrameError),
    #[error("{0}")]
    Daemon(String),
    #[error("unexpected response from pm0d")]
    UnexpectedResponse,
}

pub async fn connect() -> Result<TcpStream, ClientError> {
    let addr = pm0_wire::daemon_addr();
    TcpStream::connect(&addr)
        .await
        .map_err(|e| ClientError::Connect(addr, e))
}

/// Send a request that replies with exactly one frame.
pub async fn call_unary(stream: &mut TcpStream, request: &Request) -> Result<Response, ClientError> {
    write_message(stream, request).await?;
    Ok(read_message(stream).await?)
}

/// Send a bulk request (`Stop`/`Restart`/`Delete` and their `*All`
/// variants), collecting `BulkItem` frames until `StreamEnd`.
pub async fn call_bulk(
    stream: &mut TcpStream,
    request: &Request,
) -> Result<Vec<pm0_wire::BulkElement>, ClientError> {
    write_message(stream, request).await?;
    let mut items = Vec::new();
    loop {
        match read_message(stream).await? {
            Response::BulkItem(item) => items.push(item),
            Response::StreamEnd => return Ok(items),
            Response::Error { message } => return Err(ClientError::Daemon(message)),
            _ => return Err(ClientError::UnexpectedResponse),
        }
    }
}

/// Send a `Logs` request, invoking `on_chunk` for every `LogChunk` frame.
/// Returns once the daemon ends the stream (non-follow) or the connection
/// closes (follow, until the caller disconnects or the daemon exits).
pub async fn call_logs(
    stream: &mut TcpStream,
    request: &Request,
    mut on_chunk: impl FnMut(Vec<String>),
) -> Result<(), ClientError> {
    write_message(stream, request).await?;
    loop {
        match read_message::<Response, _>(stream).await {
            Ok(Response::LogChunk(lines)) => on_chunk(lines),
            Ok(Response::Error { message }) => return Err(ClientError::Daemon(message)),
            Ok(_) => return Err(ClientError::UnexpectedResponse),
            Err(FrameError::ConnectionClosed) => return Ok(()),
            Err(FrameError::Io(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        }
    }
}

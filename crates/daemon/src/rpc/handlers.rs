//! Translates one `pm0_wire::Request` into Supervisor calls and streams
//! the matching `pm0_wire::Response` frames back.

use pm0_core::{Clock, Pm0Error};
use pm0_wire::{read_message, write_message, FrameError, Request, Response};
use tokio::net::TcpStream;
use tracing::debug;

use crate::supervisor::{BulkResult, Supervisor};

pub async fn handle_connection<C: Clock + 'static>(mut stream: TcpStream, sup: Supervisor<C>) {
    let request: Request = match read_message(&mut stream).await {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "failed to read request");
            return;
        }
    };
    if let Err(e) = dispatch(&mut stream, request, &sup).await {
        debug!(error = %e, "connection ended while writing response");
    }
}

async fn dispatch<C: Clock + 'static>(
    stream: &mut TcpStream,
    request: Request,
    sup: &Supervisor<C>,
) -> Result<(), FrameError> {
    match request {
        Request::Start { name, cwd, bin, args, env } => {
            let response = match sup.start(name, cwd, bin, args, env) {
                Ok(unit) => Response::Unit(unit),
                Err(e) => Response::Error { message: e.as_message() },
            };
            write_message(stream, &response).await
        }
        Request::List => write_message(stream, &Response::Units(sup.list())).await,
        Request::Show { unit_id } => {
            let response = match sup.show(unit_id) {
                Ok(info) => Response::Show(info),
                Err(e) => Response::Error { message: e.as_message() },
            };
            write_message(stream, &response).await
        }
        Request::Stop { unit_ids, force } => stream_bulk(stream, sup.stop(&unit_ids, force)).await,
        Request::StopAll { except } => stream_bulk(stream, sup.stop_all(&except)).await,
        Request::Restart { unit_ids, force } => stream_bulk(stream, sup.restart(&unit_ids, force)).await,
        Request::RestartAll { except } => stream_bulk(stream, sup.restart_all(&except)).await,
        Request::Delete { unit_ids } => stream_bulk(stream, sup.delete(&unit_ids, false)).await,
        Request::DeleteAll { except } => stream_bulk(stream, sup.delete_all(&except)).await,
        Request::LogsClear { unit_ids } => {
            // Absent ids are ignored silently, not surfaced as an error.
            let errors: Vec<String> = sup
                .logs_clear(&unit_ids)
                .into_iter()
                .filter_map(|(id, result)| match result {
                    Err(Pm0Error::NotFound(_)) => None,
                    Err(e) => Some(format!("unit {id}: {}", e.as_message())),
                    Ok(()) => None,
                })
                .collect();
            let response = if errors.is_empty() {
                Response::Ack
            } else {
                Response::Error { message: errors.join("; ") }
            };
            write_message(stream, &response).await
        }
        Request::Update { unit_id, name, env } => {
            let name = (!name.is_empty()).then_some(name);
            let response = match sup.update(unit_id, name, env) {
                Ok(name) => Response::UpdateResult { name },
                Err(e) => Response::Error { message: e.as_message() },
            };
            write_message(stream, &response).await
        }
        Request::Logs { unit_id, lines, follow } => {
            handle_logs(stream, sup, unit_id, lines as usize, follow).await
        }
    }
}

async fn stream_bulk(stream: &mut TcpStream, results: Vec<BulkResult>) -> Result<(), FrameError> {
    for result in results {
        write_message(stream, &Response::BulkItem(result.into())).await?;
    }
    write_message(stream, &Response::StreamEnd).await
}

async fn handle_logs<C: Clock + 'static>(
    stream: &mut TcpStream,
    sup: &Supervisor<C>,
    unit_id: u64,
    lines: usize,
    follow: bool,
) -> Result<(), FrameError> {
    let log_path = sup.config().unit_log_path(unit_id);
    let clamped = crate::logs::clamp_lines(lines);
    let initial = crate::logs::tail(&log_path, clamped).unwrap_or_default();
    write_message(stream, &Response::LogChunk(initial)).await?;

    if !follow {
        return Ok(());
    }

    let Ok(mut follower) = crate::logs::Follower::from_end(&log_path) else {
        return Ok(());
    };
    let mut ticker = tokio::time::interval(crate::env::follow_poll_interval());
    loop {
        ticker.tick().await;
        match follower.poll(&log_path) {
            Ok(chunk) if !chunk.is_empty() => {
                write_message(stream, &Response::LogChunk(chunk)).await?;
            }
            Ok(_) => {}
            Err(_) => {}
        }
    }
}

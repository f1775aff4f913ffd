//! pm0 — thin command-line front end for `pm0d`.

mod client;
mod commands;

use clap::Parser;
use commands::{Cli, Command};
use pm0_wire::{BulkElement, Request, Response, UnitWire};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(message) = run(cli.command).await {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Start { bin, args, name, cwd, env } => start(bin, args, name, cwd, env).await,
        Command::List => list().await,
        Command::Show { id } => show(id).await,
        Command::Stop { targets, force, except } => bulk(BulkOp::Stop, targets, except, force).await,
        Command::Restart { targets, force, except } => bulk(BulkOp::Restart, targets, except, force).await,
        Command::Delete { targets, except } => bulk(BulkOp::Delete, targets, except, false).await,
        Command::Logs { id, lines, follow } => logs(id, lines, follow).await,
        Command::LogsClear { targets } => logs_clear(targets).await,
        Command::Update { id, name, env } => update(id, name, env).await,
    }
}

async fn fetch_units() -> Result<Vec<UnitWire>, String> {
    let mut stream = client::connect().await.map_err(|e| e.to_string())?;
    match client::call_unary(&mut stream, &Request::List).await.map_err(|e| e.to_string())? {
        Response::Units(units) => Ok(units),
        Response::Error { message } => Err(message),
        _ => Err("unexpected response from pm0d".into()),
    }
}

fn resolve_id(target: &str, units: &[UnitWire]) -> Result<u64, String> {
    if let Ok(id) = target.parse::<u64>() {
        return units
            .iter()
            .any(|u| u.id == id)
            .then_some(id)
            .ok_or_else(|| format!("no unit with id {id}"));
    }
    units
        .iter()
        .find(|u| u.name == target)
        .map(|u| u.id)
        .ok_or_else(|| format!("no unit named '{target}'"))
}

fn resolve_ids(targets: &[String], units: &[UnitWire]) -> Result<Vec<u64>, String> {
    targets.iter().map(|t| resolve_id(t, units)).collect()
}

fn status_name(status: u32) -> &'static str {
    match status {
        0 => "RUNNING",
        1 => "EXITED",
        2 => "FAILED",
        3 => "STOPPED",
        _ => "UNKNOWN",
    }
}

fn format_unit(u: &UnitWire) -> String {
    let pid = u.pid.map(|p| p.to_string()).unwrap_or_else(|| "None".to_string());
    format!(
        "{} {} {} pid={} restarts={} started_at={}",
        u.id,
        u.name,
        status_name(u.status),
        pid,
        u.restarts_count,
        u.started_at
    )
}

async fn start(bin: String, args: Vec<String>, name: Option<String>, cwd: Option<String>, env: Vec<String>) -> Result<(), String> {
    let cwd = cwd.unwrap_or_else(|| {
        std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    });
    let name = name.unwrap_or_else(|| {
        std::path::Path::new(&cwd)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let mut stream = client::connect().await.map_err(|e| e.to_string())?;
    let request = Request::Start { name, cwd, bin, args, env };
    match client::call_unary(&mut stream, &request).await.map_err(|e| e.to_string())? {
        Response::Unit(unit) => {
            println!("{}", format_unit(&unit));
            Ok(())
        }
        Response::Error { message } => Err(message),
        _ => Err("unexpected response from pm0d".into()),
    }
}

async fn list() -> Result<(), String> {
    let mut units = fetch_units().await?;
    units.sort_by_key(|u| u.id);
    for unit in &units {
        println!("{}", format_unit(unit));
    }
    Ok(())
}

async fn show(id: String) -> Result<(), String> {
    let units = fetch_units().await?;
    let unit_id = resolve_id(&id, &units)?;

    let mut stream = client::connect().await.map_err(|e| e.to_string())?;
    match client::call_unary(&mut stream, &Request::Show { unit_id }).await.map_err(|e| e.to_string())? {
        Response::Show(info) => {
            println!("id: {}", info.id);
            println!("name: {}", info.name);
            println!("cwd: {}", info.cwd);
            println!("command: {}", info.command);
            for entry in &info.env {
                println!("env: {entry}");
            }
            Ok(())
        }
        Response::Error { message } => Err(message),
        _ => Err("unexpected response from pm0d".into()),
    }
}

enum BulkOp {
    Stop,
    Restart,
    Delete,
}

async fn bulk(op: BulkOp, targets: Vec<String>, except: Vec<String>, force: bool) -> Result<(), String> {
    let units = fetch_units().await?;
    let request = if targets.len() == 1 && targets[0] == "all" {
        let except = resolve_ids(&except, &units)?;
        match op {
            BulkOp::Stop => Request::StopAll { except },
            BulkOp::Restart => Request::RestartAll { except },
            BulkOp::Delete => Request::DeleteAll { except },
        }
    } else {
        let unit_ids = resolve_ids(&targets, &units)?;
        match op {
            BulkOp::Stop => Request::Stop { unit_ids, force },
            BulkOp::Restart => Request::Restart { unit_ids, force },
            BulkOp::Delete => Request::Delete { unit_ids },
        }
    };

    let mut stream = client::connect().await.map_err(|e| e.to_string())?;
    let items = client::call_bulk(&mut stream, &request).await.map_err(|e| e.to_string())?;
    print_bulk_items(items);
    Ok(())
}

fn print_bulk_items(items: Vec<BulkElement>) {
    for item in items {
        match (item.unit, item.error) {
            (Some(unit), None) => println!("{}", format_unit(&unit)),
            (_, Some(error)) => println!("{}: {error}", item.unit_id),
            (None, None) => println!("{}", item.unit_id),
        }
    }
}

async fn logs(id: String, lines: u32, follow: bool) -> Result<(), String> {
    let units = fetch_units().await?;
    let unit_id = resolve_id(&id, &units)?;

    let mut stream = client::connect().await.map_err(|e| e.to_string())?;
    let request = Request::Logs { unit_id, lines, follow };
    client::call_logs(&mut stream, &request, |chunk| {
        for line in chunk {
            println!("{line}");
        }
    })
    .await
    .map_err(|e| e.to_string())
}

async fn logs_clear(targets: Vec<String>) -> Result<(), String> {
    let units = fetch_units().await?;
    let unit_ids = resolve_ids(&targets, &units)?;

    let mut stream = client::connect().await.map_err(|e| e.to_string())?;
    match client::call_unary(&mut stream, &Request::LogsClear { unit_ids }).await.map_err(|e| e.to_string())? {
        Response::Ack => Ok(()),
        Response::Error { message } => Err(message),
        _ => Err("unexpected response from pm0d".into()),
    }
}

async fn update(id: String, name: Option<String>, env: Vec<String>) -> Result<(), String> {
    let units = fetch_units().await?;
    let unit_id = resolve_id(&id, &units)?;

    let mut stream = client::connect().await.map_err(|e| e.to_string())?;
    let request = Request::Update { unit_id, name: name.unwrap_or_default(), env };
    match client::call_unary(&mut stream, &request).await.map_err(|e| e.to_string())? {
        Response::UpdateResult { name } => {
            println!("{name}");
            Ok(())
        }
        Response::Error { message } => Err(message),
        _ => Err("unexpected response from pm0d".into()),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

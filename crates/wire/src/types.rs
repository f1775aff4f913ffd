//! RPC message shapes exchanged between `pm0` and `pm0d`.

use serde::{Deserialize, Serialize};

/// Request sent by the CLI to the daemon. One request per connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    Start {
        name: String,
        cwd: String,
        bin: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        env: Vec<String>,
    },
    List,
    Show {
        unit_id: u64,
    },
    Stop {
        unit_ids: Vec<u64>,
        #[serde(default)]
        force: bool,
    },
    StopAll {
        #[serde(default)]
        except: Vec<u64>,
    },
    Restart {
        unit_ids: Vec<u64>,
        #[serde(default)]
        force: bool,
    },
    RestartAll {
        #[serde(default)]
        except: Vec<u64>,
    },
    Delete {
        unit_ids: Vec<u64>,
    },
    DeleteAll {
        #[serde(default)]
        except: Vec<u64>,
    },
    Logs {
        unit_id: u64,
        #[serde(default)]
        lines: u32,
        #[serde(default)]
        follow: bool,
    },
    LogsClear {
        unit_ids: Vec<u64>,
    },
    Update {
        unit_id: u64,
        #[serde(default)]
        name: String,
        #[serde(default)]
        env: Vec<String>,
    },
}

/// A unit as rendered on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitWire {
    pub id: u64,
    pub name: String,
    /// Present only when status is RUNNING.
    pub pid: Option<u32>,
    pub status: u32,
    pub restarts_count: u32,
    pub started_at: i64,
}

/// Response to `Show`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowInfo {
    pub id: u64,
    pub name: String,
    pub cwd: String,
    pub command: String,
    pub env: Vec<String>,
}

/// One element of a bulk operation's response stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkElement {
    pub unit_id: u64,
    pub unit: Option<UnitWire>,
    pub error: Option<String>,
}

/// A single frame sent from daemon to CLI.
///
/// Unary RPCs (`Start`, `List`, `Show`, `LogsClear`, `Update`) reply
/// with exactly one frame. Bulk RPCs (`Stop`/`Restart`/`Delete` and
/// their `*All` variants) reply with one `BulkItem` per id followed by
/// `StreamEnd`. `Logs` replies with one or more `LogChunk` frames; in
/// follow mode the stream has no natural end and is instead cut short
/// by the client closing the connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Unit(UnitWire),
    Units(Vec<UnitWire>),
    Show(ShowInfo),
    BulkItem(BulkElement),
    LogChunk(Vec<String>),
    UpdateResult { name: String },
    Ack,
    StreamEnd,
    Error { message: String },
}

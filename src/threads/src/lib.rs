pub mod ipc;
mod collector;
mod shared;


pub use collector::{CollectorStats, CollectorThread};
pub use ipc::{IPCMessage, IpcSink};
pub use shared::SharedAggregator;

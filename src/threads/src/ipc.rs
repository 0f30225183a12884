use std::sync::mpsc::Sender;
use wpa::{AnalyzerEvent, EventSink};
use log::warn;

#[derive(Debug, Clone)]
pub enum IPCMessage<T> {
    Message(T),
    EndCommunication,
}

/// publishes analyzer events into an IPC channel
#[derive(Debug, Clone)]
pub struct IpcSink {
    tx: Sender<IPCMessage<AnalyzerEvent>>,
}

impl IpcSink {
    pub fn new(tx: Sender<IPCMessage<AnalyzerEvent>>) -> Self {
        IpcSink { tx }
    }

    /// asks the receiving thread to stop once it has drained the channel
    pub fn end_communication(&self) {
        if self.tx.send(IPCMessage::EndCommunication).is_err() {
            warn!("receiver already gone");
        }
    }
}

impl EventSink for IpcSink {
    fn publish(&self, event: AnalyzerEvent) {
        if self.tx.send(IPCMessage::Message(event)).is_err() {
            warn!("event receiver disconnected, dropping event");
        }
    }
}

//! Background record writer
//!
//! Owns a `RecordStore` on its own thread. Writes are fire-and-forget; every
//! storage error is logged here and never reaches the caller.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::RecordStore;
use crate::highscores::SessionRecord;

enum Command {
    SessionEnded { score: u32, timestamp_millis: i64 },
    HighScore(Sender<u32>),
    Sessions(Sender<Vec<SessionRecord>>),
}

/// Handle to the writer thread. Dropping it flushes pending writes and joins.
#[derive(Debug)]
pub struct RecordWriter {
    tx: Option<Sender<Command>>,
    handle: Option<JoinHandle<()>>,
}

impl RecordWriter {
    /// Start the writer thread for `store`
    pub fn spawn(store: impl RecordStore + Send + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        let store: Box<dyn RecordStore + Send> = Box::new(store);
        match thread::Builder::new()
            .name("record-writer".to_string())
            .spawn(move || run(store, rx))
        {
            Ok(handle) => Self {
                tx: Some(tx),
                handle: Some(handle),
            },
            Err(e) => {
                log::warn!("Record writer unavailable, sessions will not be saved: {}", e);
                Self {
                    tx: None,
                    handle: None,
                }
            }
        }
    }

    /// Queue the session result and a conditional high score update. Never blocks.
    pub fn finish_session(&self, score: u32, timestamp_millis: i64) {
        self.send(Command::SessionEnded {
            score,
            timestamp_millis,
        });
    }

    /// Best recorded score, `0` when unknown or unreadable.
    ///
    /// Waits for the writer thread; call from UI code, not from the tick.
    pub fn high_score(&self) -> u32 {
        let (reply, rx) = mpsc::channel();
        self.send(Command::HighScore(reply));
        rx.recv().unwrap_or(0)
    }

    /// Recorded sessions, newest first; empty when unreadable
    pub fn sessions(&self) -> Vec<SessionRecord> {
        let (reply, rx) = mpsc::channel();
        self.send(Command::Sessions(reply));
        rx.recv().unwrap_or_default()
    }

    /// Finish pending writes and stop the thread
    pub fn shutdown(mut self) {
        self.close();
    }

    fn send(&self, command: Command) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(command).is_err() {
            log::warn!("Record writer stopped, request dropped");
        }
    }

    fn close(&mut self) {
        self.tx = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Record writer thread panicked");
            }
        }
    }
}

impl Drop for RecordWriter {
    fn drop(&mut self) {
        self.close();
    }
}

fn run(mut store: Box<dyn RecordStore + Send>, rx: Receiver<Command>) {
    for command in rx {
        match command {
            Command::SessionEnded {
                score,
                timestamp_millis,
            } => {
                if let Err(e) = store.record_session(score, timestamp_millis) {
                    log::warn!("Session not recorded: {}", e);
                }
                match store.update_high_score_if_greater(score) {
                    Ok(true) => log::info!("New high score: {}", score),
                    Ok(false) => {}
                    Err(e) => log::warn!("High score not updated: {}", e),
                }
            }
            Command::HighScore(reply) => {
                let best = store.high_score().unwrap_or_else(|e| {
                    log::warn!("High score unreadable, using 0: {}", e);
                    None
                });
                let _ = reply.send(best.unwrap_or(0));
            }
            Command::Sessions(reply) => {
                let sessions = store.sessions().unwrap_or_else(|e| {
                    log::warn!("Session history unreadable: {}", e);
                    Vec::new()
                });
                let _ = reply.send(sessions);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, RecordError};

    struct BrokenStore;

    impl RecordStore for BrokenStore {
        fn high_score(&self) -> Result<Option<u32>, RecordError> {
            Err(RecordError::Poisoned)
        }

        fn record_session(&mut self, _: u32, _: i64) -> Result<(), RecordError> {
            Err(RecordError::Poisoned)
        }

        fn update_high_score_if_greater(&mut self, _: u32) -> Result<bool, RecordError> {
            Err(RecordError::Poisoned)
        }

        fn sessions(&self) -> Result<Vec<SessionRecord>, RecordError> {
            Err(RecordError::Poisoned)
        }
    }

    #[test]
    fn test_writes_land_in_store() {
        let store = MemoryStore::new();
        let writer = RecordWriter::spawn(store.clone());
        writer.finish_session(300, 1_000);
        writer.finish_session(200, 2_000);
        assert_eq!(writer.high_score(), 300);
        writer.shutdown();

        let records = store.records().unwrap();
        assert_eq!(records.sessions.len(), 2);
        assert_eq!(records.high_score, Some(300));
    }

    #[test]
    fn test_failures_degrade_to_defaults() {
        let writer = RecordWriter::spawn(BrokenStore);
        writer.finish_session(500, 1_000);
        assert_eq!(writer.high_score(), 0);
        assert!(writer.sessions().is_empty());
    }

    #[test]
    fn test_sessions_newest_first() {
        let writer = RecordWriter::spawn(MemoryStore::new());
        writer.finish_session(1, 10);
        writer.finish_session(2, 30);
        writer.finish_session(3, 20);
        let scores: Vec<u32> = writer.sessions().iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![2, 3, 1]);
    }
}

//! The shared queue of pending wordlist labels.
//!
//! The queue is filled once before any worker starts and then closed, so a
//! failed non-blocking take always means "no work left".
use async_channel::{Receiver, TryRecvError};

/// A multi-consumer FIFO of labels. Clones share the same queue.
#[derive(Clone, Debug)]
pub struct TaskQueue {
    rx: Receiver<String>,
}

impl TaskQueue {
    /// Builds a queue pre-loaded with `labels` in order.
    pub fn with_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let (tx, rx) = async_channel::unbounded();
        for label in labels {
            // Unbounded and the receiver is held here, so this cannot fail.
            let _ = tx.try_send(label);
        }
        tx.close();
        Self { rx }
    }

    /// Takes the next label without waiting.
    ///
    /// Each label is handed out to exactly one caller. Returns `None` once
    /// the queue is drained.
    pub fn try_take(&self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(label) => Some(label),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

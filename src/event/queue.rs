//! The interaction queue: a single-consumer run loop fed from any thread.
//!
//! [`Runloop`] is owned by the host and drained on the interaction thread.
//! [`Dispatcher`] handles are cheap to clone and may be moved to timers,
//! backend threads, or value boxes to marshal work back onto that thread.

use std::thread::{self, ThreadId};

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use super::message::{Dispatch, SurfaceEvent};

/// Sending half of the interaction queue.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    sender: UnboundedSender<Dispatch>,
    thread: ThreadId,
}

impl Dispatcher {
    /// Queue `dispatch`. Returns `false` if the run loop is gone.
    pub fn post(&self, dispatch: Dispatch) -> bool {
        match self.sender.send(dispatch) {
            Ok(()) => true,
            Err(rejected) => {
                log::debug!("interaction queue closed, dropping {:?}", rejected.0);
                false
            }
        }
    }

    /// Queue a closure to run on the interaction thread.
    pub fn post_task(&self, task: impl FnOnce() + Send + 'static) -> bool {
        self.post(Dispatch::Notify(Box::new(task)))
    }

    /// Queue a backend input event.
    pub fn post_event(&self, event: SurfaceEvent) -> bool {
        self.post(Dispatch::Event(event))
    }

    /// Whether the caller is running on the interaction thread.
    pub fn is_interaction_thread(&self) -> bool {
        thread::current().id() == self.thread
    }

    /// Whether the run loop has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Receiving half of the interaction queue.
///
/// The thread that creates the run loop becomes the interaction thread.
#[derive(Debug)]
pub struct Runloop {
    dispatcher: Dispatcher,
    receiver: UnboundedReceiver<Dispatch>,
}

impl Runloop {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            dispatcher: Dispatcher { sender, thread: thread::current().id() },
            receiver,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// The next queued item, without waiting.
    pub fn try_next(&mut self) -> Option<Dispatch> {
        match self.receiver.try_recv() {
            Ok(dispatch) => Some(dispatch),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next queued item.
    ///
    /// The run loop holds a sender of its own, so this only returns `None`
    /// if the channel was explicitly closed.
    pub async fn next(&mut self) -> Option<Dispatch> {
        self.receiver.recv().await
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for Runloop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn creator_is_interaction_thread() {
        let runloop = Runloop::new();
        let dispatcher = runloop.dispatcher();
        assert!(dispatcher.is_interaction_thread());
        let remote = dispatcher.clone();
        let on_other = std::thread::spawn(move || remote.is_interaction_thread()).join().unwrap();
        assert!(!on_other);
    }

    #[test]
    fn tasks_run_in_post_order() {
        let mut runloop = Runloop::new();
        let dispatcher = runloop.dispatcher();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            assert!(dispatcher.post_task(move || log.lock().unwrap().push(i)));
        }
        assert_eq!(runloop.len(), 3);
        while let Some(item) = runloop.try_next() {
            if let Dispatch::Notify(task) = item {
                task();
            }
        }
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
        assert!(runloop.is_empty());
    }

    #[test]
    fn posts_from_other_threads_arrive() {
        let mut runloop = Runloop::new();
        let dispatcher = runloop.dispatcher();
        std::thread::spawn(move || {
            dispatcher.post_task(|| {});
        })
        .join()
        .unwrap();
        let next = tokio_test::block_on(runloop.next());
        assert!(matches!(next, Some(Dispatch::Notify(_))));
    }

    #[test]
    fn post_after_drop_reports_failure() {
        let runloop = Runloop::new();
        let dispatcher = runloop.dispatcher();
        drop(runloop);
        assert!(dispatcher.is_closed());
        assert!(!dispatcher.post_task(|| {}));
    }
}

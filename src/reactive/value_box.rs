//! ValueBox<T>: an observable, thread-safe container for one value.
//!
//! A box has at most one observer. `set` stores the new value immediately and
//! then notifies the observer on the interaction thread: directly when the
//! caller is already there, otherwise by posting a task to the attached
//! [`Dispatcher`]. Once any notification for a box is queued, later sets on
//! the interaction thread queue behind it, so notifications for one box are
//! never reordered.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::color::Color;
use crate::element::image::ImageSource;
use crate::event::Dispatcher;

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

/// Identifies a box for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(u64);

impl BoxId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        BoxId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifies one observer registration, so a stale owner cannot remove a
/// newer observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer<T> = Box<dyn FnMut(&T) + Send>;

struct Slot<T> {
    id: ObserverId,
    callback: Option<Observer<T>>,
}

struct Shared<T> {
    id: BoxId,
    value: Mutex<T>,
    observer: Mutex<Option<Slot<T>>>,
    next_observer: AtomicU64,
    /// Notifications posted to the dispatcher but not yet delivered.
    queued: AtomicUsize,
    /// Values waiting for the in-progress notification loop.
    pending: Mutex<VecDeque<T>>,
    notifying: AtomicBool,
    dispatcher: OnceLock<Dispatcher>,
}

/// Poisoning only means an observer panicked mid-notification; the stored
/// value is still consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// ValueBox
// ---------------------------------------------------------------------------

/// A shared, observable value. Clones refer to the same box.
pub struct ValueBox<T> {
    shared: Arc<Shared<T>>,
}

pub type ColorBox = ValueBox<Color>;
pub type TextBox = ValueBox<String>;
pub type ImageBox = ValueBox<ImageSource>;

impl<T> Clone for ValueBox<T> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBox")
            .field("id", &self.shared.id.0)
            .field("value", &*lock(&self.shared.value))
            .finish()
    }
}

impl<T: Clone + Send + 'static> ValueBox<T> {
    /// A detached box. It notifies synchronously until a dispatcher is attached.
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: BoxId::next(),
                value: Mutex::new(value),
                observer: Mutex::new(None),
                next_observer: AtomicU64::new(1),
                queued: AtomicUsize::new(0),
                pending: Mutex::new(VecDeque::new()),
                notifying: AtomicBool::new(false),
                dispatcher: OnceLock::new(),
            }),
        }
    }

    /// A box whose off-thread notifications are marshaled through `dispatcher`.
    pub fn with_dispatcher(value: T, dispatcher: Dispatcher) -> Self {
        let this = Self::new(value);
        this.attach(dispatcher);
        this
    }

    pub fn id(&self) -> BoxId {
        self.shared.id
    }

    /// Attach the interaction queue. The first attachment wins.
    pub fn attach(&self, dispatcher: Dispatcher) {
        if self.shared.dispatcher.set(dispatcher).is_err() {
            log::trace!("box {:?} already has a dispatcher", self.shared.id);
        }
    }

    pub fn get(&self) -> T {
        lock(&self.shared.value).clone()
    }

    /// Read by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.shared.value))
    }

    /// Store `value` and notify the observer, if any, exactly once.
    pub fn set(&self, value: T) {
        *lock(&self.shared.value) = value.clone();

        if let Some(dispatcher) = self.shared.dispatcher.get() {
            let behind_queue = self.shared.queued.load(Ordering::SeqCst) > 0;
            if behind_queue || !dispatcher.is_interaction_thread() {
                self.shared.queued.fetch_add(1, Ordering::SeqCst);
                let shared = Arc::clone(&self.shared);
                let queued = value.clone();
                if dispatcher.post_task(move || {
                    shared.queued.fetch_sub(1, Ordering::SeqCst);
                    Shared::notify(&shared, queued);
                }) {
                    log::debug!("box {:?}: notification marshaled to interaction thread", self.shared.id);
                    return;
                }
                // Run loop gone; nothing will drain the queue.
                self.shared.queued.fetch_sub(1, Ordering::SeqCst);
            }
        }
        Shared::notify(&self.shared, value);
    }

    /// Replace the observer. Returns a token for [`ValueBox::release`].
    pub fn observe(&self, observer: impl FnMut(&T) + Send + 'static) -> ObserverId {
        let id = ObserverId(self.shared.next_observer.fetch_add(1, Ordering::Relaxed));
        let previous = lock(&self.shared.observer).replace(Slot { id, callback: Some(Box::new(observer)) });
        if previous.is_some() {
            log::debug!("box {:?}: observer replaced", self.shared.id);
        }
        id
    }

    /// Remove whatever observer is registered.
    pub fn unobserve(&self) {
        lock(&self.shared.observer).take();
    }

    /// Remove the observer only if it is still the registration `id`.
    pub fn release(&self, id: ObserverId) -> bool {
        let mut slot = lock(&self.shared.observer);
        if slot.as_ref().is_some_and(|s| s.id == id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    pub fn has_observer(&self) -> bool {
        lock(&self.shared.observer).is_some()
    }

    /// Whether two handles refer to the same box.
    pub fn ptr_eq(&self, other: &ValueBox<T>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T: Send + 'static> Shared<T> {
    /// Deliver `value` to the observer. Re-entrant sets from inside the
    /// observer are queued and delivered after it returns.
    fn notify(this: &Arc<Shared<T>>, value: T) {
        lock(&this.pending).push_back(value);
        loop {
            if this.notifying.swap(true, Ordering::SeqCst) {
                return;
            }
            loop {
                let Some(value) = lock(&this.pending).pop_front() else {
                    break;
                };
                // Take the callback out so the observer may touch this box.
                let taken = lock(&this.observer).as_mut().and_then(|s| s.callback.take().map(|cb| (s.id, cb)));
                let Some((id, mut callback)) = taken else {
                    continue;
                };
                callback(&value);
                if let Some(slot) = lock(&this.observer).as_mut() {
                    if slot.id == id && slot.callback.is_none() {
                        slot.callback = Some(callback);
                    }
                }
            }
            this.notifying.store(false, Ordering::SeqCst);
            if lock(&this.pending).is_empty() {
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Type-erased binding
// ---------------------------------------------------------------------------

/// A box viewed without its value type, as the rendering pipeline sees it.
pub trait Binding: Send + Sync {
    fn box_id(&self) -> BoxId;
    /// Register `on_change` as the box's observer.
    fn watch(&self, on_change: Box<dyn FnMut() + Send>) -> ObserverId;
    /// Remove the observer if it is still `id`.
    fn release(&self, id: ObserverId) -> bool;
    fn is_observed(&self) -> bool;
    fn attach(&self, dispatcher: Dispatcher);
}

impl<T: Clone + Send + 'static> Binding for ValueBox<T> {
    fn box_id(&self) -> BoxId {
        self.id()
    }

    fn watch(&self, mut on_change: Box<dyn FnMut() + Send>) -> ObserverId {
        self.observe(move |_| on_change())
    }

    fn release(&self, id: ObserverId) -> bool {
        ValueBox::release(self, id)
    }

    fn is_observed(&self) -> bool {
        self.has_observer()
    }

    fn attach(&self, dispatcher: Dispatcher) {
        ValueBox::attach(self, dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Dispatch, Runloop};

    fn drain(runloop: &mut Runloop) -> usize {
        let mut n = 0;
        while let Some(item) = runloop.try_next() {
            if let Dispatch::Notify(task) = item {
                task();
                n += 1;
            }
        }
        n
    }

    fn recorder<T: Clone + Send + 'static>(b: &ValueBox<T>) -> Arc<Mutex<Vec<T>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        b.observe(move |v: &T| sink.lock().unwrap().push(v.clone()));
        seen
    }

    #[test]
    fn get_set_without_observer() {
        let b = ValueBox::new(1);
        b.set(2);
        assert_eq!(b.get(), 2);
        assert_eq!(b.with(|v| v * 10), 20);
    }

    #[test]
    fn set_notifies_once_per_call() {
        let b = ValueBox::new(String::from("a"));
        let seen = recorder(&b);
        b.set("b".into());
        b.set("c".into());
        assert_eq!(*seen.lock().unwrap(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn unrelated_boxes_are_isolated() {
        let a = ValueBox::new(0);
        let b = ValueBox::new(0);
        let seen_a = recorder(&a);
        let seen_b = recorder(&b);
        a.set(5);
        assert_eq!(*seen_a.lock().unwrap(), vec![5]);
        assert!(seen_b.lock().unwrap().is_empty());
    }

    #[test]
    fn unobserve_stops_notifications() {
        let b = ValueBox::new(0);
        let seen = recorder(&b);
        b.unobserve();
        b.set(1);
        assert!(seen.lock().unwrap().is_empty());
        assert!(!b.has_observer());
    }

    #[test]
    fn stale_release_keeps_newer_observer() {
        let b = ValueBox::new(0);
        let first = b.observe(|_| {});
        let second = b.observe(|_| {});
        assert!(!b.release(first));
        assert!(b.has_observer());
        assert!(b.release(second));
        assert!(!b.has_observer());
    }

    #[test]
    fn off_thread_set_is_marshaled() {
        let mut runloop = Runloop::new();
        let b = ValueBox::with_dispatcher(0, runloop.dispatcher());
        let seen = recorder(&b);

        let remote = b.clone();
        std::thread::spawn(move || {
            remote.set(1);
            remote.set(2);
        })
        .join()
        .unwrap();

        assert_eq!(b.get(), 2);
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(drain(&mut runloop), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn on_thread_set_queues_behind_pending() {
        let mut runloop = Runloop::new();
        let b = ValueBox::with_dispatcher(0, runloop.dispatcher());
        let seen = recorder(&b);

        let remote = b.clone();
        std::thread::spawn(move || remote.set(1)).join().unwrap();
        b.set(2);
        assert!(seen.lock().unwrap().is_empty());

        drain(&mut runloop);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);

        b.set(3);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn reentrant_set_is_delivered_after_observer_returns() {
        let b = ValueBox::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (sink, inner) = (seen.clone(), b.clone());
        b.observe(move |v: &i32| {
            sink.lock().unwrap().push(*v);
            if *v == 1 {
                inner.set(2);
            }
        });
        b.set(1);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn binding_watch_is_type_erased() {
        let b = ValueBox::new(Color::RED);
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let binding: Box<dyn Binding> = Box::new(b.clone());
        let token = binding.watch(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        b.set(Color::BLUE);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(binding.release(token));
        assert_eq!(binding.box_id(), b.id());
    }

    #[test]
    fn clones_share_identity() {
        let a = ValueBox::new(1);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), ValueBox::new(1).id());
    }
}

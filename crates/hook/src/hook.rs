use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

type Callback<A> = Box<dyn FnMut(&A) + Send>;

/// A registered callback. Owned by the hook's slot list.
struct Slot<A> {
    id: u64,
    once: bool,
    connected: Arc<AtomicBool>,
    callback: Mutex<Callback<A>>,
}

struct Slots<A> {
    list: Vec<Arc<Slot<A>>>,
    next_id: u64,
}

/// Type-erased removal so [`Connection`] does not carry the argument type.
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<A: 'static> Detach for Mutex<Slots<A>> {
    fn detach(&self, id: u64) {
        self.lock().list.retain(|slot| slot.id != id);
    }
}

/// Outcome of one [`Hook::fire`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireReport {
    /// Callbacks that ran to completion.
    pub invoked: usize,
    /// Callbacks that panicked.
    pub failed: usize,
    /// Callbacks skipped because they were already running (re-entrant fire).
    pub skipped: usize,
}

impl FireReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// An ordered list of callbacks invoked with the same arguments on every fire.
///
/// Cloning a hook yields another handle to the same connection list.
pub struct Hook<A> {
    slots: Arc<Mutex<Slots<A>>>,
}

impl<A: 'static> Hook<A> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots {
                list: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a callback. It stays connected until [`Connection::disconnect`].
    pub fn connect<F>(&self, callback: F) -> Connection
    where
        F: FnMut(&A) + Send + 'static,
    {
        self.register(Box::new(callback), false)
    }

    /// Register a callback that disconnects itself before its first invocation
    /// runs, so it fires at most once.
    pub fn once<F>(&self, callback: F) -> Connection
    where
        F: FnMut(&A) + Send + 'static,
    {
        self.register(Box::new(callback), true)
    }

    fn register(&self, callback: Callback<A>, once: bool) -> Connection {
        let connected = Arc::new(AtomicBool::new(true));
        let mut slots = self.slots.lock();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.list.push(Arc::new(Slot {
            id,
            once,
            connected: Arc::clone(&connected),
            callback: Mutex::new(callback),
        }));

        let weak: Weak<Mutex<Slots<A>>> = Arc::downgrade(&self.slots);
        let hook: Weak<dyn Detach> = weak;
        Connection {
            id,
            connected,
            hook,
        }
    }

    /// Invoke every connected callback with `args`, in connection order.
    pub fn fire(&self, args: &A) -> FireReport {
        // Snapshot so callbacks can connect/disconnect without holding the list lock.
        let snapshot: Vec<Arc<Slot<A>>> = self.slots.lock().list.clone();
        let mut report = FireReport::default();

        for slot in snapshot {
            if slot.once {
                if !slot.connected.swap(false, Ordering::AcqRel) {
                    continue;
                }
                self.slots.detach(slot.id);
            } else if !slot.connected.load(Ordering::Acquire) {
                continue;
            }

            let Some(mut callback) = slot.callback.try_lock() else {
                tracing::warn!(connection = slot.id, "hook callback is already running, skipped");
                report.skipped += 1;
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| (*callback)(args))) {
                Ok(()) => report.invoked += 1,
                Err(payload) => {
                    tracing::error!(
                        connection = slot.id,
                        reason = panic_message(payload.as_ref()),
                        "hook callback panicked"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.slots.lock().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Disconnect every connection.
    pub fn clear(&self) {
        let drained: Vec<Arc<Slot<A>>> = std::mem::take(&mut self.slots.lock().list);
        for slot in drained {
            slot.connected.store(false, Ordering::Release);
        }
    }
}

impl<A: 'static> Default for Hook<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Hook<A> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<A> std::fmt::Debug for Hook<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("connections", &self.slots.lock().list.len())
            .finish()
    }
}

/// Handle to a registered callback.
///
/// Dropping the handle does not disconnect; call [`Connection::disconnect`].
pub struct Connection {
    id: u64,
    connected: Arc<AtomicBool>,
    hook: Weak<dyn Detach>,
}

impl Connection {
    /// Remove the callback from its hook. Idempotent, and a no-op once the
    /// hook itself has been dropped.
    pub fn disconnect(&self) {
        if !self.connected.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(hook) = self.hook.upgrade() {
            hook.detach(self.id);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire) && self.hook.strong_count() > 0
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

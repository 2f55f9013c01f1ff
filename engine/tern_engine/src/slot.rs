//! Single-cell task mailboxes.
//!
//! These are deliberately not channels: a queue would replay every stale
//! keystroke, while a single overwritten cell collapses a burst into the
//! one request that still matters.

use parking_lot::{Condvar, Mutex};

/// A blocking wait was cancelled; the caller re-enters its outer loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Interrupted;

struct SlotState<T> {
    value: Option<T>,
    epoch: u64,
    closed: bool,
}

/// Capacity-one mailbox with overwrite-on-write semantics.
///
/// `set` replaces any unread task (dropping it, which cancels its future)
/// and never blocks. `get` blocks until a task exists and takes it, so
/// delivery is exactly-once per `set`. `interrupt_wait` cancels exactly the
/// readers blocked at the time of the call: each `get` snapshots a
/// generation counter on entry, and a bump only wakes waits that began
/// before it. `close` is the sticky variant for shutdown — it cancels the
/// current readers *and* every later `get`, so a worker that was mid-task
/// when shutdown fired still observes it on its next call.
pub(crate) struct LatestValueSlot<T> {
    state: Mutex<SlotState<T>>,
    cond: Condvar,
}

impl<T> LatestValueSlot<T> {
    pub fn new() -> Self {
        LatestValueSlot {
            state: Mutex::new(SlotState {
                value: None,
                epoch: 0,
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Install a task, overwriting any unread one.
    pub fn set(&self, value: T) {
        let mut state = self.state.lock();
        state.value = Some(value);
        drop(state);
        self.cond.notify_one();
    }

    /// Block until a task is present, then remove and return it.
    pub fn get(&self) -> Result<T, Interrupted> {
        let mut state = self.state.lock();
        let entry_epoch = state.epoch;
        loop {
            if state.closed || state.epoch != entry_epoch {
                return Err(Interrupted);
            }
            if let Some(value) = state.value.take() {
                return Ok(value);
            }
            self.cond.wait(&mut state);
        }
    }

    /// Wake every currently-blocked reader with a cancellation instead of a
    /// value. Readers arriving afterwards are unaffected.
    pub fn interrupt_wait(&self) {
        let mut state = self.state.lock();
        state.epoch = state.epoch.wrapping_add(1);
        drop(state);
        self.cond.notify_all();
    }

    /// Permanently cancel this slot: current readers wake with
    /// `Err(Interrupted)` and every later `get` fails the same way.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.cond.notify_all();
    }
}

impl<T> Default for LatestValueSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The parse path's single-task cell.
///
/// Unlike [`LatestValueSlot`] this does **not** overwrite: a submission made
/// while a task is queued or still executing is dropped. The asymmetry is
/// kept from the original design (see DESIGN.md); the cell stays "pending"
/// from submission until [`finish`](Self::finish) so the completion worker
/// can yield the parser to an in-flight update.
pub(crate) struct ParseCell<T> {
    state: Mutex<ParseCellState<T>>,
    cond: Condvar,
}

struct ParseCellState<T> {
    task: Option<T>,
    executing: bool,
    closed: bool,
}

impl<T> ParseCell<T> {
    pub fn new() -> Self {
        ParseCell {
            state: Mutex::new(ParseCellState {
                task: None,
                executing: false,
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Install a task if the cell is vacant. Returns whether it was taken.
    pub fn submit(&self, task: T) -> bool {
        let mut state = self.state.lock();
        if state.closed || state.executing || state.task.is_some() {
            return false;
        }
        state.task = Some(task);
        drop(state);
        self.cond.notify_one();
        true
    }

    /// Block until a task is queued, then take it and mark the cell
    /// executing. Returns `None` once the cell is closed.
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(task) = state.task.take() {
                state.executing = true;
                return Some(task);
            }
            self.cond.wait(&mut state);
        }
    }

    /// Mark the taken task as done, making the cell vacant again.
    pub fn finish(&self) {
        self.state.lock().executing = false;
    }

    /// Whether a task is queued or executing.
    pub fn pending(&self) -> bool {
        let state = self.state.lock();
        state.executing || state.task.is_some()
    }

    /// Permanently wake the consumer; `take` returns `None` from now on.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.cond.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn set_then_get_delivers() {
        let slot = LatestValueSlot::new();
        slot.set(7);
        assert_eq!(slot.get(), Ok(7));
    }

    #[test]
    fn overwrite_keeps_only_the_latest() {
        let slot = LatestValueSlot::new();
        slot.set(1);
        slot.set(2);
        slot.set(3);
        assert_eq!(slot.get(), Ok(3));
    }

    #[test]
    fn overwrite_drops_the_previous_task() {
        use std::sync::atomic::{AtomicBool, Ordering};

        struct DropProbe(Arc<AtomicBool>);
        impl Drop for DropProbe {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let dropped = Arc::new(AtomicBool::new(false));
        let slot = LatestValueSlot::new();
        slot.set(DropProbe(Arc::clone(&dropped)));
        assert!(!dropped.load(Ordering::SeqCst));
        slot.set(DropProbe(Arc::new(AtomicBool::new(false))));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn get_blocks_until_set() {
        let slot = Arc::new(LatestValueSlot::new());
        let reader = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || slot.get())
        };
        thread::sleep(Duration::from_millis(20));
        slot.set(42);
        assert_eq!(reader.join().unwrap(), Ok(42));
    }

    #[test]
    fn interrupt_cancels_a_blocked_reader() {
        let slot: Arc<LatestValueSlot<i32>> = Arc::new(LatestValueSlot::new());
        let reader = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || slot.get())
        };
        thread::sleep(Duration::from_millis(20));
        slot.interrupt_wait();
        assert_eq!(reader.join().unwrap(), Err(Interrupted));
    }

    #[test]
    fn interrupt_does_not_affect_later_readers() {
        let slot = LatestValueSlot::new();
        slot.interrupt_wait();
        slot.set(5);
        assert_eq!(slot.get(), Ok(5));
    }

    #[test]
    fn close_cancels_a_blocked_reader() {
        let slot: Arc<LatestValueSlot<i32>> = Arc::new(LatestValueSlot::new());
        let reader = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || slot.get())
        };
        thread::sleep(Duration::from_millis(20));
        slot.close();
        assert_eq!(reader.join().unwrap(), Err(Interrupted));
    }

    #[test]
    fn close_is_sticky_for_later_readers() {
        let slot = LatestValueSlot::new();
        slot.set(1);
        slot.close();
        // Even a queued task is unreachable once the slot is closed, and
        // every fresh call keeps failing.
        assert_eq!(slot.get(), Err(Interrupted));
        assert_eq!(slot.get(), Err(Interrupted));
    }

    #[test]
    fn parse_cell_lifecycle() {
        let cell = ParseCell::new();
        assert!(!cell.pending());

        assert!(cell.submit("first"));
        assert!(cell.pending());

        // Queued: a second submission is dropped.
        assert!(!cell.submit("second"));

        assert_eq!(cell.take(), Some("first"));
        // Executing: still pending, still refusing submissions.
        assert!(cell.pending());
        assert!(!cell.submit("third"));

        cell.finish();
        assert!(!cell.pending());
        assert!(cell.submit("fourth"));
    }

    #[test]
    fn parse_cell_close_wakes_consumer() {
        let cell: Arc<ParseCell<i32>> = Arc::new(ParseCell::new());
        let consumer = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || cell.take())
        };
        thread::sleep(Duration::from_millis(20));
        cell.close();
        assert_eq!(consumer.join().unwrap(), None);
        assert!(!cell.submit(1));
    }
}

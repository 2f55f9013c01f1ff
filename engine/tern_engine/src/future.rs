//! Single-shot promise/future pair for asynchronous completion results.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// Non-blocking observation of a future's state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Poll {
    Pending,
    Ready,
    Cancelled,
}

struct Inner<T> {
    value: Option<T>,
    done: bool,
}

struct Shared<T> {
    state: Mutex<Inner<T>>,
    cond: Condvar,
}

/// Write half of a single-shot future. Resolving consumes the promise;
/// dropping it unresolved cancels the future instead, which is how an
/// overwritten task cancels the request it carried.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
    resolved: bool,
}

/// Read half: blocking `wait` or non-blocking `poll`.
pub struct TaskFuture<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T> {
    /// Create a connected promise/future pair.
    pub fn pair() -> (Promise<T>, TaskFuture<T>) {
        let shared = Arc::new(Shared {
            state: Mutex::new(Inner {
                value: None,
                done: false,
            }),
            cond: Condvar::new(),
        });
        (
            Promise {
                shared: Arc::clone(&shared),
                resolved: false,
            },
            TaskFuture { shared },
        )
    }

    /// Resolve the future with a value, exactly once.
    pub fn resolve(mut self, value: T) {
        self.resolved = true;
        let mut inner = self.shared.state.lock();
        inner.value = Some(value);
        inner.done = true;
        drop(inner);
        self.shared.cond.notify_all();
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let mut inner = self.shared.state.lock();
        inner.done = true;
        drop(inner);
        self.shared.cond.notify_all();
    }
}

impl<T> TaskFuture<T> {
    /// A future that is already resolved with `value`.
    pub fn ready(value: T) -> Self {
        TaskFuture {
            shared: Arc::new(Shared {
                state: Mutex::new(Inner {
                    value: Some(value),
                    done: true,
                }),
                cond: Condvar::new(),
            }),
        }
    }

    /// Block until the future resolves. `None` means the request was
    /// cancelled by a newer one.
    pub fn wait(self) -> Option<T> {
        let mut inner = self.shared.state.lock();
        loop {
            if inner.done {
                return inner.value.take();
            }
            self.shared.cond.wait(&mut inner);
        }
    }

    /// Observe the current state without blocking.
    pub fn poll(&self) -> Poll {
        let inner = self.shared.state.lock();
        if !inner.done {
            Poll::Pending
        } else if inner.value.is_some() {
            Poll::Ready
        } else {
            Poll::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn resolve_then_wait() {
        let (promise, future) = Promise::pair();
        promise.resolve(11);
        assert_eq!(future.poll(), Poll::Ready);
        assert_eq!(future.wait(), Some(11));
    }

    #[test]
    fn wait_blocks_until_resolved() {
        let (promise, future) = Promise::pair();
        let waiter = thread::spawn(move || future.wait());
        thread::sleep(Duration::from_millis(20));
        promise.resolve("done");
        assert_eq!(waiter.join().unwrap(), Some("done"));
    }

    #[test]
    fn dropping_the_promise_cancels() {
        let (promise, future) = Promise::pair();
        assert_eq!(future.poll(), Poll::Pending);
        drop(promise);
        assert_eq!(future.poll(), Poll::Cancelled);
        assert_eq!(future.wait(), None::<i32>);
    }

    #[test]
    fn ready_future_is_immediately_resolved() {
        let future = TaskFuture::ready(Vec::<i32>::new());
        assert_eq!(future.poll(), Poll::Ready);
        assert_eq!(future.wait(), Some(Vec::new()));
    }

    #[test]
    fn poll_transitions_once() {
        let (promise, future) = Promise::pair();
        assert_eq!(future.poll(), Poll::Pending);
        promise.resolve(1);
        assert_eq!(future.poll(), Poll::Ready);
        assert_eq!(future.poll(), Poll::Ready);
    }
}

//! Observable state container shared by every controller.
//!
//! A thin wrapper over `tokio::sync::watch`: the controller owns the single
//! sender, any number of renderers hold receivers. All mutations go through
//! closures that run under the channel's lock, so a check-and-set (the
//! load-more guard, the stale-generation check) is atomic with respect to
//! other mutations.

use tokio::sync::watch;

/// Published state of one controller.
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    /// Creates an observable holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Returns a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Reads the current value without cloning it.
    ///
    /// `f` runs under the channel's read lock; keep it short.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Returns a receiver that is notified on every published change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Mutates the value and notifies subscribers.
    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Mutates the value, notifying subscribers only if `f` returns `true`.
    ///
    /// Returns what `f` returned.
    pub fn modify_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let mut modified = false;
        self.tx.send_if_modified(|value| {
            modified = f(value);
            modified
        });
        modified
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

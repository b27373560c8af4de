// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Single-slot callback registry shared between a driver and its interrupt
//! handler.
//!
//! Every interrupt-driven peripheral holds one `ClientSlot` per interrupt
//! source. The main flow of execution registers a client with
//! [`ClientSlot::set`]; the interrupt handler calls [`ClientSlot::dispatch`]
//! to notify it. Both sides go through a critical section, so a handler
//! never observes a half-written slot and a replaced client is never called
//! after `set` returns.
//!
//! Usage
//! -----
//!
//! ```
//! use kernel::utilities::client_slot::ClientSlot;
//!
//! trait Client {
//!     fn fired(&self);
//! }
//!
//! struct Counter(core::cell::Cell<u8>);
//! impl Client for Counter {
//!     fn fired(&self) {
//!         self.0.set(self.0.get() + 1);
//!     }
//! }
//!
//! let counter = Counter(core::cell::Cell::new(0));
//! let slot: ClientSlot<dyn Client> = ClientSlot::empty();
//! assert!(!slot.dispatch(|c| c.fired()));
//! slot.set(&counter);
//! assert!(slot.dispatch(|c| c.fired()));
//! assert_eq!(counter.0.get(), 1);
//! ```

use core::cell::Cell;

use critical_section::Mutex;

use crate::config::CONFIG;

/// Holds at most one client reference.
///
/// `C` is usually a `dyn Trait` describing the callbacks of one peripheral.
pub struct ClientSlot<'a, C: ?Sized + 'a> {
    client: Mutex<Cell<Option<&'a C>>>,
}

impl<'a, C: ?Sized + 'a> ClientSlot<'a, C> {
    pub const fn empty() -> ClientSlot<'a, C> {
        ClientSlot {
            client: Mutex::new(Cell::new(None)),
        }
    }

    /// Register `client`, replacing any previous occupant.
    pub fn set(&self, client: &'a C) {
        critical_section::with(|cs| self.client.borrow(cs).set(Some(client)));
    }

    pub fn clear(&self) {
        self.take();
    }

    /// Remove and return the registered client.
    pub fn take(&self) -> Option<&'a C> {
        critical_section::with(|cs| self.client.borrow(cs).take())
    }

    pub fn is_some(&self) -> bool {
        critical_section::with(|cs| self.client.borrow(cs).get().is_some())
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    /// Invoke `f` on the registered client.
    ///
    /// Returns `false` without calling `f` if the slot is empty. `f` runs
    /// inside the critical section and must not block.
    pub fn dispatch<F>(&self, f: F) -> bool
    where
        F: FnOnce(&'a C),
    {
        critical_section::with(|cs| match self.client.borrow(cs).get() {
            Some(client) => {
                f(client);
                true
            }
            None => {
                if CONFIG.trace_dispatch {
                    log::trace!("interrupt dispatched with no client registered");
                }
                false
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use core::cell::Cell;

    trait Client {
        fn fired(&self, value: u16);
    }

    struct Recorder {
        calls: Cell<usize>,
        last: Cell<u16>,
    }

    impl Recorder {
        fn new() -> Recorder {
            Recorder {
                calls: Cell::new(0),
                last: Cell::new(0),
            }
        }
    }

    impl Client for Recorder {
        fn fired(&self, value: u16) {
            self.calls.set(self.calls.get() + 1);
            self.last.set(value);
        }
    }

    #[test]
    fn empty_slot_dispatch_is_noop() {
        let slot: ClientSlot<dyn Client> = ClientSlot::empty();
        assert!(slot.is_none());
        assert!(!slot.dispatch(|c| c.fired(1)));
    }

    #[test]
    fn dispatch_reaches_registered_client() {
        let rec = Recorder::new();
        let slot: ClientSlot<dyn Client> = ClientSlot::empty();
        slot.set(&rec);
        assert!(slot.is_some());
        assert!(slot.dispatch(|c| c.fired(42)));
        assert_eq!(rec.calls.get(), 1);
        assert_eq!(rec.last.get(), 42);
    }

    #[test]
    fn replaced_client_never_runs_for_pending_interrupt() {
        let old = Recorder::new();
        let new = Recorder::new();
        let slot: ClientSlot<dyn Client> = ClientSlot::empty();
        slot.set(&old);

        // The interrupt becomes pending here, then the client is swapped
        // before the handler gets to run.
        slot.set(&new);
        assert!(slot.dispatch(|c| c.fired(7)));

        assert_eq!(old.calls.get(), 0);
        assert_eq!(new.calls.get(), 1);
        assert_eq!(new.last.get(), 7);
    }

    #[test]
    fn take_empties_the_slot() {
        let rec = Recorder::new();
        let slot: ClientSlot<dyn Client> = ClientSlot::empty();
        slot.set(&rec);
        assert!(slot.take().is_some());
        assert!(slot.take().is_none());
        assert!(!slot.dispatch(|c| c.fired(3)));

        slot.set(&rec);
        slot.clear();
        assert!(!slot.dispatch(|c| c.fired(3)));
        assert_eq!(rec.calls.get(), 0);
    }
}

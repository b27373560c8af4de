// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Peripheral implementations for the ATmega32 8-bit AVR microcontroller.
//!
//! Register addresses are data-space addresses (I/O address + 0x20), which
//! is how the core sees them through ordinary loads and stores.

#![no_std]

pub mod adc;
pub mod chip;
pub mod delay;
pub mod exti;
pub mod gpio;
pub mod icu;
pub mod interrupts;
pub mod spi;
pub mod wdt;

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(test)]
mod test {
    use kernel::utilities::StaticRef;
    use std::boxed::Box;

    /// A zero-initialised register block in RAM standing in for the
    /// peripheral.
    pub fn zeroed_registers<T: 'static>() -> StaticRef<T> {
        // SAFETY: register blocks are plain byte cells, for which all-zero
        // is a valid value. The block is leaked so it lives for the rest of
        // the test process.
        let block: &'static T = Box::leak(Box::new(unsafe { core::mem::zeroed::<T>() }));
        unsafe { StaticRef::new(block as *const T) }
    }
}

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Clock frequencies and blocking delays.

/// An integer frequency in hertz.
///
/// Implemented by zero-sized marker types so that drivers can be calibrated
/// to the system clock at compile time.
pub trait Frequency {
    /// Returns frequency in Hz.
    fn frequency() -> u32;
}

/// 1 MHz `Frequency`
#[derive(Debug)]
pub struct Freq1MHz;
impl Frequency for Freq1MHz {
    fn frequency() -> u32 {
        1_000_000
    }
}

/// 8 MHz `Frequency`
#[derive(Debug)]
pub struct Freq8MHz;
impl Frequency for Freq8MHz {
    fn frequency() -> u32 {
        8_000_000
    }
}

/// 16 MHz `Frequency`
#[derive(Debug)]
pub struct Freq16MHz;
impl Frequency for Freq16MHz {
    fn frequency() -> u32 {
        16_000_000
    }
}

/// Busy-waiting delays.
///
/// Both calls block the caller for at least the requested duration.
/// Interrupts keep running while a delay is in progress, so the actual time
/// spent may be longer.
pub trait Delay {
    fn delay_ms(&self, ms: u32);
    fn delay_us(&self, us: u32);
}

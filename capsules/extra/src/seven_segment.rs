// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Multi-digit seven segment display behind a BCD to seven segment decoder.
//!
//! The decoder (a 7447 or similar) takes the digit on four data lines and
//! drives the segments itself. Each digit has an enable pin; the digit is
//! lit while its enable pin is high. Only one digit is lit at a time, so a
//! multi-digit number is shown by calling [`SevenSegment::write`] for each
//! digit in turn, fast enough that the eye does not notice.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let display = SevenSegment::new(
//!     [ports.pin(PinId::Pc0), ports.pin(PinId::Pc1), ports.pin(PinId::Pc2), ports.pin(PinId::Pc3)],
//!     [ports.pin(PinId::Pa4), ports.pin(PinId::Pa5)],
//! );
//! display.init();
//! display.write(0, 4)?;
//! ```

use kernel::hil::gpio;
use kernel::ErrorCode;

pub struct SevenSegment<'a, P: gpio::Output + gpio::Configure, const NUM_DIGITS: usize> {
    /// Decoder inputs, least significant bit first.
    data: [&'a P; 4],
    enables: [&'a P; NUM_DIGITS],
}

impl<'a, P: gpio::Output + gpio::Configure, const NUM_DIGITS: usize>
    SevenSegment<'a, P, NUM_DIGITS>
{
    pub fn new(data: [&'a P; 4], enables: [&'a P; NUM_DIGITS]) -> Self {
        Self { data, enables }
    }

    /// Make all pins outputs and blank the display.
    pub fn init(&self) {
        for pin in self.data.iter().chain(self.enables.iter()) {
            pin.make_output();
        }
        self.clear_all();
    }

    pub fn num_digits(&self) -> usize {
        NUM_DIGITS
    }

    /// Show `value` on digit `index`, blanking all other digits. Only the
    /// low nibble of `value` is sent to the decoder.
    pub fn write(&self, index: usize, value: u8) -> Result<(), ErrorCode> {
        let enable = self.enables.get(index).ok_or(ErrorCode::INVAL)?;

        self.clear_all();
        for (bit, pin) in self.data.iter().enumerate() {
            if value & (1 << bit) != 0 {
                pin.set();
            } else {
                pin.clear();
            }
        }
        enable.set();
        Ok(())
    }

    /// Blank every digit.
    pub fn clear_all(&self) {
        for pin in self.enables.iter() {
            pin.clear();
        }
    }
}

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Interfaces for digital input and output pins.

/// Enum for configuring any pull-up or pull-down resistors on the GPIO pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatingState {
    PullUp,
    PullDown,
    PullNone,
}

/// The Pin trait allows a pin to be used as either input or output and to be
/// configured.
pub trait Pin: Input + Output + Configure {}

impl<T: Input + Output + Configure> Pin for T {}

pub trait Configure {
    /// Make the pin an output. The output level is whatever was last
    /// written with `set` or `clear`.
    fn make_output(&self);

    /// Make the pin an input.
    fn make_input(&self);

    /// Configure the input resistor. Chips that cannot provide the requested
    /// state leave the pin floating.
    fn set_floating_state(&self, state: FloatingState);

    fn floating_state(&self) -> FloatingState;

    fn is_output(&self) -> bool;

    fn is_input(&self) -> bool {
        !self.is_output()
    }
}

pub trait Output {
    /// Set the GPIO pin high. If the pin is not an output this may instead
    /// change the floating state of the pin.
    fn set(&self);

    /// Set the GPIO pin low.
    fn clear(&self);

    /// Toggle the GPIO pin and return the new value of the pin.
    fn toggle(&self) -> bool;
}

pub trait Input {
    /// Get the current state of an input GPIO pin. For an output pin, return
    /// the output level.
    fn read(&self) -> bool;
}

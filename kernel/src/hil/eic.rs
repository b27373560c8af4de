// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Interface for external interrupt controllers.
//!
//! A basic use case: a user button is wired to an interrupt line configured
//! for falling edge trigger, and the client toggles an LED in `fired`.

use crate::ErrorCode;

/// Condition on the pin that raises the interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptMode {
    LowLevel,
    AnyChange,
    FallingEdge,
    RisingEdge,
}

/// Interface for EIC.
pub trait ExternalInterruptController<'a> {
    type Line: Copy;

    /// Configure the line's pin as an input, select `mode`, register
    /// `client` and enable the interrupt.
    ///
    /// Returns `INVAL` if the line cannot detect `mode`.
    fn line_enable(
        &self,
        line: Self::Line,
        mode: InterruptMode,
        client: &'a dyn Client,
    ) -> Result<(), ErrorCode>;

    /// Disable the interrupt on `line` and drop its client.
    fn line_disable(&self, line: Self::Line);
}

/// External interrupts addressed by the GPIO pin they are wired to.
///
/// Lets a driver that only knows its pin, such as a button, attach to the
/// interrupt line behind it.
pub trait PinInterrupts<'a> {
    type Pin: Copy;

    /// Enable the interrupt wired to `pin` for `mode`.
    ///
    /// Returns `NOSUPPORT` if the pin has no external interrupt and `INVAL`
    /// if its line cannot detect `mode`.
    fn pin_enable(
        &self,
        pin: Self::Pin,
        mode: InterruptMode,
        client: &'a dyn Client,
    ) -> Result<(), ErrorCode>;

    /// Returns `NOSUPPORT` if the pin has no external interrupt.
    fn pin_disable(&self, pin: Self::Pin) -> Result<(), ErrorCode>;
}

/// Interface for users of EIC. In order to execute interrupts, the user must
/// implement this `Client` interface.
pub trait Client {
    /// Called from interrupt context when the line fires.
    fn fired(&self);
}

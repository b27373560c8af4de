// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Interface for timer input capture units.
//!
//! An input capture unit runs a free-running counter and, when the
//! configured edge appears on its capture pin, latches the counter value and
//! raises an interrupt. The chip driver forwards that interrupt to the
//! registered [`CaptureClient`], which usually reads the latched value and
//! re-arms the unit for the opposite edge.
//!
//! Global interrupts must be enabled by the board for `on_edge` to be
//! delivered.

/// Signal edge the capture unit latches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Falling,
    Rising,
}

/// Counter clock source, as a division of the system clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prescaler {
    /// The counter is stopped.
    NoClock,
    Div1,
    Div8,
    Div64,
    Div256,
    Div1024,
}

impl Prescaler {
    /// Number of system clock cycles per counter tick, or `None` if the
    /// counter is stopped.
    pub const fn divisor(self) -> Option<u16> {
        match self {
            Prescaler::NoClock => None,
            Prescaler::Div1 => Some(1),
            Prescaler::Div8 => Some(8),
            Prescaler::Div64 => Some(64),
            Prescaler::Div256 => Some(256),
            Prescaler::Div1024 => Some(1024),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    pub prescaler: Prescaler,
    pub initial_edge: Edge,
    /// Require the capture input to be stable for several samples before an
    /// edge is recognised. Delays the capture by a few clock cycles.
    pub noise_canceler: bool,
}

/// Receives capture events.
pub trait CaptureClient {
    /// Called from interrupt context each time the armed edge is captured.
    fn on_edge(&self);
}

pub trait Capture<'a> {
    /// Put the counter in normal mode at the configured prescaler, arm the
    /// initial edge, reset counter and latch to zero and enable the capture
    /// interrupt.
    fn init(&self, config: &CaptureConfig);

    /// Select the edge for the next capture. Safe to call from `on_edge`.
    fn set_edge(&self, edge: Edge);

    fn edge(&self) -> Edge;

    /// Counter value latched at the most recent captured edge.
    fn capture_value(&self) -> u16;

    /// Reset the running counter to zero and forget any earlier overflow.
    fn clear_counter(&self);

    /// Whether the counter wrapped past its maximum since the last
    /// `clear_counter` (or `init`).
    fn counter_overflowed(&self) -> bool;

    fn set_noise_canceler(&self, enable: bool);

    fn set_client(&self, client: &'a dyn CaptureClient);

    /// Stop the counter, reset the unit and disable its interrupt. The
    /// registered client is dropped.
    fn deinit(&self);
}

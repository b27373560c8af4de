// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Interfaces for analog to digital converters.

use crate::ErrorCode;

/// Trait for handling callbacks from the ADC.
pub trait Client {
    /// Called from interrupt context when an interrupt-driven conversion
    /// finishes.
    fn sample_ready(&self, sample: u16);
}

/// Single-sample interface for an ADC with one conversion unit.
pub trait Adc<'a> {
    type Channel: PartialEq;

    /// Convert `channel` and busy-wait for the result.
    ///
    /// The conversion-complete interrupt is masked for the duration so the
    /// client is not notified of this sample.
    fn sample_blocking(&self, channel: &Self::Channel) -> u16;

    /// Start a conversion on `channel`. The result is delivered through
    /// `Client::sample_ready`.
    ///
    /// Returns `BUSY` if a conversion is already running and `OFF` if the
    /// conversion-complete interrupt is disabled.
    fn sample(&self, channel: &Self::Channel) -> Result<(), ErrorCode>;

    /// Number of bits in a sample.
    fn get_resolution_bits(&self) -> usize;

    /// Voltage reference in millivolts, or `None` if it is supplied
    /// externally and unknown.
    fn get_voltage_reference_mv(&self) -> Option<usize>;

    fn set_client(&self, client: &'a dyn Client);
}

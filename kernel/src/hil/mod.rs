// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Public traits for interfaces between capsules and chip peripherals.

pub mod adc;
pub mod capture;
pub mod eic;
pub mod gpio;
pub mod spi;
pub mod time;
pub mod watchdog;

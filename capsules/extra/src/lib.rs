// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Sensor and display drivers built on the HIL.

#![forbid(unsafe_code)]
#![no_std]

pub mod hc_sr04;
pub mod lm35;
pub mod seven_segment;

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;

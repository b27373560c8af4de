// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Small drivers built only on the HIL.

#![forbid(unsafe_code)]
#![no_std]

pub mod button;
pub mod led;

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Core types shared by the chip and capsule crates.
//!
//! This crate holds the hardware interface layer (HIL): the traits that
//! describe what a peripheral can do independent of the microcontroller that
//! provides it. Chip crates implement the HIL on top of memory-mapped
//! registers; capsules are written against the HIL only, so a sensor driver
//! can run on any chip (or on a fake implementation in host tests).
//!
//! The crate also provides the small amount of shared machinery the drivers
//! need:
//!
//! - [`ErrorCode`], the error type used across HIL boundaries.
//! - [`utilities::client_slot::ClientSlot`], the single-slot callback registry
//!   every interrupt-driven peripheral uses to notify its client.
//! - [`utilities::StaticRef`] and a re-export of the register interface for
//!   describing peripheral register blocks.
//!
//! There is no scheduler and no operating system underneath. Interrupt
//! handlers preempt the main flow of execution; the only synchronization
//! primitives used are critical sections and atomics.

#![no_std]

pub mod config;
pub mod errorcode;
pub mod hil;
pub mod utilities;

pub use crate::errorcode::ErrorCode;

// This is used to run the tests on a host
#[cfg(test)]
#[macro_use]
extern crate std;

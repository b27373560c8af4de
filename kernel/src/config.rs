// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Data structure for storing compile-time configuration options.
//!
//! Configuration lives in a `const` object rather than behind `#[cfg]`
//! attributes so that every code path is type-checked regardless of which
//! options are enabled. After type-checking the compiler folds the constants
//! and removes disabled branches, so a disabled option costs nothing in the
//! final image.
//!
//! This is the only place in the kernel crate where `cfg!` is used to read
//! Cargo features.

/// Data structure holding compile-time configuration options.
pub struct Config {
    /// Whether [`ClientSlot::dispatch`] should emit a `trace` log record when
    /// an interrupt fires with no client registered.
    ///
    /// Logging from interrupt context is slow on small targets, so this is
    /// only meant for bring-up of a new board.
    ///
    /// [`ClientSlot::dispatch`]: crate::utilities::client_slot::ClientSlot::dispatch
    pub trace_dispatch: bool,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined.
pub const CONFIG: Config = Config {
    trace_dispatch: cfg!(feature = "trace_dispatch"),
};

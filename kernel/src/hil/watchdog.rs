// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Interface for a watchdog timer.

pub trait Watchdog {
    /// Hardware-specific timeout selection.
    type Timeout: Copy;

    /// Enable the watchdog timer. The chip resets if it is not serviced
    /// within `timeout`.
    fn start(&self, timeout: Self::Timeout);

    /// Disable the watchdog timer.
    fn stop(&self);
}

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Busy-wait delays calibrated to the CPU clock.

use core::marker::PhantomData;

use kernel::hil::time::{Delay, Frequency};

/// CPU cycles in one iteration of the countdown in `spin` on AVR: the
/// `black_box` round trip through the stack, a 16-bit decrement and the
/// branch.
const CYCLES_PER_ITERATION: u32 = 8;

/// Spins the CPU for the requested time.
///
/// `F` is the CPU clock. Time spent in interrupt handlers during the wait
/// is not accounted for.
pub struct BusyDelay<F: Frequency> {
    _frequency: PhantomData<F>,
}

impl<F: Frequency> BusyDelay<F> {
    pub const fn new() -> BusyDelay<F> {
        BusyDelay {
            _frequency: PhantomData,
        }
    }

    /// Loop iterations for `us` microseconds. Callers keep `us` at or below
    /// 1000 so the count fits the 16-bit counter.
    fn iterations(us: u32) -> u16 {
        let cycles = us * (F::frequency() / 1000) / 1000;
        u16::try_from(cycles / CYCLES_PER_ITERATION).unwrap_or(u16::MAX)
    }

    fn spin(iterations: u16) {
        let mut remaining = iterations;
        while remaining != 0 {
            remaining = core::hint::black_box(remaining) - 1;
        }
    }
}

impl<F: Frequency> Delay for BusyDelay<F> {
    fn delay_ms(&self, ms: u32) {
        let per_ms = Self::iterations(1000);
        for _ in 0..ms {
            Self::spin(per_ms);
        }
    }

    fn delay_us(&self, us: u32) {
        self.delay_ms(us / 1000);
        Self::spin(Self::iterations(us % 1000));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use kernel::hil::time::{Freq16MHz, Freq1MHz, Freq8MHz};

    #[test]
    fn iterations_scale_with_clock() {
        assert_eq!(BusyDelay::<Freq1MHz>::iterations(1000), 125);
        assert_eq!(BusyDelay::<Freq8MHz>::iterations(1000), 1000);
        assert_eq!(BusyDelay::<Freq16MHz>::iterations(1000), 2000);
        assert_eq!(BusyDelay::<Freq16MHz>::iterations(10), 20);
        assert_eq!(BusyDelay::<Freq1MHz>::iterations(0), 0);
    }

    #[test]
    fn millisecond_count_fits_counter_at_fastest_clock() {
        struct Freq20MHz;
        impl Frequency for Freq20MHz {
            fn frequency() -> u32 {
                20_000_000
            }
        }
        assert_eq!(BusyDelay::<Freq20MHz>::iterations(1000), 2500);
        assert_eq!(BusyDelay::<Freq20MHz>::iterations(999), 2497);
    }

    #[test]
    fn delays_return() {
        let delay = BusyDelay::<Freq16MHz>::new();
        delay.delay_us(50);
        delay.delay_us(2500);
        delay.delay_ms(2);
    }
}

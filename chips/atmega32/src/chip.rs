// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Interrupt routing for the ATmega32.

use crate::adc::{self, Adc};
use crate::exti::{self, Exti, Line};
use crate::gpio::Ports;
use crate::icu::{self, Icu};
use crate::interrupts;
use crate::spi::{self, Spi};
use crate::wdt::{self, Watchdog};

/// The chip's interrupt-capable peripherals.
///
/// A board allocates one of these statically and calls
/// [`Atmega32::service_interrupt`] from each vector stub it installs.
pub struct Atmega32<'a> {
    pub icu: Icu<'a>,
    pub adc: Adc<'a>,
    pub spi: Spi<'a>,
    pub exti: Exti<'a>,
    pub watchdog: Watchdog,
}

impl<'a> Atmega32<'a> {
    pub const fn new(ports: &'a Ports) -> Atmega32<'a> {
        Atmega32 {
            icu: Icu::new(icu::TIMER1_BASE, icu::TIMER_INTERRUPT_BASE, ports),
            adc: Adc::new(adc::ADC_BASE, adc::SFIOR_BASE),
            spi: Spi::new(spi::SPI_BASE, ports),
            exti: Exti::new(exti::MCU_CONTROL_BASE, exti::GENERAL_INTERRUPT_BASE, ports),
            watchdog: Watchdog::new(wdt::WATCHDOG_BASE),
        }
    }

    /// Run the driver for interrupt `vector`.
    ///
    /// Returns `false` if no driver handles the vector.
    pub fn service_interrupt(&self, vector: u8) -> bool {
        match vector {
            interrupts::INT0 => self.exti.handle_interrupt(Line::Int0),
            interrupts::INT1 => self.exti.handle_interrupt(Line::Int1),
            interrupts::INT2 => self.exti.handle_interrupt(Line::Int2),
            interrupts::TIMER1_CAPT => self.icu.handle_interrupt(),
            interrupts::SPI_STC => self.spi.handle_interrupt(),
            interrupts::ADC => self.adc.handle_interrupt(),
            _ => return false,
        }
        true
    }
}

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Watchdog timer.

use kernel::hil;
use kernel::utilities::registers::interfaces::{ReadWriteable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, ReadWrite};
use kernel::utilities::StaticRef;

register_structs! {
    pub WatchdogRegisters {
        (0x00 => wdtcr: ReadWrite<u8, WDTCR::Register>),
        (0x01 => @END),
    }
}

register_bitfields![u8,
    WDTCR [
        /// Turn-off enable, must be set in the same write as WDE before
        /// the watchdog can be disabled
        WDTOE OFFSET(4) NUMBITS(1) [],
        WDE OFFSET(3) NUMBITS(1) [],
        WDP OFFSET(0) NUMBITS(3) []
    ]
];

pub const WATCHDOG_BASE: StaticRef<WatchdogRegisters> =
    unsafe { StaticRef::new(0x41 as *const WatchdogRegisters) };

/// Oscillator cycles before reset. Times are nominal at VCC = 5 V.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Timeout {
    Ms16 = 0,
    Ms32 = 1,
    Ms65 = 2,
    Ms130 = 3,
    Ms260 = 4,
    Ms520 = 5,
    S1_0 = 6,
    S2_1 = 7,
}

pub struct Watchdog {
    registers: StaticRef<WatchdogRegisters>,
}

impl Watchdog {
    pub const fn new(registers: StaticRef<WatchdogRegisters>) -> Watchdog {
        Watchdog { registers }
    }
}

impl hil::watchdog::Watchdog for Watchdog {
    type Timeout = Timeout;

    fn start(&self, timeout: Timeout) {
        self.registers
            .wdtcr
            .modify(WDTCR::WDE::SET + WDTCR::WDP.val(timeout as u8));
        log::debug!("wdt: started, timeout {:?}", timeout);
    }

    fn stop(&self) {
        // The second write must follow within four cycles.
        critical_section::with(|_| {
            self.registers
                .wdtcr
                .modify(WDTCR::WDTOE::SET + WDTCR::WDE::SET);
            self.registers.wdtcr.set(0);
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::zeroed_registers;
    use kernel::hil::watchdog::Watchdog as _;
    use kernel::utilities::registers::interfaces::Readable;

    #[test]
    fn start_selects_timeout() {
        let registers = zeroed_registers::<WatchdogRegisters>();
        let wdt = Watchdog::new(registers);
        wdt.start(Timeout::S2_1);
        assert!(registers.wdtcr.is_set(WDTCR::WDE));
        assert_eq!(registers.wdtcr.read(WDTCR::WDP), 7);

        wdt.start(Timeout::Ms130);
        assert_eq!(registers.wdtcr.read(WDTCR::WDP), 3);
    }

    #[test]
    fn stop_clears_register() {
        let registers = zeroed_registers::<WatchdogRegisters>();
        let wdt = Watchdog::new(registers);
        wdt.start(Timeout::Ms16);
        wdt.stop();
        assert_eq!(registers.wdtcr.get(), 0);
    }
}

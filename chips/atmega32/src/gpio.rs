// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! General purpose I/O on ports A to D.
//!
//! Each port has three registers: `PINx` reads the pin levels, `DDRx`
//! selects the direction (1 = output) and `PORTx` drives an output or, for
//! an input, enables the internal pull-up.

use kernel::hil;
use kernel::utilities::registers::{register_structs, ReadWrite};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use kernel::utilities::registers::interfaces::{Readable, Writeable};

register_structs! {
    pub PortRegisters {
        (0x00 => pin: ReadWrite<u8>),
        (0x01 => ddr: ReadWrite<u8>),
        (0x02 => port: ReadWrite<u8>),
        (0x03 => @END),
    }
}

const PORTA_BASE: StaticRef<PortRegisters> =
    unsafe { StaticRef::new(0x39 as *const PortRegisters) };
const PORTB_BASE: StaticRef<PortRegisters> =
    unsafe { StaticRef::new(0x36 as *const PortRegisters) };
const PORTC_BASE: StaticRef<PortRegisters> =
    unsafe { StaticRef::new(0x33 as *const PortRegisters) };
const PORTD_BASE: StaticRef<PortRegisters> =
    unsafe { StaticRef::new(0x30 as *const PortRegisters) };

/// Register blocks of ports A, B, C and D, in that order.
pub const PORT_REGISTERS: [StaticRef<PortRegisters>; 4] =
    [PORTA_BASE, PORTB_BASE, PORTC_BASE, PORTD_BASE];

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinId {
    Pa0 = 0, Pa1 = 1, Pa2 = 2, Pa3 = 3, Pa4 = 4, Pa5 = 5, Pa6 = 6, Pa7 = 7,
    Pb0 = 8, Pb1 = 9, Pb2 = 10, Pb3 = 11, Pb4 = 12, Pb5 = 13, Pb6 = 14, Pb7 = 15,
    Pc0 = 16, Pc1 = 17, Pc2 = 18, Pc3 = 19, Pc4 = 20, Pc5 = 21, Pc6 = 22, Pc7 = 23,
    Pd0 = 24, Pd1 = 25, Pd2 = 26, Pd3 = 27, Pd4 = 28, Pd5 = 29, Pd6 = 30, Pd7 = 31,
}

impl PinId {
    /// Index of the port (0 = A .. 3 = D).
    pub const fn port(self) -> usize {
        (self as u8 >> 3) as usize
    }

    /// Bit position within the port.
    pub const fn bit(self) -> u8 {
        self as u8 & 0x7
    }
}

pub struct GpioPin {
    registers: StaticRef<PortRegisters>,
    mask: u8,
}

impl GpioPin {
    const fn new(registers: StaticRef<PortRegisters>, bit: u8) -> GpioPin {
        GpioPin {
            registers,
            mask: 1 << bit,
        }
    }

    /// Configure the input resistor, reporting states the hardware lacks.
    ///
    /// There is no pull-down on this chip; requesting one leaves the pin
    /// floating and returns `NOSUPPORT`.
    pub fn try_set_floating_state(&self, state: hil::gpio::FloatingState) -> Result<(), ErrorCode> {
        match state {
            hil::gpio::FloatingState::PullUp => {
                self.set_bits(&self.registers.port);
                Ok(())
            }
            hil::gpio::FloatingState::PullNone => {
                self.clear_bits(&self.registers.port);
                Ok(())
            }
            hil::gpio::FloatingState::PullDown => {
                self.clear_bits(&self.registers.port);
                Err(ErrorCode::NOSUPPORT)
            }
        }
    }

    fn set_bits(&self, register: &ReadWrite<u8>) {
        register.set(register.get() | self.mask);
    }

    fn clear_bits(&self, register: &ReadWrite<u8>) {
        register.set(register.get() & !self.mask);
    }

    fn is_set(&self, register: &ReadWrite<u8>) -> bool {
        register.get() & self.mask != 0
    }
}

impl hil::gpio::Configure for GpioPin {
    fn make_output(&self) {
        self.set_bits(&self.registers.ddr);
    }

    fn make_input(&self) {
        self.clear_bits(&self.registers.ddr);
    }

    fn set_floating_state(&self, state: hil::gpio::FloatingState) {
        if self.try_set_floating_state(state).is_err() {
            log::warn!("gpio: no pull-down on this chip, pin left floating");
        }
    }

    fn floating_state(&self) -> hil::gpio::FloatingState {
        if !self.is_output() && self.is_set(&self.registers.port) {
            hil::gpio::FloatingState::PullUp
        } else {
            hil::gpio::FloatingState::PullNone
        }
    }

    fn is_output(&self) -> bool {
        self.is_set(&self.registers.ddr)
    }
}

impl hil::gpio::Output for GpioPin {
    fn set(&self) {
        self.set_bits(&self.registers.port);
    }

    fn clear(&self) {
        self.clear_bits(&self.registers.port);
    }

    fn toggle(&self) -> bool {
        let port = self.registers.port.get() ^ self.mask;
        self.registers.port.set(port);
        port & self.mask != 0
    }
}

impl hil::gpio::Input for GpioPin {
    fn read(&self) -> bool {
        self.is_set(&self.registers.pin)
    }
}

pub struct GpioPort {
    pins: [GpioPin; 8],
}

impl GpioPort {
    const fn new(registers: StaticRef<PortRegisters>) -> GpioPort {
        GpioPort {
            pins: [
                GpioPin::new(registers, 0),
                GpioPin::new(registers, 1),
                GpioPin::new(registers, 2),
                GpioPin::new(registers, 3),
                GpioPin::new(registers, 4),
                GpioPin::new(registers, 5),
                GpioPin::new(registers, 6),
                GpioPin::new(registers, 7),
            ],
        }
    }
}

/// All four ports of the chip.
pub struct Ports {
    ports: [GpioPort; 4],
}

impl Ports {
    /// `registers` is normally [`PORT_REGISTERS`].
    pub const fn new(registers: [StaticRef<PortRegisters>; 4]) -> Ports {
        Ports {
            ports: [
                GpioPort::new(registers[0]),
                GpioPort::new(registers[1]),
                GpioPort::new(registers[2]),
                GpioPort::new(registers[3]),
            ],
        }
    }

    pub fn pin(&self, id: PinId) -> &GpioPin {
        &self.ports[id.port()].pins[id.bit() as usize]
    }
}

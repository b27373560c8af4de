// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! SPI controller.
//!
//! The bus pins are fixed on port B: SS (PB4), MOSI (PB5), MISO (PB6) and
//! SCK (PB7). Their directions depend on the role selected at init.

use kernel::hil;
use kernel::hil::gpio::Configure;
use kernel::hil::spi::{ClockPhase, ClockPolarity, DataOrder, SpiClient};
use kernel::utilities::client_slot::ClientSlot;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, FieldValue, ReadWrite};
use kernel::utilities::StaticRef;

use crate::gpio::{PinId, Ports};

register_structs! {
    pub SpiRegisters {
        (0x00 => spcr: ReadWrite<u8, SPCR::Register>),
        (0x01 => spsr: ReadWrite<u8, SPSR::Register>),
        (0x02 => spdr: ReadWrite<u8>),
        (0x03 => @END),
    }
}

register_bitfields![u8,
    SPCR [
        SPIE OFFSET(7) NUMBITS(1) [],
        SPE OFFSET(6) NUMBITS(1) [],
        /// Data order, 1 = LSB first
        DORD OFFSET(5) NUMBITS(1) [],
        MSTR OFFSET(4) NUMBITS(1) [],
        CPOL OFFSET(3) NUMBITS(1) [],
        CPHA OFFSET(2) NUMBITS(1) [],
        SPR OFFSET(0) NUMBITS(2) []
    ],
    SPSR [
        SPIF OFFSET(7) NUMBITS(1) [],
        WCOL OFFSET(6) NUMBITS(1) [],
        /// Double the SCK rate in master mode
        SPI2X OFFSET(0) NUMBITS(1) []
    ]
];

pub const SPI_BASE: StaticRef<SpiRegisters> =
    unsafe { StaticRef::new(0x2D as *const SpiRegisters) };

/// SCK frequency as a division of the CPU clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockRate {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

impl ClockRate {
    /// SPR1:0 value and whether SPI2X is needed.
    fn bits(self) -> (u8, bool) {
        match self {
            ClockRate::Div4 => (0b00, false),
            ClockRate::Div16 => (0b01, false),
            ClockRate::Div64 => (0b10, false),
            ClockRate::Div128 => (0b11, false),
            ClockRate::Div2 => (0b00, true),
            ClockRate::Div8 => (0b01, true),
            ClockRate::Div32 => (0b10, true),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MasterConfig {
    pub data_order: DataOrder,
    pub polarity: ClockPolarity,
    pub phase: ClockPhase,
    pub clock_rate: ClockRate,
    pub interrupt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlaveConfig {
    pub data_order: DataOrder,
    pub polarity: ClockPolarity,
    pub phase: ClockPhase,
    pub interrupt: bool,
}

fn format(
    data_order: DataOrder,
    polarity: ClockPolarity,
    phase: ClockPhase,
    interrupt: bool,
) -> FieldValue<u8, SPCR::Register> {
    SPCR::SPIE.val(u8::from(interrupt))
        + SPCR::DORD.val(u8::from(data_order == DataOrder::LSBFirst))
        + SPCR::CPOL.val(u8::from(polarity == ClockPolarity::IdleHigh))
        + SPCR::CPHA.val(u8::from(phase == ClockPhase::SampleTrailing))
}

pub struct Spi<'a> {
    registers: StaticRef<SpiRegisters>,
    ports: &'a Ports,
    client: ClientSlot<'a, dyn SpiClient>,
}

impl<'a> Spi<'a> {
    pub const fn new(registers: StaticRef<SpiRegisters>, ports: &'a Ports) -> Spi<'a> {
        Spi {
            registers,
            ports,
            client: ClientSlot::empty(),
        }
    }

    pub fn init_master(&self, config: &MasterConfig) {
        self.ports.pin(PinId::Pb4).make_output();
        self.ports.pin(PinId::Pb5).make_output();
        self.ports.pin(PinId::Pb6).make_input();
        self.ports.pin(PinId::Pb7).make_output();

        let (spr, double) = config.clock_rate.bits();
        self.registers.spcr.write(
            format(
                config.data_order,
                config.polarity,
                config.phase,
                config.interrupt,
            ) + SPCR::SPR.val(spr),
        );
        self.registers.spsr.modify(SPSR::SPI2X.val(u8::from(double)));
        self.registers
            .spcr
            .modify(SPCR::SPE::SET + SPCR::MSTR::SET);
        log::debug!("spi: master at {:?}", config.clock_rate);
    }

    pub fn init_slave(&self, config: &SlaveConfig) {
        self.ports.pin(PinId::Pb4).make_input();
        self.ports.pin(PinId::Pb5).make_input();
        self.ports.pin(PinId::Pb6).make_output();
        self.ports.pin(PinId::Pb7).make_input();

        self.registers.spcr.write(format(
            config.data_order,
            config.polarity,
            config.phase,
            config.interrupt,
        ));
        self.registers.spsr.modify(SPSR::SPI2X::CLEAR);
        self.registers.spcr.modify(SPCR::SPE::SET);
        log::debug!("spi: slave");
    }

    /// Handle the `SPI_STC` interrupt.
    pub fn handle_interrupt(&self) {
        self.client.dispatch(|client| client.transfer_done());
    }
}

impl<'a> hil::spi::SpiByte<'a> for Spi<'a> {
    fn transfer_byte_blocking(&self, byte: u8) -> u8 {
        let interrupt_enabled = self.registers.spcr.is_set(SPCR::SPIE);
        if interrupt_enabled {
            self.registers.spcr.modify(SPCR::SPIE::CLEAR);
        }

        self.registers.spdr.set(byte);
        while !self.registers.spsr.is_set(SPSR::SPIF) {}
        // Reading SPDR after SPSR clears SPIF.
        let received = self.registers.spdr.get();

        if interrupt_enabled {
            self.registers.spcr.modify(SPCR::SPIE::SET);
        }
        received
    }

    fn write_byte_nonblocking(&self, byte: u8) {
        self.registers.spdr.set(byte);
    }

    fn read_byte(&self) -> u8 {
        self.registers.spdr.get()
    }

    fn set_client(&self, client: &'a dyn SpiClient) {
        self.client.set(client);
    }
}

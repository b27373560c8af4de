// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! External interrupt lines INT0 (PD2), INT1 (PD3) and INT2 (PB2).
//!
//! INT0 and INT1 can trigger on a low level, any change or either edge.
//! INT2 is edge-only.

use kernel::hil;
use kernel::hil::eic::InterruptMode;
use kernel::hil::gpio::Configure;
use kernel::utilities::client_slot::ClientSlot;
use kernel::utilities::registers::interfaces::ReadWriteable;
use kernel::utilities::registers::{
    register_bitfields, register_structs, Field, FieldValue, ReadWrite,
};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use crate::gpio::{PinId, Ports};

register_structs! {
    pub McuControlRegisters {
        (0x00 => mcucsr: ReadWrite<u8, MCUCSR::Register>),
        (0x01 => mcucr: ReadWrite<u8, MCUCR::Register>),
        (0x02 => @END),
    }
}

register_structs! {
    pub GeneralInterruptRegisters {
        (0x00 => gifr: ReadWrite<u8, GIFR::Register>),
        (0x01 => gicr: ReadWrite<u8, GICR::Register>),
        (0x02 => @END),
    }
}

register_bitfields![u8,
    MCUCR [
        SE OFFSET(7) NUMBITS(1) [],
        SM OFFSET(4) NUMBITS(3) [],
        ISC1 OFFSET(2) NUMBITS(2) [
            LowLevel = 0,
            AnyChange = 1,
            FallingEdge = 2,
            RisingEdge = 3
        ],
        ISC0 OFFSET(0) NUMBITS(2) [
            LowLevel = 0,
            AnyChange = 1,
            FallingEdge = 2,
            RisingEdge = 3
        ]
    ],
    MCUCSR [
        JTD OFFSET(7) NUMBITS(1) [],
        /// INT2 sense, 1 = rising edge
        ISC2 OFFSET(6) NUMBITS(1) [],
        JTRF OFFSET(4) NUMBITS(1) [],
        WDRF OFFSET(3) NUMBITS(1) [],
        BORF OFFSET(2) NUMBITS(1) [],
        EXTRF OFFSET(1) NUMBITS(1) [],
        PORF OFFSET(0) NUMBITS(1) []
    ],
    GICR [
        INT1 OFFSET(7) NUMBITS(1) [],
        INT0 OFFSET(6) NUMBITS(1) [],
        INT2 OFFSET(5) NUMBITS(1) [],
        IVSEL OFFSET(1) NUMBITS(1) [],
        IVCE OFFSET(0) NUMBITS(1) []
    ],
    GIFR [
        INTF1 OFFSET(7) NUMBITS(1) [],
        INTF0 OFFSET(6) NUMBITS(1) [],
        INTF2 OFFSET(5) NUMBITS(1) []
    ]
];

pub const MCU_CONTROL_BASE: StaticRef<McuControlRegisters> =
    unsafe { StaticRef::new(0x54 as *const McuControlRegisters) };

pub const GENERAL_INTERRUPT_BASE: StaticRef<GeneralInterruptRegisters> =
    unsafe { StaticRef::new(0x5A as *const GeneralInterruptRegisters) };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Int0,
    Int1,
    Int2,
}

impl Line {
    pub const fn pin(self) -> PinId {
        match self {
            Line::Int0 => PinId::Pd2,
            Line::Int1 => PinId::Pd3,
            Line::Int2 => PinId::Pb2,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    fn enable_bit(self) -> Field<u8, GICR::Register> {
        match self {
            Line::Int0 => GICR::INT0,
            Line::Int1 => GICR::INT1,
            Line::Int2 => GICR::INT2,
        }
    }
}

/// The interrupt line wired to `pin`, if it has one.
pub fn line_for_pin(pin: PinId) -> Result<Line, ErrorCode> {
    match pin {
        PinId::Pd2 => Ok(Line::Int0),
        PinId::Pd3 => Ok(Line::Int1),
        PinId::Pb2 => Ok(Line::Int2),
        _ => Err(ErrorCode::NOSUPPORT),
    }
}

fn int0_sense(mode: InterruptMode) -> FieldValue<u8, MCUCR::Register> {
    match mode {
        InterruptMode::LowLevel => MCUCR::ISC0::LowLevel,
        InterruptMode::AnyChange => MCUCR::ISC0::AnyChange,
        InterruptMode::FallingEdge => MCUCR::ISC0::FallingEdge,
        InterruptMode::RisingEdge => MCUCR::ISC0::RisingEdge,
    }
}

fn int1_sense(mode: InterruptMode) -> FieldValue<u8, MCUCR::Register> {
    match mode {
        InterruptMode::LowLevel => MCUCR::ISC1::LowLevel,
        InterruptMode::AnyChange => MCUCR::ISC1::AnyChange,
        InterruptMode::FallingEdge => MCUCR::ISC1::FallingEdge,
        InterruptMode::RisingEdge => MCUCR::ISC1::RisingEdge,
    }
}

pub struct Exti<'a> {
    control: StaticRef<McuControlRegisters>,
    general: StaticRef<GeneralInterruptRegisters>,
    ports: &'a Ports,
    clients: [ClientSlot<'a, dyn hil::eic::Client>; 3],
}

impl<'a> Exti<'a> {
    pub const fn new(
        control: StaticRef<McuControlRegisters>,
        general: StaticRef<GeneralInterruptRegisters>,
        ports: &'a Ports,
    ) -> Exti<'a> {
        Exti {
            control,
            general,
            ports,
            clients: [ClientSlot::empty(), ClientSlot::empty(), ClientSlot::empty()],
        }
    }

    /// Enable the interrupt line wired to `pin`.
    ///
    /// Returns `NOSUPPORT` if the pin has no external interrupt.
    pub fn enable_pin(
        &self,
        pin: PinId,
        mode: InterruptMode,
        client: &'a dyn hil::eic::Client,
    ) -> Result<(), ErrorCode> {
        let line = line_for_pin(pin)?;
        hil::eic::ExternalInterruptController::line_enable(self, line, mode, client)
    }

    pub fn disable_pin(&self, pin: PinId) -> Result<(), ErrorCode> {
        let line = line_for_pin(pin)?;
        hil::eic::ExternalInterruptController::line_disable(self, line);
        Ok(())
    }

    /// Handle the INTn interrupt of `line`.
    pub fn handle_interrupt(&self, line: Line) {
        self.clients[line.index()].dispatch(|client| client.fired());
    }
}

impl<'a> hil::eic::ExternalInterruptController<'a> for Exti<'a> {
    type Line = Line;

    fn line_enable(
        &self,
        line: Line,
        mode: InterruptMode,
        client: &'a dyn hil::eic::Client,
    ) -> Result<(), ErrorCode> {
        let int2_rising = match (line, mode) {
            (Line::Int2, InterruptMode::RisingEdge) => true,
            (Line::Int2, InterruptMode::FallingEdge) => false,
            (Line::Int2, _) => {
                log::warn!("exti: INT2 cannot trigger on {:?}", mode);
                return Err(ErrorCode::INVAL);
            }
            _ => false,
        };

        self.ports.pin(line.pin()).make_input();
        match line {
            Line::Int0 => self.control.mcucr.modify(int0_sense(mode)),
            Line::Int1 => self.control.mcucr.modify(int1_sense(mode)),
            Line::Int2 => self
                .control
                .mcucsr
                .modify(MCUCSR::ISC2.val(u8::from(int2_rising))),
        }
        self.clients[line.index()].set(client);
        self.general.gicr.modify(line.enable_bit().val(1));
        Ok(())
    }

    fn line_disable(&self, line: Line) {
        self.general.gicr.modify(line.enable_bit().val(0));
        self.clients[line.index()].clear();
    }
}

impl<'a> hil::eic::PinInterrupts<'a> for Exti<'a> {
    type Pin = PinId;

    fn pin_enable(
        &self,
        pin: PinId,
        mode: InterruptMode,
        client: &'a dyn hil::eic::Client,
    ) -> Result<(), ErrorCode> {
        self.enable_pin(pin, mode, client)
    }

    fn pin_disable(&self, pin: PinId) -> Result<(), ErrorCode> {
        self.disable_pin(pin)
    }
}

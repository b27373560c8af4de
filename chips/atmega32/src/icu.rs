// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Timer1 input capture unit.
//!
//! Timer1 runs in normal mode as a free-running 16-bit counter. When the
//! selected edge appears on ICP1 (PD6) the counter is copied into ICR1 and
//! the `TIMER1_CAPT` interrupt is raised.
//!
//! The 16-bit registers share one TEMP latch in the CPU: the low byte must
//! be read first (which latches the high byte) and the high byte must be
//! written first. All 16-bit accesses here keep to that order.

use kernel::hil;
use kernel::hil::capture::{CaptureClient, CaptureConfig, Edge, Prescaler};
use kernel::hil::gpio::Configure;
use kernel::utilities::client_slot::ClientSlot;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, FieldValue, ReadWrite};
use kernel::utilities::StaticRef;

use crate::gpio::{PinId, Ports};

register_structs! {
    pub Timer1Registers {
        /// Input capture register
        (0x00 => icr1l: ReadWrite<u8>),
        (0x01 => icr1h: ReadWrite<u8>),
        (0x02 => _reserved0),
        /// Counter
        (0x06 => tcnt1l: ReadWrite<u8>),
        (0x07 => tcnt1h: ReadWrite<u8>),
        (0x08 => tccr1b: ReadWrite<u8, TCCR1B::Register>),
        (0x09 => tccr1a: ReadWrite<u8, TCCR1A::Register>),
        (0x0A => @END),
    }
}

register_structs! {
    /// Interrupt mask and flag registers shared by timers 0, 1 and 2.
    pub TimerInterruptRegisters {
        (0x00 => tifr: ReadWrite<u8, TIFR::Register>),
        (0x01 => timsk: ReadWrite<u8, TIMSK::Register>),
        (0x02 => @END),
    }
}

register_bitfields![u8,
    TCCR1A [
        COM1A OFFSET(6) NUMBITS(2) [],
        COM1B OFFSET(4) NUMBITS(2) [],
        FOC1A OFFSET(3) NUMBITS(1) [],
        FOC1B OFFSET(2) NUMBITS(1) [],
        WGM1L OFFSET(0) NUMBITS(2) []
    ],
    TCCR1B [
        /// Input capture noise canceler
        ICNC1 OFFSET(7) NUMBITS(1) [],
        /// Input capture edge select, 1 = rising
        ICES1 OFFSET(6) NUMBITS(1) [],
        WGM1H OFFSET(3) NUMBITS(2) [],
        CS1 OFFSET(0) NUMBITS(3) [
            NoClock = 0,
            Div1 = 1,
            Div8 = 2,
            Div64 = 3,
            Div256 = 4,
            Div1024 = 5,
            ExternalFalling = 6,
            ExternalRising = 7
        ]
    ],
    TIFR [
        OCF2 OFFSET(7) NUMBITS(1) [],
        TOV2 OFFSET(6) NUMBITS(1) [],
        ICF1 OFFSET(5) NUMBITS(1) [],
        OCF1A OFFSET(4) NUMBITS(1) [],
        OCF1B OFFSET(3) NUMBITS(1) [],
        TOV1 OFFSET(2) NUMBITS(1) [],
        OCF0 OFFSET(1) NUMBITS(1) [],
        TOV0 OFFSET(0) NUMBITS(1) []
    ],
    TIMSK [
        OCIE2 OFFSET(7) NUMBITS(1) [],
        TOIE2 OFFSET(6) NUMBITS(1) [],
        TICIE1 OFFSET(5) NUMBITS(1) [],
        OCIE1A OFFSET(4) NUMBITS(1) [],
        OCIE1B OFFSET(3) NUMBITS(1) [],
        TOIE1 OFFSET(2) NUMBITS(1) [],
        OCIE0 OFFSET(1) NUMBITS(1) [],
        TOIE0 OFFSET(0) NUMBITS(1) []
    ]
];

pub const TIMER1_BASE: StaticRef<Timer1Registers> =
    unsafe { StaticRef::new(0x46 as *const Timer1Registers) };

pub const TIMER_INTERRUPT_BASE: StaticRef<TimerInterruptRegisters> =
    unsafe { StaticRef::new(0x58 as *const TimerInterruptRegisters) };

fn clock_select(prescaler: Prescaler) -> FieldValue<u8, TCCR1B::Register> {
    match prescaler {
        Prescaler::NoClock => TCCR1B::CS1::NoClock,
        Prescaler::Div1 => TCCR1B::CS1::Div1,
        Prescaler::Div8 => TCCR1B::CS1::Div8,
        Prescaler::Div64 => TCCR1B::CS1::Div64,
        Prescaler::Div256 => TCCR1B::CS1::Div256,
        Prescaler::Div1024 => TCCR1B::CS1::Div1024,
    }
}

fn edge_select(edge: Edge) -> u8 {
    match edge {
        Edge::Falling => 0,
        Edge::Rising => 1,
    }
}

pub struct Icu<'a> {
    registers: StaticRef<Timer1Registers>,
    interrupts: StaticRef<TimerInterruptRegisters>,
    ports: &'a Ports,
    client: ClientSlot<'a, dyn CaptureClient>,
}

impl<'a> Icu<'a> {
    pub const fn new(
        registers: StaticRef<Timer1Registers>,
        interrupts: StaticRef<TimerInterruptRegisters>,
        ports: &'a Ports,
    ) -> Icu<'a> {
        Icu {
            registers,
            interrupts,
            ports,
            client: ClientSlot::empty(),
        }
    }

    fn write_counter(&self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.registers.tcnt1h.set(high);
        self.registers.tcnt1l.set(low);
    }

    fn write_capture(&self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.registers.icr1h.set(high);
        self.registers.icr1l.set(low);
    }

    /// Running counter value.
    pub fn counter(&self) -> u16 {
        let low = self.registers.tcnt1l.get();
        let high = self.registers.tcnt1h.get();
        u16::from_le_bytes([low, high])
    }

    /// Handle the `TIMER1_CAPT` interrupt. The hardware clears ICF1 when the
    /// vector is taken.
    pub fn handle_interrupt(&self) {
        self.client.dispatch(|client| client.on_edge());
    }
}

impl<'a> hil::capture::Capture<'a> for Icu<'a> {
    fn init(&self, config: &CaptureConfig) {
        self.ports.pin(PinId::Pd6).make_input();

        // Normal mode with the output compare units disconnected.
        self.registers
            .tccr1a
            .write(TCCR1A::FOC1A::SET + TCCR1A::FOC1B::SET);
        self.registers.tccr1b.write(
            TCCR1B::ICNC1.val(u8::from(config.noise_canceler))
                + TCCR1B::ICES1.val(edge_select(config.initial_edge))
                + clock_select(config.prescaler),
        );
        self.write_counter(0);
        self.write_capture(0);
        self.interrupts.tifr.write(TIFR::TOV1::SET);

        self.interrupts.timsk.modify(TIMSK::TICIE1::SET);
        log::debug!(
            "icu: init {:?}, first edge {:?}",
            config.prescaler,
            config.initial_edge
        );
    }

    fn set_edge(&self, edge: Edge) {
        self.registers
            .tccr1b
            .modify(TCCR1B::ICES1.val(edge_select(edge)));
    }

    fn edge(&self) -> Edge {
        if self.registers.tccr1b.is_set(TCCR1B::ICES1) {
            Edge::Rising
        } else {
            Edge::Falling
        }
    }

    fn capture_value(&self) -> u16 {
        let low = self.registers.icr1l.get();
        let high = self.registers.icr1h.get();
        u16::from_le_bytes([low, high])
    }

    fn clear_counter(&self) {
        self.write_counter(0);
        // Flags are cleared by writing a one; zeros leave the others alone.
        self.interrupts.tifr.write(TIFR::TOV1::SET);
    }

    fn counter_overflowed(&self) -> bool {
        self.interrupts.tifr.is_set(TIFR::TOV1)
    }

    fn set_noise_canceler(&self, enable: bool) {
        self.registers
            .tccr1b
            .modify(TCCR1B::ICNC1.val(u8::from(enable)));
    }

    fn set_client(&self, client: &'a dyn CaptureClient) {
        self.client.set(client);
    }

    fn deinit(&self) {
        self.registers.tccr1a.set(0);
        self.registers.tccr1b.set(0);
        self.write_counter(0);
        self.write_capture(0);
        self.interrupts.timsk.modify(TIMSK::TICIE1::CLEAR);
        self.client.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gpio::test::ram_ports;
    use crate::gpio::GpioPin;
    use crate::test::zeroed_registers;
    use core::cell::Cell;
    use kernel::hil::capture::Capture;
    use std::boxed::Box;

    struct EdgeCounter {
        edges: Cell<usize>,
    }

    impl CaptureClient for EdgeCounter {
        fn on_edge(&self) {
            self.edges.set(self.edges.get() + 1);
        }
    }

    struct Fixture {
        timer: StaticRef<Timer1Registers>,
        interrupts: StaticRef<TimerInterruptRegisters>,
        icu: &'static Icu<'static>,
        pin: &'static GpioPin,
    }

    fn fixture() -> Fixture {
        let timer = zeroed_registers::<Timer1Registers>();
        let interrupts = zeroed_registers::<TimerInterruptRegisters>();
        let ports = ram_ports();
        let pin = ports.pin(PinId::Pd6);
        let icu = Box::leak(Box::new(Icu::new(timer, interrupts, ports)));
        Fixture {
            timer,
            interrupts,
            icu,
            pin,
        }
    }

    fn config(prescaler: Prescaler, initial_edge: Edge) -> CaptureConfig {
        CaptureConfig {
            prescaler,
            initial_edge,
            noise_canceler: false,
        }
    }

    #[test]
    fn init_arms_edge_and_resets_for_every_prescaler() {
        let prescalers = [
            (Prescaler::NoClock, 0),
            (Prescaler::Div1, 1),
            (Prescaler::Div8, 2),
            (Prescaler::Div64, 3),
            (Prescaler::Div256, 4),
            (Prescaler::Div1024, 5),
        ];
        for (prescaler, cs) in prescalers {
            for edge in [Edge::Rising, Edge::Falling] {
                let f = fixture();
                f.pin.make_output();
                f.timer.tcnt1l.set(0x34);
                f.timer.tcnt1h.set(0x12);
                f.timer.icr1l.set(0x78);
                f.timer.icr1h.set(0x56);

                f.icu.init(&config(prescaler, edge));

                assert_eq!(f.icu.edge(), edge);
                assert_eq!(f.icu.counter(), 0);
                assert_eq!(f.icu.capture_value(), 0);
                assert_eq!(f.timer.tccr1b.read(TCCR1B::CS1), cs);
                assert!(!f.timer.tccr1b.is_set(TCCR1B::ICNC1));
                assert!(f.timer.tccr1a.is_set(TCCR1A::FOC1A));
                assert_eq!(f.timer.tccr1a.read(TCCR1A::WGM1L), 0);
                assert!(f.interrupts.timsk.is_set(TIMSK::TICIE1));
                assert!(f.pin.is_input());
            }
        }
    }

    #[test]
    fn init_leaves_other_timer_interrupts_alone() {
        let f = fixture();
        f.interrupts.timsk.write(TIMSK::TOIE0::SET);
        f.icu.init(&config(Prescaler::Div8, Edge::Rising));
        assert!(f.interrupts.timsk.is_set(TIMSK::TOIE0));
        assert!(f.interrupts.timsk.is_set(TIMSK::TICIE1));
    }

    #[test]
    fn edge_selection_preserves_clock() {
        let f = fixture();
        f.icu.init(&config(Prescaler::Div64, Edge::Rising));
        f.icu.set_edge(Edge::Falling);
        assert_eq!(f.icu.edge(), Edge::Falling);
        assert_eq!(f.timer.tccr1b.read(TCCR1B::CS1), 3);
        f.icu.set_edge(Edge::Rising);
        assert_eq!(f.icu.edge(), Edge::Rising);
    }

    #[test]
    fn noise_canceler() {
        let f = fixture();
        f.icu.init(&CaptureConfig {
            prescaler: Prescaler::Div8,
            initial_edge: Edge::Rising,
            noise_canceler: true,
        });
        assert!(f.timer.tccr1b.is_set(TCCR1B::ICNC1));
        f.icu.set_noise_canceler(false);
        assert!(!f.timer.tccr1b.is_set(TCCR1B::ICNC1));
        assert_eq!(f.icu.edge(), Edge::Rising);
    }

    #[test]
    fn capture_value_combines_bytes() {
        let f = fixture();
        f.timer.icr1l.set(0xC8);
        f.timer.icr1h.set(0x01);
        assert_eq!(f.icu.capture_value(), 456);
    }

    #[test]
    fn clear_counter_zeroes_and_acknowledges_overflow() {
        let f = fixture();
        f.timer.tcnt1l.set(0xFF);
        f.timer.tcnt1h.set(0xFF);
        f.interrupts.tifr.write(TIFR::TOV1::SET);
        assert!(f.icu.counter_overflowed());

        f.icu.clear_counter();
        assert_eq!(f.icu.counter(), 0);
        // In RAM the write-one-to-clear shows up as the written value.
        assert_eq!(f.interrupts.tifr.get(), TIFR::TOV1::SET.value);
    }

    #[test]
    fn init_acknowledges_stale_overflow() {
        let f = fixture();
        f.interrupts.tifr.write(TIFR::TOV1::SET + TIFR::ICF1::SET);
        f.icu.init(&config(Prescaler::Div8, Edge::Rising));
        // Only the TOV1 clear was written.
        assert_eq!(f.interrupts.tifr.get(), TIFR::TOV1::SET.value);
    }

    #[test]
    fn interrupt_dispatches_to_client() {
        let f = fixture();
        let counter = Box::leak(Box::new(EdgeCounter {
            edges: Cell::new(0),
        }));
        f.icu.handle_interrupt();
        assert_eq!(counter.edges.get(), 0);

        f.icu.set_client(counter);
        f.icu.handle_interrupt();
        f.icu.handle_interrupt();
        assert_eq!(counter.edges.get(), 2);
    }

    #[test]
    fn deinit_stops_timer_and_drops_client() {
        let f = fixture();
        let counter = Box::leak(Box::new(EdgeCounter {
            edges: Cell::new(0),
        }));
        f.icu.set_client(counter);
        f.icu.init(&config(Prescaler::Div8, Edge::Rising));
        f.timer.icr1l.set(9);

        f.icu.deinit();
        assert_eq!(f.timer.tccr1a.get(), 0);
        assert_eq!(f.timer.tccr1b.get(), 0);
        assert_eq!(f.icu.capture_value(), 0);
        assert!(!f.interrupts.timsk.is_set(TIMSK::TICIE1));

        f.icu.handle_interrupt();
        assert_eq!(counter.edges.get(), 0);
    }
}

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! 10-bit successive approximation ADC.
//!
//! Eight single-ended channels are multiplexed onto port A. Conversions are
//! started by software, or by one of the auto-trigger sources selected in
//! SFIOR.

use core::cell::Cell;

use kernel::hil;
use kernel::utilities::client_slot::ClientSlot;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, FieldValue, ReadWrite};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

register_structs! {
    pub AdcRegisters {
        (0x00 => adcl: ReadWrite<u8>),
        (0x01 => adch: ReadWrite<u8>),
        (0x02 => adcsra: ReadWrite<u8, ADCSRA::Register>),
        (0x03 => admux: ReadWrite<u8, ADMUX::Register>),
        (0x04 => @END),
    }
}

register_structs! {
    /// Special function I/O register; only the auto-trigger bits belong to
    /// the ADC.
    pub SfiorRegisters {
        (0x00 => sfior: ReadWrite<u8, SFIOR::Register>),
        (0x01 => @END),
    }
}

register_bitfields![u8,
    ADMUX [
        REFS OFFSET(6) NUMBITS(2) [
            Aref = 0,
            Avcc = 1,
            Internal2V56 = 3
        ],
        /// Left-adjust the result
        ADLAR OFFSET(5) NUMBITS(1) [],
        MUX OFFSET(0) NUMBITS(5) []
    ],
    ADCSRA [
        ADEN OFFSET(7) NUMBITS(1) [],
        ADSC OFFSET(6) NUMBITS(1) [],
        ADATE OFFSET(5) NUMBITS(1) [],
        ADIF OFFSET(4) NUMBITS(1) [],
        ADIE OFFSET(3) NUMBITS(1) [],
        ADPS OFFSET(0) NUMBITS(3) [
            Div2 = 1,
            Div4 = 2,
            Div8 = 3,
            Div16 = 4,
            Div32 = 5,
            Div64 = 6,
            Div128 = 7
        ]
    ],
    SFIOR [
        ADTS OFFSET(5) NUMBITS(3) [
            FreeRunning = 0,
            AnalogComparator = 1,
            ExternalInterrupt0 = 2,
            Timer0CompareMatch = 3,
            Timer0Overflow = 4,
            Timer1CompareMatchB = 5,
            Timer1Overflow = 6,
            Timer1CaptureEvent = 7
        ]
    ]
];

pub const ADC_BASE: StaticRef<AdcRegisters> =
    unsafe { StaticRef::new(0x24 as *const AdcRegisters) };

pub const SFIOR_BASE: StaticRef<SfiorRegisters> =
    unsafe { StaticRef::new(0x50 as *const SfiorRegisters) };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    Adc0 = 0,
    Adc1 = 1,
    Adc2 = 2,
    Adc3 = 3,
    Adc4 = 4,
    Adc5 = 5,
    Adc6 = 6,
    Adc7 = 7,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reference {
    /// External voltage on the AREF pin.
    Aref,
    /// AVCC, assumed to be the 5 V supply.
    Avcc,
    Internal2V56,
}

impl Reference {
    fn millivolts(self) -> Option<usize> {
        match self {
            Reference::Aref => None,
            Reference::Avcc => Some(5000),
            Reference::Internal2V56 => Some(2560),
        }
    }

    fn field(self) -> FieldValue<u8, ADMUX::Register> {
        match self {
            Reference::Aref => ADMUX::REFS::Aref,
            Reference::Avcc => ADMUX::REFS::Avcc,
            Reference::Internal2V56 => ADMUX::REFS::Internal2V56,
        }
    }
}

/// ADC clock divider. The converter wants 50 to 200 kHz for full
/// resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdcPrescaler {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

impl AdcPrescaler {
    fn field(self) -> FieldValue<u8, ADCSRA::Register> {
        match self {
            AdcPrescaler::Div2 => ADCSRA::ADPS::Div2,
            AdcPrescaler::Div4 => ADCSRA::ADPS::Div4,
            AdcPrescaler::Div8 => ADCSRA::ADPS::Div8,
            AdcPrescaler::Div16 => ADCSRA::ADPS::Div16,
            AdcPrescaler::Div32 => ADCSRA::ADPS::Div32,
            AdcPrescaler::Div64 => ADCSRA::ADPS::Div64,
            AdcPrescaler::Div128 => ADCSRA::ADPS::Div128,
        }
    }
}

/// Event that starts a conversion when auto-triggering is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerSource {
    FreeRunning,
    AnalogComparator,
    ExternalInterrupt0,
    Timer0CompareMatch,
    Timer0Overflow,
    Timer1CompareMatchB,
    Timer1Overflow,
    Timer1CaptureEvent,
}

impl TriggerSource {
    fn field(self) -> FieldValue<u8, SFIOR::Register> {
        match self {
            TriggerSource::FreeRunning => SFIOR::ADTS::FreeRunning,
            TriggerSource::AnalogComparator => SFIOR::ADTS::AnalogComparator,
            TriggerSource::ExternalInterrupt0 => SFIOR::ADTS::ExternalInterrupt0,
            TriggerSource::Timer0CompareMatch => SFIOR::ADTS::Timer0CompareMatch,
            TriggerSource::Timer0Overflow => SFIOR::ADTS::Timer0Overflow,
            TriggerSource::Timer1CompareMatchB => SFIOR::ADTS::Timer1CompareMatchB,
            TriggerSource::Timer1Overflow => SFIOR::ADTS::Timer1Overflow,
            TriggerSource::Timer1CaptureEvent => SFIOR::ADTS::Timer1CaptureEvent,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdcConfig {
    pub reference: Reference,
    pub prescaler: AdcPrescaler,
    /// Enable the conversion-complete interrupt.
    pub interrupt: bool,
}

impl AdcConfig {
    /// AVCC reference, 125 kHz ADC clock at 1 MHz, polling only.
    pub const DEFAULT: AdcConfig = AdcConfig {
        reference: Reference::Avcc,
        prescaler: AdcPrescaler::Div8,
        interrupt: false,
    };
}

pub struct Adc<'a> {
    registers: StaticRef<AdcRegisters>,
    sfior: StaticRef<SfiorRegisters>,
    reference: Cell<Reference>,
    client: ClientSlot<'a, dyn hil::adc::Client>,
}

impl<'a> Adc<'a> {
    pub const fn new(registers: StaticRef<AdcRegisters>, sfior: StaticRef<SfiorRegisters>) -> Adc<'a> {
        Adc {
            registers,
            sfior,
            reference: Cell::new(Reference::Aref),
            client: ClientSlot::empty(),
        }
    }

    /// Select the reference, right-adjust results, select channel 0 and
    /// enable the converter. Auto-triggering is turned off.
    pub fn init(&self, config: &AdcConfig) {
        self.registers.admux.modify(
            config.reference.field() + ADMUX::ADLAR::CLEAR + ADMUX::MUX.val(0),
        );
        self.registers.adcsra.write(
            config.prescaler.field()
                + ADCSRA::ADIE.val(u8::from(config.interrupt))
                + ADCSRA::ADEN::SET,
        );
        self.reference.set(config.reference);
        log::debug!(
            "adc: init {:?} reference, {:?}, interrupt {}",
            config.reference,
            config.prescaler,
            config.interrupt
        );
    }

    /// Start conversions on `source` instead of by software.
    pub fn enable_auto_trigger(&self, source: TriggerSource) {
        self.registers.adcsra.modify(ADCSRA::ADATE::SET);
        self.sfior.sfior.modify(source.field());
    }

    pub fn disable_auto_trigger(&self) {
        self.registers.adcsra.modify(ADCSRA::ADATE::CLEAR);
    }

    fn select(&self, channel: Channel) {
        self.registers.admux.modify(ADMUX::MUX.val(channel as u8));
    }

    fn result(&self) -> u16 {
        let low = self.registers.adcl.get();
        let high = self.registers.adch.get() & 0x03;
        u16::from_le_bytes([low, high])
    }

    /// Handle the ADC conversion-complete interrupt.
    pub fn handle_interrupt(&self) {
        let sample = self.result();
        self.client.dispatch(|client| client.sample_ready(sample));
    }
}

impl<'a> hil::adc::Adc<'a> for Adc<'a> {
    type Channel = Channel;

    fn sample_blocking(&self, channel: &Channel) -> u16 {
        self.select(*channel);

        let interrupt_enabled = self.registers.adcsra.is_set(ADCSRA::ADIE);
        self.registers
            .adcsra
            .modify(ADCSRA::ADIE::CLEAR + ADCSRA::ADSC::SET);

        while !self.registers.adcsra.is_set(ADCSRA::ADIF) {}
        self.registers.adcsra.modify(ADCSRA::ADIF::SET);

        if interrupt_enabled {
            self.registers.adcsra.modify(ADCSRA::ADIE::SET);
        }
        self.result()
    }

    fn sample(&self, channel: &Channel) -> Result<(), ErrorCode> {
        if self.registers.adcsra.is_set(ADCSRA::ADSC) {
            return Err(ErrorCode::BUSY);
        }
        if !self.registers.adcsra.is_set(ADCSRA::ADIE) {
            return Err(ErrorCode::OFF);
        }
        self.select(*channel);
        self.registers.adcsra.modify(ADCSRA::ADSC::SET);
        Ok(())
    }

    fn get_resolution_bits(&self) -> usize {
        10
    }

    fn get_voltage_reference_mv(&self) -> Option<usize> {
        self.reference.get().millivolts()
    }

    fn set_client(&self, client: &'a dyn hil::adc::Client) {
        self.client.set(client);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::zeroed_registers;
    use kernel::hil::adc::Adc as _;
    use std::boxed::Box;

    struct Fixture {
        registers: StaticRef<AdcRegisters>,
        sfior: StaticRef<SfiorRegisters>,
        adc: &'static Adc<'static>,
    }

    fn fixture() -> Fixture {
        let registers = zeroed_registers::<AdcRegisters>();
        let sfior = zeroed_registers::<SfiorRegisters>();
        let adc = Box::leak(Box::new(Adc::new(registers, sfior)));
        Fixture {
            registers,
            sfior,
            adc,
        }
    }

    struct LastSample(Cell<Option<u16>>);

    impl hil::adc::Client for LastSample {
        fn sample_ready(&self, sample: u16) {
            self.0.set(Some(sample));
        }
    }

    #[test]
    fn init_programs_reference_and_prescaler() {
        let f = fixture();
        f.registers.admux.write(ADMUX::ADLAR::SET + ADMUX::MUX.val(5));
        f.adc.init(&AdcConfig {
            reference: Reference::Internal2V56,
            prescaler: AdcPrescaler::Div128,
            interrupt: true,
        });
        assert_eq!(f.registers.admux.read(ADMUX::REFS), 3);
        assert!(!f.registers.admux.is_set(ADMUX::ADLAR));
        assert_eq!(f.registers.admux.read(ADMUX::MUX), 0);
        assert_eq!(f.registers.adcsra.read(ADCSRA::ADPS), 7);
        assert!(f.registers.adcsra.is_set(ADCSRA::ADIE));
        assert!(f.registers.adcsra.is_set(ADCSRA::ADEN));
        assert!(!f.registers.adcsra.is_set(ADCSRA::ADATE));
        assert_eq!(f.adc.get_voltage_reference_mv(), Some(2560));
    }

    #[test]
    fn blocking_sample_restores_interrupt_enable() {
        let f = fixture();
        f.adc.init(&AdcConfig {
            interrupt: true,
            ..AdcConfig::DEFAULT
        });
        // A conversion that has already completed.
        f.registers.adcsra.modify(ADCSRA::ADIF::SET);
        f.registers.adcl.set(0xFF);
        f.registers.adch.set(0x03);

        assert_eq!(f.adc.sample_blocking(&Channel::Adc2), 1023);
        assert_eq!(f.registers.admux.read(ADMUX::MUX), 2);
        assert!(f.registers.adcsra.is_set(ADCSRA::ADSC));
        assert!(f.registers.adcsra.is_set(ADCSRA::ADIE));
    }

    #[test]
    fn blocking_sample_without_interrupt() {
        let f = fixture();
        f.adc.init(&AdcConfig::DEFAULT);
        f.registers.adcsra.modify(ADCSRA::ADIF::SET);
        f.registers.adcl.set(0x2C);
        f.registers.adch.set(0x01);

        assert_eq!(f.adc.sample_blocking(&Channel::Adc0), 300);
        assert!(!f.registers.adcsra.is_set(ADCSRA::ADIE));
        assert_eq!(f.adc.get_voltage_reference_mv(), Some(5000));
    }

    #[test]
    fn interrupt_sample_needs_interrupt_and_idle_converter() {
        let f = fixture();
        f.adc.init(&AdcConfig::DEFAULT);
        assert_eq!(f.adc.sample(&Channel::Adc1), Err(ErrorCode::OFF));

        f.adc.init(&AdcConfig {
            interrupt: true,
            ..AdcConfig::DEFAULT
        });
        assert_eq!(f.adc.sample(&Channel::Adc6), Ok(()));
        assert_eq!(f.registers.admux.read(ADMUX::MUX), 6);
        assert_eq!(f.adc.sample(&Channel::Adc6), Err(ErrorCode::BUSY));
    }

    #[test]
    fn interrupt_delivers_result() {
        let f = fixture();
        let client = Box::leak(Box::new(LastSample(Cell::new(None))));
        f.adc.set_client(client);
        f.registers.adcl.set(0x00);
        f.registers.adch.set(0x02);
        f.adc.handle_interrupt();
        assert_eq!(client.0.get(), Some(512));
    }

    #[test]
    fn auto_trigger() {
        let f = fixture();
        f.adc.enable_auto_trigger(TriggerSource::Timer1CaptureEvent);
        assert!(f.registers.adcsra.is_set(ADCSRA::ADATE));
        assert_eq!(f.sfior.sfior.read(SFIOR::ADTS), 7);

        f.adc.enable_auto_trigger(TriggerSource::ExternalInterrupt0);
        assert_eq!(f.sfior.sfior.read(SFIOR::ADTS), 2);

        f.adc.disable_auto_trigger();
        assert!(!f.registers.adcsra.is_set(ADCSRA::ADATE));
    }
}

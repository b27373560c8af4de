// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! LM35 analog temperature sensor.
//!
//! The LM35 outputs 10 mV per degree Celsius, so 1.5 V at its 150 °C upper
//! limit. A reading is one blocking ADC conversion scaled by the converter's
//! voltage reference.

use kernel::hil::adc;

/// Reference voltage assumed when neither the config nor the ADC knows it.
pub const FALLBACK_VREF_MV: u16 = 5000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Sensor output at `full_scale_c`.
    pub full_scale_mv: u16,
    pub full_scale_c: u16,
    /// Overrides the reference reported by the ADC. Needed when the ADC
    /// runs from an external reference pin.
    pub vref_mv: Option<u16>,
}

impl Config {
    pub const DEFAULT: Config = Config {
        full_scale_mv: 1500,
        full_scale_c: 150,
        vref_mv: None,
    };
}

pub struct Lm35<'a, A: adc::Adc<'a>> {
    adc: &'a A,
    channel: A::Channel,
    config: Config,
}

impl<'a, A: adc::Adc<'a>> Lm35<'a, A> {
    pub fn new(adc: &'a A, channel: A::Channel, config: Config) -> Lm35<'a, A> {
        Lm35 {
            adc,
            channel,
            config,
        }
    }

    fn vref_mv(&self) -> u16 {
        self.config
            .vref_mv
            .or_else(|| {
                self.adc
                    .get_voltage_reference_mv()
                    .and_then(|mv| u16::try_from(mv).ok())
            })
            .unwrap_or(FALLBACK_VREF_MV)
    }

    /// Temperature in whole degrees Celsius, saturating at 255.
    ///
    /// Computed in 32 bits: `usize` is only 16 bits wide on AVR. A config
    /// whose product overflows 32 bits also reads as 255.
    pub fn temperature_c(&self) -> u8 {
        let sample = u32::from(self.adc.sample_blocking(&self.channel));
        let bits = self.adc.get_resolution_bits().min(16) as u32;
        let max_sample = (1u32 << bits) - 1;

        let numerator = sample
            .checked_mul(u32::from(self.config.full_scale_c))
            .and_then(|n| n.checked_mul(u32::from(self.vref_mv())));
        let denominator = max_sample * u32::from(self.config.full_scale_mv);
        match numerator {
            Some(numerator) => {
                let celsius = numerator.checked_div(denominator).unwrap_or(0);
                u8::try_from(celsius).unwrap_or(u8::MAX)
            }
            None => u8::MAX,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use core::cell::Cell;
    use kernel::ErrorCode;

    struct FakeAdc {
        sample: Cell<u16>,
        reference: Option<usize>,
        resolution_bits: usize,
        last_channel: Cell<Option<u8>>,
    }

    impl FakeAdc {
        fn new(reference: Option<usize>) -> FakeAdc {
            FakeAdc {
                sample: Cell::new(0),
                reference,
                resolution_bits: 10,
                last_channel: Cell::new(None),
            }
        }
    }

    impl<'a> adc::Adc<'a> for FakeAdc {
        type Channel = u8;

        fn sample_blocking(&self, channel: &u8) -> u16 {
            self.last_channel.set(Some(*channel));
            self.sample.get()
        }
        fn sample(&self, _channel: &u8) -> Result<(), ErrorCode> {
            Err(ErrorCode::NOSUPPORT)
        }
        fn get_resolution_bits(&self) -> usize {
            self.resolution_bits
        }
        fn get_voltage_reference_mv(&self) -> Option<usize> {
            self.reference
        }
        fn set_client(&self, _client: &'a dyn adc::Client) {}
    }

    #[test]
    fn converts_with_adc_reference() {
        let adc = FakeAdc::new(Some(5000));
        let sensor = Lm35::new(&adc, 0, Config::DEFAULT);

        adc.sample.set(0);
        assert_eq!(sensor.temperature_c(), 0);
        // 25 °C is 250 mV: 51 counts at 4.887 mV per count.
        adc.sample.set(51);
        assert_eq!(sensor.temperature_c(), 24);
        adc.sample.set(52);
        assert_eq!(sensor.temperature_c(), 25);
        adc.sample.set(307);
        assert_eq!(sensor.temperature_c(), 150);
        assert_eq!(adc.last_channel.get(), Some(0));
    }

    #[test]
    fn internal_reference() {
        let adc = FakeAdc::new(Some(2560));
        let sensor = Lm35::new(&adc, 3, Config::DEFAULT);
        // 2.5 mV per count
        adc.sample.set(400);
        assert_eq!(sensor.temperature_c(), 100);
        assert_eq!(adc.last_channel.get(), Some(3));
    }

    #[test]
    fn configured_reference_wins() {
        let adc = FakeAdc::new(None);
        let config = Config {
            vref_mv: Some(2560),
            ..Config::DEFAULT
        };
        let sensor = Lm35::new(&adc, 0, config);
        adc.sample.set(400);
        assert_eq!(sensor.temperature_c(), 100);

        let fallback = Lm35::new(&adc, 0, Config::DEFAULT);
        assert_eq!(fallback.temperature_c(), 195);
    }

    #[test]
    fn saturates_above_255() {
        let adc = FakeAdc::new(Some(5000));
        let sensor = Lm35::new(&adc, 0, Config::DEFAULT);
        adc.sample.set(1023);
        assert_eq!(sensor.temperature_c(), u8::MAX);
    }

    #[test]
    fn full_range_sample_fits_32_bits() {
        // sample * 150 * vref overflows 16 bits for any sample above 436 and
        // 1023 * 1500 overflows it always.
        let adc = FakeAdc::new(Some(2560));
        let sensor = Lm35::new(&adc, 0, Config::DEFAULT);
        adc.sample.set(437);
        assert_eq!(sensor.temperature_c(), 109);
        adc.sample.set(600);
        assert_eq!(sensor.temperature_c(), 150);
        adc.sample.set(1023);
        assert_eq!(sensor.temperature_c(), 255);
    }

    #[test]
    fn sixteen_bit_converter() {
        let mut adc = FakeAdc::new(Some(3300));
        adc.resolution_bits = 16;
        let sensor = Lm35::new(&adc, 0, Config::DEFAULT);
        // 250 mV at 3.3 V full scale.
        adc.sample.set(4965);
        assert_eq!(sensor.temperature_c(), 25);
        adc.sample.set(4900);
        assert_eq!(sensor.temperature_c(), 24);
        adc.sample.set(u16::MAX);
        assert_eq!(sensor.temperature_c(), 255);
    }
}

// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Named interrupt vector numbers.
//!
//! Vector 0 is reset. A board's vector stubs pass these numbers to
//! `Atmega32::service_interrupt`.

pub const INT0: u8 = 1;
pub const INT1: u8 = 2;
pub const INT2: u8 = 3;
pub const TIMER2_COMP: u8 = 4;
pub const TIMER2_OVF: u8 = 5;
pub const TIMER1_CAPT: u8 = 6;
pub const TIMER1_COMPA: u8 = 7;
pub const TIMER1_COMPB: u8 = 8;
pub const TIMER1_OVF: u8 = 9;
pub const TIMER0_COMP: u8 = 10;
pub const TIMER0_OVF: u8 = 11;
pub const SPI_STC: u8 = 12;
pub const USART_RXC: u8 = 13;
pub const USART_UDRE: u8 = 14;
pub const USART_TXC: u8 = 15;
pub const ADC: u8 = 16;
pub const EE_RDY: u8 = 17;
pub const ANA_COMP: u8 = 18;
pub const TWI: u8 = 19;
pub const SPM_RDY: u8 = 20;

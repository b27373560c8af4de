// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Interfaces for byte-oriented SPI controllers.
//!
//! Every byte written on the bus shifts one byte in, so the basic operation
//! is an exchange. Both master and slave roles use the same interface; in
//! the slave role `transfer_byte_blocking` waits for the master to clock the
//! byte out.

/// Data order determines the order of bits sent on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataOrder {
    MSBFirst,
    LSBFirst,
}

/// Clock polarity (CPOL).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPolarity {
    IdleLow,
    IdleHigh,
}

/// Clock phase (CPHA).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPhase {
    /// Sample on the leading clock edge.
    SampleLeading,
    /// Sample on the trailing clock edge.
    SampleTrailing,
}

/// Byte sent while only receiving.
pub const DUMMY_BYTE: u8 = 0xFF;

/// Receives transfer-complete notifications.
pub trait SpiClient {
    /// Called from interrupt context when a byte has been exchanged. The
    /// received byte is available through `SpiByte::read_byte`.
    fn transfer_done(&self);
}

pub trait SpiByte<'a> {
    /// Send `byte`, wait for the exchange to complete and return the byte
    /// received. The transfer-complete interrupt is masked meanwhile.
    fn transfer_byte_blocking(&self, byte: u8) -> u8;

    /// Start sending `byte` without waiting. Only valid once the previous
    /// exchange has completed, e.g. from `transfer_done`.
    fn write_byte_nonblocking(&self, byte: u8);

    /// Return the last byte received.
    fn read_byte(&self) -> u8;

    fn set_client(&self, client: &'a dyn SpiClient);

    /// Send every byte in `bytes` with blocking transfers.
    fn write_bytes(&self, bytes: &[u8]) {
        for byte in bytes {
            self.transfer_byte_blocking(*byte);
        }
    }

    /// Receive bytes into `buf` until `end` arrives or the buffer is full.
    ///
    /// The terminator is not stored. The received bytes are followed by a
    /// zero byte, so at most `buf.len() - 1` bytes are received. Returns
    /// the number of bytes received.
    fn read_until(&self, buf: &mut [u8], end: u8) -> usize {
        let Some(max) = buf.len().checked_sub(1) else {
            return 0;
        };
        let mut count = 0;
        while count < max {
            let byte = self.transfer_byte_blocking(DUMMY_BYTE);
            if byte == end {
                break;
            }
            buf[count] = byte;
            count += 1;
        }
        buf[count] = 0;
        count
    }
}

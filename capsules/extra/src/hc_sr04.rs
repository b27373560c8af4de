// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! HC-SR04 ultrasonic distance sensor on an input capture unit.
//!
//! The sensor answers a trigger pulse with an echo pulse whose width is the
//! round-trip time of a burst of ultrasound. The echo pin is wired to the
//! capture pin of a timer input capture unit, so the pulse width is measured
//! in hardware:
//!
//! 1. `read_distance` arms rising-edge capture and pulses the trigger pin.
//! 2. On the rising edge, [`HcSr04::on_edge`] zeroes the counter and arms
//!    falling-edge capture.
//! 3. On the falling edge the latched counter value is the pulse width in
//!    ticks. `on_edge` publishes it and re-arms rising-edge capture.
//! 4. `read_distance`, spinning meanwhile, sees the measurement and converts
//!    it with [`distance_cm`].
//!
//! Steps 2 and 3 run in interrupt context. The pulse width is stored before
//! the phase is advanced to `MeasurementReady` with release ordering, and
//! `read_distance` only reads it after observing that phase with acquire
//! ordering.
//!
//! `read_distance` is a blocking call: there is no scheduler to yield to,
//! so it spins for the whole round trip (tens of milliseconds). On a
//! hosted platform the spin would be replaced by waiting on a condition
//! variable signalled from `on_edge`.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let sensor = HcSr04::new(
//!     &chip.icu,
//!     ports.pin(PinId::Pd7),
//!     &delay,
//!     hc_sr04::Config::DEFAULT,
//! );
//! sensor.init();
//! let cm = sensor.read_distance()?;
//! ```

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use kernel::hil::capture::{Capture, CaptureClient, CaptureConfig, Edge, Prescaler};
use kernel::hil::gpio;
use kernel::hil::time::Delay;
use kernel::ErrorCode;

/// Half the speed of sound in cm/s. One tick of round-trip time at this
/// speed covers the distance to the target and back.
pub const HALF_SPEED_OF_SOUND_CM_S: f64 = 17150.0;

/// Interval between checks for a finished echo when waiting with a timeout.
pub const ECHO_POLL_US: u32 = 100;

/// A reasonable echo timeout in milliseconds. The longest echo the sensor
/// produces is about 23 ms, at 4 m.
pub const MAX_ECHO_DELAY_MS: u32 = 50;

/// Progress of the current measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Idle = 0,
    WaitingForRisingEdge = 1,
    WaitingForFallingEdge = 2,
    MeasurementReady = 3,
}

impl Phase {
    fn from_raw(raw: u8) -> Phase {
        match raw {
            1 => Phase::WaitingForRisingEdge,
            2 => Phase::WaitingForFallingEdge,
            3 => Phase::MeasurementReady,
            _ => Phase::Idle,
        }
    }
}

/// How long `read_distance` waits for the echo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wait {
    /// Block until the echo ends, however long that takes.
    Forever,
    /// Give up after `ms` milliseconds.
    Timeout { ms: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Capture counter clock divider.
    pub prescaler: Prescaler,
    /// CPU clock feeding the prescaler, in Hz.
    pub clock_hz: u32,
    /// Subtracted from every reading that is larger than it.
    pub calibration_cm: i16,
    /// How long the trigger pin is held high.
    pub trigger_pulse_ms: u32,
    pub wait: Wait,
}

impl Config {
    pub const DEFAULT: Config = Config {
        prescaler: Prescaler::Div8,
        clock_hz: 1_000_000,
        calibration_cm: -1,
        trigger_pulse_ms: 1,
        wait: Wait::Forever,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangingError {
    /// A measurement is already in progress.
    Busy,
    /// No complete echo arrived within the configured wait.
    Timeout,
    /// The echo was longer than one period of the capture counter.
    Overflow,
}

impl From<RangingError> for ErrorCode {
    fn from(err: RangingError) -> ErrorCode {
        match err {
            RangingError::Busy => ErrorCode::BUSY,
            RangingError::Timeout => ErrorCode::FAIL,
            RangingError::Overflow => ErrorCode::SIZE,
        }
    }
}

/// Convert an echo pulse width to centimetres.
///
/// `raw = ticks / (clock_hz / (17150 * divisor))`, truncated toward zero.
/// The calibration offset is subtracted only if `raw > calibration_cm`, so
/// a small reading is never pushed to zero or below. Results beyond
/// `u16::MAX` saturate.
pub fn distance_cm(ticks: u16, prescaler: Prescaler, clock_hz: u32, calibration_cm: i16) -> u16 {
    let divisor = f64::from(prescaler.divisor().unwrap_or(0));
    let ticks_per_cm = f64::from(clock_hz) / (HALF_SPEED_OF_SOUND_CM_S * divisor);
    // Float to integer casts truncate and saturate.
    let raw = (f64::from(ticks) / ticks_per_cm) as u16;

    let raw = i32::from(raw);
    let calibration = i32::from(calibration_cm);
    if raw > calibration {
        u16::try_from(raw - calibration).unwrap_or(u16::MAX)
    } else {
        raw as u16
    }
}

/// Measurement state shared with the capture interrupt.
struct EchoSession {
    phase: AtomicU8,
    pulse_width_ticks: AtomicU16,
    overflowed: AtomicBool,
}

impl EchoSession {
    const fn new() -> EchoSession {
        EchoSession {
            phase: AtomicU8::new(Phase::Idle as u8),
            pulse_width_ticks: AtomicU16::new(0),
            overflowed: AtomicBool::new(false),
        }
    }

    fn phase(&self) -> Phase {
        Phase::from_raw(self.phase.load(Ordering::Acquire))
    }

    fn publish(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::Release);
    }
}

pub struct HcSr04<'a, C: Capture<'a>, P: gpio::Output + gpio::Configure, D: Delay> {
    capture: &'a C,
    trigger: &'a P,
    delay: &'a D,
    config: Config,
    session: EchoSession,
}

impl<'a, C: Capture<'a>, P: gpio::Output + gpio::Configure, D: Delay> HcSr04<'a, C, P, D> {
    pub fn new(capture: &'a C, trigger: &'a P, delay: &'a D, config: Config) -> Self {
        Self {
            capture,
            trigger,
            delay,
            config,
            session: EchoSession::new(),
        }
    }

    /// Set up the capture unit and trigger pin and register for capture
    /// events. Global interrupts must be enabled separately.
    pub fn init(&'a self) {
        self.capture.init(&CaptureConfig {
            prescaler: self.config.prescaler,
            initial_edge: Edge::Rising,
            noise_canceler: false,
        });
        self.capture.set_client(self);
        self.trigger.clear();
        self.trigger.make_output();
        log::debug!("hc_sr04: ready, {:?}", self.config);
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Width of the last measured echo pulse.
    pub fn pulse_width_ticks(&self) -> u16 {
        self.session.pulse_width_ticks.load(Ordering::Relaxed)
    }

    /// Measure the distance to the nearest object, in centimetres.
    ///
    /// Blocks until the echo has been measured or the configured wait runs
    /// out. The sensor is idle again on return, whatever the outcome.
    pub fn read_distance(&self) -> Result<u16, RangingError> {
        let claimed = critical_section::with(|_| {
            if self.session.phase() != Phase::Idle {
                return false;
            }
            self.capture.set_edge(Edge::Rising);
            self.session.publish(Phase::WaitingForRisingEdge);
            true
        });
        if !claimed {
            log::warn!("hc_sr04: measurement already in progress");
            return Err(RangingError::Busy);
        }

        self.trigger.set();
        self.delay.delay_ms(self.config.trigger_pulse_ms);
        self.trigger.clear();

        let ready = self.wait_for_echo();
        let ticks = self.pulse_width_ticks();
        let overflowed = self.session.overflowed.load(Ordering::Relaxed);
        self.reset();

        if !ready {
            log::warn!("hc_sr04: no echo");
            return Err(RangingError::Timeout);
        }
        if overflowed {
            log::warn!("hc_sr04: echo longer than one counter period");
            return Err(RangingError::Overflow);
        }
        let distance = distance_cm(
            ticks,
            self.config.prescaler,
            self.config.clock_hz,
            self.config.calibration_cm,
        );
        log::trace!("hc_sr04: {} ticks, {} cm", ticks, distance);
        Ok(distance)
    }

    fn echo_ready(&self) -> bool {
        self.session.phase() == Phase::MeasurementReady
    }

    fn wait_for_echo(&self) -> bool {
        match self.config.wait {
            Wait::Forever => {
                while !self.echo_ready() {
                    core::hint::spin_loop();
                }
                true
            }
            Wait::Timeout { ms } => {
                let limit_us = ms.saturating_mul(1000);
                let mut waited_us = 0;
                loop {
                    if self.echo_ready() {
                        return true;
                    }
                    if waited_us >= limit_us {
                        return false;
                    }
                    self.delay.delay_us(ECHO_POLL_US);
                    waited_us = waited_us.saturating_add(ECHO_POLL_US);
                }
            }
        }
    }

    /// Back to `Idle`, listening for the next rising edge.
    fn reset(&self) {
        critical_section::with(|_| {
            self.capture.set_edge(Edge::Rising);
            self.session.publish(Phase::Idle);
        });
    }
}

impl<'a, C: Capture<'a>, P: gpio::Output + gpio::Configure, D: Delay> CaptureClient
    for HcSr04<'a, C, P, D>
{
    fn on_edge(&self) {
        match self.session.phase() {
            Phase::WaitingForRisingEdge => {
                self.capture.clear_counter();
                self.capture.set_edge(Edge::Falling);
                self.session.publish(Phase::WaitingForFallingEdge);
            }
            Phase::WaitingForFallingEdge => {
                self.session
                    .pulse_width_ticks
                    .store(self.capture.capture_value(), Ordering::Relaxed);
                self.session
                    .overflowed
                    .store(self.capture.counter_overflowed(), Ordering::Relaxed);
                self.capture.set_edge(Edge::Rising);
                self.session.publish(Phase::MeasurementReady);
            }
            Phase::Idle | Phase::MeasurementReady => {}
        }
    }
}

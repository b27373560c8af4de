// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Drivers for LEDs that abstract away polarity and pin.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let led = LedLow::new(ports.pin(PinId::Pc2));
//! led.init();
//! led.on();
//! ```

use kernel::hil::gpio;

/// Simple on/off interface for LED pins.
pub trait Led {
    /// Initialize the LED. Must be called before the LED is used.
    fn init(&self);

    fn on(&self);

    fn off(&self);

    fn toggle(&self);

    /// Return whether the LED is lit.
    fn read(&self) -> bool;
}

/// For LEDs in which on is when GPIO is high.
pub struct LedHigh<'a, P: gpio::Pin> {
    pub pin: &'a P,
}

/// For LEDs in which on is when GPIO is low.
pub struct LedLow<'a, P: gpio::Pin> {
    pub pin: &'a P,
}

impl<'a, P: gpio::Pin> LedHigh<'a, P> {
    pub fn new(pin: &'a P) -> Self {
        Self { pin }
    }
}

impl<'a, P: gpio::Pin> LedLow<'a, P> {
    pub fn new(pin: &'a P) -> Self {
        Self { pin }
    }
}

impl<P: gpio::Pin> Led for LedHigh<'_, P> {
    fn init(&self) {
        self.pin.clear();
        self.pin.make_output();
    }

    fn on(&self) {
        self.pin.set();
    }

    fn off(&self) {
        self.pin.clear();
    }

    fn toggle(&self) {
        self.pin.toggle();
    }

    fn read(&self) -> bool {
        self.pin.read()
    }
}

impl<P: gpio::Pin> Led for LedLow<'_, P> {
    fn init(&self) {
        self.pin.set();
        self.pin.make_output();
    }

    fn on(&self) {
        self.pin.clear();
    }

    fn off(&self) {
        self.pin.set();
    }

    fn toggle(&self) {
        self.pin.toggle();
    }

    fn read(&self) -> bool {
        !self.pin.read()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use core::cell::Cell;
    use kernel::hil::gpio::FloatingState;

    #[derive(Default)]
    struct FakePin {
        level: Cell<bool>,
        output: Cell<bool>,
    }

    impl gpio::Output for FakePin {
        fn set(&self) {
            self.level.set(true);
        }
        fn clear(&self) {
            self.level.set(false);
        }
        fn toggle(&self) -> bool {
            self.level.set(!self.level.get());
            self.level.get()
        }
    }

    impl gpio::Input for FakePin {
        fn read(&self) -> bool {
            self.level.get()
        }
    }

    impl gpio::Configure for FakePin {
        fn make_output(&self) {
            self.output.set(true);
        }
        fn make_input(&self) {
            self.output.set(false);
        }
        fn set_floating_state(&self, _state: FloatingState) {}
        fn floating_state(&self) -> FloatingState {
            FloatingState::PullNone
        }
        fn is_output(&self) -> bool {
            self.output.get()
        }
    }

    #[test]
    fn active_high_led() {
        let pin = FakePin::default();
        pin.level.set(true);
        let led = LedHigh::new(&pin);
        led.init();
        assert!(pin.output.get());
        assert!(!led.read());

        led.on();
        assert!(pin.level.get());
        assert!(led.read());
        led.toggle();
        assert!(!led.read());
        led.toggle();
        led.off();
        assert!(!pin.level.get());
    }

    #[test]
    fn active_low_led() {
        let pin = FakePin::default();
        let led = LedLow::new(&pin);
        led.init();
        assert!(pin.level.get());
        assert!(!led.read());

        led.on();
        assert!(!pin.level.get());
        assert!(led.read());
        led.toggle();
        assert!(!led.read());
    }
}

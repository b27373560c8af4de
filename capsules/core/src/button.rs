// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2025.

//! Push button on a GPIO pin, with optional debouncing.
//!
//! The pin level is mapped to a [`ButtonState`] according to how the button
//! is wired. With debouncing enabled a press is only reported if the pin
//! still reads pressed after the debounce delay.
//!
//! A button on a pin with an external interrupt can also notify a client
//! when it is pressed or released, through [`Button::attach_interrupt`].
//!
//! ```rust,ignore
//! button.attach_interrupt(&chip.exti, PinId::Pd2, ButtonEvent::Press, &handler)?;
//! ```

use kernel::hil::eic::{self, InterruptMode, PinInterrupts};
use kernel::hil::gpio;
use kernel::hil::time::Delay;
use kernel::ErrorCode;

/// Values that are read from the button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    Pressed,
}

/// Whether a pressed button drives the pin high or low.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationMode {
    ActiveHigh,
    ActiveLow,
}

/// Button transitions that raise an interrupt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
    Release,
    /// Either a press or a release.
    Change,
}

pub struct Button<'a, P: gpio::Pin, D: Delay> {
    pin: &'a P,
    delay: &'a D,
    mode: ActivationMode,
    floating_state: gpio::FloatingState,
    debounce_ms: Option<u32>,
}

impl<'a, P: gpio::Pin, D: Delay> Button<'a, P, D> {
    /// A button wired active-low usually wants `FloatingState::PullUp`.
    pub fn new(
        pin: &'a P,
        delay: &'a D,
        mode: ActivationMode,
        floating_state: gpio::FloatingState,
        debounce_ms: Option<u32>,
    ) -> Self {
        Self {
            pin,
            delay,
            mode,
            floating_state,
            debounce_ms,
        }
    }

    pub fn init(&self) {
        self.pin.make_input();
        self.pin.set_floating_state(self.floating_state);
    }

    fn sample(&self) -> bool {
        match self.mode {
            ActivationMode::ActiveHigh => self.pin.read(),
            ActivationMode::ActiveLow => !self.pin.read(),
        }
    }

    pub fn read(&self) -> ButtonState {
        let pressed = match self.debounce_ms {
            Some(ms) if self.sample() => {
                self.delay.delay_ms(ms);
                self.sample()
            }
            _ => self.sample(),
        };
        if pressed {
            ButtonState::Pressed
        } else {
            ButtonState::Released
        }
    }

    fn interrupt_mode(&self, event: ButtonEvent) -> InterruptMode {
        match (event, self.mode) {
            (ButtonEvent::Change, _) => InterruptMode::AnyChange,
            (ButtonEvent::Press, ActivationMode::ActiveHigh)
            | (ButtonEvent::Release, ActivationMode::ActiveLow) => InterruptMode::RisingEdge,
            (ButtonEvent::Press, ActivationMode::ActiveLow)
            | (ButtonEvent::Release, ActivationMode::ActiveHigh) => InterruptMode::FallingEdge,
        }
    }

    /// Call `client` from interrupt context on every `event`.
    ///
    /// `pin` names this button's pin to the interrupt controller. Returns
    /// `NOSUPPORT` if the pin has no external interrupt and `INVAL` if its
    /// line cannot detect the edge `event` needs.
    pub fn attach_interrupt<E: PinInterrupts<'a>>(
        &self,
        eic: &E,
        pin: E::Pin,
        event: ButtonEvent,
        client: &'a dyn eic::Client,
    ) -> Result<(), ErrorCode> {
        eic.pin_enable(pin, self.interrupt_mode(event), client)
    }

    /// Returns `NOSUPPORT` if the pin has no external interrupt.
    pub fn detach_interrupt<E: PinInterrupts<'a>>(
        &self,
        eic: &E,
        pin: E::Pin,
    ) -> Result<(), ErrorCode> {
        eic.pin_disable(pin)
    }
}

use crate::board::{Board, Button};
use crate::clock::ClockState;
use crate::config::DEBOUNCE_TICKS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Start/stop flipped the clock; carries the new running flag.
    StartStop { running: bool },
    /// Reset went down on this tick.
    Reset,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Last raw sample, true when the line was low
    pub pressed: bool,
    /// Released samples seen in a row since the press
    pub release_count: u8,
    /// Set on a counted press, cleared once the release is stable
    pub latched: bool,
}

impl ButtonState {
    pub const fn new() -> Self {
        Self {
            pressed: false,
            release_count: 0,
            latched: false,
        }
    }

    /// Feeds one sample. Returns true on a press that should count.
    fn sample_edge(&mut self, pressed: bool) -> bool {
        self.pressed = pressed;
        if pressed {
            self.release_count = 0;
            if !self.latched {
                self.latched = true;
                return true;
            }
        } else if self.latched {
            self.release_count += 1;
            if self.release_count >= DEBOUNCE_TICKS {
                self.latched = false;
                self.release_count = 0;
            }
        }
        false
    }

    /// Feeds one sample without filtering. Returns true on the press edge.
    fn sample_level(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.pressed;
        self.pressed = pressed;
        edge
    }
}

#[derive(Default)]
pub struct Debouncer {
    start_stop: ButtonState,
    reset: ButtonState,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            start_stop: ButtonState::new(),
            reset: ButtonState::new(),
        }
    }

    pub fn start_stop(&self) -> &ButtonState {
        &self.start_stop
    }

    pub fn reset(&self) -> &ButtonState {
        &self.reset
    }

    /// Samples both buttons once and applies them to `clock`.
    ///
    /// A held reset wins over a start/stop press seen on the same tick.
    pub fn sample_tick<B: Board>(&mut self, board: &mut B, clock: &mut ClockState) -> Option<ButtonEvent> {
        // Buttons pull the line low when pressed
        let start_pressed = !board.button_is_high(Button::StartStop);
        let reset_pressed = !board.button_is_high(Button::Reset);

        let mut event = None;
        if self.start_stop.sample_edge(start_pressed) {
            let running = clock.toggle();
            event = Some(ButtonEvent::StartStop { running });
        }

        let reset_edge = self.reset.sample_level(reset_pressed);
        if reset_pressed {
            clock.reset();
            if reset_edge {
                event = Some(ButtonEvent::Reset);
            }
        }
        event
    }
}

use core::fmt::Write;

use heapless::String;

use crate::display::DisplayState;

/// Decimal point between the minute and second pairs
pub const MINUTE_SECOND_DP: u8 = 0b0100;

/// Elapsed time of the stopwatch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockState {
    pub minutes: u16,
    pub seconds: u8,
    pub running: bool,
}

impl ClockState {
    pub const fn new() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
            running: false,
        }
    }

    /// Advances one second if running. Returns true when the minute changed.
    pub fn second_tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.seconds += 1;
        if self.seconds >= 60 {
            self.seconds = 0;
            self.minutes = self.minutes.saturating_add(1);
            return true;
        }
        false
    }

    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Back to 00:00, stopped.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Writes mm.ss to the display. Only the last two minute digits fit.
    pub fn render(&self, display: &mut DisplayState) {
        let mut text: String<4> = String::new();
        // Two zero-padded pairs always fit in four bytes
        write!(text, "{:02}{:02}", self.minutes % 100, self.seconds).ok();
        display.show(&text, MINUTE_SECOND_DP);
    }
}

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::config::COLUMNS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    StartStop,
    Reset,
}

/// Levels are electrical: a set bit drives the line high.
pub trait Board {
    /// Drives the 8 segment lines, bit `n` onto line `n`.
    fn set_segment_lines(&mut self, levels: u8);

    /// Drives the column select lines, bit `n` onto column line `n`.
    fn set_column_lines(&mut self, levels: u8);

    /// Raw level of a button input.
    fn button_is_high(&mut self, button: Button) -> bool;

    /// Pulls every output low.
    fn release_outputs(&mut self) {
        self.set_column_lines(0);
        self.set_segment_lines(0);
    }
}

/// [`Board`] built from individual `embedded-hal` pins.
pub struct PinBoard<SEG, COL, BTN> {
    segments: [SEG; 8],
    columns: [COL; COLUMNS],
    start_stop: BTN,
    reset: BTN,
}

impl<SEG, COL, BTN> PinBoard<SEG, COL, BTN>
where
    SEG: OutputPin,
    COL: OutputPin,
    BTN: InputPin,
{
    pub fn new(segments: [SEG; 8], columns: [COL; COLUMNS], start_stop: BTN, reset: BTN) -> Self {
        Self {
            segments,
            columns,
            start_stop,
            reset,
        }
    }

    /// Gives the pins back.
    pub fn free(self) -> ([SEG; 8], [COL; COLUMNS], BTN, BTN) {
        (self.segments, self.columns, self.start_stop, self.reset)
    }
}

fn drive<P: OutputPin>(pins: &mut [P], levels: u8) {
    for (i, pin) in pins.iter_mut().enumerate() {
        if levels & (1 << i) != 0 {
            pin.set_high().ok();
        } else {
            pin.set_low().ok();
        }
    }
}

impl<SEG, COL, BTN> Board for PinBoard<SEG, COL, BTN>
where
    SEG: OutputPin,
    COL: OutputPin,
    BTN: InputPin,
{
    fn set_segment_lines(&mut self, levels: u8) {
        drive(&mut self.segments, levels);
    }

    fn set_column_lines(&mut self, levels: u8) {
        drive(&mut self.columns, levels);
    }

    fn button_is_high(&mut self, button: Button) -> bool {
        let pin = match button {
            Button::StartStop => &self.start_stop,
            Button::Reset => &self.reset,
        };
        // A failed read counts as released
        pin.is_high().unwrap_or(true)
    }
}

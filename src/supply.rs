use core::fmt::Write;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use heapless::String;
use rtic_core::Mutex;

use crate::config::{
    ADC_STEPS, LOW_SUPPLY_HOLD_MS, MIN_SUPPLY_MV, SUPPLY_FULL_SCALE_MV, SUPPLY_SETTLE_US,
};
use crate::display::DisplayState;
use crate::scheduler::Stopwatch;

/// Decimal point after the first digit, so millivolts read as volts
pub const VOLTS_DP: u8 = 0b1000;

/// Converter wired to the supply rail.
pub trait SupplySense {
    type Error;

    /// Powers the converter and selects the supply channel.
    fn enable(&mut self);

    /// Raw conversion result, `WouldBlock` while the conversion runs.
    fn sample(&mut self) -> nb::Result<u16, Self::Error>;

    /// Powers the converter down.
    fn disable(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupplyError<E> {
    /// The converter failed, so the supply can't be trusted.
    Sensor(E),
    BelowFloor { millivolts: u16 },
}

/// Linear calibration from converter steps to millivolts.
pub fn to_millivolts(raw: u16) -> u16 {
    let mv = u32::from(raw) * SUPPLY_FULL_SCALE_MV / ADC_STEPS;
    u16::try_from(mv).unwrap_or(u16::MAX)
}

/// Compares a reading against the floor.
pub fn classify<E>(millivolts: u16) -> Result<u16, SupplyError<E>> {
    if millivolts < MIN_SUPPLY_MV {
        Err(SupplyError::BelowFloor { millivolts })
    } else {
        Ok(millivolts)
    }
}

/// Takes a single reading in millivolts and leaves the converter off.
pub fn measure<S, D>(sense: &mut S, delay: &mut D) -> Result<u16, SupplyError<S::Error>>
where
    S: SupplySense,
    D: DelayUs<u32>,
{
    sense.enable();
    delay.delay_us(SUPPLY_SETTLE_US);
    let raw = nb::block!(sense.sample());
    sense.disable();
    raw.map(to_millivolts).map_err(SupplyError::Sensor)
}

/// Startup check: measure, show the reading, and on failure hold it on the
/// display before putting the stopwatch into its safe state.
///
/// The stopwatch is only locked for the display update and the halt, so the
/// tick keeps multiplexing during the conversion and the hold.
pub fn check<S, D, M>(sense: &mut S, delay: &mut D, stopwatch: &mut M) -> Result<u16, SupplyError<S::Error>>
where
    S: SupplySense,
    D: DelayUs<u32> + DelayMs<u32>,
    M: Mutex<T = Stopwatch>,
{
    let millivolts = match measure(sense, delay) {
        Ok(millivolts) => millivolts,
        Err(err) => {
            shut_down(delay, stopwatch);
            return Err(err);
        }
    };
    stopwatch.lock(|sw| sw.show_supply(millivolts));

    let verdict = classify(millivolts);
    if verdict.is_err() {
        shut_down(delay, stopwatch);
    }
    verdict
}

fn shut_down<D, M>(delay: &mut D, stopwatch: &mut M)
where
    D: DelayMs<u32>,
    M: Mutex<T = Stopwatch>,
{
    delay.delay_ms(LOW_SUPPLY_HOLD_MS);
    stopwatch.lock(|sw| sw.halt());
}

/// Puts a reading on the display, e.g. 3125 mV as "3.125".
pub fn render(millivolts: u16, display: &mut DisplayState) {
    let mut text: String<5> = String::new();
    write!(text, "{}", millivolts).ok();
    display.show(&text, VOLTS_DP);
}

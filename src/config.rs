//! Build-time constants for the stopwatch firmware

/// Scheduler firings per second
pub const TICK_HZ: u16 = 512;

/// Alarm period for one firing, truncated to whole microseconds
pub const TICK_PERIOD_US: u32 = 1_000_000 / TICK_HZ as u32;

/// Firings ignored after power-on before any logic runs
pub const WARMUP_TICKS: u16 = 256;

/// Consecutive released samples needed before start/stop re-arms
pub const DEBOUNCE_TICKS: u8 = 8;

/// Number of multiplexed digit columns
pub const COLUMNS: usize = 4;

/// Supply floor in millivolts. Readings strictly below it halt the device.
pub const MIN_SUPPLY_MV: u16 = 3000;

/// Millivolts represented by a full-scale conversion (VSYS/3 against 3.3 V).
pub const SUPPLY_FULL_SCALE_MV: u32 = 9900;

/// Conversion steps of the 12-bit converter
pub const ADC_STEPS: u32 = 4096;

/// Wait between enabling the converter and starting a conversion
pub const SUPPLY_SETTLE_US: u32 = 1000;

/// How long a failing reading stays on the display before shutdown
pub const LOW_SUPPLY_HOLD_MS: u32 = 2000;

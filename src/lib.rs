//! Stopwatch logic for a 4-digit multiplexed seven-segment display.
//!
//! Everything here runs from one periodic tick through [`Stopwatch::fire`] and
//! talks to hardware only through [`Board`] and [`SupplySense`], so the same
//! code drives the firmware and the host tests.
#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod buttons;
pub mod clock;
pub mod config;
pub mod display;
pub mod scheduler;
pub mod segment;
pub mod supply;

pub use board::{Board, Button, PinBoard};
pub use buttons::ButtonEvent;
pub use clock::ClockState;
pub use display::DisplayState;
pub use scheduler::{Phase, Stopwatch, Tick};
pub use supply::{SupplyError, SupplySense};

use crate::board::Board;
use crate::buttons::{ButtonEvent, Debouncer};
use crate::clock::ClockState;
use crate::config::{TICK_HZ, WARMUP_TICKS};
use crate::display::{DisplayState, Multiplexer};
use crate::supply;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Power-on settling, counts down to zero.
    Warmup { remaining: u16 },
    Running,
    /// Terminal. Outputs are released and no more ticks are wanted.
    Halted,
}

/// What one firing did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    Warmup,
    /// Last warm-up firing. Logic starts on the next one.
    WarmedUp,
    Ran {
        button: Option<ButtonEvent>,
        second: bool,
    },
    /// The tick source should be stopped.
    Halted,
}

/// Everything the tick handler mutates.
pub struct Stopwatch {
    phase: Phase,
    display: DisplayState,
    mux: Multiplexer,
    buttons: Debouncer,
    clock: ClockState,
    sub_second: u16,
}

impl Stopwatch {
    pub const fn new() -> Self {
        Self::with_warmup(WARMUP_TICKS)
    }

    pub const fn with_warmup(ticks: u16) -> Self {
        let phase = if ticks == 0 {
            Phase::Running
        } else {
            Phase::Warmup { remaining: ticks }
        };
        Self {
            phase,
            display: DisplayState::blank(),
            mux: Multiplexer::new(),
            buttons: Debouncer::new(),
            clock: ClockState::new(),
            sub_second: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// One firing of the periodic tick.
    pub fn fire<B: Board>(&mut self, board: &mut B) -> Tick {
        match self.phase {
            Phase::Warmup { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.phase = Phase::Running;
                    Tick::WarmedUp
                } else {
                    self.phase = Phase::Warmup { remaining };
                    Tick::Warmup
                }
            }
            Phase::Running => self.run(board),
            Phase::Halted => {
                board.release_outputs();
                Tick::Halted
            }
        }
    }

    fn run<B: Board>(&mut self, board: &mut B) -> Tick {
        // Reset has to land before this tick's accumulator step
        let button = self.buttons.sample_tick(board, &mut self.clock);
        self.mux.render_tick(&self.display, board);

        self.sub_second += 1;
        let second = self.sub_second >= TICK_HZ;
        if second {
            self.sub_second = 0;
            self.second_tick();
        }
        Tick::Ran { button, second }
    }

    /// Once-a-second step: count if running, always redraw.
    pub fn second_tick(&mut self) {
        self.clock.second_tick();
        self.clock.render(&mut self.display);
    }

    /// Shows a supply reading until the clock takes the display over.
    pub fn show_supply(&mut self, millivolts: u16) {
        supply::render(millivolts, &mut self.display);
    }

    /// Enters the safe state. The next firing releases the outputs.
    pub fn halt(&mut self) {
        self.phase = Phase::Halted;
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::sim::{SimBoard, Write};
    use crate::clock::MINUTE_SECOND_DP;
    use crate::config::DEBOUNCE_TICKS;

    fn shows(sw: &Stopwatch, text: &str, dp: u8) -> bool {
        let mut expected = DisplayState::blank();
        expected.show(text, dp);
        *sw.display() == expected
    }

    /// Runs `n` firings with the buttons as currently set on `board`.
    fn run_ticks(sw: &mut Stopwatch, board: &mut SimBoard, n: usize) {
        for _ in 0..n {
            sw.fire(board);
        }
    }

    fn one_second(sw: &mut Stopwatch, board: &mut SimBoard) {
        run_ticks(sw, board, TICK_HZ as usize);
    }

    fn press_start(sw: &mut Stopwatch, board: &mut SimBoard) {
        board.start_pressed = true;
        sw.fire(board);
        board.start_pressed = false;
        run_ticks(sw, board, DEBOUNCE_TICKS as usize);
    }

    #[test]
    fn warmup_suppresses_everything() {
        let mut sw = Stopwatch::new();
        let mut board = SimBoard {
            start_pressed: true,
            ..Default::default()
        };

        for _ in 0..WARMUP_TICKS - 1 {
            assert_eq!(sw.fire(&mut board), Tick::Warmup);
        }
        assert_eq!(sw.fire(&mut board), Tick::WarmedUp);
        assert_eq!(sw.phase(), Phase::Running);
        assert!(board.writes.is_empty());
        assert!(!sw.clock().running);

        assert!(matches!(sw.fire(&mut board), Tick::Ran { .. }));
        assert!(sw.clock().running);
        assert!(!board.writes.is_empty());
    }

    #[test]
    fn accumulator_runs_once_per_tick_hz_firings() {
        let mut sw = Stopwatch::with_warmup(0);
        let mut board = SimBoard::default();
        let mut seconds = 0;
        for _ in 0..TICK_HZ as usize * 3 {
            if let Tick::Ran { second: true, .. } = sw.fire(&mut board) {
                seconds += 1;
            }
        }
        assert_eq!(seconds, 3);
    }

    #[test]
    fn every_running_firing_refreshes_one_column() {
        let mut sw = Stopwatch::with_warmup(0);
        let mut board = SimBoard::default();
        sw.fire(&mut board);
        assert_eq!(
            &board.writes[..],
            &[Write::Columns(0), Write::Segments(0xff), Write::Columns(0b1000)]
        );
    }

    #[test]
    fn start_then_one_minute() {
        let mut sw = Stopwatch::new();
        let mut board = SimBoard::default();
        run_ticks(&mut sw, &mut board, WARMUP_TICKS as usize);

        press_start(&mut sw, &mut board);
        assert!(sw.clock().running);

        let mut seconds = 0;
        while seconds < 60 {
            if let Tick::Ran { second: true, .. } = sw.fire(&mut board) {
                seconds += 1;
            }
        }
        assert_eq!((sw.clock().minutes, sw.clock().seconds), (1, 0));
        assert!(shows(&sw, "0100", MINUTE_SECOND_DP));
    }

    #[test]
    fn reset_while_running() {
        let mut sw = Stopwatch::with_warmup(0);
        let mut board = SimBoard::default();
        press_start(&mut sw, &mut board);
        while sw.clock().seconds < 30 {
            sw.fire(&mut board);
        }

        board.reset_pressed = true;
        assert!(matches!(
            sw.fire(&mut board),
            Tick::Ran {
                button: Some(ButtonEvent::Reset),
                ..
            }
        ));
        assert_eq!(*sw.clock(), ClockState::new());

        // Held across a second boundary the clock stays frozen at zero
        one_second(&mut sw, &mut board);
        assert_eq!(*sw.clock(), ClockState::new());
        assert!(shows(&sw, "0000", MINUTE_SECOND_DP));
    }

    #[test]
    fn never_started_shows_zero() {
        let mut sw = Stopwatch::with_warmup(0);
        let mut board = SimBoard::default();
        for _ in 0..5 {
            one_second(&mut sw, &mut board);
            assert!(shows(&sw, "0000", MINUTE_SECOND_DP));
        }
        assert_eq!(*sw.clock(), ClockState::new());
    }

    #[test]
    fn stopped_clock_keeps_its_value() {
        let mut sw = Stopwatch::with_warmup(0);
        let mut board = SimBoard::default();
        press_start(&mut sw, &mut board);
        for _ in 0..3 {
            one_second(&mut sw, &mut board);
        }
        press_start(&mut sw, &mut board);
        let frozen = *sw.clock();
        one_second(&mut sw, &mut board);
        assert_eq!(*sw.clock(), frozen);
        assert!(!frozen.running);
    }

    #[test]
    fn supply_reading_stays_until_first_second() {
        let mut sw = Stopwatch::with_warmup(0);
        let mut board = SimBoard::default();
        sw.show_supply(3300);
        run_ticks(&mut sw, &mut board, TICK_HZ as usize - 1);
        assert!(shows(&sw, "3300", supply::VOLTS_DP));
        sw.fire(&mut board);
        assert!(shows(&sw, "0000", MINUTE_SECOND_DP));
    }

    #[test]
    fn halt_releases_outputs_and_stays_halted() {
        let mut sw = Stopwatch::with_warmup(0);
        let mut board = SimBoard::default();
        run_ticks(&mut sw, &mut board, 3);
        board.writes.clear();

        sw.halt();
        assert_eq!(sw.fire(&mut board), Tick::Halted);
        assert_eq!(board.writes, [Write::Columns(0), Write::Segments(0)]);
        assert_eq!(sw.fire(&mut board), Tick::Halted);
        assert_eq!(sw.phase(), Phase::Halted);
    }

    #[test]
    fn halt_during_warmup_is_terminal() {
        let mut sw = Stopwatch::new();
        let mut board = SimBoard::default();
        sw.fire(&mut board);
        sw.halt();
        run_ticks(&mut sw, &mut board, WARMUP_TICKS as usize);
        assert_eq!(sw.phase(), Phase::Halted);
    }
}

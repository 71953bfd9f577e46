#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

use embedded_hal::adc::OneShot;
use rp_pico::hal::{
    adc::{Adc, AdcPin},
    gpio::{bank0::Gpio29, FunctionSioInput, Pin, PullNone},
    pac,
};
use stopwatch::SupplySense;

type SupplyPin = AdcPin<Pin<Gpio29, FunctionSioInput, PullNone>>;

/// VSYS sense on ADC3. The converter only exists while a reading is taken.
pub struct PicoSupply {
    resets: pac::RESETS,
    parked: Option<pac::ADC>,
    adc: Option<Adc>,
    pin: SupplyPin,
}

impl PicoSupply {
    pub fn new(adc: pac::ADC, resets: pac::RESETS, pin: SupplyPin) -> Self {
        Self {
            resets,
            parked: Some(adc),
            adc: None,
            pin,
        }
    }
}

impl SupplySense for PicoSupply {
    type Error = ();

    fn enable(&mut self) {
        if let Some(adc) = self.parked.take() {
            self.adc = Some(Adc::new(adc, &mut self.resets));
        }
    }

    fn sample(&mut self) -> nb::Result<u16, ()> {
        let Some(adc) = self.adc.as_mut() else {
            return Err(nb::Error::Other(()));
        };
        adc.read(&mut self.pin).map_err(|e| e.map(|_| ()))
    }

    fn disable(&mut self) {
        if let Some(adc) = self.adc.take() {
            let adc = adc.free();
            adc.cs().modify(|_, w| w.en().clear_bit());
            self.parked = Some(adc);
        }
    }
}

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::*;
    use cortex_m::delay::Delay;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::ExtU32,
        gpio::{DynPinId, FunctionSioOutput, PullDown, PullUp},
        sio::Sio,
        timer::{Alarm, Alarm0, Timer},
        watchdog::Watchdog,
    };
    use stopwatch::{config, supply, PinBoard, Stopwatch, SupplyError, Tick};

    type OutPin = Pin<DynPinId, FunctionSioOutput, PullDown>;
    type ButtonPin = Pin<DynPinId, FunctionSioInput, PullUp>;
    type DisplayBoard = PinBoard<OutPin, OutPin, ButtonPin>;

    // Touched by the tick and, once at boot, by the supply check in idle
    #[shared]
    struct Shared {
        stopwatch: Stopwatch,
    }

    #[local]
    struct Local {
        board: DisplayBoard,
        alarm: Alarm0,
        supply: PicoSupply,
        delay: Delay,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();
        defmt::info!("system clock {=u32} Hz", clocks.system_clock.freq().to_Hz());

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        // a, dp, b, f, g, e, d, c in display wiring order
        let segments: [OutPin; 8] = [
            pins.gpio0.into_push_pull_output().into_dyn_pin(),
            pins.gpio1.into_push_pull_output().into_dyn_pin(),
            pins.gpio2.into_push_pull_output().into_dyn_pin(),
            pins.gpio3.into_push_pull_output().into_dyn_pin(),
            pins.gpio4.into_push_pull_output().into_dyn_pin(),
            pins.gpio5.into_push_pull_output().into_dyn_pin(),
            pins.gpio6.into_push_pull_output().into_dyn_pin(),
            pins.gpio7.into_push_pull_output().into_dyn_pin(),
        ];
        // GPIO8 drives the rightmost digit
        let columns: [OutPin; config::COLUMNS] = [
            pins.gpio8.into_push_pull_output().into_dyn_pin(),
            pins.gpio9.into_push_pull_output().into_dyn_pin(),
            pins.gpio10.into_push_pull_output().into_dyn_pin(),
            pins.gpio11.into_push_pull_output().into_dyn_pin(),
        ];
        let start_stop: ButtonPin = pins.gpio14.into_pull_up_input().into_dyn_pin();
        let reset: ButtonPin = pins.gpio15.into_pull_up_input().into_dyn_pin();
        let board = PinBoard::new(segments, columns, start_stop, reset);

        let sense = AdcPin::new(pins.voltage_monitor.into_floating_input()).unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        alarm.schedule(config::TICK_PERIOD_US.micros()).unwrap();
        alarm.enable_interrupt();
        defmt::info!(
            "tick every {=u32} us, warm-up {=u16} ticks",
            config::TICK_PERIOD_US,
            config::WARMUP_TICKS
        );

        let delay = Delay::new(ctx.core.SYST, clocks.system_clock.freq().to_Hz());
        let supply = PicoSupply::new(pac.ADC, pac.RESETS, sense);

        (
            Shared {
                stopwatch: Stopwatch::new(),
            },
            Local {
                board,
                alarm,
                supply,
                delay,
            },
            init::Monotonics(),
        )
    }

    // Hardware Task: Timer Interrupt (512Hz)
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [stopwatch], local = [alarm, board])]
    fn tick(mut ctx: tick::Context) {
        let alarm = ctx.local.alarm;
        let board = ctx.local.board;
        alarm.clear_interrupt();

        match ctx.shared.stopwatch.lock(|sw| sw.fire(board)) {
            Tick::Halted => {
                alarm.disable_interrupt();
                defmt::warn!("outputs released, tick stopped");
                return;
            }
            Tick::WarmedUp => defmt::info!("warm-up done"),
            Tick::Ran {
                button: Some(event),
                ..
            } => defmt::info!("{}", event),
            _ => {}
        }

        // Armed only after this firing is done, so two firings never overlap
        alarm.schedule(config::TICK_PERIOD_US.micros()).ok();
    }

    #[idle(shared = [stopwatch], local = [supply, delay])]
    fn idle(mut ctx: idle::Context) -> ! {
        // The tick is already running here and can redraw mid-measurement
        match supply::check(ctx.local.supply, ctx.local.delay, &mut ctx.shared.stopwatch) {
            Ok(millivolts) => defmt::info!("supply {=u16} mV", millivolts),
            Err(SupplyError::BelowFloor { millivolts }) => {
                defmt::error!("supply {=u16} mV below {=u16} mV", millivolts, config::MIN_SUPPLY_MV)
            }
            Err(err) => defmt::error!("supply check failed: {}", err),
        }

        loop {
            cortex_m::asm::wfi();
        }
    }
}

//! The refresh scheduler. Wakes at :00 and :30, gathers the data
//! sources, renders one frame, and hands it to the sink. At 23:00 the
//! panel is flooded white instead and rests for seven hours.
//!
//! Nothing a cycle does can stop the schedule: failed sources render
//! as unknowns, a dead link or broken panel degrades to a notice
//! frame. Only the interrupt flag ends the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use thiserror::Error;

use display::{Frame, PanelColor, RenderModel, Renderer};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::prelude::*;

use crate::config::Config;
use crate::providers::{airnow, pollen, weather};
use crate::sink::{Sink, SinkError};

const PROBE_URL: &str = "http://connectivitycheck.gstatic.com/generate_204";
const NIGHT_REST_HOURS: i64 = 7;

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("no internet connection")]
    Connectivity,
    #[error("frame composition failed: {0}")]
    Render(String),
    #[error("frame dispatch failed: {0}")]
    Hardware(#[from] SinkError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    CheckingConnectivity,
    Rendering,
    Dispatching,
    Error,
}

/// Wall time seam, swappable for tests.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> SystemClock {
        SystemClock { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

pub trait Connectivity {
    fn online(&self) -> bool;
}

pub struct HttpProbe;

impl Connectivity for HttpProbe {
    fn online(&self) -> bool {
        let response = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .and_then(|client| client.get(PROBE_URL).send());
        match response {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                log::warn!("connectivity probe failed: {err}");
                false
            }
        }
    }
}

/// Data gathering seam. The production impl queries the three
/// providers; each failure is contained here so the returned model
/// always renders.
pub trait ModelSource {
    fn gather(&self, now: DateTime<FixedOffset>) -> RenderModel;
}

pub struct HttpSource {
    cfg: Config,
}

impl HttpSource {
    pub fn new(cfg: Config) -> HttpSource {
        HttpSource { cfg }
    }
}

impl ModelSource for HttpSource {
    fn gather(&self, now: DateTime<FixedOffset>) -> RenderModel {
        let report = match weather::fetch(&self.cfg) {
            Ok(body) => weather::normalize(&body, &self.cfg),
            Err(err) => {
                log::warn!("weather fetch failed: {err}");
                weather::normalize("", &self.cfg)
            }
        };
        let air = match airnow::gather(&self.cfg, now.date_naive()) {
            Ok(air) => Some(air),
            Err(err) => {
                log::warn!("air quality unavailable: {err}");
                None
            }
        };
        let pollen = match pollen::fetch_levels(&pollen::HttpFetcher, now.date_naive()) {
            Ok(levels) => Some(levels),
            Err(err) => {
                log::warn!("pollen bulletin unavailable: {err}");
                None
            }
        };
        RenderModel {
            current: report.current,
            hourly: report.hourly,
            daily: report.daily,
            pollen,
            air,
        }
    }
}

pub struct Orchestrator<S, K, M, P>
where
    S: Sink,
    K: Clock,
    M: ModelSource,
    P: Connectivity,
{
    cfg: Config,
    renderer: Renderer<PanelColor>,
    sink: S,
    clock: K,
    source: M,
    probe: P,
    state: State,
    shutdown: Arc<AtomicBool>,
}

impl<S, K, M, P> Orchestrator<S, K, M, P>
where
    S: Sink,
    K: Clock,
    M: ModelSource,
    P: Connectivity,
{
    pub fn new(
        cfg: Config,
        sink: S,
        clock: K,
        source: M,
        probe: P,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let canvas = Rectangle::new(Point::zero(), cfg.canvas);
        Orchestrator {
            renderer: Renderer::new(&canvas),
            cfg,
            sink,
            clock,
            source,
            probe,
            state: State::Idle,
            shutdown,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn set_state(&mut self, state: State) {
        if state != self.state {
            log::debug!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn run_cycle(&mut self) -> Result<(), CycleError> {
        self.set_state(State::CheckingConnectivity);
        if !self.probe.online() {
            return Err(CycleError::Connectivity);
        }

        self.set_state(State::Rendering);
        let now = self.clock.now();
        let model = self.source.gather(now);
        let mut frame = Frame::new(self.cfg.canvas);
        self.renderer
            .render(&model, now, &mut frame)
            .map_err(|err| CycleError::Render(err.to_string()))?;

        self.set_state(State::Dispatching);
        self.sink.dispatch(&frame)?;
        Ok(())
    }

    /// Best-effort placeholder so the panel never keeps stale data
    /// after a failed cycle.
    fn dispatch_notice(&mut self, headline: &str, detail: &str) {
        let mut frame = Frame::new(self.cfg.canvas);
        if let Err(err) = self.renderer.render_notice(headline, detail, &mut frame) {
            log::warn!("notice frame failed to render: {err}");
            return;
        }
        if let Err(err) = self.sink.dispatch(&frame) {
            log::warn!("notice frame failed to dispatch: {err}");
        }
    }

    /// One scheduled refresh, failures degraded to a notice frame.
    pub fn tick(&mut self) {
        if let Err(err) = self.run_cycle() {
            log::error!("refresh cycle failed: {err}");
            self.set_state(State::Error);
            let (headline, detail) = match err {
                CycleError::Connectivity => ("NO INTERNET", "CONNECTION"),
                CycleError::Render(_) | CycleError::Hardware(_) => ("FAILED", "INITIALIZATION"),
            };
            self.dispatch_notice(headline, detail);
        }
        self.set_state(State::Idle);
    }

    /// Single refresh for `--once` invocations. The frame stays on
    /// the panel, so no shutdown clear.
    pub fn run_once(&mut self) {
        self.tick();
    }

    pub fn run(&mut self) {
        // Startup render, then fall into the half-hour schedule.
        self.tick();

        while !self.shutdown.load(Ordering::SeqCst) {
            let target = next_tick(self.clock.now());
            if !self.pause_until(target) {
                break;
            }

            let now = self.clock.now();
            if now.hour() == 23 && now.minute() < 30 {
                log::info!("nightly panel clear");
                if let Err(err) = self.sink.clear() {
                    log::warn!("nightly clear failed: {err}");
                }
                if !self.pause_until(now + chrono::Duration::hours(NIGHT_REST_HOURS)) {
                    break;
                }
                continue;
            }

            self.tick();
        }

        log::info!("shutting down");
        self.sink.shutdown();
    }

    /// Sleep in short slices so the interrupt flag stays responsive.
    /// Returns false when interrupted.
    fn pause_until(&self, target: DateTime<FixedOffset>) -> bool {
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                return false;
            }
            let now = self.clock.now();
            if now >= target {
                return true;
            }
            let remaining = (target - now)
                .to_std()
                .unwrap_or(Duration::from_secs(1))
                .min(Duration::from_secs(1));
            self.clock.sleep(remaining);
        }
    }
}

/// Next :00 or :30 boundary strictly after `now`.
pub fn next_tick(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let base = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let advance = if now.minute() < 30 {
        30 - now.minute()
    } else {
        60 - now.minute()
    };
    base + chrono::Duration::minutes(i64::from(advance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::AtomicUsize;

    fn offset() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn test_config() -> Config {
        Config {
            owm_key: "owm".to_string(),
            airnow_key: "airnow".to_string(),
            lat: "29.8068".to_string(),
            lon: "-95.4181".to_string(),
            zip: "77008".to_string(),
            utc_offset: -18000,
            canvas: Size::new(800, 480),
            hourly_slots: 8,
            daily_slots: 5,
            out: None,
            once: false,
        }
    }

    struct FakeClock {
        now: Rc<RefCell<DateTime<FixedOffset>>>,
        trip: Option<(DateTime<FixedOffset>, Arc<AtomicBool>)>,
    }

    impl FakeClock {
        fn at(now: DateTime<FixedOffset>) -> FakeClock {
            FakeClock {
                now: Rc::new(RefCell::new(now)),
                trip: None,
            }
        }

        /// Raises `flag` once simulated time reaches `trip`.
        fn tripping_at(
            now: DateTime<FixedOffset>,
            trip: DateTime<FixedOffset>,
            flag: Arc<AtomicBool>,
        ) -> FakeClock {
            FakeClock {
                now: Rc::new(RefCell::new(now)),
                trip: Some((trip, flag)),
            }
        }

        fn handle(&self) -> Rc<RefCell<DateTime<FixedOffset>>> {
            self.now.clone()
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<FixedOffset> {
            *self.now.borrow()
        }

        fn sleep(&self, duration: Duration) {
            let mut now = self.now.borrow_mut();
            *now += chrono::Duration::from_std(duration).unwrap();
            if let Some((trip, flag)) = &self.trip {
                if *now >= *trip {
                    flag.store(true, Ordering::SeqCst);
                }
            }
        }
    }

    struct FakeProbe(bool);

    impl Connectivity for FakeProbe {
        fn online(&self) -> bool {
            self.0
        }
    }

    struct FakeSource;

    impl ModelSource for FakeSource {
        fn gather(&self, _now: DateTime<FixedOffset>) -> RenderModel {
            RenderModel::default()
        }
    }

    #[derive(Clone, Default)]
    struct CountingSink {
        dispatched: Rc<AtomicUsize>,
        cleared: Rc<AtomicUsize>,
        shutdowns: Rc<AtomicUsize>,
    }

    impl Sink for CountingSink {
        fn dispatch(&mut self, _frame: &Frame<PanelColor>) -> Result<(), SinkError> {
            self.dispatched.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn clear(&mut self) -> Result<(), SinkError> {
            self.cleared.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn shutdown(&mut self) {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn noon() -> DateTime<FixedOffset> {
        offset().with_ymd_and_hms(2025, 8, 22, 12, 0, 0).unwrap()
    }

    #[test]
    fn next_tick_boundaries() {
        let t = offset().with_ymd_and_hms(2025, 8, 22, 12, 7, 13).unwrap();
        assert_eq!(
            next_tick(t),
            offset().with_ymd_and_hms(2025, 8, 22, 12, 30, 0).unwrap()
        );
        let t = offset().with_ymd_and_hms(2025, 8, 22, 12, 30, 0).unwrap();
        assert_eq!(
            next_tick(t),
            offset().with_ymd_and_hms(2025, 8, 22, 13, 0, 0).unwrap()
        );
        let t = offset().with_ymd_and_hms(2025, 8, 22, 23, 59, 59).unwrap();
        assert_eq!(
            next_tick(t),
            offset().with_ymd_and_hms(2025, 8, 23, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn offline_tick_dispatches_one_notice_and_nothing_else() {
        let sink = CountingSink::default();
        let mut orc = Orchestrator::new(
            test_config(),
            sink.clone(),
            FakeClock::at(noon()),
            FakeSource,
            FakeProbe(false),
            Arc::new(AtomicBool::new(false)),
        );

        orc.tick();

        assert_eq!(sink.dispatched.load(Ordering::SeqCst), 1);
        assert_eq!(sink.cleared.load(Ordering::SeqCst), 0);
        assert_eq!(orc.state(), State::Idle);
    }

    #[test]
    fn online_tick_dispatches_one_frame() {
        let sink = CountingSink::default();
        let mut orc = Orchestrator::new(
            test_config(),
            sink.clone(),
            FakeClock::at(noon()),
            FakeSource,
            FakeProbe(true),
            Arc::new(AtomicBool::new(false)),
        );

        orc.tick();

        assert_eq!(sink.dispatched.load(Ordering::SeqCst), 1);
        assert_eq!(orc.state(), State::Idle);
    }

    #[test]
    fn interrupt_runs_sink_shutdown() {
        let sink = CountingSink::default();
        let shutdown = Arc::new(AtomicBool::new(true));
        let mut orc = Orchestrator::new(
            test_config(),
            sink.clone(),
            FakeClock::at(noon()),
            FakeSource,
            FakeProbe(true),
            shutdown,
        );

        orc.run();

        // Startup render still happens, then the flag stops the loop.
        assert_eq!(sink.dispatched.load(Ordering::SeqCst), 1);
        assert_eq!(sink.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nightly_clear_replaces_the_2300_render_and_rests_until_morning() {
        let sink = CountingSink::default();
        let start = offset().with_ymd_and_hms(2025, 8, 22, 22, 45, 0).unwrap();
        let morning = offset().with_ymd_and_hms(2025, 8, 23, 6, 0, 0).unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));

        // Interrupt arrives at the end of the night rest.
        let clock = FakeClock::tripping_at(start, morning, shutdown.clone());
        let time = clock.handle();
        let mut orc = Orchestrator::new(
            test_config(),
            sink.clone(),
            clock,
            FakeSource,
            FakeProbe(true),
            shutdown,
        );

        orc.run();

        // Only the startup render dispatched a frame; the 23:00 slot
        // became a clear and the loop slept through to 06:00.
        assert_eq!(sink.dispatched.load(Ordering::SeqCst), 1);
        assert_eq!(sink.cleared.load(Ordering::SeqCst), 1);
        assert_eq!(sink.shutdowns.load(Ordering::SeqCst), 1);
        assert_eq!(*time.borrow(), morning);
    }
}

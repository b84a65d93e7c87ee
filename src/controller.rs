//! The foreground loop core: input interpretation, display-mode
//! multiplexing and the blocking news session.

use crate::alarm::{AlarmClock, Buzzer};
use crate::display::{
    clock_frame, fetching_frame, news_frame, sensor_frame, setting_frame, weather_frame,
    DisplayMode, RenderFrame, SensorReading, TextDisplay, WeatherReport,
};
use crate::feed::{fetch_headlines, FeedTransport, NetworkFault};
use crate::input::{Button, EventConsumer, SwitchLatch};
use crate::scroll::ScrollLine;
use crate::time::{TimeInstant, TimeSource, WallTime};

/// What the embedding loop must do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickAction {
    /// Render the active screen and sleep until the next iteration.
    Idle,
    /// The news screen was entered: run [`Controller::run_feed`].
    FetchFeed,
}

/// Owns the display mode, the set sub-mode and the alarm machine, and
/// gives each button press its mode-dependent meaning.
///
/// Interrupt handlers enqueue [`Button`] identities; the foreground
/// loop drains them with [`poll_input`], calls [`tick`] once per
/// iteration and presents the frame [`render`] returns. Entering the
/// news screen is reported through [`TickAction::FetchFeed`]; the
/// loop then runs the blocking [`run_feed`] session, which always ends
/// back on the clock screen.
///
/// [`poll_input`]: Controller::poll_input
/// [`tick`]: Controller::tick
/// [`render`]: Controller::render
/// [`run_feed`]: Controller::run_feed
pub struct Controller<'t, I: TimeInstant, T: TimeSource<I>, B: Buzzer> {
    time_source: &'t T,
    mode: DisplayMode,
    setting_alarm: bool,
    news_pending: bool,
    switch: SwitchLatch,
    alarm: AlarmClock<I, B>,
}

impl<'t, I: TimeInstant, T: TimeSource<I>, B: Buzzer> Controller<'t, I, T, B> {
    /// Creates a controller on the clock screen with the alarm
    /// disabled and the buzzer off.
    pub fn new(buzzer: B, time_source: &'t T) -> Self {
        Self {
            time_source,
            mode: DisplayMode::Clock,
            setting_alarm: false,
            news_pending: false,
            switch: SwitchLatch::new(),
            alarm: AlarmClock::new(buzzer),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_setting_alarm(&self) -> bool {
        self.setting_alarm
    }

    pub fn alarm(&self) -> &AlarmClock<I, B> {
        &self.alarm
    }

    /// Drains every queued press. Call before [`Controller::tick`].
    pub fn poll_input(&mut self, events: &mut EventConsumer<'_>) {
        while let Some(button) = events.dequeue() {
            self.handle_button(button);
        }
    }

    /// Applies one button press.
    ///
    /// `Hour` and `Minute` increment the alarm time while the set
    /// screen is open and mute or snooze the alarm otherwise; `Set`
    /// opens the set screen and confirms it on the second press; the
    /// mode button is ignored while setting.
    pub fn handle_button(&mut self, button: Button) {
        match button {
            Button::Mode => {
                if !self.setting_alarm {
                    self.mode = self.mode.advance();
                    // Advancing past the news screen before the next
                    // tick cancels the fetch it would have started.
                    self.news_pending = self.mode == DisplayMode::News;
                }
            }
            Button::Set => {
                if self.setting_alarm {
                    self.alarm.confirm();
                    self.setting_alarm = false;
                } else {
                    self.setting_alarm = true;
                }
            }
            Button::Hour => {
                if self.setting_alarm {
                    self.alarm.increment_hour();
                } else {
                    self.alarm.mute();
                }
            }
            Button::Minute => {
                if self.setting_alarm {
                    self.alarm.increment_minute();
                } else {
                    self.alarm.snooze(self.time_source.now());
                }
            }
        }
    }

    /// Runs one foreground iteration: the switch edge, the alarm
    /// countdowns and the minute check.
    ///
    /// A pending news entry is reported exactly once.
    pub fn tick(&mut self, wall: WallTime, switch_asserted: bool) -> TickAction {
        if self.switch.update(switch_asserted) {
            self.alarm.toggle_enabled();
        }

        self.alarm.service(self.time_source.now(), wall);

        if self.news_pending {
            self.news_pending = false;
            TickAction::FetchFeed
        } else {
            TickAction::Idle
        }
    }

    /// Builds the frame for the active screen.
    ///
    /// Pure with respect to the controller: the caller supplies the
    /// wall clock and any readings the active screen needs (the sensor
    /// is polled once per sensor-screen render, by the caller).
    pub fn render(
        &self,
        wall: WallTime,
        sensor: Option<&SensorReading>,
        weather: Option<&WeatherReport>,
    ) -> RenderFrame {
        if self.setting_alarm {
            return setting_frame(self.alarm.time());
        }

        match self.mode {
            DisplayMode::Clock => {
                let overlay = self
                    .alarm
                    .is_enabled()
                    .then(|| (self.alarm.time(), self.alarm.phase()));
                clock_frame(wall, overlay)
            }
            DisplayMode::Sensor => sensor_frame(sensor),
            DisplayMode::Weather => weather_frame(weather),
            DisplayMode::News => fetching_frame(),
        }
    }

    /// The blocking news session: fetch, one scroll pass, then back to
    /// the clock screen.
    ///
    /// `abort` is polled between network chunks and scroll steps and
    /// maps to the level-sensed switch. `pace` sleeps one scroll step,
    /// nominally [`crate::scroll::SCROLL_STEP_MILLIS`]. A fetch fault
    /// or an empty result skips the scroll; the mode is back on
    /// [`DisplayMode::Clock`] on every path out.
    pub fn run_feed<N: FeedTransport, D: TextDisplay>(
        &mut self,
        transport: &mut N,
        display: &mut D,
        url: &str,
        mut abort: impl FnMut() -> bool,
        mut pace: impl FnMut(),
    ) -> Result<(), NetworkFault> {
        fetching_frame().present(display);

        let outcome = fetch_headlines(transport, url, &mut abort);
        self.mode = DisplayMode::Clock;
        self.news_pending = false;

        let feed = outcome?;
        if feed.is_empty() {
            return Ok(());
        }

        let line = ScrollLine::from_feed(&feed);
        for window in line.windows() {
            if abort() {
                break;
            }
            news_frame(feed.source(), window).present(display);
            pace();
        }
        Ok(())
    }
}

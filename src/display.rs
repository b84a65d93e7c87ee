//! Frame rendering for the 16x2 character display.
//!
//! Every screen is a pure function from state to a [`RenderFrame`];
//! nothing here retains state between ticks. The [`TextDisplay`] trait
//! mirrors the driver surface of an HD44780-style module.

use core::fmt::Write as _;

use heapless::String;

use crate::alarm::{AlarmPhase, AlarmTime};
use crate::time::WallTime;

/// Columns per display row.
pub const DISPLAY_COLS: usize = 16;

/// Rows on the display.
pub const DISPLAY_ROWS: usize = 2;

/// One row of display text.
pub type Row = String<DISPLAY_COLS>;

/// Trait for abstracting the character display.
///
/// Implementations convert to their controller's command set and
/// handle any bus errors internally - rendering is best-effort and
/// these methods cannot fail.
pub trait TextDisplay {
    /// Blanks the display and homes the cursor.
    fn clear(&mut self);

    /// Moves the cursor to a column and row.
    fn set_cursor(&mut self, col: u8, row: u8);

    /// Writes text at the cursor.
    fn write_text(&mut self, text: &str);
}

/// A peripheral read failed. Rendered as a placeholder; never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareFault;

impl core::fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "peripheral read failed")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HardwareFault {}

/// Trait for abstracting the temperature/humidity sensor.
pub trait Sensor {
    /// Reads the temperature in degrees Celsius.
    fn read_temperature(&mut self) -> Result<f32, HardwareFault>;

    /// Reads the relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f32, HardwareFault>;
}

/// One sensor sample, taken once per sensor-screen render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub temperature: f32,
    pub humidity: f32,
}

impl SensorReading {
    /// Samples both channels from a sensor driver.
    pub fn sample<S: Sensor>(sensor: &mut S) -> Result<Self, HardwareFault> {
        Ok(Self {
            temperature: sensor.read_temperature()?,
            humidity: sensor.read_humidity()?,
        })
    }
}

/// The forecast handed over by bootstrap, shown on the weather screen.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub condition: String<32>,
    pub temperature: f32,
}

/// Which screen the foreground loop is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    #[default]
    Clock,
    Sensor,
    Weather,
    News,
}

impl DisplayMode {
    /// The next screen in the cycle, wrapping back to the clock.
    pub fn advance(self) -> Self {
        match self {
            DisplayMode::Clock => DisplayMode::Sensor,
            DisplayMode::Sensor => DisplayMode::Weather,
            DisplayMode::Weather => DisplayMode::News,
            DisplayMode::News => DisplayMode::Clock,
        }
    }
}

/// The two rows handed to the display, recomputed each render call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderFrame {
    pub top: Row,
    pub bottom: Row,
}

impl RenderFrame {
    pub fn blank() -> Self {
        Self::default()
    }

    /// Redraws the whole display from this frame.
    pub fn present<D: TextDisplay>(&self, display: &mut D) {
        display.clear();
        display.set_cursor(0, 0);
        display.write_text(&self.top);
        display.set_cursor(0, 1);
        display.write_text(&self.bottom);
    }
}

/// Appends `text` to a bounded string, stopping at capacity and
/// substituting characters the LCD charset cannot show.
pub(crate) fn push_clipped<const N: usize>(dst: &mut String<N>, text: &str) {
    for ch in text.chars() {
        let ch = if ch.is_ascii_graphic() || ch == ' ' { ch } else { '?' };
        if dst.push(ch).is_err() {
            break;
        }
    }
}

/// Clock screen: weekday and time on top, the alarm line below while
/// the alarm is enabled. The suffix marks a ringing `(A)` or snoozed
/// `(S)` alarm; a muted or idle alarm shows none.
pub fn clock_frame(wall: WallTime, alarm: Option<(AlarmTime, AlarmPhase)>) -> RenderFrame {
    let mut frame = RenderFrame::blank();
    let _ = write!(
        frame.top,
        "{} {:02}:{:02}:{:02}",
        wall.weekday.label(),
        wall.hour,
        wall.minute,
        wall.second
    );

    if let Some((time, phase)) = alarm {
        let _ = write!(frame.bottom, "Alarm: {:02}:{:02}", time.hour(), time.minute());
        match phase {
            AlarmPhase::Ringing => {
                let _ = frame.bottom.push_str(" (A)");
            }
            AlarmPhase::Snoozed => {
                let _ = frame.bottom.push_str(" (S)");
            }
            AlarmPhase::Idle | AlarmPhase::Muted => {}
        }
    }
    frame
}

/// Alarm set screen shown while the set sub-mode is active.
pub fn setting_frame(time: AlarmTime) -> RenderFrame {
    let mut frame = RenderFrame::blank();
    let _ = frame.top.push_str("Setting Alarm");
    let _ = write!(frame.bottom, "{:02}:{:02}", time.hour(), time.minute());
    frame
}

/// Sensor screen. A failed sample renders a placeholder and the loop
/// carries on.
pub fn sensor_frame(reading: Option<&SensorReading>) -> RenderFrame {
    let mut frame = RenderFrame::blank();
    match reading {
        Some(reading) => {
            let _ = write!(frame.top, "Temp: {:.1}C", reading.temperature);
            let _ = write!(frame.bottom, "Humidity: {:.2}%", reading.humidity);
        }
        None => {
            let _ = frame.top.push_str("Sensor error");
        }
    }
    frame
}

/// Weather screen, or a placeholder when bootstrap has no forecast.
pub fn weather_frame(report: Option<&WeatherReport>) -> RenderFrame {
    let mut frame = RenderFrame::blank();
    match report {
        Some(report) => {
            push_clipped(&mut frame.top, &report.condition);
            let _ = write!(frame.bottom, "{:.1}C", report.temperature);
        }
        None => {
            let _ = frame.top.push_str("Weather");
            let _ = frame.bottom.push_str("unavailable");
        }
    }
    frame
}

/// Placeholder shown while the headline fetch is in flight.
pub fn fetching_frame() -> RenderFrame {
    let mut frame = RenderFrame::blank();
    let _ = frame.top.push_str("Fetching News");
    let _ = frame.bottom.push_str("One Moment...");
    frame
}

/// News screen: channel name on top, one scroll window below.
pub fn news_frame(source: &str, window: &str) -> RenderFrame {
    let mut frame = RenderFrame::blank();
    push_clipped(&mut frame.top, source);
    push_clipped(&mut frame.bottom, window);
    frame
}

//! Horizontal scrolling of collected headlines.

use heapless::String;

use crate::display::{push_clipped, DISPLAY_COLS};
use crate::feed::FeedBuffer;

/// Separator between joined headlines.
pub const SEPARATOR: &str = " --- ";

/// Milliseconds between scroll steps.
pub const SCROLL_STEP_MILLIS: u64 = 100;

/// Capacity of the joined line: three full titles plus separators.
const LINE_CAP: usize = 1024;

/// The joined, display-ready headline line.
///
/// Text is reduced to the LCD-safe ASCII range when built, so byte
/// offsets and display columns coincide and a window can never split
/// a character.
#[derive(Debug, Clone, Default)]
pub struct ScrollLine {
    text: String<LINE_CAP>,
}

impl ScrollLine {
    /// Joins the collected headlines with [`SEPARATOR`].
    pub fn from_feed(feed: &FeedBuffer) -> Self {
        let mut line = Self::default();
        for (index, title) in feed.headlines().enumerate() {
            if index > 0 {
                push_clipped(&mut line.text, SEPARATOR);
            }
            push_clipped(&mut line.text, title);
        }
        line
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of windows one pass shows.
    ///
    /// A line no longer than the window still yields one, so the
    /// degenerate case cannot underflow the iteration bound.
    pub fn step_count(&self) -> usize {
        if self.text.len() <= DISPLAY_COLS {
            1
        } else {
            self.text.len() - (DISPLAY_COLS - 1)
        }
    }

    /// The window shown at `step`. Out-of-range steps clamp to the
    /// final window.
    pub fn window(&self, step: usize) -> &str {
        let start = step.min(self.step_count() - 1);
        let end = (start + DISPLAY_COLS).min(self.text.len());
        &self.text[start..end]
    }

    /// Iterates every window of one pass in order.
    pub fn windows(&self) -> impl Iterator<Item = &str> {
        (0..self.step_count()).map(move |step| self.window(step))
    }
}

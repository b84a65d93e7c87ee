//! Shared test infrastructure for info-clock integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use info_clock::{
    Buzzer, FeedTransport, NetworkFault, TextDisplay, TimeDuration, TimeInstant, TimeSource,
    WallTime, Weekday,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }

    fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_sub(duration.0).map(TestInstant)
    }
}

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Buzzer
// ============================================================================

/// Mock buzzer that records every level written to it
pub struct MockBuzzer {
    pub level: f32,
    pub writes: Vec<f32>,
}

impl MockBuzzer {
    pub fn new() -> Self {
        Self {
            level: 0.0,
            writes: Vec::new(),
        }
    }
}

impl Buzzer for MockBuzzer {
    fn set_level(&mut self, level: f32) {
        self.level = level;
        self.writes.push(level);
    }
}

// ============================================================================
// Mock Display
// ============================================================================

/// Mock 16x2 display capturing every presented frame
pub struct MockDisplay {
    current: [String; 2],
    cursor_row: usize,
    history: Vec<[String; 2]>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            current: [String::new(), String::new()],
            cursor_row: 0,
            history: Vec::new(),
        }
    }

    /// Every frame presented so far, oldest first
    pub fn frames(&self) -> Vec<[String; 2]> {
        let mut frames = self.history.clone();
        if !self.current[0].is_empty() || !self.current[1].is_empty() {
            frames.push(self.current.clone());
        }
        frames
    }

    /// The rows currently on the display
    pub fn rows(&self) -> [&str; 2] {
        [&self.current[0], &self.current[1]]
    }
}

impl TextDisplay for MockDisplay {
    fn clear(&mut self) {
        if !self.current[0].is_empty() || !self.current[1].is_empty() {
            self.history.push(self.current.clone());
        }
        self.current = [String::new(), String::new()];
        self.cursor_row = 0;
    }

    fn set_cursor(&mut self, _col: u8, row: u8) {
        self.cursor_row = (row as usize).min(1);
    }

    fn write_text(&mut self, text: &str) {
        self.current[self.cursor_row].push_str(text);
    }
}

// ============================================================================
// Scripted Transport
// ============================================================================

/// Transport serving a scripted list of receive chunks
pub struct ScriptedTransport {
    chunks: Vec<Vec<u8>>,
    pub reads: usize,
    pub request: Vec<u8>,
    pub closed: bool,
    pub fail_connect: bool,
}

impl ScriptedTransport {
    pub fn serving(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|chunk| chunk.to_vec()).collect(),
            reads: 0,
            request: Vec::new(),
            closed: false,
            fail_connect: false,
        }
    }

    pub fn failing_connect() -> Self {
        let mut transport = Self::serving(&[]);
        transport.fail_connect = true;
        transport
    }
}

impl FeedTransport for ScriptedTransport {
    fn connect(&mut self, _host: &str, _port: u16) -> Result<(), NetworkFault> {
        if self.fail_connect {
            return Err(NetworkFault::Connect);
        }
        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), NetworkFault> {
        self.request.extend_from_slice(bytes);
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, NetworkFault> {
        let Some(chunk) = self.chunks.get(self.reads) else {
            return Ok(0);
        };
        self.reads += 1;
        let count = chunk.len().min(buf.len());
        buf[..count].copy_from_slice(&chunk[..count]);
        Ok(count)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// A wall-clock sample on an arbitrary weekday
pub fn wall(hour: u8, minute: u8, second: u8) -> WallTime {
    WallTime::new(hour, minute, second, Weekday::Tuesday).unwrap()
}

/// A well-formed feed document with a channel title and three items
pub const SAMPLE_FEED: &[u8] = b"<?xml version=\"1.0\"?><rss><channel>\
<title><![CDATA[BBC News]]></title>\
<item><title><![CDATA[First headline]]></title></item>\
<item><title><![CDATA[Second headline]]></title></item>\
<item><title><![CDATA[Third headline]]></title></item>\
</channel></rss>";

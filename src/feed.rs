//! Headline retrieval: a bounded HTTP read and an incremental scan for
//! channel and item titles.
//!
//! The transport is a plain synchronous socket behind [`FeedTransport`];
//! the fetch reads at most [`FEED_BYTE_CAP`] bytes in
//! [`FEED_CHUNK`]-sized pieces and stops as soon as three titles are
//! in hand. Parsing accumulates the stream, so a marker split across
//! two reads is still found and the result does not depend on how the
//! peer chunked the response.

use core::fmt::Write as _;

use heapless::{String, Vec};

/// TCP port of the feed endpoint.
pub const FEED_PORT: u16 = 443;

/// Read chunk size in bytes.
pub const FEED_CHUNK: usize = 500;

/// Cap on total bytes read per fetch.
pub const FEED_BYTE_CAP: usize = 3500;

/// Maximum headline count per fetch.
pub const MAX_HEADLINES: usize = 3;

/// Longest stored title in bytes.
pub const TITLE_CAP: usize = 255;

const CHANNEL_MARK: &[u8] = b"<channel>";
const ITEM_MARK: &[u8] = b"<item>";
const TITLE_OPEN: &[u8] = b"<title><![CDATA[";
const TITLE_CLOSE: &[u8] = b"]]></title>";

/// Network failures the feed fetch can report.
///
/// Any of these ends the news session with no headline; none of them
/// is fatal to the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkFault {
    /// The URL had no recognizable host.
    InvalidUrl,
    /// Connecting to the host failed.
    Connect,
    /// The request could not be sent.
    Send,
    /// The response stream failed.
    Receive,
}

impl core::fmt::Display for NetworkFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NetworkFault::InvalidUrl => write!(f, "feed URL has no recognizable host"),
            NetworkFault::Connect => write!(f, "connecting to the feed host failed"),
            NetworkFault::Send => write!(f, "sending the feed request failed"),
            NetworkFault::Receive => write!(f, "receiving the feed response failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NetworkFault {}

/// Trait for abstracting the TLS transport used by the feed fetch.
///
/// The implementation owns DNS resolution and its root certificate;
/// `recv` returning zero means the peer closed the stream.
pub trait FeedTransport {
    /// Opens a connection to `host:port`.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), NetworkFault>;

    /// Sends the whole buffer.
    fn send(&mut self, bytes: &[u8]) -> Result<(), NetworkFault>;

    /// Reads into `buf`, returning the byte count (0 on end of stream).
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, NetworkFault>;

    /// Releases the connection. Safe to call in any state.
    fn close(&mut self);
}

/// Splits a URL into host and path, ignoring any scheme prefix. A URL
/// without a path component maps to `/`.
pub fn split_url(url: &str) -> Option<(&str, &str)> {
    let rest = match url.find("://") {
        Some(scheme_end) => &url[scheme_end + 3..],
        None => url,
    };
    if rest.is_empty() {
        return None;
    }
    match rest.find('/') {
        Some(0) => None,
        Some(slash) => Some((&rest[..slash], &rest[slash..])),
        None => Some((rest, "/")),
    }
}

/// Titles collected by one fetch session. Append-only while the fetch
/// runs, read-only once handed to the renderer.
#[derive(Debug, Clone, Default)]
pub struct FeedBuffer {
    source: String<TITLE_CAP>,
    headlines: Vec<String<TITLE_CAP>, MAX_HEADLINES>,
}

impl FeedBuffer {
    /// Channel title; empty when none was found.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Extracted item titles in document order.
    pub fn headlines(&self) -> impl Iterator<Item = &str> {
        self.headlines.iter().map(|title| title.as_str())
    }

    pub fn headline_count(&self) -> usize {
        self.headlines.len()
    }

    /// True when no item titles were collected.
    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }
}

/// Incremental scanner extracting the channel title and up to
/// [`MAX_HEADLINES`] item titles from a streamed document.
///
/// Received bytes accumulate into a buffer capped at
/// [`FEED_BYTE_CAP`]; each push rescans from the last consumed
/// position. An incomplete title at the end of the data stays
/// unconsumed until its closing marker arrives, so extraction is
/// invariant under re-chunking of the same stream.
#[derive(Debug, Default)]
pub struct FeedParser {
    data: Vec<u8, FEED_BYTE_CAP>,
    item_pos: usize,
    channel_done: bool,
    collected: FeedBuffer,
}

impl FeedParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one received chunk. Bytes past the cap are dropped.
    pub fn push(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            if self.data.push(byte).is_err() {
                break;
            }
        }
        if !self.channel_done {
            self.scan_channel();
        }
        self.scan_items();
    }

    /// True once the headline capacity is reached.
    pub fn is_complete(&self) -> bool {
        self.collected.headlines.len() == MAX_HEADLINES
    }

    /// True once the byte cap is reached; further pushes are dropped.
    pub fn is_full(&self) -> bool {
        self.data.is_full()
    }

    /// Hands over whatever was collected.
    pub fn finish(self) -> FeedBuffer {
        self.collected
    }

    fn scan_channel(&mut self) {
        let Some(channel) = find(&self.data, CHANNEL_MARK, 0) else {
            return;
        };
        let Some(open) = find(&self.data, TITLE_OPEN, channel + CHANNEL_MARK.len()) else {
            return;
        };
        let start = open + TITLE_OPEN.len();
        let Some(close) = find(&self.data, TITLE_CLOSE, start) else {
            return;
        };

        copy_title(&self.data[start..close], &mut self.collected.source);
        self.channel_done = true;
        // Items begin after the channel title; skip straight past it.
        self.item_pos = self.item_pos.max(close + TITLE_CLOSE.len());
    }

    fn scan_items(&mut self) {
        while self.collected.headlines.len() < MAX_HEADLINES {
            let Some(item) = find(&self.data, ITEM_MARK, self.item_pos) else {
                return;
            };
            let Some(open) = find(&self.data, TITLE_OPEN, item + ITEM_MARK.len()) else {
                return;
            };
            let start = open + TITLE_OPEN.len();
            let Some(close) = find(&self.data, TITLE_CLOSE, start) else {
                return;
            };

            let mut title = String::new();
            copy_title(&self.data[start..close], &mut title);
            let _ = self.collected.headlines.push(title);
            self.item_pos = close + TITLE_CLOSE.len();
        }
    }
}

/// First occurrence of `needle` in `hay` at or after `from`.
fn find(hay: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > hay.len() {
        return None;
    }
    hay[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

/// Copies raw title bytes into a bounded string, keeping the valid
/// UTF-8 prefix and clamping on a character boundary.
fn copy_title(raw: &[u8], dst: &mut String<TITLE_CAP>) {
    dst.clear();
    let text = match core::str::from_utf8(raw) {
        Ok(text) => text,
        Err(err) => core::str::from_utf8(&raw[..err.valid_up_to()]).unwrap_or(""),
    };
    for ch in text.chars() {
        if dst.push(ch).is_err() {
            break;
        }
    }
}

/// Retrieves the feed and extracts titles, reading at most
/// [`FEED_BYTE_CAP`] bytes in [`FEED_CHUNK`]-sized pieces.
///
/// `abort` is polled between chunks. An asserted abort, the end of the
/// stream or a receive fault ends the read early and keeps whatever
/// was collected; fewer than three titles (including none) is a valid
/// outcome. Connect and send faults abort the fetch with no headline.
pub fn fetch_headlines<T: FeedTransport>(
    transport: &mut T,
    url: &str,
    mut abort: impl FnMut() -> bool,
) -> Result<FeedBuffer, NetworkFault> {
    let (host, path) = split_url(url).ok_or(NetworkFault::InvalidUrl)?;

    if let Err(fault) = transport.connect(host, FEED_PORT) {
        transport.close();
        return Err(fault);
    }

    let mut request: String<512> = String::new();
    if write!(
        request,
        "GET {path} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"
    )
    .is_err()
    {
        transport.close();
        return Err(NetworkFault::InvalidUrl);
    }
    if let Err(fault) = transport.send(request.as_bytes()) {
        transport.close();
        return Err(fault);
    }

    let mut parser = FeedParser::new();
    let mut chunk = [0u8; FEED_CHUNK];
    let mut received = 0usize;
    while received < FEED_BYTE_CAP && !parser.is_complete() && !abort() {
        match transport.recv(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(count) => {
                let count = count.min(FEED_CHUNK);
                received += count;
                parser.push(&chunk[..count]);
            }
        }
    }

    transport.close();
    Ok(parser.finish())
}

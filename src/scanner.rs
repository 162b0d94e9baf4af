//! Lazy frame extraction from a raw byte stream.
//!
//! [`FrameScanner`] walks a buffer and yields one validated [`Frame`] per
//! step, recovering from corrupted or non-ADTS data by searching forward for
//! the next sync word. Nothing past the frame the consumer pulls is decoded.
//!
//! ```
//! use adts_cut::FrameScanner;
//!
//! // One minimal frame: a 7 byte header and no payload.
//! let data = [0xFF, 0xF1, 0x50, 0x80, 0x00, 0xFF, 0xFC];
//! let frames: Vec<_> = FrameScanner::new(&data).collect();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].header().sampling_frequency(), 44100);
//! ```

use crate::header::{FrameHeader, HeaderError};

/// One ADTS frame: its decoded header plus the frame's bytes, header
/// included, borrowed from the scanned buffer.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    header: FrameHeader,
    bytes: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Decoded header fields.
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// The frame's byte span. Exactly `header().frame_length()` bytes and
    /// valid for as long as the scanned buffer is.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Diagnostic events emitted while scanning.
///
/// These replace logging inside the scanner: callers that care thread a
/// callback through [`FrameScanner::with_diagnostics`] and decide themselves
/// whether an event becomes a log line or a test assertion. None of them end
/// the scan except [`ScanEvent::TruncatedFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    /// The data at `offset` is not a decodable frame header; the scanner is
    /// searching byte by byte for the next sync word.
    SyncLost { offset: usize },
    /// A sync word was found at `offset` and frame decoding resumes there.
    SyncRecovered { offset: usize },
    /// The header at `offset` declares more bytes than the input still
    /// holds. The partial frame is discarded and the scan ends.
    TruncatedFrame {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

pub(crate) fn discard_event(_: ScanEvent) {}

/// Iterator over the ADTS frames of a byte buffer.
///
/// The scanner starts in sync at offset 0 and stays in sync as long as each
/// decoded frame length lands it on the next header, which lets it advance
/// one whole frame at a time. On a decode failure it drops out of sync and
/// crawls forward one byte at a time until the two byte sync pattern (twelve
/// '1'-bits followed by a zero layer field) reappears. The scan ends when the
/// buffer runs out, in or out of sync; a finished scanner never yields again.
/// Re-scanning the same data takes a fresh scanner.
pub struct FrameScanner<'a, D = fn(ScanEvent)>
where
    D: FnMut(ScanEvent),
{
    data: &'a [u8],
    pos: usize,
    in_sync: bool,
    finished: bool,
    on_event: D,
}

impl<'a> FrameScanner<'a> {
    /// Creates a scanner that drops diagnostic events.
    pub fn new(data: &'a [u8]) -> FrameScanner<'a> {
        FrameScanner::with_diagnostics(data, discard_event as fn(ScanEvent))
    }
}

impl<'a, D> FrameScanner<'a, D>
where
    D: FnMut(ScanEvent),
{
    /// Creates a scanner that reports resynchronization and truncation
    /// through `on_event`.
    pub fn with_diagnostics(data: &'a [u8], on_event: D) -> FrameScanner<'a, D> {
        FrameScanner {
            data,
            pos: 0,
            in_sync: true,
            finished: false,
            on_event,
        }
    }

    /// Bytes consumed so far. After an in-sync run this is the sum of the
    /// yielded frame lengths.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Advances byte by byte until the sync pattern reappears. Returns false
    /// when the buffer is exhausted first.
    fn resync(&mut self) -> bool {
        while self.pos + 1 < self.data.len() {
            if self.data[self.pos] == 0xFF && self.data[self.pos + 1] & 0xF6 == 0xF0 {
                (self.on_event)(ScanEvent::SyncRecovered { offset: self.pos });
                self.in_sync = true;
                return true;
            }
            self.pos += 1;
        }
        false
    }
}

impl<'a, D> Iterator for FrameScanner<'a, D>
where
    D: FnMut(ScanEvent),
{
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        while !self.finished {
            if !self.in_sync && !self.resync() {
                self.finished = true;
                break;
            }
            // Reads go through a copy of the buffer reference so the yielded
            // span keeps the buffer's lifetime, not this borrow's.
            let data = self.data;
            let remaining = &data[self.pos..];
            match FrameHeader::decode(remaining) {
                Ok(header) => {
                    let length = header.frame_length();
                    if length > remaining.len() {
                        (self.on_event)(ScanEvent::TruncatedFrame {
                            offset: self.pos,
                            needed: length,
                            available: remaining.len(),
                        });
                        self.finished = true;
                        break;
                    }
                    let frame = Frame {
                        header,
                        bytes: &remaining[..length],
                    };
                    self.pos += length;
                    return Some(frame);
                }
                Err(HeaderError::NotEnoughData { expected, .. }) => {
                    // A sync word this close to the end of the input can only
                    // be the stump of a final frame. Anything shorter than
                    // the sync pattern itself is not worth reporting.
                    if remaining.len() >= 2 {
                        (self.on_event)(ScanEvent::TruncatedFrame {
                            offset: self.pos,
                            needed: expected,
                            available: remaining.len(),
                        });
                    }
                    self.finished = true;
                    break;
                }
                Err(_) => {
                    (self.on_event)(ScanEvent::SyncLost { offset: self.pos });
                    self.in_sync = false;
                    // One byte of guaranteed progress per failed attempt.
                    self.pos += 1;
                }
            }
        }
        None
    }
}

//! Selecting a time range of frames and forwarding it to a sink.
//!
//! A [`Cutter`] turns a start/end pair into a frame index range and streams
//! the selected frames, byte for byte, to a [`FrameSink`]. Bounds are given
//! as literal frame indices or as clock times; times are mapped to frames
//! through the fixed 1024 samples every ADTS frame carries, so the frame
//! duration depends only on the stream's sample rate.

use std::io::{self, Write};
use std::str::FromStr;

use crate::scanner::{discard_event, Frame, FrameScanner, ScanEvent};

/// Samples carried by one ADTS frame, fixed by the format.
pub const SAMPLES_PER_FRAME: u32 = 1024;

/// Fatal failure of a cut operation.
#[derive(Debug, thiserror::Error)]
pub enum CutError {
    /// No frame could be decoded from the input at all.
    #[error("input does not contain any ADTS frames")]
    EmptyInput,
    /// A bound matched neither the frame index nor the clock time grammar.
    #[error("invalid start/end bound: {0:?}")]
    InvalidTimeFormat(String),
    /// The output sink rejected a write. The cut stops immediately; whatever
    /// was already written stays where it is.
    #[error("writing frame to the output sink")]
    SinkWrite(#[source] io::Error),
}

/// One bound of a [`CutRequest`].
///
/// Parses from either a plain frame count (up to nine decimal digits) or a
/// clock offset from the start of the stream using the `[[hh:]mm:]ss[.fff]`
/// syntax. Omitted clock components count as zero: `1:30`, `01:30` and
/// `0:01:30.000` all mean ninety seconds, while `90` counts frames instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutBound {
    /// A literal frame index.
    FrameIndex(u64),
    /// Seconds since the start of the stream.
    Seconds(f64),
}

impl CutBound {
    /// Position of this bound on the frame axis, possibly between two
    /// frames. The caller picks the rounding direction.
    fn resolve(self, frame_duration: f64) -> f64 {
        match self {
            CutBound::FrameIndex(index) => index as f64,
            CutBound::Seconds(seconds) => seconds / frame_duration,
        }
    }
}

impl FromStr for CutBound {
    type Err = CutError;

    fn from_str(s: &str) -> Result<CutBound, CutError> {
        if (1..=9).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit()) {
            let index = s
                .parse()
                .map_err(|_| CutError::InvalidTimeFormat(s.to_owned()))?;
            return Ok(CutBound::FrameIndex(index));
        }
        if !s.is_empty() {
            if let Some(seconds) = parse_clock(s) {
                return Ok(CutBound::Seconds(seconds));
            }
        }
        Err(CutError::InvalidTimeFormat(s.to_owned()))
    }
}

/// Parses `[[hh:]mm:]ss[.fff]`: at most two colon groups before the seconds,
/// each component at most two digits, the fraction at most three. Empty
/// components are zero.
fn parse_clock(s: &str) -> Option<f64> {
    let (clock, fraction) = match s.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (s, None),
    };

    let mut seconds = 0.0;
    let mut groups = 0;
    for group in clock.split(':') {
        if groups == 3 || group.len() > 2 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value = if group.is_empty() {
            0
        } else {
            group.parse::<u32>().ok()?
        };
        seconds = seconds * 60.0 + f64::from(value);
        groups += 1;
    }

    if let Some(fraction) = fraction {
        if fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if !fraction.is_empty() {
            let value = fraction.parse::<u32>().ok()?;
            seconds += f64::from(value) / 10f64.powi(fraction.len() as i32);
        }
    }
    Some(seconds)
}

/// A start/end pair selecting a contiguous run of frames.
///
/// The start resolves by rounding down and the end by rounding up, so a cut
/// always covers the whole requested wall clock window even when its edges
/// fall inside a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutRequest {
    /// First position to keep.
    pub start: CutBound,
    /// First position past the kept range.
    pub end: CutBound,
}

impl CutRequest {
    pub fn new(start: CutBound, end: CutBound) -> CutRequest {
        CutRequest { start, end }
    }
}

/// Receives the selected frames, in stream order.
///
/// Implemented for every [`io::Write`], which writes each frame's bytes,
/// original header included, back to back.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

impl<W: Write> FrameSink for W {
    fn write_frame(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        self.write_all(frame.bytes())
    }
}

/// Outcome of a completed cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutReport {
    /// Frames forwarded to the sink.
    pub frames_written: u64,
    /// Resolved first frame index, inclusive.
    pub start: u64,
    /// Resolved end frame index, exclusive.
    pub end: u64,
}

/// Cuts a contiguous frame range out of an ADTS byte stream.
///
/// Construction decodes a single frame to learn the stream's sample rate and
/// discards that scanner again; every [`cut`](Cutter::cut) then runs over a
/// fresh scan of the whole input, so the probe never costs the cut a frame.
///
/// ```no_run
/// use adts_cut::{CutRequest, Cutter};
///
/// let data = std::fs::read("talk.aac")?;
/// let mut output = Vec::new();
/// let mut cutter = Cutter::new(&data)?;
/// let request = CutRequest::new("0:30".parse()?, "1:00".parse()?);
/// let report = cutter.cut(&request, &mut output)?;
/// println!("{} frames kept", report.frames_written);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Cutter<'a, D = fn(ScanEvent)>
where
    D: FnMut(ScanEvent),
{
    data: &'a [u8],
    sample_rate: u32,
    on_event: D,
}

impl<'a> Cutter<'a> {
    /// Creates a cutter that drops diagnostic events.
    ///
    /// Fails with [`CutError::EmptyInput`] when not a single frame can be
    /// decoded from `data`.
    pub fn new(data: &'a [u8]) -> Result<Cutter<'a>, CutError> {
        Cutter::with_diagnostics(data, discard_event as fn(ScanEvent))
    }
}

impl<'a, D> Cutter<'a, D>
where
    D: FnMut(ScanEvent),
{
    /// Creates a cutter that reports scan events through `on_event`, both
    /// during the sample rate probe and during cuts.
    pub fn with_diagnostics(data: &'a [u8], mut on_event: D) -> Result<Cutter<'a, D>, CutError> {
        let sample_rate = FrameScanner::with_diagnostics(data, &mut on_event)
            .next()
            .ok_or(CutError::EmptyInput)?
            .header()
            .sampling_frequency();
        Ok(Cutter {
            data,
            sample_rate,
            on_event,
        })
    }

    /// Sample rate of the stream, taken from its first frame.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration(&self) -> f64 {
        f64::from(SAMPLES_PER_FRAME) / f64::from(self.sample_rate)
    }

    /// Resolves `request` against the stream's frame duration and forwards
    /// the selected frames to `sink` in stream order.
    ///
    /// A range that is empty, or that starts past the end of the stream,
    /// writes nothing and is not an error. The scan stops as soon as the end
    /// of the range is reached; the rest of the input is never decoded.
    pub fn cut(
        &mut self,
        request: &CutRequest,
        sink: &mut impl FrameSink,
    ) -> Result<CutReport, CutError> {
        let frame_duration = self.frame_duration();
        let start = request.start.resolve(frame_duration).floor() as u64;
        let end = request.end.resolve(frame_duration).ceil() as u64;

        let mut frames_written = 0;
        let scanner = FrameScanner::with_diagnostics(self.data, &mut self.on_event);
        for (index, frame) in scanner.enumerate() {
            if index as u64 >= end {
                break;
            }
            if index as u64 >= start {
                sink.write_frame(&frame).map_err(CutError::SinkWrite)?;
                frames_written += 1;
            }
        }
        Ok(CutReport {
            frames_written,
            start,
            end,
        })
    }
}

//! Lossless cutting of AAC audio carried in ADTS framing.
//!
//! ADTS (Audio Data Transport Stream) is a self-synchronizing framing format:
//! back to back frames, each opening with a 12 bit sync word, a fixed header
//! layout and a variable length AAC payload. Because every frame carries its
//! own length and a fixed 1024 samples, a stream can be trimmed to a time
//! range by copying whole frames, without touching the audio data.
//!
//! The pieces, in the order the bytes flow through them:
//!
//! - [`FrameHeader`] decodes the header bit layout from a byte window.
//! - [`FrameScanner`] walks a buffer, yields validated [`Frame`]s lazily and
//!   resynchronizes past corrupted or non-ADTS data, reporting such detours
//!   as [`ScanEvent`]s.
//! - [`Cutter`] resolves a [`CutRequest`] (frame indices or clock times) to
//!   a frame range and streams it to a [`FrameSink`].
//!
//! ```
//! use adts_cut::{CutRequest, Cutter};
//!
//! // Two minimal frames: 7 byte headers, no payload.
//! let header = [0xFF, 0xF1, 0x50, 0x80, 0x00, 0xFF, 0xFC];
//! let data: Vec<u8> = [header, header].concat();
//!
//! let mut cutter = Cutter::new(&data)?;
//! assert_eq!(cutter.sample_rate(), 44100);
//!
//! // Keep only the second frame.
//! let mut output = Vec::new();
//! let report = cutter.cut(&CutRequest::new("1".parse()?, "2".parse()?), &mut output)?;
//! assert_eq!(report.frames_written, 1);
//! assert_eq!(output, header);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cutter;
pub mod header;
pub mod scanner;

pub use crate::cutter::{
    CutBound, CutError, CutReport, CutRequest, Cutter, FrameSink, SAMPLES_PER_FRAME,
};
pub use crate::header::{FrameHeader, HeaderError, Profile, SAMPLING_FREQUENCIES};
pub use crate::scanner::{Frame, FrameScanner, ScanEvent};

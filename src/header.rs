//! ADTS frame header decoding.
//!
//! An ADTS frame starts with twelve '1'-bits (the sync word) followed by a
//! fixed layout of header fields packed MSB-first across byte boundaries.
//! [`FrameHeader::decode`] extracts them from a byte window with explicit
//! shifts and masks; the offsets below are bit offsets from the start of the
//! frame.
//!
//! | field                        | offset | width |
//! |------------------------------|--------|-------|
//! | syncword                     | 0      | 12    |
//! | mpeg version                 | 12     | 1     |
//! | layer                        | 13     | 2     |
//! | protection absent            | 15     | 1     |
//! | profile                      | 16     | 2     |
//! | sampling frequency index     | 18     | 4     |
//! | private bit                  | 22     | 1     |
//! | channel configuration        | 23     | 3     |
//! | original/copy                | 26     | 1     |
//! | home                         | 27     | 1     |
//! | copyright id bit             | 28     | 1     |
//! | copyright id start           | 29     | 1     |
//! | frame length                 | 30     | 13    |
//! | buffer fullness              | 43     | 11    |
//! | raw data blocks (minus one)  | 54     | 2     |
//!
//! When protection is present a 2 byte CRC follows the fields above and the
//! header grows from 7 to 9 bytes.

use std::fmt;

/// Sample rates addressable by the sampling frequency index. The remaining
/// index values (13 to 15) are reserved and rejected during decoding.
pub const SAMPLING_FREQUENCIES: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

const CHANNEL_CONFIGURATIONS: [&str; 8] = [
    "(not specified in header)",
    "1.0 Mono",
    "2.0 Stereo",
    "3.0 Stereo",
    "4.0 Surround",
    "5.0 Surround",
    "5.1 Surround",
    "7.1 Surround",
];

/// Failed attempt to decode a [`FrameHeader`] from a byte window.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// The leading 12 bits were not `0xFFF`. Carries the bits that were
    /// found instead.
    #[error("not an ADTS sync word: {0:#05x}")]
    BadSyncWord(u16),
    /// The sampling frequency index is one of the reserved values 13 to 15,
    /// so no sample rate can be derived from it.
    #[error("sampling frequency index {0} is reserved")]
    ReservedSamplingFrequency(u8),
    /// The declared frame length is smaller than the header itself.
    #[error("frame length {length} is shorter than the {minimum} byte header")]
    BadFrameLength { length: usize, minimum: usize },
    /// The window ends before the header does.
    #[error("header needs {expected} bytes, only {actual} available")]
    NotEnoughData { expected: usize, actual: usize },
}

/// AAC profile carried in the 2 bit profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Main,
    LowComplexity,
    ScalableSamplingRate,
    Reserved,
}

impl Profile {
    fn from_index(index: u8) -> Profile {
        match index {
            0 => Profile::Main,
            1 => Profile::LowComplexity,
            2 => Profile::ScalableSamplingRate,
            _ => Profile::Reserved,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profile::Main => "Main profile",
            Profile::LowComplexity => "Low Complexity profile (LC)",
            Profile::ScalableSamplingRate => "Scalable Sampling Rate profile (SSR)",
            Profile::Reserved => "(reserved)",
        };
        f.write_str(name)
    }
}

/// Decoded ADTS header fields.
///
/// Immutable view over the first 7 (or 9, with CRC) bytes of a frame. Decoding
/// validates the sync word, the sampling frequency index and the declared
/// frame length; everything else is exposed as found in the bit stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    mpeg_version: u8,
    layer: u8,
    protection_absent: bool,
    profile_index: u8,
    sampling_frequency_index: u8,
    private_bit: bool,
    channel_configuration_index: u8,
    original_copy: bool,
    home: bool,
    copyright_id_bit: bool,
    copyright_id_start: bool,
    frame_length: usize,
    buffer_fullness: u16,
    raw_data_blocks: u8,
}

impl FrameHeader {
    /// Decodes a header from the start of `bytes`.
    ///
    /// Pure function of the input window. Fails when the sync word is absent,
    /// the sampling frequency index is reserved, the declared frame length
    /// could not even hold the header, or the window is too short.
    pub fn decode(bytes: &[u8]) -> Result<FrameHeader, HeaderError> {
        if bytes.len() < 2 {
            return Err(HeaderError::NotEnoughData {
                expected: 2,
                actual: bytes.len(),
            });
        }
        if bytes[0] != 0xFF || bytes[1] & 0xF0 != 0xF0 {
            let bits = u16::from_be_bytes([bytes[0], bytes[1]]) >> 4;
            return Err(HeaderError::BadSyncWord(bits));
        }

        let protection_absent = bytes[1] & 0x01 == 0x01;
        let header_size = if protection_absent { 7 } else { 9 };
        if bytes.len() < header_size {
            return Err(HeaderError::NotEnoughData {
                expected: header_size,
                actual: bytes.len(),
            });
        }

        let sampling_frequency_index = bytes[2] >> 2 & 0x0F;
        if usize::from(sampling_frequency_index) >= SAMPLING_FREQUENCIES.len() {
            return Err(HeaderError::ReservedSamplingFrequency(
                sampling_frequency_index,
            ));
        }

        let frame_length =
            (bytes[3] as usize & 0x03) << 11 | (bytes[4] as usize) << 3 | bytes[5] as usize >> 5;
        if frame_length < header_size {
            return Err(HeaderError::BadFrameLength {
                length: frame_length,
                minimum: header_size,
            });
        }

        Ok(FrameHeader {
            mpeg_version: bytes[1] >> 3 & 0x01,
            layer: bytes[1] >> 1 & 0x03,
            protection_absent,
            profile_index: bytes[2] >> 6 & 0x03,
            sampling_frequency_index,
            private_bit: bytes[2] & 0x02 == 0x02,
            channel_configuration_index: (bytes[2] & 0x01) << 2 | bytes[3] >> 6 & 0x03,
            original_copy: bytes[3] & 0x20 == 0x20,
            home: bytes[3] & 0x10 == 0x10,
            copyright_id_bit: bytes[3] & 0x08 == 0x08,
            copyright_id_start: bytes[3] & 0x04 == 0x04,
            frame_length,
            buffer_fullness: (bytes[5] as u16 & 0x1F) << 6 | bytes[6] as u16 >> 2,
            raw_data_blocks: (bytes[6] & 0x03) + 1,
        })
    }

    /// MPEG identifier bit.
    pub fn mpeg_version(&self) -> u8 {
        self.mpeg_version
    }

    /// Layer field. Always 0 in well formed streams.
    pub fn layer(&self) -> u8 {
        self.layer
    }

    /// True when the header carries no CRC.
    pub fn protection_absent(&self) -> bool {
        self.protection_absent
    }

    /// Header size in bytes: 7, or 9 when a CRC is present.
    pub fn header_size(&self) -> usize {
        if self.protection_absent {
            7
        } else {
            9
        }
    }

    /// Raw 2 bit profile field.
    pub fn profile_index(&self) -> u8 {
        self.profile_index
    }

    /// AAC profile selected by the profile field.
    pub fn profile(&self) -> Profile {
        Profile::from_index(self.profile_index)
    }

    /// Raw 4 bit sampling frequency index. Always in `0..=12` for a decoded
    /// header; the reserved values fail decoding.
    pub fn sampling_frequency_index(&self) -> u8 {
        self.sampling_frequency_index
    }

    /// Sample rate in Hz looked up from the sampling frequency index.
    pub fn sampling_frequency(&self) -> u32 {
        SAMPLING_FREQUENCIES[usize::from(self.sampling_frequency_index)]
    }

    /// Private bit.
    pub fn private_bit(&self) -> bool {
        self.private_bit
    }

    /// Raw 3 bit channel configuration field.
    pub fn channel_configuration_index(&self) -> u8 {
        self.channel_configuration_index
    }

    /// Textual description of the channel configuration.
    pub fn channel_configuration(&self) -> &'static str {
        CHANNEL_CONFIGURATIONS[usize::from(self.channel_configuration_index)]
    }

    /// Original/copy bit.
    pub fn original_copy(&self) -> bool {
        self.original_copy
    }

    /// Home bit.
    pub fn home(&self) -> bool {
        self.home
    }

    /// One bit of the 72 bit copyright identification field.
    pub fn copyright_id_bit(&self) -> bool {
        self.copyright_id_bit
    }

    /// True when this frame carries the first copyright identification bit.
    pub fn copyright_id_start(&self) -> bool {
        self.copyright_id_start
    }

    /// Total size of the frame in bytes, header included.
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    /// State of the encoder's bit reservoir.
    pub fn buffer_fullness(&self) -> u16 {
        self.buffer_fullness
    }

    /// Number of AAC raw data blocks in the frame, 1 to 4.
    pub fn number_of_raw_data_blocks(&self) -> u8 {
        self.raw_data_blocks
    }
}

impl fmt::Display for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} Hz",
            self.profile(),
            self.channel_configuration(),
            self.sampling_frequency()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    // Minimal valid header: MPEG-4, no CRC, LC profile, 44100 Hz, stereo,
    // frame length 7, buffer fullness 0x7FF, one raw data block.
    fn valid_header() -> [u8; 7] {
        [0xFF, 0xF1, 0x50, 0x80, 0x00, 0xFF, 0xFC]
    }

    fn decode(bytes: &[u8]) -> FrameHeader {
        FrameHeader::decode(bytes).expect("header should decode")
    }

    #[test]
    fn decodes_canonical_header() {
        let header = decode(&valid_header());
        assert_eq!(header.mpeg_version(), 0);
        assert_eq!(header.layer(), 0);
        assert!(header.protection_absent());
        assert_eq!(header.header_size(), 7);
        assert_eq!(header.profile(), Profile::LowComplexity);
        assert_eq!(header.sampling_frequency(), 44100);
        assert!(!header.private_bit());
        assert_eq!(header.channel_configuration(), "2.0 Stereo");
        assert_eq!(header.frame_length(), 7);
        assert_eq!(header.buffer_fullness(), 0x7FF);
        assert_eq!(header.number_of_raw_data_blocks(), 1);
    }

    #[test]
    fn mpeg_version_bit() {
        let mut bytes = valid_header();
        bytes[1] = 0xF9; // version bit set, layer 0, no CRC
        assert_eq!(decode(&bytes).mpeg_version(), 1);
    }

    #[test]
    fn layer_bits() {
        let mut bytes = valid_header();
        bytes[1] = 0xF7; // layer bits set to 0b11
        assert_eq!(decode(&bytes).layer(), 3);
    }

    #[test]
    fn reserved_profile_decodes_with_reserved_name() {
        let mut bytes = valid_header();
        bytes[2] = 0xD0; // profile 0b11, sampling index still 4
        let header = decode(&bytes);
        assert_eq!(header.profile_index(), 3);
        assert_eq!(header.profile(), Profile::Reserved);
        assert_eq!(header.profile().to_string(), "(reserved)");
    }

    #[test]
    fn seven_point_one_channel_configuration() {
        let mut bytes = valid_header();
        bytes[2] = 0x51; // low channel configuration bit set
        bytes[3] = 0xC0; // remaining two bits set
        let header = decode(&bytes);
        assert_eq!(header.channel_configuration_index(), 7);
        assert_eq!(header.channel_configuration(), "7.1 Surround");
    }

    #[test]
    fn copyright_and_flag_bits() {
        let mut bytes = valid_header();
        bytes[2] |= 0x02; // private bit
        bytes[3] = 0xBC; // original/copy, home, copyright id + start
        let header = decode(&bytes);
        assert!(header.private_bit());
        assert!(header.original_copy());
        assert!(header.home());
        assert!(header.copyright_id_bit());
        assert!(header.copyright_id_start());
    }

    #[rstest]
    #[case(0, 96000)]
    #[case(1, 88200)]
    #[case(2, 64000)]
    #[case(3, 48000)]
    #[case(4, 44100)]
    #[case(5, 32000)]
    #[case(6, 24000)]
    #[case(7, 22050)]
    #[case(8, 16000)]
    #[case(9, 12000)]
    #[case(10, 11025)]
    #[case(11, 8000)]
    #[case(12, 7350)]
    fn sampling_frequency_lookup(#[case] index: u8, #[case] frequency: u32) {
        let mut bytes = valid_header();
        bytes[2] = 0x40 | index << 2;
        let header = decode(&bytes);
        assert_eq!(header.sampling_frequency_index(), index);
        assert_eq!(header.sampling_frequency(), frequency);
    }

    #[rstest]
    #[case(13)]
    #[case(14)]
    #[case(15)]
    fn reserved_sampling_frequency_fails(#[case] index: u8) {
        let mut bytes = valid_header();
        bytes[2] = 0x40 | index << 2;
        assert_eq!(
            FrameHeader::decode(&bytes),
            Err(HeaderError::ReservedSamplingFrequency(index))
        );
    }

    #[test]
    fn sync_word_must_lead() {
        let mut bytes = valid_header();
        bytes[0] = 0x00;
        assert!(matches!(
            FrameHeader::decode(&bytes),
            Err(HeaderError::BadSyncWord(_))
        ));

        let mut bytes = valid_header();
        bytes[1] = 0x0F;
        assert_eq!(
            FrameHeader::decode(&bytes),
            Err(HeaderError::BadSyncWord(0xFF0))
        );
    }

    #[test]
    fn frame_length_spanning_three_bytes() {
        let mut bytes = valid_header();
        bytes[3] = 0x83; // top two bits of the length
        bytes[4] = 0xFF;
        bytes[5] = 0xFF;
        assert_eq!(decode(&bytes).frame_length(), 0x1FFF);
    }

    #[test]
    fn frame_length_shorter_than_header_fails() {
        let mut bytes = valid_header();
        bytes[5] = 0xDF; // length 6
        assert_eq!(
            FrameHeader::decode(&bytes),
            Err(HeaderError::BadFrameLength {
                length: 6,
                minimum: 7
            })
        );
    }

    #[test]
    fn short_window_fails() {
        assert_eq!(
            FrameHeader::decode(&[]),
            Err(HeaderError::NotEnoughData {
                expected: 2,
                actual: 0
            })
        );
        assert_eq!(
            FrameHeader::decode(&valid_header()[..5]),
            Err(HeaderError::NotEnoughData {
                expected: 7,
                actual: 5
            })
        );
    }

    #[test]
    fn crc_header_needs_nine_bytes() {
        let mut bytes = [0u8; 9];
        bytes[..7].copy_from_slice(&valid_header());
        bytes[1] = 0xF0; // protection present
        bytes[4] = 0x01;
        bytes[5] = 0x3F; // length 9

        assert_eq!(
            FrameHeader::decode(&bytes[..7]),
            Err(HeaderError::NotEnoughData {
                expected: 9,
                actual: 7
            })
        );

        let header = decode(&bytes);
        assert!(!header.protection_absent());
        assert_eq!(header.header_size(), 9);
        assert_eq!(header.frame_length(), 9);
    }

    #[test]
    fn crc_header_rejects_frame_shorter_than_nine_bytes() {
        let mut bytes = [0u8; 9];
        bytes[..7].copy_from_slice(&valid_header());
        bytes[1] = 0xF0; // protection present, but length still 7
        bytes[5] = 0xFF;
        assert_eq!(
            FrameHeader::decode(&bytes),
            Err(HeaderError::BadFrameLength {
                length: 7,
                minimum: 9
            })
        );
    }

    #[test]
    fn display_summarizes_header() {
        assert_eq!(
            decode(&valid_header()).to_string(),
            "Low Complexity profile (LC), 2.0 Stereo, 44100 Hz"
        );
    }
}

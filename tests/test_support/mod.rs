#![allow(dead_code)]
//! Builders for synthetic ADTS streams shared by the integration tests.

/// One well formed frame of the given total length: MPEG-4, no CRC, LC
/// profile, stereo, the requested sampling frequency index, payload filled
/// with `0xA5` so payload bytes never fake a sync word.
pub fn frame_with_rate(length: usize, sampling_frequency_index: u8) -> Vec<u8> {
    assert!((7..8192).contains(&length));
    assert!(sampling_frequency_index < 13);
    let mut bytes = vec![0xA5; length];
    bytes[0] = 0xFF;
    bytes[1] = 0xF1;
    bytes[2] = 0x40 | sampling_frequency_index << 2;
    bytes[3] = 0x80 | (length >> 11) as u8;
    bytes[4] = (length >> 3) as u8;
    bytes[5] = ((length as u8) << 5) | 0x1F;
    bytes[6] = 0xFC;
    bytes
}

/// A 44100 Hz frame (sampling frequency index 4).
pub fn frame(length: usize) -> Vec<u8> {
    frame_with_rate(length, 4)
}

/// `count` equal frames concatenated into one stream.
pub fn stream(count: usize, frame_length: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(count * frame_length);
    for _ in 0..count {
        data.extend(frame(frame_length));
    }
    data
}

//! Sega CD sound files.
//!
//! A `.snd` file starts with a table of big-endian 32-bit segment offsets. The first offset is also the size
//! of the table, so the table holds `first / 4` offsets; the end of the file closes the last segment.
//!
//! Segment 0 is the mapping table. Its first two bytes are the first and last sound numbers it covers,
//! followed by one byte per sound number: `0` when the sound is absent, otherwise the index of the segment
//! holding it.
//!
//! A sound segment starts with a big-endian 32-bit sample length, followed by the samples stored as 8-bit
//! sign-magnitude values.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::{debug, instrument};

use crate::error::{Error, FormatError, Result};

/// Convert one sign-magnitude sample to two's complement
///
/// ```
/// assert_eq!(aw_bank::sound::convert_sample(0x81), 0xFF);
/// assert_eq!(aw_bank::sound::convert_sample(0x7F), 0x7F);
/// ```
#[inline]
pub fn convert_sample(sample: u8) -> u8 {
    if sample & 0x80 != 0 {
        (sample & 0x7F).wrapping_neg()
    } else {
        sample
    }
}

/// Convert a buffer of sign-magnitude samples to signed 8-bit PCM
pub fn convert_samples(samples: &[u8]) -> Vec<u8> {
    samples.iter().copied().map(convert_sample).collect()
}

/// Build the sound resource stored in the bank for `slot`.
///
/// The samples are converted to signed PCM and prefixed with the length in 16-bit words, twice.
pub fn encode_sound(slot: usize, samples: &[u8]) -> Result<Vec<u8>> {
    if samples.len() % 2 != 0 {
        return Err(Error::OddSampleLength {
            slot,
            length: samples.len(),
        });
    }

    let words = u16::try_from(samples.len() / 2).map_err(|_| Error::SampleTooLong {
        slot,
        length: samples.len(),
    })?;

    let mut out = Vec::with_capacity(samples.len() + 4);
    out.extend_from_slice(&words.to_be_bytes());
    out.extend_from_slice(&words.to_be_bytes());
    out.extend(samples.iter().copied().map(convert_sample));
    Ok(out)
}

/// One sound found in a sound file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundEntry<'a> {
    /// Directory slot of the sound
    pub slot: usize,

    /// Index of the segment holding the sound
    pub segment: usize,

    /// Sample length declared by the segment
    pub header_len: u32,

    /// Size of the whole segment
    pub segment_len: u32,

    /// Raw sign-magnitude samples
    pub samples: &'a [u8],
}

impl SoundEntry<'_> {
    /// Convert this sound into a bank resource payload
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_sound(self.slot, self.samples)
    }
}

/// Parsed sound file
#[derive(Debug, Clone)]
pub struct SoundTable<'a> {
    data: &'a [u8],
    offsets: Vec<u32>,
    first_num: u8,
    last_num: u8,
    mapping: &'a [u8],
}

impl<'a> SoundTable<'a> {
    /// Parse the offset and mapping tables of a sound file.
    #[instrument(skip_all, fields(len = data.len()), err)]
    pub fn parse(data: &'a [u8]) -> Result<SoundTable<'a>> {
        let mut reader = Cursor::new(data);

        let table_size = reader
            .read_u32::<BigEndian>()
            .map_err(|_| FormatError::TruncatedOffsets { read: 0, count: 1 })?;
        if table_size == 0 || table_size % 4 != 0 {
            return Err(FormatError::MisalignedOffsets(table_size).into());
        }

        let count = (table_size / 4) as usize;
        let mut offsets = Vec::with_capacity(count + 1);
        offsets.push(table_size);
        for read in 1..count {
            let offset = reader
                .read_u32::<BigEndian>()
                .map_err(|_| FormatError::TruncatedOffsets { read, count })?;
            offsets.push(offset);
        }
        offsets.push(data.len() as u32);

        let mapping = segment(data, &offsets, 0)?;
        if mapping.len() < 2 {
            return Err(FormatError::MappingTooShort {
                first_num: 0,
                last_num: 0,
                needed: 2,
                len: mapping.len(),
            }
            .into());
        }

        let (first_num, last_num) = (mapping[0], mapping[1]);
        let needed = (last_num as usize + 3).saturating_sub(first_num as usize).max(2);
        if mapping.len() < needed {
            return Err(FormatError::MappingTooShort {
                first_num,
                last_num,
                needed,
                len: mapping.len(),
            }
            .into());
        }
        debug!("{} offsets, sounds {first_num:#04x}..={last_num:#04x}", offsets.len());

        Ok(SoundTable {
            data,
            offsets,
            first_num,
            last_num,
            mapping: &mapping[..needed],
        })
    }

    /// First sound number covered by the mapping table
    pub fn first_num(&self) -> u8 {
        self.first_num
    }

    /// Last sound number covered by the mapping table
    pub fn last_num(&self) -> u8 {
        self.last_num
    }

    /// Segment offsets, including the end of the file
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Segment index for every sound number, `0` when absent
    pub fn mapping(&self) -> &[u8] {
        &self.mapping[2..]
    }

    /// Iterate over the sounds present in the file, in sound number order.
    ///
    /// Every item carries the slot it belongs to, a malformed sound only fails its own item.
    pub fn sounds(&self) -> impl Iterator<Item = (usize, Result<SoundEntry<'a>>)> + '_ {
        self.mapping()
            .iter()
            .enumerate()
            .filter(|(_, index)| **index != 0)
            .map(|(i, &index)| {
                let slot = self.first_num as usize + i;
                (slot, self.sound(slot, index as usize))
            })
    }

    fn sound(&self, slot: usize, index: usize) -> Result<SoundEntry<'a>> {
        if index + 1 >= self.offsets.len() {
            return Err(FormatError::UnknownSegment {
                slot,
                index,
                count: self.offsets.len() - 1,
            }
            .into());
        }

        let segment_len = segment(self.data, &self.offsets, index)?.len() as u32;
        let start = self.offsets[index] as usize;

        let mut reader = Cursor::new(&self.data[start..]);
        let header_len = reader
            .read_u32::<BigEndian>()
            .map_err(|_| out_of_bounds(index, start, start + 4, self.data.len()))?;
        debug!("sound {slot:#04x} segment {index} header {header_len} length {segment_len}");

        if header_len > segment_len {
            return Err(Error::SampleLength {
                slot,
                header: header_len,
                length: segment_len,
            });
        }

        let samples_start = start + 4;
        let samples_end = samples_start + header_len as usize;
        let samples = self
            .data
            .get(samples_start..samples_end)
            .ok_or_else(|| out_of_bounds(index, samples_start, samples_end, self.data.len()))?;

        Ok(SoundEntry {
            slot,
            segment: index,
            header_len,
            segment_len,
            samples,
        })
    }
}

fn out_of_bounds(index: usize, start: usize, end: usize, len: usize) -> FormatError {
    FormatError::SegmentOutOfBounds {
        index,
        start: start as u32,
        end: end as u32,
        len,
    }
}

fn segment<'a>(data: &'a [u8], offsets: &[u32], index: usize) -> Result<&'a [u8]> {
    let (start, end) = (offsets[index], offsets[index + 1]);
    if start > end || end as usize > data.len() {
        return Err(out_of_bounds(index, start as usize, end as usize, data.len()).into());
    }
    Ok(&data[start as usize..end as usize])
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::{Error, FormatError, Result};
    use crate::sound::{convert_sample, convert_samples, encode_sound, SoundTable};

    #[test]
    fn sign_magnitude_to_pcm() {
        assert_eq!(convert_sample(0x00), 0x00);
        assert_eq!(convert_sample(0x01), 0x01);
        assert_eq!(convert_sample(0x7F), 0x7F);
        assert_eq!(convert_sample(0x80), 0x00);
        assert_eq!(convert_sample(0x81), 0xFF);
        assert_eq!(convert_sample(0xFF), 0x81);
    }

    #[test]
    fn conversion_keeps_length() {
        let input = (0u8..=255).collect::<Vec<_>>();
        let output = convert_samples(&input);
        assert_eq!(output.len(), input.len());
        assert_eq!(&output[..0x80], &input[..0x80]);
        assert_eq!(output[0xC0], 0xC0);
    }

    #[test]
    fn encode_prefixes_word_count_twice() -> Result<()> {
        let sound = encode_sound(0x40, &[0x01, 0x81, 0x7F, 0xFF])?;
        assert_eq!(sound, vec![0x00, 0x02, 0x00, 0x02, 0x01, 0xFF, 0x7F, 0x81]);
        Ok(())
    }

    #[test]
    fn encode_rejects_odd_length() {
        assert!(matches!(
            encode_sound(0x40, &[0x01, 0x02, 0x03]),
            Err(Error::OddSampleLength {
                slot: 0x40,
                length: 3
            })
        ));
    }

    #[rustfmt::skip]
    const TWO_SOUNDS: [u8; 38] = [
        // Offsets (12)
        0x00, 0x00, 0x00, 0x0C,
        0x00, 0x00, 0x00, 0x12,
        0x00, 0x00, 0x00, 0x1A,
        // Mapping (6): sounds 0x30..=0x33
        0x30, 0x33, 0x01, 0x00, 0x00, 0x02,
        // Segment 1 (8)
        0x00, 0x00, 0x00, 0x04, 0x01, 0x02, 0x83, 0x84,
        // Segment 2 (12)
        0x00, 0x00, 0x00, 0x02, 0x85, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn parse_sound_table() -> Result<()> {
        let table = SoundTable::parse(&TWO_SOUNDS)?;
        assert_eq!(table.first_num(), 0x30);
        assert_eq!(table.last_num(), 0x33);
        assert_eq!(table.offsets(), &[0x0C, 0x12, 0x1A, 0x26]);
        assert_eq!(table.mapping(), &[0x01, 0x00, 0x00, 0x02]);

        let sounds = table
            .sounds()
            .map(|(_, sound)| sound)
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(sounds.len(), 2);

        assert_eq!(sounds[0].slot, 0x30);
        assert_eq!(sounds[0].segment, 1);
        assert_eq!(sounds[0].header_len, 4);
        assert_eq!(sounds[0].segment_len, 8);
        assert_eq!(sounds[0].samples, &[0x01, 0x02, 0x83, 0x84]);

        assert_eq!(sounds[1].slot, 0x33);
        assert_eq!(sounds[1].segment_len, 12);
        assert_eq!(sounds[1].encode()?, vec![0x00, 0x01, 0x00, 0x01, 0xFB, 0x06]);

        Ok(())
    }

    #[test]
    fn header_longer_than_segment_skips_one_sound() -> Result<()> {
        let mut input = TWO_SOUNDS;
        input[21] = 0x09;

        let table = SoundTable::parse(&input)?;
        let sounds = table.sounds().collect::<Vec<_>>();

        assert!(matches!(
            sounds[0],
            (
                0x30,
                Err(Error::SampleLength {
                    slot: 0x30,
                    header: 9,
                    length: 8
                })
            )
        ));
        assert!(sounds[1].1.is_ok());

        Ok(())
    }

    #[test]
    fn unknown_segment() -> Result<()> {
        let mut input = TWO_SOUNDS;
        input[17] = 0x03;

        let table = SoundTable::parse(&input)?;
        let sounds = table.sounds().collect::<Vec<_>>();
        assert!(matches!(
            sounds[1].1,
            Err(Error::Format(FormatError::UnknownSegment {
                slot: 0x33,
                index: 3,
                count: 3
            }))
        ));

        Ok(())
    }

    #[test]
    fn reject_misaligned_table() {
        let mut input = TWO_SOUNDS;
        input[3] = 0x0D;

        assert!(matches!(
            SoundTable::parse(&input),
            Err(Error::Format(FormatError::MisalignedOffsets(0x0D)))
        ));
    }

    #[test]
    fn reject_short_mapping() {
        let mut input = TWO_SOUNDS;
        // Sounds 0x30..=0x40 do not fit in a 6 byte mapping
        input[13] = 0x40;

        assert!(matches!(
            SoundTable::parse(&input),
            Err(Error::Format(FormatError::MappingTooShort { needed: 19, .. }))
        ));
    }

    #[test]
    fn reject_truncated_offsets() {
        assert!(matches!(
            SoundTable::parse(&[0x00, 0x00, 0x00, 0x10, 0x00, 0x00]),
            Err(Error::Format(FormatError::TruncatedOffsets { read: 1, count: 4 }))
        ));
    }
}

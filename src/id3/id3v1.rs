use std::io::{Read, Seek, SeekFrom};
use crate::common::error::{Id3Error, Result};
use crate::common::util::{read_up_to, stream_len};
use crate::id3::specs::{self, Encoding};
use crate::id3::version::TagVersion;

pub const FOOTER_SIZE: usize = 128;

/// Parsed ID3v1/ID3v1.1 trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3v1Footer {
    pub version: TagVersion,
    pub flags: u8,
    pub size: u32,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    /// Track number, 0 when the trailer uses the ID3v1.0 layout.
    pub track: u8,
    /// Numeric genre code.
    pub genre: u8,
}

impl Id3v1Footer {
    /// Parse the final 128 bytes of a file.
    pub fn parse(data: &[u8; FOOTER_SIZE]) -> Result<Self> {
        if &data[0..3] != b"TAG" {
            return Err(Id3Error::MissingFooter);
        }

        // Title: bytes 3-32, artist 33-62, album 63-92, year 93-96,
        // comment 97-125, track 126, genre 127
        let track = data[126];
        let minor = if track == 0 { 0 } else { 1 };

        Ok(Id3v1Footer {
            version: TagVersion::new(1, minor, 0),
            flags: 0,
            size: FOOTER_SIZE as u32,
            title: decode_v1_string(&data[3..33]),
            artist: decode_v1_string(&data[33..63]),
            album: decode_v1_string(&data[63..93]),
            year: decode_v1_string(&data[93..97]),
            comment: decode_v1_string(&data[97..126]),
            track,
            genre: data[127],
        })
    }

    /// Seek to the end of `reader` and parse the trailer found there.
    pub fn read<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Self> {
        let len = stream_len(reader)?;
        if len < FOOTER_SIZE as u64 {
            return Err(Id3Error::TruncatedSource {
                needed: FOOTER_SIZE as u64,
                available: len,
            });
        }

        reader.seek(SeekFrom::Start(len - FOOTER_SIZE as u64))?;
        let mut buf = [0u8; FOOTER_SIZE];
        let n = read_up_to(reader, &mut buf)?;
        if n < FOOTER_SIZE {
            return Err(Id3Error::TruncatedSource {
                needed: FOOTER_SIZE as u64,
                available: n as u64,
            });
        }

        let footer = Self::parse(&buf)?;
        log::debug!("found ID3v{} footer", footer.version);
        Ok(footer)
    }

    pub fn has_track(&self) -> bool {
        self.version.minor == 1
    }

    /// Genre name for the numeric code, if it is in the table.
    pub fn genre_name(&self) -> Option<&'static str> {
        specs::genre_by_index(self.genre)
    }
}

/// Decode an ID3v1 fixed-width string, trimming NUL and space padding.
fn decode_v1_string(data: &[u8]) -> String {
    specs::decode_padded_text(data, Encoding::Latin1)
}

use std::io::Read;
use crate::common::error::{Id3Error, Result};
use crate::common::util::read_up_to;
use crate::id3::version::TagVersion;

pub const HEADER_SIZE: usize = 10;

/// Size encoding used in the ID3v2 header.
///
/// `decode` masks each byte with `0xef`, which keeps the reserved top bit
/// and drops bit 4. The ID3v2 standard masks with `0x7f` instead; see
/// `decode_canonical`. Only values whose 7-bit groups all have bit 4 clear
/// decode identically under both.
pub struct SynchSafe;

impl SynchSafe {
    /// Decode a header size as the loader does (non-conformant mask).
    pub fn decode(raw: u32) -> u32 {
        (raw & 0xef)
            | ((raw & 0xef00) >> 1)
            | ((raw & 0xef_0000) >> 2)
            | ((raw & 0xef00_0000) >> 3)
    }

    /// Decode a synch-safe integer with the standard `0x7f` mask.
    pub fn decode_canonical(raw: u32) -> u32 {
        (raw & 0x7f)
            | ((raw & 0x7f00) >> 1)
            | ((raw & 0x7f_0000) >> 2)
            | ((raw & 0x7f00_0000) >> 3)
    }

    /// Encode the low 28 bits of `value` as four 7-bit groups.
    pub fn encode(value: u32) -> u32 {
        (value & 0x7f)
            | ((value << 1) & 0x7f00)
            | ((value << 2) & 0x7f_0000)
            | ((value << 3) & 0x7f00_0000)
    }
}

/// Parsed ID3v2 header (10 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3Header {
    pub version: TagVersion,
    pub flags: u8,
    pub size: u32, // Frame region size, excluding the 10 header bytes
}

impl Id3Header {
    /// Parse a header from its 10 raw bytes.
    /// Returns `Ok(None)` when the `ID3` marker is missing.
    pub fn parse(data: &[u8; HEADER_SIZE]) -> Result<Option<Self>> {
        if &data[0..3] != b"ID3" {
            return Ok(None);
        }

        let major = data[3];
        let revision = data[4];

        if !(2..=4).contains(&major) {
            return Err(Id3Error::UnsupportedVersion(format!(
                "ID3v2.{}.{}",
                major, revision
            )));
        }

        let raw_size = u32::from_be_bytes([data[6], data[7], data[8], data[9]]);

        Ok(Some(Id3Header {
            version: TagVersion::new(2, major, revision),
            flags: data[5],
            size: SynchSafe::decode(raw_size),
        }))
    }

    /// Read and parse the header at the current position of `reader`.
    ///
    /// Consumes up to 10 bytes whether or not a header is found; callers
    /// must seek before reading anything else from the source.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Self>> {
        let mut buf = [0u8; HEADER_SIZE];
        let n = read_up_to(reader, &mut buf)?;

        if n < 3 || &buf[0..3] != b"ID3" {
            log::debug!("no ID3v2 header");
            return Ok(None);
        }

        if n < HEADER_SIZE {
            return Err(Id3Error::TruncatedSource {
                needed: HEADER_SIZE as u64,
                available: n as u64,
            });
        }

        let header = Self::parse(&buf)?;
        if let Some(h) = &header {
            log::debug!("found ID3v{} header, {} byte frame region", h.version, h.size);
        }
        Ok(header)
    }

    /// Major sub-version (2, 3 or 4).
    pub fn major(&self) -> u8 {
        self.version.minor
    }

    pub fn unsynchronisation(&self) -> bool {
        self.flags & 0x80 != 0
    }

    pub fn extended(&self) -> bool {
        self.flags & 0x40 != 0
    }

    pub fn experimental(&self) -> bool {
        self.flags & 0x20 != 0
    }

    /// Full tag size including the 10-byte header.
    pub fn full_size(&self) -> u64 {
        self.size as u64 + HEADER_SIZE as u64
    }
}

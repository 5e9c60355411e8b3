use std::io::Read;
use byteorder::{BigEndian, ReadBytesExt};
use crate::common::error::{Id3Error, Result};
use crate::common::util::read_up_to;
use crate::id3::header::Id3Header;
use crate::id3::specs::{self, Encoding};

pub const FRAME_HEADER_SIZE: usize = 10;

/// Upper bound on the buffer reserved up front for a frame payload. Larger
/// payloads grow as their bytes arrive.
const MAX_PREALLOC: usize = 64 * 1024;

fn payload_capacity(size: u32) -> usize {
    (size as usize).min(MAX_PREALLOC)
}

/// A parsed ID3v2.3/2.4 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: String,
    /// Declared payload size (plain big-endian, not synch-safe).
    pub size: u32,
    pub flags: u16,
    pub data: Vec<u8>,
    pub content: FrameContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameContent {
    /// Payload kept as raw bytes in `Frame::data`.
    Opaque,
    Text(TextFrame),
}

/// Decoded payload of a `T***` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    /// Raw encoding byte (0 = ISO-8859-1, 1 = UTF-16, 2 = UTF-16BE, 3 = UTF-8).
    pub encoding: u8,
    pub text: String,
}

impl TextFrame {
    pub fn parse(data: &[u8]) -> Self {
        match data.split_first() {
            Some((&encoding, rest)) => TextFrame {
                encoding,
                text: specs::decode_padded_text(rest, Encoding::from_byte_lenient(encoding)),
            },
            None => TextFrame {
                encoding: 0,
                text: String::new(),
            },
        }
    }
}

impl Frame {
    /// Build a frame from its header fields and payload.
    pub fn new(id: String, flags: u16, data: Vec<u8>) -> Self {
        let content = if id.starts_with('T') {
            FrameContent::Text(TextFrame::parse(&data))
        } else {
            FrameContent::Opaque
        };

        Frame {
            id,
            size: data.len() as u32,
            flags,
            data,
            content,
        }
    }

    pub fn as_text(&self) -> Option<&TextFrame> {
        match &self.content {
            FrameContent::Text(f) => Some(f),
            FrameContent::Opaque => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.as_text().map(|f| f.text.as_str())
    }
}

/// Read every frame of an ID3v2.3/2.4 tag.
///
/// `reader` must be positioned right after the 10-byte tag header.
pub fn read_frames<R: Read + ?Sized>(reader: &mut R, header: &Id3Header) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    read_frames_with(reader, header, |frame| frames.push(frame))?;
    Ok(frames)
}

/// Read frames, handing each one to `on_frame` in tag order.
///
/// Never reads more than `header.size` bytes. Zero-length frames are
/// skipped and the first NUL identifier byte ends the frame region.
pub fn read_frames_with<R, F>(reader: &mut R, header: &Id3Header, mut on_frame: F) -> Result<()>
where
    R: Read + ?Sized,
    F: FnMut(Frame),
{
    if header.major() == 2 {
        return Err(Id3Error::UnsupportedVersion(format!(
            "ID3v{} frames are not supported",
            header.version
        )));
    }

    let budget = header.size as u64;
    let mut consumed = 0u64;

    while consumed + (FRAME_HEADER_SIZE as u64) < budget {
        let mut raw = [0u8; FRAME_HEADER_SIZE];
        let n = read_up_to(reader, &mut raw)?;
        if n < FRAME_HEADER_SIZE {
            return Err(Id3Error::TruncatedFrame(format!(
                "frame header at offset {} has {} of {} bytes",
                consumed, n, FRAME_HEADER_SIZE
            )));
        }
        consumed += FRAME_HEADER_SIZE as u64;

        if raw[0] == 0 {
            log::trace!("padding at offset {}", consumed - FRAME_HEADER_SIZE as u64);
            break;
        }

        let id = String::from_utf8_lossy(&raw[0..4]).into_owned();
        let mut fields = &raw[4..];
        let size = fields.read_u32::<BigEndian>()?;
        let flags = fields.read_u16::<BigEndian>()?;

        if size == 0 {
            log::trace!("skipping empty {} frame", id);
            continue;
        }

        if consumed + size as u64 > budget {
            return Err(Id3Error::TruncatedFrame(format!(
                "{} frame declares {} bytes, {} left in tag",
                id,
                size,
                budget - consumed
            )));
        }

        let mut data = Vec::with_capacity(payload_capacity(size));
        (&mut *reader).take(size as u64).read_to_end(&mut data)?;
        if data.len() < size as usize {
            return Err(Id3Error::TruncatedFrame(format!(
                "{} frame has {} of {} bytes",
                id,
                data.len(),
                size
            )));
        }
        consumed += size as u64;

        log::trace!("read {} frame, {} bytes", id, size);
        on_frame(Frame::new(id, flags, data));
    }

    Ok(())
}

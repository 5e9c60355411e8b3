use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use crate::common::error::{Id3Error, Result};
use crate::common::util::open_ro;
use crate::id3::common_frames;
use crate::id3::frames::{self, Frame};
use crate::id3::header::Id3Header;
use crate::id3::id3v1::Id3v1Footer;
use crate::id3::specs;
use crate::id3::version::TagVersion;
use crate::id3::LoadOptions;

/// Where a tag was found: an ID3v2 header or an ID3v1 trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSource {
    Header(Id3Header),
    Footer(Id3v1Footer),
}

impl TagSource {
    pub fn version(&self) -> TagVersion {
        match self {
            TagSource::Header(h) => h.version,
            TagSource::Footer(f) => f.version,
        }
    }
}

/// Metadata loaded from a single ID3 tag.
///
/// ID3v2 tags keep every frame in `frames`, in tag order, and fill the
/// normalized fields from the common frames. ID3v1 tags fill the fields
/// from the trailer and have no frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub version: TagVersion,
    pub source: TagSource,
    pub frames: Option<Vec<Frame>>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<String>,
    pub year: Option<String>,
    pub comment: Option<String>,
    pub genre: Option<String>,
}

impl Tag {
    /// An empty tag for `source`, with no fields set.
    pub fn new(source: TagSource) -> Self {
        Tag {
            version: source.version(),
            source,
            frames: None,
            title: None,
            artist: None,
            album: None,
            track: None,
            year: None,
            comment: None,
            genre: None,
        }
    }

    /// Load a tag from a seekable source.
    ///
    /// Looks for an ID3v2 header at the start of the stream first, then
    /// (if `options.try_id3v1` is set) for an ID3v1 trailer. Failures while
    /// decoding a tag are returned as `Id3Error::Parse`; a stream with no tag
    /// at all gives `Id3Error::NoTagFound`.
    pub fn load<R: Read + Seek + ?Sized>(reader: &mut R, options: &LoadOptions) -> Result<Self> {
        reader.seek(SeekFrom::Start(0)).map_err(|e| Id3Error::parse(e.into()))?;

        if let Some(header) = Id3Header::read(reader).map_err(Id3Error::parse)? {
            return Self::from_id3v2(reader, header).map_err(Id3Error::parse);
        }

        if !options.try_id3v1 {
            return Err(Id3Error::NoTagFound);
        }

        match Id3v1Footer::read(reader) {
            Ok(footer) => Ok(Self::from_id3v1(footer)),
            Err(Id3Error::MissingFooter) => {
                log::debug!("no ID3v1 footer");
                Err(Id3Error::NoTagFound)
            }
            Err(e) => Err(Id3Error::parse(e)),
        }
    }

    /// Open `path` and load its tag with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &LoadOptions::default())
    }

    /// Open `path` and load its tag. The file is closed before returning.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let mut file = open_ro(path)?;
        Self::load(&mut file, options)
    }

    fn from_id3v2<R: Read + ?Sized>(reader: &mut R, header: Id3Header) -> Result<Self> {
        let mut tag = Tag::new(TagSource::Header(header));
        let mut frames = Vec::new();

        frames::read_frames_with(reader, &header, |frame| {
            common_frames::apply(&mut tag, &frame);
            frames.push(frame);
        })?;

        tag.frames = Some(frames);
        Ok(tag)
    }

    fn from_id3v1(footer: Id3v1Footer) -> Self {
        let mut tag = Tag::new(TagSource::Footer(footer.clone()));

        tag.title = Some(footer.title);
        tag.artist = Some(footer.artist);
        tag.album = Some(footer.album);
        tag.year = Some(footer.year);
        tag.comment = Some(footer.comment);
        if footer.track != 0 {
            tag.track = Some(footer.track.to_string());
        }
        tag.genre = specs::genre_by_index(footer.genre).map(str::to_string);

        tag
    }

    pub fn header(&self) -> Option<&Id3Header> {
        match &self.source {
            TagSource::Header(h) => Some(h),
            TagSource::Footer(_) => None,
        }
    }

    pub fn footer(&self) -> Option<&Id3v1Footer> {
        match &self.source {
            TagSource::Footer(f) => Some(f),
            TagSource::Header(_) => None,
        }
    }

    /// Frames keyed by identifier; a later frame replaces an earlier one
    /// with the same identifier. `None` for ID3v1 tags.
    pub fn frames_by_id(&self) -> Option<HashMap<&str, &Frame>> {
        self.frames
            .as_ref()
            .map(|frames| frames.iter().map(|f| (f.id.as_str(), f)).collect())
    }

    /// Human-readable description of one of this tag's frames.
    pub fn describe_frame(&self, frame: &Frame) -> Result<Option<&'static str>> {
        match (self.version.major, self.version.minor) {
            (2, 3) | (2, 4) => Ok(specs::frame_description(&frame.id)),
            (2, minor) => Err(Id3Error::UnsupportedVersion(format!(
                "no frame descriptions for ID3v2.{}",
                minor
            ))),
            (1, _) => Err(Id3Error::NoFrames),
            _ => Err(Id3Error::UnsupportedVersion(self.version.to_string())),
        }
    }

    /// `year,artist,album,track,title,comment,genre,version`, with absent
    /// fields left empty.
    pub fn summary_line(&self) -> String {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        [
            field(&self.year),
            field(&self.artist),
            field(&self.album),
            field(&self.track),
            field(&self.title),
            field(&self.comment),
            field(&self.genre),
            self.version.to_string(),
        ]
        .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::header::SynchSafe;
    use std::io::Cursor;

    fn frame_bytes(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(payload);
        out
    }

    /// Build an ID3v2 tag, padding the frame region up to a size the
    /// header decoder reads back unchanged.
    fn id3v2(major: u8, region: &[u8]) -> Vec<u8> {
        let mut size = region.len() as u32;
        while SynchSafe::decode(SynchSafe::encode(size)) != size {
            size += 1;
        }

        let mut out = b"ID3".to_vec();
        out.extend_from_slice(&[major, 0, 0]);
        out.extend_from_slice(&SynchSafe::encode(size).to_be_bytes());
        out.extend_from_slice(region);
        out.resize(10 + size as usize, 0);
        out
    }

    fn id3v1(title: &[u8], track: u8, genre: u8) -> Vec<u8> {
        let mut buf = vec![0u8; 128];
        buf[0..3].copy_from_slice(b"TAG");
        buf[3..3 + title.len()].copy_from_slice(title);
        buf[33..37].copy_from_slice(b"Band");
        buf[93..97].copy_from_slice(b"1987");
        buf[126] = track;
        buf[127] = genre;
        buf
    }

    #[test]
    fn loads_id3v23_frames() {
        let mut region = frame_bytes(b"TIT2", b"\x00Caf\xe9");
        region.extend(frame_bytes(b"TYER", b"\x001999"));
        let data = id3v2(3, &region);

        let tag = Tag::load(&mut Cursor::new(data), &LoadOptions::default()).unwrap();
        assert_eq!(tag.version, TagVersion::new(2, 3, 0));
        assert_eq!(tag.title.as_deref(), Some("Café"));
        assert_eq!(tag.year.as_deref(), Some("1999"));
        assert_eq!(tag.frames.as_ref().map(Vec::len), Some(2));
        assert!(tag.header().is_some());
        assert!(tag.footer().is_none());
    }

    #[test]
    fn id3v2_takes_priority_over_id3v1() {
        let region = frame_bytes(b"TIT2", b"\x00From v2");
        let mut data = id3v2(4, &region);
        data.extend_from_slice(&[0x55; 300]);
        data.extend(id3v1(b"From v1", 1, 0));

        let tag = Tag::load(&mut Cursor::new(data), &LoadOptions::default()).unwrap();
        assert_eq!(tag.version, TagVersion::new(2, 4, 0));
        assert_eq!(tag.title.as_deref(), Some("From v2"));
        assert_eq!(tag.artist, None);
    }

    #[test]
    fn falls_back_to_id3v1() {
        let mut data = vec![0xFFu8; 500];
        data.extend(id3v1(b"Old", 5, 9));

        let tag = Tag::load(&mut Cursor::new(data), &LoadOptions::default()).unwrap();
        assert_eq!(tag.version, TagVersion::new(1, 1, 0));
        assert_eq!(tag.title.as_deref(), Some("Old"));
        assert_eq!(tag.artist.as_deref(), Some("Band"));
        assert_eq!(tag.year.as_deref(), Some("1987"));
        assert_eq!(tag.track.as_deref(), Some("5"));
        assert_eq!(tag.genre.as_deref(), Some("Metal"));
        assert!(tag.frames.is_none());
        assert!(tag.frames_by_id().is_none());
    }

    #[test]
    fn id3v10_has_no_track() {
        let mut cursor = Cursor::new(id3v1(b"Old", 0, 200));
        let tag = Tag::load(&mut cursor, &LoadOptions::default()).unwrap();
        assert_eq!(tag.version, TagVersion::new(1, 0, 0));
        assert_eq!(tag.track, None);
        assert_eq!(tag.genre, None);
    }

    #[test]
    fn no_tag_found() {
        let data = vec![0x11u8; 400];
        let err = Tag::load(&mut Cursor::new(data), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Id3Error::NoTagFound));
    }

    #[test]
    fn id3v1_fallback_can_be_disabled() {
        let data = id3v1(b"Old", 5, 9);
        let options = LoadOptions::default().try_id3v1(false);
        let err = Tag::load(&mut Cursor::new(data), &options).unwrap_err();
        assert!(matches!(err, Id3Error::NoTagFound));
    }

    #[test]
    fn short_source_without_tag_is_truncated() {
        let mut cursor = Cursor::new(b"tiny".to_vec());
        let err = Tag::load(&mut cursor, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Id3Error::Parse(_)));
        assert!(matches!(err.cause(), Id3Error::TruncatedSource { .. }));
    }

    #[test]
    fn v22_tags_fail() {
        let data = id3v2(2, &frame_bytes(b"TT2\x00", b"\x00x"));
        let err = Tag::load(&mut Cursor::new(data), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Id3Error::Parse(_)));
        assert!(matches!(err.cause(), Id3Error::UnsupportedVersion(_)));
    }

    #[test]
    fn bad_major_version_fails() {
        let data = id3v2(5, &[]);
        let err = Tag::load(&mut Cursor::new(data), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err.cause(), Id3Error::UnsupportedVersion(_)));
    }

    #[test]
    fn truncated_frame_fails_whole_load() {
        let mut data = id3v2(3, &frame_bytes(b"TIT2", b"\x00Complete title"));
        // Cut the stream in the middle of the payload
        data.truncate(10 + 20);
        let err = Tag::load(&mut Cursor::new(data), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err.cause(), Id3Error::TruncatedFrame(_)));
    }

    #[test]
    fn huge_frame_in_tiny_source_fails() {
        let mut data = b"ID3\x03\x00\x00\x6f\x6f\x6f\x6f".to_vec();
        data.extend_from_slice(b"APIC");
        data.extend_from_slice(&200_000_000u32.to_be_bytes());
        data.extend_from_slice(&[0, 0, 1, 2, 3]);
        assert_eq!(data.len(), 23);

        let err = Tag::load(&mut Cursor::new(data), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Id3Error::Parse(_)));
        assert!(matches!(err.cause(), Id3Error::TruncatedFrame(_)));
    }

    #[test]
    fn loads_from_any_position() {
        let data = id3v2(3, &frame_bytes(b"TPE1", b"\x00Artist"));
        let mut cursor = Cursor::new(data);
        cursor.set_position(7);
        let tag = Tag::load(&mut cursor, &LoadOptions::default()).unwrap();
        assert_eq!(tag.artist.as_deref(), Some("Artist"));
    }

    #[test]
    fn frame_map_and_descriptions() {
        let mut region = frame_bytes(b"TIT2", b"\x00First");
        region.extend(frame_bytes(b"PRIV", b"data"));
        region.extend(frame_bytes(b"TIT2", b"\x00Second"));
        let tag = Tag::load(&mut Cursor::new(id3v2(3, &region)), &LoadOptions::default()).unwrap();

        // Mapped fields follow the last frame, like the map
        assert_eq!(tag.title.as_deref(), Some("Second"));
        let map = tag.frames_by_id().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["TIT2"].text(), Some("Second"));

        let priv_frame = map["PRIV"];
        assert_eq!(tag.describe_frame(priv_frame).unwrap(), Some("Private frame"));
    }

    #[test]
    fn id3v1_frames_cannot_be_described() {
        let tag = Tag::load(&mut Cursor::new(id3v1(b"x", 0, 0)), &LoadOptions::default()).unwrap();
        let frame = Frame::new("TIT2".into(), 0, b"\x00x".to_vec());
        assert!(matches!(tag.describe_frame(&frame), Err(Id3Error::NoFrames)));
    }

    #[test]
    fn summary_line_order() {
        let mut region = frame_bytes(b"TIT2", b"\x00Song");
        region.extend(frame_bytes(b"TPE1", b"\x00Artist"));
        region.extend(frame_bytes(b"TCON", b"\x00(17)"));
        region.extend(frame_bytes(b"TYER", b"\x002010"));
        let tag = Tag::load(&mut Cursor::new(id3v2(3, &region)), &LoadOptions::default()).unwrap();
        assert_eq!(tag.summary_line(), "2010,Artist,,,Song,,Rock,2.3.0");
    }
}

use crate::id3::frames::Frame;
use crate::id3::specs::{self, Encoding};
use crate::id3::tags::Tag;

/// Assigns a frame's value to one `Tag` field.
pub type FieldSetter = fn(&mut Tag, String);

/// Frames mapped onto `Tag` fields, sorted by identifier.
pub static COMMON_FRAMES: &[(&str, FieldSetter)] = &[
    ("COMM", set_comment),
    ("TALB", set_album),
    ("TCON", set_genre),
    ("TIT2", set_title),
    ("TPE1", set_artist),
    ("TRCK", set_track),
    ("TYER", set_year),
];

fn set_comment(tag: &mut Tag, value: String) {
    tag.comment = Some(value);
}

fn set_album(tag: &mut Tag, value: String) {
    tag.album = Some(value);
}

fn set_genre(tag: &mut Tag, value: String) {
    tag.genre = specs::resolve_genre(&value);
}

fn set_title(tag: &mut Tag, value: String) {
    tag.title = Some(value);
}

fn set_artist(tag: &mut Tag, value: String) {
    tag.artist = Some(value);
}

fn set_track(tag: &mut Tag, value: String) {
    tag.track = Some(value);
}

fn set_year(tag: &mut Tag, value: String) {
    tag.year = Some(value);
}

/// Setter registered for a frame identifier.
pub fn setter_for(id: &str) -> Option<FieldSetter> {
    COMMON_FRAMES
        .binary_search_by(|(key, _)| (*key).cmp(id))
        .ok()
        .map(|i| COMMON_FRAMES[i].1)
}

pub fn is_common(id: &str) -> bool {
    setter_for(id).is_some()
}

/// Extract the value a common frame contributes.
pub fn frame_value(frame: &Frame) -> Option<String> {
    if let Some(text) = frame.as_text() {
        return Some(text.text.clone());
    }
    match frame.id.as_str() {
        "COMM" => Some(comment_text(&frame.data)),
        _ => None,
    }
}

/// Text of a COMM payload: encoding(1) language(3) text.
///
/// When the text holds a terminated short description, only the part after
/// the terminator is kept.
pub fn comment_text(data: &[u8]) -> String {
    let Some((&encoding, rest)) = data.split_first() else {
        return String::new();
    };
    let encoding = Encoding::from_byte_lenient(encoding);
    let text = rest.get(3..).unwrap_or_default();

    let text = match specs::find_null_terminator(text, encoding) {
        Some(pos) => &text[pos + specs::null_terminator_size(encoding)..],
        None => text,
    };

    specs::decode_padded_text(text, encoding)
}

/// Run the setter for `frame`, if it has one.
pub fn apply(tag: &mut Tag, frame: &Frame) {
    let Some(setter) = setter_for(&frame.id) else {
        return;
    };
    if let Some(value) = frame_value(frame) {
        setter(tag, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::header::Id3Header;
    use crate::id3::tags::TagSource;
    use crate::id3::version::TagVersion;

    fn blank() -> Tag {
        Tag::new(TagSource::Header(Id3Header {
            version: TagVersion::new(2, 3, 0),
            flags: 0,
            size: 0,
        }))
    }

    #[test]
    fn table_is_sorted() {
        assert!(COMMON_FRAMES.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(COMMON_FRAMES.len(), 7);
    }

    #[test]
    fn lookup() {
        assert!(is_common("TIT2"));
        assert!(is_common("COMM"));
        assert!(!is_common("TPE2"));
        assert!(!is_common("APIC"));
    }

    #[test]
    fn maps_text_frames() {
        let mut tag = blank();
        apply(&mut tag, &Frame::new("TIT2".into(), 0, b"\x00Title".to_vec()));
        apply(&mut tag, &Frame::new("TPE1".into(), 0, b"\x00Artist".to_vec()));
        apply(&mut tag, &Frame::new("TALB".into(), 0, b"\x00Album".to_vec()));
        apply(&mut tag, &Frame::new("TRCK".into(), 0, b"\x003/12".to_vec()));
        apply(&mut tag, &Frame::new("TYER".into(), 0, b"\x002004".to_vec()));
        apply(&mut tag, &Frame::new("TPE2".into(), 0, b"\x00Ignored".to_vec()));

        assert_eq!(tag.title.as_deref(), Some("Title"));
        assert_eq!(tag.artist.as_deref(), Some("Artist"));
        assert_eq!(tag.album.as_deref(), Some("Album"));
        assert_eq!(tag.track.as_deref(), Some("3/12"));
        assert_eq!(tag.year.as_deref(), Some("2004"));
        assert_eq!(tag.comment, None);
    }

    #[test]
    fn maps_genre_through_table() {
        let mut tag = blank();
        apply(&mut tag, &Frame::new("TCON".into(), 0, b"\x00(4)Classics".to_vec()));
        assert_eq!(tag.genre.as_deref(), Some("DiscoClassics"));

        apply(&mut tag, &Frame::new("TCON".into(), 0, b"\x00Shoegaze".to_vec()));
        assert_eq!(tag.genre, None);
    }

    #[test]
    fn comment_payloads() {
        assert_eq!(comment_text(b"\x00engHello"), "Hello");
        assert_eq!(comment_text(b"\x00eng\x00Hello\x00"), "Hello");
        assert_eq!(comment_text(b"\x00engdesc\x00Body"), "Body");
        assert_eq!(comment_text(b"\x00en"), "");
        assert_eq!(comment_text(b""), "");

        let utf16 = [1, b'e', b'n', b'g', 0xFF, 0xFE, 0, 0, 0xFF, 0xFE, b'o', 0, b'k', 0];
        assert_eq!(comment_text(&utf16), "ok");
    }

    #[test]
    fn maps_comment_frame() {
        let mut tag = blank();
        apply(&mut tag, &Frame::new("COMM".into(), 0, b"\x00eng\x00Great song".to_vec()));
        assert_eq!(tag.comment.as_deref(), Some("Great song"));
    }
}

use crate::common::util::trim_padding;

/// Text encoding types used in ID3v2 frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Encoding {
    Latin1 = 0,
    Utf16 = 1,
    Utf16Be = 2,
    Utf8 = 3,
}

impl Encoding {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Encoding::Latin1),
            1 => Some(Encoding::Utf16),
            2 => Some(Encoding::Utf16Be),
            3 => Some(Encoding::Utf8),
            _ => None,
        }
    }

    /// Resolve an encoding byte, treating unknown values as ISO-8859-1.
    pub fn from_byte_lenient(b: u8) -> Self {
        Self::from_byte(b).unwrap_or_else(|| {
            log::warn!("unknown text encoding {}, decoding as ISO-8859-1", b);
            Encoding::Latin1
        })
    }
}

/// Decode text from bytes using the specified encoding.
pub fn decode_text(data: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Latin1 => {
            if data.is_ascii() {
                String::from_utf8_lossy(data).into_owned()
            } else {
                data.iter().map(|&b| b as char).collect()
            }
        }
        Encoding::Utf16 => {
            if data.len() < 2 {
                return String::new();
            }
            let (decoder, start) = if data[0] == 0xFF && data[1] == 0xFE {
                (encoding_rs::UTF_16LE, 2)
            } else if data[0] == 0xFE && data[1] == 0xFF {
                (encoding_rs::UTF_16BE, 2)
            } else {
                // No BOM, assume little endian
                (encoding_rs::UTF_16LE, 0)
            };
            let (result, _) = decoder.decode_without_bom_handling(&data[start..]);
            result.into_owned()
        }
        Encoding::Utf16Be => {
            let (result, _) = encoding_rs::UTF_16BE.decode_without_bom_handling(data);
            result.into_owned()
        }
        Encoding::Utf8 => String::from_utf8_lossy(data).into_owned(),
    }
}

/// Decode text and trim trailing NUL/space padding.
pub fn decode_padded_text(data: &[u8], encoding: Encoding) -> String {
    let text = decode_text(data, encoding);
    let trimmed = trim_padding(&text);
    if trimmed.len() == text.len() {
        text
    } else {
        trimmed.to_string()
    }
}

/// Find the null terminator for the given encoding.
/// Returns the position of the terminator (not including it).
pub fn find_null_terminator(data: &[u8], encoding: Encoding) -> Option<usize> {
    match encoding {
        Encoding::Latin1 | Encoding::Utf8 => memchr::memchr(0, data),
        Encoding::Utf16 | Encoding::Utf16Be => {
            let mut i = 0;
            while i + 1 < data.len() {
                if data[i] == 0 && data[i + 1] == 0 {
                    return Some(i);
                }
                i += 2;
            }
            None
        }
    }
}

/// Size of the null terminator for each encoding.
pub fn null_terminator_size(encoding: Encoding) -> usize {
    match encoding {
        Encoding::Latin1 | Encoding::Utf8 => 1,
        Encoding::Utf16 | Encoding::Utf16Be => 2,
    }
}

/// ID3v1 genre list (index -> genre name).
/// 0-79 are the original ID3v1 genres, 80-125 the Winamp extensions.
pub const GENRES: [&str; 126] = [
    "Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge",
    "Hip-Hop", "Jazz", "Metal", "New Age", "Oldies", "Other", "Pop", "R&B",
    "Rap", "Reggae", "Rock", "Techno", "Industrial", "Alternative", "Ska",
    "Death Metal", "Pranks", "Soundtrack", "Euro-Techno", "Ambient",
    "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance", "Classical",
    "Instrumental", "Acid", "House", "Game", "Sound Clip", "Gospel", "Noise",
    "AlternRock", "Bass", "Soul", "Punk", "Space", "Meditative",
    "Instrumental Pop", "Instrumental Rock", "Ethnic", "Gothic", "Darkwave",
    "Techno-Industrial", "Electronic", "Pop-Folk", "Eurodance", "Dream",
    "Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40", "Christian Rap",
    "Pop/Funk", "Jungle", "Native American", "Cabaret", "New Wave",
    "Psychadelic", "Rave", "Showtunes", "Trailer", "Lo-Fi", "Tribal",
    "Acid Punk", "Acid Jazz", "Polka", "Retro", "Musical", "Rock & Roll",
    "Hard Rock",
    // Winamp extensions
    "Folk", "Folk-Rock", "National Folk", "Swing", "Fast Fusion",
    "Bebob", "Latin", "Revival", "Celtic", "Bluegrass", "Avantgarde",
    "Gothic Rock", "Progressive Rock", "Psychedelic Rock", "Symphonic Rock",
    "Slow Rock", "Big Band", "Chorus", "Easy Listening", "Acoustic", "Humour",
    "Speech", "Chanson", "Opera", "Chamber Music", "Sonata", "Symphony",
    "Booty Bass", "Primus", "Porn Groove", "Satire", "Slow Jam", "Club",
    "Tango", "Samba", "Folklore", "Ballad", "Power Ballad", "Rhythmic Soul",
    "Freestyle", "Duet", "Punk Rock", "Drum Solo", "Acapella", "Euro-House",
    "Dance Hall",
];

/// Look up a genre by its numeric code.
pub fn genre_by_index(index: u8) -> Option<&'static str> {
    GENRES.get(index as usize).copied()
}

fn genre_by_digits(digits: &str) -> Option<&'static str> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse::<usize>().ok()?;
    GENRES.get(index).copied()
}

/// Resolve a TCON (content type) value to a genre name.
///
/// Accepts a bare code (`"17"` -> `"Rock"`) and the legacy `"(N)suffix"`
/// form, where the suffix is appended to the table name as is
/// (`"(4)Classics"` -> `"DiscoClassics"`). Free text resolves to `None`.
pub fn resolve_genre(text: &str) -> Option<String> {
    if let Some(rest) = text.strip_prefix('(') {
        let close = rest.find(')')?;
        let name = genre_by_digits(&rest[..close])?;
        let suffix = &rest[close + 1..];
        let mut genre = String::with_capacity(name.len() + suffix.len());
        genre.push_str(name);
        genre.push_str(suffix);
        return Some(genre);
    }

    genre_by_digits(text).map(str::to_string)
}

/// ID3v2.3/2.4 frame identifiers and their descriptions.
pub const FRAME_DESCRIPTIONS: &[(&str, &str)] = &[
    ("AENC", "Audio encryption"),
    ("APIC", "Attached picture"),
    ("COMM", "Comments"),
    ("COMR", "Commercial frame"),
    ("ENCR", "Encryption method registration"),
    ("EQUA", "Equalization"),
    ("ETCO", "Event timing codes"),
    ("GEOB", "General encapsulated object"),
    ("GRID", "Group identification registration"),
    ("IPLS", "Involved people list"),
    ("LINK", "Linked information"),
    ("MCDI", "Music CD identifier"),
    ("MLLT", "MPEG location lookup table"),
    ("OWNE", "Ownership frame"),
    ("PCNT", "Play counter"),
    ("POPM", "Popularimeter"),
    ("POSS", "Position synchronisation frame"),
    ("PRIV", "Private frame"),
    ("RBUF", "Recommended buffer size"),
    ("RVAD", "Relative volume adjustment"),
    ("RVRB", "Reverb"),
    ("SYLT", "Synchronized lyric/text"),
    ("SYTC", "Synchronized tempo codes"),
    ("TALB", "Album/Movie/Show title"),
    ("TBPM", "BPM (beats per minute)"),
    ("TCOM", "Composer"),
    ("TCON", "Content type"),
    ("TCOP", "Copyright message"),
    ("TDAT", "Date"),
    ("TDLY", "Playlist delay"),
    ("TENC", "Encoded by"),
    ("TEXT", "Lyricist/Text writer"),
    ("TFLT", "File type"),
    ("TIME", "Time"),
    ("TIT1", "Content group description"),
    ("TIT2", "Title/songname/content description"),
    ("TIT3", "Subtitle/Description refinement"),
    ("TKEY", "Initial key"),
    ("TLAN", "Language(s)"),
    ("TLEN", "Length"),
    ("TMED", "Media type"),
    ("TOAL", "Original album/movie/show title"),
    ("TOFN", "Original filename"),
    ("TOLY", "Original lyricist(s)/text writer(s)"),
    ("TOPE", "Original artist(s)/performer(s)"),
    ("TORY", "Original release year"),
    ("TOWN", "File owner/licensee"),
    ("TPE1", "Lead performer(s)/Soloist(s)"),
    ("TPE2", "Band/orchestra/accompaniment"),
    ("TPE3", "Conductor/performer refinement"),
    ("TPE4", "Interpreted, remixed, or otherwise modified by"),
    ("TPOS", "Part of a set"),
    ("TPUB", "Publisher"),
    ("TRCK", "Track number/Position in set"),
    ("TRDA", "Recording dates"),
    ("TRSN", "Internet radio station name"),
    ("TRSO", "Internet radio station owner"),
    ("TSIZ", "Size"),
    ("TSRC", "ISRC (international standard recording code)"),
    ("TSSE", "Software/Hardware and settings used for encoding"),
    ("TXXX", "User defined text information frame"),
    ("TYER", "Year"),
    ("UFID", "Unique file identifier"),
    ("USER", "Terms of use"),
    ("USLT", "Unsychronized lyric/text transcription"),
    ("WCOM", "Commercial information"),
    ("WCOP", "Copyright/Legal information"),
    ("WOAF", "Official audio file webpage"),
    ("WOAR", "Official artist/performer webpage"),
    ("WOAS", "Official audio source webpage"),
    ("WORS", "Official internet radio station homepage"),
    ("WPAY", "Payment"),
    ("WPUB", "Publishers official webpage"),
    ("WXXX", "User defined URL link frame"),
];

/// Human-readable description of an ID3v2.3/2.4 frame identifier.
pub fn frame_description(id: &str) -> Option<&'static str> {
    FRAME_DESCRIPTIONS
        .binary_search_by(|(key, _)| (*key).cmp(id))
        .ok()
        .map(|i| FRAME_DESCRIPTIONS[i].1)
}

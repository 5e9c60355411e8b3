use std::fmt;
use std::ops::Index;

/// Version of a loaded tag as `major.minor.revision`.
///
/// ID3v2 tags report `2.<major>.<revision>` (e.g. `2.3.0`), ID3v1 tags
/// report `1.0.0`, or `1.1.0` when a track number byte is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagVersion {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl TagVersion {
    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        TagVersion { major, minor, revision }
    }

    /// Component by position: 0 = major, 1 = minor, 2 = revision.
    pub fn get(&self, index: usize) -> Option<u8> {
        match index {
            0 => Some(self.major),
            1 => Some(self.minor),
            2 => Some(self.revision),
            _ => None,
        }
    }

    pub fn is_id3v1(&self) -> bool {
        self.major == 1
    }

    pub fn is_id3v2(&self) -> bool {
        self.major == 2
    }
}

impl Index<usize> for TagVersion {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        match index {
            0 => &self.major,
            1 => &self.minor,
            2 => &self.revision,
            _ => panic!("tag version index out of range: {}", index),
        }
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

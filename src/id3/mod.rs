pub mod common_frames;
pub mod frames;
pub mod header;
pub mod id3v1;
pub mod specs;
pub mod tags;
pub mod version;

use std::io::Cursor;
use std::path::Path;
use rayon::prelude::*;
use crate::common::error::Result;

pub use crate::id3::frames::{Frame, FrameContent, TextFrame};
pub use crate::id3::header::{Id3Header, SynchSafe};
pub use crate::id3::id3v1::Id3v1Footer;
pub use crate::id3::tags::{Tag, TagSource};
pub use crate::id3::version::TagVersion;

/// Options controlling how a tag is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fall back to an ID3v1 trailer when there is no ID3v2 header.
    pub try_id3v1: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { try_id3v1: true }
    }
}

impl LoadOptions {
    pub fn try_id3v1(mut self, enabled: bool) -> Self {
        self.try_id3v1 = enabled;
        self
    }
}

/// Load the tag of the file at `path`.
pub fn load_id3<P: AsRef<Path>>(path: P) -> Result<Tag> {
    Tag::open(path)
}

/// Load a tag from a byte slice (used when data is already in memory).
pub fn load_id3_from_data(data: &[u8]) -> Result<Tag> {
    Tag::load(&mut Cursor::new(data), &LoadOptions::default())
}

/// Load many files in parallel. Results are returned in input order, one
/// per path; a failure for one file does not affect the others.
pub fn load_many<P>(paths: &[P], options: &LoadOptions) -> Vec<Result<Tag>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| Tag::open_with(path, options))
        .collect()
}

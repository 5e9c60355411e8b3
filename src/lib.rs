//! Reader for ID3v2.3/2.4 tags and the ID3v1/ID3v1.1 trailer.
//!
//! ```no_run
//! let tag = id3_reader::Tag::open("song.mp3")?;
//! println!("{}", tag.summary_line());
//! # Ok::<(), id3_reader::Id3Error>(())
//! ```

pub mod common;
pub mod id3;

pub use crate::common::error::{Id3Error, Result};
pub use crate::id3::{load_id3, load_id3_from_data, load_many, LoadOptions, Tag, TagVersion};

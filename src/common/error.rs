use thiserror::Error;

#[derive(Error, Debug)]
pub enum Id3Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ID3 unsupported version: {0}")]
    UnsupportedVersion(String),

    #[error("source truncated: needed {needed} bytes, found {available}")]
    TruncatedSource { needed: u64, available: u64 },

    #[error("missing ID3v1 footer")]
    MissingFooter,

    #[error("no ID3 tag found")]
    NoTagFound,

    #[error("ID3v2 frame truncated: {0}")]
    TruncatedFrame(String),

    #[error("ID3v1 tags have no frames")]
    NoFrames,

    #[error("couldn't parse ID3 tag: {0}")]
    Parse(#[source] Box<Id3Error>),
}

impl Id3Error {
    /// Wrap a failure raised while decoding a tag that was found.
    pub(crate) fn parse(cause: Id3Error) -> Self {
        match cause {
            Id3Error::Parse(_) => cause,
            other => Id3Error::Parse(Box::new(other)),
        }
    }

    /// The underlying failure, with any `Parse` wrapper removed.
    pub fn cause(&self) -> &Id3Error {
        match self {
            Id3Error::Parse(inner) => inner.cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Id3Error>;

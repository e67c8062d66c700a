use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty data path")]
    Empty,

    #[error("empty segment in data path `{path}`")]
    EmptySegment { path: String },

    #[error("invalid character {found:?} in data path `{path}`")]
    UnexpectedChar { path: String, found: char },

    #[error("unclosed `[` in data path `{path}`")]
    UnclosedIndex { path: String },

    #[error("invalid array index `{index}` in data path `{path}`")]
    InvalidIndex { path: String, index: String },

    #[error("`**` may only appear as the last segment of `{path}`")]
    MisplacedWildcard { path: String },

    #[error("cannot assign through wildcard path `{path}`")]
    WildcardAssignment { path: String },

    #[error("`{path}` does not address a container at `{at}`")]
    NotAContainer { path: String, at: String },

    #[error("index {index} in `{path}` is past the end of an array of length {len}")]
    IndexOutOfRange { path: String, index: usize, len: usize },
}

pub type PathResult<T> = Result<T, PathError>;

//! Parsed data paths.

use std::fmt;
use std::str::FromStr;

use crate::{PathError, PathResult};

/// One step of a [`DataPath`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// A parsed path such as `list[2].name` or `config.**`.
///
/// `deep` marks a trailing `**`.  The bare `**` path has no segments and is
/// deep; it watches everything.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DataPath {
    segments: Vec<Segment>,
    deep:     bool,
}

impl DataPath {
    /// The `**` path.
    pub fn everything() -> Self {
        Self { segments: Vec::new(), deep: true }
    }

    /// Build a plain path from already-validated segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments, deep: false }
    }

    pub fn parse(input: &str) -> PathResult<Self> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        let mut segments = Vec::new();
        let mut deep = false;
        for part in input.split('.') {
            if deep {
                return Err(PathError::MisplacedWildcard { path: input.to_owned() });
            }
            if part == "**" {
                deep = true;
                continue;
            }
            parse_component(part, input, &mut segments)?;
        }
        Ok(Self { segments, deep })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_deep(&self) -> bool {
        self.deep
    }

    /// `true` for the bare `**` path.
    pub fn is_everything(&self) -> bool {
        self.deep && self.segments.is_empty()
    }

    /// Number of addressed segments (the trailing `**` is not counted).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The same path without a trailing `**`.
    pub fn without_wildcard(&self) -> DataPath {
        Self::from_segments(self.segments.clone())
    }
}

/// Parse one dot-separated component: a field name followed by any number of
/// `[n]` index suffixes.
fn parse_component(part: &str, path: &str, out: &mut Vec<Segment>) -> PathResult<()> {
    let (name, mut rest) = match part.find('[') {
        Some(i) => (&part[..i], &part[i..]),
        None => (part, ""),
    };
    if name.is_empty() {
        return Err(PathError::EmptySegment { path: path.to_owned() });
    }
    if let Some(found) = name.chars().find(|c| matches!(c, ']' | '*' | ',') || c.is_whitespace()) {
        return Err(PathError::UnexpectedChar { path: path.to_owned(), found });
    }
    out.push(Segment::Field(name.to_owned()));

    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix('[') else {
            let found = rest.chars().next().unwrap_or(']');
            return Err(PathError::UnexpectedChar { path: path.to_owned(), found });
        };
        let Some(close) = body.find(']') else {
            return Err(PathError::UnclosedIndex { path: path.to_owned() });
        };
        let digits = &body[..close];
        let invalid = || PathError::InvalidIndex { path: path.to_owned(), index: digits.to_owned() };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let index = digits.parse::<usize>().map_err(|_| invalid())?;
        out.push(Segment::Index(index));
        rest = &body[close + 1..];
    }
    Ok(())
}

impl FromStr for DataPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataPath::parse(s)
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        match (self.deep, self.segments.is_empty()) {
            (true, true) => f.write_str("**"),
            (true, false) => f.write_str(".**"),
            _ => Ok(()),
        }
    }
}

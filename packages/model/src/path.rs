//! Slash-delimited paths into models and trees.

use std::fmt;

/// A path made of slash-delimited segments.
///
/// Segments are plain file-name-like strings (`pack.mcmeta` and
/// `f1.mcfunction` are single segments), so parsing never fails: empty
/// segments are dropped, which normalizes `//` and trailing slashes, and
/// the empty string is the root path.
///
/// # Examples
///
/// ```rust
/// use packforge_model::Path;
///
/// let p = Path::parse("data/magic/functions");
/// assert_eq!(p.len(), 3);
/// assert_eq!(Path::parse("foo/bar/"), Path::parse("foo//bar"));
/// ```
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse a path string.
    pub fn parse(s: &str) -> Self {
        Path {
            segments: s
                .split('/')
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string())
                .collect(),
        }
    }

    /// The root path with no segments.
    pub fn root() -> Self {
        Path::default()
    }

    /// Check if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Iterate over segments.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.as_str())
    }

    /// Borrow the segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, other: impl Into<Path>) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.into().segments);
        Path { segments }
    }

    /// Append a single segment in place.
    pub fn push(&mut self, segment: &str) {
        if !segment.is_empty() {
            self.segments.push(segment.to_string());
        }
    }

    /// Everything but the last segment. The root path is its own parent.
    #[must_use]
    pub fn parent(&self) -> Path {
        match self.segments.len() {
            0 => Path::root(),
            n => Path {
                segments: self.segments[..n - 1].to_vec(),
            },
        }
    }

    /// The last segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }

    /// Split into the leading segments and the last one.
    pub fn split_last(&self) -> Option<(Path, &str)> {
        let (last, rest) = self.segments.split_last()?;
        Some((
            Path {
                segments: rest.to_vec(),
            },
            last.as_str(),
        ))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::parse(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Path::parse(&s)
    }
}

impl From<&Path> for Path {
    fn from(p: &Path) -> Self {
        p.clone()
    }
}

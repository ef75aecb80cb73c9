//! Structured view of prerelease identifiers
//!
//! Prerelease fields produced by this tool have the shape `<word><digits>[<rest>]`,
//! e.g. `rc01`, `dev007.a1b2c3d4`. The word decides the kind (and thereby the
//! precedence), the digits carry the chain number and keep their zero padding.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

fn prerelease_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<word>[A-Za-z]*)(?P<number>\d*)(?P<rest>.*)$").ok())
        .as_ref()
}

/// Prerelease kind, ordered by precedence (`Other < Dev < Rc`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrereleaseKind {
    /// Release candidate (`rc`)
    Rc,
    /// Development build (`dev`)
    Dev,
    /// Any other word, e.g. `alpha`
    Other(String),
}

impl PrereleaseKind {
    fn rank(&self) -> u8 {
        match self {
            PrereleaseKind::Rc => 2,
            PrereleaseKind::Dev => 1,
            PrereleaseKind::Other(_) => 0,
        }
    }
}

impl fmt::Display for PrereleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrereleaseKind::Rc => write!(f, "rc"),
            PrereleaseKind::Dev => write!(f, "dev"),
            PrereleaseKind::Other(word) => write!(f, "{}", word),
        }
    }
}

/// A parsed, non-empty prerelease field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerelease {
    /// Leading alphabetic word
    pub word: String,
    /// Numeric chain suffix following the word, if any
    pub number: Option<u64>,
    /// Digit count of the numeric suffix as written
    pub width: usize,
    /// Everything after the numeric suffix (e.g. `.a1b2c3d4`)
    pub rest: String,
}

impl Prerelease {
    /// Parse a prerelease field; `None` for an empty field
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        let captures = prerelease_regex()?.captures(text)?;
        let word = captures.name("word").map(|m| m.as_str()).unwrap_or_default();
        let digits = captures
            .name("number")
            .map(|m| m.as_str())
            .unwrap_or_default();
        let rest = captures.name("rest").map(|m| m.as_str()).unwrap_or_default();

        Some(Prerelease {
            word: word.to_string(),
            number: digits.parse::<u64>().ok(),
            width: digits.len(),
            rest: rest.to_string(),
        })
    }

    /// Kind derived from the word (case-insensitive)
    pub fn kind(&self) -> PrereleaseKind {
        match self.word.to_lowercase().as_str() {
            "rc" => PrereleaseKind::Rc,
            "dev" => PrereleaseKind::Dev,
            _ => PrereleaseKind::Other(self.word.clone()),
        }
    }

    /// The next identifier in the chain: number + 1, zero-padded to at least
    /// `pad_width` (or the current width), with `rest` dropped.
    ///
    /// Returns `None` when there is no numeric suffix to increment.
    pub fn increment(&self, pad_width: Option<usize>) -> Option<Self> {
        let number = self.number?.checked_add(1)?;
        let width = pad_width.unwrap_or(0).max(self.width);

        Some(Prerelease {
            word: self.word.clone(),
            number: Some(number),
            width,
            rest: String::new(),
        })
    }

    /// Precedence comparison: kind first, then word, then chain number
    pub fn precedence(&self, other: &Self) -> Ordering {
        let (own, theirs) = (self.kind(), other.kind());
        own.rank()
            .cmp(&theirs.rank())
            .then_with(|| match (&own, &theirs) {
                (PrereleaseKind::Other(a), PrereleaseKind::Other(b)) => a.cmp(b),
                _ => Ordering::Equal,
            })
            .then_with(|| self.number.cmp(&other.number))
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)?;
        if let Some(number) = self.number {
            write!(f, "{:0width$}", number, width = self.width)?;
        }
        write!(f, "{}", self.rest)
    }
}

//! Engine revision strings such as `5.0.0f4`.

use std::fmt;

use winnow::ascii::digit1;
use winnow::combinator::{opt, seq};
use winnow::prelude::*;
use winnow::error::{ContextError, ErrMode};
use winnow::token::one_of;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Components of a well formed revision string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RevisionParts {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// Release type letter and build number, e.g. `('f', 4)`
    pub build: Option<(char, u32)>,
}

type ParseResult<T> = Result<T, ErrMode<ContextError>>;

fn number(s: &mut &str) -> ParseResult<u32> {
    digit1.parse_to().parse_next(s)
}

fn parse_parts(s: &mut &str) -> ParseResult<RevisionParts> {
    seq!(RevisionParts {
        major: number,
        _: '.',
        minor: number,
        _: '.',
        patch: number,
        build: opt((one_of(|c: char| c.is_ascii_alphabetic()), number)),
    })
    .parse_next(s)
}

/// Revision of the engine that wrote an asset file
///
/// The raw text is kept so the revision can be written back unchanged, even when it does not
/// follow the usual `major.minor.patch` layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct UnityRevision {
    raw: String,
}

impl UnityRevision {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The revision exactly as stored in the file
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed components, if the revision is well formed
    pub fn parts(&self) -> Option<RevisionParts> {
        parse_parts.parse(self.raw.as_str()).ok()
    }

    pub fn major(&self) -> Option<u32> {
        self.parts().map(|p| p.major)
    }

    pub fn minor(&self) -> Option<u32> {
        self.parts().map(|p| p.minor)
    }

    pub fn patch(&self) -> Option<u32> {
        self.parts().map(|p| p.patch)
    }

    pub fn build_type(&self) -> Option<char> {
        self.parts().and_then(|p| p.build).map(|(t, _)| t)
    }

    pub fn build(&self) -> Option<u32> {
        self.parts().and_then(|p| p.build).map(|(_, b)| b)
    }
}

impl From<String> for UnityRevision {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for UnityRevision {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<UnityRevision> for String {
    fn from(value: UnityRevision) -> Self {
        value.raw
    }
}

impl fmt::Display for UnityRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

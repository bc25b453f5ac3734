use thiserror::Error;

use crate::ast::{AnchorKind, GroupBehavior};

/// A construct the enumerator cannot turn into strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    #[error("Unsupported regular expression feature: {0}")]
    Feature(&'static str),
    #[error("No {0} anchor support")]
    Anchor(AnchorKind),
    #[error("No {0} group support")]
    Group(GroupBehavior),
    /// None of the generic candidates satisfied a character class.
    #[error("No value in {alphabet:?} could satisfy the character class {class}")]
    Unsatisfiable { alphabet: String, class: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    /// Byte offset into the pattern.
    pub offset: usize,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unmatched ')'")]
    UnmatchedClose,
    #[error("missing ')'")]
    UnclosedGroup,
    #[error("nothing to repeat")]
    NothingToRepeat,
    #[error("unterminated character class")]
    UnclosedClass,
    #[error("character class range out of order")]
    RangeOutOfOrder,
    #[error("numbers out of order in {{}} quantifier")]
    QuantifierOutOfOrder,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("invalid group name")]
    InvalidGroupName,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Unsupported(#[from] Unsupported),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// The class text could not be compiled into a membership test.
    #[error("cannot test membership for {class}: {source}")]
    Oracle {
        class: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

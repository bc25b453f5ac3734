pub mod alphabet;
pub mod ast;
pub mod combinators;
pub mod enumerator;
pub mod error;
pub mod matcher;
pub mod parser;

pub use alphabet::Alphabets;
pub use ast::{AnchorKind, GroupBehavior, Node};
pub use enumerator::{Enumerator, Mode, Strings};
pub use error::{Error, ParseError, Result, Unsupported};

/// Something that can be turned into a syntax tree: pattern text or a tree.
pub trait IntoTree {
    fn into_tree(self) -> Result<Node, ParseError>;
}

impl IntoTree for Node {
    fn into_tree(self) -> Result<Node, ParseError> {
        Ok(self)
    }
}

impl IntoTree for &str {
    fn into_tree(self) -> Result<Node, ParseError> {
        parser::parse(self)
    }
}

impl IntoTree for String {
    fn into_tree(self) -> Result<Node, ParseError> {
        parser::parse(&self)
    }
}

impl IntoTree for &String {
    fn into_tree(self) -> Result<Node, ParseError> {
        parser::parse(self)
    }
}

/// A syntax tree together with the enumerator that lists its strings.
#[derive(Debug)]
pub struct Language {
    tree: Node,
    enumerator: Enumerator,
}

impl Language {
    pub fn new(input: impl IntoTree, enumerator: Enumerator) -> Result<Self> {
        Ok(Self {
            tree: input.into_tree()?,
            enumerator,
        })
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn enumerator(&self) -> &Enumerator {
        &self.enumerator
    }

    /// A fresh lazy sequence of the strings in this language.
    pub fn strings(&self) -> Strings<'_> {
        self.enumerator.enumerate(&self.tree)
    }
}

/// Every string matching `input`, eventually.
///
/// `None` uses [`Alphabets::exhaustive`].
pub fn enumerate(input: impl IntoTree, alphabets: Option<Alphabets>) -> Result<Language> {
    let alphabets = alphabets.unwrap_or_else(Alphabets::exhaustive);
    Language::new(input, Enumerator::new(Mode::Exhaustive, alphabets))
}

/// A short, bounded list of representative strings matching `input`.
///
/// `None` uses [`Alphabets::examples`].
pub fn enumerate_examples(input: impl IntoTree, alphabets: Option<Alphabets>) -> Result<Language> {
    let alphabets = alphabets.unwrap_or_else(Alphabets::examples);
    Language::new(input, Enumerator::new(Mode::Examples, alphabets))
}

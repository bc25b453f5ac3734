use std::fmt;

/// A node of a parsed regular expression.
///
/// The set of kinds is closed: the enumerator matches on every variant, so a
/// new kind has to be handled (or explicitly rejected) before it compiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Concatenation of the children, in order.
    Alternative(Vec<Node>),
    /// Alternation between branches (`a|b|c`).
    Disjunction(Vec<Node>),
    Anchor(AnchorKind),
    Group {
        behavior: GroupBehavior,
        /// The group body, read as a concatenation.
        body: Vec<Node>,
    },
    Quantifier {
        min: u32,
        /// `None` means unbounded.
        max: Option<u32>,
        greedy: bool,
        body: Box<Node>,
    },
    Value(char),
    /// Inclusive range inside a bracket expression, `min <= max`.
    ClassRange { min: char, max: char },
    /// Shorthand class such as `\d` or `\W`, identified by its letter.
    ClassEscape(char),
    Class {
        body: Vec<Node>,
        negative: bool,
        /// The exact source text, brackets included.
        raw: String,
    },
    Dot,
    /// Back-reference `\1`..`\9`.
    Reference(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    Start,
    End,
    Boundary,
    NotBoundary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBehavior {
    Normal,
    /// Non-capturing, `(?:...)`.
    Ignore,
    Lookahead,
    NegativeLookahead,
    Lookbehind,
    NegativeLookbehind,
}

impl Node {
    /// Stable name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Alternative(_) => "alternative",
            Node::Disjunction(_) => "disjunction",
            Node::Anchor(_) => "anchor",
            Node::Group { .. } => "group",
            Node::Quantifier { .. } => "quantifier",
            Node::Value(_) => "value",
            Node::ClassRange { .. } => "characterClassRange",
            Node::ClassEscape(_) => "characterClassEscape",
            Node::Class { .. } => "characterClass",
            Node::Dot => "dot",
            Node::Reference(_) => "reference",
        }
    }

    /// Literal source text of the node.
    ///
    /// Bracket expressions return the text they were parsed from; everything
    /// else is rendered back into pattern syntax.
    pub fn raw(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Alternative(items) => items.iter().try_for_each(|n| write!(f, "{n}")),
            Node::Disjunction(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{branch}")?;
                }
                Ok(())
            }
            Node::Anchor(kind) => f.write_str(match kind {
                AnchorKind::Start => "^",
                AnchorKind::End => "$",
                AnchorKind::Boundary => r"\b",
                AnchorKind::NotBoundary => r"\B",
            }),
            Node::Group { behavior, body } => {
                f.write_str(match behavior {
                    GroupBehavior::Normal => "(",
                    GroupBehavior::Ignore => "(?:",
                    GroupBehavior::Lookahead => "(?=",
                    GroupBehavior::NegativeLookahead => "(?!",
                    GroupBehavior::Lookbehind => "(?<=",
                    GroupBehavior::NegativeLookbehind => "(?<!",
                })?;
                body.iter().try_for_each(|n| write!(f, "{n}"))?;
                f.write_str(")")
            }
            Node::Quantifier {
                min,
                max,
                greedy,
                body,
            } => {
                write!(f, "{body}")?;
                match (min, max) {
                    (0, None) => f.write_str("*")?,
                    (1, None) => f.write_str("+")?,
                    (0, Some(1)) => f.write_str("?")?,
                    (min, None) => write!(f, "{{{min},}}")?,
                    (min, Some(max)) if min == max => write!(f, "{{{min}}}")?,
                    (min, Some(max)) => write!(f, "{{{min},{max}}}")?,
                }
                if !greedy {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Node::Value(c) => write_literal(f, *c),
            Node::ClassRange { min, max } => {
                write_literal(f, *min)?;
                f.write_str("-")?;
                write_literal(f, *max)
            }
            Node::ClassEscape(tag) => write!(f, "\\{tag}"),
            Node::Class { raw, .. } => f.write_str(raw),
            Node::Dot => f.write_str("."),
            Node::Reference(id) => write!(f, "\\{id}"),
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnchorKind::Start => "start",
            AnchorKind::End => "end",
            AnchorKind::Boundary => "boundary",
            AnchorKind::NotBoundary => "not-boundary",
        })
    }
}

impl fmt::Display for GroupBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupBehavior::Normal => "normal",
            GroupBehavior::Ignore => "ignore",
            GroupBehavior::Lookahead => "lookahead",
            GroupBehavior::NegativeLookahead => "negative lookahead",
            GroupBehavior::Lookbehind => "lookbehind",
            GroupBehavior::NegativeLookbehind => "negative lookbehind",
        })
    }
}

// Escapes metacharacters and anything non-printable so the text parses back.
fn write_literal(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}'
        | '-' => write!(f, "\\{c}"),
        '\t' => f.write_str(r"\t"),
        '\n' => f.write_str(r"\n"),
        '\r' => f.write_str(r"\r"),
        c if c.is_control() || (c as u32) > 0x7e => write!(f, "\\u{{{:x}}}", c as u32),
        c => write!(f, "{c}"),
    }
}

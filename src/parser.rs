use crate::ast::{AnchorKind, GroupBehavior, Node};
use crate::error::{ParseError, ParseErrorKind};

/// Parse a pattern into a syntax tree.
pub fn parse(pattern: &str) -> Result<Node, ParseError> {
    Parser::new(pattern).parse()
}

/// Recursive-descent parser for JavaScript-flavoured regular expressions.
///
/// The `Parser` struct holds the pattern and the current byte position.
pub struct Parser<'a> {
    pub pattern: &'a str,
    pub pos: usize,
}

type PResult<T> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    /// Create a new parser for the given pattern.
    pub fn new(pattern: &'a str) -> Self {
        Self { pattern, pos: 0 }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            offset: self.pos,
            kind,
        }
    }

    /// Peek at the next character in the pattern without advancing.
    fn peek(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.pattern[self.pos..]
    }

    /// Advance the parser by one character and return it.
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Expect a specific character and advance if it matches.
    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Entry point: parse the whole pattern.
    ///
    /// Example:
    /// - Pattern: `a|b` → Disjunction([Value('a'), Value('b')])
    pub fn parse(&mut self) -> PResult<Node> {
        let node = self.parse_disjunction()?;
        match self.peek() {
            None => Ok(node),
            Some(_) => Err(self.error(ParseErrorKind::UnmatchedClose)),
        }
    }

    /// Parse alternation (`|`).
    ///
    /// Example:
    /// - Pattern: `a|bc` → Disjunction([Value('a'), Alternative([Value('b'), Value('c')])])
    fn parse_disjunction(&mut self) -> PResult<Node> {
        let mut branches = vec![self.parse_alternative()?];
        while self.expect('|') {
            branches.push(self.parse_alternative()?);
        }
        if branches.len() == 1 {
            Ok(branches.remove(0))
        } else {
            Ok(Node::Disjunction(branches))
        }
    }

    /// Parse a concatenation of terms.
    ///
    /// A single term is returned unwrapped; zero or several terms become an
    /// `Alternative`.
    fn parse_alternative(&mut self) -> PResult<Node> {
        let mut terms = Vec::new();
        while let Some(ch) = self.peek() {
            if ch == ')' || ch == '|' {
                break;
            }
            terms.push(self.parse_term()?);
        }
        if terms.len() == 1 {
            Ok(terms.remove(0))
        } else {
            Ok(Node::Alternative(terms))
        }
    }

    /// Parse an atom and the quantifier following it, if any.
    ///
    /// Example:
    /// - Pattern: `a{2,}?` → Quantifier { min: 2, max: None, greedy: false, body: Value('a') }
    fn parse_term(&mut self) -> PResult<Node> {
        let atom = self.parse_atom()?;
        let start = self.pos;
        let Some((min, max)) = self.parse_quantifier()? else {
            return Ok(atom);
        };
        if let Node::Anchor(_) = atom {
            self.pos = start;
            return Err(self.error(ParseErrorKind::NothingToRepeat));
        }
        if max.is_some_and(|max| max < min) {
            self.pos = start;
            return Err(self.error(ParseErrorKind::QuantifierOutOfOrder));
        }
        let greedy = !self.expect('?');
        Ok(Node::Quantifier {
            min,
            max,
            greedy,
            body: Box::new(atom),
        })
    }

    fn parse_quantifier(&mut self) -> PResult<Option<(u32, Option<u32>)>> {
        let bounds = match self.peek() {
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('?') => (0, Some(1)),
            Some('{') => return Ok(self.parse_braces()),
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(bounds))
    }

    /// `{n}`, `{n,}` or `{n,m}`. Anything else leaves the position untouched so
    /// the `{` is read as a literal.
    fn parse_braces(&mut self) -> Option<(u32, Option<u32>)> {
        let start = self.pos;
        self.advance();
        let bounds = (|| {
            let min = self.parse_number()?;
            let max = if self.expect(',') {
                if self.peek() == Some('}') {
                    None
                } else {
                    Some(self.parse_number()?)
                }
            } else {
                Some(min)
            };
            self.expect('}').then_some((min, max))
        })();
        if bounds.is_none() {
            self.pos = start;
        }
        bounds
    }

    fn parse_number(&mut self) -> Option<u32> {
        let digits = self
            .rest()
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest().len());
        if digits == 0 {
            return None;
        }
        let value = self.rest()[..digits].parse().ok()?;
        self.pos += digits;
        Some(value)
    }

    /// Parse a single atom: group, class, escape, dot, anchor or literal.
    ///
    /// Examples:
    /// - Pattern: `(?:ab)` → Group { behavior: Ignore, body: [Value('a'), Value('b')] }
    /// - Pattern: `[a-c]`  → Class { body: [ClassRange { min: 'a', max: 'c' }], .. }
    /// - Pattern: `\d`     → ClassEscape('d')
    /// - Pattern: `\1`     → Reference(1)
    /// - Pattern: `^`      → Anchor(Start)
    fn parse_atom(&mut self) -> PResult<Node> {
        match self.peek() {
            Some('(') => self.parse_group(),
            Some('[') => self.parse_class(),
            Some('\\') => self.parse_atom_escape(),
            Some('.') => {
                self.advance();
                Ok(Node::Dot)
            }
            Some('^') => {
                self.advance();
                Ok(Node::Anchor(AnchorKind::Start))
            }
            Some('$') => {
                self.advance();
                Ok(Node::Anchor(AnchorKind::End))
            }
            Some('*' | '+' | '?') => Err(self.error(ParseErrorKind::NothingToRepeat)),
            Some('{') if self.is_quantifier_brace() => {
                Err(self.error(ParseErrorKind::NothingToRepeat))
            }
            Some(c) => {
                self.advance();
                Ok(Node::Value(c))
            }
            None => Ok(Node::Alternative(vec![])),
        }
    }

    fn is_quantifier_brace(&mut self) -> bool {
        let start = self.pos;
        let found = self.parse_braces().is_some();
        self.pos = start;
        found
    }

    fn parse_group(&mut self) -> PResult<Node> {
        let open = self.pos;
        self.advance(); // consume '('
        let behavior = if self.eat("?:") {
            GroupBehavior::Ignore
        } else if self.eat("?=") {
            GroupBehavior::Lookahead
        } else if self.eat("?!") {
            GroupBehavior::NegativeLookahead
        } else if self.eat("?<=") {
            GroupBehavior::Lookbehind
        } else if self.eat("?<!") {
            GroupBehavior::NegativeLookbehind
        } else if self.eat("?<") {
            self.parse_group_name()?;
            GroupBehavior::Normal
        } else {
            GroupBehavior::Normal
        };
        let body = match self.parse_disjunction()? {
            Node::Alternative(items) => items,
            node => vec![node],
        };
        if !self.expect(')') {
            return Err(ParseError {
                offset: open,
                kind: ParseErrorKind::UnclosedGroup,
            });
        }
        Ok(Node::Group { behavior, body })
    }

    fn parse_group_name(&mut self) -> PResult<()> {
        let name_len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(self.rest().len());
        let starts_ok = self
            .rest()
            .chars()
            .next()
            .is_some_and(|c| !c.is_ascii_digit());
        if name_len == 0 || !starts_ok {
            return Err(self.error(ParseErrorKind::InvalidGroupName));
        }
        self.pos += name_len;
        if !self.expect('>') {
            return Err(self.error(ParseErrorKind::InvalidGroupName));
        }
        Ok(())
    }

    fn parse_atom_escape(&mut self) -> PResult<Node> {
        let start = self.pos;
        self.advance(); // consume '\'
        match self.peek() {
            Some('b') => {
                self.advance();
                Ok(Node::Anchor(AnchorKind::Boundary))
            }
            Some('B') => {
                self.advance();
                Ok(Node::Anchor(AnchorKind::NotBoundary))
            }
            Some(c @ '1'..='9') => {
                self.advance();
                Ok(Node::Reference(c as u32 - '0' as u32))
            }
            _ => self.parse_character_escape(start),
        }
    }

    /// Escapes shared between atoms and class members, after the backslash.
    fn parse_character_escape(&mut self, start: usize) -> PResult<Node> {
        let Some(c) = self.advance() else {
            self.pos = start;
            return Err(self.error(ParseErrorKind::InvalidEscape));
        };
        let value = match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' => return Ok(Node::ClassEscape(c)),
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            'x' => self.parse_hex(2).unwrap_or('x'),
            'u' if self.expect('{') => match self.parse_hex_braced() {
                Some(value) => value,
                None => {
                    self.pos = start;
                    return Err(self.error(ParseErrorKind::InvalidEscape));
                }
            },
            'u' => self.parse_hex(4).unwrap_or('u'),
            c => c,
        };
        Ok(Node::Value(value))
    }

    /// Exactly `width` hex digits; leaves the position untouched otherwise.
    fn parse_hex(&mut self, width: usize) -> Option<char> {
        let digits = self.rest().get(..width)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
        self.pos += width;
        Some(value)
    }

    fn parse_hex_braced(&mut self) -> Option<char> {
        let close = self.rest().find('}')?;
        let value = u32::from_str_radix(&self.rest()[..close], 16)
            .ok()
            .and_then(char::from_u32)?;
        self.pos += close + 1;
        Some(value)
    }

    /// Parse a bracket expression, e.g. `[abc]`, `[^a-z]` or `[\d_]`.
    ///
    /// Examples:
    /// - Pattern: `[a-c_]` → Class { body: [ClassRange('a', 'c'), Value('_')], negative: false }
    /// - Pattern: `[^xy]`  → Class { body: [Value('x'), Value('y')], negative: true }
    fn parse_class(&mut self) -> PResult<Node> {
        let open = self.pos;
        self.advance(); // consume '['
        let negative = self.expect('^');
        let mut body = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError {
                        offset: open,
                        kind: ParseErrorKind::UnclosedClass,
                    })
                }
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(_) => {}
            }
            let range_start = self.pos;
            let first = self.parse_class_atom()?;
            if self.peek() != Some('-') || self.rest().starts_with("-]") {
                body.push(first);
                continue;
            }
            self.advance(); // consume '-'
            if self.peek().is_none() {
                continue;
            }
            let second = self.parse_class_atom()?;
            match (first, second) {
                (Node::Value(min), Node::Value(max)) => {
                    if min > max {
                        self.pos = range_start;
                        return Err(self.error(ParseErrorKind::RangeOutOfOrder));
                    }
                    body.push(Node::ClassRange { min, max });
                }
                // A shorthand at either end makes the dash literal.
                (first, second) => {
                    body.push(first);
                    body.push(Node::Value('-'));
                    body.push(second);
                }
            }
        }
        Ok(Node::Class {
            body,
            negative,
            raw: self.pattern[open..self.pos].to_string(),
        })
    }

    fn parse_class_atom(&mut self) -> PResult<Node> {
        let start = self.pos;
        match self.advance() {
            Some('\\') => match self.peek() {
                Some('b') => {
                    self.advance();
                    Ok(Node::Value('\u{8}'))
                }
                Some('-') => {
                    self.advance();
                    Ok(Node::Value('-'))
                }
                _ => self.parse_character_escape(start),
            },
            Some(c) => Ok(Node::Value(c)),
            None => Err(self.error(ParseErrorKind::UnclosedClass)),
        }
    }
}

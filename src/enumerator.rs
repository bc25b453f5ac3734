use std::fmt;
use std::iter;

use crate::alphabet::Alphabets;
use crate::ast::{AnchorKind, GroupBehavior, Node};
use crate::combinators::{DiagonalProduct, Interleave};
use crate::error::{Result, Unsupported};
use crate::matcher::MatcherCache;

/// A lazy sequence of strings, possibly infinite.
type Seq<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Eventually yield every matching string.
    #[default]
    Exhaustive,
    /// Yield a small, bounded sample of matching strings.
    Examples,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Exhaustive => "exhaustive",
            Mode::Examples => "examples",
        })
    }
}

/// Walks a syntax tree and turns it into a lazy sequence of matching strings.
#[derive(Debug, Default)]
pub struct Enumerator {
    alphabets: Alphabets,
    mode: Mode,
    matchers: MatcherCache,
}

impl Enumerator {
    pub fn new(mode: Mode, alphabets: Alphabets) -> Self {
        Self {
            alphabets,
            mode,
            matchers: MatcherCache::new(),
        }
    }

    /// Exhaustive enumerator with the default exhaustive alphabets.
    pub fn exhaustive() -> Self {
        Self::new(Mode::Exhaustive, Alphabets::exhaustive())
    }

    /// Example enumerator with the default example alphabets.
    pub fn examples() -> Self {
        Self::new(Mode::Examples, Alphabets::examples())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn alphabets(&self) -> &Alphabets {
        &self.alphabets
    }

    /// All strings matched by `node`.
    ///
    /// Unsupported constructs surface as an `Err` item when the enumeration
    /// first reaches them; strings yielded before that are still valid, and the
    /// sequence ends after the error.
    pub fn enumerate<'a>(&'a self, node: &'a Node) -> Strings<'a> {
        log::debug!("enumerating {node} ({} mode)", self.mode);
        Strings {
            inner: self.visit(node),
            failed: false,
        }
    }

    fn visit<'a>(&'a self, node: &'a Node) -> Seq<'a> {
        match node {
            Node::Alternative(items) => self.alternative(items),
            Node::Disjunction(branches) => self.disjunction(branches),
            Node::Anchor(AnchorKind::Start | AnchorKind::End) => just(String::new()),
            Node::Anchor(kind) => fail(Unsupported::Anchor(*kind)),
            Node::Group {
                behavior: GroupBehavior::Normal | GroupBehavior::Ignore,
                body,
            } => self.alternative(body),
            Node::Group { behavior, .. } => fail(Unsupported::Group(*behavior)),
            Node::Quantifier { min, max, body, .. } => self.quantifier(*min, *max, body),
            Node::Value(c) => just(c.to_string()),
            Node::ClassRange { min, max } => self.class_range(*min, *max),
            Node::ClassEscape('d') => chars(&self.alphabets.digit),
            Node::ClassEscape('w') => chars(&self.alphabets.alnum),
            Node::ClassEscape('s') => chars(&self.alphabets.space),
            Node::ClassEscape(_) => self.generic(node),
            Node::Class {
                body,
                negative: false,
                ..
            } => self.disjunction(body),
            Node::Class { negative: true, .. } => self.generic(node),
            Node::Dot => chars(&self.alphabets.dot),
            Node::Reference(_) => fail(Unsupported::Feature(node.kind())),
        }
    }

    fn alternative<'a>(&'a self, items: &'a [Node]) -> Seq<'a> {
        let factors = items.iter().map(|item| self.visit(item)).collect();
        Box::new(DiagonalProduct::new(factors).map(|parts| parts.map(|parts| parts.concat())))
    }

    fn disjunction<'a>(&'a self, branches: &'a [Node]) -> Seq<'a> {
        Box::new(Interleave::new(branches.iter().map(|branch| self.visit(branch))))
    }

    fn quantifier<'a>(&'a self, min: u32, max: Option<u32>, body: &'a Node) -> Seq<'a> {
        let counts: Box<dyn Iterator<Item = u32>> = match self.mode {
            Mode::Exhaustive => Box::new(min..=max.unwrap_or(u32::MAX)),
            Mode::Examples => {
                let cap = max
                    .map_or(u64::MAX, u64::from)
                    .min(4 * (u64::from(min) + 1));
                Box::new(iter::successors(Some(min), move |&n| {
                    let next = if n == 0 { 1 } else { n.checked_mul(2)? };
                    (u64::from(next) <= cap).then_some(next)
                }))
            }
        };
        Box::new(Repeat {
            enumerator: self,
            body,
            counts,
            segment: None,
            grew: false,
        })
    }

    /// Exactly `n` repetitions of `body`, split in halves so nesting stays
    /// logarithmic in `n`.
    fn exactly<'a>(&'a self, body: &'a Node, n: u32) -> Seq<'a> {
        match n {
            0 => just(String::new()),
            1 => self.visit(body),
            n => {
                let halves = vec![self.exactly(body, n / 2), self.exactly(body, n - n / 2)];
                Box::new(DiagonalProduct::new(halves).map(|pair| pair.map(|pair| pair.concat())))
            }
        }
    }

    fn class_range<'a>(&'a self, min: char, max: char) -> Seq<'a> {
        match self.mode {
            Mode::Exhaustive => Box::new((min..=max).map(|c| Ok(c.to_string()))),
            Mode::Examples => {
                let (lo, hi) = (min as u32, max as u32);
                // Quarter points, rounded half up.
                let mut picks: Vec<char> = [(3 * lo + hi + 2) / 4, (lo + 3 * hi + 2) / 4]
                    .into_iter()
                    .filter_map(|point| nearest_char(point, lo, hi))
                    .collect();
                picks.dedup();
                Box::new(picks.into_iter().map(|c| Ok(c.to_string())))
            }
        }
    }

    /// Samples the generic alphabet against the node's source text. Runs on
    /// first pull, so the error for an unsatisfiable class is raised lazily.
    fn generic<'a>(&'a self, node: &'a Node) -> Seq<'a> {
        let found = iter::once_with(move || self.generic_candidates(node));
        Box::new(found.flat_map(|found| match found {
            Ok(found) => found
                .into_iter()
                .map(|c| Ok(c.to_string()))
                .collect::<Vec<_>>(),
            Err(err) => vec![Err(err)],
        }))
    }

    fn generic_candidates(&self, node: &Node) -> Result<Vec<char>> {
        let class = node.raw();
        let found = self.matchers.filter(&class, &self.alphabets.generic)?;
        if found.is_empty() {
            return Err(Unsupported::Unsatisfiable {
                alphabet: self.alphabets.generic.iter().collect(),
                class,
            }
            .into());
        }
        Ok(found)
    }
}

/// The scalar value closest to `point` within `lo..=hi`. Only surrogates
/// need moving, and the range always reaches past one side of that block.
fn nearest_char(point: u32, lo: u32, hi: u32) -> Option<char> {
    const BELOW: u32 = 0xD7FF;
    const ABOVE: u32 = 0xE000;
    if let Some(c) = char::from_u32(point) {
        return Some(c);
    }
    let below = (lo <= BELOW).then_some(BELOW);
    let above = (hi >= ABOVE).then_some(ABOVE);
    let pick = match (below, above) {
        (Some(b), Some(a)) if point - b <= a - point => b,
        (_, Some(a)) => a,
        (b, None) => b?,
    };
    char::from_u32(pick)
}

fn just<'a>(s: String) -> Seq<'a> {
    Box::new(iter::once(Ok(s)))
}

fn chars(set: &[char]) -> Seq<'_> {
    Box::new(set.iter().map(|c| Ok(c.to_string())))
}

fn fail<'a>(err: Unsupported) -> Seq<'a> {
    Box::new(iter::once(Err(err.into())))
}

/// Repetitions of one node, segment by segment in the order of `counts`.
struct Repeat<'a> {
    enumerator: &'a Enumerator,
    body: &'a Node,
    counts: Box<dyn Iterator<Item = u32> + 'a>,
    segment: Option<(u32, Seq<'a>)>,
    grew: bool,
}

impl Repeat<'_> {
    fn stop(&mut self) {
        self.segment = None;
        self.counts = Box::new(iter::empty());
    }
}

impl Iterator for Repeat<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((count, segment)) = &mut self.segment {
                let count = *count;
                match segment.next() {
                    Some(Ok(s)) => {
                        self.grew |= !s.is_empty();
                        return Some(Ok(s));
                    }
                    Some(Err(err)) => {
                        self.stop();
                        return Some(Err(err));
                    }
                    // A body with no non-empty string repeats to nothing new.
                    None if count > 0 && !self.grew => {
                        self.stop();
                        return None;
                    }
                    None => self.segment = None,
                }
            }
            let count = self.counts.next()?;
            log::trace!("repeating {} {count} times", self.body);
            self.segment = Some((count, self.enumerator.exactly(self.body, count)));
            self.grew = false;
        }
    }
}

/// Strings produced by [`Enumerator::enumerate`].
///
/// Fused after the first error.
pub struct Strings<'a> {
    inner: Seq<'a>,
    failed: bool,
}

impl Iterator for Strings<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.inner.next()?;
        self.failed = item.is_err();
        Some(item)
    }
}

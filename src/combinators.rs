//! Lazy sequence operators used to build up the enumeration.
//!
//! None of these know anything about regular expressions; they only combine
//! iterators.

use std::ops::Range;

/// Round-robin interleaving of several iterators.
///
/// Pulls one item from each live source in turn and drops a source from the
/// rotation once it is exhausted, so a finite source is always drained even
/// when a sibling never ends.
pub struct Interleave<I> {
    sources: Vec<I>,
    cursor: usize,
}

impl<I: Iterator> Interleave<I> {
    pub fn new(sources: impl IntoIterator<Item = I>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl<I: Iterator> Iterator for Interleave<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.sources.is_empty() {
            if self.cursor >= self.sources.len() {
                self.cursor = 0;
            }
            match self.sources[self.cursor].next() {
                Some(item) => {
                    self.cursor += 1;
                    return Some(item);
                }
                None => {
                    self.sources.remove(self.cursor);
                }
            }
        }
        None
    }
}

/// Cartesian product of finite index ranges, in lexicographic order with the
/// last range varying fastest.
///
/// Working on indices lets a caller take the product of lists it owns without
/// cloning them. The product of zero ranges is a single empty tuple; any empty
/// range makes the whole product empty.
#[derive(Debug, Clone)]
pub struct FiniteProduct {
    bounds: Vec<Range<usize>>,
    current: Option<Vec<usize>>,
}

impl FiniteProduct {
    pub fn new(bounds: Vec<Range<usize>>) -> Self {
        let current = if bounds.iter().any(|r| r.is_empty()) {
            None
        } else {
            Some(bounds.iter().map(|r| r.start).collect())
        };
        Self { bounds, current }
    }

    /// Product over every index of each list.
    pub fn over<T>(lists: &[Vec<T>]) -> Self {
        Self::new(lists.iter().map(|list| 0..list.len()).collect())
    }
}

impl Iterator for FiniteProduct {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let item = self.current.take()?;
        let mut succ = item.clone();
        for k in (0..succ.len()).rev() {
            succ[k] += 1;
            if succ[k] < self.bounds[k].end {
                self.current = Some(succ);
                return Some(item);
            }
            succ[k] = self.bounds[k].start;
        }
        Some(item)
    }
}

/// Cartesian product of finite lists, yielding cloned tuples.
pub fn finite_product<T: Clone>(lists: &[Vec<T>]) -> impl Iterator<Item = Vec<T>> + '_ {
    FiniteProduct::over(lists).map(move |indices| {
        indices
            .iter()
            .enumerate()
            .map(|(position, &i)| lists[position][i].clone())
            .collect()
    })
}

/// Cartesian product that stays complete when some factors are infinite.
///
/// Every value pulled from a factor is remembered. Each step pulls one new
/// value from the next live factor (round-robin) and emits all tuples pairing
/// it with what the other factors produced so far. Any combination of values
/// is therefore emitted exactly once, after finitely many pulls.
///
/// Factors yield `Result`s; the first error is forwarded and ends the product.
pub struct DiagonalProduct<I, T> {
    sources: Vec<Option<I>>,
    seen: Vec<Vec<T>>,
    cursor: usize,
    live: usize,
    pending: Option<FiniteProduct>,
}

impl<I, T, E> DiagonalProduct<I, T>
where
    I: Iterator<Item = Result<T, E>>,
    T: Clone,
{
    pub fn new(sources: Vec<I>) -> Self {
        let live = sources.len();
        // With nothing to combine there is exactly one tuple: the empty one.
        let pending = (live == 0).then(|| FiniteProduct::new(vec![]));
        Self {
            seen: sources.iter().map(|_| Vec::new()).collect(),
            sources: sources.into_iter().map(Some).collect(),
            cursor: 0,
            live,
            pending,
        }
    }

    fn tuple(&self, indices: &[usize]) -> Vec<T> {
        indices
            .iter()
            .enumerate()
            .map(|(position, &i)| self.seen[position][i].clone())
            .collect()
    }
}

impl<I, T, E> Iterator for DiagonalProduct<I, T>
where
    I: Iterator<Item = Result<T, E>>,
    T: Clone,
{
    type Item = Result<Vec<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(product) = &mut self.pending {
                if let Some(indices) = product.next() {
                    return Some(Ok(self.tuple(&indices)));
                }
                self.pending = None;
            }
            if self.live == 0 {
                return None;
            }

            let position = self.cursor;
            self.cursor = (self.cursor + 1) % self.sources.len();
            let Some(source) = &mut self.sources[position] else {
                continue;
            };
            match source.next() {
                None => {
                    self.sources[position] = None;
                    self.live -= 1;
                }
                Some(Err(err)) => {
                    self.sources.iter_mut().for_each(|s| *s = None);
                    self.live = 0;
                    return Some(Err(err));
                }
                Some(Ok(value)) => {
                    self.seen[position].push(value);
                    let bounds = self
                        .seen
                        .iter()
                        .enumerate()
                        .map(|(i, list)| {
                            if i == position {
                                list.len() - 1..list.len()
                            } else {
                                0..list.len()
                            }
                        })
                        .collect();
                    self.pending = Some(FiniteProduct::new(bounds));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::convert::Infallible;

    fn ok<T>(items: impl IntoIterator<Item = T>) -> impl Iterator<Item = Result<T, Infallible>> {
        items.into_iter().map(Ok)
    }

    #[test]
    fn interleave_round_robin() {
        let sources = vec![vec![1, 2, 3], vec![10], vec![20, 21]];
        let merged: Vec<_> = Interleave::new(sources.into_iter().map(Vec::into_iter)).collect();
        assert_eq!(merged, vec![1, 10, 20, 2, 21, 3]);
    }

    #[test]
    fn interleave_drains_finite_beside_infinite() {
        let finite: Box<dyn Iterator<Item = u64>> = Box::new(1..=5);
        let infinite: Box<dyn Iterator<Item = u64>> = Box::new(100..);
        let prefix: Vec<_> = Interleave::new(vec![finite, infinite]).take(10).collect();
        for k in 1..=5 {
            assert!(prefix.contains(&k));
        }
        assert_eq!(prefix.iter().filter(|&&v| v >= 100).count(), 5);
    }

    #[test]
    fn finite_product_last_varies_fastest() {
        let tuples: Vec<_> = finite_product(&[vec!['a', 'b'], vec!['x', 'y', 'z']]).collect();
        assert_eq!(
            tuples,
            vec![
                vec!['a', 'x'],
                vec!['a', 'y'],
                vec!['a', 'z'],
                vec!['b', 'x'],
                vec!['b', 'y'],
                vec!['b', 'z'],
            ]
        );
    }

    #[test]
    fn finite_product_edge_cases() {
        assert_eq!(
            FiniteProduct::new(vec![]).collect::<Vec<_>>(),
            vec![Vec::<usize>::new()]
        );
        assert_eq!(FiniteProduct::new(vec![0..2, 3..3]).count(), 0);
        assert_eq!(
            FiniteProduct::new(vec![2..3, 5..7]).collect::<Vec<_>>(),
            vec![vec![2, 5], vec![2, 6]]
        );
    }

    #[test]
    fn diagonal_product_order() {
        let tuples: Vec<_> = DiagonalProduct::new(vec![ok(vec![1, 2]), ok(vec![10, 20])])
            .map(Result::unwrap)
            .collect();
        assert_eq!(tuples, vec![vec![1, 10], vec![2, 10], vec![1, 20], vec![2, 20]]);
    }

    #[test]
    fn diagonal_product_of_infinite_factors_reaches_every_pair() {
        let naturals = || (0u32..).map(Ok::<_, Infallible>);
        let prefix: HashSet<_> = DiagonalProduct::new(vec![naturals(), naturals()])
            .take(400)
            .map(Result::unwrap)
            .collect();
        for a in 0..10 {
            for b in 0..10 {
                assert!(prefix.contains(&vec![a, b]), "missing ({a}, {b})");
            }
        }
    }

    #[test]
    fn diagonal_product_empty_cases() {
        let none: Vec<std::vec::IntoIter<Result<char, Infallible>>> = vec![];
        assert_eq!(
            DiagonalProduct::new(none).map(Result::unwrap).collect::<Vec<_>>(),
            vec![Vec::<char>::new()]
        );
        let with_empty = DiagonalProduct::new(vec![ok(vec!['a']), ok(vec![])]);
        assert_eq!(with_empty.count(), 0);
    }

    #[test]
    fn diagonal_product_forwards_first_error() {
        let failing = vec![Ok('a'), Err("boom"), Ok('b')].into_iter();
        let items: Vec<_> =
            DiagonalProduct::new(vec![vec![Ok('x')].into_iter(), failing]).collect();
        assert_eq!(items, vec![Ok(vec!['x', 'a']), Err("boom")]);
    }

    proptest! {
        #[test]
        fn diagonal_matches_finite_product(
            lists in prop::collection::vec(prop::collection::vec(0u8..50, 0..4), 0..4)
        ) {
            let expected: Vec<Vec<u8>> = finite_product(&lists).collect();
            let sources = lists
                .iter()
                .map(|list| list.clone().into_iter().map(Ok::<u8, Infallible>))
                .collect();
            let mut actual: Vec<Vec<u8>> = DiagonalProduct::new(sources)
                .map(Result::unwrap)
                .collect();
            prop_assert_eq!(actual.len(), expected.len());
            let mut expected = expected;
            expected.sort();
            actual.sort();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn interleave_keeps_every_item(
            lists in prop::collection::vec(prop::collection::vec(any::<u16>(), 0..6), 0..5)
        ) {
            let mut merged: Vec<u16> =
                Interleave::new(lists.iter().cloned().map(Vec::into_iter)).collect();
            let mut all: Vec<u16> = lists.into_iter().flatten().collect();
            merged.sort_unstable();
            all.sort_unstable();
            prop_assert_eq!(merged, all);
        }
    }
}

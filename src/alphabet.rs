/// Candidate characters the enumerator draws from wherever a construct stands
/// for more characters than it is practical to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabets {
    /// Yielded for `.`.
    pub dot: Vec<char>,
    /// Sampled and filtered for negated classes and unrecognized escapes.
    pub generic: Vec<char>,
    /// Yielded for `\s`.
    pub space: Vec<char>,
    /// Yielded for `\w`.
    pub alnum: Vec<char>,
    /// Yielded for `\d`.
    pub digit: Vec<char>,
}

impl Alphabets {
    /// Broad defaults for exhaustive enumeration.
    pub fn exhaustive() -> Self {
        Self {
            dot: vec!['.'],
            generic: "F7.$ \u{fffd}".chars().collect(),
            // Characters both JavaScript `\s` and Unicode White_Space agree on.
            space: "\u{c}\n\r\t\u{b} \u{a0}\u{1680}\u{2028}\u{2029}\u{202f}\u{205f}\u{3000}"
                .chars()
                .chain('\u{2000}'..='\u{200a}')
                .collect(),
            alnum: ('A'..='Z').chain('a'..='z').chain('0'..='9').collect(),
            digit: ('0'..='9').collect(),
        }
    }

    /// Concise defaults that keep generated examples short.
    pub fn examples() -> Self {
        Self {
            dot: vec!['.'],
            generic: "F7.$ \u{fffd}".chars().collect(),
            space: vec![' ', '\t'],
            alnum: vec!['A', 'b', '1'],
            digit: vec!['0', '1'],
        }
    }
}

impl Default for Alphabets {
    fn default() -> Self {
        Self::exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_alphabet_is_whitespace() {
        let space = Alphabets::exhaustive().space;
        assert_eq!(space.len(), 24);
        assert!(space.iter().all(|c| c.is_whitespace()));
    }

    #[test]
    fn example_alphabets_are_small() {
        let examples = Alphabets::examples();
        for set in [&examples.dot, &examples.space, &examples.alnum, &examples.digit] {
            assert!((1..=3).contains(&set.len()));
        }
    }
}

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;

use crate::error::{Error, Result};

/// Compiled single-character matchers, keyed by the class text they test.
///
/// Entries are filled on first use. Compiling the same text twice gives the
/// same matcher, so the cache can be dropped or shared freely.
#[derive(Debug, Default)]
pub struct MatcherCache {
    compiled: RefCell<HashMap<String, Rc<Regex>>>,
}

impl MatcherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher accepting exactly one string that satisfies `class`.
    pub fn get(&self, class: &str) -> Result<Rc<Regex>> {
        if let Some(re) = self.compiled.borrow().get(class) {
            log::debug!("reusing matcher for {class}");
            return Ok(Rc::clone(re));
        }
        log::debug!("compiling matcher for {class}");
        let pattern = format!("^(?:{})$", translate(class));
        let re = Regex::new(&pattern).map_err(|source| Error::Oracle {
            class: class.to_string(),
            source,
        })?;
        let re = Rc::new(re);
        self.compiled
            .borrow_mut()
            .insert(class.to_string(), Rc::clone(&re));
        Ok(re)
    }

    /// The candidates that satisfy `class`, in order.
    pub fn filter(&self, class: &str, candidates: &[char]) -> Result<Vec<char>> {
        let re = self.get(class)?;
        let mut buf = [0; 4];
        Ok(candidates
            .iter()
            .copied()
            .filter(|c| re.is_match(c.encode_utf8(&mut buf)))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.compiled.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rewrites the class escapes `regex` reads differently: `\b` is a backspace
/// inside a class, `\0` is NUL, and `[^]` matches any character.
fn translate(class: &str) -> String {
    if class == "[^]" {
        return r"[\s\S]".to_string();
    }
    let mut out = String::with_capacity(class.len());
    let mut chars = class.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => out.push_str(r"\x08"),
            Some('0') => out.push_str(r"\x00"),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_candidates() {
        let cache = MatcherCache::new();
        let candidates: Vec<char> = "F7.$ \u{fffd}".chars().collect();
        assert_eq!(
            cache.filter("[^A-Z]", &candidates).unwrap(),
            vec!['7', '.', '$', ' ', '\u{fffd}']
        );
        assert_eq!(
            cache.filter(r"\D", &candidates).unwrap(),
            vec!['F', '.', '$', ' ', '\u{fffd}']
        );
        assert!(cache
            .filter(r"[^ -\uffff]", &candidates)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn compiles_once_per_class() {
        let cache = MatcherCache::new();
        let first = cache.get(r"\W").unwrap();
        let second = cache.get(r"\W").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reads_class_escapes_the_pattern_way() {
        let cache = MatcherCache::new();
        let candidates = ['a', '\u{8}', '\0', 'b'];
        assert_eq!(cache.filter(r"[^\b]", &candidates).unwrap(), vec!['a', '\0', 'b']);
        assert_eq!(cache.filter(r"[\b\\]", &candidates).unwrap(), vec!['\u{8}']);
        assert_eq!(cache.filter(r"[^\0]", &candidates).unwrap(), vec!['a', '\u{8}', 'b']);
        assert_eq!(cache.filter("[^]", &candidates).unwrap(), candidates.to_vec());
        assert_eq!(translate(r"[\\b]"), r"[\\b]");
    }

    #[test]
    fn reports_uncompilable_class() {
        let cache = MatcherCache::new();
        let err = cache.get("[z-a]").unwrap_err();
        assert!(matches!(err, Error::Oracle { ref class, .. } if class == "[z-a]"));
        assert!(cache.is_empty());
    }
}

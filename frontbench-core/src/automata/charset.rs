//! Character sets
//!
//! Transition labels and regex atoms are finite sets of characters. Negated sets
//! and `.` are taken against [`CharSet::universe`]: printable ASCII (space through
//! `~`) plus tab, newline and carriage return.

use std::collections::BTreeSet;
use std::fmt;

/// Characters that must be escaped outside a bracket set
const META: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$',
];

/// Characters that must be escaped inside a bracket set
const CLASS_META: &[char] = &['\\', ']', '[', '^', '-', '&', '~'];

/// An ordered set of characters
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharSet(BTreeSet<char>);

impl CharSet {
    pub fn new() -> Self {
        CharSet(BTreeSet::new())
    }

    pub fn single(c: char) -> Self {
        CharSet(BTreeSet::from([c]))
    }

    /// Inclusive range; empty when `lo > hi`
    pub fn range(lo: char, hi: char) -> Self {
        CharSet((lo..=hi).collect())
    }

    /// The alphabet that `[^...]` and `.` are relative to
    pub fn universe() -> Self {
        let mut set = CharSet::range(' ', '~');
        set.insert('\t');
        set.insert('\n');
        set.insert('\r');
        set
    }

    pub fn digits() -> Self {
        CharSet::range('0', '9')
    }

    pub fn word() -> Self {
        let mut set = CharSet::range('a', 'z');
        set.extend(&CharSet::range('A', 'Z'));
        set.extend(&CharSet::digits());
        set.insert('_');
        set
    }

    pub fn whitespace() -> Self {
        CharSet([' ', '\t', '\n', '\r'].into_iter().collect())
    }

    pub fn insert(&mut self, c: char) {
        self.0.insert(c);
    }

    pub fn remove(&mut self, c: char) {
        self.0.remove(&c);
    }

    pub fn extend(&mut self, other: &CharSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn union(&self, other: &CharSet) -> CharSet {
        CharSet(self.0.union(&other.0).copied().collect())
    }

    pub fn intersection(&self, other: &CharSet) -> CharSet {
        CharSet(self.0.intersection(&other.0).copied().collect())
    }

    /// Universe minus this set
    pub fn complement(&self) -> CharSet {
        CharSet(CharSet::universe().0.difference(&self.0).copied().collect())
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn is_disjoint(&self, other: &CharSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// The single member, if there is exactly one
    pub fn as_single(&self) -> Option<char> {
        if self.0.len() == 1 {
            self.0.iter().next().copied()
        } else {
            None
        }
    }

    /// Maximal runs of consecutive characters, as inclusive `(lo, hi)` pairs
    pub fn ranges(&self) -> Vec<(char, char)> {
        let mut out: Vec<(char, char)> = Vec::new();
        for c in self.iter() {
            match out.last_mut() {
                Some((_, hi)) if (*hi as u32) + 1 == c as u32 => *hi = c,
                _ => out.push((c, c)),
            }
        }
        out
    }

    /// Render in the pattern dialect: a single (escaped) character, or a bracket
    /// set of ranges. The output is also a valid `regex` crate pattern with the
    /// same meaning.
    pub fn render(&self) -> String {
        if let Some(c) = self.as_single() {
            return escape_literal(c);
        }
        let mut out = String::from("[");
        for (lo, hi) in self.ranges() {
            let span = hi as u32 - lo as u32;
            out.push_str(&escape_in_class(lo));
            if span == 1 {
                out.push_str(&escape_in_class(hi));
            } else if span > 1 {
                out.push('-');
                out.push_str(&escape_in_class(hi));
            }
        }
        out.push(']');
        out
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        CharSet(iter.into_iter().collect())
    }
}

fn escape_control(c: char) -> Option<&'static str> {
    match c {
        '\n' => Some("\\n"),
        '\t' => Some("\\t"),
        '\r' => Some("\\r"),
        _ => None,
    }
}

pub(crate) fn escape_literal(c: char) -> String {
    if let Some(esc) = escape_control(c) {
        esc.to_string()
    } else if META.contains(&c) {
        format!("\\{}", c)
    } else {
        c.to_string()
    }
}

fn escape_in_class(c: char) -> String {
    if let Some(esc) = escape_control(c) {
        esc.to_string()
    } else if CLASS_META.contains(&c) {
        format!("\\{}", c)
    } else {
        c.to_string()
    }
}

//! Text boxes extracted from a single page.

use std::ops::Index;

use regex::{Captures, Regex};

use crate::error::LookupError;

/// Outcome of a lookup that should match at most one text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    /// No text box matched.
    Missing,
    /// Exactly one text box matched.
    Found(T),
    /// More than one text box matched; carries the number of matches.
    Ambiguous(usize),
}

impl<T> Lookup<T> {
    /// Treat an ambiguous match as an error, keeping "missing" as `None`.
    pub fn into_result(self) -> Result<Option<T>, LookupError> {
        match self {
            Lookup::Missing => Ok(None),
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::Ambiguous(count) => Err(LookupError::Ambiguous { count }),
        }
    }

    /// Require exactly one match. `what` names the lookup in the error.
    pub fn expect_found(self, what: &str) -> Result<T, LookupError> {
        match self {
            Lookup::Missing => Err(LookupError::NotFound(what.to_string())),
            Lookup::Found(value) => Ok(value),
            Lookup::Ambiguous(count) => Err(LookupError::Ambiguous { count }),
        }
    }

    /// The value, if exactly one box matched.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Lookup::Ambiguous(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Missing => Lookup::Missing,
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Ambiguous(count) => Lookup::Ambiguous(count),
        }
    }
}

/// The text boxes of one page, in drawing order.
///
/// Each box is one contiguous run of text, normally terminated by `\n`.
/// Positional heuristics ("the box right after this label") rely on the
/// order being stable, so the container is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBoxes {
    boxes: Vec<String>,
}

impl TextBoxes {
    pub fn new(boxes: Vec<String>) -> Self {
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.boxes.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.boxes.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.boxes
    }

    /// Whether a box with exactly this content exists.
    pub fn contains(&self, content: &str) -> bool {
        self.boxes.iter().any(|b| b == content)
    }

    /// Position of the first box with exactly this content.
    pub fn index_of(&self, content: &str) -> Result<usize, LookupError> {
        self.boxes
            .iter()
            .position(|b| b == content)
            .ok_or_else(|| LookupError::NotFound(content.to_string()))
    }

    /// The single box satisfying `predicate`.
    pub fn find_one_matching<F>(&self, predicate: F) -> Lookup<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.find_one_index_matching(predicate)
            .map(|index| self.boxes[index].as_str())
    }

    /// Position of the single box satisfying `predicate`.
    pub fn find_one_index_matching<F>(&self, predicate: F) -> Lookup<usize>
    where
        F: Fn(&str) -> bool,
    {
        let mut matches = self
            .boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| predicate(b))
            .map(|(index, _)| index);

        match (matches.next(), matches.next()) {
            (None, _) => Lookup::Missing,
            (Some(index), None) => Lookup::Found(index),
            (Some(_), Some(_)) => Lookup::Ambiguous(2 + matches.count()),
        }
    }

    pub fn find_one_starting_with(&self, prefix: &str) -> Lookup<&str> {
        self.find_one_matching(|b| b.starts_with(prefix))
    }

    pub fn find_one_index_starting_with(&self, prefix: &str) -> Lookup<usize> {
        self.find_one_index_matching(|b| b.starts_with(prefix))
    }

    /// Captures for every box that `pattern` matches at its start.
    ///
    /// The iterator is lazy and borrows the boxes; call again to restart.
    pub fn find_all_matching_regex<'a>(
        &'a self,
        pattern: &'a Regex,
    ) -> impl Iterator<Item = Captures<'a>> + 'a {
        self.boxes
            .iter()
            .filter_map(move |b| anchored_captures(pattern, b))
    }

    /// Positions of every box that `pattern` matches at its start.
    pub fn find_all_indexes_matching_regex<'a>(
        &'a self,
        pattern: &'a Regex,
    ) -> impl Iterator<Item = usize> + 'a {
        self.boxes
            .iter()
            .enumerate()
            .filter(move |(_, b)| anchored_captures(pattern, b).is_some())
            .map(|(index, _)| index)
    }
}

fn anchored_captures<'h>(pattern: &Regex, haystack: &'h str) -> Option<Captures<'h>> {
    pattern
        .captures(haystack)
        .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
}

impl Index<usize> for TextBoxes {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.boxes[index]
    }
}

impl<'a> IntoIterator for &'a TextBoxes {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}

impl From<Vec<String>> for TextBoxes {
    fn from(boxes: Vec<String>) -> Self {
        Self::new(boxes)
    }
}

impl FromIterator<String> for TextBoxes {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Sort planning over row groups, independent of the DOM.

use super::options::SortMode;
use lazy_static::lazy_static;
use regex::Regex;
use std::{cmp::Ordering, ops::Range};

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"^\s*(\+|-)?((\d+(\.\d+)?)|(\.\d+))(\s|%|$)").unwrap();
    static ref LEADING_FLOAT: Regex = Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
    static ref NOT_NUMERIC: Regex = Regex::new(r"[^\d.-]").unwrap();
}

/// Splits body rows into groups held together by row spans.
///
/// `spans[i]` is the largest row span of the cells of row `i`. Rows covered
/// by a span belong to the group of the row the span starts in.
pub fn groups(spans: &[u32]) -> Vec<Range<usize>> {
    let mut out = vec![];
    let mut i = 0;

    while i < spans.len() {
        let len = (spans[i].max(1) as usize).min(spans.len() - i);

        out.push(i..i + len);
        i += len;
    }

    out
}

/// First word of a cell with decimal comma, whitespace and thousands quotes dropped.
pub fn normalize_number(text: &str) -> String {
    text.split(' ')
        .next()
        .unwrap_or("")
        .replacen(',', ".", 1)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect()
}

pub fn looks_numeric(text: &str) -> bool {
    NUMBER.is_match(&normalize_number(text))
}

/// Leading decimal number of `text`, like `parseFloat`.
fn parse_float(text: &str) -> Option<f64> {
    LEADING_FLOAT
        .find(text)
        .and_then(|m| m.as_str().trim_start().parse().ok())
}

/// Numeric sort key of a cell, `0` for anything unreadable.
pub fn numeric_key(text: &str) -> f64 {
    let text = normalize_number(text);

    parse_float(&text)
        .or_else(|| parse_float(&NOT_NUMERIC.replace_all(&text, "")))
        .unwrap_or(0.0)
}

/// Resolves an automatic sort mode from the sort texts of the group leading rows.
///
/// The first non blank text decides.
pub fn resolve_mode<'a>(mode: SortMode, texts: impl IntoIterator<Item = &'a str>) -> SortMode {
    match mode {
        SortMode::Auto => {
            if texts.into_iter().find(|x| !x.is_empty()).map_or(false, looks_numeric) {
                SortMode::Numeric
            } else {
                SortMode::Alpha
            }
        }
        x => x,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Key {
    Number(f64),
    Text(String),
}

impl Key {
    pub fn new(mode: SortMode, text: &str) -> Self {
        match mode {
            SortMode::Numeric => Self::Number(numeric_key(text)),
            _ => Self::Text(text.to_string()),
        }
    }
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

/// Order in which the groups with sort `keys` are shown.
///
/// Equal keys keep their original relative order in both directions:
/// descending order reverses blocks of equal keys, not the rows inside them.
pub fn plan(keys: &[Key], reversed: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();

    order.sort_by(|a, b| keys[*a].compare(&keys[*b]).then(a.cmp(b)));

    if !reversed {
        return order;
    }

    let mut blocks: Vec<Vec<usize>> = vec![];

    for i in order {
        match blocks.last_mut() {
            Some(block) if keys[block[0]].compare(&keys[i]) == Ordering::Equal => block.push(i),
            _ => blocks.push(vec![i]),
        }
    }

    blocks.into_iter().rev().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(order: &[usize], xs: &[&'static str]) -> Vec<&'static str> {
        order.iter().map(|i| xs[*i]).collect()
    }

    #[test]
    fn test_groups() {
        assert_eq!(groups(&[1, 1, 1]), vec![0..1, 1..2, 2..3]);
        assert_eq!(groups(&[2, 1, 1, 3, 1]), vec![0..2, 2..3, 3..5]);
        assert_eq!(groups(&[0, 5]), vec![0..1, 1..2]);
        assert_eq!(groups(&[]), Vec::<Range<usize>>::new());
    }

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric("10%"));
        assert!(looks_numeric("-3.5 GiB"));
        assert!(looks_numeric("1'024"));
        assert!(looks_numeric("2,5"));
        assert!(looks_numeric(".5"));
        assert!(!looks_numeric("v4.0.1"));
        assert!(!looks_numeric("1.2.3"));
        assert!(!looks_numeric("192.168.1.1"));
        assert!(!looks_numeric("n/a"));
    }

    #[test]
    fn test_numeric_key() {
        assert_eq!(numeric_key("10%"), 10.0);
        assert_eq!(numeric_key("1'024 chunks"), 1024.0);
        assert_eq!(numeric_key("2,5"), 2.5);
        assert_eq!(numeric_key("-7"), -7.0);
        assert_eq!(numeric_key("~42"), 42.0);
        assert_eq!(numeric_key("n/a"), 0.0);
        assert_eq!(numeric_key(""), 0.0);
    }

    #[test]
    fn test_resolve_mode() {
        assert_eq!(resolve_mode(SortMode::Auto, vec!["", "abc", "12"]), SortMode::Alpha);
        assert_eq!(resolve_mode(SortMode::Auto, vec!["abc", "12"]), SortMode::Alpha);
        assert_eq!(resolve_mode(SortMode::Auto, vec!["", "12", "abc"]), SortMode::Numeric);
        assert_eq!(resolve_mode(SortMode::Auto, Vec::<&str>::new()), SortMode::Alpha);
        assert_eq!(resolve_mode(SortMode::Auto, vec!["abc", ""]), SortMode::Alpha);
        assert_eq!(resolve_mode(SortMode::Alpha, vec!["12"]), SortMode::Alpha);
    }

    #[test]
    fn test_percent_column_sorts_numerically() {
        let xs = ["10%", "2%", "30%"];
        let mode = resolve_mode(SortMode::Auto, xs.iter().copied());
        let keys: Vec<Key> = xs.iter().map(|x| Key::new(mode, x)).collect();

        assert_eq!(texts(&plan(&keys, false), &xs), vec!["2%", "10%", "30%"]);
        assert_eq!(texts(&plan(&keys, true), &xs), vec!["30%", "10%", "2%"]);
    }

    #[test]
    fn test_alpha_sort() {
        let xs = ["beta", "Alpha", "alpha"];
        let keys: Vec<Key> = xs.iter().map(|x| Key::new(SortMode::Alpha, x)).collect();

        assert_eq!(texts(&plan(&keys, false), &xs), vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn test_equal_keys_keep_order_in_both_directions() {
        let keys = vec![
            Key::Number(1.0),
            Key::Number(2.0),
            Key::Number(1.0),
            Key::Number(2.0),
            Key::Number(1.0),
        ];

        assert_eq!(plan(&keys, false), vec![0, 2, 4, 1, 3]);
        assert_eq!(plan(&keys, true), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_plan_is_a_permutation() {
        let keys: Vec<Key> = (0..50).map(|i| Key::Number(f64::from((i * 7) % 11))).collect();

        for reversed in [false, true] {
            let mut order = plan(&keys, reversed);
            order.sort_unstable();

            assert_eq!(order, (0..50).collect::<Vec<_>>());
        }
    }
}

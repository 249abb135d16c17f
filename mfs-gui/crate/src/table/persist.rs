// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Session persisted table state.

use crate::storage::Store;
use lazy_static::lazy_static;
use number_formatter::parse_int_prefix;
use regex::Regex;

lazy_static! {
    static ref SORTED_BY: Regex = Regex::new(r"\b([0-9]+)_(F|R)\b").unwrap();
}

fn direction(reversed: bool) -> &'static str {
    if reversed {
        "R"
    } else {
        "F"
    }
}

/// Persisted state of the table with storage id `id`.
pub struct TableStore<'a, S: Store> {
    store: &'a S,
    id: &'a str,
}

impl<'a, S: Store> TableStore<'a, S> {
    pub fn new(store: &'a S, id: &'a str) -> Self {
        Self { store, id }
    }
    /// Sort id of the sorted column and whether it is reversed.
    pub fn sorted_by(&self) -> Option<(usize, bool)> {
        let value = self.store.get(&format!("sortedby_{}", self.id))?;
        let caps = SORTED_BY.captures(&value)?;

        Some((caps[1].parse().ok()?, &caps[2] == "R"))
    }
    /// Direction the column with sort id `column` was last sorted in.
    pub fn last_direction(&self, column: usize) -> bool {
        self.store
            .get(&format!("sortedby_{}_lastdir_{}", self.id, column))
            .map(|x| x == "R")
            .unwrap_or(false)
    }
    pub fn remember_sort(&self, column: usize, reversed: bool) {
        let rf = direction(reversed);

        self.store
            .set(&format!("sortedby_{}", self.id), &format!("{}_{}", column, rf));
        self.store
            .set(&format!("sortedby_{}_lastdir_{}", self.id, column), rf);
    }
    pub fn body(&self) -> Option<i64> {
        self.store
            .get(&format!("switchbody_{}", self.id))
            .and_then(|x| parse_int_prefix(&x))
    }
    pub fn remember_body(&self, n: usize) {
        self.store
            .set(&format!("switchbody_{}", self.id), &n.to_string());
    }
    /// Stored display switches as `(class name, visible index)`.
    pub fn display_switches(&self) -> Vec<(String, i64)> {
        let prefix = format!("switchdisplay_{}_", self.id);

        self.store
            .keys()
            .into_iter()
            .filter_map(|key| {
                let name = key.strip_prefix(&prefix)?.to_string();
                let n = self.store.get(&key).and_then(|x| parse_int_prefix(&x))?;

                Some((name, n))
            })
            .collect()
    }
    pub fn remember_display(&self, name: &str, n: i64) {
        self.store
            .set(&format!("switchdisplay_{}_{}", self.id, name), &n.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;

    #[test]
    fn test_sort_round_trip() {
        let store = MemoryStore::default();
        let table = TableStore::new(&store, "servers");

        assert_eq!(table.sorted_by(), None);

        table.remember_sort(3, true);

        assert_eq!(TableStore::new(&store, "servers").sorted_by(), Some((3, true)));
        assert!(table.last_direction(3));
        assert!(!table.last_direction(2));
        assert_eq!(TableStore::new(&store, "disks").sorted_by(), None);

        table.remember_sort(2, false);

        assert_eq!(table.sorted_by(), Some((2, false)));
        assert!(table.last_direction(3), "other columns keep their direction");
    }

    #[test]
    fn test_corrupt_values_are_ignored() {
        let store = MemoryStore::with(&[
            ("sortedby_t", "garbage"),
            ("switchbody_t", "x"),
            ("switchdisplay_t_mode", "?"),
        ]);
        let table = TableStore::new(&store, "t");

        assert_eq!(table.sorted_by(), None);
        assert_eq!(table.body(), None);
        assert_eq!(table.display_switches(), vec![]);
    }

    #[test]
    fn test_display_switches() {
        let store = MemoryStore::default();
        let table = TableStore::new(&store, "t");

        table.remember_display("opmode", 2);
        table.remember_display("unit", 0);
        TableStore::new(&store, "other").remember_display("opmode", 1);
        table.remember_body(1);

        assert_eq!(
            table.display_switches(),
            vec![("opmode".to_string(), 2), ("unit".to_string(), 0)]
        );
        assert_eq!(table.body(), Some(1));
    }
}

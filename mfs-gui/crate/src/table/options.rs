// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Behavior encoded in the class names of a table and its header cells.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ZEBRA: Regex = Regex::new(r"\bacid_tab_zebra_([a-zA-Z0-9]+)_([a-zA-Z0-9]+)\b").unwrap();
    static ref STORAGE_ID: Regex = Regex::new(r"\bacid_tab_storageid_([a-zA-Z0-9]+)\b").unwrap();
    static ref LEVEL: Regex = Regex::new(r"\bacid_tab_level_([0-9]+)\b").unwrap();
}

/// Marker class of tables that get sortable headers.
pub const TABLE_CLASS: &str = "acid_tab";

fn has_class(class_name: &str, class: &str) -> bool {
    class_name.split_whitespace().any(|x| x == class)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableOptions {
    /// Classes alternately given to row groups.
    pub zebra: Option<[String; 2]>,
    /// Whether the sorted column gets an arrow.
    pub indicator: bool,
    /// Key under which sort and visibility state is persisted.
    pub storage_id: Option<String>,
}

impl TableOptions {
    pub fn parse(class_name: &str) -> Self {
        Self {
            zebra: ZEBRA
                .captures(class_name)
                .map(|c| [c[1].to_string(), c[2].to_string()]),
            indicator: !has_class(class_name, "acid_tab_noindicator"),
            storage_id: STORAGE_ID.captures(class_name).map(|c| c[1].to_string()),
        }
    }
}

/// How the values of a column are compared.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortMode {
    /// Decided from the column content on every sort.
    Auto,
    Numeric,
    Alpha,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HeaderRole {
    /// The column receives row group numbers.
    Enumerate,
    Skip,
    Sortable {
        mode: SortMode,
        pointer: bool,
        /// How many element levels down the sort text is collected.
        level: u32,
    },
}

impl HeaderRole {
    pub fn parse(class_name: &str) -> Self {
        if has_class(class_name, "acid_tab_enumerate") {
            return Self::Enumerate;
        }

        if has_class(class_name, "acid_tab_skip") {
            return Self::Skip;
        }

        let mode = if has_class(class_name, "acid_tab_numeric") {
            SortMode::Numeric
        } else if has_class(class_name, "acid_tab_alpha") {
            SortMode::Alpha
        } else {
            SortMode::Auto
        };

        Self::Sortable {
            mode,
            pointer: !has_class(class_name, "acid_tab_nocursor"),
            level: LEVEL
                .captures(class_name)
                .and_then(|c| c[1].parse().ok())
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_options() {
        let x = TableOptions::parse("acid_tab acid_tab_zebra_C1_C2 acid_tab_storageid_mfsmasters");

        assert_eq!(x.zebra, Some(["C1".to_string(), "C2".to_string()]));
        assert!(x.indicator);
        assert_eq!(x.storage_id.as_deref(), Some("mfsmasters"));

        let x = TableOptions::parse("acid_tab acid_tab_noindicator");

        assert_eq!(x, TableOptions::default());
    }

    #[test]
    fn test_header_roles() {
        assert_eq!(HeaderRole::parse("acid_tab_enumerate"), HeaderRole::Enumerate);
        assert_eq!(HeaderRole::parse("wide acid_tab_skip"), HeaderRole::Skip);
        assert_eq!(
            HeaderRole::parse(""),
            HeaderRole::Sortable {
                mode: SortMode::Auto,
                pointer: true,
                level: 0
            }
        );
        assert_eq!(
            HeaderRole::parse("acid_tab_alpha acid_tab_nocursor acid_tab_level_2"),
            HeaderRole::Sortable {
                mode: SortMode::Alpha,
                pointer: false,
                level: 2
            }
        );
        assert_eq!(
            HeaderRole::parse("acid_tab_numeric"),
            HeaderRole::Sortable {
                mode: SortMode::Numeric,
                pointer: true,
                level: 0
            }
        );
    }

    #[test]
    fn test_marker_must_be_whole_class() {
        assert_ne!(HeaderRole::parse("acid_tab_skipped"), HeaderRole::Skip);
    }
}

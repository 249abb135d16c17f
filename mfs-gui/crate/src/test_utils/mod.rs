// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

pub mod fixtures;

use crate::{
    chart::{
        paint::{Fill, Painter},
        ticks::Dash,
    },
    storage::Store,
};
use std::{cell::RefCell, collections::BTreeMap};

/// A drawing call captured by [`Recorder`].
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear,
    Fill(f64, f64, f64, f64, Fill),
    Line((f64, f64), (f64, f64), Dash, f64),
    Text(f64, f64, String),
}

/// Painter that records every call instead of drawing.
#[derive(Default)]
pub struct Recorder {
    pub ops: Vec<Op>,
}

impl Painter for Recorder {
    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Fill) {
        self.ops.push(Op::Fill(x, y, w, h, fill));
    }
    fn line(&mut self, from: (f64, f64), to: (f64, f64), dash: Dash, dash_offset: f64) {
        self.ops.push(Op::Line(from, to, dash, dash_offset));
    }
    fn text(&mut self, x: f64, y: f64, text: &str) {
        self.ops.push(Op::Text(x, y, text.to_string()));
    }
}

/// In-memory [`Store`] standing in for `sessionStorage` / `localStorage`.
#[derive(Default)]
pub struct MemoryStore(RefCell<BTreeMap<String, String>>);

impl MemoryStore {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();

        for (k, v) in entries {
            store.set(k, v);
        }

        store
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }
    fn set(&self, key: &str, value: &str) {
        self.0.borrow_mut().insert(key.into(), value.into());
    }
    fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Best-effort access to the browser key/value stores.
//!
//! Every stored value is advisory: reads that fail or return garbage are
//! treated as absent and writes that fail are logged and dropped.

use seed::{prelude::*, *};

/// Minimal key/value interface the components persist their state through.
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn keys(&self) -> Vec<String>;
}

/// A `Storage` area that may not exist.
#[derive(Clone)]
pub struct BrowserStore(Option<web_sys::Storage>);

impl BrowserStore {
    /// `window.sessionStorage`
    pub fn session() -> Self {
        Self(window().session_storage().ok().flatten())
    }
    /// `window.localStorage`
    pub fn local() -> Self {
        Self(window().local_storage().ok().flatten())
    }
}

impl Store for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }
    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.0.as_ref() {
            if let Err(e) = storage.set_item(key, value) {
                error!(format!("Could not store {}", key), e);
            }
        }
    }
    fn keys(&self) -> Vec<String> {
        let storage = match self.0.as_ref() {
            Some(x) => x,
            None => return vec![],
        };

        let len = storage.length().unwrap_or(0);

        (0..len).filter_map(|i| storage.key(i).ok().flatten()).collect()
    }
}

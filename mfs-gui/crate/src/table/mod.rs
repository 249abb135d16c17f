// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Client side sorting of `table.acid_tab` tables.
//!
//! Behavior is configured through class names on the table and its header
//! cells, see [`options`]. Sort and visibility state survive page reloads in
//! session storage when the table carries a storage id.

mod dom;
mod header;
mod options;
mod persist;
mod sort;

use options::TABLE_CLASS;

use crate::{
    extensions::{DocumentExt as _, LogErrExt as _},
    listener::listen,
    storage::BrowserStore,
};
use dom::Table;
use indexmap::IndexMap;
use seed::{prelude::*, *};
use web_sys::{Element, HtmlTableElement};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TableId(u32);

pub struct Model {
    tables: IndexMap<TableId, Table>,
    next_id: u32,
    store: BrowserStore,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            tables: IndexMap::new(),
            next_id: 0,
            store: BrowserStore::session(),
        }
    }
}

impl Model {
    fn find(&mut self, el: &Element) -> Option<&mut Table> {
        let table = dom::enclosing_table(el)?;

        self.tables
            .values_mut()
            .find(|x| x.element().is_same_node(Some(table.as_ref())))
    }
}

pub enum Msg {
    /// Prepares tables that appeared since the last call and forgets removed ones.
    Init,
    HeaderClick(TableId, usize),
    /// Shows body `n` of the table that is, or contains, the element.
    SwitchBody(Element, i64),
    /// Shows `.<name><n>` elements, hides the other `.<name><i>` ones.
    SwitchDisplay(Element, String, i64),
}

fn init(model: &mut Model, orders: &mut impl Orders<Msg>) {
    model.tables.retain(|_, x| x.is_connected());

    let found = document().select_all(&format!("table.{}", TABLE_CLASS));

    for el in found {
        let el: HtmlTableElement = match el.dyn_into() {
            Ok(x) => x,
            Err(_) => continue,
        };

        if model
            .tables
            .values()
            .any(|x| x.element().is_same_node(Some(el.as_ref())))
        {
            continue;
        }

        let id = TableId(model.next_id);
        model.next_id += 1;

        let prepared = Table::prepare(el, &model.store, |cell, k| {
            listen(orders, cell.as_ref(), "click", move |_| Some(Msg::HeaderClick(id, k)))
        });

        if let Some(Some(table)) = prepared.log_err("table setup") {
            model.tables.insert(id, table);
        }
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::Init => init(model, orders),
        Msg::HeaderClick(id, k) => {
            let store = model.store.clone();

            if let Some(table) = model.tables.get_mut(&id) {
                table.click(k, &store).log_err("table sort");
            }
        }
        Msg::SwitchBody(el, n) => {
            let store = model.store.clone();

            match model.find(&el) {
                Some(table) => {
                    table.switch_body(n, &store).log_err("table body switch");
                }
                None => log!("tableSwitchBody: not a sortable table"),
            }
        }
        Msg::SwitchDisplay(el, name, n) => {
            dom::switch_display_rules(&name, n);

            let store = model.store.clone();

            if let Some(table) = model.find(&el) {
                table
                    .switched_display(&name, n, &store)
                    .log_err("table display switch");
            }
        }
    }
}

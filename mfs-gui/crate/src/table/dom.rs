// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! A prepared sortable table living in the page.

use super::{
    header::{self, Span},
    options::{HeaderRole, SortMode, TableOptions},
    persist::TableStore,
    sort::{self, Key},
};
use crate::{
    extensions::{ElementExt as _, ElementsExt as _, LogErrExt as _},
    listener::Listener,
    storage::Store,
    GuiError,
};
use seed::{prelude::*, *};
use std::rc::Rc;
use web_sys::{
    CssStyleRule, CssStyleSheet, Element, HtmlElement, HtmlTableCellElement, HtmlTableElement,
    HtmlTableRowElement, HtmlTableSectionElement, Node,
};

const HOVER_CLASS: &str = "CH";
const DEFAULT_ROW_CLASS: &str = "C1";

fn indicator_html(reversed: bool) -> String {
    let dir = if reversed { "up" } else { "down" };

    format!(
        "&#8205;<svg class=\"sort\"><use xlink:href=\"#icon-sort-{}\"/></svg>",
        dir
    )
}

fn cast_all<T: JsCast>(xs: Vec<Element>) -> Vec<T> {
    xs.into_iter().filter_map(|x| x.dyn_into().ok()).collect()
}

fn body_rows(body: &HtmlTableSectionElement) -> Vec<HtmlTableRowElement> {
    cast_all(body.rows().elements())
}

/// Rows of `body` split into row span groups.
fn row_groups(body: &HtmlTableSectionElement) -> Vec<Vec<HtmlTableRowElement>> {
    let rows = body_rows(body);

    let spans: Vec<u32> = rows
        .iter()
        .map(|row| {
            cast_all::<HtmlTableCellElement>(row.cells().elements())
                .iter()
                .map(|c| c.row_span())
                .max()
                .unwrap_or(1)
        })
        .collect();

    sort::groups(&spans)
        .into_iter()
        .map(|r| rows[r].to_vec())
        .collect()
}

/// Text a cell is sorted by.
///
/// At level 0 a child `<span class="sortkey">` overrides the cell text and
/// hidden cells sort as empty. Higher levels join the texts of the children
/// one level down.
pub fn sort_text(node: &Node, level: u32) -> String {
    let nodes = node.child_nodes();
    let children = (0..nodes.length()).filter_map(|i| nodes.item(i));

    if level > 0 {
        return children.map(|x| sort_text(&x, level - 1)).collect();
    }

    for child in children {
        if let Some(el) = child.dyn_ref::<Element>() {
            if el.node_name() == "SPAN" && el.class_name() == "sortkey" {
                return el.inner_html();
            }
        }
    }

    match node.dyn_ref::<HtmlElement>() {
        Some(el) if el.offset_width() > 0 || el.offset_height() > 0 => {
            el.text_content().unwrap_or_default().trim().to_string()
        }
        _ => String::new(),
    }
}

/// Sets `property: value` on every stylesheet rule whose selector is exactly `selector`.
///
/// Returns whether any rule matched. Sheets that refuse access are skipped.
pub fn change_css(selector: &str, property: &str, value: &str) -> bool {
    let sheets = document().style_sheets();
    let mut found = false;

    for sheet in (0..sheets.length()).filter_map(|i| sheets.item(i)) {
        let rules = match sheet.dyn_into::<CssStyleSheet>().ok().and_then(|x| x.css_rules().ok()) {
            Some(x) => x,
            None => continue,
        };

        for rule in (0..rules.length()).filter_map(|i| rules.item(i)) {
            if let Some(rule) = rule.dyn_ref::<CssStyleRule>() {
                if rule.selector_text() == selector {
                    rule.style().set_property(property, value).log_err("table css rule");

                    found = true;
                }
            }
        }
    }

    found
}

/// Shows the elements of class `<name><n>` and hides those of `<name>0`, `<name>1`, ...
pub fn switch_display_rules(name: &str, n: i64) {
    let mut i = 0;

    loop {
        let display = if i == n { "inline" } else { "none" };

        if !change_css(&format!(".{}{}", name, i), "display", display) {
            break;
        }

        i += 1;
    }
}

struct Column {
    header: HtmlTableCellElement,
    /// Body column index.
    index: usize,
    mode: SortMode,
    level: u32,
}

/// Sort keys of the current body, kept so a direction toggle only reorders.
struct SortCache {
    keys: Vec<Key>,
    groups: Vec<Vec<HtmlTableRowElement>>,
}

pub struct Table {
    el: HtmlTableElement,
    options: TableOptions,
    bodies: Vec<HtmlTableSectionElement>,
    /// Sortable header cells by sort id.
    columns: Vec<Column>,
    enumerate: Option<usize>,
    sorted_by: Option<usize>,
    reversed: bool,
    indicator: Option<Element>,
    cache: Option<SortCache>,
    _clicks: Vec<Listener>,
    hovers: Vec<Listener>,
}

impl Table {
    /// Makes `el` sortable.
    ///
    /// `bind` attaches the click handler of the header cell with the given
    /// sort id. Returns `None` for tables without a body.
    pub fn prepare<S: Store>(
        el: HtmlTableElement,
        store: &S,
        mut bind: impl FnMut(&Element, usize) -> Result<Listener, GuiError>,
    ) -> Result<Option<Self>, GuiError> {
        let head = Self::ensure_head(&el)?;

        let bodies: Vec<HtmlTableSectionElement> = cast_all(el.t_bodies().elements());

        for body in bodies.iter().skip(1) {
            body.remove();
        }

        if bodies.is_empty() {
            return Ok(None);
        }

        let options = TableOptions::parse(&el.class_name());

        let mut table = Self {
            el,
            options,
            bodies,
            columns: vec![],
            enumerate: None,
            sorted_by: None,
            reversed: false,
            indicator: None,
            cache: None,
            _clicks: vec![],
            hovers: vec![],
        };

        let (stored_body, stored_sort) = match table.persisted(store) {
            Some(persisted) => {
                for (name, n) in persisted.display_switches() {
                    switch_display_rules(&name, n);
                }

                (persisted.body(), persisted.sorted_by())
            }
            None => (None, None),
        };

        if let Some(n) = stored_body {
            table.swap_body(n, store)?;
        }

        table.scan_header(&head, &mut bind)?;

        if let Some((k, reversed)) = stored_sort.filter(|(k, _)| *k < table.columns.len()) {
            table.sorted_by = Some(k);
            table.reversed = reversed;

            if table.options.indicator {
                let header = &table.columns[k].header;

                table.indicator = match header.get_elements_by_class_name("sort").item(0) {
                    Some(x) => Some(x),
                    None => Some(Self::add_indicator(header, reversed)?),
                };
            }
        }

        table.resort(store)?;

        Ok(Some(table))
    }
    /// Moves leading header cell rows into a `thead` when the table has none.
    fn ensure_head(el: &HtmlTableElement) -> Result<HtmlTableSectionElement, GuiError> {
        if el.get_elements_by_tag_name("thead").length() == 0 {
            let head = document().create_element("thead")?;

            while let Some(row) = el.rows().item(0) {
                let is_header = row
                    .dyn_ref::<HtmlTableRowElement>()
                    .and_then(|x| x.cells().item(0))
                    .map(|x| x.node_name() == "TH")
                    .unwrap_or(false);

                if !is_header {
                    break;
                }

                head.append_child(&row)?;
            }

            el.insert_before(&head, el.first_child().as_ref())?;
        }

        el.t_head()
            .ok_or(GuiError::UnexpectedType("HtmlTableSectionElement"))
    }
    fn scan_header(
        &mut self,
        head: &HtmlTableSectionElement,
        bind: &mut impl FnMut(&Element, usize) -> Result<Listener, GuiError>,
    ) -> Result<(), GuiError> {
        let rows: Vec<Vec<HtmlTableCellElement>> = body_rows(head)
            .iter()
            .map(|row| cast_all(row.cells().elements()))
            .collect();

        let spans: Vec<Vec<Span>> = rows
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .map(|c| Span {
                        cols: c.col_span(),
                        rows: c.row_span(),
                    })
                    .collect()
            })
            .collect();

        let positions = header::columns(&spans);

        for (cells, positions) in rows.into_iter().zip(positions) {
            for (cell, index) in cells.into_iter().zip(positions) {
                if cell.col_span() > 1 {
                    continue;
                }

                match HeaderRole::parse(&cell.class_name()) {
                    HeaderRole::Enumerate => self.enumerate = Some(index),
                    HeaderRole::Skip => {}
                    HeaderRole::Sortable {
                        mode,
                        pointer,
                        level,
                    } => {
                        if pointer {
                            cell.set_style("cursor", "pointer")?;
                        }

                        self._clicks.push(bind(&cell, self.columns.len())?);

                        self.columns.push(Column {
                            header: cell,
                            index,
                            mode,
                            level,
                        });
                    }
                }
            }
        }

        Ok(())
    }
    fn persisted<'a, S: Store>(&'a self, store: &'a S) -> Option<TableStore<'a, S>> {
        self.options
            .storage_id
            .as_deref()
            .map(|id| TableStore::new(store, id))
    }
    fn body(&self) -> Option<HtmlTableSectionElement> {
        self.el
            .t_bodies()
            .item(0)
            .and_then(|x| x.dyn_into().ok())
    }
    pub fn element(&self) -> &HtmlTableElement {
        &self.el
    }
    pub fn is_connected(&self) -> bool {
        self.el.is_connected()
    }
    fn add_indicator(header: &Element, reversed: bool) -> Result<Element, GuiError> {
        let span = document().create_element("span")?;

        span.set_inner_html(&indicator_html(reversed));
        header.append_child(&span)?;

        Ok(span)
    }
    fn swap_body<S: Store>(&mut self, n: i64, store: &S) -> Result<(), GuiError> {
        let body = match usize::try_from(n).ok().and_then(|i| self.bodies.get(i)) {
            Some(x) => x.clone(),
            None => return Ok(()),
        };

        if let Some(current) = self.body() {
            current.remove();
        }

        self.el.append_child(&body)?;
        self.cache = None;

        if let Some(persisted) = self.persisted(store) {
            persisted.remember_body(n as usize);
        }

        Ok(())
    }
    /// Shows body `n` of the bodies the table was prepared with.
    pub fn switch_body<S: Store>(&mut self, n: i64, store: &S) -> Result<(), GuiError> {
        self.swap_body(n, store)?;

        self.resort(store)
    }
    /// Records a display switch made on this table and sorts again.
    pub fn switched_display<S: Store>(&mut self, name: &str, n: i64, store: &S) -> Result<(), GuiError> {
        self.resort(store)?;

        if let Some(persisted) = self.persisted(store) {
            persisted.remember_display(name, n);
        }

        Ok(())
    }
    /// Sorts the current body again by the active column.
    pub fn resort<S: Store>(&mut self, store: &S) -> Result<(), GuiError> {
        match self.sorted_by {
            Some(k) => self.sort(k, true, store),
            None => self.after_sort(),
        }
    }
    /// Header cell `k` was clicked.
    pub fn click<S: Store>(&mut self, k: usize, store: &S) -> Result<(), GuiError> {
        if k >= self.columns.len() {
            return Ok(());
        }

        self.sort(k, false, store)
    }
    fn sort<S: Store>(&mut self, k: usize, same_body: bool, store: &S) -> Result<(), GuiError> {
        let body = match self.body() {
            Some(x) => x,
            None => return Ok(()),
        };

        if !same_body {
            if let Some(x) = self.indicator.take() {
                x.remove();
            }

            if self.sorted_by == Some(k) && self.cache.is_some() {
                self.reversed = !self.reversed;
                self.apply(&body)?;

                return self.mark_sorted(k, store);
            }
        }

        let column = &self.columns[k];
        let groups = row_groups(&body);

        let texts: Vec<String> = groups
            .iter()
            .map(|rows| {
                rows[0]
                    .cells()
                    .item(column.index as u32)
                    .map(|x| sort_text(&x, column.level))
                    .unwrap_or_default()
            })
            .collect();

        let mode = sort::resolve_mode(column.mode, texts.iter().map(String::as_str));

        self.cache = Some(SortCache {
            keys: texts.iter().map(|x| Key::new(mode, x)).collect(),
            groups,
        });

        if !same_body {
            self.reversed = self
                .persisted(store)
                .map(|x| x.last_direction(k))
                .unwrap_or(false);
        }

        self.apply(&body)?;

        if same_body {
            Ok(())
        } else {
            self.mark_sorted(k, store)
        }
    }
    /// Reorders the rows of `body` from the cached sort keys.
    fn apply(&mut self, body: &HtmlTableSectionElement) -> Result<(), GuiError> {
        if let Some(cache) = self.cache.as_ref() {
            for i in sort::plan(&cache.keys, self.reversed) {
                for row in &cache.groups[i] {
                    body.append_child(row)?;
                }
            }
        }

        self.after_sort()
    }
    fn mark_sorted<S: Store>(&mut self, k: usize, store: &S) -> Result<(), GuiError> {
        self.sorted_by = Some(k);

        if self.options.indicator {
            self.indicator = Some(Self::add_indicator(&self.columns[k].header, self.reversed)?);
        }

        if let Some(persisted) = self.persisted(store) {
            persisted.remember_sort(k, self.reversed);
        }

        Ok(())
    }
    /// Numbers, stripes and hover highlights the row groups in their current order.
    fn after_sort(&mut self) -> Result<(), GuiError> {
        let body = match self.body() {
            Some(x) => x,
            None => return Ok(()),
        };

        let groups = row_groups(&body);

        if let Some(col) = self.enumerate {
            for (j, rows) in groups.iter().enumerate() {
                if let Some(cell) = rows[0].cells().item(col as u32) {
                    cell.set_inner_html(&(j + 1).to_string());
                }
            }
        }

        let mut hovers = vec![];

        for (j, rows) in groups.into_iter().enumerate() {
            let class = match self.options.zebra.as_ref() {
                Some(zebra) => {
                    let class = &zebra[j % 2];

                    for row in &rows {
                        row.set_class_name(class);
                    }

                    class.clone()
                }
                None => DEFAULT_ROW_CLASS.to_string(),
            };

            let rows = Rc::new(rows);

            for row in rows.iter() {
                let enter = {
                    let rows = Rc::clone(&rows);

                    Listener::new(row.as_ref(), "mouseenter", move |_| {
                        for x in rows.iter() {
                            x.set_class_name(HOVER_CLASS);
                        }
                    })?
                };

                let leave = {
                    let rows = Rc::clone(&rows);
                    let class = class.clone();

                    Listener::new(row.as_ref(), "mouseleave", move |_| {
                        for x in rows.iter() {
                            x.set_class_name(&class);
                        }
                    })?
                };

                hovers.push(enter);
                hovers.push(leave);
            }
        }

        self.hovers = hovers;

        Ok(())
    }
}

/// Finds the table `el` is, or sits in.
pub fn enclosing_table(el: &Element) -> Option<HtmlTableElement> {
    el.closest("table")
        .ok()
        .flatten()
        .and_then(|x| x.dyn_into().ok())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn build(html: &str) -> HtmlTableElement {
        let el: HtmlTableElement = document().create_element("table").unwrap().dyn_into().unwrap();

        el.set_class_name("acid_tab acid_tab_storageid_t acid_tab_zebra_C1_C2");
        el.set_inner_html(html);
        document().body().unwrap().append_child(&el).unwrap();

        el
    }

    fn column(el: &HtmlTableElement, i: u32) -> Vec<String> {
        let body: HtmlTableSectionElement = el.t_bodies().item(0).unwrap().dyn_into().unwrap();

        body_rows(&body)
            .iter()
            .map(|r| r.cells().item(i).unwrap().text_content().unwrap_or_default())
            .collect()
    }

    fn noop(cell: &Element, _: usize) -> Result<Listener, GuiError> {
        Listener::new(cell.as_ref(), "click", |_| {})
    }

    #[wasm_bindgen_test]
    fn test_header_clicks_sort_and_toggle() {
        let el = build(
            "<tr><th class=\"acid_tab_enumerate\">#</th><th>usage</th></tr>\
             <tr><td></td><td>10%</td></tr>\
             <tr><td></td><td>2%</td></tr>\
             <tr><td></td><td>30%</td></tr>",
        );
        let store = MemoryStore::default();
        let mut table = Table::prepare(el.clone(), &store, noop).unwrap().unwrap();

        assert_eq!(el.t_head().unwrap().rows().length(), 1);

        table.click(0, &store).unwrap();

        assert_eq!(column(&el, 1), vec!["2%", "10%", "30%"]);
        assert_eq!(column(&el, 0), vec!["1", "2", "3"]);
        assert_eq!(store.get("sortedby_t").as_deref(), Some("0_F"));

        table.click(0, &store).unwrap();

        assert_eq!(column(&el, 1), vec!["30%", "10%", "2%"]);
        assert_eq!(store.get("sortedby_t").as_deref(), Some("0_R"));

        el.remove();
    }

    #[wasm_bindgen_test]
    fn test_stored_sort_is_restored() {
        let el = build(
            "<tr><th>name</th></tr>\
             <tr><td>b</td></tr><tr><td>c</td></tr><tr><td>a</td></tr>",
        );
        let store = MemoryStore::with(&[("sortedby_t", "0_R")]);

        let _table = Table::prepare(el.clone(), &store, noop).unwrap().unwrap();

        assert_eq!(column(&el, 0), vec!["c", "b", "a"]);
        assert_eq!(el.get_elements_by_class_name("sort").length(), 1);

        el.remove();
    }

    #[wasm_bindgen_test]
    fn test_row_span_groups_move_together() {
        let el = build(
            "<tr><th class=\"acid_tab_enumerate\">#</th><th>name</th><th>part</th></tr>\
             <tr><td rowspan=\"2\"></td><td rowspan=\"2\">b</td><td>b1</td></tr>\
             <tr><td>b2</td></tr>\
             <tr><td></td><td>a</td><td>a1</td></tr>\
             <tr><td></td><td>c</td><td>c1</td></tr>",
        );
        let store = MemoryStore::default();
        let mut table = Table::prepare(el.clone(), &store, noop).unwrap().unwrap();

        let body = || -> Vec<HtmlTableRowElement> {
            body_rows(&el.t_bodies().item(0).unwrap().dyn_into().unwrap())
        };
        let parts = || -> Vec<String> {
            body()
                .iter()
                .map(|r| r.cells().item(r.cells().length() - 1).unwrap().text_content().unwrap_or_default())
                .collect()
        };
        let numbers = || -> Vec<String> {
            body()
                .iter()
                .filter(|r| r.cells().length() == 3)
                .map(|r| r.cells().item(0).unwrap().text_content().unwrap_or_default())
                .collect()
        };
        let classes = || -> Vec<String> { body().iter().map(|r| r.class_name()).collect() };

        table.click(0, &store).unwrap();

        assert_eq!(parts(), vec!["a1", "b1", "b2", "c1"]);
        assert_eq!(numbers(), vec!["1", "2", "3"]);
        assert_eq!(classes(), vec!["C1", "C2", "C2", "C1"]);

        table.click(0, &store).unwrap();

        assert_eq!(parts(), vec!["c1", "b1", "b2", "a1"]);
        assert_eq!(numbers(), vec!["1", "2", "3"]);
        assert_eq!(classes(), vec!["C1", "C2", "C2", "C1"]);

        el.remove();
    }

    #[wasm_bindgen_test]
    fn test_sortkey_span_wins() {
        let td = document().create_element("td").unwrap();

        td.set_inner_html("<span class=\"sortkey\">0042</span>big");

        assert_eq!(sort_text(&td, 0), "0042");
    }
}

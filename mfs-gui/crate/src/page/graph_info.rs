// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Drill-down tables shown under a graph.

use super::Msg;
use crate::{
    extensions::{DocumentExt as _, ElementExt as _},
    listener::{listen, Listener},
    storage::Store,
    GuiError,
};
use seed::{prelude::*, *};
use web_sys::{HtmlElement, ScrollBehavior, ScrollIntoViewOptions};

pub const INFO_ID: &str = "mfsgraph-info";
const TILE_ID: &str = "mfsgraph-tile";
const HREF_KEY: &str = "mfsgraph-info-data-ajax-href";
const HREF_ATTR: &str = "data-ajax-href";

const BUTTONS: &str = "&nbsp;&nbsp;&nbsp;&nbsp;<svg height='12px' width='12px' class='pointer' data-graph-action='up'><use xlink:href='#icon-go-up'/></svg>&nbsp;&nbsp;<svg height='12px' width='12px' class='pointer' data-graph-action='close'><use xlink:href='#icon-close'/></svg>";

pub fn container() -> Option<HtmlElement> {
    document().find(INFO_ID)
}

/// The drill-down URL to show, if one was opened and not closed since.
pub fn stored_href(store: &impl Store) -> Option<String> {
    store.get(HREF_KEY).filter(|x| !x.is_empty() && x != "null")
}

pub fn remember_href(store: &impl Store, href: &str) {
    store.set(HREF_KEY, href);
}

pub fn forget_href(store: &impl Store) {
    store.set(HREF_KEY, "null");
}

/// The drill-down URL to restore when the page is loaded.
///
/// Pages that render the drill-down themselves say so with a non empty `data-ajax-href`.
pub fn href_to_restore(store: &impl Store) -> Option<String> {
    let el = container()?;

    match el.get_attribute(HREF_ATTR) {
        Some(x) if !x.is_empty() => None,
        _ => stored_href(store),
    }
}

fn scroll_to(id: &str) {
    if let Some(el) = document().find::<HtmlElement>(id) {
        let opts = ScrollIntoViewOptions::new();
        opts.set_behavior(ScrollBehavior::Smooth);

        el.scroll_into_view_with_scroll_into_view_options(&opts);
    }
}

pub fn scroll_to_graph() {
    scroll_to(TILE_ID);
}

pub fn scroll_to_info() {
    scroll_to(INFO_ID);
}

/// Empties the drill-down and scrolls back up to the graph.
pub fn clear() -> Result<(), GuiError> {
    if let Some(el) = container() {
        el.set_inner_html("");
        el.set_attribute(HREF_ATTR, "")?;

        scroll_to_graph();
    }

    Ok(())
}

/// Puts freshly loaded drill-down markup in place.
///
/// Every table title gets scroll up and close buttons, and sortable tables
/// are squeezed to their content.
pub fn replace(html: &str, orders: &impl Orders<Msg>) -> Result<Vec<Listener>, GuiError> {
    let el = match container() {
        Some(x) => x,
        None => return Ok(vec![]),
    };

    el.set_inner_html(html);

    let mut listeners = vec![];

    for title in el.select_all(".tab_title") {
        let span = document().create_element("span")?;

        span.set_inner_html(BUTTONS);
        title.append_child(&span)?;

        for button in span.select_all("[data-graph-action]") {
            let msg: fn() -> Msg = match button.get_attribute("data-graph-action").as_deref() {
                Some("close") => || Msg::HideGraphInfo,
                _ => || Msg::ScrollToGraph,
            };

            listeners.push(listen(orders, button.as_ref(), "click", move |_| Some(msg()))?);
        }
    }

    for table in el.select_all("table.acid_tab") {
        table.class_list().add_1("narrow")?;
        table.set_style("margin-left", "0")?;
    }

    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;

    #[test]
    fn test_stored_href() {
        let store = MemoryStore::default();

        assert_eq!(stored_href(&store), None);

        remember_href(&store, "http://m/mfs.cgi?ajax=container&sections=CS");

        assert_eq!(
            stored_href(&store).as_deref(),
            Some("http://m/mfs.cgi?ajax=container&sections=CS")
        );

        forget_href(&store);

        assert_eq!(stored_href(&store), None);
    }
}

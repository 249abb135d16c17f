// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Client side of the MooseFS web console.
//!
//! The console pages are rendered by the server. This crate attaches to them:
//! it draws the charts, makes tables sortable, shows tooltips and keeps the
//! page fresh. Page scripts talk to it through the functions exported here.

mod chart;
mod config;
mod error;
mod extensions;
mod listener;
mod page;
mod storage;
mod table;
mod tooltip;

#[cfg(test)]
mod test_utils;

pub use error::GuiError;

use chart::{ChartId, Source};
use config::Config;
use extensions::{DocumentExt as _, LogErrExt as _};
use gloo_timers::callback::Timeout;
use seed::{prelude::*, *};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use web_sys::Element;

const ROOT_ID: &str = "mfs-gui-root";

thread_local! {
    static APP: RefCell<Option<App<Msg, Model, Node<Msg>>>> = RefCell::new(None);
    static PENDING: RefCell<Vec<Msg>> = RefCell::new(vec![]);
}

// ------ ------
//     Model
// ------ ------

pub struct Model {
    charts: chart::Model,
    tables: table::Model,
    tooltips: tooltip::Model,
    page: page::Model,
}

// ------ ------
//     Init
// ------ ------

fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    let config = Config::load();

    // Links are plain page loads.
    orders.subscribe(|subs::UrlRequested(_, request)| request.unhandled());
    orders.subscribe(Msg::Sink);

    let mut model = Model {
        charts: chart::Model::new(&config),
        tables: table::Model::default(),
        tooltips: tooltip::Model::new(&config),
        page: page::Model::new(&config),
    };

    chart::init(&mut model.charts, &mut orders.proxy(Msg::Chart));
    tooltip::init(&mut model.tooltips, &mut orders.proxy(Msg::Tooltip));
    page::init(&mut model.page, &mut orders.proxy(Msg::Page));

    orders.send_msg(Msg::Table(table::Msg::Init));

    model
}

// ------ ------
//    Update
// ------ ------

/// Notifications between the parts of the page.
#[derive(Clone, Debug)]
pub enum GMsg {
    /// The page fragment is about to be fetched again.
    RefreshStarted,
    /// New markup was put into the page.
    ContentReplaced,
}

pub enum Msg {
    Chart(chart::Msg),
    Table(table::Msg),
    Tooltip(tooltip::Msg),
    Page(page::Msg),
    Sink(GMsg),
}

fn sink(g_msg: GMsg, orders: &mut impl Orders<Msg>) {
    match g_msg {
        GMsg::RefreshStarted => {
            orders.send_msg(Msg::Chart(chart::Msg::ReloadAll));
        }
        GMsg::ContentReplaced => {
            orders
                .send_msg(Msg::Table(table::Msg::Init))
                .send_msg(Msg::Tooltip(tooltip::Msg::Init));
        }
    }
}

fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::Chart(msg) => chart::update(msg, &mut model.charts, &mut orders.proxy(Msg::Chart)),
        Msg::Table(msg) => table::update(msg, &mut model.tables, &mut orders.proxy(Msg::Table)),
        Msg::Tooltip(msg) => tooltip::update(msg, &mut model.tooltips, &mut orders.proxy(Msg::Tooltip)),
        Msg::Page(msg) => page::update(msg, &mut model.page, &mut orders.proxy(Msg::Page)),
        Msg::Sink(g_msg) => sink(g_msg, orders),
    }
}

// ------ ------
//     View
// ------ ------

/// The page is rendered by the server, the app only owns an empty mount point.
fn view(_: &Model) -> Node<Msg> {
    empty![]
}

// ------ ------
//     Start
// ------ ------

/// Hands `msg` to the app on the next turn of the event loop.
///
/// Page scripts may call the exported functions from inside an update,
/// e.g. as knob actions. Messages posted before the app starts are queued.
fn post(msg: Msg) {
    let app = APP.with(|x| x.borrow().clone());

    match app {
        Some(app) => {
            Timeout::new(0, move || app.update(msg)).forget();
        }
        None => PENDING.with(|x| x.borrow_mut().push(msg)),
    }
}

fn start() {
    let root = match document().create_element("div") {
        Ok(x) => x,
        Err(e) => {
            error!("Could not create the app root", e);

            return;
        }
    };

    root.set_id(ROOT_ID);
    root.set_attribute("hidden", "").log_err("app root");

    match document().body() {
        Some(body) => {
            if let Err(e) = body.append_child(&root) {
                error!("Could not mount the app", e);

                return;
            }
        }
        None => {
            error!("Page has no body");

            return;
        }
    }

    let app = App::start(root, init, update, view);

    APP.with(|x| x.replace(Some(app.clone())));

    for msg in PENDING.with(|x| x.take()) {
        app.update(msg);
    }
}

#[wasm_bindgen(start)]
pub fn run() {
    log!("Starting MooseFS GUI...");

    let state = js_sys::Reflect::get(&document(), &JsValue::from_str("readyState"))
        .ok()
        .and_then(|x| x.as_string());

    if state.as_deref() != Some("loading") {
        start();

        return;
    }

    let cb = Closure::once_into_js(start);

    if let Err(e) = document().add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref()) {
        error!("Could not wait for the page", e);
    }
}

// ------ ------
//  Page hooks
// ------ ------

/// A table given as its id or as the element itself.
fn table_element(table: JsValue) -> Option<Element> {
    match table.as_string() {
        Some(id) => document().find(&id),
        None => table.dyn_into().ok(),
    }
}

#[wasm_bindgen(js_name = chartSetRange)]
pub fn chart_set_range(group: String, range: f64) {
    post(Msg::Chart(chart::Msg::GroupRange(group, range)));
}

#[wasm_bindgen(js_name = chartSetCommonScale)]
pub fn chart_set_common_scale(group: String, flag: bool) {
    post(Msg::Chart(chart::Msg::GroupCommonScale(group, flag)));
}

#[wasm_bindgen(js_name = tableSwitchBody)]
pub fn table_switch_body(table: JsValue, n: i32) {
    match table_element(table) {
        Some(el) => post(Msg::Table(table::Msg::SwitchBody(el, i64::from(n)))),
        None => error!("tableSwitchBody: no such table"),
    }
}

#[wasm_bindgen(js_name = tableSwitchDisplay)]
pub fn table_switch_display(table: JsValue, name: String, n: i32) {
    match table_element(table) {
        Some(el) => post(Msg::Table(table::Msg::SwitchDisplay(el, name, i64::from(n)))),
        None => error!("tableSwitchDisplay: no such table"),
    }
}

#[wasm_bindgen(js_name = refreshWithNewParam)]
pub fn refresh_with_new_param(name: String, value: String) {
    post(Msg::Page(page::Msg::Refresh {
        scroll_to_graph_info: false,
        param: Some((name, value)),
    }));
}

#[wasm_bindgen(js_name = showGraphInfo)]
pub fn show_graph_info(section: String, extra: Option<String>) {
    post(Msg::Page(page::Msg::ShowGraphInfo {
        section,
        extra: extra.unwrap_or_default(),
    }));
}

#[wasm_bindgen(js_name = hideGraphInfo)]
pub fn hide_graph_info() {
    post(Msg::Page(page::Msg::HideGraphInfo));
}

#[wasm_bindgen(js_name = scrollToGraph)]
pub fn scroll_to_graph() {
    post(Msg::Page(page::Msg::ScrollToGraph));
}

/// `rotations` are degrees by position, `actions` the function (or source text)
/// run when the knob turns to that position.
#[wasm_bindgen(js_name = rotateNextKnob)]
pub fn rotate_next_knob(id: String, rotations: js_sys::Array, actions: js_sys::Array) {
    let rotations = rotations
        .iter()
        .filter_map(|x| x.as_f64())
        .map(|x| x.round() as i64)
        .collect();

    post(Msg::Page(page::Msg::RotateNextKnob { id, rotations, actions }));
}

#[wasm_bindgen(js_name = toggleHamburger)]
pub fn toggle_hamburger() {
    post(Msg::Page(page::Msg::ToggleHamburger));
}

/// Handle page scripts keep on a chart they created.
#[wasm_bindgen]
pub struct ChartWrapper {
    id: ChartId,
}

#[wasm_bindgen]
impl ChartWrapper {
    #[wasm_bindgen(constructor)]
    pub fn new(
        prefix: String,
        group: String,
        host: String,
        port: String,
        mode: String,
        id: f64,
        show_loading: Option<bool>,
    ) -> ChartWrapper {
        let chart = chart::next_id();

        post(Msg::Chart(chart::Msg::Create {
            id: chart,
            prefix,
            group,
            source: Source {
                host,
                port,
                mode,
                id: id.floor() as i64,
            },
            show_loading: show_loading.unwrap_or(true),
        }));

        ChartWrapper { id: chart }
    }
    #[wasm_bindgen(js_name = setRange)]
    pub fn set_range(&self, range: f64) {
        post(Msg::Chart(chart::Msg::SetRange(self.id, range)));
    }
    #[wasm_bindgen(js_name = setId)]
    pub fn set_id(&self, id: f64) {
        post(Msg::Chart(chart::Msg::SetSeries(self.id, id)));
    }
    #[wasm_bindgen(js_name = setSource)]
    pub fn set_source(&self, host: String, port: String, mode: String) {
        post(Msg::Chart(chart::Msg::SetSource {
            id: self.id,
            host,
            port,
            mode,
            series: None,
        }));
    }
    #[wasm_bindgen(js_name = setSourceAndId)]
    pub fn set_source_and_id(&self, host: String, port: String, mode: String, id: f64) {
        post(Msg::Chart(chart::Msg::SetSource {
            id: self.id,
            host,
            port,
            mode,
            series: Some(id),
        }));
    }
    pub fn reload(&self, full: Option<bool>) {
        post(Msg::Chart(chart::Msg::Reload {
            id: self.id,
            full: full.unwrap_or(true),
        }));
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Page level behavior: periodic fragment refresh, countdowns, knobs,
//! theme, graph drill-downs and the hamburger menu.

mod graph_info;
mod knob;
mod refresh;
mod theme;

use refresh::{fragment_url, parse_refresh_param, timestamp, RefreshTimer};

use crate::{
    config::Config,
    extensions::{DocumentExt as _, LogErrExt as _},
    listener::{listen, Listener},
    storage::{BrowserStore, Store},
    GMsg, GuiError,
};
use seed::{browser::fetch::fetch, prelude::*, *};
use web_sys::{Element, HtmlElement, HtmlInputElement};

const CONTAINER_ID: &str = "container-ajax";
const TIMESTAMP_ID: &str = "refresh-timestamp";
const AUTO_REFRESH_ID: &str = "auto-refresh";
const AUTO_REFRESH_SLIDE_ID: &str = "auto-refresh-slide";
const REFRESH_BUTTON_ID: &str = "refresh-button";
const THEME_TOGGLE_ID: &str = "theme-toggle";
const MENU_ID: &str = "hamburger-menu-content";
const SLIDER_TEXT: &str = "#auto-refresh + .slider .slider-text";
const AUTO_REFRESH_KEY: &str = "auto-refresh";
const REFRESH_FAILED: &str = "<span class=\"ERROR\" data-tt=\"gui_refresh_failed\">failed</span>";

async fn fetch_text(url: String) -> Result<String, GuiError> {
    Ok(fetch(url).await?.check_status()?.text().await?)
}

fn auto_refresh_checkbox() -> Option<HtmlInputElement> {
    document().find(AUTO_REFRESH_ID)
}

fn set_slider_text(text: &str) {
    if let Ok(Some(el)) = document().query_selector(SLIDER_TEXT) {
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            el.set_inner_text(text);
        }
    }
}

fn show_timestamp(html: &str) {
    if let Some(el) = document().find::<Element>(TIMESTAMP_ID) {
        el.set_inner_html(html);
    }
}

fn now() -> String {
    timestamp(&chrono::Local::now())
}

/// Ticks every `.countdown`. Returns whether one of them ran out.
fn tick_countdowns() -> bool {
    let mut expired = false;

    for el in document().select_all(".countdown") {
        let el = match el.dyn_into::<HtmlElement>() {
            Ok(x) => x,
            Err(_) => continue,
        };

        if let Some((text, done)) = number_formatter::countdown_tick(&el.inner_text()) {
            el.set_inner_text(&text);

            expired |= done;
        }
    }

    expired
}

/// Refresh period from the `refresh` query parameter, if there is one.
fn refresh_param() -> Option<u32> {
    let href = window().location().href().ok()?;
    let url = url::Url::parse(&href).ok()?;

    url.query_pairs()
        .find(|(k, _)| k == "refresh")
        .map(|(_, v)| parse_refresh_param(&v))
}

pub struct Model {
    script: String,
    timer: RefreshTimer,
    local: BrowserStore,
    session: BrowserStore,
    graph_listeners: Vec<Listener>,
    _listeners: Vec<Listener>,
}

impl Model {
    pub fn new(config: &Config) -> Self {
        Self {
            script: config.page_script.clone(),
            timer: RefreshTimer::new(config.default_refresh_period),
            local: BrowserStore::local(),
            session: BrowserStore::session(),
            graph_listeners: vec![],
            _listeners: vec![],
        }
    }
}

pub enum Msg {
    Tick,
    AutoRefreshToggled,
    Refresh {
        scroll_to_graph_info: bool,
        param: Option<(String, String)>,
    },
    FragmentLoaded {
        result: Result<String, GuiError>,
        scroll_to_graph_info: bool,
    },
    ShowGraphInfo {
        section: String,
        extra: String,
    },
    GraphInfoLoaded {
        href: String,
        result: Result<String, GuiError>,
        scroll: bool,
    },
    HideGraphInfo,
    ScrollToGraph,
    RotateNextKnob {
        id: String,
        rotations: Vec<i64>,
        actions: js_sys::Array,
    },
    ToggleTheme,
    ToggleHamburger,
}

pub fn init(model: &mut Model, orders: &mut impl Orders<Msg>) {
    theme::init(&model.local).log_err("theme");

    show_timestamp(&now());

    if let Some(period) = refresh_param() {
        model.timer = RefreshTimer::new(period);
        model
            .local
            .set(AUTO_REFRESH_KEY, if period > 0 { "1" } else { "0" });
    }

    let allowed = model.timer.period > 0;

    if let Some(checkbox) = auto_refresh_checkbox() {
        checkbox.set_checked(allowed && model.local.get(AUTO_REFRESH_KEY).as_deref() == Some("1"));

        if allowed {
            set_slider_text(&model.timer.slider_text());
        } else if let Some(slide) = document().find::<Element>(AUTO_REFRESH_SLIDE_ID) {
            slide.class_list().add_1("hidden").log_err("refresh slider");
        }
    }

    let clicks: [(&str, fn() -> Msg); 3] = [
        (AUTO_REFRESH_ID, || Msg::AutoRefreshToggled),
        (REFRESH_BUTTON_ID, || Msg::Refresh {
            scroll_to_graph_info: false,
            param: None,
        }),
        (THEME_TOGGLE_ID, || Msg::ToggleTheme),
    ];

    for (id, msg) in clicks.iter().copied() {
        if let Some(el) = document().find::<Element>(id) {
            if let Some(x) = listen(orders, el.as_ref(), "click", move |_| Some(msg())).log_err("page listener") {
                model._listeners.push(x);
            }
        }
    }

    orders.stream(streams::interval(1000, || Msg::Tick));

    knob::init_all(&model.session).log_err("knobs");

    if let Some(href) = graph_info::href_to_restore(&model.session) {
        load_graph_info(model, href, false, orders);
    }
}

fn tick(model: &mut Model, orders: &mut impl Orders<Msg>) {
    let enabled = auto_refresh_checkbox().map(|x| x.checked()).unwrap_or(false);

    let tick = model.timer.tick(enabled);

    set_slider_text(&tick.slider_text);

    if tick_countdowns() || tick.due {
        refresh(model, false, None, orders);
    }
}

fn refresh(
    model: &mut Model,
    scroll_to_graph_info: bool,
    param: Option<(String, String)>,
    orders: &mut impl Orders<Msg>,
) {
    orders.notify(GMsg::RefreshStarted);

    let href = match window().location().href() {
        Ok(x) => x,
        Err(e) => {
            error!("Could not read the page location", e);

            return;
        }
    };

    let url = match param {
        Some((name, value)) => refresh::fragment_url_with(&href, &model.script, &name, &value)
            .log_err("refresh url")
            .flatten(),
        None => fragment_url(&href, &model.script),
    };

    if let Some(url) = url {
        orders.perform_cmd(async move {
            Msg::FragmentLoaded {
                result: fetch_text(url).await,
                scroll_to_graph_info,
            }
        });
    }
}

fn load_graph_info(model: &mut Model, href: String, scroll: bool, orders: &mut impl Orders<Msg>) {
    if graph_info::container().is_none() {
        return;
    }

    graph_info::remember_href(&model.session, &href);

    orders.perform_cmd(async move {
        let result = fetch_text(href.clone()).await;

        Msg::GraphInfoLoaded { href, result, scroll }
    });
}

fn replace_content(
    model: &mut Model,
    html: &str,
    scroll_to_graph_info: bool,
    orders: &mut impl Orders<Msg>,
) -> Result<(), GuiError> {
    let container: Element = document().require(CONTAINER_ID)?;

    let old_info = graph_info::container().map(|x| x.inner_html());

    container.set_inner_html(html);

    // Keep showing the previous drill-down until its refresh arrives.
    let new_info = graph_info::container();

    if let (Some(new_info), Some(old_info)) = (new_info.as_ref(), old_info) {
        new_info.set_inner_html(&old_info);
    }

    show_timestamp(&now());

    if let (Some(_), Some(href)) = (new_info, graph_info::stored_href(&model.session)) {
        load_graph_info(model, href, scroll_to_graph_info, orders);
    }

    knob::init_all(&model.session)?;

    orders.notify(GMsg::ContentReplaced);

    Ok(())
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::Tick => tick(model, orders),
        Msg::AutoRefreshToggled => {
            if let Some(checkbox) = auto_refresh_checkbox() {
                model
                    .local
                    .set(AUTO_REFRESH_KEY, if checkbox.checked() { "1" } else { "0" });

                tick(model, orders);
            }
        }
        Msg::Refresh {
            scroll_to_graph_info,
            param,
        } => refresh(model, scroll_to_graph_info, param, orders),
        Msg::FragmentLoaded {
            result,
            scroll_to_graph_info,
        } => match result {
            Ok(html) => {
                log!("Page fragment refreshed");

                replace_content(model, &html, scroll_to_graph_info, orders).log_err("page refresh");
            }
            Err(e) => {
                error!(format!("Page refresh failed: {}", e));

                show_timestamp(REFRESH_FAILED);

                orders.notify(GMsg::ContentReplaced);
            }
        },
        Msg::ShowGraphInfo { section, extra } => {
            if graph_info::container().is_none() {
                return;
            }

            let href = match window().location().href() {
                Ok(x) => x,
                Err(e) => {
                    error!("Could not read the page location", e);

                    return;
                }
            };

            if let Some(url) = refresh::graph_info_url(&href, &section, &extra).log_err("graph info url") {
                graph_info::remember_href(&model.session, &url);
            }

            refresh(model, true, None, orders);
        }
        Msg::GraphInfoLoaded { href, result, scroll } => match result {
            Ok(html) => {
                // A drill-down closed while loading stays closed.
                if graph_info::stored_href(&model.session).as_deref() != Some(href.as_str()) {
                    return;
                }

                model.graph_listeners = graph_info::replace(&html, orders)
                    .log_err("graph info")
                    .unwrap_or_default();

                knob::init_all(&model.session).log_err("knobs");

                orders.notify(GMsg::ContentReplaced);

                if scroll {
                    graph_info::scroll_to_info();
                }
            }
            Err(e) => error!(format!("Could not load {}: {}", href, e)),
        },
        Msg::HideGraphInfo => {
            graph_info::forget_href(&model.session);
            model.graph_listeners.clear();

            graph_info::clear().log_err("graph info");
        }
        Msg::ScrollToGraph => graph_info::scroll_to_graph(),
        Msg::RotateNextKnob {
            id,
            rotations,
            actions,
        } => {
            knob::rotate_next(&id, &rotations, &actions, &model.session).log_err("knob");
        }
        Msg::ToggleTheme => {
            theme::toggle(&model.local).log_err("theme");
        }
        Msg::ToggleHamburger => {
            if let Some(menu) = document().find::<Element>(MENU_ID) {
                menu.class_list().toggle("active").log_err("hamburger");
            }
        }
    }
}

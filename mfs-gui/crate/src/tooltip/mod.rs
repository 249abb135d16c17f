// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Hover tooltips for elements carrying `data-tt*` attributes.
//!
//! Descriptors named by `data-tt` come from the descriptor file loaded once at
//! start. Clicking the tooltip locks it open until the next click elsewhere.

mod descriptor;
mod position;

use descriptor::{Sources, TooltipMap};

use crate::{
    config::Config,
    extensions::{DocumentExt as _, ElementExt as _, LogErrExt as _},
    listener::{listen, Listener},
    storage::{BrowserStore, Store},
    GuiError,
};
use position::Anchor;
use seed::{browser::fetch::fetch, prelude::*, *};
use web_sys::{Element, HtmlElement, HtmlInputElement};

const TOOLTIP_ID: &str = "tooltip";
const HELP_TOGGLE_ID: &str = "tt-onoff";
const HELP_KEY: &str = "showHelpTooltips";

const LOCKED: &str = "locked";
const VISIBLE: &str = "tooltip-visible";
const POSITIONED: &str = "positioned";
const ACTIVE: &str = "active";

const TAGGED: &str = "[data-tt], [data-tt-help], [data-tt-info], [data-tt-warning], [data-tt-error]";

fn tooltip() -> Option<HtmlElement> {
    document().find(TOOLTIP_ID)
}

fn is_locked(el: &Element) -> bool {
    el.has_class(LOCKED)
}

fn sources(el: &Element) -> Sources {
    Sources {
        ids: el.get_attribute("data-tt"),
        error: el.get_attribute("data-tt-error"),
        warning: el.get_attribute("data-tt-warning"),
        info: el.get_attribute("data-tt-info"),
        help: el.get_attribute("data-tt-help"),
    }
}

/// Whether help tooltips are shown. Only an explicit `'0'` turns them off.
fn help_enabled(store: &impl Store) -> bool {
    store.get(HELP_KEY).as_deref() != Some("0")
}

async fn load_descriptors(url: String) -> Result<TooltipMap, GuiError> {
    let text = fetch(url).await?.check_status()?.text().await?;

    TooltipMap::from_json(&text)
}

pub struct Model {
    map: Option<TooltipMap>,
    show_help: bool,
    over_tooltip: bool,
    over_element: bool,
    help_path: String,
    hide_delay: u32,
    store: BrowserStore,
    bound: Vec<(Element, [Listener; 3])>,
    accordion: Vec<Listener>,
    _listeners: Vec<Listener>,
}

impl Model {
    pub fn new(config: &Config) -> Self {
        Self {
            map: None,
            show_help: true,
            over_tooltip: false,
            over_element: false,
            help_path: config.help_path.clone(),
            hide_delay: config.tooltip_hide_delay_ms,
            store: BrowserStore::local(),
            bound: vec![],
            accordion: vec![],
            _listeners: vec![],
        }
    }
}

pub enum Msg {
    Loaded(Result<TooltipMap, GuiError>),
    /// Binds elements that appeared since the last call.
    Init,
    ToggleHelp,
    Lock,
    Unlock,
    OverTooltip(bool),
    ElementEnter(Element),
    ElementLeave,
    ElementClick,
    DelayedHide,
    AccordionClick(Element),
}

pub fn init(model: &mut Model, orders: &mut impl Orders<Msg>) {
    model.show_help = help_enabled(&model.store);

    if let Some(checkbox) = document().find::<HtmlInputElement>(HELP_TOGGLE_ID) {
        checkbox.set_checked(model.show_help);

        if let Some(x) = listen(orders, checkbox.as_ref(), "click", |_| Some(Msg::ToggleHelp)).log_err("help toggle") {
            model._listeners.push(x);
        }
    }

    let url = model.help_path.clone();

    orders.perform_cmd(async move { Msg::Loaded(load_descriptors(url).await) });
}

fn bind_stack(model: &mut Model, orders: &mut impl Orders<Msg>) -> Result<(), GuiError> {
    let el = match tooltip() {
        Some(x) => x,
        None => return Ok(()),
    };

    model._listeners.push(listen(orders, document().as_ref(), "click", |ev| {
        let el = tooltip()?;

        if is_locked(&el) && el.has_class(VISIBLE) {
            ev.stop_propagation();

            Some(Msg::Unlock)
        } else {
            None
        }
    })?);

    model._listeners.push(listen(orders, el.as_ref(), "mouseenter", |_| {
        Some(Msg::OverTooltip(true))
    })?);

    model._listeners.push(listen(orders, el.as_ref(), "mouseleave", |_| {
        Some(Msg::OverTooltip(false))
    })?);

    model._listeners.push(listen(orders, el.as_ref(), "click", |ev| {
        ev.stop_propagation();

        Some(Msg::Lock)
    })?);

    Ok(())
}

fn bind_tags(model: &mut Model, orders: &mut impl Orders<Msg>) -> Result<(), GuiError> {
    model.bound.retain(|(el, _)| el.is_connected());

    for el in document().select_all(TAGGED) {
        if model.bound.iter().any(|(x, _)| x.is_same_node(Some(&*el))) {
            continue;
        }

        let target = el.clone();

        let listeners = [
            listen(orders, el.as_ref(), "mouseenter", move |_| {
                Some(Msg::ElementEnter(target.clone()))
            })?,
            listen(orders, el.as_ref(), "mouseleave", |_| Some(Msg::ElementLeave))?,
            listen(orders, el.as_ref(), "click", |_| Some(Msg::ElementClick))?,
        ];

        model.bound.push((el, listeners));
    }

    Ok(())
}

/// Hides the tooltip unless it is locked. Returns whether it was hidden.
fn hide() -> bool {
    let el = match tooltip() {
        Some(x) => x,
        None => return false,
    };

    if is_locked(&el) {
        return false;
    }

    let classes = el.class_list();
    classes.remove_2(VISIBLE, POSITIONED).log_err("tooltip hide");

    true
}

fn unlock_and_hide() {
    if let Some(el) = tooltip() {
        el.class_list().remove_1(LOCKED).log_err("tooltip unlock");
    }

    hide();
}

fn show(model: &mut Model, target: &Element, orders: &mut impl Orders<Msg>) -> Result<(), GuiError> {
    let el = match tooltip() {
        Some(x) => x,
        None => return Ok(()),
    };

    if is_locked(&el) && el.has_class(VISIBLE) {
        return Ok(());
    }

    let map = match model.map.as_ref() {
        Some(x) => x,
        None => return Ok(()),
    };

    let html = descriptor::render(&descriptor::resolve(map, &sources(target), model.show_help));

    el.set_inner_html(&html);

    if html.is_empty() {
        hide();

        return Ok(());
    }

    let size = el.get_bounding_client_rect();
    let rect = target.get_bounding_client_rect();
    let viewport_width = window().inner_width()?.as_f64().unwrap_or_default();

    let (left, top) = position::place(
        Anchor {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            bottom: rect.bottom(),
        },
        (size.width(), size.height()),
        viewport_width,
    );

    let style = el.style();
    style.set_property("left", &format!("{}px", left))?;
    style.set_property("top", &format!("{}px", top))?;
    style.remove_property("bottom")?;
    style.remove_property("right")?;

    el.class_list().add_1(VISIBLE)?;

    model.accordion = el
        .select_all(".accordion-header")
        .into_iter()
        .map(|header| {
            let target = header.clone();

            listen(orders, header.as_ref(), "click", move |_| {
                Some(Msg::AccordionClick(target.clone()))
            })
        })
        .collect::<Result<_, _>>()?;

    Ok(())
}

fn toggle_accordion(header: &Element) -> Result<(), GuiError> {
    let item = match header.parent_element() {
        Some(x) => x,
        None => return Ok(()),
    };

    let was_active = item.has_class(ACTIVE);

    for x in document().select_all(".accordion-item.active") {
        x.class_list().remove_1(ACTIVE)?;
    }

    if !was_active {
        item.class_list().add_1(ACTIVE)?;
    }

    Ok(())
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::Loaded(result) => {
            let map = result.unwrap_or_else(|e| {
                error!(format!("Could not load tooltip descriptions: {}", e));

                TooltipMap::default()
            });

            log!(format!("Loaded {} tooltip descriptions", map.len()));

            model.map = Some(map);

            bind_stack(model, orders).log_err("tooltip setup");
            bind_tags(model, orders).log_err("tooltip setup");
        }
        Msg::Init => {
            if model.map.is_some() {
                bind_tags(model, orders).log_err("tooltip setup");
            }
        }
        Msg::ToggleHelp => {
            model.show_help = !model.show_help;
            model
                .store
                .set(HELP_KEY, if model.show_help { "1" } else { "0" });
        }
        Msg::Lock => {
            if let Some(el) = tooltip() {
                el.class_list().add_1(LOCKED).log_err("tooltip lock");
            }
        }
        Msg::Unlock => unlock_and_hide(),
        Msg::OverTooltip(over) => {
            model.over_tooltip = over;

            if !over {
                hide();
            }
        }
        Msg::ElementEnter(el) => {
            model.over_element = true;

            show(model, &el, orders).log_err("tooltip");
        }
        Msg::ElementLeave => {
            orders.perform_cmd(cmds::timeout(model.hide_delay, || Msg::DelayedHide));

            model.over_element = false;
        }
        Msg::ElementClick => {
            if tooltip().map(|x| is_locked(&x)).unwrap_or(false) {
                unlock_and_hide();
            }
        }
        Msg::DelayedHide => {
            if !model.over_tooltip && !model.over_element {
                hide();
            }
        }
        Msg::AccordionClick(header) => {
            toggle_accordion(&header).log_err("tooltip accordion");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;

    #[test]
    fn test_help_enabled() {
        assert!(help_enabled(&MemoryStore::default()));
        assert!(help_enabled(&MemoryStore::with(&[(HELP_KEY, "1")])));
        assert!(help_enabled(&MemoryStore::with(&[(HELP_KEY, "false")])));
        assert!(!help_enabled(&MemoryStore::with(&[(HELP_KEY, "0")])));
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use crate::{extensions::LogErrExt as _, GuiError};
use seed::prelude::*;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget};

/// An event listener that is removed from its target when dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(target: &EventTarget, kind: &'static str, f: impl FnMut(Event) + 'static) -> Result<Self, GuiError> {
        let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);

        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;

        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
            .log_err("remove listener");
    }
}

/// Listens for `kind` on `target` and feeds whatever `handler` maps the event to into the app.
///
/// The handler runs synchronously inside the browser callback, so it may call
/// `stop_propagation` or `prevent_default` before the message is processed.
pub fn listen<Ms: 'static>(
    orders: &impl Orders<Ms>,
    target: &EventTarget,
    kind: &'static str,
    handler: impl Fn(Event) -> Option<Ms> + 'static,
) -> Result<Listener, GuiError> {
    let (app, msg_mapper) = (orders.clone_app(), orders.msg_mapper());

    Listener::new(target, kind, move |ev| {
        if let Some(msg) = handler(ev) {
            app.update(msg_mapper(msg));
        }
    })
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_listener_is_removed_on_drop() {
        let el: EventTarget = seed::document().create_element("div").unwrap().into();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        let listener = Listener::new(&el, "click", move |_| h.set(h.get() + 1)).unwrap();

        el.dispatch_event(&Event::new("click").unwrap()).unwrap();
        drop(listener);
        el.dispatch_event(&Event::new("click").unwrap()).unwrap();

        assert_eq!(hits.get(), 1);
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use super::{ChartId, Msg};
use crate::{
    listener::{listen, Listener},
    GuiError,
};
use seed::{prelude::*, *};
use web_sys::{EventTarget, MouseEvent};

/// A pan gesture in progress.
///
/// Holds the listeners that follow the pointer; dropping it ends the gesture.
pub(crate) struct ActiveDrag {
    pub id: ChartId,
    start_x: i32,
    _listeners: [Listener; 2],
}

impl ActiveDrag {
    pub fn begin(
        orders: &impl Orders<Msg>,
        id: ChartId,
        start_x: i32,
        plot: &EventTarget,
    ) -> Result<Self, GuiError> {
        let moved = listen(orders, plot, "mousemove", |ev| {
            let ev = ev.dyn_into::<MouseEvent>().ok()?;

            ev.stop_propagation();
            ev.prevent_default();

            // Button released outside the window.
            if ev.buttons() == 0 {
                Some(Msg::DragEnd(ev.client_x()))
            } else {
                Some(Msg::DragMove(ev.client_x()))
            }
        })?;

        let released = listen(orders, document().as_ref(), "mouseup", |ev| {
            let ev = ev.dyn_into::<MouseEvent>().ok()?;

            Some(Msg::DragEnd(ev.client_x()))
        })?;

        Ok(Self {
            id,
            start_x,
            _listeners: [moved, released],
        })
    }
    /// Horizontal distance travelled since the gesture started.
    pub fn delta(&self, client_x: i32) -> i64 {
        i64::from(client_x) - i64::from(self.start_x)
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Value readout and crosshair following the pointer over a plot.

use crate::{
    extensions::{DocumentExt as _, ElementExt as _},
    GuiError,
};
use seed::{prelude::*, *};
use web_sys::{HtmlElement, MouseEvent};

/// Class marking elements that carry a chart readout.
pub const CHART_CLASS: &str = "CHARTJSC";

const TOOLTIP_ID: &str = "charttooltip";
const LINE_UP_ID: &str = "charthlineup";
const LINE_DOWN_ID: &str = "charthlinedown";

/// Distance in pixels from the right edge of a plot element of
/// `client_width` to the pointer at `client_x`.
pub fn column_offset(client_width: i32, client_x: i32, rect_left: f64) -> i64 {
    i64::from(client_width) - (f64::from(client_x) - rect_left) as i64 - 1
}

#[derive(Debug, PartialEq)]
pub struct Placement {
    /// Readout `(left, top)`.
    pub tooltip: (f64, f64),
    /// Crosshair segment above the pointer `(left, top, height)`.
    pub up: (f64, f64, f64),
    /// Crosshair segment below the pointer.
    pub down: (f64, f64, f64),
}

/// Places the readout beside the pointer, away from the nearer page edge.
pub fn place(
    page: (f64, f64),
    client_x: f64,
    body_width: f64,
    element_top: f64,
    element_height: f64,
    tooltip_width: f64,
) -> Placement {
    let (page_x, page_y) = page;

    let uh = page_y - element_top - 1.0;
    let dh = element_height - uh - 2.0;

    let left = if client_x < body_width / 2.0 {
        page_x + 12.0
    } else {
        page_x - 16.0 - tooltip_width
    };

    Placement {
        tooltip: (left, page_y),
        up: (page_x, element_top, uh),
        down: (page_x, page_y + 2.0, dh),
    }
}

/// The readout and crosshair elements of the page.
pub(crate) struct Crosshair {
    tooltip: HtmlElement,
    up: HtmlElement,
    down: HtmlElement,
}

impl Crosshair {
    pub fn find() -> Option<Self> {
        let doc = document();

        Some(Self {
            tooltip: doc.find(TOOLTIP_ID)?,
            up: doc.find(LINE_UP_ID)?,
            down: doc.find(LINE_DOWN_ID)?,
        })
    }
    fn display(&self, value: &str) -> Result<(), GuiError> {
        for el in [&self.tooltip, &self.up, &self.down] {
            el.set_style("display", value)?;
        }

        Ok(())
    }
    pub fn hide(&self) -> Result<(), GuiError> {
        self.display("none")
    }
    /// Shows `text` for the pointer of `ev` hovering `target`.
    pub fn show(&self, text: &str, target: &HtmlElement, ev: &MouseEvent) -> Result<(), GuiError> {
        if text.is_empty() {
            return self.hide();
        }

        self.display("block")?;
        self.tooltip.set_inner_html(text);

        let body = document()
            .body()
            .ok_or_else(|| GuiError::MissingElement("body".into()))?;

        let body_rect = body.get_bounding_client_rect();
        let rect = target.get_bounding_client_rect();

        let p = place(
            (f64::from(ev.page_x()), f64::from(ev.page_y())),
            f64::from(ev.client_x()),
            body_rect.width(),
            rect.top() - body_rect.top(),
            f64::from(target.client_height()),
            f64::from(self.tooltip.client_width()),
        );

        let px = |x: f64| format!("{}px", x);

        self.up.set_style("left", &px(p.up.0))?;
        self.up.set_style("top", &px(p.up.1))?;
        self.up.set_style("height", &px(p.up.2))?;
        self.down.set_style("left", &px(p.down.0))?;
        self.down.set_style("top", &px(p.down.1))?;
        self.down.set_style("height", &px(p.down.2))?;
        self.tooltip.set_style("left", &px(p.tooltip.0))?;
        self.tooltip.set_style("top", &px(p.tooltip.1))?;

        Ok(())
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! [`Painter`] backed by an offscreen canvas.

use super::{
    font::{self, GLYPH_HEIGHT, GLYPH_WIDTH},
    paint::{Fill, Gradient, Painter, OFFSET_Y},
    ticks::Dash,
};
use crate::{extensions::LogErrExt as _, GuiError};
use seed::{prelude::*, *};
use std::collections::HashMap;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

const STROKE: &str = "#000000";

/// A detached canvas the chart is painted on before being turned into a background image.
pub struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, GuiError> {
        let canvas: HtmlCanvasElement = document()
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| GuiError::UnexpectedType("HtmlCanvasElement"))?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| GuiError::Js("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| GuiError::UnexpectedType("CanvasRenderingContext2d"))?;

        let surface = Self { canvas, ctx };

        surface.resize(width, height);

        Ok(surface)
    }
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
    /// A painter drawing onto this surface, gradients spanning a plot `charty` pixels high.
    pub fn painter<'a>(&'a self, font: &'a HtmlImageElement, charty: u32) -> CanvasPainter<'a> {
        CanvasPainter {
            surface: self,
            font,
            charty: f64::from(charty),
            gradients: HashMap::new(),
        }
    }
    pub fn to_data_url(&self) -> Result<String, GuiError> {
        Ok(self.canvas.to_data_url()?)
    }
}

pub struct CanvasPainter<'a> {
    surface: &'a Surface,
    font: &'a HtmlImageElement,
    charty: f64,
    gradients: HashMap<Gradient, CanvasGradient>,
}

impl<'a> CanvasPainter<'a> {
    fn gradient(&mut self, gradient: Gradient) -> Result<CanvasGradient, GuiError> {
        if let Some(x) = self.gradients.get(&gradient) {
            return Ok(x.clone());
        }

        let grd = self
            .surface
            .ctx
            .create_linear_gradient(0.0, OFFSET_Y, 0.0, OFFSET_Y + self.charty);

        for (offset, color) in gradient.stops() {
            grd.add_color_stop(*offset as f32, color)?;
        }

        self.gradients.insert(gradient, grd.clone());

        Ok(grd)
    }
}

impl<'a> Painter for CanvasPainter<'a> {
    fn clear(&mut self) {
        let canvas = &self.surface.canvas;

        self.surface.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(canvas.width()),
            f64::from(canvas.height()),
        );
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Fill) {
        match fill {
            Fill::Color(c) => self.surface.ctx.set_fill_style_str(c),
            Fill::Gradient(g) => match self.gradient(g) {
                Ok(grd) => self.surface.ctx.set_fill_style_canvas_gradient(&grd),
                Err(e) => {
                    error!(format!("Could not create gradient: {}", e));

                    return;
                }
            },
        }

        self.surface.ctx.fill_rect(x, y, w, h);
    }
    fn line(&mut self, from: (f64, f64), to: (f64, f64), dash: Dash, dash_offset: f64) {
        let ctx = &self.surface.ctx;

        let segments: js_sys::Array = dash
            .segments()
            .iter()
            .map(|x| JsValue::from_f64(*x))
            .collect();

        ctx.set_line_dash(&segments).log_err("chart dash");
        ctx.set_line_dash_offset(dash_offset);
        ctx.set_stroke_style_str(STROKE);
        ctx.set_line_width(1.0);

        ctx.begin_path();
        ctx.move_to(from.0, from.1);
        ctx.line_to(to.0, to.1);
        ctx.stroke();
    }
    fn text(&mut self, x: f64, y: f64, text: &str) {
        // Labels are repainted once the sprite sheet finishes loading.
        if !self.font.complete() || self.font.natural_width() == 0 {
            return;
        }

        for (sx, dx) in font::layout(text) {
            let drawn = self
                .surface
                .ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    self.font,
                    sx,
                    0.0,
                    GLYPH_WIDTH,
                    GLYPH_HEIGHT,
                    x + dx,
                    y,
                    GLYPH_WIDTH,
                    GLYPH_HEIGHT,
                )
                .log_err("chart label");

            if drawn.is_none() {
                break;
            }
        }
    }
}

/// Loads the label sprite sheet.
pub fn font_image() -> Result<HtmlImageElement, GuiError> {
    let img = HtmlImageElement::new()?;

    img.set_src(font::SPRITE);

    Ok(img)
}

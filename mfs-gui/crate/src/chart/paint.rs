// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Drawing of one chart onto its three surfaces.
//!
//! The drawing code only talks to the [`Painter`] trait. The browser
//! implementation lives in `canvas.rs`, tests use a recording painter.

use super::{
    scale::{Scale, ROW_HEIGHT},
    ticks::Dash,
    ChartSeries, Resolution,
};
use number_formatter::format_label;

/// Width of the left axis surface, which is also where the plot starts.
pub const OFFSET_X: f64 = 43.0;
/// Gap above the plot.
pub const OFFSET_Y: f64 = 6.0;
pub const RIGHT_WIDTH: u32 = 7;
/// Narrowest plot surface, in pixels (samples).
pub const MIN_PLOT_WIDTH: u32 = 4095;

const BACKGROUND: &str = "#bbdbe5";
const FRAME: &str = "#000000";

/// Vertical gradients spanning the plot area.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Gradient {
    NoData,
    /// Layer `layer` (zero based, bottom first) of a stack of `series`.
    Layer { series: usize, layer: usize },
}

impl Gradient {
    /// Color stops from the top of the plot to the bottom.
    pub fn stops(self) -> &'static [(f64, &'static str)] {
        match self {
            Self::NoData => &[(0.0, "#F0F0F0"), (1.0, "#A0A0A0")],
            Self::Layer { series: 1, .. } => &[
                (0.0, "#01042C"),
                (0.333, "#152F5F"),
                (0.666, "#2386B4"),
                (1.0, "#04ECF1"),
            ],
            Self::Layer { series: 2, layer: 0 } => {
                &[(0.0, "#01042C"), (0.666, "#152F5F"), (1.0, "#1C5A89")]
            }
            Self::Layer { series: 2, .. } => {
                &[(0.0, "#1C5A89"), (0.333, "#2386B4"), (1.0, "#04ECF1")]
            }
            Self::Layer { layer: 0, .. } => &[(0.0, "#01042C"), (1.0, "#152F5F")],
            Self::Layer { layer: 1, .. } => &[(0.0, "#152F5F"), (1.0, "#2386B4")],
            Self::Layer { .. } => &[(0.0, "#2386B4"), (1.0, "#04ECF1")],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    Color(&'static str),
    Gradient(Gradient),
}

/// A drawing surface.
pub trait Painter {
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Fill);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), dash: Dash, dash_offset: f64);
    fn text(&mut self, x: f64, y: f64, text: &str);
}

/// Pixel dimensions of a chart.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Geometry {
    /// Plot width, one pixel per sample.
    pub chartx: u32,
    /// Plot height, a multiple of the row height.
    pub charty: u32,
}

impl Geometry {
    /// Derives the plot size from the client size of the visible plot element.
    pub fn from_client(width: i32, height: i32) -> Self {
        Self {
            chartx: (u32::try_from(width).unwrap_or(0) * 2).max(MIN_PLOT_WIDTH),
            charty: Self::plot_height(height),
        }
    }
    pub fn plot_height(client_height: i32) -> u32 {
        let h = u32::try_from(client_height - 20).unwrap_or(0);

        h / ROW_HEIGHT * ROW_HEIGHT
    }
    /// Height of every surface.
    pub fn surface_height(&self) -> u32 {
        self.charty + 20
    }
}

/// Everything needed to draw one chart.
pub struct Plot<'a> {
    pub series: &'a ChartSeries,
    pub range: Resolution,
    pub geometry: Geometry,
    pub scale: Scale,
    /// Unit suffix of the value labels.
    pub suffix: &'a str,
}

/// One pixel column of the plot.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    NoData,
    /// Cumulative bar heights in pixels, bottom layer first.
    Bar(Vec<f64>),
}

impl<'a> Plot<'a> {
    /// Plan of the column showing sample `idx`.
    pub fn column(&self, idx: usize) -> Column {
        let charty = f64::from(self.geometry.charty);

        match self.series.column(idx) {
            None => Column::NoData,
            Some(values) => {
                let mut sum = 0.0;

                Column::Bar(
                    values
                        .into_iter()
                        .map(|x| {
                            sum += x;

                            (sum * charty / self.scale.dmax).ceil()
                        })
                        .collect(),
                )
            }
        }
    }
    /// Draws the chart onto the left axis, plot and right axis surfaces.
    pub fn paint(&self, left: &mut impl Painter, center: &mut impl Painter, right: &mut impl Painter) {
        left.clear();
        center.clear();
        right.clear();

        self.paint_data(center);
        self.paint_frame(left, center, right);

        let hoff = self.paint_time_axis(center);

        self.paint_value_axis(left, center, right, hoff);
    }
    fn paint_data(&self, center: &mut impl Painter) {
        let chartx = self.geometry.chartx;
        let charty = f64::from(self.geometry.charty);
        let count = self.series.series_count();

        center.fill_rect(0.0, OFFSET_Y, f64::from(chartx), charty, Fill::Color(BACKGROUND));

        for i in 0..chartx {
            let x = f64::from(chartx - i - 1);

            match self.column(i as usize) {
                Column::NoData => {
                    center.fill_rect(x, OFFSET_Y, 1.0, charty, Fill::Gradient(Gradient::NoData))
                }
                Column::Bar(heights) => {
                    for (layer, h) in heights.iter().enumerate().rev() {
                        center.fill_rect(
                            x,
                            charty + OFFSET_Y,
                            1.0,
                            -h,
                            Fill::Gradient(Gradient::Layer {
                                series: count,
                                layer,
                            }),
                        );
                    }
                }
            }
        }
    }
    fn paint_frame(&self, left: &mut impl Painter, center: &mut impl Painter, right: &mut impl Painter) {
        let chartx = f64::from(self.geometry.chartx);
        let charty = f64::from(self.geometry.charty);
        let bottom = charty + OFFSET_Y;

        center.line((0.0, bottom + 0.5), (chartx, bottom + 0.5), Dash::Solid, 0.0);
        left.line(
            (OFFSET_X - 0.5, bottom + 3.0),
            (OFFSET_X - 0.5, OFFSET_Y - 3.0),
            Dash::Solid,
            0.0,
        );
        right.line((0.5, bottom + 3.0), (0.5, OFFSET_Y - 3.0), Dash::Solid, 0.0);
    }
    /// Draws the vertical grid and date labels, returns the dash offset for the horizontal grid.
    fn paint_time_axis(&self, center: &mut impl Painter) -> f64 {
        let bottom = f64::from(self.geometry.charty) + OFFSET_Y;
        let grid = self
            .range
            .grid(self.series.timestamp, i64::from(self.geometry.chartx));

        for line in &grid.lines {
            let x = line.x as f64 + 0.5;

            if line.mark {
                center.line((x, bottom + 3.0), (x, bottom), Dash::Solid, 0.0);
            }

            center.line((x, bottom), (x, OFFSET_Y), line.dash, line.dash.offset());
        }

        for label in &grid.labels {
            center.text(label.x as f64, bottom + 4.0, &label.text);
        }

        grid.hoff as f64
    }
    fn paint_value_axis(
        &self,
        left: &mut impl Painter,
        center: &mut impl Painter,
        right: &mut impl Painter,
        hoff: f64,
    ) {
        let chartx = f64::from(self.geometry.chartx);
        let charty = self.geometry.charty;
        let lshift = 6.0 * self.suffix.chars().count() as f64;
        let mut value = 0.0;

        for i in (0..=charty).step_by(ROW_HEIGHT as usize) {
            let y = f64::from(i) + 0.5 + OFFSET_Y;

            left.text(
                OFFSET_X - 28.0 - lshift,
                OFFSET_Y + f64::from(charty - i) - 3.0,
                &format!("{}{}", format_label(value, self.scale.mode), self.suffix),
            );
            value += self.scale.step;

            left.line((OFFSET_X - 3.0, y), (OFFSET_X, y), Dash::Solid, 0.0);

            if i < charty {
                center.line((0.0, y), (chartx, y), Dash::Dotted, hoff);
            } else {
                right.line((0.5, y), (3.5, y), Dash::Solid, 0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixtures, Op, Recorder};

    fn plot<'a>(series: &'a ChartSeries, geometry: Geometry) -> Plot<'a> {
        let max = series.find_max(geometry.chartx as usize);

        Plot {
            series,
            range: Resolution::OneMinute,
            geometry,
            scale: Scale::fit(max, series.multiplier, series.divisor, geometry.charty),
            suffix: "",
        }
    }

    #[test]
    fn test_geometry_from_client() {
        assert_eq!(
            Geometry::from_client(1000, 135),
            Geometry {
                chartx: 4095,
                charty: 100
            }
        );
        assert_eq!(Geometry::from_client(3000, 20).chartx, 6000);
        assert_eq!(Geometry::from_client(0, 5).charty, 0);
    }

    #[test]
    fn test_hole_column_is_no_data() {
        let series = fixtures::series(&[Some(10.0), None, Some(5.0)]);
        let p = plot(&series, Geometry::from_client(100, 120));

        assert_eq!(p.scale.dmax, 10.0);
        assert_eq!(p.column(0), Column::Bar(vec![100.0]));
        assert_eq!(p.column(1), Column::NoData);
        assert_eq!(p.column(2), Column::Bar(vec![50.0]));
    }

    #[test]
    fn test_stacked_column_is_cumulative() {
        let mut series = fixtures::series(&[Some(1.0), Some(1.0)]);
        series.dataarr2 = Some(vec![Some(3.0), None]);

        let p = plot(&series, Geometry::from_client(100, 120));

        assert_eq!(p.column(0), Column::Bar(vec![25.0, 100.0]));
        assert_eq!(p.column(1), Column::NoData, "no partial bars");
    }

    #[test]
    fn test_paint_places_most_recent_sample_rightmost() {
        let series = fixtures::series(&[Some(10.0), None]);
        let geometry = Geometry::from_client(100, 120);
        let p = plot(&series, geometry);

        let (mut l, mut c, mut r) = (Recorder::default(), Recorder::default(), Recorder::default());

        p.paint(&mut l, &mut c, &mut r);

        let rightmost = f64::from(geometry.chartx - 1);

        assert!(c.ops.contains(&Op::Fill(
            rightmost,
            f64::from(geometry.charty) + OFFSET_Y,
            1.0,
            -100.0,
            Fill::Gradient(Gradient::Layer { series: 1, layer: 0 })
        )));
        assert!(c.ops.contains(&Op::Fill(
            rightmost - 1.0,
            OFFSET_Y,
            1.0,
            100.0,
            Fill::Gradient(Gradient::NoData)
        )));
    }

    #[test]
    fn test_value_labels_ascend_upwards() {
        let series = fixtures::series(&[Some(10.0)]);
        let p = plot(&series, Geometry::from_client(100, 120));

        let (mut l, mut c, mut r) = (Recorder::default(), Recorder::default(), Recorder::default());

        p.paint(&mut l, &mut c, &mut r);

        let labels: Vec<(f64, String)> = l
            .ops
            .iter()
            .filter_map(|x| match x {
                Op::Text(_, y, t) => Some((*y, t.clone())),
                _ => None,
            })
            .collect();

        assert_eq!(
            labels,
            vec![
                (103.0, " 0.0".to_string()),
                (83.0, " 2.0".into()),
                (63.0, " 4.0".into()),
                (43.0, " 6.0".into()),
                (23.0, " 8.0".into()),
                (3.0, "10.0".into()),
            ]
        );
    }

    #[test]
    fn test_gradients_per_stack() {
        assert_eq!(Gradient::Layer { series: 1, layer: 0 }.stops().len(), 4);
        assert_eq!(Gradient::Layer { series: 2, layer: 1 }.stops()[0].1, "#1C5A89");
        assert_eq!(Gradient::Layer { series: 3, layer: 2 }.stops()[1].1, "#04ECF1");
    }
}

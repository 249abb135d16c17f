// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use number_formatter::{metric_suffix, LabelMode};

/// Height in pixels of one horizontal grid row.
pub const ROW_HEIGHT: u32 = 20;

/// Vertical scale of a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Value added per grid row, in display units.
    pub step: f64,
    /// Raw data value at the top of the plot.
    pub dmax: f64,
    pub mode: LabelMode,
    /// How many times the display unit was multiplied by 1000.
    pub scale: i32,
}

impl Scale {
    /// Picks the smallest round step so that the rows of a `charty` high plot cover `max`.
    ///
    /// `max` is in raw data units, `multiplier / divisor` converts it into
    /// display units. The resulting labels always fit four glyph cells.
    pub fn fit(max: f64, multiplier: f64, divisor: f64, charty: u32) -> Self {
        let rows = f64::from((charty / ROW_HEIGHT).max(1));

        let ratio = multiplier / divisor;
        let ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };

        let mut m = max * ratio;

        if !m.is_finite() || m <= 0.0 {
            m = 1.0;
        }

        // Work in hundredths so the first candidate is the `#.##` mode.
        m *= 100.0;

        let mut mode = LabelMode::Hundredths;
        let mut scale = 0;
        let mut decades = 0;

        loop {
            let step = (m / rows).ceil();
            let dmax = step * rows;

            if dmax < 1000.0 {
                return Self {
                    step: step * 10_f64.powi(mode.exponent()),
                    dmax: dmax * 10_f64.powi(decades - 2) / ratio,
                    mode,
                    scale,
                };
            }

            m /= 10.0;
            decades += 1;
            mode = mode.next();

            if mode == LabelMode::Hundredths {
                scale += 1;
            }
        }
    }
    /// Unit suffix of the axis labels.
    pub fn suffix(&self, basescale: i32, percent: bool) -> String {
        let suffix = metric_suffix(self.scale + 2 + basescale);

        if percent {
            format!("{}%", suffix)
        } else {
            suffix.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use number_formatter::format_label;

    #[test]
    fn test_fit_small_max() {
        let s = Scale::fit(10.0, 1.0, 1.0, 100);

        assert_eq!(s.mode, LabelMode::Tenths);
        assert_eq!(s.scale, 0);
        assert!((s.step - 2.0).abs() < 1e-9);
        assert!((s.dmax - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_zero_max() {
        let s = Scale::fit(0.0, 1.0, 1.0, 100);

        assert_eq!(s.mode, LabelMode::Hundredths);
        assert!((s.step - 0.2).abs() < 1e-9);
        assert!((s.dmax - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_escalates_scale() {
        let s = Scale::fit(2_500_000.0, 1.0, 1.0, 100);

        assert_eq!(s.scale, 2);
        assert_eq!(s.mode, LabelMode::Hundredths);
        assert!((s.step - 0.5).abs() < 1e-9);
        assert_eq!(s.suffix(0, false), "M");
        assert!(s.dmax >= 2_500_000.0);
    }

    #[test]
    fn test_fit_applies_ratio() {
        // Bytes stored, displayed as bits.
        let s = Scale::fit(1000.0, 8.0, 1.0, 100);

        assert_eq!(s.scale, 1);
        assert_eq!(s.suffix(0, false), "k");
        assert!(s.dmax * 8.0 >= 8000.0);
    }

    #[test]
    fn test_fit_degenerate_inputs() {
        for max in [f64::NAN, f64::INFINITY, -5.0] {
            let s = Scale::fit(max, 1.0, 1.0, 100);

            assert!((s.dmax - 1.0).abs() < 1e-9);
        }

        let s = Scale::fit(10.0, 1.0, 0.0, 0);

        assert!(s.dmax.is_finite());
    }

    #[test]
    fn test_fit_covers_max_tightly() {
        for charty in [20, 100, 140, 300] {
            let rows = f64::from(charty / ROW_HEIGHT);

            for i in 1..2000 {
                let max = f64::from(i) * 37.3;
                let s = Scale::fit(max, 1.0, 1.0, charty);

                assert!(s.dmax >= max * (1.0 - 1e-9), "{} {}", max, charty);

                let top = s.step * rows;

                assert_eq!(format_label(top, s.mode).chars().count(), 4);
                assert!(!format_label(top, s.mode).contains(':'), "{} {:?}", top, s.mode);

                // One unit less per row would no longer cover the maximum.
                let unit = 10_f64.powi(s.mode.exponent());
                let display_max = max / 1000_f64.powi(s.scale);

                assert!((s.step - unit) * rows < display_max * (1.0 + 1e-9) || s.step <= unit);
            }
        }
    }

    #[test]
    fn test_suffix() {
        let s = Scale::fit(10.0, 1.0, 1.0, 100);

        assert_eq!(s.suffix(0, false), "");
        assert_eq!(s.suffix(0, true), "%");
        assert_eq!(s.suffix(1, false), "k");
        assert_eq!(s.suffix(-2, false), "µ");
    }
}

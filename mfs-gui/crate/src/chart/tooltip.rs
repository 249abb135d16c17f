// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use super::{ChartDataSet, Resolution};
use number_formatter::group_thousands;

/// Text colors of the series, matching the middle of their gradients.
fn series_colors(count: usize) -> &'static [&'static str] {
    match count {
        1 => &["#1C5A89"],
        2 => &["#0E204E", "#18A8C8"],
        _ => &["#0B1945", "#1C5A89", "#13B9D2"],
    }
}

/// Readout for the sample `idx` columns back from the most recent one.
///
/// Holes are never reported as zero: if any series lacks a value the
/// readout says `no data`.
pub fn tooltip_text(data: &ChartDataSet, range: Resolution, idx: usize) -> String {
    let series = data.series(range);
    let date = range.sample_date(series.timestamp, idx);

    let values = match series.column(idx) {
        Some(xs) => xs,
        None => return format!("{}: no data", date),
    };

    let suffix = if data.percent { "%" } else { "" };

    let plain = series.multiplier == 1.0 && series.divisor == 1.0 && data.basescale == 0;

    let values: Vec<f64> = if plain {
        values
    } else {
        let factor = series.multiplier / series.divisor * 1000_f64.powi(data.basescale);

        values.into_iter().map(|x| x * factor).collect()
    };

    let fmt = |x: f64| {
        if plain {
            group_thousands(x)
        } else {
            format!("{:.4}", x)
        }
    };

    let spans: Vec<String> = values
        .iter()
        .zip(series_colors(values.len()))
        .map(|(x, color)| format!("<span style='color:{}'>{}{}</span>", color, fmt(*x), suffix))
        .collect();

    let mut out = format!("{}: {}", date, spans.join(" + "));

    if values.len() > 1 {
        out.push_str(&format!(" = {}{}", fmt(values.iter().sum()), suffix));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn test_single_series() {
        let data = fixtures::data_set(fixtures::series(&[Some(12_345.0), None]));

        assert_eq!(
            tooltip_text(&data, Resolution::OneMinute, 0),
            "2020.09.13 12:26 (1 minute): <span style='color:#1C5A89'>12 345</span>"
        );
    }

    #[test]
    fn test_hole_is_no_data() {
        let data = fixtures::data_set(fixtures::series(&[Some(10.0), None, Some(5.0)]));

        assert_eq!(
            tooltip_text(&data, Resolution::OneMinute, 1),
            "2020.09.13 12:25 (1 minute): no data"
        );
        assert_eq!(
            tooltip_text(&data, Resolution::OneMinute, 5000),
            "2020.09.10 01:06 (1 minute): no data"
        );
    }

    #[test]
    fn test_any_missing_series_is_no_data() {
        let mut s = fixtures::series(&[Some(1.0), Some(2.0)]);
        s.dataarr2 = Some(vec![Some(3.0), None]);

        let data = fixtures::data_set(s);

        assert!(tooltip_text(&data, Resolution::OneMinute, 1).ends_with(": no data"));
    }

    #[test]
    fn test_stacked_scaled_percent() {
        let mut s = fixtures::series(&[Some(1.0)]);
        s.dataarr2 = Some(vec![Some(3.0)]);
        s.divisor = 2.0;

        let mut data = fixtures::data_set(s);
        data.percent = true;

        assert_eq!(
            tooltip_text(&data, Resolution::OneMinute, 0),
            "2020.09.13 12:26 (1 minute): <span style='color:#0E204E'>0.5000%</span> + <span style='color:#18A8C8'>1.5000%</span> = 2.0000%"
        );
    }

    #[test]
    fn test_three_series_sum() {
        let mut s = fixtures::series(&[Some(1000.0)]);
        s.dataarr2 = Some(vec![Some(2000.0)]);
        s.dataarr3 = Some(vec![Some(3000.0)]);

        let data = fixtures::data_set(s);

        assert_eq!(
            tooltip_text(&data, Resolution::OneMinute, 0),
            "2020.09.13 12:26 (1 minute): <span style='color:#0B1945'>1 000</span> + <span style='color:#1C5A89'>2 000</span> + <span style='color:#13B9D2'>3 000</span> = 6 000"
        );
    }

    #[test]
    fn test_basescale_applies() {
        let mut data = fixtures::data_set(fixtures::series(&[Some(1.5)]));
        data.basescale = 1;

        assert!(tooltip_text(&data, Resolution::OneMinute, 0).contains(">1500.0000</span>"));
    }
}

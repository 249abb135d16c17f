// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use crate::chart::{data::Sample, ChartDataSet, ChartSeries};

/// Response of the chart data endpoint for a two series chart.
pub const CHART_PAYLOAD: &str = r#"{
    "basescale": 1,
    "percent": 1,
    "0": {
        "timestamp": 1600000000,
        "multiplier": 1,
        "divisor": 8,
        "dataarr1": [1, null, 3.5, null],
        "dataarr2": [2, 2, null, 4]
    },
    "1": {
        "timestamp": 1599998400,
        "dataarr1": [10, 20],
        "dataarr2": [1, 2]
    },
    "2": {
        "timestamp": 1599998400,
        "dataarr1": [],
        "dataarr2": []
    },
    "3": {
        "timestamp": 1599955200,
        "dataarr1": [5],
        "dataarr2": [null]
    }
}"#;

/// A single series sampled at `2020-09-13 12:26:40 UTC`.
pub fn series(samples: &[Sample]) -> ChartSeries {
    ChartSeries {
        timestamp: 1_600_000_000.0,
        multiplier: 1.0,
        divisor: 1.0,
        dataarr1: Some(samples.to_vec()),
        dataarr2: None,
        dataarr3: None,
    }
}

/// The same series at every resolution, unscaled.
pub fn data_set(series: ChartSeries) -> ChartDataSet {
    ChartDataSet::new(
        0,
        false,
        [series.clone(), series.clone(), series.clone(), series],
    )
}

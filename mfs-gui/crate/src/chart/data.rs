// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use super::Resolution;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single sample, `None` where the server has no data.
pub type Sample = Option<f64>;

fn samples<'de, D>(deserializer: D) -> Result<Option<Vec<Sample>>, D::Error>
where
    D: Deserializer<'de>,
{
    let xs: Option<Vec<Value>> = Deserialize::deserialize(deserializer)?;

    Ok(xs.map(|xs| xs.iter().map(Value::as_f64).collect()))
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let x: Value = Deserialize::deserialize(deserializer)?;

    Ok(match x {
        Value::Null => false,
        Value::Bool(x) => x,
        Value::Number(n) => n.as_f64().map(|x| x != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn one() -> f64 {
    1.0
}

/// Samples of one resolution, index 0 being the most recent.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ChartSeries {
    /// Epoch seconds of the sample at index 0.
    pub timestamp: f64,
    #[serde(default = "one")]
    pub multiplier: f64,
    #[serde(default = "one")]
    pub divisor: f64,
    #[serde(default, deserialize_with = "samples")]
    pub dataarr1: Option<Vec<Sample>>,
    #[serde(default, deserialize_with = "samples")]
    pub dataarr2: Option<Vec<Sample>>,
    #[serde(default, deserialize_with = "samples")]
    pub dataarr3: Option<Vec<Sample>>,
}

impl ChartSeries {
    /// Number of stacked series, decided by which arrays are present.
    pub fn series_count(&self) -> usize {
        match (&self.dataarr1, &self.dataarr2, &self.dataarr3) {
            (None, _, _) => 0,
            (Some(_), None, _) => 1,
            (Some(_), Some(_), None) => 2,
            (Some(_), Some(_), Some(_)) => 3,
        }
    }
    fn arrays(&self) -> impl Iterator<Item = &Vec<Sample>> {
        [&self.dataarr1, &self.dataarr2, &self.dataarr3]
            .into_iter()
            .take(self.series_count())
            .flatten()
    }
    /// Values of every required series at `idx`, or `None` if any of them is missing.
    pub fn column(&self, idx: usize) -> Option<Vec<f64>> {
        let count = self.series_count();

        if count == 0 {
            return None;
        }

        self.arrays().map(|xs| xs.get(idx).copied().flatten()).collect()
    }
    /// Sum of the present values at `idx`, holes counting as zero.
    pub fn partial_sum(&self, idx: usize) -> f64 {
        self.arrays().filter_map(|xs| xs.get(idx).copied().flatten()).sum()
    }
    /// Greatest stacked sum over `[0, width)`.
    pub fn find_max(&self, width: usize) -> f64 {
        (0..width).map(|i| self.partial_sum(i)).fold(0.0, f64::max)
    }
}

#[derive(Deserialize)]
struct RawDataSet {
    basescale: f64,
    #[serde(default, deserialize_with = "truthy")]
    percent: bool,
    #[serde(rename = "0")]
    r0: ChartSeries,
    #[serde(rename = "1")]
    r1: ChartSeries,
    #[serde(rename = "2")]
    r2: ChartSeries,
    #[serde(rename = "3")]
    r3: ChartSeries,
}

/// Payload of the chart data endpoint: all four resolutions of one series id.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "RawDataSet")]
pub struct ChartDataSet {
    /// Power of 1000 the values are expressed in.
    pub basescale: i32,
    pub percent: bool,
    series: [ChartSeries; 4],
}

impl From<RawDataSet> for ChartDataSet {
    fn from(raw: RawDataSet) -> Self {
        Self {
            basescale: raw.basescale.trunc() as i32,
            percent: raw.percent,
            series: [raw.r0, raw.r1, raw.r2, raw.r3],
        }
    }
}

impl ChartDataSet {
    pub fn new(basescale: i32, percent: bool, series: [ChartSeries; 4]) -> Self {
        Self {
            basescale,
            percent,
            series,
        }
    }
    pub fn series(&self, range: Resolution) -> &ChartSeries {
        &self.series[range.index()]
    }
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

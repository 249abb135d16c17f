// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Chart state and the registry synchronizing charts of a group.
//!
//! Nothing here touches the DOM. Operations return the charts that need
//! to be drawn or repositioned and the caller does the browser work.

use super::{paint::Geometry, tooltip::tooltip_text, ChartDataSet, Resolution};
use indexmap::IndexMap;
use std::{fmt, rc::Rc};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ChartId(pub u32);

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart-{}", self.0)
    }
}

/// Where a chart gets its data from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Source {
    pub host: String,
    pub port: String,
    pub mode: String,
    /// Series id, sent to the server as `id * 10 + 9`.
    pub id: i64,
}

#[derive(Clone, Debug)]
pub struct ChartState {
    pub id: ChartId,
    pub group: String,
    pub source: Source,
    pub range: Resolution,
    /// Pixels scrolled back from the most recent sample.
    pub position: i64,
    pub geometry: Geometry,
    /// Visible width of the plot element.
    pub client_width: i64,
    /// Height cycling step, `0..4`.
    pub hmode: u32,
    pub height_base: f64,
    pub height_diff: f64,
    pub common_scale: bool,
    pub loading: bool,
    /// Counts data loads so a stale load deadline can be told apart.
    pub load_generation: u32,
    /// Waiting for the rest of the group before drawing.
    pub draw_delayed: bool,
    /// Whether the current drag moves every chart in the group.
    pub move_group: bool,
    pub data: Option<Rc<ChartDataSet>>,
    /// Greatest stacked value of the visible resolution.
    pub max: f64,
}

impl ChartState {
    pub fn new(id: ChartId, group: impl Into<String>, source: Source, geometry: Geometry) -> Self {
        Self {
            id,
            group: group.into(),
            source,
            range: Resolution::default(),
            position: 0,
            geometry,
            client_width: 0,
            hmode: 0,
            height_base: f64::from(geometry.charty),
            height_diff: 0.0,
            common_scale: false,
            loading: false,
            load_generation: 0,
            draw_delayed: false,
            move_group: false,
            data: None,
            max: 0.0,
        }
    }
    pub fn max_position(&self) -> i64 {
        i64::from(self.geometry.chartx) - self.client_width
    }
    /// Recomputes `max` from the data of the active resolution.
    pub fn analyse(&mut self) {
        if let Some(data) = self.data.as_ref() {
            self.max = data
                .series(self.range)
                .find_max(self.geometry.chartx as usize);
        }
    }
    /// Marks the start of a data load and clears the current data.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.load_generation = self.load_generation.wrapping_add(1);
        self.position = 0;
        self.data = None;
    }
    /// Advances the height cycle, returning the new height of the chart container.
    pub fn cycle_height(&mut self) -> Option<f64> {
        self.data.as_ref()?;

        self.hmode = (self.hmode + 1) % 4;

        Some(self.height_base * 2_f64.powi(self.hmode as i32) + self.height_diff)
    }
    /// Whether load `generation` is the one still in flight.
    pub fn is_loading(&self, generation: u32) -> bool {
        self.loading && self.load_generation == generation
    }
    /// Readout for the column `offset` pixels left of the right edge of the visible plot.
    pub fn tooltip(&self, offset: i64) -> Option<String> {
        let data = self.data.as_ref()?;
        let idx = usize::try_from(offset + self.position).ok()?;

        Some(tooltip_text(data, self.range, idx))
    }
}

#[derive(Default)]
pub struct Registry {
    charts: IndexMap<ChartId, ChartState>,
}

impl Registry {
    pub fn insert(&mut self, state: ChartState) {
        self.charts.insert(state.id, state);
    }
    pub fn remove(&mut self, id: ChartId) -> Option<ChartState> {
        self.charts.shift_remove(&id)
    }
    pub fn get(&self, id: ChartId) -> Option<&ChartState> {
        self.charts.get(&id)
    }
    pub fn get_mut(&mut self, id: ChartId) -> Option<&mut ChartState> {
        self.charts.get_mut(&id)
    }
    pub fn ids(&self) -> Vec<ChartId> {
        self.charts.keys().copied().collect()
    }
    pub fn iter(&self) -> impl Iterator<Item = &ChartState> {
        self.charts.values()
    }
    fn member_ids(&self, group: &str) -> Vec<ChartId> {
        self.charts
            .values()
            .filter(|x| x.group == group)
            .map(|x| x.id)
            .collect()
    }
    pub fn whole_group_loaded(&self, group: &str) -> bool {
        self.charts
            .values()
            .filter(|x| x.group == group)
            .all(|x| !x.loading)
    }
    /// Asks for `id` to be drawn, returning every chart that should be drawn now.
    ///
    /// Common scale charts wait until no member of their group is loading,
    /// then release every member that was waiting along with themselves.
    pub fn request_draw(&mut self, id: ChartId) -> Vec<ChartId> {
        let (group, common) = match self.charts.get(&id) {
            Some(x) => (x.group.clone(), x.common_scale),
            None => return vec![],
        };

        if !common {
            return vec![id];
        }

        if !self.whole_group_loaded(&group) {
            if let Some(x) = self.charts.get_mut(&id) {
                x.draw_delayed = true;
            }

            return vec![];
        }

        let mut out = self.take_delayed(&group);

        if !out.contains(&id) {
            out.push(id);
        }

        out
    }
    /// Releases waiting draws of `group` once none of its members is loading.
    pub fn flush_group(&mut self, group: &str) -> Vec<ChartId> {
        if self.whole_group_loaded(group) {
            self.take_delayed(group)
        } else {
            vec![]
        }
    }
    fn take_delayed(&mut self, group: &str) -> Vec<ChartId> {
        self.charts
            .values_mut()
            .filter(|x| x.group == group && x.draw_delayed)
            .map(|x| {
                x.draw_delayed = false;

                x.id
            })
            .collect()
    }
    /// The maximum `id` should be scaled to.
    ///
    /// For common scale charts this is the greatest maximum among the
    /// group members that have data, which is also stored on each of them.
    pub fn effective_max(&mut self, id: ChartId) -> Option<f64> {
        let chart = self.charts.get(&id)?;

        if !chart.common_scale {
            return Some(chart.max);
        }

        let group = chart.group.clone();

        let max = self
            .charts
            .values()
            .filter(|x| x.group == group && x.data.is_some())
            .map(|x| x.max)
            .fold(0.0, f64::max);

        for x in self
            .charts
            .values_mut()
            .filter(|x| x.group == group && x.data.is_some())
        {
            x.max = max;
        }

        Some(max)
    }
    /// Scrolls `id` by `delta` pixels, clamped to the available history.
    ///
    /// When the chart moves as a group every member takes the same position.
    /// `commit == false` previews without storing the position. Returns the
    /// charts with data whose rendering has to follow.
    pub fn move_by(&mut self, id: ChartId, delta: i64, commit: bool) -> Vec<(ChartId, i64)> {
        let chart = match self.charts.get(&id) {
            Some(x) => x,
            None => return vec![],
        };

        let mut position = chart.position + delta;

        if position > chart.max_position() {
            position = chart.max_position();
        }

        if position < 0 {
            position = 0;
        }

        let targets = if chart.move_group {
            self.member_ids(&chart.group.clone())
        } else {
            vec![id]
        };

        targets
            .into_iter()
            .filter_map(|x| {
                let chart = self.charts.get_mut(&x)?;

                if commit {
                    chart.position = position;
                }

                chart.data.as_ref().map(|_| (x, position))
            })
            .collect()
    }
    /// Switches every member of `group` to `range`, returning the charts to redraw.
    pub fn set_range(&mut self, group: &str, range: Resolution) -> Vec<ChartId> {
        self.update_group(group, |x| {
            x.range = range;
            x.position = 0;
            x.analyse();
        })
    }
    pub fn set_common_scale(&mut self, group: &str, common_scale: bool) -> Vec<ChartId> {
        self.update_group(group, |x| {
            x.analyse();
            x.common_scale = common_scale;
        })
    }
    fn update_group(&mut self, group: &str, f: impl Fn(&mut ChartState)) -> Vec<ChartId> {
        self.charts
            .values_mut()
            .filter(|x| x.group == group)
            .map(|x| {
                f(x);

                x.id
            })
            .collect()
    }
}

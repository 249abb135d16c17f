// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Scrollable stacked bar charts drawn from the chart data endpoint.
//!
//! Every chart is made of four page elements sharing an id prefix: the
//! container (`p`), the left axis (`l`), the plot (`c`) and the right axis
//! (`r`). The chart is painted onto offscreen canvases whose images become
//! the elements' backgrounds; panning only moves the plot background.

mod canvas;
pub(crate) mod data;
mod deadline;
mod drag;
mod font;
pub(crate) mod group;
pub(crate) mod hover;
mod loader;
pub(crate) mod paint;
mod scale;
pub(crate) mod ticks;
mod tooltip;

pub use data::{ChartDataSet, ChartSeries};
pub use group::{ChartId, Source};
pub use ticks::Resolution;

use crate::{
    config::Config,
    extensions::{DocumentExt as _, ElementExt as _, LogErrExt as _},
    listener::{listen, Listener},
    GuiError,
};
use canvas::Surface;
use drag::ActiveDrag;
use group::{ChartState, Registry};
use loader::LoadError;
use paint::{Geometry, Plot, OFFSET_X, RIGHT_WIDTH};
use scale::Scale;
use seed::{prelude::*, *};
use std::{cell::Cell, collections::HashMap, rc::Rc, time::Duration};
use web_sys::{Element, HtmlElement, HtmlImageElement, MouseEvent};

const LOADING: &str = "transparent url('data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%3E%3Ctext%20style%3D%22white-space%3A%20pre%3B%20fill%3A%20rgb(51%2C%2051%2C%2051)%3B%20font-family%3A%20Arial%2C%20sans-serif%3B%20font-size%3A%2028px%3B%22%20x%3D%220.0%22%20y%3D%2280.0%22%3ELoading...%3C%2Ftext%3E%3C%2Fsvg%3E')";

const LOAD_ERROR: &str = "transparent url('data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%3E%3Ctext%20style%3D%22white-space%3A%20pre%3B%20fill%3A%20rgb(180%2C%2051%2C%2051)%3B%20font-family%3A%20Arial%2C%20sans-serif%3B%20font-size%3A%2028px%3B%22%20x%3D%220.0%22%20y%3D%2280.0%22%3ELoading%20error%3C%2Ftext%3E%3C%2Fsvg%3E')";

thread_local! {
    static NEXT_ID: Cell<u32> = Cell::new(0);
}

/// Allocates the id of a chart about to be created.
pub fn next_id() -> ChartId {
    NEXT_ID.with(|x| {
        let id = x.get();
        x.set(id + 1);

        ChartId(id)
    })
}

fn plot_background(url: &str, position: i64) -> String {
    format!("transparent url({}) no-repeat right -{}px center", url, position)
}

fn axis_background(url: &str) -> String {
    format!("transparent url({}) no-repeat left center", url)
}

/// Browser side of a chart.
struct ChartView {
    parent: HtmlElement,
    left: HtmlElement,
    plot: HtmlElement,
    right: HtmlElement,
    surfaces: [Surface; 3],
    /// Read by the mousedown handler, which has to decide synchronously
    /// whether to swallow the event.
    has_data: Rc<Cell<bool>>,
    load_deadline: Option<deadline::LoadDeadline>,
    _listeners: Vec<Listener>,
}

impl ChartView {
    fn is_connected(&self) -> bool {
        self.plot.is_connected()
    }
    fn set_cursor(&self, plot: &str, left: Option<&str>) {
        self.plot.set_style("cursor", plot).log_err("chart cursor");

        if let Some(left) = left {
            self.left.set_style("cursor", left).log_err("chart cursor");
        }
    }
    fn set_backgrounds(&self, left: &str, plot: &str, right: &str) -> Result<(), GuiError> {
        self.left.set_style("background", left)?;
        self.plot.set_style("background", plot)?;
        self.right.set_style("background", right)?;

        Ok(())
    }
    fn set_position(&self, position: i64) -> Result<(), GuiError> {
        self.plot
            .set_style("background-position", &format!("right -{}px center", position))
    }
    fn resize_surfaces(&self, geometry: Geometry) {
        let h = geometry.surface_height();

        self.surfaces[0].resize(OFFSET_X as u32, h);
        self.surfaces[1].resize(geometry.chartx, h);
        self.surfaces[2].resize(RIGHT_WIDTH, h);
    }
}

pub struct Model {
    registry: Registry,
    views: HashMap<ChartId, ChartView>,
    font: Option<HtmlImageElement>,
    drag: Option<ActiveDrag>,
    endpoint: String,
    load_timeout: Option<Duration>,
    _listeners: Vec<Listener>,
}

impl Model {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: Registry::default(),
            views: HashMap::new(),
            font: None,
            drag: None,
            endpoint: config.chart_endpoint.clone(),
            load_timeout: config.group_load_timeout(),
            _listeners: vec![],
        }
    }
}

pub enum Msg {
    Create {
        id: ChartId,
        prefix: String,
        group: String,
        source: Source,
        show_loading: bool,
    },
    /// Switches one chart's resolution, taking effect on its next draw.
    SetRange(ChartId, f64),
    SetSeries(ChartId, f64),
    SetSource {
        id: ChartId,
        host: String,
        port: String,
        mode: String,
        series: Option<f64>,
    },
    Reload {
        id: ChartId,
        full: bool,
    },
    /// Data only reload of every chart still on the page.
    ReloadAll,
    Loaded(ChartId, Result<ChartDataSet, LoadError>),
    /// Load `generation` of a chart ran out of time.
    LoadTimedOut { id: ChartId, generation: u32 },
    Draw(ChartId),
    Redraw(ChartId),
    GroupRange(String, f64),
    GroupCommonScale(String, bool),
    CycleHeight(ChartId),
    DragStart {
        id: ChartId,
        client_x: i32,
        shift: bool,
    },
    DragMove(i32),
    DragEnd(i32),
    Resize,
    Hover(MouseEvent),
    HideHover,
    FontLoaded,
    Noop,
}

pub fn init(model: &mut Model, orders: &mut impl Orders<Msg>) {
    match canvas::font_image() {
        Ok(img) => {
            if let Some(x) = listen(orders, img.as_ref(), "load", |_| Some(Msg::FontLoaded))
                .log_err("font listener")
            {
                model._listeners.push(x);
            }

            model.font = Some(img);
        }
        Err(e) => error!(format!("Could not load chart font: {}", e)),
    }

    if let Some(x) = listen(orders, window().as_ref(), "resize", |_| Some(Msg::Resize)).log_err("resize listener") {
        model._listeners.push(x);
    }

    if let Some(body) = document().body() {
        let mut listeners = vec![listen(orders, body.as_ref(), "mousemove", |ev| {
            ev.dyn_into::<MouseEvent>().ok().map(Msg::Hover)
        })];

        for kind in ["mousedown", "click", "dblclick"] {
            listeners.push(listen(orders, body.as_ref(), kind, |_| Some(Msg::HideHover)));
        }

        for x in listeners {
            if let Some(x) = x.log_err("readout listener") {
                model._listeners.push(x);
            }
        }
    }
}

fn create_view(
    orders: &impl Orders<Msg>,
    id: ChartId,
    prefix: &str,
) -> Result<(ChartView, Geometry, f64), GuiError> {
    let doc = document();

    let parent: HtmlElement = doc.require(&format!("{}p", prefix))?;
    let left: HtmlElement = doc.require(&format!("{}l", prefix))?;
    let plot: HtmlElement = doc.require(&format!("{}c", prefix))?;
    let right: HtmlElement = doc.require(&format!("{}r", prefix))?;

    let geometry = Geometry::from_client(plot.client_width(), plot.client_height());
    let h = geometry.surface_height();

    let surfaces = [
        Surface::new(OFFSET_X as u32, h)?,
        Surface::new(geometry.chartx, h)?,
        Surface::new(RIGHT_WIDTH, h)?,
    ];

    let has_data = Rc::new(Cell::new(false));

    let grab = {
        let has_data = Rc::clone(&has_data);

        listen(orders, plot.as_ref(), "mousedown", move |ev| {
            if !has_data.get() {
                return None;
            }

            let ev = ev.dyn_into::<MouseEvent>().ok()?;

            ev.stop_propagation();
            ev.prevent_default();

            Some(Msg::DragStart {
                id,
                client_x: ev.client_x(),
                shift: ev.shift_key(),
            })
        })?
    };

    let listeners = vec![
        grab,
        listen(orders, plot.as_ref(), "dblclick", move |_| Some(Msg::CycleHeight(id)))?,
        listen(orders, left.as_ref(), "click", move |_| Some(Msg::CycleHeight(id)))?,
    ];

    let height_diff = f64::from(parent.client_height()) - f64::from(geometry.charty);

    Ok((
        ChartView {
            parent,
            left,
            plot,
            right,
            surfaces,
            has_data,
            load_deadline: None,
            _listeners: listeners,
        },
        geometry,
        height_diff,
    ))
}

fn schedule_draws(ids: Vec<ChartId>, orders: &mut impl Orders<Msg>) {
    for id in ids {
        orders.perform_cmd(cmds::timeout(0, move || Msg::Draw(id)));
    }
}

/// Draws `id`, unless it is waiting for the rest of its common scale group.
fn draw_chart(model: &mut Model, id: ChartId, orders: &mut impl Orders<Msg>) {
    let ids = model.registry.request_draw(id);

    schedule_draws(ids, orders);
}

/// Re-reads the plot height and draws again.
fn redraw(model: &mut Model, id: ChartId, orders: &mut impl Orders<Msg>) {
    if let (Some(state), Some(view)) = (model.registry.get_mut(id), model.views.get(&id)) {
        state.geometry.charty = Geometry::plot_height(view.plot.client_height());

        view.resize_surfaces(state.geometry);
    }

    draw_chart(model, id, orders);
}

fn reload(model: &mut Model, id: ChartId, full: bool, orders: &mut impl Orders<Msg>) {
    let (state, view) = match (model.registry.get_mut(id), model.views.get_mut(&id)) {
        (Some(s), Some(v)) => (s, v),
        _ => return,
    };

    state.begin_load();
    view.has_data.set(false);
    view.set_cursor("progress", None);

    if full {
        view.set_backgrounds("transparent", LOADING, "transparent")
            .log_err("chart placeholder");
    }

    let url = loader::data_url(&model.endpoint, &state.source);

    orders.perform_cmd(async move { Msg::Loaded(id, loader::fetch_data_set(url).await) });

    let generation = state.load_generation;

    view.load_deadline = model.load_timeout.map(|timeout| {
        let (handle, fut) = deadline::start(id, generation, timeout);

        orders.perform_cmd(fut);

        handle
    });
}

/// Marks a load as finished without data and releases draws the group was holding back.
fn abandon_load(model: &mut Model, id: ChartId, orders: &mut impl Orders<Msg>) {
    let group = match model.registry.get_mut(id) {
        Some(state) => {
            state.loading = false;

            state.group.clone()
        }
        None => return,
    };

    if let Some(view) = model.views.get_mut(&id) {
        view.load_deadline = None;
        view.set_cursor("default", Some("default"));
    }

    let ids = model.registry.flush_group(&group);

    schedule_draws(ids, orders);
}

fn do_draw(model: &mut Model, id: ChartId) -> Result<(), GuiError> {
    let max = match model.registry.effective_max(id) {
        Some(x) => x,
        None => return Ok(()),
    };

    let (state, view) = match (model.registry.get(id), model.views.get(&id)) {
        (Some(s), Some(v)) => (s, v),
        _ => return Ok(()),
    };

    if state.loading {
        return Ok(());
    }

    let data = match state.data.as_ref() {
        Some(x) => x,
        None => return view.set_backgrounds("transparent", LOAD_ERROR, "transparent"),
    };

    let font = match model.font.as_ref() {
        Some(x) => x,
        None => return Ok(()),
    };

    let series = data.series(state.range);
    let charty = state.geometry.charty;
    let scale = Scale::fit(max, series.multiplier, series.divisor, charty);
    let suffix = scale.suffix(data.basescale, data.percent);

    let plot = Plot {
        series,
        range: state.range,
        geometry: state.geometry,
        scale,
        suffix: &suffix,
    };

    let [l, c, r] = &view.surfaces;

    plot.paint(
        &mut l.painter(font, charty),
        &mut c.painter(font, charty),
        &mut r.painter(font, charty),
    );

    view.set_backgrounds(
        &axis_background(&l.to_data_url()?),
        &plot_background(&c.to_data_url()?, state.position),
        &axis_background(&r.to_data_url()?),
    )
}

fn apply_positions(model: &Model, moves: Vec<(ChartId, i64)>) {
    for (id, position) in moves {
        if let Some(view) = model.views.get(&id) {
            view.set_position(position).log_err("chart position");
        }
    }
}

fn hover(model: &Model, ev: &MouseEvent) -> Result<(), GuiError> {
    let crosshair = match hover::Crosshair::find() {
        Some(x) => x,
        None => return Ok(()),
    };

    let target = ev.target().and_then(|x| x.dyn_into::<Element>().ok());

    let found = target.filter(|x| x.has_class(hover::CHART_CLASS)).and_then(|target| {
        model
            .views
            .iter()
            .find(|(_, v)| v.plot.is_same_node(Some(&*target)) || v.left.is_same_node(Some(&*target)))
            .and_then(|(id, _)| model.registry.get(*id))
            .zip(target.dyn_into::<HtmlElement>().ok())
    });

    let (state, target) = match found {
        Some(x) => x,
        None => return crosshair.hide(),
    };

    let rect = target.get_bounding_client_rect();
    let offset = hover::column_offset(target.client_width(), ev.client_x(), rect.left());

    match state.tooltip(offset) {
        Some(text) => crosshair.show(&text, &target, ev),
        None => crosshair.hide(),
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::Create {
            id,
            prefix,
            group,
            source,
            show_loading,
        } => {
            let (view, geometry, height_diff) = match create_view(orders, id, &prefix) {
                Ok(x) => x,
                Err(e) => {
                    error!(format!("Could not create chart {}: {}", prefix, e));

                    return;
                }
            };

            let mut state = ChartState::new(id, group, source, geometry);
            state.client_width = i64::from(view.plot.client_width());
            state.height_diff = height_diff;

            model.registry.insert(state);
            model.views.insert(id, view);

            reload(model, id, show_loading, orders);
        }
        Msg::SetRange(id, range) => {
            if let Some(state) = model.registry.get_mut(id) {
                state.range = Resolution::clamp(range);
                state.position = 0;
            }
        }
        Msg::SetSeries(id, series) => {
            if let Some(state) = model.registry.get_mut(id) {
                state.source.id = series.floor() as i64;
            }

            reload(model, id, true, orders);
        }
        Msg::SetSource {
            id,
            host,
            port,
            mode,
            series,
        } => {
            if let Some(state) = model.registry.get_mut(id) {
                state.source.host = host;
                state.source.port = port;
                state.source.mode = mode;

                if let Some(series) = series {
                    state.source.id = series.floor() as i64;
                }
            }

            reload(model, id, true, orders);
        }
        Msg::Reload { id, full } => reload(model, id, full, orders),
        Msg::ReloadAll => {
            let gone: Vec<ChartId> = model
                .views
                .iter()
                .filter(|(_, v)| !v.is_connected())
                .map(|(id, _)| *id)
                .collect();

            for id in gone {
                model.views.remove(&id);
                model.registry.remove(id);
            }

            for id in model.registry.ids() {
                reload(model, id, false, orders);
            }
        }
        Msg::Loaded(id, result) => {
            if let Some(view) = model.views.get_mut(&id) {
                view.load_deadline = None;
            }

            match result {
                Ok(data) => {
                    if let Some(state) = model.registry.get_mut(id) {
                        state.loading = false;
                        state.data = Some(Rc::new(data));
                        state.analyse();
                    }

                    if let Some(view) = model.views.get(&id) {
                        view.has_data.set(true);
                        view.set_cursor("grab", None);
                    }

                    draw_chart(model, id, orders);
                }
                Err(e @ LoadError::Decode(_)) => {
                    error!(format!("Chart {}: {}", id, e));

                    if let Some(state) = model.registry.get_mut(id) {
                        state.loading = false;
                    }

                    if let Some(view) = model.views.get(&id) {
                        view.set_cursor("default", Some("default"));
                    }

                    draw_chart(model, id, orders);
                }
                Err(e @ LoadError::Transport(_)) => {
                    error!(format!("Chart {}: {}", id, e));

                    abandon_load(model, id, orders);
                }
            }
        }
        Msg::LoadTimedOut { id, generation } => {
            if model.registry.get(id).map(|x| x.is_loading(generation)).unwrap_or(false) {
                log!(format!("Chart {} is taking too long to load", id));

                abandon_load(model, id, orders);
            }
        }
        Msg::Draw(id) => {
            do_draw(model, id).log_err("chart draw");
        }
        Msg::Redraw(id) => redraw(model, id, orders),
        Msg::GroupRange(group, range) => {
            for id in model.registry.set_range(&group, Resolution::clamp(range)) {
                redraw(model, id, orders);
            }
        }
        Msg::GroupCommonScale(group, flag) => {
            for id in model.registry.set_common_scale(&group, flag) {
                redraw(model, id, orders);
            }
        }
        Msg::CycleHeight(id) => {
            let height = model.registry.get_mut(id).and_then(|x| x.cycle_height());

            if let (Some(height), Some(view)) = (height, model.views.get(&id)) {
                view.parent
                    .set_style("height", &format!("{}px", height))
                    .log_err("chart height");

                redraw(model, id, orders);
            }
        }
        Msg::DragStart { id, client_x, shift } => {
            let plot = match model.views.get(&id) {
                Some(x) => x.plot.clone(),
                None => return,
            };

            match model.registry.get_mut(id) {
                Some(state) if state.data.is_some() => {
                    state.move_group = !shift;
                    state.client_width = i64::from(plot.client_width());
                }
                _ => return,
            }

            model.drag = ActiveDrag::begin(orders, id, client_x, plot.as_ref()).log_err("chart drag");
        }
        Msg::DragMove(client_x) => {
            if let Some(drag) = model.drag.as_ref() {
                let moves = model.registry.move_by(drag.id, drag.delta(client_x), false);

                apply_positions(model, moves);
            }
        }
        Msg::DragEnd(client_x) => {
            if let Some(drag) = model.drag.take() {
                let moves = model.registry.move_by(drag.id, drag.delta(client_x), true);

                apply_positions(model, moves);
            }
        }
        Msg::Resize => {
            for id in model.registry.ids() {
                let width = match model.views.get(&id) {
                    Some(v) => i64::from(v.plot.client_width()),
                    None => continue,
                };

                let moves = match model.registry.get_mut(id) {
                    Some(state) if state.data.is_some() => {
                        state.client_width = width;
                        state.move_group = false;

                        model.registry.move_by(id, 0, true)
                    }
                    _ => continue,
                };

                apply_positions(model, moves);
            }
        }
        Msg::Hover(ev) => {
            hover(model, &ev).log_err("chart readout");
        }
        Msg::HideHover => {
            if let Some(x) = hover::Crosshair::find() {
                x.hide().log_err("chart readout");
            }
        }
        Msg::FontLoaded => {
            let ids: Vec<ChartId> = model
                .registry
                .iter()
                .filter(|x| x.data.is_some())
                .map(|x| x.id)
                .collect();

            for id in ids {
                draw_chart(model, id, orders);
            }
        }
        Msg::Noop => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backgrounds() {
        assert_eq!(
            plot_background("data:x", 12),
            "transparent url(data:x) no-repeat right -12px center"
        );
        assert_eq!(
            axis_background("data:x"),
            "transparent url(data:x) no-repeat left center"
        );
    }

    #[test]
    fn test_next_id_is_unique() {
        let a = next_id();
        let b = next_id();

        assert_ne!(a, b);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_surface_renders_to_data_url() {
        let surface = Surface::new(10, 10).unwrap();

        assert!(surface.to_data_url().unwrap().starts_with("data:image/png"));
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Time limit of a chart data load.

use super::{ChartId, Msg};
use futures::{
    channel::oneshot,
    future::{self, Either},
    Future, FutureExt,
};
use gloo_timers::future::TimeoutFuture;
use std::time::Duration;

/// Pending deadline of one load. Dropping it cancels the deadline.
pub struct LoadDeadline {
    _cancel: oneshot::Sender<()>,
}

/// Starts the deadline of load `generation` of chart `id`.
///
/// The future resolves to [`Msg::LoadTimedOut`] once `timeout` passes,
/// or to [`Msg::Noop`] as soon as the returned handle is dropped.
pub fn start(id: ChartId, generation: u32, timeout: Duration) -> (LoadDeadline, impl Future<Output = Msg>) {
    let (tx, rx) = oneshot::channel::<()>();

    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);

    let fut = future::select(rx, TimeoutFuture::new(millis)).map(move |either| match either {
        Either::Left(_) => Msg::Noop,
        Either::Right(_) => Msg::LoadTimedOut { id, generation },
    });

    (LoadDeadline { _cancel: tx }, fut)
}

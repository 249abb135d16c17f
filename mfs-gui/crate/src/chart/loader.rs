// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use super::{group::Source, ChartDataSet};
use seed::browser::fetch::fetch;
use std::fmt;
use url::form_urlencoded;

/// Why a chart data set could not be loaded.
#[derive(Debug)]
pub enum LoadError {
    /// The request never produced a response body.
    Transport(String),
    /// The server answered, but not with a usable data set.
    Decode(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {}", e),
            Self::Decode(e) => write!(f, "unusable payload: {}", e),
        }
    }
}

/// Query against the chart data endpoint for `source`.
pub fn data_url(endpoint: &str, source: &Source) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("host", &source.host)
        .append_pair("port", &source.port)
        .append_pair("mode", &source.mode)
        .append_pair("id", &(source.id * 10 + 9).to_string())
        .finish();

    format!("{}?{}", endpoint, query)
}

pub async fn fetch_data_set(url: String) -> Result<ChartDataSet, LoadError> {
    let response = fetch(url)
        .await
        .map_err(|e| LoadError::Transport(format!("{:?}", e)))?
        .check_status()
        .map_err(|e| LoadError::Decode(format!("{:?}", e)))?;

    let text = response
        .text()
        .await
        .map_err(|e| LoadError::Transport(format!("{:?}", e)))?;

    ChartDataSet::from_json(&text).map_err(|e| LoadError::Decode(e.to_string()))
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use crate::{extensions::DocumentExt as _, GuiError};
use seed::{prelude::*, *};
use serde::Deserialize;
use std::time::Duration;

/// Id of the `<script type="application/json">` element carrying overrides.
pub const CONFIG_ELEMENT_ID: &str = "mfs-gui-config";

/// Upper bound of the auto refresh period in seconds.
pub const MAX_REFRESH_PERIOD: u32 = 999;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Endpoint serving chart data sets.
    pub chart_endpoint: String,
    /// Script name the page fragments are served by.
    pub page_script: String,
    /// Location of the tooltip descriptor file.
    pub help_path: String,
    /// Seconds between automatic refreshes, `0` disables them.
    pub default_refresh_period: u32,
    /// How long a common scale group waits for a slow member. `0` waits forever.
    pub group_load_timeout_ms: u64,
    pub tooltip_hide_delay_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chart_endpoint: "chartdata.cgi".into(),
            page_script: "mfs.cgi".into(),
            help_path: "/../assets/help.json".into(),
            default_refresh_period: 60,
            group_load_timeout_ms: 15_000,
            tooltip_hide_delay_ms: 200,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self, GuiError> {
        let mut config: Self = serde_json::from_str(s)?;

        config.default_refresh_period = config.default_refresh_period.min(MAX_REFRESH_PERIOD);

        Ok(config)
    }
    /// Reads the page supplied configuration, falling back to defaults.
    pub fn load() -> Self {
        let text = document()
            .find::<web_sys::Element>(CONFIG_ELEMENT_ID)
            .and_then(|x| x.text_content());

        match text {
            Some(text) => Self::from_json(&text).unwrap_or_else(|e| {
                error!(format!("Ignoring invalid {}: {}", CONFIG_ELEMENT_ID, e));

                Self::default()
            }),
            None => Self::default(),
        }
    }
    pub fn group_load_timeout(&self) -> Option<Duration> {
        match self.group_load_timeout_ms {
            0 => None,
            x => Some(Duration::from_millis(x)),
        }
    }
}

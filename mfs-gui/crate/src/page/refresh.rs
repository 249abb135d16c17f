// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Auto refresh bookkeeping and fragment URLs.

use crate::{config::MAX_REFRESH_PERIOD, GuiError};
use chrono::{DateTime, TimeZone};
use number_formatter::parse_int_prefix;
use std::fmt::Display;
use url::Url;

/// Drill-down parameter that must not leak into the drill-down fragment.
const MAIN_VIEW_ONLY: &str = "HDdata";

/// Seconds counted towards the next automatic refresh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefreshTimer {
    /// Seconds between refreshes, `0` when automatic refresh is off.
    pub period: u32,
    count_up: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// What the refresh slider shows.
    pub slider_text: String,
    /// Whether the period just elapsed.
    pub due: bool,
}

impl RefreshTimer {
    pub fn new(period: u32) -> Self {
        Self { period, count_up: 0 }
    }
    /// Text for the slider before the first tick.
    pub fn slider_text(&self) -> String {
        if self.period > 0 {
            (self.period - self.count_up).to_string()
        } else {
            String::new()
        }
    }
    /// Advances one second. A disabled refresh keeps the counter at zero.
    pub fn tick(&mut self, enabled: bool) -> Tick {
        self.count_up = if self.period > 0 && self.count_up + 1 >= self.period {
            0
        } else {
            self.count_up + 1
        };

        if !enabled {
            self.count_up = 0;
        }

        Tick {
            slider_text: self.slider_text(),
            due: enabled && self.count_up == 0,
        }
    }
}

/// Refresh period from the `refresh` query parameter. Garbage disables refreshing.
pub fn parse_refresh_param(value: &str) -> u32 {
    parse_int_prefix(value)
        .unwrap_or(0)
        .clamp(0, i64::from(MAX_REFRESH_PERIOD)) as u32
}

/// The page URL asking `script` for the main container only.
///
/// Pages not served by `script` have no fragment to refresh.
pub fn fragment_url(href: &str, script: &str) -> Option<String> {
    let with_query = format!("{}?", script);

    if href.contains(&with_query) {
        Some(href.replacen(&with_query, &format!("{}?ajax=container&", script), 1))
    } else if href.contains(script) {
        Some(href.replacen(script, &format!("{}?ajax=container", script), 1))
    } else {
        None
    }
}

/// Sets query parameter `name` to `value`, replacing every previous value in place.
pub fn set_query_param(url: &mut Url, name: &str, value: &str) {
    let mut pairs: Vec<(String, String)> = vec![];
    let mut found = false;

    for (k, v) in url.query_pairs() {
        if k == name {
            if !found {
                pairs.push((k.into_owned(), value.to_string()));
                found = true;
            }
        } else {
            pairs.push((k.into_owned(), v.into_owned()));
        }
    }

    if !found {
        pairs.push((name.to_string(), value.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

fn remove_query_param(url: &mut Url, name: &str) {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != name)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// [`fragment_url`] with `name` set to `value`.
pub fn fragment_url_with(href: &str, script: &str, name: &str, value: &str) -> Result<Option<String>, GuiError> {
    let href = match fragment_url(href, script) {
        Some(x) => x,
        None => return Ok(None),
    };

    let mut url = Url::parse(&href)?;

    set_query_param(&mut url, name, value);

    Ok(Some(url.into()))
}

/// URL of the drill-down fragment for graph section `section`.
///
/// `extra` is an already encoded query appended as is.
pub fn graph_info_url(href: &str, section: &str, extra: &str) -> Result<String, GuiError> {
    let mut url = Url::parse(href)?;

    set_query_param(&mut url, "ajax", "container");
    set_query_param(&mut url, "sections", section);
    set_query_param(&mut url, "readonly", "1");
    set_query_param(&mut url, "selectable", "0");
    remove_query_param(&mut url, MAIN_VIEW_ONLY);

    let query = format!("{}&{}", url.query().unwrap_or(""), extra);

    url.set_query(Some(&query));

    Ok(url.into())
}

/// Footer timestamp, `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_timer_counts_down_and_wraps() {
        let mut timer = RefreshTimer::new(3);

        assert_eq!(timer.slider_text(), "3");
        assert_eq!(
            timer.tick(true),
            Tick {
                slider_text: "2".into(),
                due: false
            }
        );
        assert_eq!(timer.tick(true).slider_text, "1");

        let tick = timer.tick(true);

        assert!(tick.due);
        assert_eq!(tick.slider_text, "3");
    }

    #[test]
    fn test_disabled_timer_stays_put() {
        let mut timer = RefreshTimer::new(60);

        timer.tick(true);

        for _ in 0..100 {
            assert_eq!(
                timer.tick(false),
                Tick {
                    slider_text: "60".into(),
                    due: false
                }
            );
        }
    }

    #[test]
    fn test_zero_period_never_fires() {
        let mut timer = RefreshTimer::new(0);

        for _ in 0..10 {
            assert_eq!(
                timer.tick(true),
                Tick {
                    slider_text: "".into(),
                    due: false
                }
            );
        }
    }

    #[test]
    fn test_parse_refresh_param() {
        assert_eq!(parse_refresh_param("30"), 30);
        assert_eq!(parse_refresh_param("15s"), 15);
        assert_eq!(parse_refresh_param("5000"), 999);
        assert_eq!(parse_refresh_param("-4"), 0);
        assert_eq!(parse_refresh_param("off"), 0);
    }

    #[test]
    fn test_fragment_url() {
        assert_eq!(
            fragment_url("http://m/mfs.cgi?sections=CS", "mfs.cgi").as_deref(),
            Some("http://m/mfs.cgi?ajax=container&sections=CS")
        );
        assert_eq!(
            fragment_url("http://m/mfs.cgi", "mfs.cgi").as_deref(),
            Some("http://m/mfs.cgi?ajax=container")
        );
        assert_eq!(fragment_url("http://m/index.html", "mfs.cgi"), None);
    }

    #[test]
    fn test_fragment_url_with_param() {
        assert_eq!(
            fragment_url_with("http://m/mfs.cgi?sections=CS&CSorder=2", "mfs.cgi", "CSorder", "5").unwrap(),
            Some("http://m/mfs.cgi?ajax=container&sections=CS&CSorder=5".to_string())
        );
        assert_eq!(
            fragment_url_with("http://m/mfs.cgi", "mfs.cgi", "INmatrix", "1").unwrap(),
            Some("http://m/mfs.cgi?ajax=container&INmatrix=1".to_string())
        );
    }

    #[test]
    fn test_graph_info_url() {
        let url = graph_info_url(
            "http://m/mfs.cgi?sections=IN&HDdata=xyz&readonly=0",
            "CS",
            "HDdata=10.0.0.1:9422",
        )
        .unwrap();

        assert_eq!(
            url,
            "http://m/mfs.cgi?sections=CS&readonly=1&ajax=container&selectable=0&HDdata=10.0.0.1:9422"
        );
    }

    #[test]
    fn test_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();

        assert_eq!(timestamp(&at), "2024-03-07 09:05:02");
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Tooltip descriptors and the markup they render to.

use crate::GuiError;
use serde::Deserialize;
use std::collections::HashMap;

/// Severity of a descriptor, in display order.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    Error = 1,
    Warning = 2,
    Info = 3,
    Help = 4,
    /// Anything the descriptor file names that is not known here.
    #[default]
    #[serde(other)]
    Unknown = 0,
}

impl Severity {
    fn icon(self) -> &'static str {
        match self {
            Self::Error => "icon-error",
            Self::Warning => "icon-warning",
            _ => "icon-info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor {
    pub severity: Severity,
    pub title: String,
    pub description: Option<String>,
    pub solution: Option<String>,
}

impl Descriptor {
    /// Stand-in for an id the descriptor file does not know.
    pub fn missing(id: &str) -> Self {
        Self {
            severity: Severity::Info,
            title: "Missing tooltip details".into(),
            description: Some(format!("Missing details for this tooltip: <b>{}</b>.", id)),
            solution: Some("Please report it to MooseFS support.".into()),
        }
    }
    /// A descriptor given directly on the element, made of a title only.
    pub fn inline(severity: Severity, title: &str) -> Self {
        Self {
            severity,
            title: title.into(),
            description: None,
            solution: None,
        }
    }
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    solution: Option<String>,
}

fn non_empty(x: Option<String>) -> Option<String> {
    x.filter(|x| !x.is_empty())
}

/// Descriptors by id, as loaded from the descriptor file.
#[derive(Clone, Debug, Default)]
pub struct TooltipMap(HashMap<String, Descriptor>);

impl TooltipMap {
    /// Parses the descriptor file.
    ///
    /// Entries without a title are dropped. One trailing `.` is cut from
    /// titles and the first `Note` of a description starts a new line.
    pub fn from_json(s: &str) -> Result<Self, GuiError> {
        let raw: HashMap<String, RawDescriptor> = serde_json::from_str(s)?;

        let map = raw
            .into_iter()
            .filter_map(|(id, x)| {
                let title = non_empty(x.title)?;
                let title = title.strip_suffix('.').unwrap_or(&title).to_string();

                Some((
                    id,
                    Descriptor {
                        severity: x.severity,
                        title,
                        description: non_empty(x.description).map(|d| d.replacen("Note", "<br/>Note", 1)),
                        solution: non_empty(x.solution),
                    },
                ))
            })
            .collect();

        Ok(Self(map))
    }
    pub fn get(&self, id: &str) -> Option<&Descriptor> {
        self.0.get(id)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Tooltip attributes of one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sources {
    /// `data-tt`, a comma separated list of descriptor ids.
    pub ids: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub info: Option<String>,
    pub help: Option<String>,
}

impl Sources {
    /// The inline descriptor, taken from the most severe inline attribute.
    fn inline(&self) -> Option<Descriptor> {
        [
            (Severity::Error, &self.error),
            (Severity::Warning, &self.warning),
            (Severity::Info, &self.info),
            (Severity::Help, &self.help),
        ]
        .iter()
        .find_map(|(severity, text)| {
            text.as_deref()
                .filter(|x| !x.is_empty())
                .map(|x| Descriptor::inline(*severity, x))
        })
    }
}

/// Descriptors to show for an element, most severe first.
pub fn resolve(map: &TooltipMap, sources: &Sources, show_help: bool) -> Vec<Descriptor> {
    let mut xs: Vec<Descriptor> = sources
        .ids
        .as_deref()
        .filter(|x| !x.is_empty())
        .map(|ids| {
            ids.split(',')
                .map(str::trim)
                .map(|id| map.get(id).cloned().unwrap_or_else(|| Descriptor::missing(id)))
                .collect()
        })
        .unwrap_or_default();

    xs.extend(sources.inline());

    if !show_help {
        xs.retain(|x| x.severity != Severity::Help);
    }

    xs.sort_by_key(|x| x.severity);

    xs
}

fn icon(severity: Severity, scale: f64) -> String {
    format!(
        "<span class=\"icon\"><svg height=\"{size}px\" width=\"{size}px\"><use transform=\"scale({scale})\" xlink:href=\"#{id}\"/></svg></span>",
        size = 12.0 * scale,
        scale = scale,
        id = severity.icon()
    )
}

/// Tooltip markup. Several descriptors become an accordion with the first item open.
pub fn render(xs: &[Descriptor]) -> String {
    let accordion = xs.len() > 1;
    let mut html = String::new();

    if accordion {
        html.push_str("<div class=\"accordion\">");
    }

    for (i, x) in xs.iter().enumerate() {
        if accordion {
            let active = if i == 0 { "active" } else { "" };

            html.push_str(&format!("<div class=\"accordion-item {}\">", active));
        }

        html.push_str("<div class=\"tooltip-title-row accordion-header\">");

        if x.severity != Severity::Help && (x.description.is_some() || x.solution.is_some()) {
            html.push_str(&format!(
                "<div class=\"tooltip-title-icon\">{}</div>",
                icon(x.severity, 1.2)
            ));
        }

        if x.description.is_some() {
            html.push_str(&format!("<div class=\"tooltip-title\">{}</div>", x.title));
        }

        if accordion {
            html.push_str("<svg class=\"accordion-icon\" height=\"12px\" width=\"12px\"><use xlink:href=\"#icon-chevron\"/></svg>");
        }

        html.push_str("</div>");

        if accordion {
            html.push_str("<div class=\"accordion-content\">");
        }

        match x.description.as_ref() {
            Some(d) => html.push_str(&format!(
                "<div class=\"tooltip-description\"><hr class=\"title-bar\">{}</div>",
                d
            )),
            None => html.push_str(&format!("<div class=\"tooltip-description\">{}</div>", x.title)),
        }

        if let Some(s) = x.solution.as_ref() {
            html.push_str(&format!("<div class=\"tooltip-solution\"><b>Fix:</b> {}</div>", s));
        }

        if accordion {
            html.push_str("</div></div>");
        }
    }

    if accordion {
        html.push_str("</div>");
    }

    html
}

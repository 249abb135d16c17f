// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use crate::{storage::Store, GuiError};
use seed::{prelude::*, *};
use std::fmt;

const THEME_KEY: &str = "theme";
const ICON_SELECTOR: &str = "#theme-toggle use";
const HREF: &str = "xlink:href";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Theme {
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl Theme {
    /// The toggle shows the theme a click switches to.
    fn icon(self) -> &'static str {
        match self {
            Self::Dark => "#icon-light",
            Self::Light => "#icon-dark",
        }
    }
    /// Theme a click on a toggle showing `icon` switches to.
    pub fn toggled(icon: &str) -> Self {
        if icon.ends_with("icon-dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

pub fn apply(theme: Theme, store: &impl Store) -> Result<(), GuiError> {
    if let Some(root) = document().document_element() {
        root.set_attribute("data-theme", &theme.to_string())?;
    }

    store.set(THEME_KEY, &theme.to_string());

    if let Some(icon) = document().query_selector(ICON_SELECTOR)? {
        icon.set_attribute(HREF, theme.icon())?;
    }

    Ok(())
}

/// Applies a stored light theme. Dark is the page default.
pub fn init(store: &impl Store) -> Result<(), GuiError> {
    if store.get(THEME_KEY).as_deref() == Some("light") {
        apply(Theme::Light, store)?;
    }

    Ok(())
}

pub fn toggle(store: &impl Store) -> Result<(), GuiError> {
    let icon = document()
        .query_selector(ICON_SELECTOR)?
        .and_then(|x| x.get_attribute(HREF))
        .unwrap_or_default();

    apply(Theme::toggled(&icon), store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_follows_icon() {
        assert_eq!(Theme::toggled("#icon-dark"), Theme::Dark);
        assert_eq!(Theme::toggled("#icon-light"), Theme::Light);
        assert_eq!(Theme::toggled(""), Theme::Light);
        assert_eq!(Theme::Dark.icon(), "#icon-light");
    }
}

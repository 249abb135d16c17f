// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

//! Rotary selectors whose position is kept in a CSS variable.

use crate::{
    extensions::{DocumentExt as _, ElementExt as _},
    storage::Store,
    GuiError,
};
use number_formatter::parse_int_prefix;
use seed::{prelude::*, *};
use web_sys::{Element, HtmlElement};

const KNOB_SELECTOR: &str = ".knob-arrow";
const SELECTED_ATTR: &str = "data-selected-rotation";
const INITIAL_ATTR: &str = "data-initial-rotation";
const NO_STORE_CLASS: &str = "dont-store";

fn variable(id: &str) -> String {
    format!("--{}-knob-rotation", id)
}

fn storage_key(id: &str) -> String {
    format!("{}-knob-rotation", id)
}

/// Rotation a knob starts at: its selected attribute, then the stored value,
/// then its initial attribute. Unreadable values are passed over.
pub fn initial_rotation(selected: Option<&str>, stored: Option<&str>, initial: Option<&str>) -> Option<i64> {
    [selected, stored, initial]
        .iter()
        .flatten()
        .find_map(|x| parse_int_prefix(x))
}

/// Index of the position following `current` in `rotations`.
///
/// An unknown current rotation moves to the first position.
pub fn next_index(current: Option<i64>, rotations: &[i64]) -> Option<usize> {
    if rotations.is_empty() {
        return None;
    }

    let next = current
        .and_then(|x| rotations.iter().position(|r| *r == x))
        .map(|i| i + 1)
        .unwrap_or(0);

    Some(next % rotations.len())
}

/// Turns knob `id` to `degrees` and remembers it.
pub fn rotate(id: &str, degrees: i64, store: &impl Store) -> Result<(), GuiError> {
    let root = document()
        .document_element()
        .ok_or_else(|| GuiError::MissingElement("html".into()))?;

    root.set_style(&variable(id), &format!("{}deg", degrees))?;

    if let Some(knob) = document().find::<Element>(id) {
        knob.set_attribute(SELECTED_ATTR, &degrees.to_string())?;

        if !knob.has_class(NO_STORE_CLASS) {
            store.set(&storage_key(id), &degrees.to_string());
        }
    }

    Ok(())
}

/// Restores the rotation of every knob on the page.
pub fn init_all(store: &impl Store) -> Result<(), GuiError> {
    for knob in document().select_all(KNOB_SELECTOR) {
        let id = knob.id();

        if id.is_empty() {
            continue;
        }

        let stored = store.get(&storage_key(&id));

        let degrees = initial_rotation(
            knob.get_attribute(SELECTED_ATTR).as_deref(),
            stored.as_deref(),
            knob.get_attribute(INITIAL_ATTR).as_deref(),
        );

        if let Some(degrees) = degrees {
            rotate(&id, degrees, store)?;
        }
    }

    Ok(())
}

fn current_rotation(id: &str) -> Result<Option<i64>, GuiError> {
    let body: HtmlElement = document()
        .body()
        .ok_or_else(|| GuiError::MissingElement("body".into()))?;

    let value = match window().get_computed_style(&body)? {
        Some(style) => style.get_property_value(&variable(id))?,
        None => return Ok(None),
    };

    Ok(parse_int_prefix(&value))
}

fn run_action(action: &JsValue) -> Result<(), GuiError> {
    if let Some(f) = action.dyn_ref::<js_sys::Function>() {
        f.call0(&JsValue::NULL)?;
    } else if let Some(code) = action.as_string() {
        js_sys::Function::new_no_args(&code).call0(&JsValue::NULL)?;
    }

    Ok(())
}

/// Turns knob `id` to its next position and runs the action of that position.
///
/// `actions` holds functions, or source text, by position.
pub fn rotate_next(
    id: &str,
    rotations: &[i64],
    actions: &js_sys::Array,
    store: &impl Store,
) -> Result<(), GuiError> {
    let index = match next_index(current_rotation(id)?, rotations) {
        Some(x) => x,
        None => return Ok(()),
    };

    run_action(&actions.get(index as u32))?;

    rotate(id, rotations[index], store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_index_wraps() {
        let rotations = [-45, 0, 45];

        assert_eq!(next_index(Some(-45), &rotations), Some(1));
        assert_eq!(next_index(Some(0), &rotations), Some(2));
        assert_eq!(next_index(Some(45), &rotations), Some(0));
    }

    #[test]
    fn test_next_index_unknown_rotation() {
        assert_eq!(next_index(Some(90), &[-45, 0, 45]), Some(0));
        assert_eq!(next_index(None, &[-45, 0, 45]), Some(0));
        assert_eq!(next_index(Some(0), &[]), None);
    }

    #[test]
    fn test_initial_rotation_order() {
        assert_eq!(initial_rotation(Some("30"), Some("60"), Some("90")), Some(30));
        assert_eq!(initial_rotation(None, Some("60"), Some("90")), Some(60));
        assert_eq!(initial_rotation(None, None, Some("-90")), Some(-90));
        assert_eq!(initial_rotation(None, None, None), None);
        assert_eq!(initial_rotation(None, Some("garbage"), Some("90")), Some(90));
    }
}

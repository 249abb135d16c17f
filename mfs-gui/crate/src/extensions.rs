// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use crate::GuiError;
use seed::{prelude::*, *};
use web_sys::{Document, Element, HtmlCollection, HtmlElement, NodeList};

/// Extension methods for the Document API object.
pub(crate) trait DocumentExt {
    /// Finds an element by id and casts it. Missing or mistyped elements give `None`.
    fn find<T: JsCast>(&self, id: &str) -> Option<T>;
    /// Finds an element by id and casts it, failing with a descriptive error.
    fn require<T: JsCast>(&self, id: &str) -> Result<T, GuiError>;
    /// `querySelectorAll` collected into elements.
    fn select_all(&self, selector: &str) -> Vec<Element>;
}

impl DocumentExt for Document {
    fn find<T: JsCast>(&self, id: &str) -> Option<T> {
        self.get_element_by_id(id).and_then(|x| x.dyn_into::<T>().ok())
    }
    fn require<T: JsCast>(&self, id: &str) -> Result<T, GuiError> {
        self.get_element_by_id(id)
            .ok_or_else(|| GuiError::MissingElement(id.into()))?
            .dyn_into::<T>()
            .map_err(|_| GuiError::UnexpectedType(std::any::type_name::<T>()))
    }
    fn select_all(&self, selector: &str) -> Vec<Element> {
        self.query_selector_all(selector)
            .map(|xs| xs.elements())
            .unwrap_or_default()
    }
}

/// Extension methods for `Element`.
pub(crate) trait ElementExt {
    fn has_class(&self, class: &str) -> bool;
    /// Sets an inline style property. Non-HTML elements are left alone.
    fn set_style(&self, property: &str, value: &str) -> Result<(), GuiError>;
    fn select_all(&self, selector: &str) -> Vec<Element>;
}

impl ElementExt for Element {
    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }
    fn set_style(&self, property: &str, value: &str) -> Result<(), GuiError> {
        if let Some(el) = self.dyn_ref::<HtmlElement>() {
            el.style().set_property(property, value)?;
        }

        Ok(())
    }
    fn select_all(&self, selector: &str) -> Vec<Element> {
        self.query_selector_all(selector)
            .map(|xs| xs.elements())
            .unwrap_or_default()
    }
}

/// Collects live DOM lists into owned vectors so they can be mutated while iterating.
pub(crate) trait ElementsExt {
    fn elements(&self) -> Vec<Element>;
}

impl ElementsExt for NodeList {
    fn elements(&self) -> Vec<Element> {
        (0..self.length())
            .filter_map(|i| self.item(i))
            .filter_map(|x| x.dyn_into::<Element>().ok())
            .collect()
    }
}

impl ElementsExt for HtmlCollection {
    fn elements(&self) -> Vec<Element> {
        (0..self.length()).filter_map(|i| self.item(i)).collect()
    }
}

/// Logs and discards errors from best-effort browser calls.
pub(crate) trait LogErrExt<T> {
    fn log_err(self, context: &str) -> Option<T>;
}

impl<T, E: Into<GuiError>> LogErrExt<T> for Result<T, E> {
    fn log_err(self, context: &str) -> Option<T> {
        match self {
            Ok(x) => Some(x),
            Err(e) => {
                error!(format!("{}: {}", context, e.into()));

                None
            }
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_log_err_takes_browser_errors() {
        assert_eq!(Err::<(), _>(JsValue::from_str("boom")).log_err("test"), None);
        assert_eq!(Ok::<_, JsValue>(3).log_err("test"), Some(3));
        assert_eq!(
            Err::<(), _>(GuiError::MissingElement("x".into())).log_err("test"),
            None
        );
    }

    #[wasm_bindgen_test]
    fn test_failed_class_change_is_reported() {
        let el = document().create_element("div").unwrap();

        // An empty token is a SyntaxError in DOMTokenList.
        assert_eq!(el.class_list().add_1("").log_err("test"), None);
        assert_eq!(el.class_list().add_1("ok").log_err("test"), Some(()));
    }
}

// Copyright (c) 2021 DDN. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file.

use seed::browser::fetch::FetchError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GuiError {
    #[error("Browser call failed: {0}")]
    Js(String),
    #[error("Request failed: {0}")]
    Fetch(String),
    #[error("Element not found: {0}")]
    MissingElement(String),
    #[error("Unexpected element type, wanted {0}")]
    UnexpectedType(&'static str),
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),
}

impl From<JsValue> for GuiError {
    fn from(err: JsValue) -> Self {
        GuiError::Js(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }
}

impl From<FetchError> for GuiError {
    fn from(err: FetchError) -> Self {
        GuiError::Fetch(format!("{:?}", err))
    }
}

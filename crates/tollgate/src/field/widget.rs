//! Hidden input carrying the client token.

use std::collections::HashMap;

use tollgate_common::constants::{HIDDEN_INPUT_CLASS, RESPONSE_FIELD};

use crate::render::escape_attr;

/// Hidden `<input>` the client script fills with the token
#[derive(Debug, Clone, Default)]
pub struct HiddenInput {
    /// Extra attributes rendered on the element, in order
    pub attrs: Vec<(String, String)>,
}

impl HiddenInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Token from submitted form data.
    ///
    /// Always read from `g-recaptcha-response`, whatever the field is called
    /// in the host form.
    pub fn value_from_form<'a>(&self, form: &'a HashMap<String, String>) -> Option<&'a str> {
        form.get(RESPONSE_FIELD).map(String::as_str)
    }

    pub fn render(&self) -> String {
        let mut html = format!(
            r#"<input type="hidden" name="{}" class="{}""#,
            RESPONSE_FIELD, HIDDEN_INPUT_CLASS
        );
        for (name, value) in &self.attrs {
            html.push_str(&format!(r#" {}="{}""#, escape_attr(name), escape_attr(value)));
        }
        html.push('>');
        html
    }
}

//! Client-side markup for the invisible challenge.
//!
//! Three snippets, matching how a page uses the client API:
//! - `init` loads `api.js` for the site key
//! - `ready` runs the challenge once the API has loaded
//! - `execute` runs the challenge immediately (e.g. before a resubmit)
//!
//! Both `ready` and `execute` copy the token into every hidden token input
//! on the page and then call the optional callback with it.

use tollgate_common::ConfigError;
use tollgate_common::constants::{API_SCRIPT_PATH, DEFAULT_VERIFY_HOST, HIDDEN_INPUT_CLASS};

use crate::config::RecaptchaSettings;

/// Renders challenge markup from the process-wide settings
#[derive(Debug, Clone)]
pub struct Renderer {
    public_key: Option<String>,
    default_action: String,
    frontend_host: String,
    language: Option<String>,
}

impl Renderer {
    pub fn new(settings: &RecaptchaSettings) -> Self {
        Self {
            public_key: settings.public_key.clone(),
            default_action: settings.default_action.clone(),
            frontend_host: settings
                .frontend_proxy_host
                .clone()
                .unwrap_or_else(|| DEFAULT_VERIFY_HOST.to_string()),
            language: settings.language.clone(),
        }
    }

    /// Site key: explicit value, then the configured one. Empty values
    /// count as unset.
    pub fn site_key<'a>(&'a self, public_key: Option<&'a str>) -> Result<&'a str, ConfigError> {
        non_empty(public_key)
            .or_else(|| non_empty(self.public_key.as_deref()))
            .ok_or(ConfigError::MissingPublicKey)
    }

    /// `<script>` tag loading the client API
    pub fn init(&self, public_key: Option<&str>) -> Result<String, ConfigError> {
        let key = self.site_key(public_key)?;

        let mut src = format!(
            "{}{}?render={}",
            self.frontend_host.trim_end_matches('/'),
            API_SCRIPT_PATH,
            urlencoding::encode(key)
        );
        if let Some(ref language) = self.language {
            src.push_str("&hl=");
            src.push_str(&urlencoding::encode(language));
        }

        Ok(format!(r#"<script src="{}"></script>"#, escape_attr(&src)))
    }

    /// Run the challenge once the client API is ready
    pub fn ready(
        &self,
        public_key: Option<&str>,
        action: Option<&str>,
        callback: Option<&str>,
    ) -> Result<String, ConfigError> {
        let body = self.execute_js(public_key, action, callback)?;
        Ok(format!(
            "<script>\ngrecaptcha.ready(function() {{\n{}\n}});\n</script>",
            body
        ))
    }

    /// Run the challenge immediately
    pub fn execute(
        &self,
        public_key: Option<&str>,
        action: Option<&str>,
        callback: Option<&str>,
    ) -> Result<String, ConfigError> {
        let body = self.execute_js(public_key, action, callback)?;
        Ok(format!("<script>\n{}\n</script>", body))
    }

    fn execute_js(
        &self,
        public_key: Option<&str>,
        action: Option<&str>,
        callback: Option<&str>,
    ) -> Result<String, ConfigError> {
        let key = self.site_key(public_key)?;
        if !is_site_key(key) {
            return Err(ConfigError::InvalidPublicKey(key.to_string()));
        }

        let action = non_empty(action).unwrap_or(&self.default_action);
        if !is_action_name(action) {
            return Err(ConfigError::InvalidAction(action.to_string()));
        }

        let callback_call = match callback {
            Some(name) if is_js_identifier_path(name) => format!("\n        {}(token);", name),
            Some(name) => return Err(ConfigError::InvalidCallback(name.to_string())),
            None => String::new(),
        };

        Ok(format!(
            r#"grecaptcha.execute('{key}', {{action: '{action}'}}).then(function(token) {{
        document.querySelectorAll('input.{class}').forEach(function(input) {{
            input.value = token;
        }});{callback_call}
        return token;
    }});"#,
            key = key,
            action = action,
            class = HIDDEN_INPUT_CLASS,
            callback_call = callback_call,
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Escape a value for a double-quoted HTML attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

// Site keys are URL-safe base64-like strings
fn is_site_key(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// Actions may only contain alphanumerics, slashes, and underscores
fn is_action_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '/' || c == '_')
}

fn is_js_identifier_path(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}

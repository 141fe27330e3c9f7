use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::Params;
use crate::DiscoveryError;

/// Regular expression for matching URL placeholders `{name}` and `{+name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<reserved>\+)?(?<name>\w+)}").expect("a valid regex"));

/// Characters kept as-is by reserved expansion (`{+name}`).
const RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b':')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode_path_param_value(value: &str, reserved: bool) -> String {
    let set = if reserved { RESERVED } else { NON_ALPHANUMERIC };
    utf8_percent_encode(value, set).to_string()
}

/// Renders a parameter value the way it appears in a URL.
///
/// Arrays are comma separated, `null` yields `None`.
pub(super) fn param_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => Some(value.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(param_to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
    }
}

/// Substitutes the path parameters into `template`, removing them from `params`.
pub(super) fn resolve_path(
    template: &str,
    path_params: &[String],
    params: &mut Params,
) -> Result<String, DiscoveryError> {
    let mut path = template.to_string();

    // Collect placeholders first, the template is rewritten below
    let placeholders: Vec<(String, String, bool)> = RE
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?.as_str().to_string();
            let name = caps.name("name")?.as_str().to_string();
            Some((whole, name, caps.name("reserved").is_some()))
        })
        .collect();

    for name in path_params {
        let Some(value) = params.shift_remove(name) else {
            continue;
        };
        let Some(text) = param_to_string(&value) else {
            continue;
        };

        let mut found = false;
        for (placeholder, _, reserved) in placeholders.iter().filter(|(_, it, _)| it == name) {
            let encoded = encode_path_param_value(&text, *reserved);
            path = path.replace(placeholder.as_str(), &encoded);
            found = true;
        }
        if !found {
            warn!(?name, "path parameter not found in URL template");
        }
    }

    let missings: Vec<String> = RE
        .captures_iter(&path)
        .filter_map(|caps| caps.name("name"))
        .map(|it| it.as_str().to_string())
        .collect();

    if missings.is_empty() {
        Ok(path)
    } else {
        Err(DiscoveryError::PathUnresolved { path, missings })
    }
}

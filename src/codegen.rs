//! Client code generation (cURL and fetch)
//!
//! Both renderers are pure: the same `RequestInfo` always yields the same
//! string. Header values are quoted but not escaped.

use serde_json::{Map, Value};

use crate::constants::JSON_CONTENT_TYPE;
use crate::models::RequestInfo;

/// Code panel formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CodeView {
    #[default]
    Curl,
    Fetch,
}

impl CodeView {
    pub fn as_str(&self) -> &str {
        match self {
            CodeView::Curl => "cURL",
            CodeView::Fetch => "Fetch - JavaScript",
        }
    }

    pub fn render(&self, info: &RequestInfo) -> String {
        match self {
            CodeView::Curl => to_shell_command(info),
            CodeView::Fetch => to_fetch_snippet(info),
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Double-quoted string literal valid in JavaScript
fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn is_json_content(info: &RequestInfo) -> bool {
    info.header("Content-Type").is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|media| media.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
    })
}

/// Format request as cURL command
pub fn to_shell_command(info: &RequestInfo) -> String {
    let mut lines = vec![format!("\t--url {}", info.url)];

    for (key, value) in &info.headers {
        lines.push(format!("\t-H '{}: {}'", key, value));
    }

    if let Some(body) = &info.body {
        lines.push(format!("\t-d '{}'", pretty(body).replace('\'', "'\\''")));
    }

    format!("curl -X {} \\\n{}", info.method.as_str(), lines.join(" \\\n"))
}

/// Format request as a JavaScript fetch call
pub fn to_fetch_snippet(info: &RequestInfo) -> String {
    let headers: Map<String, Value> = info
        .headers
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let mut fields = vec![
        format!("method: {}", js_string(info.method.as_str())),
        format!("headers: {}", indent_tail(&pretty(&Value::Object(headers)))),
    ];
    if let Some(body) = &info.body {
        fields.push(format!("body: JSON.stringify({})", indent_tail(&pretty(body))));
    }

    let continuation = if is_json_content(info) {
        "\n\t.then((res) => res.json())\n\t.then((json) => console.log(json))"
    } else {
        ""
    };

    format!(
        "const options = {{\n\t{}\n}};\n\nfetch({}, options){};",
        fields.join(",\n\t"),
        js_string(&info.url),
        continuation
    )
}

/// Indent every line after the first by one tab
fn indent_tail(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\n\t")
}

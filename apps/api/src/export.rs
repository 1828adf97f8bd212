//! Story export: plain-text and minimally styled HTML downloads.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::{AppError, AppJson};

const FALLBACK_FILENAME: &str = "autobiography";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Html,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Html => "html",
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

/// A rendered file ready to be served as an attachment.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    /// ASCII-only name for the plain `filename` parameter.
    pub filename: String,
    /// Full UTF-8 name, sent as the RFC 5987 `filename*` parameter.
    pub filename_utf8: String,
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for ExportDocument {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
                        self.filename,
                        encode_ext_value(&self.filename_utf8)
                    ),
                ),
            ],
            self.body,
        )
            .into_response()
    }
}

pub fn render(title: &str, content: &str, format: ExportFormat) -> ExportDocument {
    let body = match format {
        ExportFormat::Txt => content.to_string(),
        ExportFormat::Html => render_html(title, content),
    };
    ExportDocument {
        filename: format!("{}.{}", filename_stem(title, false), format.extension()),
        filename_utf8: format!("{}.{}", filename_stem(title, true), format.extension()),
        content_type: format.content_type(),
        body,
    }
}

fn render_html(title: &str, content: &str) -> String {
    let title = escape_html(title);
    let paragraphs = content
        .lines()
        .map(|line| format!("  <p>{}</p>", escape_html(line)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
    body {{ font-family: Georgia, serif; max-width: 800px; margin: 0 auto; padding: 40px; line-height: 1.8; }}
    h1 {{ text-align: center; margin-bottom: 40px; }}
    p {{ margin-bottom: 20px; text-align: justify; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
{paragraphs}
</body>
</html>
"#
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Title with characters that would break a `Content-Disposition` header or a
/// file path replaced by `_`. Non-ASCII characters are replaced too unless
/// `keep_unicode` is set.
fn filename_stem(title: &str, keep_unicode: bool) -> String {
    let title = title.trim();
    if title.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    title
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() || (!keep_unicode && !c.is_ascii()) => '_',
            c => c,
        })
        .collect()
}

/// Percent-encodes `value` as an RFC 5987 `ext-value`, leaving only `attr-char`s bare.
fn encode_ext_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub title: String,
    pub content: String,
    pub format: ExportFormat,
}

/// POST /api/v1/export
///
/// Exports text that has not been saved as a story yet.
pub async fn handle_export(
    AppJson(req): AppJson<ExportRequest>,
) -> Result<ExportDocument, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    Ok(render(&req.title, &req.content, req.format))
}

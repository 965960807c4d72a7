//! Note export: markdown, JSON, and standalone HTML.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use t2p_protocols::note::Note;
use t2p_store::StoreError;

use crate::error::ServiceError;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
    Html,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            "html" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

pub(crate) fn to_markdown(notes: &[&Note]) -> String {
    let mut content = String::from("# Exported Notes\n\n");
    content.push_str(&format!("Exported on: {}\n\n", Utc::now().to_rfc3339()));

    for note in notes {
        content.push_str(&format!("## {}\n\n", note.title));
        content.push_str(&format!("{}\n\n", note.content));
        if !note.tags.is_empty() {
            content.push_str(&format!("**Tags**: {}\n\n", note.tags.join(", ")));
        }
        if let Some(category) = &note.category {
            content.push_str(&format!("**Category**: {}\n\n", category));
        }
        content.push_str(&format!("*Created: {}*\n", note.created_at.to_rfc3339()));
        content.push_str(&format!("*Updated: {}*\n\n", note.updated_at.to_rfc3339()));
        content.push_str("---\n\n");
    }

    content
}

pub(crate) fn to_json(notes: &[&Note]) -> Result<String, ServiceError> {
    let payload = serde_json::json!({
        "exported": Utc::now().to_rfc3339(),
        "notes": notes,
    });
    serde_json::to_string_pretty(&payload)
        .map_err(|e| ServiceError::Store(StoreError::Serialize(e.to_string())))
}

pub(crate) fn to_html(notes: &[&Note]) -> String {
    let mut body = String::new();
    for note in notes {
        body.push_str("<div class=\"note\">\n");
        body.push_str(&format!("<h2>{}</h2>\n", escape_html(&note.title)));
        body.push_str(&format!(
            "<div class=\"content\">{}</div>\n",
            markdown_to_html(&note.content)
        ));
        if !note.tags.is_empty() {
            let tags: Vec<String> = note.tags.iter().map(|t| escape_html(t)).collect();
            body.push_str(&format!(
                "<p class=\"tags\"><strong>Tags:</strong> {}</p>\n",
                tags.join(", ")
            ));
        }
        if let Some(category) = &note.category {
            body.push_str(&format!(
                "<p class=\"category\"><strong>Category:</strong> {}</p>\n",
                escape_html(category)
            ));
        }
        body.push_str(&format!(
            "<p class=\"meta\">Created: {}<br>Updated: {}</p>\n",
            note.created_at.to_rfc3339(),
            note.updated_at.to_rfc3339()
        ));
        body.push_str("</div>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Exported Notes</title>
<style>
body {{ font-family: sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; }}
h1 {{ border-bottom: 2px solid #eaecef; padding-bottom: 10px; }}
h2 {{ margin-top: 30px; border-bottom: 1px solid #eaecef; padding-bottom: 5px; }}
.tags, .category, .meta {{ font-size: 0.9em; color: #666; }}
.note {{ margin-bottom: 40px; padding-bottom: 20px; border-bottom: 1px solid #eee; }}
</style>
</head>
<body>
<h1>Exported Notes</h1>
<p>Exported on: {}</p>
{}</body>
</html>
"#,
        Utc::now().to_rfc3339(),
        body
    )
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());

/// Minimal markdown-to-HTML conversion: headers, bold/italic, links,
/// bullet and numbered lists, paragraphs. Not a markdown parser; good
/// enough for the cosmetic HTML export.
pub(crate) fn markdown_to_html(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let escaped = escape_html(markdown);
    let mut html = String::new();
    let mut list_tag: Option<&'static str> = None;
    let mut paragraph: Vec<String> = Vec::new();

    let close_list = |html: &mut String, list_tag: &mut Option<&'static str>| {
        if let Some(tag) = list_tag.take() {
            html.push_str(&format!("</{}>\n", tag));
        }
    };
    let flush_paragraph = |html: &mut String, paragraph: &mut Vec<String>| {
        if !paragraph.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", paragraph.join(" ")));
            paragraph.clear();
        }
    };

    for line in escaped.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            close_list(&mut html, &mut list_tag);
            flush_paragraph(&mut html, &mut paragraph);
            continue;
        }

        if let Some(heading) = trimmed.strip_prefix("### ") {
            close_list(&mut html, &mut list_tag);
            flush_paragraph(&mut html, &mut paragraph);
            html.push_str(&format!("<h3>{}</h3>\n", inline(heading)));
        } else if let Some(heading) = trimmed.strip_prefix("## ") {
            close_list(&mut html, &mut list_tag);
            flush_paragraph(&mut html, &mut paragraph);
            html.push_str(&format!("<h2>{}</h2>\n", inline(heading)));
        } else if let Some(heading) = trimmed.strip_prefix("# ") {
            close_list(&mut html, &mut list_tag);
            flush_paragraph(&mut html, &mut paragraph);
            html.push_str(&format!("<h1>{}</h1>\n", inline(heading)));
        } else if let Some(item) = trimmed.strip_prefix("- ") {
            flush_paragraph(&mut html, &mut paragraph);
            if list_tag != Some("ul") {
                close_list(&mut html, &mut list_tag);
                html.push_str("<ul>\n");
                list_tag = Some("ul");
            }
            html.push_str(&format!("<li>{}</li>\n", inline(item)));
        } else if let Some(item) = numbered_item(trimmed) {
            flush_paragraph(&mut html, &mut paragraph);
            if list_tag != Some("ol") {
                close_list(&mut html, &mut list_tag);
                html.push_str("<ol>\n");
                list_tag = Some("ol");
            }
            html.push_str(&format!("<li>{}</li>\n", inline(item)));
        } else {
            close_list(&mut html, &mut list_tag);
            paragraph.push(inline(trimmed));
        }
    }

    close_list(&mut html, &mut list_tag);
    flush_paragraph(&mut html, &mut paragraph);
    html
}

fn numbered_item(line: &str) -> Option<&str> {
    let dot = line.find(". ")?;
    (dot > 0 && line[..dot].chars().all(|c| c.is_ascii_digit())).then(|| &line[dot + 2..])
}

fn inline(text: &str) -> String {
    let text = LINK.replace_all(text, "<a href=\"$2\">$1</a>");
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    ITALIC.replace_all(&text, "<em>$1</em>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn note(title: &str, content: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            tags: vec!["x".to_string()],
            category: Some("work".to_string()),
            related_todos: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_draft: false,
            ai_generated: None,
            source_url: None,
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::from_str("md").unwrap(), ExportFormat::Markdown);
        assert_eq!(ExportFormat::from_str("HTML").unwrap(), ExportFormat::Html);
        assert!(ExportFormat::from_str("pdf").is_err());
    }

    #[test]
    fn test_markdown_export_sections() {
        let n = note("Title one", "Body text");
        let out = to_markdown(&[&n]);
        assert!(out.contains("# Exported Notes"));
        assert!(out.contains("## Title one"));
        assert!(out.contains("**Tags**: x"));
        assert!(out.contains("**Category**: work"));
    }

    #[test]
    fn test_json_export_shape() {
        let n = note("Title", "Body");
        let out = to_json(&[&n]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["exported"].is_string());
        assert_eq!(value["notes"][0]["title"], "Title");
    }

    #[test]
    fn test_html_export_escapes() {
        let n = note("<script>alert(1)</script>", "safe");
        let out = to_html(&[&n]);
        assert!(!out.contains("<script>alert"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_markdown_to_html_blocks() {
        let html = markdown_to_html("# Head\n\n- one\n- two\n\n1. first\n2. second\n\npara **bold** *it*");
        assert!(html.contains("<h1>Head</h1>"));
        assert!(html.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"));
        assert!(html.contains("<ol>\n<li>first</li>\n<li>second</li>\n</ol>"));
        assert!(html.contains("<p>para <strong>bold</strong> <em>it</em></p>"));
    }

    #[test]
    fn test_markdown_to_html_links() {
        let html = markdown_to_html("see [docs](https://example.com)");
        assert!(html.contains("<a href=\"https://example.com\">docs</a>"));
    }

    #[test]
    fn test_markdown_to_html_empty() {
        assert_eq!(markdown_to_html(""), "");
    }
}

//! Server-rendered HTML pages.
//!
//! Pages are assembled with `format!`. Every value that came from a user or
//! the database goes through [`escape`] before it is interpolated.

pub mod auth;
pub mod error;
pub mod inventory;
pub mod notice;

use axum::response::Html;
use rust_decimal::Decimal;
use stockroom_core::types::Timestamp;

pub use notice::Notice;

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f5f6f8}\
nav{display:flex;gap:1rem;align-items:center;padding:.75rem 1.5rem;background:#263445;color:#fff}\
nav a{color:#fff}nav form{margin-left:auto}main{max-width:960px;margin:1.5rem auto;padding:0 1rem}\
table{width:100%;border-collapse:collapse;background:#fff}th,td{padding:.5rem;border-bottom:1px solid #ddd;text-align:left}\
.notice{padding:.75rem;background:#e3f4e6;border:1px solid #9ccfa6}\
.errors{padding:.75rem;background:#fbe5e5;border:1px solid #e3a1a1}\
.totals{display:flex;gap:2rem;margin:1rem 0}.thumb{max-width:64px;max-height:64px}";

/// Escape text for safe inclusion in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a money amount with two decimals.
pub fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Format a timestamp as `DD/MM/YYYY HH:MM`.
pub fn timestamp(ts: &Timestamp) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

/// Who the page is rendered for. `None` renders the anonymous navigation.
pub type Viewer<'a> = Option<&'a str>;

/// Wrap `body` in the shared layout.
pub fn layout(title: &str, viewer: Viewer<'_>, notice: Option<Notice>, body: &str) -> Html<String> {
    let nav = match viewer {
        Some(username) => format!(
            r#"<a href="/">Dashboard</a><a href="/add">Add item</a>
<form action="/search" method="get"><input type="search" name="q" placeholder="Search items"> <button type="submit">Search</button></form>
<span>Signed in as <strong>{}</strong></span> <a href="/logout">Log out</a>"#,
            escape(username)
        ),
        None => r#"<a href="/login">Log in</a><a href="/register">Register</a>"#.to_string(),
    };

    let banner = notice
        .map(|n| format!(r#"<p class="notice" role="status">{}</p>"#, escape(n.message())))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Stockroom</title>
<style>{STYLE}</style>
</head>
<body>
<nav><strong>Stockroom</strong>{nav}</nav>
<main>
{banner}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    ))
}

/// Render form problems as a list, or nothing when there are none.
pub fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!(r#"<ul class="errors" role="alert">{items}</ul>"#)
}

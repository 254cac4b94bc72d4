use axum::http::StatusCode;
use axum::response::Html;

use super::{escape, layout};

/// Standalone error page. Rendered without a viewer since the failing request
/// may not have resolved one.
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let heading = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<h1>{code} {heading}</h1>
<p>{message}</p>
<p><a href="/">Back to the dashboard</a></p>"#,
        code = status.as_u16(),
        heading = escape(heading),
        message = escape(message),
    );
    layout(heading, None, None, &body)
}

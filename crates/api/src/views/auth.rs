//! Login and registration pages.

use axum::response::Html;

use super::{error_list, escape, layout, Notice};

/// Values echoed back into the registration form after a failed submit.
/// Passwords are never echoed.
#[derive(Debug, Default)]
pub struct RegisterValues<'a> {
    pub username: &'a str,
    pub email: &'a str,
}

pub fn register_page(values: &RegisterValues<'_>, errors: &[String]) -> Html<String> {
    let body = format!(
        r#"<h1>Create an account</h1>
{errors}
<form action="/register" method="post">
<p><label>Username<br><input type="text" name="username" value="{username}" minlength="3" required></label></p>
<p><label>Email<br><input type="email" name="email" value="{email}" required></label></p>
<p><label>Password<br><input type="password" name="password" minlength="6" required></label></p>
<p><label>Confirm password<br><input type="password" name="confirm_password" minlength="6" required></label></p>
<p><button type="submit">Register</button></p>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
        errors = error_list(errors),
        username = escape(values.username),
        email = escape(values.email),
    );
    layout("Register", None, None, &body)
}

/// Login form. `next` is carried through as a hidden field so a successful
/// login can return to the page that demanded it.
pub fn login_page(
    username: &str,
    next: Option<&str>,
    notice: Option<Notice>,
    errors: &[String],
) -> Html<String> {
    let next_field = next
        .map(|n| format!(r#"<input type="hidden" name="next" value="{}">"#, escape(n)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Log in</h1>
{errors}
<form action="/login" method="post">
{next_field}
<p><label>Username<br><input type="text" name="username" value="{username}" required></label></p>
<p><label>Password<br><input type="password" name="password" required></label></p>
<p><label><input type="checkbox" name="remember" value="on"> Remember me</label></p>
<p><button type="submit">Log in</button></p>
</form>
<p>No account yet? <a href="/register">Register</a></p>"#,
        errors = error_list(errors),
        username = escape(username),
    );
    layout("Log in", None, notice, &body)
}

//! One-shot flash alerts carried across a redirect in a cookie.

use actix_web::HttpRequest;
use actix_web::cookie::Cookie;
use actix_web::cookie::time::Duration;

use crate::services::markup;

/// Cookie holding a pending alert message.
pub const FLASH_ALERT_COOKIE: &str = "_flash_alert";

/// Seconds a pending alert survives if nobody reads it.
const FLASH_MAX_AGE_SECS: i64 = 60;

/// Cookie carrying `message` to the next page.
pub fn alert_cookie(message: &str) -> Cookie<'static> {
    Cookie::build(FLASH_ALERT_COOKIE, urlencoding::encode(message).into_owned())
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(FLASH_MAX_AGE_SECS))
        .finish()
}

/// Pending alert on the request, if any.
pub fn take_alert(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(FLASH_ALERT_COOKIE)?;
    urlencoding::decode(cookie.value())
        .ok()
        .map(|m| m.into_owned())
        .filter(|m| !m.is_empty())
}

/// Cookie that removes the pending alert.
pub fn clear_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_ALERT_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// HTML fragment for an error alert, as shown above a page's content.
pub fn render_alert(message: &str) -> String {
    format!(
        r#"<div class="alert alert-danger" role="alert">{}</div>"#,
        markup::escape(message)
    )
}

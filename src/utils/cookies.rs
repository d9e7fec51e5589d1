//! Cookie de sesión
//!
//! El token de sesión viaja en una cookie HTTP-only llamada `token`.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "token";

/// Cookie con el token de sesión
pub fn session_cookie(token: impl Into<String>, max_age_secs: u64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.into()))
        .http_only(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX)))
        .secure(secure)
        .build()
}

/// Cookie vacía que invalida la sesión
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(String::new(), 0, secure)
}

/// Busca el token de sesión en las cabeceras `Cookie`
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Path fragments of authentication pages job boards redirect to.
static AUTH_PATH_MARKERS: &[&str] = &[
    "login",
    "signin",
    "sign-in",
    "auth",
    "authwall",
    "sso",
    "uas/",
    "checkpoint",
];

/// Phrases a login-walled page shows in place of the posting.
static LOGIN_PHRASES: &[&str] = &[
    "sign in",
    "please sign in",
    "please log in",
    "login required",
    "log in to",
    "you must be logged in",
    "sign in to view",
    "join to view",
    "create an account to",
];

/// A fetched page counts as login-walled when the redirect landed on an auth
/// path, or when the body carries a login prompt. Either signal suffices.
pub fn is_login_walled(requested_url: &str, final_url: &str, body: &str) -> bool {
    redirected_to_auth(requested_url, final_url) || body_asks_for_login(body)
}

fn redirected_to_auth(requested_url: &str, final_url: &str) -> bool {
    if requested_url.trim_end_matches('/') == final_url.trim_end_matches('/') {
        return false;
    }
    let final_lower = final_url.to_lowercase();
    AUTH_PATH_MARKERS
        .iter()
        .any(|marker| final_lower.contains(marker))
}

fn body_asks_for_login(body: &str) -> bool {
    let lower = body.to_lowercase();
    LOGIN_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

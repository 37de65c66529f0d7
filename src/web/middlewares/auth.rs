use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    auth,
    web::{AppState, RequestContext, context::AuthenticatedUser, error::WebError},
};

pub static AUTH_TOKEN: &str = "SID";

fn bearer_token(req: &Request) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}

/// Cookie first, then `Authorization: Bearer`. A cookie that fails to verify
/// falls through to the header. No token leaves the context anonymous; a bad
/// one with nothing valid behind it is rejected.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let candidates = cookies
        .get(AUTH_TOKEN)
        .map(|cookie| (AUTH_TOKEN, cookie.value().to_string()))
        .into_iter()
        .chain(bearer_token(&req).map(|token| ("Authorization", token)));

    let mut rejected = None;
    let mut user = None;
    for (source, token) in candidates {
        match auth::verify_token(&token, state.jwt()) {
            Ok(user_id) => {
                user = Some(AuthenticatedUser::new(user_id));
                break;
            }
            Err(e) => {
                tracing::debug!("{source} token rejected: {e}");
                rejected = Some(WebError::auth_token_invalid(source, e));
            }
        }
    }

    if let (None, Some(err)) = (&user, rejected) {
        return Err(err);
    }

    req.extensions_mut().insert(RequestContext::new(user));
    Ok(next.run(req).await)
}

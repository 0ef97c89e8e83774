//! Bearer token authentication for the admin API.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    auth::{AuthError, AuthenticatedAccount, verify_token},
};

/// Require a valid bearer token belonging to an active account.
///
/// On success the account is inserted as an [`AuthenticatedAccount`]
/// extension for handlers to check roles against.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingCredentials)?;
    let claims = verify_token(&state.config.auth, token)?;
    let account_id = claims.account_id()?;

    let account = state
        .services
        .accounts
        .get_by_id(account_id)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .filter(|account| account.is_active())
        .ok_or_else(|| {
            tracing::debug!(account_id = %account_id, "Token for missing or inactive account");
            AuthError::InactiveAccount
        })?;

    tracing::debug!(
        account_id = %account.id,
        role = %account.role,
        "Admin request authenticated"
    );

    req.extensions_mut().insert(AuthenticatedAccount(account));
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

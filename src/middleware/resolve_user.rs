use axum::{extract::Request, middleware::Next, response::Response};

use crate::database::manager::DatabaseManager;
use crate::database::models::user::User;
use crate::database::repositories::users::UsersRepository;
use crate::error::ApiError;

use super::auth::CallerIdentity;

/// The resolved internal user record for the current request.
///
/// Resolved exactly once, at the boundary; every handler and repository
/// call receives it as an explicit value rather than re-reading ambient
/// state.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware that resolves the caller's external identity to the internal
/// user record. Distinguishes "not logged in" (handled upstream by the JWT
/// middleware) from "logged in but never provisioned".
pub async fn resolve_user_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = request
        .extensions()
        .get::<CallerIdentity>()
        .cloned()
        .ok_or_else(|| {
            ApiError::unauthenticated("JWT authentication required before user resolution")
        })?;

    let pool = DatabaseManager::pool().await?;
    let user = UsersRepository::new(pool)
        .find_by_external_id(&caller.external_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                "user resolution failed: no profile for external identity '{}'",
                caller.external_id
            );
            ApiError::user_not_found("No profile exists for this account")
        })?;

    tracing::debug!("resolved user {} ({})", user.id, user.external_id);

    // Inject resolved user into request
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use sowgate_core::models::{Role, User};

use super::{ApiError, AppState};

/// The authenticated caller, resolved from the `x-user-id` header.
///
/// Session management proper lives outside this service; the header is
/// the identity the upstream auth layer established. Unknown or missing
/// identities are rejected before any handler runs.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let id = Uuid::parse_str(header).map_err(|_| ApiError::Unauthorized)?;
        let user = state.db.get_user(id)?.ok_or(ApiError::Unauthorized)?;
        Ok(CurrentUser(user))
    }
}

impl CurrentUser {
    /// Enforce the role-to-operation map before touching the engine.
    pub fn require(self, role: Role, action: &str) -> Result<User, ApiError> {
        if self.0.role != role {
            return Err(ApiError::Forbidden(format!(
                "Only {} can {}.",
                role.display_name(),
                action
            )));
        }
        Ok(self.0)
    }
}

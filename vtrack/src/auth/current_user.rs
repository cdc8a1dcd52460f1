use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    db::{
        errors::DbError,
        handlers::{Repository, Users},
    },
    errors::{Error, Result},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Extract user from JWT session cookie if present and valid
/// Returns:
/// - None: No JWT cookie present
/// - Some(Ok(user)): Valid JWT found and verified
/// - Some(Err(error)): Cookie header unreadable or token rejected
#[instrument(skip(parts, config))]
fn try_jwt_session_auth(parts: &Parts, config: &crate::config::Config) -> Option<Result<CurrentUser>> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };

    let token = session::token_from_cookie_header(cookie_str, &config.auth.session.cookie_name)?;
    Some(session::verify_session_token(token, config))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state), fields(method = %parts.method, uri = %parts.uri))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let claims_user = match try_jwt_session_auth(parts, &state.config) {
            Some(Ok(user)) => user,
            Some(Err(e)) => {
                debug!("Session cookie rejected: {}", e);
                return Err(Error::Unauthenticated { message: None });
            }
            None => {
                trace!("No session cookie on request");
                return Err(Error::Unauthenticated { message: None });
            }
        };

        // The token outlives role changes and deletions, so the account is re-read.
        let mut conn = state.db.acquire().await.map_err(DbError::from)?;
        let user = Users::new(&mut conn).get_by_id(claims_user.id).await?;

        match user {
            Some(user) => {
                trace!("Authenticated user {} via session cookie", user.email);
                Ok(CurrentUser::from(user))
            }
            None => {
                debug!("Session refers to a user that no longer exists");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}

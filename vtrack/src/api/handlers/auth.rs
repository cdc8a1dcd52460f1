use axum::{Json as AxumJson, extract::State};

use crate::{
    AppState,
    api::{
        extract::Json,
        models::{
            auth::{AuthResponse, AuthSuccessResponse, LoginRequest, LoginResponse, LogoutResponse},
            users::{CurrentUser, UserResponse},
        },
    },
    auth::{password, session},
    db::handlers::Users,
    errors::{Error, Result},
};

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid email or password".to_string()),
    }
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/authentication/login",
    request_body = LoginRequest,
    tag = "authentication",
    summary = "Log in",
    responses(
        (status = 200, description = "Login successful; session cookie set", body = AuthResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Unknown email and wrong password are indistinguishable to the caller
    let user = user_repo.get_user_by_email(&request.email).await?.ok_or_else(invalid_credentials)?;

    let is_valid = password::verify_password_blocking(request.password, user.password_hash.clone()).await?;
    if !is_valid {
        return Err(invalid_credentials());
    }

    let user_response = UserResponse::from(user.clone());
    let token = session::create_session_token(&CurrentUser::from(user), &state.config)?;
    let cookie = session::session_cookie(&token, &state.config);

    tracing::info!(user_id = %user_response.id, "User logged in");

    Ok(LoginResponse {
        auth_response: AuthResponse {
            user: user_response,
            message: "Login successful".to_string(),
        },
        cookie,
    })
}

/// Logout (clear session)
#[utoipa::path(
    post,
    path = "/authentication/logout",
    tag = "authentication",
    summary = "Log out",
    responses(
        (status = 200, description = "Logout successful; session cookie cleared", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<LogoutResponse> {
    Ok(LogoutResponse {
        auth_response: AuthSuccessResponse {
            message: "Logout successful".to_string(),
        },
        cookie: session::clear_session_cookie(&state.config),
    })
}

/// Get the user behind the current session
#[utoipa::path(
    get,
    path = "/authentication/session",
    tag = "authentication",
    summary = "Current session",
    responses(
        (status = 200, description = "The logged-in user", body = CurrentUser),
        (status = 401, description = "No valid session"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_session(current_user: CurrentUser) -> Result<AxumJson<CurrentUser>> {
    Ok(AxumJson(current_user))
}

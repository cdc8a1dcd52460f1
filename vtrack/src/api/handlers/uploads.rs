use crate::{
    AppState,
    api::models::uploads::UploadSignatureResponse,
    auth::permissions::{RequiresPermission, operation, resource},
    errors::Result,
    uploads::create_signature,
};
use axum::{Json as AxumJson, extract::State};
use chrono::Utc;

#[utoipa::path(
    post,
    path = "/uploads/sign",
    tag = "uploads",
    summary = "Sign a direct image upload",
    description = "Returns the parameters the browser sends with an upload to the image host. Administrators and workers only.",
    responses(
        (status = 200, description = "Signed upload parameters", body = UploadSignatureResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Clients cannot upload"),
        (status = 500, description = "Image host credentials are not configured")
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn sign_upload(
    State(state): State<AppState>,
    _: RequiresPermission<resource::Uploads, operation::CreateOwn>,
) -> Result<AxumJson<UploadSignatureResponse>> {
    let signature = create_signature(&state.config.uploads, Utc::now().timestamp())?;
    Ok(AxumJson(signature))
}

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    routing::{get, post},
    Json,
};
use viewtube_platform::{Credentials, NewRegistration, UserData};

use crate::{
    context::ServerContext,
    errors::{ServerError, ServerResult},
    schemas::{LoginSchema, RegisterSchema, ValidatedJson},
    serialized::{LoginResult, Me, RegisterResult, ToSerialized},
    Router,
};

/// The authenticated caller, resolved from the bearer token by the platform
pub struct Session(UserData);

impl Session {
    /// Returns the user of the session
    pub fn user(&self) -> UserData {
        self.0.clone()
    }
}

#[async_trait]
impl FromRequestParts<ServerContext> for Session {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerContext,
    ) -> Result<Self, Self::Rejection> {
        let context = ServerContext::from_ref(state);

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|x| x.to_str().ok())
            .ok_or(ServerError::Unauthorized("Not authorized, token missing."))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ServerError::Unauthorized("Authorization must be Bearer."))?;

        let user = context.platform.auth.verify(token).await?;

        Ok(Self(user))
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterSchema,
    responses(
        (status = 201, body = RegisterResult)
    )
)]
async fn register(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<RegisterSchema>,
) -> ServerResult<(StatusCode, Json<RegisterResult>)> {
    let user = context
        .platform
        .auth
        .register(NewRegistration {
            username: body.username,
            email: body.email,
            password: body.password,
            avatar: body.avatar,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResult::new(&user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginSchema,
    responses(
        (status = 200, body = LoginResult)
    )
)]
async fn login(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<LoginSchema>,
) -> ServerResult<Json<LoginResult>> {
    let login = context
        .platform
        .auth
        .login(Credentials {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(login.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = Me)
    )
)]
async fn me(session: Session, State(context): State<ServerContext>) -> ServerResult<Json<Me>> {
    let user = session.user();
    let channels = context.platform.channels.ids_for_owner(user.id).await?;

    Ok(Json(Me::new(&user, channels)))
}

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

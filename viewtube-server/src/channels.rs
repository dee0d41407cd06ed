use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json,
};
use viewtube_platform::NewChannel;

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{NewChannelSchema, ValidatedJson},
    serialized::{Channel, ChannelResult, ToSerialized, Video},
    Router,
};

#[utoipa::path(
    post,
    path = "/api/channels",
    tag = "channels",
    request_body = NewChannelSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = ChannelResult)
    )
)]
async fn create_channel(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewChannelSchema>,
) -> ServerResult<(StatusCode, Json<ChannelResult>)> {
    let channel = context
        .platform
        .channels
        .create_channel(NewChannel {
            name: body.channel_name,
            description: body.description.unwrap_or_default(),
            banner: body.channel_banner.unwrap_or_default(),
            owner_id: session.user().id,
            subscribers: 0,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ChannelResult::new("Channel created successfully.", &channel)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/channels/{id}",
    tag = "channels",
    responses(
        (status = 200, body = Channel)
    )
)]
async fn channel(
    State(context): State<ServerContext>,
    Path(channel_id): Path<i32>,
) -> ServerResult<Json<Channel>> {
    let channel = context.platform.channels.channel_by_id(channel_id).await?;

    Ok(Json(channel.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/channels/{id}/videos",
    tag = "channels",
    responses(
        (status = 200, body = Vec<Video>)
    )
)]
async fn channel_videos(
    State(context): State<ServerContext>,
    Path(channel_id): Path<i32>,
) -> ServerResult<Json<Vec<Video>>> {
    let videos = context
        .platform
        .channels
        .videos_for_channel(channel_id)
        .await?;

    Ok(Json(videos.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_channel))
        .route("/:id", get(channel))
        .route("/:id/videos", get(channel_videos))
}

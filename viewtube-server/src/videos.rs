use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json,
};
use viewtube_platform::{NewVideo, UpdatedVideo, VideoFilter};

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{NewVideoSchema, UpdateVideoSchema, ValidatedJson, VideoListQuery},
    serialized::{MessageResult, ReactionResult, ToSerialized, Video, VideoResult},
    Router,
};

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    params(VideoListQuery),
    responses(
        (status = 200, body = Vec<Video>)
    )
)]
async fn list_videos(
    State(context): State<ServerContext>,
    Query(query): Query<VideoListQuery>,
) -> ServerResult<Json<Vec<Video>>> {
    let videos = context
        .platform
        .videos
        .list(VideoFilter {
            search: query.search,
            category: query.category,
        })
        .await?;

    Ok(Json(videos.to_serialized()))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "videos",
    responses(
        (status = 200, body = Video, description = "The video. Every fetch counts as a view.")
    )
)]
async fn watch_video(
    State(context): State<ServerContext>,
    Path(video_id): Path<i32>,
) -> ServerResult<Json<Video>> {
    let video = context.platform.videos.watch(video_id).await?;

    Ok(Json(video.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = NewVideoSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = VideoResult)
    )
)]
async fn create_video(
    session: Session,
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<NewVideoSchema>,
) -> ServerResult<(StatusCode, Json<VideoResult>)> {
    let video = context
        .platform
        .videos
        .create_video(NewVideo {
            title: body.title,
            description: body.description.unwrap_or_default(),
            thumbnail_url: body.thumbnail_url,
            video_url: body.video_url,
            channel_id: body.channel_id,
            uploader_id: session.user().id,
            category: body.category,
            views: 0,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(VideoResult::new("Video created successfully.", &video)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/videos/{id}",
    tag = "videos",
    request_body = UpdateVideoSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = VideoResult)
    )
)]
async fn update_video(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateVideoSchema>,
) -> ServerResult<Json<VideoResult>> {
    let video = context
        .platform
        .videos
        .update_video(
            UpdatedVideo {
                id: video_id,
                title: body.title,
                description: body.description,
                thumbnail_url: body.thumbnail_url,
                video_url: body.video_url,
                category: body.category,
            },
            session.user().id,
        )
        .await?;

    Ok(Json(VideoResult::new("Video updated successfully.", &video)))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    tag = "videos",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = MessageResult)
    )
)]
async fn delete_video(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<i32>,
) -> ServerResult<Json<MessageResult>> {
    context
        .platform
        .videos
        .delete_video(video_id, session.user().id)
        .await?;

    Ok(Json(MessageResult::new("Video deleted successfully.")))
}

#[utoipa::path(
    post,
    path = "/api/videos/{id}/like",
    tag = "videos",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = ReactionResult)
    )
)]
async fn like_video(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<i32>,
) -> ServerResult<Json<ReactionResult>> {
    let video = context
        .platform
        .videos
        .like(video_id, session.user().id)
        .await?;

    Ok(Json(ReactionResult::new("Video liked.", &video)))
}

#[utoipa::path(
    post,
    path = "/api/videos/{id}/dislike",
    tag = "videos",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = ReactionResult)
    )
)]
async fn dislike_video(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<i32>,
) -> ServerResult<Json<ReactionResult>> {
    let video = context
        .platform
        .videos
        .dislike(video_id, session.user().id)
        .await?;

    Ok(Json(ReactionResult::new("Video disliked.", &video)))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_videos))
        .route("/", post(create_video))
        .route("/:id", get(watch_video))
        .route("/:id", put(update_video))
        .route("/:id", delete(delete_video))
        .route("/:id/like", post(like_video))
        .route("/:id/dislike", post(dislike_video))
}

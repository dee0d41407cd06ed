use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json,
};

use crate::{
    auth::Session,
    context::ServerContext,
    errors::ServerResult,
    schemas::{CommentTextSchema, ValidatedJson},
    serialized::{Comment, CommentResult, MessageResult, ToSerialized},
    Router,
};

#[utoipa::path(
    get,
    path = "/api/comments/video/{videoId}",
    tag = "comments",
    responses(
        (status = 200, body = Vec<Comment>)
    )
)]
async fn comments_for_video(
    State(context): State<ServerContext>,
    Path(video_id): Path<i32>,
) -> ServerResult<Json<Vec<Comment>>> {
    let comments = context.platform.comments.for_video(video_id).await?;

    Ok(Json(comments.to_serialized()))
}

#[utoipa::path(
    post,
    path = "/api/comments/video/{videoId}",
    tag = "comments",
    request_body = CommentTextSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 201, body = CommentResult)
    )
)]
async fn add_comment(
    session: Session,
    State(context): State<ServerContext>,
    Path(video_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<CommentTextSchema>,
) -> ServerResult<(StatusCode, Json<CommentResult>)> {
    let comment = context
        .platform
        .comments
        .add(video_id, &body.text, session.user().id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResult::new("Comment added.", &comment)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    tag = "comments",
    request_body = CommentTextSchema,
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = CommentResult)
    )
)]
async fn update_comment(
    session: Session,
    State(context): State<ServerContext>,
    Path(comment_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<CommentTextSchema>,
) -> ServerResult<Json<CommentResult>> {
    let comment = context
        .platform
        .comments
        .update(comment_id, &body.text, session.user().id)
        .await?;

    Ok(Json(CommentResult::new("Comment updated.", &comment)))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "comments",
    security(
        ("BearerAuth" = [])
    ),
    responses(
        (status = 200, body = MessageResult)
    )
)]
async fn delete_comment(
    session: Session,
    State(context): State<ServerContext>,
    Path(comment_id): Path<i32>,
) -> ServerResult<Json<MessageResult>> {
    context
        .platform
        .comments
        .delete(comment_id, session.user().id)
        .await?;

    Ok(Json(MessageResult::new("Comment deleted.")))
}

pub fn router() -> Router {
    Router::new()
        .route("/video/:video_id", get(comments_for_video))
        .route("/video/:video_id", post(add_comment))
        .route("/:id", put(update_comment))
        .route("/:id", delete(delete_comment))
}

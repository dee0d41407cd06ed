use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

mod data;
pub use data::*;

mod pg;
pub use pg::*;

mod memory;
pub use memory::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;
pub type SharedDatabase = Arc<dyn Database>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource} not found.")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Helper trait to reduce boilerplate
pub trait DatabaseResult {
    /// Turns the Result into a conflict error if it's Ok()
    fn conflict_or_ok(self, resource: &'static str, field: &'static str, value: &str)
        -> Result<()>;
}

impl<T> DatabaseResult for Result<T> {
    fn conflict_or_ok(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<()> {
        match self {
            Ok(_) => Err(DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            }),
            Err(e) => match e {
                DatabaseError::NotFound {
                    resource: _,
                    identifier: _,
                } => Ok(()),
                e => Err(e),
            },
        }
    }
}

/// Represents a type that can fetch and mutate viewtube data in a database
#[async_trait]
pub trait Database: Send + Sync {
    /// Deletes all stored data. Only used when seeding fixtures.
    async fn clear(&self) -> Result<()>;

    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData>;
    async fn user_by_email(&self, email: &str) -> Result<UserData>;
    async fn create_user(&self, new_user: NewUser) -> Result<UserData>;

    async fn channel_by_id(&self, channel_id: PrimaryKey) -> Result<ChannelData>;
    async fn channel_ids_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<PrimaryKey>>;
    async fn create_channel(&self, new_channel: NewChannel) -> Result<ChannelData>;

    async fn video_by_id(&self, video_id: PrimaryKey) -> Result<VideoData>;
    async fn list_videos(&self, filter: VideoFilter) -> Result<Vec<VideoData>>;
    async fn videos_by_channel(&self, channel_id: PrimaryKey) -> Result<Vec<VideoData>>;
    async fn create_video(&self, new_video: NewVideo) -> Result<VideoData>;
    async fn update_video(&self, updated_video: UpdatedVideo) -> Result<VideoData>;
    async fn delete_video(&self, video_id: PrimaryKey) -> Result<()>;
    async fn increment_views(&self, video_id: PrimaryKey) -> Result<()>;
    async fn set_reaction(
        &self,
        video_id: PrimaryKey,
        user_id: PrimaryKey,
        kind: ReactionKind,
    ) -> Result<()>;

    async fn comment_by_id(&self, comment_id: PrimaryKey) -> Result<CommentData>;
    async fn comments_by_video(&self, video_id: PrimaryKey) -> Result<Vec<CommentData>>;
    async fn create_comment(&self, new_comment: NewComment) -> Result<CommentData>;
    async fn update_comment(&self, comment_id: PrimaryKey, text: String) -> Result<CommentData>;
    async fn delete_comment(&self, comment_id: PrimaryKey) -> Result<()>;
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Already hashed by the auth service
    pub password: String,
    pub avatar: String,
}

#[derive(Debug)]
pub struct NewChannel {
    pub name: String,
    pub description: String,
    pub banner: String,
    /// The owner of the new channel
    pub owner_id: PrimaryKey,
    /// Always 0 for channels created through the API, only seeding sets this
    pub subscribers: i64,
}

#[derive(Debug)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub channel_id: PrimaryKey,
    pub uploader_id: PrimaryKey,
    pub category: String,
    /// Always 0 for videos created through the API, only seeding sets this
    pub views: i64,
}

/// Fields not provided are left untouched
#[derive(Debug, Default)]
pub struct UpdatedVideo {
    pub id: PrimaryKey,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug)]
pub struct NewComment {
    pub video_id: PrimaryKey,
    pub user_id: PrimaryKey,
    pub text: String,
}

/// Filters for the video listing, AND-combined when both are present
#[derive(Debug, Default)]
pub struct VideoFilter {
    /// Case-insensitive substring match on the title
    pub search: Option<String>,
    /// Exact match on the category
    pub category: Option<String>,
}

/// A user's reaction to a video. Setting one always clears the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

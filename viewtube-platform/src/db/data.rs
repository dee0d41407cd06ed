use chrono::{DateTime, Utc};

/// The type used for primary keys in the database.
pub type PrimaryKey = i32;

/// A viewtube account
#[derive(Debug, Clone)]
pub struct UserData {
    pub id: PrimaryKey,
    pub username: String,
    pub email: String,
    /// The bcrypt hash of the password, never exposed in responses
    pub password: String,
    /// Avatar url, empty string if the user never set one
    pub avatar: String,
}

/// A named collection of videos owned by exactly one user
#[derive(Debug, Clone)]
pub struct ChannelData {
    pub id: PrimaryKey,
    pub name: String,
    pub description: String,
    /// Banner url shown on the channel page
    pub banner: String,
    /// The owner is fixed at creation
    pub owner: UserData,
    /// Derived from videos referencing this channel, newest first
    pub videos: Vec<VideoData>,
    /// Only ever written by seeding, no endpoint increments this
    pub subscribers: i64,
}

/// A video, referenced by url rather than stored as a blob
#[derive(Debug, Clone)]
pub struct VideoData {
    pub id: PrimaryKey,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub channel_id: PrimaryKey,
    /// Populated from the owning channel
    pub channel_name: String,
    /// The user that uploaded the video, always a member of the owning channel
    pub uploader_id: PrimaryKey,
    pub views: i64,
    pub category: String,
    /// Users that liked the video. A user appears in at most one of the two sets.
    pub likes: Vec<PrimaryKey>,
    /// Users that disliked the video
    pub dislikes: Vec<PrimaryKey>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment on a video
#[derive(Debug, Clone)]
pub struct CommentData {
    pub id: PrimaryKey,
    /// Comments survive deletion of their video, so this may dangle
    pub video_id: PrimaryKey,
    pub author: UserData,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

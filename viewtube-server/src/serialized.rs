//! All schemas that are exposed from endpoints are defined here
//! along with the conversions from platform data

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use viewtube_platform::{ChannelData, CommentData, LoginData, PrimaryKey, UserData, VideoData};

/// The public projection of an account. The password hash never leaves
/// the platform layer.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: PrimaryKey,
    username: String,
    email: String,
    avatar: String,
}

/// The caller's own account, with the channels it owns
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    id: PrimaryKey,
    username: String,
    email: String,
    avatar: String,
    channels: Vec<PrimaryKey>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResult {
    message: String,
    user_id: PrimaryKey,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    message: String,
    token: String,
    user: User,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelOwner {
    id: PrimaryKey,
    username: String,
    email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    id: PrimaryKey,
    channel_name: String,
    description: String,
    channel_banner: String,
    owner: ChannelOwner,
    videos: Vec<Video>,
    subscribers: i64,
}

/// The owning channel of a video, projected to what listings need
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoChannel {
    id: PrimaryKey,
    channel_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    id: PrimaryKey,
    title: String,
    description: String,
    thumbnail_url: String,
    video_url: String,
    channel: VideoChannel,
    uploader: PrimaryKey,
    views: i64,
    category: String,
    likes: Vec<PrimaryKey>,
    dislikes: Vec<PrimaryKey>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    id: PrimaryKey,
    username: String,
    avatar: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    id: PrimaryKey,
    video: PrimaryKey,
    user: CommentAuthor,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A `{ message, channel }` body
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResult {
    message: String,
    channel: Channel,
}

/// A `{ message, video }` body
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    message: String,
    video: Video,
}

/// A `{ message, comment }` body
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResult {
    message: String,
    comment: Comment,
}

/// A bare `{ message }` body
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResult {
    message: String,
}

/// The `{ message, likesCount, dislikesCount }` body of a reaction
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResult {
    message: String,
    likes_count: usize,
    dislikes_count: usize,
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<User> for UserData {
    fn to_serialized(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

impl ToSerialized<ChannelOwner> for UserData {
    fn to_serialized(&self) -> ChannelOwner {
        ChannelOwner {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl ToSerialized<CommentAuthor> for UserData {
    fn to_serialized(&self) -> CommentAuthor {
        CommentAuthor {
            id: self.id,
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

impl ToSerialized<LoginResult> for LoginData {
    fn to_serialized(&self) -> LoginResult {
        LoginResult {
            message: "Login successful.".to_string(),
            token: self.token.clone(),
            user: self.user.to_serialized(),
        }
    }
}

impl ToSerialized<Channel> for ChannelData {
    fn to_serialized(&self) -> Channel {
        Channel {
            id: self.id,
            channel_name: self.name.clone(),
            description: self.description.clone(),
            channel_banner: self.banner.clone(),
            owner: self.owner.to_serialized(),
            videos: self.videos.to_serialized(),
            subscribers: self.subscribers,
        }
    }
}

impl ToSerialized<Video> for VideoData {
    fn to_serialized(&self) -> Video {
        Video {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            video_url: self.video_url.clone(),
            channel: VideoChannel {
                id: self.channel_id,
                channel_name: self.channel_name.clone(),
            },
            uploader: self.uploader_id,
            views: self.views,
            category: self.category.clone(),
            likes: self.likes.clone(),
            dislikes: self.dislikes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ToSerialized<Comment> for CommentData {
    fn to_serialized(&self) -> Comment {
        Comment {
            id: self.id,
            video: self.video_id,
            user: self.author.to_serialized(),
            text: self.text.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Me {
    pub fn new(user: &UserData, channels: Vec<PrimaryKey>) -> Self {
        Self {
            user: UserProfile {
                id: user.id,
                username: user.username.clone(),
                email: user.email.clone(),
                avatar: user.avatar.clone(),
                channels,
            },
        }
    }
}

impl RegisterResult {
    pub fn new(user: &UserData) -> Self {
        Self {
            message: "User registered successfully. Please login.".to_string(),
            user_id: user.id,
        }
    }
}

impl ChannelResult {
    pub fn new(message: &str, channel: &ChannelData) -> Self {
        Self {
            message: message.to_string(),
            channel: channel.to_serialized(),
        }
    }
}

impl VideoResult {
    pub fn new(message: &str, video: &VideoData) -> Self {
        Self {
            message: message.to_string(),
            video: video.to_serialized(),
        }
    }
}

impl CommentResult {
    pub fn new(message: &str, comment: &CommentData) -> Self {
        Self {
            message: message.to_string(),
            comment: comment.to_serialized(),
        }
    }
}

impl MessageResult {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl ReactionResult {
    pub fn new(message: &str, video: &VideoData) -> Self {
        Self {
            message: message.to_string(),
            likes_count: video.likes.len(),
            dislikes_count: video.dislikes.len(),
        }
    }
}

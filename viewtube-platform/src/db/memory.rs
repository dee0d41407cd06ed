use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{
    ChannelData, CommentData, Database, DatabaseError, NewChannel, NewComment, NewUser, NewVideo,
    PrimaryKey, ReactionKind, Result, UpdatedVideo, UserData, VideoData, VideoFilter,
};

/// An in-memory database implementation, mirroring the semantics of [PgDatabase].
/// Primarily useful for tests, where a real postgres instance is overkill.
///
/// [PgDatabase]: crate::PgDatabase
#[derive(Default)]
pub struct MemoryDatabase {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: PrimaryKey,
    users: Vec<UserData>,
    channels: Vec<StoredChannel>,
    videos: Vec<StoredVideo>,
    comments: Vec<StoredComment>,
}

#[derive(Clone)]
struct StoredChannel {
    id: PrimaryKey,
    name: String,
    description: String,
    banner: String,
    owner_id: PrimaryKey,
    subscribers: i64,
}

#[derive(Clone)]
struct StoredVideo {
    id: PrimaryKey,
    title: String,
    description: String,
    thumbnail_url: String,
    video_url: String,
    channel_id: PrimaryKey,
    uploader_id: PrimaryKey,
    views: i64,
    category: String,
    likes: Vec<PrimaryKey>,
    dislikes: Vec<PrimaryKey>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Clone)]
struct StoredComment {
    id: PrimaryKey,
    video_id: PrimaryKey,
    user_id: PrimaryKey,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State {
    fn next_id(&mut self) -> PrimaryKey {
        self.last_id += 1;
        self.last_id
    }

    fn user(&self, user_id: PrimaryKey) -> Result<&UserData> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or(DatabaseError::NotFound {
                resource: "User",
                identifier: "id",
            })
    }

    fn channel(&self, channel_id: PrimaryKey) -> Result<&StoredChannel> {
        self.channels
            .iter()
            .find(|c| c.id == channel_id)
            .ok_or(DatabaseError::NotFound {
                resource: "Channel",
                identifier: "id",
            })
    }

    fn video_mut(&mut self, video_id: PrimaryKey) -> Result<&mut StoredVideo> {
        self.videos
            .iter_mut()
            .find(|v| v.id == video_id)
            .ok_or(DatabaseError::NotFound {
                resource: "Video",
                identifier: "id",
            })
    }

    fn video_data(&self, video: &StoredVideo) -> Result<VideoData> {
        let channel = self.channel(video.channel_id)?;

        Ok(VideoData {
            id: video.id,
            title: video.title.clone(),
            description: video.description.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
            video_url: video.video_url.clone(),
            channel_id: video.channel_id,
            channel_name: channel.name.clone(),
            uploader_id: video.uploader_id,
            views: video.views,
            category: video.category.clone(),
            likes: video.likes.clone(),
            dislikes: video.dislikes.clone(),
            created_at: video.created_at,
            updated_at: video.updated_at,
        })
    }

    fn channel_data(&self, channel: &StoredChannel) -> Result<ChannelData> {
        let owner = self.user(channel.owner_id)?.clone();
        let videos = self.channel_videos(channel.id)?;

        Ok(ChannelData {
            id: channel.id,
            name: channel.name.clone(),
            description: channel.description.clone(),
            banner: channel.banner.clone(),
            owner,
            videos,
            subscribers: channel.subscribers,
        })
    }

    fn comment_data(&self, comment: &StoredComment) -> Result<CommentData> {
        let author = self.user(comment.user_id)?.clone();

        Ok(CommentData {
            id: comment.id,
            video_id: comment.video_id,
            author,
            text: comment.text.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
    }

    fn channel_videos(&self, channel_id: PrimaryKey) -> Result<Vec<VideoData>> {
        let mut videos: Vec<_> = self
            .videos
            .iter()
            .filter(|v| v.channel_id == channel_id)
            .map(|v| self.video_data(v))
            .collect::<Result<_>>()?;

        sort_newest_first(&mut videos);

        Ok(videos)
    }
}

/// Matches the `ORDER BY created_at DESC, id DESC` of the postgres implementation
fn sort_newest_first(videos: &mut [VideoData]) {
    videos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)))
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn clear(&self) -> Result<()> {
        *self.state.write() = State::default();

        Ok(())
    }

    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        self.state.read().user(user_id).cloned()
    }

    async fn user_by_email(&self, email: &str) -> Result<UserData> {
        self.state
            .read()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "User",
                identifier: "email",
            })
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        let mut state = self.state.write();

        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::Conflict {
                resource: "User",
                field: "email",
                value: new_user.email,
            });
        }

        let user = UserData {
            id: state.next_id(),
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
            avatar: new_user.avatar,
        };

        state.users.push(user.clone());

        Ok(user)
    }

    async fn channel_by_id(&self, channel_id: PrimaryKey) -> Result<ChannelData> {
        let state = self.state.read();
        let channel = state.channel(channel_id)?;

        state.channel_data(channel)
    }

    async fn channel_ids_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<PrimaryKey>> {
        Ok(self
            .state
            .read()
            .channels
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .map(|c| c.id)
            .collect())
    }

    async fn create_channel(&self, new_channel: NewChannel) -> Result<ChannelData> {
        let mut state = self.state.write();

        // Ensure the owner exists
        let _ = state.user(new_channel.owner_id)?;

        let channel = StoredChannel {
            id: state.next_id(),
            name: new_channel.name,
            description: new_channel.description,
            banner: new_channel.banner,
            owner_id: new_channel.owner_id,
            subscribers: new_channel.subscribers,
        };

        state.channels.push(channel.clone());
        state.channel_data(&channel)
    }

    async fn video_by_id(&self, video_id: PrimaryKey) -> Result<VideoData> {
        let state = self.state.read();

        let video = state
            .videos
            .iter()
            .find(|v| v.id == video_id)
            .ok_or(DatabaseError::NotFound {
                resource: "Video",
                identifier: "id",
            })?;

        state.video_data(video)
    }

    async fn list_videos(&self, filter: VideoFilter) -> Result<Vec<VideoData>> {
        let state = self.state.read();
        let search = filter.search.map(|s| s.to_lowercase());

        let mut videos: Vec<_> = state
            .videos
            .iter()
            .filter(|v| {
                search
                    .as_ref()
                    .map(|s| v.title.to_lowercase().contains(s))
                    .unwrap_or(true)
            })
            .filter(|v| {
                filter
                    .category
                    .as_ref()
                    .map(|c| &v.category == c)
                    .unwrap_or(true)
            })
            .map(|v| state.video_data(v))
            .collect::<Result<_>>()?;

        sort_newest_first(&mut videos);

        Ok(videos)
    }

    async fn videos_by_channel(&self, channel_id: PrimaryKey) -> Result<Vec<VideoData>> {
        self.state.read().channel_videos(channel_id)
    }

    async fn create_video(&self, new_video: NewVideo) -> Result<VideoData> {
        let mut state = self.state.write();

        // Ensure the references resolve
        let _ = state.channel(new_video.channel_id)?;
        let _ = state.user(new_video.uploader_id)?;

        let now = Utc::now();
        let video = StoredVideo {
            id: state.next_id(),
            title: new_video.title,
            description: new_video.description,
            thumbnail_url: new_video.thumbnail_url,
            video_url: new_video.video_url,
            channel_id: new_video.channel_id,
            uploader_id: new_video.uploader_id,
            views: new_video.views,
            category: new_video.category,
            likes: vec![],
            dislikes: vec![],
            created_at: now,
            updated_at: now,
        };

        state.videos.push(video.clone());
        state.video_data(&video)
    }

    async fn update_video(&self, updated_video: UpdatedVideo) -> Result<VideoData> {
        let mut state = self.state.write();
        let video = state.video_mut(updated_video.id)?;

        if let Some(title) = updated_video.title {
            video.title = title
        }
        if let Some(description) = updated_video.description {
            video.description = description
        }
        if let Some(thumbnail_url) = updated_video.thumbnail_url {
            video.thumbnail_url = thumbnail_url
        }
        if let Some(video_url) = updated_video.video_url {
            video.video_url = video_url
        }
        if let Some(category) = updated_video.category {
            video.category = category
        }

        video.updated_at = Utc::now();

        let video = video.clone();
        state.video_data(&video)
    }

    async fn delete_video(&self, video_id: PrimaryKey) -> Result<()> {
        let mut state = self.state.write();

        // Ensure video exists
        let _ = state.video_mut(video_id)?;

        // Comments intentionally stay behind
        state.videos.retain(|v| v.id != video_id);

        Ok(())
    }

    async fn increment_views(&self, video_id: PrimaryKey) -> Result<()> {
        let mut state = self.state.write();
        let video = state.video_mut(video_id)?;

        video.views += 1;

        Ok(())
    }

    async fn set_reaction(
        &self,
        video_id: PrimaryKey,
        user_id: PrimaryKey,
        kind: ReactionKind,
    ) -> Result<()> {
        let mut state = self.state.write();
        let video = state.video_mut(video_id)?;

        video.likes.retain(|&id| id != user_id);
        video.dislikes.retain(|&id| id != user_id);

        match kind {
            ReactionKind::Like => video.likes.push(user_id),
            ReactionKind::Dislike => video.dislikes.push(user_id),
        }

        Ok(())
    }

    async fn comment_by_id(&self, comment_id: PrimaryKey) -> Result<CommentData> {
        let state = self.state.read();

        let comment = state
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .ok_or(DatabaseError::NotFound {
                resource: "Comment",
                identifier: "id",
            })?;

        state.comment_data(comment)
    }

    async fn comments_by_video(&self, video_id: PrimaryKey) -> Result<Vec<CommentData>> {
        let state = self.state.read();

        let mut comments: Vec<_> = state
            .comments
            .iter()
            .filter(|c| c.video_id == video_id)
            .map(|c| state.comment_data(c))
            .collect::<Result<_>>()?;

        comments.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(comments)
    }

    async fn create_comment(&self, new_comment: NewComment) -> Result<CommentData> {
        let mut state = self.state.write();

        let _ = state.user(new_comment.user_id)?;

        let now = Utc::now();
        let comment = StoredComment {
            id: state.next_id(),
            video_id: new_comment.video_id,
            user_id: new_comment.user_id,
            text: new_comment.text,
            created_at: now,
            updated_at: now,
        };

        state.comments.push(comment.clone());
        state.comment_data(&comment)
    }

    async fn update_comment(&self, comment_id: PrimaryKey, text: String) -> Result<CommentData> {
        let mut state = self.state.write();

        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or(DatabaseError::NotFound {
                resource: "Comment",
                identifier: "id",
            })?;

        comment.text = text;
        comment.updated_at = Utc::now();

        let comment = comment.clone();
        state.comment_data(&comment)
    }

    async fn delete_comment(&self, comment_id: PrimaryKey) -> Result<()> {
        let mut state = self.state.write();

        let exists = state.comments.iter().any(|c| c.id == comment_id);

        if !exists {
            return Err(DatabaseError::NotFound {
                resource: "Comment",
                identifier: "id",
            });
        }

        state.comments.retain(|c| c.id != comment_id);

        Ok(())
    }
}

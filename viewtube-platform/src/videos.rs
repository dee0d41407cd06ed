use std::sync::Arc;

use thiserror::Error;

use crate::{
    Database, DatabaseError, NewVideo, PrimaryKey, ReactionKind, UpdatedVideo, VideoData,
    VideoFilter,
};

pub struct VideoManager {
    db: Arc<dyn Database>,
}

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("You can only upload videos to your own channel.")]
    NotChannelOwner,
    #[error("You can only edit your own videos.")]
    EditNotAllowed,
    #[error("You can only delete your own videos.")]
    DeleteNotAllowed,
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

impl VideoManager {
    pub fn new(db: &Arc<dyn Database>) -> Self {
        Self { db: db.clone() }
    }

    /// Lists videos, newest first, optionally narrowed by the filter
    pub async fn list(&self, filter: VideoFilter) -> Result<Vec<VideoData>, DatabaseError> {
        self.db.list_videos(filter).await
    }

    /// Returns a video and counts the fetch as a view. Every fetch counts,
    /// including repeated ones by the same caller.
    pub async fn watch(&self, video_id: PrimaryKey) -> Result<VideoData, DatabaseError> {
        self.db.increment_views(video_id).await?;
        self.db.video_by_id(video_id).await
    }

    /// Creates a video on a channel the uploader owns
    pub async fn create_video(&self, new_video: NewVideo) -> Result<VideoData, VideoError> {
        let channel = self.db.channel_by_id(new_video.channel_id).await?;

        if channel.owner.id != new_video.uploader_id {
            return Err(VideoError::NotChannelOwner);
        }

        Ok(self.db.create_video(new_video).await?)
    }

    /// Applies the provided fields to a video. Only the uploader may edit.
    pub async fn update_video(
        &self,
        updated_video: UpdatedVideo,
        caller_id: PrimaryKey,
    ) -> Result<VideoData, VideoError> {
        let video = self.db.video_by_id(updated_video.id).await?;

        if video.uploader_id != caller_id {
            return Err(VideoError::EditNotAllowed);
        }

        Ok(self.db.update_video(updated_video).await?)
    }

    /// Deletes a video. Only the uploader may delete. The video's comments
    /// are left behind on purpose.
    pub async fn delete_video(
        &self,
        video_id: PrimaryKey,
        caller_id: PrimaryKey,
    ) -> Result<(), VideoError> {
        let video = self.db.video_by_id(video_id).await?;

        if video.uploader_id != caller_id {
            return Err(VideoError::DeleteNotAllowed);
        }

        Ok(self.db.delete_video(video_id).await?)
    }

    /// Adds the user to the likes set and clears any dislike. Liking twice
    /// is a no-op, never an un-like.
    pub async fn like(
        &self,
        video_id: PrimaryKey,
        user_id: PrimaryKey,
    ) -> Result<VideoData, DatabaseError> {
        self.react(video_id, user_id, ReactionKind::Like).await
    }

    /// Symmetric to [like](Self::like)
    pub async fn dislike(
        &self,
        video_id: PrimaryKey,
        user_id: PrimaryKey,
    ) -> Result<VideoData, DatabaseError> {
        self.react(video_id, user_id, ReactionKind::Dislike).await
    }

    async fn react(
        &self,
        video_id: PrimaryKey,
        user_id: PrimaryKey,
        kind: ReactionKind,
    ) -> Result<VideoData, DatabaseError> {
        // Ensure video exists
        let _ = self.db.video_by_id(video_id).await?;

        self.db.set_reaction(video_id, user_id, kind).await?;
        self.db.video_by_id(video_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChannelData, MemoryDatabase, NewChannel, NewUser, UserData};

    struct Fixture {
        videos: VideoManager,
        db: Arc<dyn Database>,
        user: UserData,
        channel: ChannelData,
    }

    async fn setup() -> Fixture {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());

        let user = create_user(&db, "bob@x.com").await;

        let channel = db
            .create_channel(NewChannel {
                name: "Bob's Lab".to_string(),
                description: String::new(),
                banner: String::new(),
                owner_id: user.id,
                subscribers: 0,
            })
            .await
            .expect("channel is created");

        Fixture {
            videos: VideoManager::new(&db),
            db,
            user,
            channel,
        }
    }

    async fn create_user(db: &Arc<dyn Database>, email: &str) -> UserData {
        db.create_user(NewUser {
            username: "Bob".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            avatar: String::new(),
        })
        .await
        .expect("user is created")
    }

    fn new_video(title: &str, category: &str, fixture: &Fixture) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            description: String::new(),
            thumbnail_url: "thumb.jpg".to_string(),
            video_url: "video.mp4".to_string(),
            channel_id: fixture.channel.id,
            uploader_id: fixture.user.id,
            category: category.to_string(),
            views: 0,
        }
    }

    #[tokio::test]
    async fn only_the_channel_owner_may_upload() {
        let fixture = setup().await;
        let stranger = create_user(&fixture.db, "eve@x.com").await;

        let result = fixture
            .videos
            .create_video(NewVideo {
                uploader_id: stranger.id,
                ..new_video("T", "Tech", &fixture)
            })
            .await;

        assert!(matches!(result, Err(VideoError::NotChannelOwner)));
    }

    #[tokio::test]
    async fn upload_to_missing_channel_is_not_found() {
        let fixture = setup().await;

        let result = fixture
            .videos
            .create_video(NewVideo {
                channel_id: 999,
                ..new_video("T", "Tech", &fixture)
            })
            .await;

        assert!(matches!(
            result,
            Err(VideoError::Db(DatabaseError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn every_watch_counts_a_view() {
        let fixture = setup().await;

        let video = fixture
            .videos
            .create_video(new_video("T", "Tech", &fixture))
            .await
            .unwrap();

        assert_eq!(video.views, 0);

        for _ in 0..3 {
            fixture.videos.watch(video.id).await.unwrap();
        }

        let watched = fixture.videos.watch(video.id).await.unwrap();

        assert_eq!(watched.views, 4);
    }

    #[tokio::test]
    async fn list_filters_are_and_combined() {
        let fixture = setup().await;

        for (title, category) in [
            ("Rust in an hour", "Tech"),
            ("Cooking with rust... I mean cast iron", "Cooking"),
            ("Utterly unrelated", "Tech"),
        ] {
            fixture
                .videos
                .create_video(new_video(title, category, &fixture))
                .await
                .unwrap();
        }

        let matches = fixture
            .videos
            .list(VideoFilter {
                search: Some("RUST".to_string()),
                category: Some("Tech".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Rust in an hour");
    }

    #[tokio::test]
    async fn search_wildcards_are_literal_characters() {
        let fixture = setup().await;

        for title in ["100% honest reviews", "100x engineering"] {
            fixture
                .videos
                .create_video(new_video(title, "Tech", &fixture))
                .await
                .unwrap();
        }

        let matches = fixture
            .videos
            .list(VideoFilter {
                search: Some("100%".to_string()),
                category: None,
            })
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "100% honest reviews");
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let fixture = setup().await;

        for title in ["first", "second", "third"] {
            fixture
                .videos
                .create_video(new_video(title, "Tech", &fixture))
                .await
                .unwrap();
        }

        let titles: Vec<_> = fixture
            .videos
            .list(VideoFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.title)
            .collect();

        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn reactions_never_double_count_a_user() {
        let fixture = setup().await;

        let video = fixture
            .videos
            .create_video(new_video("T", "Tech", &fixture))
            .await
            .unwrap();

        let user_id = fixture.user.id;

        fixture.videos.like(video.id, user_id).await.unwrap();
        fixture.videos.dislike(video.id, user_id).await.unwrap();
        let after = fixture.videos.like(video.id, user_id).await.unwrap();

        assert_eq!(after.likes, vec![user_id]);
        assert!(after.dislikes.is_empty());

        // Liking again is a no-op, not a toggle
        let again = fixture.videos.like(video.id, user_id).await.unwrap();

        assert_eq!(again.likes, vec![user_id]);
        assert!(again.dislikes.is_empty());
    }

    #[tokio::test]
    async fn only_the_uploader_may_edit_or_delete() {
        let fixture = setup().await;
        let stranger = create_user(&fixture.db, "eve@x.com").await;

        let video = fixture
            .videos
            .create_video(new_video("T", "Tech", &fixture))
            .await
            .unwrap();

        let edit = fixture
            .videos
            .update_video(
                UpdatedVideo {
                    id: video.id,
                    title: Some("Defaced".to_string()),
                    ..Default::default()
                },
                stranger.id,
            )
            .await;

        assert!(matches!(edit, Err(VideoError::EditNotAllowed)));

        let delete = fixture.videos.delete_video(video.id, stranger.id).await;

        assert!(matches!(delete, Err(VideoError::DeleteNotAllowed)));
    }

    #[tokio::test]
    async fn update_applies_only_the_provided_fields() {
        let fixture = setup().await;

        let video = fixture
            .videos
            .create_video(new_video("Original title", "Tech", &fixture))
            .await
            .unwrap();

        let updated = fixture
            .videos
            .update_video(
                UpdatedVideo {
                    id: video.id,
                    description: Some("Now with a description".to_string()),
                    ..Default::default()
                },
                fixture.user.id,
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Original title");
        assert_eq!(updated.description, "Now with a description");
        assert_eq!(updated.category, "Tech");
    }

    #[tokio::test]
    async fn deleted_videos_disappear_from_listings() {
        let fixture = setup().await;

        let video = fixture
            .videos
            .create_video(new_video("T", "Tech", &fixture))
            .await
            .unwrap();

        fixture
            .videos
            .delete_video(video.id, fixture.user.id)
            .await
            .unwrap();

        let listed = fixture.videos.list(VideoFilter::default()).await.unwrap();
        assert!(listed.is_empty());

        let channel_videos = fixture
            .db
            .videos_by_channel(fixture.channel.id)
            .await
            .unwrap();
        assert!(channel_videos.is_empty());

        assert!(matches!(
            fixture.videos.watch(video.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}

use std::sync::Arc;

use thiserror::Error;

use crate::{CommentData, Database, DatabaseError, NewComment, PrimaryKey};

pub struct CommentManager {
    db: Arc<dyn Database>,
}

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Comment text is required.")]
    EmptyText,
    #[error("You can only edit your own comments.")]
    EditNotAllowed,
    #[error("You can only delete your own comments.")]
    DeleteNotAllowed,
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

impl CommentManager {
    pub fn new(db: &Arc<dyn Database>) -> Self {
        Self { db: db.clone() }
    }

    /// Returns a video's comments, author populated, newest first
    pub async fn for_video(&self, video_id: PrimaryKey) -> Result<Vec<CommentData>, DatabaseError> {
        self.db.comments_by_video(video_id).await
    }

    /// Adds a comment to an existing video
    pub async fn add(
        &self,
        video_id: PrimaryKey,
        text: &str,
        author_id: PrimaryKey,
    ) -> Result<CommentData, CommentError> {
        let text = text.trim();

        if text.is_empty() {
            return Err(CommentError::EmptyText);
        }

        // Ensure video exists
        let _ = self.db.video_by_id(video_id).await?;

        Ok(self
            .db
            .create_comment(NewComment {
                video_id,
                user_id: author_id,
                text: text.to_string(),
            })
            .await?)
    }

    /// Replaces a comment's text. Only the author may edit.
    pub async fn update(
        &self,
        comment_id: PrimaryKey,
        text: &str,
        caller_id: PrimaryKey,
    ) -> Result<CommentData, CommentError> {
        let text = text.trim();

        if text.is_empty() {
            return Err(CommentError::EmptyText);
        }

        let comment = self.db.comment_by_id(comment_id).await?;

        if comment.author.id != caller_id {
            return Err(CommentError::EditNotAllowed);
        }

        Ok(self.db.update_comment(comment_id, text.to_string()).await?)
    }

    /// Deletes a comment. Only the author may delete.
    pub async fn delete(
        &self,
        comment_id: PrimaryKey,
        caller_id: PrimaryKey,
    ) -> Result<(), CommentError> {
        let comment = self.db.comment_by_id(comment_id).await?;

        if comment.author.id != caller_id {
            return Err(CommentError::DeleteNotAllowed);
        }

        Ok(self.db.delete_comment(comment_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryDatabase, NewChannel, NewUser, NewVideo, UserData, VideoData};

    struct Fixture {
        comments: CommentManager,
        db: Arc<dyn Database>,
        user: UserData,
        video: VideoData,
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

        let video = db
            .create_video(NewVideo {
                title: "T".to_string(),
                description: String::new(),
                thumbnail_url: "thumb.jpg".to_string(),
                video_url: "video.mp4".to_string(),
                channel_id: channel.id,
                uploader_id: user.id,
                category: "Tech".to_string(),
                views: 0,
            })
            .await
            .expect("video is created");

        Fixture {
            comments: CommentManager::new(&db),
            db,
            user,
            video,
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

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let fixture = setup().await;

        let result = fixture
            .comments
            .add(fixture.video.id, "   \n  ", fixture.user.id)
            .await;

        assert!(matches!(result, Err(CommentError::EmptyText)));
    }

    #[tokio::test]
    async fn commenting_on_a_missing_video_is_not_found() {
        let fixture = setup().await;

        let result = fixture.comments.add(999, "hello", fixture.user.id).await;

        assert!(matches!(
            result,
            Err(CommentError::Db(DatabaseError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn comments_come_back_newest_first_with_author() {
        let fixture = setup().await;

        for text in ["first", "second"] {
            fixture
                .comments
                .add(fixture.video.id, text, fixture.user.id)
                .await
                .unwrap();
        }

        let comments = fixture.comments.for_video(fixture.video.id).await.unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "second");
        assert_eq!(comments[1].text, "first");
        assert_eq!(comments[0].author.username, "Bob");
    }

    #[tokio::test]
    async fn only_the_author_may_edit_or_delete() {
        let fixture = setup().await;
        let stranger = create_user(&fixture.db, "eve@x.com").await;

        let comment = fixture
            .comments
            .add(fixture.video.id, "mine", fixture.user.id)
            .await
            .unwrap();

        let edit = fixture
            .comments
            .update(comment.id, "defaced", stranger.id)
            .await;

        assert!(matches!(edit, Err(CommentError::EditNotAllowed)));

        let delete = fixture.comments.delete(comment.id, stranger.id).await;

        assert!(matches!(delete, Err(CommentError::DeleteNotAllowed)));

        let updated = fixture
            .comments
            .update(comment.id, "edited", fixture.user.id)
            .await
            .unwrap();

        assert_eq!(updated.text, "edited");
    }

    #[tokio::test]
    async fn comments_survive_their_video() {
        let fixture = setup().await;

        fixture
            .comments
            .add(fixture.video.id, "orphan soon", fixture.user.id)
            .await
            .unwrap();

        fixture.db.delete_video(fixture.video.id).await.unwrap();

        let comments = fixture.comments.for_video(fixture.video.id).await.unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "orphan soon");
    }
}

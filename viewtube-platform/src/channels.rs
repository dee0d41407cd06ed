use std::sync::Arc;

use thiserror::Error;

use crate::{ChannelData, Database, DatabaseError, NewChannel, PrimaryKey, VideoData};

pub struct ChannelManager {
    db: Arc<dyn Database>,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel name must be at least 3 characters long.")]
    NameTooShort,
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

impl ChannelManager {
    pub fn new(db: &Arc<dyn Database>) -> Self {
        Self { db: db.clone() }
    }

    /// Creates a new channel. The owner is fixed at creation, and a user
    /// may own any number of channels.
    pub async fn create_channel(&self, new_channel: NewChannel) -> Result<ChannelData, ChannelError> {
        if new_channel.name.trim().len() < 3 {
            return Err(ChannelError::NameTooShort);
        }

        Ok(self.db.create_channel(new_channel).await?)
    }

    /// Returns a channel with its owner and video list populated
    pub async fn channel_by_id(&self, channel_id: PrimaryKey) -> Result<ChannelData, DatabaseError> {
        self.db.channel_by_id(channel_id).await
    }

    /// Returns a channel's videos, newest first, sourced by querying videos
    /// with a matching channel reference. An unknown channel yields an
    /// empty list rather than an error.
    pub async fn videos_for_channel(
        &self,
        channel_id: PrimaryKey,
    ) -> Result<Vec<VideoData>, DatabaseError> {
        self.db.videos_by_channel(channel_id).await
    }

    /// The ids of all channels a user owns
    pub async fn ids_for_owner(
        &self,
        owner_id: PrimaryKey,
    ) -> Result<Vec<PrimaryKey>, DatabaseError> {
        self.db.channel_ids_by_owner(owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryDatabase, NewUser, UserData};

    async fn setup() -> (ChannelManager, UserData) {
        let db: Arc<dyn Database> = Arc::new(MemoryDatabase::new());

        let user = db
            .create_user(NewUser {
                username: "Bob".to_string(),
                email: "bob@x.com".to_string(),
                password: "hash".to_string(),
                avatar: String::new(),
            })
            .await
            .expect("user is created");

        (ChannelManager::new(&db), user)
    }

    fn new_channel(name: &str, owner_id: PrimaryKey) -> NewChannel {
        NewChannel {
            name: name.to_string(),
            description: String::new(),
            banner: String::new(),
            owner_id,
            subscribers: 0,
        }
    }

    #[tokio::test]
    async fn create_rejects_short_names() {
        let (channels, user) = setup().await;

        let result = channels.create_channel(new_channel("  ab  ", user.id)).await;

        assert!(matches!(result, Err(ChannelError::NameTooShort)));
    }

    #[tokio::test]
    async fn created_channel_has_its_owner_populated() {
        let (channels, user) = setup().await;

        let channel = channels
            .create_channel(new_channel("Bob's Lab", user.id))
            .await
            .expect("channel is created");

        let fetched = channels
            .channel_by_id(channel.id)
            .await
            .expect("channel exists");

        assert_eq!(fetched.owner.id, user.id);
        assert_eq!(fetched.owner.username, "Bob");
        assert!(fetched.videos.is_empty());
        assert_eq!(fetched.subscribers, 0);
    }

    #[tokio::test]
    async fn a_user_may_own_multiple_channels() {
        let (channels, user) = setup().await;

        let first = channels
            .create_channel(new_channel("First channel", user.id))
            .await
            .unwrap();

        let second = channels
            .create_channel(new_channel("Second channel", user.id))
            .await
            .unwrap();

        let ids = channels.ids_for_owner(user.id).await.unwrap();

        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn unknown_channel_yields_empty_video_list() {
        let (channels, _) = setup().await;

        let videos = channels.videos_for_channel(999).await.unwrap();

        assert!(videos.is_empty());
    }
}

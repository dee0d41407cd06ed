mod auth;
mod channels;
mod comments;
mod config;
mod db;
mod seed;
mod videos;

use std::sync::Arc;

pub use auth::*;
pub use channels::*;
pub use comments::*;
pub use config::*;
pub use db::*;
pub use seed::*;
pub use videos::*;

/// The viewtube platform, facilitating accounts, channels, videos, and comments.
pub struct Platform {
    pub auth: Auth,
    pub channels: ChannelManager,
    pub videos: VideoManager,
    pub comments: CommentManager,
}

impl Platform {
    pub fn new(database: Arc<dyn Database>, config: &Config) -> Self {
        Self {
            auth: Auth::new(&database, &config.jwt_secret),
            channels: ChannelManager::new(&database),
            videos: VideoManager::new(&database),
            comments: CommentManager::new(&database),
        }
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, query, query_as, query_scalar, Error as SqlxError, FromRow, PgPool};

use crate::{
    ChannelData, CommentData, Database, DatabaseError, DatabaseResult, IntoDatabaseError,
    NewChannel, NewComment, NewUser, NewVideo, PrimaryKey, ReactionKind, Result, UpdatedVideo,
    UserData, VideoData, VideoFilter,
};

/// The tables viewtube needs, applied on connect so a fresh database works out of the box
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        avatar TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE IF NOT EXISTS channels (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        banner TEXT NOT NULL DEFAULT '',
        owner_id INTEGER NOT NULL REFERENCES users (id),
        subscribers BIGINT NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS videos (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        thumbnail_url TEXT NOT NULL,
        video_url TEXT NOT NULL,
        channel_id INTEGER NOT NULL REFERENCES channels (id),
        uploader_id INTEGER NOT NULL REFERENCES users (id),
        views BIGINT NOT NULL DEFAULT 0,
        category TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS video_reactions (
        video_id INTEGER NOT NULL REFERENCES videos (id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users (id),
        kind TEXT NOT NULL,
        PRIMARY KEY (video_id, user_id)
    )",
    // video_id carries no foreign key, deleting a video leaves its comments behind
    "CREATE TABLE IF NOT EXISTS comments (
        id SERIAL PRIMARY KEY,
        video_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users (id),
        text TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

/// A postgres database implementation for viewtube
pub struct PgDatabase {
    pool: PgPool,
}

#[derive(FromRow)]
struct UserRow {
    id: PrimaryKey,
    username: String,
    email: String,
    password: String,
    avatar: String,
}

#[derive(FromRow)]
struct ChannelRow {
    id: PrimaryKey,
    name: String,
    description: String,
    banner: String,
    owner_id: PrimaryKey,
    subscribers: i64,
}

#[derive(FromRow)]
struct VideoRow {
    id: PrimaryKey,
    title: String,
    description: String,
    thumbnail_url: String,
    video_url: String,
    channel_id: PrimaryKey,
    channel_name: String,
    uploader_id: PrimaryKey,
    views: i64,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct CommentRow {
    id: PrimaryKey,
    video_id: PrimaryKey,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: PrimaryKey,
    username: String,
    email: String,
    password: String,
    avatar: String,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            avatar: row.avatar,
        }
    }
}

impl From<CommentRow> for CommentData {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            video_id: row.video_id,
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author: UserData {
                id: row.user_id,
                username: row.username,
                email: row.email,
                password: row.password,
                avatar: row.avatar,
            },
        }
    }
}

impl PgDatabase {
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        for statement in SCHEMA {
            query(statement)
                .execute(&pool)
                .await
                .map_err(|e| e.any())?;
        }

        Ok(Self { pool })
    }

    /// Returns the (likes, dislikes) user id sets of a video
    async fn reactions(&self, video_id: PrimaryKey) -> Result<(Vec<PrimaryKey>, Vec<PrimaryKey>)> {
        let rows: Vec<(PrimaryKey, String)> =
            query_as("SELECT user_id, kind FROM video_reactions WHERE video_id = $1")
                .bind(video_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| e.any())?;

        let mut likes = Vec::new();
        let mut dislikes = Vec::new();

        for (user_id, kind) in rows {
            if kind == ReactionKind::Like.as_str() {
                likes.push(user_id)
            } else {
                dislikes.push(user_id)
            }
        }

        Ok((likes, dislikes))
    }

    async fn hydrate_video(&self, row: VideoRow) -> Result<VideoData> {
        let (likes, dislikes) = self.reactions(row.id).await?;

        Ok(VideoData {
            id: row.id,
            title: row.title,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            video_url: row.video_url,
            channel_id: row.channel_id,
            channel_name: row.channel_name,
            uploader_id: row.uploader_id,
            views: row.views,
            category: row.category,
            likes,
            dislikes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn hydrate_videos(&self, rows: Vec<VideoRow>) -> Result<Vec<VideoData>> {
        let mut videos = Vec::with_capacity(rows.len());

        for row in rows {
            videos.push(self.hydrate_video(row).await?)
        }

        Ok(videos)
    }
}

/// Escapes `%`, `_` and `\` so a search term matches them literally
/// instead of acting as LIKE wildcards
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl Database for PgDatabase {
    async fn clear(&self) -> Result<()> {
        // Ordered so no delete violates a foreign key
        for table in ["comments", "video_reactions", "videos", "channels", "users"] {
            query(&format!("DELETE FROM {table}"))
                .execute(&self.pool)
                .await
                .map_err(|e| e.any())?;
        }

        Ok(())
    }

    async fn user_by_id(&self, user_id: PrimaryKey) -> Result<UserData> {
        query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("User", "id"))
    }

    async fn user_by_email(&self, email: &str) -> Result<UserData> {
        query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map(Into::into)
            .map_err(|e| e.not_found_or("User", "email"))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        self.user_by_email(&new_user.email)
            .await
            .conflict_or_ok("User", "email", &new_user.email)?;

        query_as::<_, UserRow>(
            "INSERT INTO users (username, email, password, avatar)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.password)
        .bind(new_user.avatar)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.any())
    }

    async fn channel_by_id(&self, channel_id: PrimaryKey) -> Result<ChannelData> {
        let row = query_as::<_, ChannelRow>("SELECT * FROM channels WHERE id = $1")
            .bind(channel_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("Channel", "id"))?;

        let owner = self.user_by_id(row.owner_id).await?;
        let videos = self.videos_by_channel(row.id).await?;

        Ok(ChannelData {
            id: row.id,
            name: row.name,
            description: row.description,
            banner: row.banner,
            owner,
            videos,
            subscribers: row.subscribers,
        })
    }

    async fn channel_ids_by_owner(&self, owner_id: PrimaryKey) -> Result<Vec<PrimaryKey>> {
        query_scalar("SELECT id FROM channels WHERE owner_id = $1 ORDER BY id")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())
    }

    async fn create_channel(&self, new_channel: NewChannel) -> Result<ChannelData> {
        // Ensure the owner exists
        let owner = self.user_by_id(new_channel.owner_id).await?;

        let (id,): (PrimaryKey,) = query_as(
            "INSERT INTO channels (name, description, banner, owner_id, subscribers)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(new_channel.name)
        .bind(new_channel.description)
        .bind(new_channel.banner)
        .bind(owner.id)
        .bind(new_channel.subscribers)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.channel_by_id(id).await
    }

    async fn video_by_id(&self, video_id: PrimaryKey) -> Result<VideoData> {
        let row = query_as::<_, VideoRow>(
            "SELECT videos.*, channels.name AS channel_name
             FROM videos
                INNER JOIN channels ON videos.channel_id = channels.id
             WHERE videos.id = $1",
        )
        .bind(video_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.not_found_or("Video", "id"))?;

        self.hydrate_video(row).await
    }

    async fn list_videos(&self, filter: VideoFilter) -> Result<Vec<VideoData>> {
        let rows = query_as::<_, VideoRow>(
            "SELECT videos.*, channels.name AS channel_name
             FROM videos
                INNER JOIN channels ON videos.channel_id = channels.id
             WHERE ($1::text IS NULL OR videos.title ILIKE '%' || $1 || '%')
                AND ($2::text IS NULL OR videos.category = $2)
             ORDER BY videos.created_at DESC, videos.id DESC",
        )
        .bind(filter.search.as_deref().map(escape_like))
        .bind(filter.category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.hydrate_videos(rows).await
    }

    async fn videos_by_channel(&self, channel_id: PrimaryKey) -> Result<Vec<VideoData>> {
        let rows = query_as::<_, VideoRow>(
            "SELECT videos.*, channels.name AS channel_name
             FROM videos
                INNER JOIN channels ON videos.channel_id = channels.id
             WHERE videos.channel_id = $1
             ORDER BY videos.created_at DESC, videos.id DESC",
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.hydrate_videos(rows).await
    }

    async fn create_video(&self, new_video: NewVideo) -> Result<VideoData> {
        let (id,): (PrimaryKey,) = query_as(
            "INSERT INTO videos (title, description, thumbnail_url, video_url, channel_id, uploader_id, category, views)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(new_video.title)
        .bind(new_video.description)
        .bind(new_video.thumbnail_url)
        .bind(new_video.video_url)
        .bind(new_video.channel_id)
        .bind(new_video.uploader_id)
        .bind(new_video.category)
        .bind(new_video.views)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.video_by_id(id).await
    }

    async fn update_video(&self, updated_video: UpdatedVideo) -> Result<VideoData> {
        let video = self.video_by_id(updated_video.id).await?;

        query(
            "UPDATE videos SET
                title = $1,
                description = $2,
                thumbnail_url = $3,
                video_url = $4,
                category = $5,
                updated_at = now()
             WHERE id = $6",
        )
        .bind(updated_video.title.unwrap_or(video.title))
        .bind(updated_video.description.unwrap_or(video.description))
        .bind(updated_video.thumbnail_url.unwrap_or(video.thumbnail_url))
        .bind(updated_video.video_url.unwrap_or(video.video_url))
        .bind(updated_video.category.unwrap_or(video.category))
        .bind(updated_video.id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.video_by_id(updated_video.id).await
    }

    async fn delete_video(&self, video_id: PrimaryKey) -> Result<()> {
        // Ensure video exists
        let _ = self.video_by_id(video_id).await?;

        // Reactions cascade with the video, comments intentionally stay
        query("DELETE FROM videos WHERE id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }

    async fn increment_views(&self, video_id: PrimaryKey) -> Result<()> {
        let result = query("UPDATE videos SET views = views + 1 WHERE id = $1")
            .bind(video_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                resource: "Video",
                identifier: "id",
            });
        }

        Ok(())
    }

    async fn set_reaction(
        &self,
        video_id: PrimaryKey,
        user_id: PrimaryKey,
        kind: ReactionKind,
    ) -> Result<()> {
        query(
            "INSERT INTO video_reactions (video_id, user_id, kind)
             VALUES ($1, $2, $3)
             ON CONFLICT (video_id, user_id) DO UPDATE SET kind = EXCLUDED.kind",
        )
        .bind(video_id)
        .bind(user_id)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| e.any())
        .map(|_| ())
    }

    async fn comment_by_id(&self, comment_id: PrimaryKey) -> Result<CommentData> {
        query_as::<_, CommentRow>(
            "SELECT
                comments.id,
                comments.video_id,
                comments.text,
                comments.created_at,
                comments.updated_at,
                users.id AS user_id,
                users.username,
                users.email,
                users.password,
                users.avatar
             FROM comments
                INNER JOIN users ON comments.user_id = users.id
             WHERE comments.id = $1",
        )
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await
        .map(Into::into)
        .map_err(|e| e.not_found_or("Comment", "id"))
    }

    async fn comments_by_video(&self, video_id: PrimaryKey) -> Result<Vec<CommentData>> {
        let rows = query_as::<_, CommentRow>(
            "SELECT
                comments.id,
                comments.video_id,
                comments.text,
                comments.created_at,
                comments.updated_at,
                users.id AS user_id,
                users.username,
                users.email,
                users.password,
                users.avatar
             FROM comments
                INNER JOIN users ON comments.user_id = users.id
             WHERE comments.video_id = $1
             ORDER BY comments.created_at DESC, comments.id DESC",
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_comment(&self, new_comment: NewComment) -> Result<CommentData> {
        let (id,): (PrimaryKey,) = query_as(
            "INSERT INTO comments (video_id, user_id, text)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(new_comment.video_id)
        .bind(new_comment.user_id)
        .bind(new_comment.text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?;

        self.comment_by_id(id).await
    }

    async fn update_comment(&self, comment_id: PrimaryKey, text: String) -> Result<CommentData> {
        let result = query("UPDATE comments SET text = $1, updated_at = now() WHERE id = $2")
            .bind(text)
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                resource: "Comment",
                identifier: "id",
            });
        }

        self.comment_by_id(comment_id).await
    }

    async fn delete_comment(&self, comment_id: PrimaryKey) -> Result<()> {
        // Ensure comment exists
        let _ = self.comment_by_id(comment_id).await?;

        query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.any())
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn search_terms_match_wildcards_literally() {
        assert_eq!(escape_like("100% legit"), "100\\% legit");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => Self::any(e),
        }
    }
}

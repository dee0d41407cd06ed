use log::info;
use thiserror::Error;

use crate::{
    DatabaseError, NewChannel, NewComment, NewUser, NewVideo, SharedDatabase, UserData,
};

/// Password shared by every seeded account
pub const SEED_PASSWORD: &str = "password123";

const SEED_HASH_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("HashError: {0}")]
    Hash(String),
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// Wipes the database and fills it with demo users, channels, videos,
/// and comments. This is the only path that writes nonzero `subscribers`.
pub async fn seed(db: &SharedDatabase) -> Result<(), SeedError> {
    info!("Clearing existing data...");
    db.clear().await?;

    let password = bcrypt::hash(SEED_PASSWORD, SEED_HASH_COST)
        .map_err(|e| SeedError::Hash(e.to_string()))?;

    info!("Seeding users...");
    let john = create_user(db, "JohnDoe", "john@example.com", "J", &password).await?;
    let jane = create_user(db, "JaneSmith", "jane@example.com", "J", &password).await?;
    let dev = create_user(db, "DevGuru", "dev@example.com", "D", &password).await?;

    info!("Seeding channels...");
    let channel_john = db
        .create_channel(NewChannel {
            name: "Code with John".to_string(),
            description: "Coding tutorials and tech reviews by John Doe.".to_string(),
            banner: "https://via.placeholder.com/800x200.png?text=Code+with+John".to_string(),
            owner_id: john.id,
            subscribers: 5200,
        })
        .await?;

    let channel_jane = db
        .create_channel(NewChannel {
            name: "JS with Jane".to_string(),
            description: "JavaScript deep dives and interview prep.".to_string(),
            banner: "https://via.placeholder.com/800x200.png?text=JS+with+Jane".to_string(),
            owner_id: jane.id,
            subscribers: 3100,
        })
        .await?;

    let channel_dev = db
        .create_channel(NewChannel {
            name: "Fullstack DevGuru".to_string(),
            description: "Fullstack MERN projects and live coding.".to_string(),
            banner: "https://via.placeholder.com/800x200.png?text=Fullstack+DevGuru".to_string(),
            owner_id: dev.id,
            subscribers: 8000,
        })
        .await?;

    info!("Seeding videos...");
    let videos = [
        (
            "Learn React in 30 Minutes",
            "A quick tutorial to get started with React.",
            "React+30min",
            "https://www.youtube.com/embed/dGcsHMXbSOA",
            channel_john.id,
            john.id,
            15200,
            "React",
        ),
        (
            "React Hooks Crash Course",
            "Everything you need to know about React Hooks.",
            "React+Hooks",
            "https://www.youtube.com/embed/f687hBjwFcM",
            channel_john.id,
            john.id,
            9800,
            "React",
        ),
        (
            "JavaScript ES6 Features",
            "Learn all important ES6 features.",
            "JS+ES6",
            "https://www.youtube.com/embed/NCwa_xi0Uuc",
            channel_jane.id,
            jane.id,
            20400,
            "JavaScript",
        ),
        (
            "Async JavaScript in 15 Minutes",
            "Promises, async/await, and more.",
            "Async+JS",
            "https://www.youtube.com/embed/_8gHHBlbziw",
            channel_jane.id,
            jane.id,
            14300,
            "JavaScript",
        ),
        (
            "Node.js Crash Course",
            "Build backend APIs with Node and Express.",
            "Node.js",
            "https://www.youtube.com/embed/fBNz5xF-Kx4",
            channel_dev.id,
            dev.id,
            18900,
            "Node.js",
        ),
        (
            "MongoDB Basics for Beginners",
            "Collections, documents and basic CRUD.",
            "MongoDB",
            "https://www.youtube.com/embed/ok9u_nxGkq0",
            channel_dev.id,
            dev.id,
            7600,
            "MongoDB",
        ),
        (
            "Tailwind CSS in 20 Minutes",
            "Style your app quickly with Tailwind.",
            "Tailwind+CSS",
            "https://www.youtube.com/embed/pfaSUYaSgRo",
            channel_dev.id,
            dev.id,
            5400,
            "CSS",
        ),
        (
            "MERN Stack Project Tutorial",
            "Build a full MERN app from scratch.",
            "MERN+Project",
            "https://www.youtube.com/embed/7CqJlxBYj-M",
            channel_dev.id,
            dev.id,
            22500,
            "Projects",
        ),
    ];

    let mut video_ids = Vec::with_capacity(videos.len());

    for (title, description, thumb, url, channel_id, uploader_id, views, category) in videos {
        let video = db
            .create_video(NewVideo {
                title: title.to_string(),
                description: description.to_string(),
                thumbnail_url: format!("https://via.placeholder.com/320x180.png?text={thumb}"),
                video_url: url.to_string(),
                channel_id,
                uploader_id,
                category: category.to_string(),
                views,
            })
            .await?;

        video_ids.push(video.id);
    }

    info!("Seeding comments...");
    let comments = [
        (video_ids[0], jane.id, "Great React intro, thanks!"),
        (video_ids[0], dev.id, "Very helpful for beginners."),
        (video_ids[2], john.id, "ES6 features explained so clearly."),
        (video_ids[4], jane.id, "Node.js finally makes sense!"),
    ];

    for (video_id, user_id, text) in comments {
        db.create_comment(NewComment {
            video_id,
            user_id,
            text: text.to_string(),
        })
        .await?;
    }

    info!("Seeding complete.");

    Ok(())
}

async fn create_user(
    db: &SharedDatabase,
    username: &str,
    email: &str,
    initial: &str,
    password: &str,
) -> Result<UserData, SeedError> {
    Ok(db
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            avatar: format!("https://via.placeholder.com/80x80.png?text={initial}"),
        })
        .await?)
}

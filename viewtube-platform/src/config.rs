use std::env;

use log::warn;

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 5000;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/viewtube";
const DEFAULT_JWT_SECRET: &str = "viewtube-dev-secret";

/// Runtime configuration, read from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server listens on.
    /// Env: `VIEWTUBE_PORT`
    pub port: u16,
    /// Postgres connection string.
    /// Env: `DATABASE_URL`
    pub database_url: String,
    /// Secret used to sign and verify bearer tokens.
    /// Env: `VIEWTUBE_JWT_SECRET`
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("VIEWTUBE_PORT")
            .map(|x| x.parse().expect("Port must be a number"))
            .unwrap_or(DEFAULT_PORT);

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            warn!("DATABASE_URL not set, using default: {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });

        let jwt_secret = env::var("VIEWTUBE_JWT_SECRET").unwrap_or_else(|_| {
            warn!("VIEWTUBE_JWT_SECRET not set, tokens are signed with an insecure default");
            DEFAULT_JWT_SECRET.to_string()
        });

        Self {
            port,
            database_url,
            jwt_secret,
        }
    }
}

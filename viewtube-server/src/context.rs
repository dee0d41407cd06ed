use std::sync::Arc;

use axum::extract::FromRef;
use viewtube_platform::Platform;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub platform: Arc<Platform>,
}

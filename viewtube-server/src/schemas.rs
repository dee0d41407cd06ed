use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::errors::ServerError;

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterSchema {
    #[validate(length(
        min = 3,
        message = "Username is required and must be at least 3 characters."
    ))]
    pub username: String,
    #[validate(contains(pattern = "@", message = "Valid email is required."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
    pub avatar: Option<String>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginSchema {
    pub email: String,
    pub password: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewChannelSchema {
    #[validate(length(min = 3, message = "Channel name must be at least 3 characters long."))]
    pub channel_name: String,
    pub description: Option<String>,
    pub channel_banner: Option<String>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewVideoSchema {
    #[validate(length(min = 1, message = "title is required."))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "thumbnailUrl is required."))]
    pub thumbnail_url: String,
    #[validate(length(min = 1, message = "videoUrl is required."))]
    pub video_url: String,
    pub channel_id: i32,
    #[validate(length(min = 1, message = "category is required."))]
    pub category: String,
}

/// Omitted fields are left untouched
#[derive(Debug, Default, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateVideoSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommentTextSchema {
    #[validate(length(min = 1, message = "Comment text is required."))]
    pub text: String,
}

/// Query parameters of the video listing
#[derive(Debug, Default, IntoParams, Deserialize)]
pub struct VideoListQuery {
    /// Case-insensitive substring match on the title
    pub search: Option<String>,
    /// Exact match on the category
    pub category: Option<String>,
}

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extracted_json: Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e| ServerError::Validation(e.to_string()))?;

        extracted_json
            .0
            .validate()
            .map_err(|e| ServerError::Validation(first_message(&e)))?;

        Ok(Self(extracted_json.0))
    }
}

/// Surfaces the first declared message of a failed validation, so clients get
/// the field-specific wording rather than a generic one
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .filter_map(|error| error.message.as_ref())
        .map(|message| message.to_string())
        .next()
        .unwrap_or_else(|| "Request body is invalid".to_string())
}

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tera::Context;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Review not found")]
    ReviewNotFound,

    #[error("Discussion not found")]
    DiscussionNotFound,

    #[error("Tag '{0}' not found")]
    TagNotFound(String),

    #[error("Page not found")]
    PageNotFound,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Authentication failed")]
    AuthFailed,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::ReviewNotFound
            | ServerError::DiscussionNotFound
            | ServerError::TagNotFound(_)
            | ServerError::PageNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::AuthRequired => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::AuthFailed => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::PermissionDenied => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Database(_) | ServerError::Template(_) | ServerError::Io(_) => {
                tracing::error!("Internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let mut context = Context::new();
        context.insert("message", &message);
        match crate::web_ui::templates::render("error.html", &context) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

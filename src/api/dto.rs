//! Shared Data Transfer Objects (DTOs) for API handlers.

use serde::Serialize;
use utoipa::ToSchema;

/// Plain confirmation body returned by delete endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

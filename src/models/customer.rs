use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::media::ImageData;

/// A wholesale customer record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Customer {
    pub id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "Phone must be between 1 and 30 characters"))]
    pub phone: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Address must be between 1 and 255 characters"
    ))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 50, message = "Country must be between 1 and 50 characters"))]
    pub country: String,
    pub image: Option<ImageData>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub client_id: i32,
    pub created_at: NaiveDateTime,
}

impl From<entity::location::Model> for LocationDto {
    fn from(location: entity::location::Model) -> Self {
        Self {
            id: location.id,
            name: location.name,
            address: location.address,
            description: location.description,
            client_id: location.client_id,
            created_at: location.created_at,
        }
    }
}

/// Body for creating or updating a location
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct LocationFormDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub address: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Owning client, required when staff create a location on a client's behalf and
    /// ignored for clients
    pub client_id: Option<i32>,
}

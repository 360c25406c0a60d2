use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::model::api::UnknownVariant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "InProgress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(UnknownVariant {
                kind: "order status",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub phone_number: String,
    pub status: OrderStatus,
    pub requested_date: NaiveDate,
    pub location_id: i32,
    pub client_id: i32,
    /// Users assigned to work on the order
    pub technician_ids: Vec<i32>,
    pub created_at: NaiveDateTime,
}

impl OrderDto {
    pub fn from_model(
        order: entity::security_system_order::Model,
        technician_ids: Vec<i32>,
    ) -> Result<Self, UnknownVariant> {
        Ok(Self {
            id: order.id,
            status: order.status.parse()?,
            title: order.title,
            description: order.description,
            phone_number: order.phone_number,
            requested_date: order.requested_date,
            location_id: order.location_id,
            client_id: order.client_id,
            technician_ids,
            created_at: order.created_at,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateOrderDto {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: String,
    pub requested_date: NaiveDate,
    pub location_id: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusDto {
    pub status: OrderStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignTechnicianDto {
    pub technician_id: i32,
}

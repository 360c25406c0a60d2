use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::model::api::UnknownVariant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DeviceType {
    Camera,
    MotionSensor,
    DoorSensor,
    Alarm,
    SmokeDetector,
    ControlPanel,
    Other,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "Camera",
            Self::MotionSensor => "MotionSensor",
            Self::DoorSensor => "DoorSensor",
            Self::Alarm => "Alarm",
            Self::SmokeDetector => "SmokeDetector",
            Self::ControlPanel => "ControlPanel",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Camera" => Ok(Self::Camera),
            "MotionSensor" => Ok(Self::MotionSensor),
            "DoorSensor" => Ok(Self::DoorSensor),
            "Alarm" => Ok(Self::Alarm),
            "SmokeDetector" => Ok(Self::SmokeDetector),
            "ControlPanel" => Ok(Self::ControlPanel),
            "Other" => Ok(Self::Other),
            _ => Err(UnknownVariant {
                kind: "device type",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DeviceDto {
    pub id: i32,
    pub device_type: DeviceType,
    pub brand: String,
    pub model: String,
    pub quantity: i32,
    pub date_installed: NaiveDate,
    /// Direct link to the device photo
    pub image_url: Option<String>,
    pub order_id: i32,
    pub installed_by_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<entity::installed_device::Model> for DeviceDto {
    type Error = UnknownVariant;

    fn try_from(device: entity::installed_device::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: device.id,
            device_type: device.device_type.parse()?,
            brand: device.brand,
            model: device.model,
            quantity: device.quantity,
            date_installed: device.date_installed,
            image_url: device.image_url,
            order_id: device.order_id,
            installed_by_id: device.installed_by_id,
            created_at: device.created_at,
        })
    }
}

/// Body for adding or updating an installed device
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct DeviceFormDto {
    pub device_type: DeviceType,
    #[validate(length(min = 1, max = 50))]
    pub brand: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub date_installed: NaiveDate,
}

/// Multipart body for `POST /api/devices/{id}/image`
#[derive(ToSchema)]
pub struct DeviceImageUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

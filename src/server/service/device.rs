use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    model::device::{DeviceDto, DeviceFormDto},
    server::{
        data::device::DeviceRepository,
        error::Error,
        model::{auth::CurrentUser, db::DeviceModel},
        service::{dropbox::DropboxClient, order::OrderService},
    },
};

/// Devices installed as part of an order.
///
/// Anyone who can view the order can list its devices; only staff and technicians assigned to
/// the order can change them.
pub struct DeviceService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DeviceService<'a> {
    /// Creates a new instance of [`DeviceService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_devices(
        &self,
        caller: &CurrentUser,
        order_id: i32,
    ) -> Result<Vec<DeviceDto>, Error> {
        OrderService::new(self.db)
            .find_visible(caller, order_id)
            .await?;

        let devices = DeviceRepository::new(self.db).get_by_order(order_id).await?;

        Ok(devices
            .into_iter()
            .map(DeviceDto::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn add_device(
        &self,
        caller: &CurrentUser,
        order_id: i32,
        dto: DeviceFormDto,
    ) -> Result<DeviceDto, Error> {
        OrderService::new(self.db)
            .find_workable(caller, order_id, "add devices to this order")
            .await?;

        let device = DeviceRepository::new(self.db)
            .save(entity::installed_device::ActiveModel {
                device_type: ActiveValue::Set(dto.device_type.as_str().to_string()),
                brand: ActiveValue::Set(dto.brand),
                model: ActiveValue::Set(dto.model),
                quantity: ActiveValue::Set(dto.quantity),
                date_installed: ActiveValue::Set(dto.date_installed),
                image_url: ActiveValue::Set(None),
                order_id: ActiveValue::Set(order_id),
                installed_by_id: ActiveValue::Set(Some(caller.id)),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .await?;

        Ok(DeviceDto::try_from(device)?)
    }

    pub async fn update_device(
        &self,
        caller: &CurrentUser,
        device_id: i32,
        dto: DeviceFormDto,
    ) -> Result<DeviceDto, Error> {
        let device = self
            .find_workable(caller, device_id, "update devices on this order")
            .await?;

        let device = DeviceRepository::new(self.db)
            .save(entity::installed_device::ActiveModel {
                id: ActiveValue::Unchanged(device.id),
                device_type: ActiveValue::Set(dto.device_type.as_str().to_string()),
                brand: ActiveValue::Set(dto.brand),
                model: ActiveValue::Set(dto.model),
                quantity: ActiveValue::Set(dto.quantity),
                date_installed: ActiveValue::Set(dto.date_installed),
                ..Default::default()
            })
            .await?;

        Ok(DeviceDto::try_from(device)?)
    }

    pub async fn delete_device(&self, caller: &CurrentUser, device_id: i32) -> Result<(), Error> {
        self.find_workable(caller, device_id, "remove devices from this order")
            .await?;

        let result = DeviceRepository::new(self.db).delete(device_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("device", device_id));
        }

        Ok(())
    }

    /// Uploads a photo of the device to Dropbox and stores a direct link to it
    pub async fn attach_image(
        &self,
        caller: &CurrentUser,
        device_id: i32,
        file_name: &str,
        bytes: Vec<u8>,
        dropbox: &DropboxClient,
    ) -> Result<DeviceDto, Error> {
        if bytes.is_empty() {
            return Err(Error::BadRequest("Uploaded file is empty".to_string()));
        }

        let device = self
            .find_workable(caller, device_id, "upload device photos for this order")
            .await?;

        let path = format!(
            "/devices/{}/{}_{}",
            device.id,
            Utc::now().timestamp(),
            sanitize_file_name(file_name)
        );
        let image_url = dropbox.upload_and_share(&path, bytes).await?;

        tracing::info!(device_id = device.id, path = %path, "Stored device photo");

        let device = DeviceRepository::new(self.db)
            .set_image_url(device, image_url)
            .await?;

        Ok(DeviceDto::try_from(device)?)
    }

    async fn find_workable(
        &self,
        caller: &CurrentUser,
        device_id: i32,
        action: &str,
    ) -> Result<DeviceModel, Error> {
        let Some(device) = DeviceRepository::new(self.db).get(device_id).await? else {
            return Err(Error::not_found("device", device_id));
        };

        OrderService::new(self.db)
            .find_workable(caller, device.order_id, action)
            .await?;

        Ok(device)
    }
}

/// Keeps ASCII letters, digits, `.`, `-` and `_` so the name is safe in a Dropbox path header
fn sanitize_file_name(file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() {
        "image".to_string()
    } else {
        sanitized
    }
}

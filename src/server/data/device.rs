use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::server::{data::Repository, model::db::DeviceModel};

pub struct DeviceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DeviceRepository<'a, C> {
    /// Creates a new instance of [`DeviceRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn base(&self) -> Repository<'a, C, entity::installed_device::Entity> {
        Repository::new(self.db)
    }

    pub async fn get(&self, device_id: i32) -> Result<Option<DeviceModel>, DbErr> {
        self.base().get_by_id(device_id).await
    }

    /// Inserts or updates depending on whether `device.id` is set
    pub async fn save(
        &self,
        device: entity::installed_device::ActiveModel,
    ) -> Result<DeviceModel, DbErr> {
        self.base().save(device).await
    }

    pub async fn get_by_order(&self, order_id: i32) -> Result<Vec<DeviceModel>, DbErr> {
        entity::prelude::InstalledDevice::find()
            .filter(entity::installed_device::Column::OrderId.eq(order_id))
            .order_by_asc(entity::installed_device::Column::Id)
            .all(self.db)
            .await
    }

    /// Stores the shared link of an uploaded device photo
    pub async fn set_image_url(
        &self,
        device: DeviceModel,
        image_url: String,
    ) -> Result<DeviceModel, DbErr> {
        let mut device_am = device.into_active_model();
        device_am.image_url = ActiveValue::Set(Some(image_url));

        device_am.update(self.db).await
    }

    pub async fn delete(&self, device_id: i32) -> Result<DeleteResult, DbErr> {
        self.base().delete(device_id).await
    }
}

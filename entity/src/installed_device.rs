use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "installed_device")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// One of `Camera`, `MotionSensor`, `DoorSensor`, `Alarm`, `SmokeDetector`, `ControlPanel`,
    /// `Other`
    pub device_type: String,
    pub brand: String,
    pub model: String,
    pub quantity: i32,
    pub date_installed: Date,
    pub image_url: Option<String>,
    pub order_id: i32,
    pub installed_by_id: Option<i32>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::security_system_order::Entity",
        from = "Column::OrderId",
        to = "super::security_system_order::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::InstalledById",
        to = "super::app_user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    InstalledBy,
    #[sea_orm(has_many = "super::maintenance_device::Entity")]
    MaintenanceDevice,
}

impl Related<super::security_system_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::maintenance_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceDevice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

/// Installed device inspected as part of a maintenance visit
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_device")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub maintenance_log_id: i32,
    pub installed_device_id: i32,
    pub notes: Option<String>,
    pub require_replacement: bool,
    pub is_fixed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::maintenance_log::Entity",
        from = "Column::MaintenanceLogId",
        to = "super::maintenance_log::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    MaintenanceLog,
    #[sea_orm(
        belongs_to = "super::installed_device::Entity",
        from = "Column::InstalledDeviceId",
        to = "super::installed_device::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    InstalledDevice,
}

impl Related<super::maintenance_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceLog.def()
    }
}

impl Related<super::installed_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstalledDevice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

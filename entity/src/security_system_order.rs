use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "security_system_order")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub phone_number: String,
    /// One of `Pending`, `InProgress`, `Completed`, `Cancelled`
    pub status: String,
    pub requested_date: Date,
    pub location_id: i32,
    pub client_id: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::app_user::Entity",
        from = "Column::ClientId",
        to = "super::app_user::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Client,
    #[sea_orm(has_many = "super::order_technician::Entity")]
    OrderTechnician,
    #[sea_orm(has_many = "super::installed_device::Entity")]
    InstalledDevice,
    #[sea_orm(has_many = "super::maintenance_log::Entity")]
    MaintenanceLog,
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoice,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::order_technician::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderTechnician.def()
    }
}

impl Related<super::installed_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstalledDevice.def()
    }
}

impl Related<super::maintenance_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceLog.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

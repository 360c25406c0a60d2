use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection};

use crate::{
    model::{
        api::{PageDto, PageParams},
        order::{CreateOrderDto, OrderDto, OrderStatus},
        user::Role,
    },
    server::{
        data::{order::OrderRepository, user::UserRepository, Page, Repository},
        error::{auth::AuthError, Error},
        model::{
            auth::CurrentUser,
            db::{LocationModel, OrderModel},
        },
        service::notification::NotificationService,
    },
};

pub struct OrderService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OrderService<'a> {
    /// Creates a new instance of [`OrderService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Role-filtered order listing with assigned technicians
    pub async fn get_orders(
        &self,
        caller: &CurrentUser,
        params: PageParams,
    ) -> Result<PageDto<OrderDto>, Error> {
        let order_repo = OrderRepository::new(self.db);
        let (page, page_size) = (params.page(), params.page_size());

        let page = match caller.role {
            Role::Admin | Role::Manager => order_repo.get_page(page, page_size).await?,
            Role::Client => {
                order_repo
                    .get_page_for_client(caller.id, page, page_size)
                    .await?
            }
            Role::Technician => {
                order_repo
                    .get_page_for_technician(caller.id, page, page_size)
                    .await?
            }
        };

        Ok(self.with_technicians(page).await?.into())
    }

    pub async fn get_order(&self, caller: &CurrentUser, order_id: i32) -> Result<OrderDto, Error> {
        let order = self.find_visible(caller, order_id).await?;

        self.to_dto(order).await
    }

    /// Creates a `Pending` order at one of the client's locations and notifies staff
    ///
    /// Staff may create orders on a client's behalf; the order then belongs to the location's
    /// owner.
    pub async fn create_order(
        &self,
        caller: &CurrentUser,
        dto: CreateOrderDto,
    ) -> Result<OrderDto, Error> {
        if caller.role == Role::Technician {
            return Err(AuthError::forbidden(caller.id, "create orders").into());
        }

        let location = Repository::<_, entity::location::Entity>::new(self.db)
            .get_by_id(dto.location_id)
            .await?
            .filter(|location: &LocationModel| caller.is_staff() || location.client_id == caller.id)
            .ok_or_else(|| Error::not_found("location", dto.location_id))?;

        let order = OrderRepository::new(self.db)
            .create(entity::security_system_order::ActiveModel {
                title: ActiveValue::Set(dto.title),
                description: ActiveValue::Set(dto.description),
                phone_number: ActiveValue::Set(dto.phone_number),
                status: ActiveValue::Set(OrderStatus::Pending.as_str().to_string()),
                requested_date: ActiveValue::Set(dto.requested_date),
                location_id: ActiveValue::Set(location.id),
                client_id: ActiveValue::Set(location.client_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .await?;

        tracing::info!(order_id = order.id, client_id = order.client_id, "Created order");

        NotificationService::new(self.db)
            .notify_staff_quietly(&format!(
                "New order #{} \"{}\" was placed",
                order.id, order.title
            ))
            .await;

        Ok(OrderDto::from_model(order, Vec::new())?)
    }

    /// Staff-only status change; the client is notified
    pub async fn update_status(
        &self,
        caller: &CurrentUser,
        order_id: i32,
        status: OrderStatus,
    ) -> Result<OrderDto, Error> {
        caller.require_staff("change order status")?;

        let Some(order) = OrderRepository::new(self.db)
            .update_status(order_id, status.as_str())
            .await?
        else {
            return Err(Error::not_found("order", order_id));
        };

        NotificationService::new(self.db)
            .notify_quietly(
                &[order.client_id],
                &format!("Your order #{} is now {}", order.id, status),
            )
            .await;

        self.to_dto(order).await
    }

    /// Staff-only; the user must hold the technician role
    pub async fn assign_technician(
        &self,
        caller: &CurrentUser,
        order_id: i32,
        technician_id: i32,
    ) -> Result<OrderDto, Error> {
        caller.require_staff("assign technicians")?;

        let order_repo = OrderRepository::new(self.db);
        let Some(order) = order_repo.get(order_id).await? else {
            return Err(Error::not_found("order", order_id));
        };

        match UserRepository::new(self.db)
            .get_with_role(technician_id)
            .await?
        {
            Some((_, Some(role))) if role.name == Role::Technician.as_str() => {}
            Some(_) => {
                return Err(Error::BadRequest(format!(
                    "User {} is not a technician",
                    technician_id
                )))
            }
            None => return Err(Error::not_found("user", technician_id)),
        }

        if order_repo.assign_technician(order_id, technician_id).await? {
            NotificationService::new(self.db)
                .notify_quietly(
                    &[technician_id],
                    &format!("You were assigned to order #{} \"{}\"", order.id, order.title),
                )
                .await;
        }

        self.to_dto(order).await
    }

    pub async fn unassign_technician(
        &self,
        caller: &CurrentUser,
        order_id: i32,
        technician_id: i32,
    ) -> Result<OrderDto, Error> {
        caller.require_staff("unassign technicians")?;

        let order_repo = OrderRepository::new(self.db);
        let Some(order) = order_repo.get(order_id).await? else {
            return Err(Error::not_found("order", order_id));
        };

        let result = order_repo
            .unassign_technician(order_id, technician_id)
            .await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("technician assignment", technician_id));
        }

        self.to_dto(order).await
    }

    /// Admins delete any order; clients only their own while it is still pending
    pub async fn delete_order(&self, caller: &CurrentUser, order_id: i32) -> Result<(), Error> {
        let order = self.find_visible(caller, order_id).await?;

        let allowed = match caller.role {
            Role::Admin => true,
            Role::Client => order.status == OrderStatus::Pending.as_str(),
            Role::Manager | Role::Technician => false,
        };
        if !allowed {
            return Err(AuthError::forbidden(caller.id, "delete this order").into());
        }

        let result = OrderRepository::new(self.db).delete(order_id).await?;
        if result.rows_affected == 0 {
            return Err(Error::not_found("order", order_id));
        }

        tracing::info!(order_id, user_id = caller.id, "Deleted order");

        Ok(())
    }

    /// Fetches an order the caller may view
    ///
    /// Orders outside the caller's scope are reported as not found so their existence is not
    /// revealed.
    pub(crate) async fn find_visible(
        &self,
        caller: &CurrentUser,
        order_id: i32,
    ) -> Result<OrderModel, Error> {
        let order_repo = OrderRepository::new(self.db);
        let Some(order) = order_repo.get(order_id).await? else {
            return Err(Error::not_found("order", order_id));
        };

        let visible = match caller.role {
            Role::Admin | Role::Manager => true,
            Role::Client => order.client_id == caller.id,
            Role::Technician => order_repo.is_assigned(order_id, caller.id).await?,
        };

        if !visible {
            return Err(Error::not_found("order", order_id));
        }

        Ok(order)
    }

    /// Fetches an order the caller may do field work on: staff or an assigned technician
    pub(crate) async fn find_workable(
        &self,
        caller: &CurrentUser,
        order_id: i32,
        action: &str,
    ) -> Result<OrderModel, Error> {
        let order_repo = OrderRepository::new(self.db);
        let Some(order) = order_repo.get(order_id).await? else {
            return Err(Error::not_found("order", order_id));
        };

        let allowed = match caller.role {
            Role::Admin | Role::Manager => true,
            Role::Technician => order_repo.is_assigned(order_id, caller.id).await?,
            Role::Client => false,
        };

        if !allowed {
            return Err(AuthError::forbidden(caller.id, action).into());
        }

        Ok(order)
    }

    async fn to_dto(&self, order: OrderModel) -> Result<OrderDto, Error> {
        let technician_ids = OrderRepository::new(self.db)
            .get_technician_ids(order.id)
            .await?;

        Ok(OrderDto::from_model(order, technician_ids)?)
    }

    async fn with_technicians(&self, page: Page<OrderModel>) -> Result<Page<OrderDto>, Error> {
        let order_ids: Vec<i32> = page.items.iter().map(|order| order.id).collect();
        let mut assigned = OrderRepository::new(self.db)
            .get_technician_ids_for_orders(&order_ids)
            .await?;

        Ok(page.try_map(|order| {
            let technician_ids = assigned.remove(&order.id).unwrap_or_default();
            OrderDto::from_model(order, technician_ids)
        })?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use installdesk_test_utils::prelude::*;

    use crate::{
        model::{
            api::PageParams,
            order::{CreateOrderDto, OrderStatus},
            user::Role,
        },
        server::{
            error::{auth::AuthError, Error},
            model::auth::CurrentUser,
            service::order::OrderService,
        },
    };

    fn current_user(id: i32, role: Role) -> CurrentUser {
        CurrentUser {
            id,
            username: String::new(),
            role,
        }
    }

    fn create_dto(location_id: i32) -> CreateOrderDto {
        CreateOrderDto {
            title: "Alarm system".to_string(),
            description: "Alarm with two door sensors".to_string(),
            phone_number: "+15550100".to_string(),
            requested_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            location_id,
        }
    }

    async fn setup() -> Result<TestContext, TestError> {
        TestBuilder::new()
            .with_app_tables()
            .with_user("admin", ROLE_ADMIN)
            .with_user("manager", ROLE_MANAGER)
            .with_user("tech", ROLE_TECHNICIAN)
            .with_user("alice", ROLE_CLIENT)
            .with_user("bob", ROLE_CLIENT)
            .build()
            .await
    }

    mod create_order {
        use super::*;

        /// Expect a pending order owned by the client and a notification for each staff member
        #[tokio::test]
        async fn creates_pending_order_and_notifies_staff() -> Result<(), TestError> {
            let test = setup().await?;
            let alice = test.user().find_user("alice").await?;
            let location = test.order().insert_location(alice.id).await?;

            let service = OrderService::new(&test.db);
            let order = service
                .create_order(&current_user(alice.id, Role::Client), create_dto(location.id))
                .await
                .unwrap();

            assert_eq!(order.status, OrderStatus::Pending);
            assert_eq!(order.client_id, alice.id);
            assert!(order.technician_ids.is_empty());

            let admin = test.user().find_user("admin").await?;
            let manager = test.user().find_user("manager").await?;
            assert_eq!(test.message().count_notifications(admin.id).await?, 1);
            assert_eq!(test.message().count_notifications(manager.id).await?, 1);
            assert_eq!(test.message().count_notifications(alice.id).await?, 0);

            Ok(())
        }

        /// Expect NotFound when ordering at another client's location
        #[tokio::test]
        async fn rejects_foreign_location() -> Result<(), TestError> {
            let test = setup().await?;
            let alice = test.user().find_user("alice").await?;
            let bob = test.user().find_user("bob").await?;
            let location = test.order().insert_location(alice.id).await?;

            let service = OrderService::new(&test.db);
            let result = service
                .create_order(&current_user(bob.id, Role::Client), create_dto(location.id))
                .await;

            assert!(matches!(result, Err(Error::NotFound { .. })));

            Ok(())
        }

        /// Expect staff-created orders to belong to the location's owner
        #[tokio::test]
        async fn staff_order_belongs_to_location_owner() -> Result<(), TestError> {
            let test = setup().await?;
            let manager = test.user().find_user("manager").await?;
            let alice = test.user().find_user("alice").await?;
            let location = test.order().insert_location(alice.id).await?;

            let service = OrderService::new(&test.db);
            let order = service
                .create_order(&current_user(manager.id, Role::Manager), create_dto(location.id))
                .await
                .unwrap();

            assert_eq!(order.client_id, alice.id);

            Ok(())
        }
    }

    mod get_orders {
        use super::*;

        /// Expect clients to see their own orders and technicians their assigned orders
        #[tokio::test]
        async fn filters_orders_by_role() -> Result<(), TestError> {
            let test = setup().await?;
            let admin = test.user().find_user("admin").await?;
            let tech = test.user().find_user("tech").await?;
            let alice = test.user().find_user("alice").await?;
            let bob = test.user().find_user("bob").await?;
            let alices = test.order().insert_order_for_client(alice.id).await?;
            test.order().insert_order_for_client(bob.id).await?;
            test.order().assign_technician(alices.id, tech.id).await?;

            let service = OrderService::new(&test.db);
            let params = PageParams::default();

            let all = service
                .get_orders(&current_user(admin.id, Role::Admin), params)
                .await
                .unwrap();
            let own = service
                .get_orders(&current_user(bob.id, Role::Client), params)
                .await
                .unwrap();
            let assigned = service
                .get_orders(&current_user(tech.id, Role::Technician), params)
                .await
                .unwrap();

            assert_eq!(all.total_items, 2);
            assert_eq!(own.total_items, 1);
            assert_eq!(own.items[0].client_id, bob.id);
            assert_eq!(assigned.total_items, 1);
            assert_eq!(assigned.items[0].id, alices.id);
            assert_eq!(assigned.items[0].technician_ids, vec![tech.id]);

            Ok(())
        }

        /// Expect an unassigned technician to get NotFound for a single order
        #[tokio::test]
        async fn hides_unassigned_order_from_technician() -> Result<(), TestError> {
            let test = setup().await?;
            let tech = test.user().find_user("tech").await?;
            let alice = test.user().find_user("alice").await?;
            let order = test.order().insert_order_for_client(alice.id).await?;

            let service = OrderService::new(&test.db);
            let result = service
                .get_order(&current_user(tech.id, Role::Technician), order.id)
                .await;

            assert!(matches!(result, Err(Error::NotFound { .. })));

            Ok(())
        }
    }

    mod update_status {
        use super::*;

        /// Expect the new status stored and the client notified
        #[tokio::test]
        async fn updates_status_and_notifies_client() -> Result<(), TestError> {
            let test = setup().await?;
            let manager = test.user().find_user("manager").await?;
            let alice = test.user().find_user("alice").await?;
            let order = test.order().insert_order_for_client(alice.id).await?;

            let service = OrderService::new(&test.db);
            let updated = service
                .update_status(
                    &current_user(manager.id, Role::Manager),
                    order.id,
                    OrderStatus::InProgress,
                )
                .await
                .unwrap();

            assert_eq!(updated.status, OrderStatus::InProgress);
            assert_eq!(test.message().count_notifications(alice.id).await?, 1);

            Ok(())
        }

        /// Expect clients to be forbidden from changing status
        #[tokio::test]
        async fn client_cannot_update_status() -> Result<(), TestError> {
            let test = setup().await?;
            let alice = test.user().find_user("alice").await?;
            let order = test.order().insert_order_for_client(alice.id).await?;

            let service = OrderService::new(&test.db);
            let result = service
                .update_status(
                    &current_user(alice.id, Role::Client),
                    order.id,
                    OrderStatus::Completed,
                )
                .await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::Forbidden { .. }))
            ));

            Ok(())
        }
    }

    mod assign_technician {
        use super::*;

        /// Expect the technician listed on the order and notified once
        #[tokio::test]
        async fn assigns_and_notifies_technician() -> Result<(), TestError> {
            let test = setup().await?;
            let manager = test.user().find_user("manager").await?;
            let tech = test.user().find_user("tech").await?;
            let alice = test.user().find_user("alice").await?;
            let order = test.order().insert_order_for_client(alice.id).await?;
            let caller = current_user(manager.id, Role::Manager);

            let service = OrderService::new(&test.db);
            service
                .assign_technician(&caller, order.id, tech.id)
                .await
                .unwrap();
            let again = service
                .assign_technician(&caller, order.id, tech.id)
                .await
                .unwrap();

            assert_eq!(again.technician_ids, vec![tech.id]);
            assert_eq!(test.message().count_notifications(tech.id).await?, 1);

            Ok(())
        }

        /// Expect BadRequest when the user is not a technician
        #[tokio::test]
        async fn rejects_non_technician() -> Result<(), TestError> {
            let test = setup().await?;
            let manager = test.user().find_user("manager").await?;
            let alice = test.user().find_user("alice").await?;
            let order = test.order().insert_order_for_client(alice.id).await?;

            let service = OrderService::new(&test.db);
            let result = service
                .assign_technician(&current_user(manager.id, Role::Manager), order.id, alice.id)
                .await;

            assert!(matches!(result, Err(Error::BadRequest(_))));

            Ok(())
        }

        /// Expect NotFound when removing an assignment that does not exist
        #[tokio::test]
        async fn unassign_reports_missing_assignment() -> Result<(), TestError> {
            let test = setup().await?;
            let manager = test.user().find_user("manager").await?;
            let tech = test.user().find_user("tech").await?;
            let alice = test.user().find_user("alice").await?;
            let order = test.order().insert_order_for_client(alice.id).await?;
            test.order().assign_technician(order.id, tech.id).await?;
            let caller = current_user(manager.id, Role::Manager);

            let service = OrderService::new(&test.db);
            let order_dto = service
                .unassign_technician(&caller, order.id, tech.id)
                .await
                .unwrap();
            let result = service
                .unassign_technician(&caller, order.id, tech.id)
                .await;

            assert!(order_dto.technician_ids.is_empty());
            assert!(matches!(result, Err(Error::NotFound { .. })));

            Ok(())
        }
    }

    mod delete_order {
        use super::*;

        /// Expect a client to delete their pending order but not one in progress
        #[tokio::test]
        async fn client_deletes_only_pending_orders() -> Result<(), TestError> {
            let test = setup().await?;
            let manager = test.user().find_user("manager").await?;
            let alice = test.user().find_user("alice").await?;
            let pending = test.order().insert_order_for_client(alice.id).await?;
            let started = test.order().insert_order_for_client(alice.id).await?;
            let client = current_user(alice.id, Role::Client);

            let service = OrderService::new(&test.db);
            service
                .update_status(
                    &current_user(manager.id, Role::Manager),
                    started.id,
                    OrderStatus::InProgress,
                )
                .await
                .unwrap();

            assert!(service.delete_order(&client, pending.id).await.is_ok());
            assert!(matches!(
                service.delete_order(&client, started.id).await,
                Err(Error::AuthError(AuthError::Forbidden { .. }))
            ));

            Ok(())
        }

        /// Expect managers to be forbidden and admins allowed
        #[tokio::test]
        async fn only_admin_deletes_any_order() -> Result<(), TestError> {
            let test = setup().await?;
            let admin = test.user().find_user("admin").await?;
            let manager = test.user().find_user("manager").await?;
            let alice = test.user().find_user("alice").await?;
            let order = test.order().insert_order_for_client(alice.id).await?;

            let service = OrderService::new(&test.db);

            assert!(service
                .delete_order(&current_user(manager.id, Role::Manager), order.id)
                .await
                .is_err());
            assert!(service
                .delete_order(&current_user(admin.id, Role::Admin), order.id)
                .await
                .is_ok());
            assert!(matches!(
                service
                    .get_order(&current_user(admin.id, Role::Admin), order.id)
                    .await,
                Err(Error::NotFound { .. })
            ));

            Ok(())
        }
    }
}

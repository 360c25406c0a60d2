//! HTTP routing and OpenAPI documentation.
//!
//! Every API endpoint is registered here together with its utoipa specification. Swagger UI
//! serves the generated document at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and Swagger UI.
///
/// Handlers sharing a path are registered in the same `routes!` call so their method routers
/// are merged.
///
/// # Example
/// ```ignore
/// let router = routes().with_state(AppState { db, dropbox }).layer(session);
/// ```
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Installdesk", description = "Installdesk API"), tags(
        (name = controller::auth::AUTH_TAG, description = "Registration, login and session routes"),
        (name = controller::user::USER_TAG, description = "User accounts and roles"),
        (name = controller::location::LOCATION_TAG, description = "Client installation sites"),
        (name = controller::order::ORDER_TAG, description = "Orders and technician assignment"),
        (name = controller::device::DEVICE_TAG, description = "Installed devices and their photos"),
        (name = controller::maintenance::MAINTENANCE_TAG, description = "Maintenance visits"),
        (name = controller::invoice::INVOICE_TAG, description = "Invoices billed to clients"),
        (name = controller::notification::NOTIFICATION_TAG, description = "In-app notifications"),
        (name = controller::chat::CHAT_TAG, description = "Direct messages between users"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        // Auth
        .routes(routes!(controller::auth::register))
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::get_user))
        // Users
        .routes(routes!(controller::user::get_users))
        .routes(routes!(controller::user::get_technicians))
        .routes(routes!(controller::user::update_profile))
        .routes(routes!(
            controller::user::get_user_by_id,
            controller::user::delete_user
        ))
        .routes(routes!(controller::user::change_role))
        // Locations
        .routes(routes!(
            controller::location::get_locations,
            controller::location::create_location
        ))
        .routes(routes!(
            controller::location::get_location,
            controller::location::update_location,
            controller::location::delete_location
        ))
        // Orders
        .routes(routes!(
            controller::order::get_orders,
            controller::order::create_order
        ))
        .routes(routes!(
            controller::order::get_order,
            controller::order::delete_order
        ))
        .routes(routes!(controller::order::update_order_status))
        .routes(routes!(controller::order::assign_technician))
        .routes(routes!(controller::order::unassign_technician))
        // Devices
        .routes(routes!(
            controller::device::get_devices,
            controller::device::add_device
        ))
        .routes(routes!(
            controller::device::update_device,
            controller::device::delete_device
        ))
        .routes(routes!(controller::device::upload_device_image))
        // Maintenance
        .routes(routes!(
            controller::maintenance::get_logs,
            controller::maintenance::create_log
        ))
        .routes(routes!(
            controller::maintenance::get_log,
            controller::maintenance::delete_log
        ))
        .routes(routes!(controller::maintenance::resolve_log))
        // Invoices
        .routes(routes!(
            controller::invoice::get_invoices,
            controller::invoice::create_invoice
        ))
        .routes(routes!(
            controller::invoice::get_invoice,
            controller::invoice::delete_invoice
        ))
        .routes(routes!(controller::invoice::mark_invoice_paid))
        // Notifications
        .routes(routes!(controller::notification::get_notifications))
        .routes(routes!(controller::notification::count_unread_notifications))
        .routes(routes!(controller::notification::mark_all_notifications_read))
        .routes(routes!(controller::notification::mark_notification_read))
        .routes(routes!(controller::notification::delete_notification))
        // Chat
        .routes(routes!(controller::chat::get_conversations))
        .routes(routes!(controller::chat::count_unread_messages))
        .routes(routes!(
            controller::chat::get_conversation,
            controller::chat::send_message
        ))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}

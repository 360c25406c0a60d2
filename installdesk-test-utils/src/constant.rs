//! Placeholder values shared by tests. None of these are real credentials.

pub static ROLE_ADMIN: &str = "Admin";
pub static ROLE_MANAGER: &str = "Manager";
pub static ROLE_TECHNICIAN: &str = "Technician";
pub static ROLE_CLIENT: &str = "Client";

/// Every role seeded into the test database, in id order
pub static ROLE_NAMES: [&str; 4] = [ROLE_ADMIN, ROLE_MANAGER, ROLE_TECHNICIAN, ROLE_CLIENT];

pub static TEST_DROPBOX_APP_KEY: &str = "dropbox_app_key";
pub static TEST_DROPBOX_APP_SECRET: &str = "dropbox_app_secret";
pub static TEST_DROPBOX_REFRESH_TOKEN: &str = "dropbox_refresh_token";

/// Path of the OAuth token endpoint on the mock server
pub static DROPBOX_TOKEN_PATH: &str = "/oauth2/token";
pub static DROPBOX_UPLOAD_PATH: &str = "/2/files/upload";
pub static DROPBOX_CREATE_SHARED_LINK_PATH: &str = "/2/sharing/create_shared_link_with_settings";
pub static DROPBOX_LIST_SHARED_LINKS_PATH: &str = "/2/sharing/list_shared_links";

/// Password hash stored for fixture users, never verifies against any password
pub static FIXTURE_PASSWORD_HASH: &str = "fixture-password-hash";

pub mod admin_permission_repo;
pub mod admin_user_repo;
pub mod open_entity_repo;

pub use admin_permission_repo::AdminPermissionRepo;
pub use admin_user_repo::AdminUserRepo;
pub use open_entity_repo::OpenEntityRepo;

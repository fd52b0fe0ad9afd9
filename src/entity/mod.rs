pub mod addresses;
pub mod audit_logs;
pub mod carts;
pub mod orders;
pub mod password_resets;
pub mod products;
pub mod users;

pub use addresses::Entity as Addresses;
pub use audit_logs::Entity as AuditLogs;
pub use carts::Entity as Carts;
pub use orders::Entity as Orders;
pub use password_resets::Entity as PasswordResets;
pub use products::Entity as Products;
pub use users::Entity as Users;

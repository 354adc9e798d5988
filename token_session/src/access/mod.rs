mod controller;
mod errors;
mod roles;

pub use controller::AccessController;
pub use errors::AccessError;
pub use roles::{AllowedRoles, ROLE_INDIVIDUALS};

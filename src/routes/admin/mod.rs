pub mod dashboard;
pub mod users;

pub use dashboard::dashboard;
pub use users::{delete_user, get_users, update_user};

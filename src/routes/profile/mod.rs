pub mod get;
pub mod post;

pub use get::get_profile;
pub use post::update_profile;

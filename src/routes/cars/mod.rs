pub mod delete;
pub mod details;
pub mod get;
pub mod post;
pub mod update;

pub use delete::delete_car_listing;
pub use details::car_details;
pub use get::get_cars;
pub use post::post_car;
pub use update::update_car_listing;

pub mod availability;
pub mod booked_dates;
pub mod post;
pub mod quote;

pub use availability::availability;
pub use booked_dates::booked_dates;
pub use post::post_booking;
pub use quote::quote;

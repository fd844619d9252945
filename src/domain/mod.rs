pub mod customer_email;
pub mod phone_number;

pub use customer_email::CustomerEmail;
pub use phone_number::CustomerPhone;

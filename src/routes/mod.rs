pub mod admin;
pub mod authentication;
pub mod booking;
pub mod cars;
pub mod contact;
pub mod health_check;
pub mod home;
pub mod profile;

pub use health_check::health_check;

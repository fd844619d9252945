pub mod booking;
pub mod cars;
pub mod customers;
pub mod dashboard;
pub mod logs;

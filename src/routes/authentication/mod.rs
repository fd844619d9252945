pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod register;

pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use register::register;

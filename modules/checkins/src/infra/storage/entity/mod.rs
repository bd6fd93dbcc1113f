pub mod check_in;
pub mod user;

pub mod db;
pub mod errors;
pub mod password_reset;
pub mod user;
pub mod user_credentials;

pub mod login;
pub mod refresh_token;
pub mod register;

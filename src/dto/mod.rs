pub mod addresses;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod driver;
pub mod orders;
pub mod products;
pub mod profile;

pub mod customer;
pub mod menu;
pub mod platform;

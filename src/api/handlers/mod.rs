pub mod health;
pub mod index;
pub mod message;

pub mod auth;
pub mod cafes;
pub mod health;
pub mod likes;
pub mod pages;
pub mod profile;

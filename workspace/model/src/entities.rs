//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the cafe directory application here:
//! reference cities, cafes, users, and the user-likes-cafe join table.

pub mod cafe;
pub mod city;
pub mod user;
pub mod user_like_cafe;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::cafe::Entity as Cafe;
    pub use super::city::Entity as City;
    pub use super::user::Entity as User;
    pub use super::user_like_cafe::Entity as UserLikeCafe;
}

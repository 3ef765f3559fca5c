pub mod initdb;
pub mod seed;
pub mod serve;

pub use initdb::init_database;
pub use seed::seed_cities;
pub use serve::serve;

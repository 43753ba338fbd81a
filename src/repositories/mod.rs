pub mod car_repository;
pub mod in_memory;

pub use car_repository::{CarRepository, PgCarRepository};
pub use in_memory::InMemoryCarRepository;

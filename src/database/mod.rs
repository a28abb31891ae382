pub mod connection;

pub use connection::{create_lazy_pool, create_pool};

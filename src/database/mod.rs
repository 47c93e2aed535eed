pub mod connection;
pub mod leader_elos;
pub mod matches;
pub mod setup;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};

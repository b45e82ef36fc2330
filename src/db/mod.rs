pub mod connection;
pub mod sent_messages;

pub use connection::{init_db, Database};

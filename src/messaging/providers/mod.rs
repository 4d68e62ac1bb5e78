//! # Work Queue Providers

mod in_memory;
mod pgmq;

pub use self::pgmq::PgmqWorkQueue;
pub use in_memory::InMemoryWorkQueue;

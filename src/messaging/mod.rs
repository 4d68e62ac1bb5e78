//! # Messaging Module
//!
//! Provider-agnostic work queue used by fan-out workers to publish one
//! [`WorkMessage`](crate::models::WorkMessage) per document and by consumers to
//! pull them in batches.
//!
//! ```text
//! WorkQueue (trait)
//!   ├── InMemoryWorkQueue   <- tests and local development
//!   └── PgmqWorkQueue       <- PostgreSQL message queue
//! ```
//!
//! Delivery is at-least-once with no ordering guarantee across messages.

pub mod errors;
pub mod providers;
mod traits;
mod types;

pub use errors::{MessagingError, MessagingResult};
pub use providers::{InMemoryWorkQueue, PgmqWorkQueue};
pub use traits::WorkQueue;
pub use types::{MessageId, QueuedMessage, ReceiptHandle};

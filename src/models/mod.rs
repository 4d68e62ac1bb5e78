//! # Data Model
//!
//! Document identifiers, batches, state records and the work message wire format.

pub mod document;
pub mod state_record;
pub mod work_message;

pub use document::{Batch, DocumentId};
pub use state_record::DocumentStateRecord;
pub use work_message::{DeliveryReceipt, WorkMessage};

/// Contact list processing
///
/// [`ingest`] turns the CSV export into rows; [`group`] partitions them by a
/// field for display. Both are pure and synchronous; callers on an async
/// runtime run [`ingest::ingest`] on the blocking pool.

pub mod group;
pub mod ingest;

pub use group::{group, ContactField, ContactGroup, GroupedContacts};
pub use ingest::{ingest, ContactRow, IngestError, ParseMode};

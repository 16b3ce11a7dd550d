// Resume Document operations: CRUD handlers, the version recorder that
// snapshots prior content on every update, and the export flow.

pub mod handlers;
pub mod versioning;

// Job applications: CRUD, the status persistence call, and list filtering.
// Every write publishes a change event on the real-time feed.

pub mod filters;
pub mod handlers;
pub mod repo;
pub mod validation;

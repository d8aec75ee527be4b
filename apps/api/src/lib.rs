//! CareerTrail job-application tracker API.
//!
//! The status board (`board`) is the core: jobs grouped into four status
//! columns, moved by drag-and-drop with optimistic updates that reconcile
//! against persistence results and the real-time change feed.

pub mod board;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod documents;
pub mod errors;
pub mod jobs;
pub mod llm_client;
pub mod models;
pub mod realtime;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

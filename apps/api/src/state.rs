use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::realtime::feed::ChangeFeed;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Every job mutation is published here for the real-time endpoint.
    pub feed: ChangeFeed,
}

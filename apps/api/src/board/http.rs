use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::controller::{BoardError, JobStatusUpdater};
use crate::models::job::{Job, JobStatus};

#[derive(Debug, Serialize)]
struct StatusBody {
    user_id: Uuid,
    status: JobStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`JobStatusUpdater`] over the service's `PATCH /api/v1/jobs/:id/status`.
#[derive(Clone)]
pub struct HttpJobStatusUpdater {
    client: Client,
    base_url: String,
    user_id: Uuid,
}

impl HttpJobStatusUpdater {
    pub fn new(base_url: impl Into<String>, user_id: Uuid) -> Result<Self, BoardError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id,
        })
    }

    pub fn status_url(&self, job_id: Uuid) -> String {
        format!("{}/api/v1/jobs/{job_id}/status", self.base_url)
    }
}

#[async_trait]
impl JobStatusUpdater for HttpJobStatusUpdater {
    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, BoardError> {
        let response = self
            .client
            .patch(self.status_url(job_id))
            .json(&StatusBody {
                user_id: self.user_id,
                status,
            })
            .send()
            .await?;

        let code = response.status();
        if !code.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(BoardError::Rejected {
                status: code.as_u16(),
                message,
            });
        }

        Ok(response.json::<Job>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_url_strips_trailing_slash() {
        let updater = HttpJobStatusUpdater::new("http://localhost:8080/", Uuid::nil()).unwrap();
        let id = Uuid::nil();
        assert_eq!(
            updater.status_url(id),
            format!("http://localhost:8080/api/v1/jobs/{id}/status")
        );
    }

    #[test]
    fn test_status_body_shape() {
        let body = serde_json::to_value(StatusBody {
            user_id: Uuid::nil(),
            status: JobStatus::Offer,
        })
        .unwrap();
        assert_eq!(body["status"], "offer");
    }
}

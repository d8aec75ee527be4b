use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use careertrail::board::controller::{BoardError, JobStatusUpdater, StatusBoard};
use careertrail::board::store::Notification;
use careertrail::models::job::{Job, JobStatus};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// A job owned by a fixed test user, last touched at the base time.
pub fn make_job(company: &str, status: JobStatus) -> Job {
    Job {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        company: company.to_string(),
        role: "Backend Engineer".to_string(),
        status,
        applied_date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
        link: None,
        notes: None,
        created_at: base_time(),
        updated_at: base_time(),
    }
}

/// The record the backend would return after persisting `status`,
/// stamped `secs` after the base time.
pub fn persisted(job: &Job, status: JobStatus, secs: i64) -> Job {
    Job {
        status,
        updated_at: base_time() + Duration::seconds(secs),
        ..job.clone()
    }
}

/// One persistence call held open until the test answers it.
pub struct HeldCall {
    pub job_id: Uuid,
    pub status: JobStatus,
    reply: oneshot::Sender<Result<Job, BoardError>>,
}

impl HeldCall {
    pub fn succeed(self, record: Job) {
        let _ = self.reply.send(Ok(record));
    }

    pub fn fail(self, message: &str) {
        let _ = self.reply.send(Err(BoardError::Backend(message.to_string())));
    }
}

/// Updater whose calls block until the test resolves them, in any order.
pub struct ScriptedUpdater {
    held: mpsc::UnboundedSender<HeldCall>,
    calls: Mutex<Vec<(Uuid, JobStatus)>>,
}

impl ScriptedUpdater {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<HeldCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let updater = Arc::new(Self {
            held: tx,
            calls: Mutex::new(Vec::new()),
        });
        (updater, rx)
    }

    pub fn calls(&self) -> Vec<(Uuid, JobStatus)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobStatusUpdater for ScriptedUpdater {
    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, BoardError> {
        self.calls.lock().unwrap().push((job_id, status));
        let (reply, answer) = oneshot::channel();
        self.held
            .send(HeldCall {
                job_id,
                status,
                reply,
            })
            .map_err(|_| BoardError::Backend("test harness gone".to_string()))?;
        answer
            .await
            .unwrap_or_else(|_| Err(BoardError::Backend("call abandoned".to_string())))
    }
}

pub struct Harness {
    pub board: StatusBoard,
    pub updater: Arc<ScriptedUpdater>,
    pub held: mpsc::UnboundedReceiver<HeldCall>,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

pub fn harness(jobs: Vec<Job>) -> Harness {
    let (updater, held) = ScriptedUpdater::new();
    let (board, notifications) = StatusBoard::new(jobs, updater.clone());
    Harness {
        board,
        updater,
        held,
        notifications,
    }
}

impl Harness {
    pub async fn next_call(&mut self) -> HeldCall {
        self.held.recv().await.expect("updater was never called")
    }

    /// Notifications received so far, without waiting.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            out.push(n);
        }
        out
    }

    pub fn status_of(&self, job_id: Uuid) -> JobStatus {
        self.board.job(job_id).expect("job on board").status
    }
}

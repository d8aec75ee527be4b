use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    #[default]
    Applications,
    Metrics,
    Documents,
    Contacts,
    Interviews,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Board,
    List,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PreferencesRow {
    pub user_id: Uuid,
    pub active_tab: DashboardTab,
    pub view_mode: ViewMode,
    pub updated_at: DateTime<Utc>,
}

//! Persisted dashboard preferences. Clients read them once at startup and
//! write them back whenever the user switches tab or view.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
pub use crate::models::preferences::{DashboardTab, PreferencesRow, ViewMode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub active_tab: DashboardTab,
    pub view_mode: ViewMode,
}

impl From<&PreferencesRow> for Preferences {
    fn from(row: &PreferencesRow) -> Self {
        Self {
            active_tab: row.active_tab,
            view_mode: row.view_mode,
        }
    }
}

pub async fn load_preferences(pool: &PgPool, user_id: Uuid) -> Result<Preferences, AppError> {
    let row = sqlx::query_as::<_, PreferencesRow>(
        "SELECT * FROM user_preferences WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(Preferences::from).unwrap_or_default())
}

pub async fn save_preferences(
    pool: &PgPool,
    user_id: Uuid,
    prefs: Preferences,
) -> Result<Preferences, AppError> {
    let row = sqlx::query_as::<_, PreferencesRow>(
        r#"
        INSERT INTO user_preferences (user_id, active_tab, view_mode)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE
        SET active_tab = EXCLUDED.active_tab,
            view_mode = EXCLUDED.view_mode,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(prefs.active_tab)
    .bind(prefs.view_mode)
    .fetch_one(pool)
    .await?;

    debug!(
        "Saved preferences for user {user_id}: {:?}/{:?}",
        row.active_tab, row.view_mode
    );

    Ok(Preferences::from(&row))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.active_tab, DashboardTab::Applications);
        assert_eq!(prefs.view_mode, ViewMode::Board);
    }

    #[test]
    fn test_from_row() {
        let row = PreferencesRow {
            user_id: Uuid::nil(),
            active_tab: DashboardTab::Metrics,
            view_mode: ViewMode::List,
            updated_at: Utc::now(),
        };
        let prefs = Preferences::from(&row);
        assert_eq!(prefs.active_tab, DashboardTab::Metrics);
        assert_eq!(prefs.view_mode, ViewMode::List);
    }

    #[test]
    fn test_unknown_values_rejected() {
        let bad_tab = json!({"active_tab": "analytics", "view_mode": "list"});
        assert!(serde_json::from_value::<Preferences>(bad_tab).is_err());
        let bad_view = json!({"active_tab": "metrics", "view_mode": "grid"});
        assert!(serde_json::from_value::<Preferences>(bad_view).is_err());
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(Preferences {
            active_tab: DashboardTab::Interviews,
            view_mode: ViewMode::List,
        })
        .unwrap();
        assert_eq!(json["active_tab"], "interviews");
        assert_eq!(json["view_mode"], "list");
    }
}

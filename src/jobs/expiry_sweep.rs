//! Housekeeping expiry sweep.
//!
//! Every interval, overdue tasks that are neither `Complete` nor
//! `Cancelled` are demoted to `Incomplete`. A task someone set by hand
//! within the grace window is skipped until the window has passed.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::db::TaskRepository;
use crate::error::HotelResult;

/// Periodic task demotion worker.
pub struct ExpirySweeper {
    tasks: TaskRepository,
    interval: Duration,
    grace: chrono::Duration,
    shutdown: CancellationToken,
}

impl ExpirySweeper {
    /// Creates a sweeper running every `interval`, sparing manual
    /// overrides younger than `grace`.
    pub fn new(tasks: TaskRepository, interval: Duration, grace: chrono::Duration, shutdown: CancellationToken) -> Self {
        Self {
            tasks,
            interval,
            grace,
            shutdown,
        }
    }

    /// Runs until the shutdown token is cancelled. A failed sweep is
    /// logged and retried on the next tick.
    pub async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            grace_hours = self.grace.num_hours(),
            "Housekeeping expiry sweep started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_once(Utc::now()).await {
                        error!(error = %e, "Housekeeping expiry sweep failed");
                    }
                }
                _ = self.shutdown.cancelled() => {
                    info!("Housekeeping expiry sweep received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Demotes every task overdue at `now`; returns how many changed.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> HotelResult<u64> {
        let demoted = self.tasks.mark_expired(now, self.grace).await?;
        if demoted > 0 {
            info!(demoted, "Overdue housekeeping tasks marked Incomplete");
        } else {
            debug!("No overdue housekeeping tasks");
        }
        Ok(demoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::db::fixtures::{seed_room, seed_task, seed_user};
    use crate::models::{Role, TaskStatus};

    async fn setup() -> (Database, ExpirySweeper, i64, i64) {
        let db = Database::in_memory().await.unwrap();
        let staff = seed_user(&db, "cleaner", Role::Staff).await;
        let room = seed_room(&db, "101").await;
        let sweeper = ExpirySweeper::new(
            db.tasks(),
            Duration::from_secs(60),
            chrono::Duration::hours(24),
            CancellationToken::new(),
        );
        (db, sweeper, room.id, staff.id)
    }

    #[tokio::test]
    async fn test_overdue_pending_task_becomes_incomplete() {
        let (db, sweeper, room_id, staff_id) = setup().await;
        let now = Utc::now();
        let task = seed_task(&db, room_id, staff_id, now - chrono::Duration::hours(5), 2).await;

        assert_eq!(sweeper.sweep_once(now).await.unwrap(), 1);

        let task = db.tasks().find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(task.task_status, TaskStatus::Incomplete);
        assert!(!task.manual_status_override);
    }

    #[tokio::test]
    async fn test_recent_manual_override_is_spared() {
        let (db, sweeper, room_id, staff_id) = setup().await;
        let now = Utc::now();
        let task = seed_task(&db, room_id, staff_id, now - chrono::Duration::hours(5), 2).await;
        db.tasks()
            .set_status_manual(task.id, TaskStatus::InProgress, now - chrono::Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(sweeper.sweep_once(now).await.unwrap(), 0);
        let task = db.tasks().find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(task.task_status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_stale_manual_override_is_demoted() {
        let (db, sweeper, room_id, staff_id) = setup().await;
        let now = Utc::now();
        let task = seed_task(&db, room_id, staff_id, now - chrono::Duration::hours(30), 2).await;
        db.tasks()
            .set_status_manual(task.id, TaskStatus::Pending, now - chrono::Duration::hours(25))
            .await
            .unwrap();

        assert_eq!(sweeper.sweep_once(now).await.unwrap(), 1);
        let task = db.tasks().find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(task.task_status, TaskStatus::Incomplete);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (_db, sweeper, _room_id, _staff_id) = setup().await;
        let token = sweeper.shutdown.clone();
        let handle = tokio::spawn(sweeper.run());

        token.cancel();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}

//! Bulk sync bookkeeping as a plain state machine.
//!
//! Each task moves `Pending -> Syncing -> Success | Error`. A failed task
//! with retries left goes back to the tail of the queue as `Pending`;
//! otherwise it lands in `failed`. Every `start` bumps the epoch, and
//! results carrying an older epoch (or arriving after `stop`) are discarded.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{SyncResult, SyncStatus, SyncTask};
use crate::sync::SyncError;

/// Default retry budget for each city
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// The slug the driver should sync next, tagged with the run it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncDispatch {
    pub epoch: u64,
    pub city_slug: String,
}

/// What happened to a settled result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Completed,
    Requeued,
    Failed,
    /// The run was stopped or replaced, the result was ignored
    Discarded,
}

#[derive(Debug, Clone, Default)]
pub struct SyncQueueState {
    queue: VecDeque<SyncTask>,
    current: Option<SyncTask>,
    completed: Vec<SyncTask>,
    failed: Vec<SyncTask>,
    in_progress: bool,
    total_cities: usize,
    epoch: u64,
    run_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl SyncQueueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new run over `city_slugs`, returning its epoch.
    ///
    /// Rejected while another run is in progress so its progress is not lost.
    pub fn start(&mut self, city_slugs: Vec<String>, max_retries: u32) -> Result<u64, SyncError> {
        if self.in_progress {
            return Err(SyncError::AlreadyRunning);
        }
        if city_slugs.is_empty() {
            return Err(SyncError::NoTargets);
        }

        self.epoch += 1;
        self.total_cities = city_slugs.len();
        self.queue = city_slugs
            .into_iter()
            .map(|slug| SyncTask::pending(slug, max_retries))
            .collect();
        self.current = None;
        self.completed.clear();
        self.failed.clear();
        self.in_progress = true;
        self.run_id = Some(Uuid::new_v4());
        self.started_at = Some(Utc::now());
        self.finished_at = None;

        Ok(self.epoch)
    }

    /// Move the next queued task to `Syncing` and hand it to the driver.
    ///
    /// Returns `None` when the run is stale, stopped, already has a task in
    /// flight, or has drained (which also ends the run).
    pub fn advance(&mut self, epoch: u64) -> Option<SyncDispatch> {
        if epoch != self.epoch || !self.in_progress || self.current.is_some() {
            return None;
        }

        let Some(mut task) = self.queue.pop_front() else {
            self.in_progress = false;
            self.finished_at = Some(Utc::now());
            return None;
        };

        task.status = SyncStatus::Syncing;
        task.started_at = Some(Utc::now());
        let dispatch = SyncDispatch {
            epoch,
            city_slug: task.city_slug.clone(),
        };
        self.current = Some(task);

        Some(dispatch)
    }

    /// Apply the outcome of the in-flight sync call
    pub fn settle(&mut self, epoch: u64, outcome: Result<SyncResult, String>) -> Settled {
        if epoch != self.epoch || !self.in_progress {
            return Settled::Discarded;
        }
        let Some(mut task) = self.current.take() else {
            return Settled::Discarded;
        };

        task.finished_at = Some(Utc::now());

        match outcome {
            Ok(result) => {
                if !result.city_name.is_empty() {
                    task.city_name = result.city_name.clone();
                }
                task.status = SyncStatus::Success;
                task.error = None;
                task.result = Some(result);
                self.completed.push(task);
                Settled::Completed
            }
            Err(message) => {
                task.error = Some(message);
                if task.can_retry() {
                    task.retry_count += 1;
                    task.status = SyncStatus::Pending;
                    self.queue.push_back(task);
                    Settled::Requeued
                } else {
                    task.status = SyncStatus::Error;
                    self.failed.push(task);
                    Settled::Failed
                }
            }
        }
    }

    /// Halt the run. Returns whether a run was active.
    ///
    /// Completed and failed lists are left untouched, and so is the queue
    /// except for one addition: the abandoned in-flight task is pushed back
    /// onto its front as `Pending`, so the unfinished city stays visible and
    /// is the first one a fresh `start` over `queued_slugs()` would retry.
    /// The in-flight call's result is dropped when it arrives.
    pub fn stop(&mut self) -> bool {
        if !self.in_progress {
            return false;
        }

        self.in_progress = false;
        self.finished_at = Some(Utc::now());
        if let Some(mut task) = self.current.take() {
            task.status = SyncStatus::Pending;
            task.started_at = None;
            self.queue.push_front(task);
        }

        true
    }

    /// Forget the results of a finished or stopped run
    pub fn clear_results(&mut self) -> Result<(), SyncError> {
        if self.in_progress {
            return Err(SyncError::Busy);
        }

        self.queue.clear();
        self.current = None;
        self.completed.clear();
        self.failed.clear();
        self.total_cities = 0;
        self.run_id = None;
        self.started_at = None;
        self.finished_at = None;
        Ok(())
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn current(&self) -> Option<&SyncTask> {
        self.current.as_ref()
    }

    pub fn queued_slugs(&self) -> Vec<String> {
        self.queue.iter().map(|t| t.city_slug.clone()).collect()
    }

    pub fn completed(&self) -> &[SyncTask] {
        &self.completed
    }

    pub fn failed(&self) -> &[SyncTask] {
        &self.failed
    }

    pub fn total_cities(&self) -> usize {
        self.total_cities
    }

    pub fn processed_cities(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    /// Whole-number percentage of cities that reached a terminal state
    pub fn overall_progress(&self) -> u32 {
        if self.total_cities == 0 {
            return 0;
        }
        (self.processed_cities() as f64 / self.total_cities as f64 * 100.0).round() as u32
    }

    pub fn snapshot(&self) -> SyncProgress {
        SyncProgress {
            in_progress: self.in_progress,
            run_id: self.run_id,
            current: self.current.clone(),
            queue: self.queued_slugs(),
            completed: self.completed.clone(),
            failed: self.failed.clone(),
            total_cities: self.total_cities,
            processed_cities: self.processed_cities(),
            overall_progress: self.overall_progress(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Observable view of a sync run for the admin UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncProgress {
    #[serde(rename = "inProgress")]
    pub in_progress: bool,
    #[serde(rename = "runId")]
    pub run_id: Option<Uuid>,
    pub current: Option<SyncTask>,
    pub queue: Vec<String>,
    pub completed: Vec<SyncTask>,
    pub failed: Vec<SyncTask>,
    #[serde(rename = "totalCities")]
    pub total_cities: usize,
    #[serde(rename = "processedCities")]
    pub processed_cities: usize,
    #[serde(rename = "overallProgress")]
    pub overall_progress: u32,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncProgress {
    pub fn summary(&self) -> String {
        format!(
            "{} succeeded, {} failed",
            self.completed.len(),
            self.failed.len()
        )
    }
}

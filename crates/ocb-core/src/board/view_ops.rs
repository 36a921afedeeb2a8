//! Read-only views: activity feed, archive page, and flow metrics.

use jiff::Timestamp;

use super::Board;
use crate::{
    error::Result,
    models::{ActivityFilter, ActivityWithTask, ArchivePage, ArchiveQuery, BoardMetrics},
    params::MetricsQuery,
};

impl Board {
    /// Returns the activity feed, newest first.
    pub async fn list_activities(&self, filter: ActivityFilter) -> Result<Vec<ActivityWithTask>> {
        self.with_db(move |db| db.list_activities(&filter)).await
    }

    /// Returns the archive view: archived tasks plus archive totals.
    pub async fn archive_view(&self, query: ArchiveQuery) -> Result<ArchivePage> {
        self.with_db(move |db| db.list_archive(&query)).await
    }

    /// Computes board flow metrics over a trailing completion window.
    pub async fn metrics(&self, query: MetricsQuery) -> Result<BoardMetrics> {
        self.with_db(move |db| db.board_metrics(&query, Timestamp::now()))
            .await
    }
}

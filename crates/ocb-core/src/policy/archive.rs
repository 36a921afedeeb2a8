//! Done-column overflow selection.

use crate::models::Task;

/// How many completed tasks stay visible on the active board.
pub const VISIBLE_DONE_LIMIT: usize = 5;

/// Selects the tasks to archive from the set of visible completed tasks.
///
/// `completed` must be ordered oldest completion first; everything beyond
/// the [`VISIBLE_DONE_LIMIT`] most recent completions is returned. The
/// caller persists the archival for each returned task and fans out one
/// update event per task.
pub fn overflow(completed: &[Task]) -> &[Task] {
    if completed.len() > VISIBLE_DONE_LIMIT {
        &completed[..completed.len() - VISIBLE_DONE_LIMIT]
    } else {
        &[]
    }
}

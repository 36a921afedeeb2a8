//! Terminal formatting for task rows and details.

use ocb_core::{Task, TaskStatus};

/// ANSI painter with a plain-text fallback for `--no-color`.
pub struct Paint {
    enabled: bool,
}

impl Paint {
    /// Creates a painter; disabled painters pass text through unchanged.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn wrap(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        self.wrap("2", text)
    }

    pub fn red(&self, text: &str) -> String {
        self.wrap("31", text)
    }

    pub fn bold_red(&self, text: &str) -> String {
        self.wrap("1;31", text)
    }

    pub fn green(&self, text: &str) -> String {
        self.wrap("32", text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.wrap("33", text)
    }

    pub fn blue(&self, text: &str) -> String {
        self.wrap("34", text)
    }

    pub fn magenta(&self, text: &str) -> String {
        self.wrap("35", text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.wrap("36", text)
    }
}

fn status_label(task: &Task, paint: &Paint) -> String {
    let label = task.status.label();
    match task.status {
        TaskStatus::Todo => paint.yellow(label),
        TaskStatus::InProgress => paint.blue(label),
        TaskStatus::NeedsReview => paint.magenta(label),
        TaskStatus::Done => paint.green(label),
    }
}

fn priority_marker(task: &Task, paint: &Paint) -> String {
    let marker = task.priority.marker();
    match task.priority {
        ocb_core::Priority::Critical => paint.bold_red(marker),
        ocb_core::Priority::High => paint.red(marker),
        ocb_core::Priority::Medium => paint.yellow(marker),
        ocb_core::Priority::Low => paint.dim(marker),
    }
}

/// One-line task row: `OCB-7 IN PROGRESS ⚡ !! Fix the flaky sync`.
pub fn task_line(task: &Task, paint: &Paint) -> String {
    let id = paint.dim(&format!("OCB-{}", task.task_number));
    let status = status_label(task, paint);
    let active = if task.is_active {
        paint.cyan(" \u{26a1}")
    } else {
        String::new()
    };
    let marker = priority_marker(task, paint);

    format!("{id} {status}{active} {marker} {}", task.title)
}

/// Multi-line task view: the row plus description, tags, block reason and
/// comments.
pub fn task_details(task: &Task, paint: &Paint) -> String {
    let mut out = task_line(task, paint);

    if let Some(description) = &task.description {
        if !description.is_empty() {
            let indented: Vec<String> = description
                .lines()
                .map(|line| format!("    {line}"))
                .collect();
            out.push('\n');
            out.push_str(&paint.dim(&indented.join("\n")));
        }
    }

    if !task.tags.is_empty() {
        out.push('\n');
        out.push_str(&format!("{} {}", paint.dim("Tags:"), task.tags.join(", ")));
    }

    if let Some(reason) = &task.blocked_reason {
        out.push('\n');
        out.push_str(&format!("{} {reason}", paint.red("Blocked:")));
    }

    if !task.comments.is_empty() {
        out.push('\n');
        out.push('\n');
        out.push_str(&paint.dim("Comments:"));
        for comment in &task.comments {
            out.push('\n');
            out.push_str(&format!(
                "  {} {}",
                paint.dim(&comment.created_at.to_string()),
                comment.content
            ));
        }
    }

    out
}

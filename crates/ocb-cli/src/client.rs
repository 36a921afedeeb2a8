//! Thin REST client for the board API.

use anyhow::{bail, Context, Result};
use reqwest::Response;

use ocb_core::{
    params::{CreateTask, NewComment, UpdateTask},
    Comment, Task,
};

/// API base URL used when neither `--api-url` nor `OCB_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Parses a task number from `OCB-<n>` or a bare `<n>`.
pub fn parse_task_id(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let digits = trimmed
        .get(..4)
        .filter(|prefix| prefix.eq_ignore_ascii_case("ocb-"))
        .map_or(trimmed, |_| &trimmed[4..]);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        bail!("Invalid task ID: {input}");
    }
    digits
        .parse::<u64>()
        .with_context(|| format!("Invalid task ID: {input}"))
}

/// HTTP client bound to one board server.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client against the given API base URL.
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("API error {status}: {text}");
        }
        Ok(response)
    }

    /// Fetches the task list; `include_archived` adds archived tasks.
    pub async fn list_tasks(&self, include_archived: bool) -> Result<Vec<Task>> {
        let mut request = self.http.get(self.url("/tasks"));
        if include_archived {
            request = request.query(&[("includeArchived", "true")]);
        }
        let response = request
            .send()
            .await
            .context("Failed to reach the board API")?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Resolves a board number (`OCB-<n>`) to its task.
    pub async fn find_task(&self, number: u64) -> Result<Task> {
        let tasks = self.list_tasks(true).await?;
        tasks
            .into_iter()
            .find(|t| t.task_number == number)
            .with_context(|| format!("Task OCB-{number} not found"))
    }

    /// Creates a task.
    pub async fn create_task(&self, params: &CreateTask) -> Result<Task> {
        let response = self
            .http
            .post(self.url("/tasks"))
            .json(params)
            .send()
            .await
            .context("Failed to reach the board API")?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Applies a partial update to a task by its internal ID.
    pub async fn update_task(&self, id: u64, params: &UpdateTask) -> Result<Task> {
        let response = self
            .http
            .patch(self.url(&format!("/tasks/{id}")))
            .json(params)
            .send()
            .await
            .context("Failed to reach the board API")?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Adds a comment to a task by its internal ID.
    pub async fn add_comment(&self, id: u64, content: &str) -> Result<Comment> {
        let response = self
            .http
            .post(self.url(&format!("/tasks/{id}/comments")))
            .json(&NewComment {
                content: content.to_string(),
            })
            .send()
            .await
            .context("Failed to reach the board API")?;
        Ok(Self::check(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse_task_id("42").unwrap(), 42);
        assert_eq!(parse_task_id(" 7 ").unwrap(), 7);
    }

    #[test]
    fn test_parse_prefixed_number() {
        assert_eq!(parse_task_id("OCB-42").unwrap(), 42);
        assert_eq!(parse_task_id("ocb-3").unwrap(), 3);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_task_id("OCB-x").is_err());
        assert!(parse_task_id("OCB-").is_err());
        assert!(parse_task_id("forty-two").is_err());
        assert!(parse_task_id("").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/api/".to_string());
        assert_eq!(client.url("/tasks"), "http://localhost:3000/api/tasks");
    }
}

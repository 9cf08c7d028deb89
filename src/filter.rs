// Status filtering for task listings

use crate::models::Task;

/// Filter for listing tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks whose status equals the given tag exactly
    Status(String),
}

impl Filter {
    /// Build a filter from an optional status argument; `None` or empty means no filter
    pub fn from_status(status: Option<String>) -> Self {
        match status {
            Some(s) if !s.is_empty() => Filter::Status(s),
            _ => Filter::All,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Status(status) => task.status == *status,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Status(s) => write!(f, "status = {}", s),
        }
    }
}

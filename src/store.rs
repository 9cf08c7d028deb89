// Task store: in-memory collection mirrored to a JSON file

use crate::filter::Filter;
use crate::lock::StoreLock;
use crate::models::{STATUS_TODO, Task, now};
use crate::persist;
use eyre::{Result, eyre};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default data file name, resolved against the current directory
pub const DEFAULT_FILE: &str = "tasks.json";

/// Ordered task collection backed by a single JSON file
///
/// The whole collection is loaded on `open` and rewritten after every
/// successful mutation. The store holds an exclusive lock on the data
/// file for its whole lifetime.
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
    _lock: StoreLock,
}

impl TaskStore {
    /// Open the store at `path`, loading any existing tasks
    ///
    /// A missing file starts an empty store. A file that exists but cannot
    /// be read or parsed is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock = StoreLock::acquire(&path)?;

        let tasks: Vec<Task> = persist::read_collection(&path)?;
        let next_id = Self::compute_next_id(&path, &tasks)?;
        debug!(file = ?path, count = tasks.len(), next_id, "Opened task store");

        Ok(Self {
            path,
            tasks,
            next_id,
            _lock: lock,
        })
    }

    /// Get the path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Id the next `add` will assign
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    // Derived from the surviving maximum, so deleting the newest task frees its id again
    fn compute_next_id(path: &Path, tasks: &[Task]) -> Result<u64> {
        tasks
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| eyre!("Task id space exhausted in {}", path.display()))
    }

    /// Write the whole collection to disk
    pub fn save(&self) -> Result<()> {
        persist::write_collection(&self.path, &self.tasks)
    }

    /// Write `tasks` and only then make it the in-memory collection
    fn commit(&mut self, tasks: Vec<Task>) -> Result<()> {
        let next_id = Self::compute_next_id(&self.path, &tasks)?;
        persist::write_collection(&self.path, &tasks)?;

        self.tasks = tasks;
        self.next_id = next_id;
        Ok(())
    }

    // ========================================================================
    // Task operations
    // ========================================================================

    /// Add a task and return its id; `None` or empty status means `todo`
    pub fn add(&mut self, description: impl Into<String>, status: Option<&str>) -> Result<u64> {
        let status = status.filter(|s| !s.is_empty()).unwrap_or(STATUS_TODO);
        let id = self.next_id;

        let mut tasks = self.tasks.clone();
        tasks.push(Task::new(id, description, status, now()));
        self.commit(tasks)?;

        info!(id, status, "Added task");
        Ok(id)
    }

    /// Tasks matching `filter`, in insertion order
    pub fn list(&self, filter: &Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Get a task by id
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace description and/or status
    ///
    /// `None` or an empty string leaves that field unchanged. Returns the
    /// updated task, or `None` if no task has this id (nothing is written).
    pub fn update(&mut self, id: u64, description: Option<&str>, status: Option<&str>) -> Result<Option<Task>> {
        let Some(pos) = self.position(id) else {
            warn!(id, "update: task not found");
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        let task = &mut tasks[pos];
        if let Some(d) = description.filter(|d| !d.is_empty()) {
            task.description = d.to_string();
        }
        if let Some(s) = status.filter(|s| !s.is_empty()) {
            task.status = s.to_string();
        }
        task.touch(now());

        let updated = task.clone();
        self.commit(tasks)?;

        info!(id, status = %updated.status, "Updated task");
        Ok(Some(updated))
    }

    /// Set the status of a task without touching its description
    pub fn mark(&mut self, id: u64, status: &str) -> Result<Option<Task>> {
        let Some(pos) = self.position(id) else {
            warn!(id, "mark: task not found");
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        let task = &mut tasks[pos];
        task.status = status.to_string();
        task.touch(now());

        let marked = task.clone();
        self.commit(tasks)?;

        info!(id, status, "Marked task");
        Ok(Some(marked))
    }

    /// Remove a task, returning it, or `None` if no task has this id
    pub fn delete(&mut self, id: u64) -> Result<Option<Task>> {
        let Some(pos) = self.position(id) else {
            warn!(id, "delete: task not found");
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        let removed = tasks.remove(pos);
        self.commit(tasks)?;

        info!(id, "Deleted task");
        Ok(Some(removed))
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }
}

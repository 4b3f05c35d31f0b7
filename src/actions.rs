//! Mutations shared by the terminal view and the CLI.
//!
//! Each one is a single storage call; callers recompute their view from
//! storage afterwards.

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::task::{NewTask, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub changed: bool,
    pub message: String,
    pub task_id: Option<i64>,
}

/// Validate form input and insert it.
pub fn create_task(storage: &Storage, input: NewTask) -> Result<ActionOutcome> {
    let input = input.normalized();
    input.validate()?;
    let id = storage.insert(&input)?;
    Ok(ActionOutcome {
        changed: true,
        message: format!("added {}", input.item),
        task_id: Some(id),
    })
}

/// Set an explicit status. Unknown ids are a no-op.
pub fn toggle_status(storage: &Storage, task_id: i64, status: TaskStatus) -> Result<ActionOutcome> {
    let changed = storage.update_status(task_id, status)?;
    let message = if changed {
        format!("#{task_id} marked {status}")
    } else {
        format!("#{task_id} unchanged")
    };
    Ok(ActionOutcome {
        changed,
        message,
        task_id: Some(task_id),
    })
}

/// Flip the current status of an existing item.
pub fn flip_status(storage: &Storage, task_id: i64) -> Result<ActionOutcome> {
    let task = storage
        .get(task_id)?
        .ok_or(Error::TaskNotFound(task_id))?;
    toggle_status(storage, task_id, task.status.toggled())
}

/// Delete permanently. Unknown ids are a no-op.
pub fn delete_task(storage: &Storage, task_id: i64) -> Result<ActionOutcome> {
    let changed = storage.delete(task_id)?;
    let message = if changed {
        format!("deleted #{task_id}")
    } else {
        format!("#{task_id} unchanged")
    };
    Ok(ActionOutcome {
        changed,
        message,
        task_id: Some(task_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{CategoryFilter, TaskFilter};

    fn milk() -> NewTask {
        NewTask::new("Milk")
            .with_created_by("sam")
            .with_category("Dairy")
    }

    fn status_of(storage: &Storage, id: i64) -> TaskStatus {
        storage.get(id).expect("get").expect("present").status
    }

    #[test]
    fn create_rejects_invalid_input_without_inserting() {
        let storage = Storage::open_in_memory().expect("open");
        let err = create_task(&storage, NewTask::new("   ")).expect_err("should reject");
        assert!(matches!(err, Error::Validation { field: "item", .. }));

        let err = create_task(&storage, NewTask::new("Milk").with_created_by("sam"))
            .expect_err("no category");
        assert!(matches!(err, Error::Validation { field: "category", .. }));

        assert!(storage.query(&TaskFilter::default()).expect("query").is_empty());
    }

    #[test]
    fn created_tasks_start_planned() {
        let storage = Storage::open_in_memory().expect("open");
        let outcome = create_task(&storage, milk()).expect("create");
        assert!(outcome.changed);
        let id = outcome.task_id.expect("id");
        assert_eq!(status_of(&storage, id), TaskStatus::Planned);
    }

    #[test]
    fn flipping_parity_determines_status() {
        let storage = Storage::open_in_memory().expect("open");
        let id = create_task(&storage, milk()).expect("create").task_id.expect("id");

        for round in 1..=5 {
            flip_status(&storage, id).expect("flip");
            let expected = if round % 2 == 1 {
                TaskStatus::Purchased
            } else {
                TaskStatus::Planned
            };
            assert_eq!(status_of(&storage, id), expected, "after {round} flips");
        }
    }

    #[test]
    fn flip_unknown_id_is_not_found() {
        let storage = Storage::open_in_memory().expect("open");
        let err = flip_status(&storage, 42).expect_err("missing");
        assert!(matches!(err, Error::TaskNotFound(42)));
    }

    #[test]
    fn toggle_and_delete_on_missing_ids_are_noops() {
        let storage = Storage::open_in_memory().expect("open");
        let outcome = toggle_status(&storage, 9, TaskStatus::Purchased).expect("toggle");
        assert!(!outcome.changed);
        let outcome = delete_task(&storage, 9).expect("delete");
        assert!(!outcome.changed);
    }

    #[test]
    fn milk_scenario() {
        let storage = Storage::open_in_memory().expect("open");
        let id = create_task(&storage, milk()).expect("create").task_id.expect("id");

        let all = TaskFilter::new("", CategoryFilter::All);
        let tasks = storage.query(&all).expect("query");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].item, "Milk");
        assert_eq!(tasks[0].status, TaskStatus::Planned);

        toggle_status(&storage, id, TaskStatus::Purchased).expect("toggle");
        assert_eq!(status_of(&storage, id), TaskStatus::Purchased);

        let outcome = delete_task(&storage, id).expect("delete");
        assert!(outcome.changed);
        assert!(storage.query(&all).expect("query").is_empty());
    }
}

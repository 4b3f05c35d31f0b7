//! groceries item command implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::actions::{self, ActionOutcome};
use crate::actor;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;
use crate::task::{category_options, CategoryFilter, NewTask, Task, TaskFilter, TaskStatus};

pub struct GlobalOptions {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct AddOptions {
    pub item: String,
    pub description: Option<String>,
    pub status: String,
    pub created_by: Option<String>,
    pub category: Option<String>,
    pub global: GlobalOptions,
}

pub struct ListOptions {
    pub search: String,
    pub category: String,
    pub global: GlobalOptions,
}

struct Context {
    storage: Storage,
    config: Config,
}

#[derive(Serialize)]
struct TaskCreatedOutput {
    id: i64,
    item: String,
    status: TaskStatus,
    category: Option<String>,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    search: String,
    category: String,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct CategoriesOutput {
    categories: Vec<String>,
}

#[derive(Serialize)]
struct TaskChangeOutput {
    id: i64,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
}

fn load_context(global: &GlobalOptions) -> Result<Context> {
    let config = match global.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let path = config.database_path(global.db.as_deref());
    let storage = Storage::open(&path)?.with_case_sensitive_search(config.search.case_sensitive);
    Ok(Context { storage, config })
}

pub fn run_ui(global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let author = actor::resolve_author(&ctx.config, None);
    crate::ui::run(ctx.storage, author)
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let status = parse_status(&options.status)?;
    let created_by = actor::resolve_author(&ctx.config, options.created_by.as_deref());

    let mut input = NewTask::new(options.item).with_status(status);
    input.description = options.description;
    input.created_by = created_by;
    input.category = options.category;

    let outcome = actions::create_task(&ctx.storage, input)?;
    let id = outcome_id(&outcome)?;
    let task = ctx.storage.get(id)?.ok_or(Error::TaskNotFound(id))?;
    ctx.storage.close()?;

    let output = TaskCreatedOutput {
        id,
        item: task.item.clone(),
        status: task.status,
        category: task.category.clone(),
    };

    let mut human = HumanOutput::new("Item added");
    human.push_summary("ID", id.to_string());
    human.push_summary("Item", task.item);
    human.push_summary("Status", task.status.as_str());
    if let Some(category) = task.category {
        human.push_summary("Category", category);
    }

    emit_success(options.global.output(), "add", &output, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let filter = TaskFilter::new(
        options.search.clone(),
        CategoryFilter::from_selection(&options.category),
    );
    let tasks = ctx.storage.query(&filter)?;
    ctx.storage.close()?;

    let mut human = HumanOutput::new("Groceries");
    human.push_summary("Total", tasks.len().to_string());
    if !filter.search.is_empty() {
        human.push_summary("Search", filter.search.clone());
    }
    human.push_summary("Category", filter.category.label());
    if tasks.is_empty() {
        human.push_detail(if filter.is_empty() {
            "No items"
        } else {
            "No matches"
        });
    } else {
        for line in format_task_table(&tasks) {
            human.push_detail(line);
        }
    }

    let output = TaskListOutput {
        total: tasks.len(),
        search: filter.search.clone(),
        category: filter.category.label().to_string(),
        tasks,
    };

    emit_success(options.global.output(), "list", &output, Some(&human))
}

pub fn run_categories(global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let categories = category_options(ctx.storage.distinct_categories()?);
    ctx.storage.close()?;

    if !global.json && !global.quiet {
        for category in &categories {
            println!("{category}");
        }
        return Ok(());
    }

    emit_success(
        global.output(),
        "categories",
        &CategoriesOutput { categories },
        None,
    )
}

pub fn run_set_status(id: i64, checked: bool, global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let status = TaskStatus::from_checked(checked);
    let outcome = actions::toggle_status(&ctx.storage, id, status)?;
    ctx.storage.close()?;

    let command = if checked { "check" } else { "uncheck" };
    emit_change(&global, command, id, &outcome, Some(status))
}

pub fn run_toggle(id: i64, global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let outcome = actions::flip_status(&ctx.storage, id)?;
    let status = ctx.storage.get(id)?.map(|task| task.status);
    ctx.storage.close()?;

    emit_change(&global, "toggle", id, &outcome, status)
}

pub fn run_delete(id: i64, global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let outcome = actions::delete_task(&ctx.storage, id)?;
    ctx.storage.close()?;

    emit_change(&global, "delete", id, &outcome, None)
}

fn emit_change(
    global: &GlobalOptions,
    command: &str,
    id: i64,
    outcome: &ActionOutcome,
    status: Option<TaskStatus>,
) -> Result<()> {
    let output = TaskChangeOutput {
        id,
        changed: outcome.changed,
        status: if outcome.changed { status } else { None },
    };

    let header = if outcome.changed {
        "Item updated"
    } else {
        "Nothing to do"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("Result", outcome.message.clone());
    if !outcome.changed {
        human.push_warning(format!("no item with id {id}"));
    }

    emit_success(global.output(), command, &output, Some(&human))
}

fn parse_status(value: &str) -> Result<TaskStatus> {
    value.parse::<TaskStatus>().map_err(|_| {
        Error::InvalidArgument(format!(
            "status must be planned or purchased (got '{value}')"
        ))
    })
}

fn outcome_id(outcome: &ActionOutcome) -> Result<i64> {
    outcome
        .task_id
        .ok_or_else(|| Error::OperationFailed("insert did not report an id".to_string()))
}

/// Column-aligned rows: id, checkbox, item, description.
fn format_task_table(tasks: &[Task]) -> Vec<String> {
    let id_width = tasks
        .iter()
        .map(|task| task.id.to_string().len())
        .max()
        .unwrap_or(1)
        .max(2);
    let item_width = tasks
        .iter()
        .map(|task| task.item.chars().count())
        .max()
        .unwrap_or(0)
        .max("Item".len());

    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(
        format!(
            "{:<id_width$}  {:<6}  {:<item_width$}  Description",
            "ID", "Status", "Item"
        )
        .trim_end()
        .to_string(),
    );
    for task in tasks {
        let checkbox = if task.status.is_purchased() {
            "[x]"
        } else {
            "[ ]"
        };
        let line = format!(
            "{:<id_width$}  {:<6}  {:<item_width$}  {}",
            task.id,
            checkbox,
            task.item,
            task.description.as_deref().unwrap_or("")
        );
        lines.push(line.trim_end().to_string());
    }
    lines
}

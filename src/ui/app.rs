use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::actions::{self, ActionOutcome};
use crate::error::Result;
use crate::storage::Storage;
use crate::task::{category_options, CategoryFilter, Task, TaskFilter, TaskStatus};

use super::form::{AddTaskForm, FormAction};
use super::picker::{CategoryPicker, PickerAction};
use super::view;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HelpContext {
    None,
    List,
    Form,
}

/// Everything the view needs. Tasks and categories are recomputed from
/// storage after every interaction, so nothing here is a cache.
pub struct AppState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) categories: Vec<String>,
    pub(crate) selected: Option<usize>,
    pub(crate) search: String,
    pub(crate) search_active: bool,
    pub(crate) category: CategoryFilter,
    pub(crate) form: Option<AddTaskForm>,
    pub(crate) category_picker: Option<CategoryPicker>,
    pub(crate) help_context: HelpContext,
    info_message: Option<String>,
    status_message: Option<String>,
    storage: Storage,
    author: Option<String>,
}

impl AppState {
    pub fn new(storage: Storage, author: Option<String>) -> Self {
        Self {
            tasks: Vec::new(),
            categories: category_options(Vec::new()),
            selected: None,
            search: String::new(),
            search_active: false,
            category: CategoryFilter::All,
            form: None,
            category_picker: None,
            help_context: HelpContext::None,
            info_message: None,
            status_message: None,
            storage,
            author,
        }
    }

    pub fn filter(&self) -> TaskFilter {
        TaskFilter::new(self.search.clone(), self.category.clone())
    }

    /// Re-read categories and the filtered task list, keeping the selection
    /// on the same item when it is still visible.
    pub fn refresh(&mut self) -> Result<()> {
        self.categories = category_options(self.storage.distinct_categories()?);
        if let Some(current) = self.category.category() {
            if !self.categories.iter().any(|option| option == current) {
                self.category = CategoryFilter::All;
            }
        }

        let previous = self.selected_task().map(|task| task.id);
        self.tasks = self.storage.query(&self.filter())?;
        self.selected = if self.tasks.is_empty() {
            None
        } else {
            let index = previous
                .and_then(|id| self.tasks.iter().position(|task| task.id == id))
                .unwrap_or_else(|| {
                    self.selected
                        .unwrap_or(0)
                        .min(self.tasks.len().saturating_sub(1))
                });
            Some(index)
        };
        debug!(
            tasks = self.tasks.len(),
            categories = self.categories.len(),
            "view refreshed"
        );
        Ok(())
    }

    pub fn refresh_or_report(&mut self) {
        if let Err(err) = self.refresh() {
            self.set_error(format!("load failed: {err}"));
        }
    }

    pub fn into_storage(self) -> Storage {
        self.storage
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|idx| self.tasks.get(idx))
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        None
    }

    pub(crate) fn toggle_help(&mut self, context: HelpContext) {
        self.help_context = if self.help_context == context {
            HelpContext::None
        } else {
            context
        };
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.category_picker.is_some() {
            return "j/k move  enter apply  esc cancel".to_string();
        }
        if self.form.is_some() {
            return "tab next  enter next/submit  ctrl-s submit  f1 help  esc close".to_string();
        }
        if self.search_active {
            return "type search  backspace delete  enter done  esc clear".to_string();
        }
        "j/k move  space check  a add  d delete  / search  c category  ? help  q quit".to_string()
    }

    pub(crate) fn task_count_summary(&self) -> String {
        let purchased = self
            .tasks
            .iter()
            .filter(|task| task.status.is_purchased())
            .count();
        let planned = self.tasks.len() - purchased;
        format!(
            "Planned: {planned}  Purchased: {purchased}  Showing: {}",
            self.tasks.len()
        )
    }

    fn move_selection(&mut self, delta: isize) {
        if self.tasks.is_empty() {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let max = self.tasks.len() as isize - 1;
        self.selected = Some((current + delta).clamp(0, max) as usize);
    }

    fn select_edge(&mut self, last: bool) {
        self.selected = match (self.tasks.len(), last) {
            (0, _) => None,
            (_, false) => Some(0),
            (len, true) => Some(len - 1),
        };
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn clear_messages(&mut self) {
        self.info_message = None;
        self.status_message = None;
    }

    fn apply_outcome(&mut self, outcome: ActionOutcome) {
        self.set_info(outcome.message);
    }

    fn open_form(&mut self) {
        let category = self.category.category().map(|value| value.to_string());
        self.form = Some(AddTaskForm::new(self.author.clone(), category.as_deref()));
        self.help_context = HelpContext::None;
    }

    fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        let checked = !task.status.is_purchased();
        match actions::toggle_status(&self.storage, id, TaskStatus::from_checked(checked)) {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id) else {
            return;
        };
        match actions::delete_task(&self.storage, id) {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(err) => self.set_error(err.to_string()),
        }
    }
}

pub fn run(storage: Storage, author: Option<String>) -> Result<()> {
    let mut app = AppState::new(storage, author);
    app.refresh()?;

    let result = run_terminal(&mut app);
    let closed = app.into_storage().close();
    result?;
    closed
}

fn run_terminal(app: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key) {
                    break;
                }
                app.refresh_or_report();
                dirty = true;
            }
            Event::Resize(_, _) => dirty = true,
            _ => {}
        }
    }
    Ok(())
}

/// Apply one key press. Returns true when the UI should exit.
pub(crate) fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if let Some(mut picker) = app.category_picker.take() {
        match picker.handle_key(key) {
            PickerAction::None => app.category_picker = Some(picker),
            PickerAction::Cancel => {}
            PickerAction::Confirm => {
                if let Some(selected) = picker.selected_option() {
                    app.category = CategoryFilter::from_selection(selected);
                    app.set_info(format!("category: {}", app.category.label()));
                }
            }
        }
        return false;
    }

    if let Some(mut form) = app.form.take() {
        app.clear_messages();
        if key.code == KeyCode::F(1) {
            app.toggle_help(HelpContext::Form);
            app.form = Some(form);
            return false;
        }
        match form.handle_key(key) {
            FormAction::None => app.form = Some(form),
            FormAction::Cancel => app.clear_messages(),
            FormAction::Submit => {
                let result = form
                    .build_submit()
                    .and_then(|input| actions::create_task(&app.storage, input));
                match result {
                    Ok(_) => {
                        form.reset_after_submit();
                        app.set_info("Item added successfully".to_string());
                    }
                    Err(err) => form.set_error(err.to_string()),
                }
                app.form = Some(form);
            }
        }
        return false;
    }

    if app.search_active {
        app.clear_messages();
        match key.code {
            KeyCode::Esc => {
                app.search.clear();
                app.search_active = false;
            }
            KeyCode::Enter => app.search_active = false,
            KeyCode::Backspace => {
                app.search.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => app.search.push(ch),
            _ => {}
        }
        return false;
    }

    app.clear_messages();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            if app.help_context != HelpContext::None {
                app.help_context = HelpContext::None;
                return false;
            }
            return true;
        }
        KeyCode::Char('?') => app.toggle_help(HelpContext::List),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Home | KeyCode::Char('g') => app.select_edge(false),
        KeyCode::End | KeyCode::Char('G') => app.select_edge(true),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('a') | KeyCode::Char('n') => app.open_form(),
        KeyCode::Char('/') => app.search_active = true,
        KeyCode::Char('c') => {
            let current = app.category.label().to_string();
            app.category_picker = Some(CategoryPicker::new(app.categories.clone(), &current));
        }
        KeyCode::Char('r') => app.set_info("reloaded".to_string()),
        _ => {}
    }
    false
}

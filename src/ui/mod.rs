//! Interactive terminal view of the shopping list.

mod app;
mod form;
mod picker;
mod view;

pub use app::{run, AppState};
pub use form::{AddTaskForm, FormAction, FormField, FormFieldId};
pub use picker::{CategoryPicker, PickerAction};

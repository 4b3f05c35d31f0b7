use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::Result;
use crate::task::{NewTask, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFieldId {
    Item,
    Description,
    Status,
    CreatedBy,
    Category,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FormFieldId,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Cancel,
    Submit,
}

/// Add-item form. Status is a two-value select; the rest are text inputs.
#[derive(Debug, Clone)]
pub struct AddTaskForm {
    fields: Vec<FormField>,
    status: TaskStatus,
    active: usize,
    error: Option<String>,
}

impl AddTaskForm {
    pub fn new(author: Option<String>, category: Option<&str>) -> Self {
        Self {
            fields: vec![
                FormField {
                    id: FormFieldId::Item,
                    label: "Item",
                    value: String::new(),
                    required: true,
                },
                FormField {
                    id: FormFieldId::Description,
                    label: "Description",
                    value: String::new(),
                    required: false,
                },
                FormField {
                    id: FormFieldId::Status,
                    label: "Status",
                    value: String::new(),
                    required: false,
                },
                FormField {
                    id: FormFieldId::CreatedBy,
                    label: "Created by",
                    value: author.unwrap_or_default(),
                    required: true,
                },
                FormField {
                    id: FormFieldId::Category,
                    label: "Category",
                    value: category.unwrap_or_default().to_string(),
                    required: true,
                },
            ],
            status: TaskStatus::default(),
            active: 0,
            error: None,
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_field(&self) -> Option<FormFieldId> {
        self.fields.get(self.active).map(|field| field.id)
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn field_value(&self, id: FormFieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }

    pub fn set_field_value(&mut self, id: FormFieldId, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.id == id) {
            field.value = value.into();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('u') => {
                    if let Some(field) = self.current_text_field_mut() {
                        field.value.clear();
                    }
                    self.error = None;
                }
                KeyCode::Char('s') => return self.attempt_submit(),
                _ => {}
            }
            return FormAction::None;
        }

        let on_status = self.active_field() == Some(FormFieldId::Status);
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Tab | KeyCode::Down => self.move_active(1),
            KeyCode::BackTab | KeyCode::Up => self.move_active(-1),
            KeyCode::Enter => {
                if self.active + 1 >= self.fields.len() {
                    return self.attempt_submit();
                }
                self.move_active(1);
            }
            KeyCode::Left | KeyCode::Right if on_status => {
                self.status = self.status.toggled();
            }
            KeyCode::Char(' ') if on_status => {
                self.status = self.status.toggled();
            }
            KeyCode::Backspace => {
                if let Some(field) = self.current_text_field_mut() {
                    field.value.pop();
                }
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    if let Some(field) = self.current_text_field_mut() {
                        field.value.push(ch);
                    }
                }
            }
            _ => {}
        }

        self.error = None;
        FormAction::None
    }

    /// Validated input, stamped with the current time.
    pub fn build_submit(&self) -> Result<NewTask> {
        let mut input = NewTask::new(self.field_value(FormFieldId::Item)).with_status(self.status);
        input.description = Some(self.field_value(FormFieldId::Description).to_string());
        input.created_by = Some(self.field_value(FormFieldId::CreatedBy).to_string());
        input.category = Some(self.field_value(FormFieldId::Category).to_string());
        let input = input.normalized();
        input.validate()?;
        Ok(input)
    }

    /// Clear per-item fields after a successful insert; author and category stay.
    pub fn reset_after_submit(&mut self) {
        self.set_field_value(FormFieldId::Item, String::new());
        self.set_field_value(FormFieldId::Description, String::new());
        self.status = TaskStatus::default();
        self.active = 0;
        self.error = None;
    }

    fn attempt_submit(&mut self) -> FormAction {
        match self.build_submit() {
            Ok(_) => FormAction::Submit,
            Err(err) => {
                self.error = Some(err.to_string());
                FormAction::None
            }
        }
    }

    fn move_active(&mut self, delta: isize) {
        let len = self.fields.len() as isize;
        if len == 0 {
            self.active = 0;
            return;
        }
        let next = (self.active as isize + delta).rem_euclid(len);
        self.active = next as usize;
    }

    fn current_text_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields
            .get_mut(self.active)
            .filter(|field| field.id != FormFieldId::Status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut AddTaskForm, text: &str) {
        for ch in text.chars() {
            form.handle_key(key(KeyCode::Char(ch)));
        }
    }

    fn submit_from_last_field(form: &mut AddTaskForm) -> FormAction {
        while form.active_index() + 1 < form.fields().len() {
            form.handle_key(key(KeyCode::Tab));
        }
        form.handle_key(key(KeyCode::Enter))
    }

    #[test]
    fn form_requires_item() {
        let mut form = AddTaskForm::new(Some("sam".to_string()), Some("Dairy"));
        let action = submit_from_last_field(&mut form);
        assert_eq!(action, FormAction::None);
        assert_eq!(form.error(), Some("item: is required"));
    }

    #[test]
    fn form_requires_author_and_category() {
        let mut form = AddTaskForm::new(None, None);
        type_text(&mut form, "Milk");
        assert_eq!(submit_from_last_field(&mut form), FormAction::None);
        assert_eq!(form.error(), Some("created_by: is required"));

        form.set_field_value(FormFieldId::CreatedBy, "sam");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::None);
        assert_eq!(form.error(), Some("category: is required"));
    }

    #[test]
    fn complete_form_submits_planned_by_default() {
        let mut form = AddTaskForm::new(Some("sam".to_string()), Some("Dairy"));
        type_text(&mut form, "Milk");
        assert_eq!(submit_from_last_field(&mut form), FormAction::Submit);

        let input = form.build_submit().expect("valid");
        assert_eq!(input.item, "Milk");
        assert_eq!(input.status, TaskStatus::Planned);
        assert_eq!(input.description, None);
        assert_eq!(input.category.as_deref(), Some("Dairy"));
    }

    #[test]
    fn status_field_is_a_select() {
        let mut form = AddTaskForm::new(Some("sam".to_string()), Some("Dairy"));
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.active_field(), Some(FormFieldId::Status));

        form.handle_key(key(KeyCode::Char('x')));
        assert_eq!(form.field_value(FormFieldId::Status), "");
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.status(), TaskStatus::Purchased);
        form.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(form.status(), TaskStatus::Planned);
    }

    #[test]
    fn ctrl_u_clears_and_ctrl_s_submits() {
        let mut form = AddTaskForm::new(Some("sam".to_string()), Some("Dairy"));
        type_text(&mut form, "Mlik");
        form.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(form.field_value(FormFieldId::Item), "");
        type_text(&mut form, "Milk");
        let action = form.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(action, FormAction::Submit);
    }

    #[test]
    fn reset_keeps_author_and_category() {
        let mut form = AddTaskForm::new(Some("sam".to_string()), Some("Dairy"));
        type_text(&mut form, "Milk");
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "oat");
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Right));

        form.reset_after_submit();
        assert_eq!(form.field_value(FormFieldId::Item), "");
        assert_eq!(form.field_value(FormFieldId::Description), "");
        assert_eq!(form.status(), TaskStatus::Planned);
        assert_eq!(form.field_value(FormFieldId::CreatedBy), "sam");
        assert_eq!(form.field_value(FormFieldId::Category), "Dairy");
        assert_eq!(form.active_index(), 0);
    }

    #[test]
    fn escape_cancels() {
        let mut form = AddTaskForm::new(None, None);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    }
}

use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    None,
    Cancel,
    Confirm,
}

/// Single-choice list for the category filter; first option is the `All` sentinel.
#[derive(Debug, Clone)]
pub struct CategoryPicker {
    options: Vec<String>,
    selected: usize,
}

impl CategoryPicker {
    pub fn new(options: Vec<String>, current: &str) -> Self {
        let selected = options
            .iter()
            .position(|option| option == current)
            .unwrap_or(0);
        Self { options, selected }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.options.get(self.selected).map(|value| value.as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return PickerAction::Cancel,
            KeyCode::Enter => return PickerAction::Confirm,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.options.len().saturating_sub(1);
            }
            _ => {}
        }
        PickerAction::None
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.options.len() as isize;
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + delta).rem_euclid(len);
        self.selected = next as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn options() -> Vec<String> {
        vec!["All".to_string(), "Dairy".to_string(), "Produce".to_string()]
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn picker_selects_current() {
        let picker = CategoryPicker::new(options(), "Produce");
        assert_eq!(picker.selected_option(), Some("Produce"));
    }

    #[test]
    fn unknown_current_falls_back_to_all() {
        let picker = CategoryPicker::new(options(), "Bakery");
        assert_eq!(picker.selected_option(), Some("All"));
    }

    #[test]
    fn navigation_wraps() {
        let mut picker = CategoryPicker::new(options(), "All");
        assert_eq!(picker.handle_key(key(KeyCode::Up)), PickerAction::None);
        assert_eq!(picker.selected_option(), Some("Produce"));
        picker.handle_key(key(KeyCode::Char('j')));
        assert_eq!(picker.selected_option(), Some("All"));
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerAction::Confirm);
    }
}

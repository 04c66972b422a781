use crate::debounce::Debounce;
use crate::error::{LostFoundError, Result};
use crate::model::display::{Listing, Stats, Surface, project};
use crate::model::filter::{CategoryFilter, ItemFilter, TypeFilter, filter_indices};
use crate::model::{ContactCard, Item, ItemType, KNOWN_CATEGORIES, resolve_contact};
use crate::submission::ItemForm;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputMode {
    Normal,
    Searching,
    Reporting,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum FormField {
    Type,
    Title,
    Description,
    Category,
    Location,
    ContactName,
    ContactEmail,
    ContactPhone,
    ImagePath,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Type,
        FormField::Title,
        FormField::Description,
        FormField::Category,
        FormField::Location,
        FormField::ContactName,
        FormField::ContactEmail,
        FormField::ContactPhone,
        FormField::ImagePath,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Type => "Type",
            FormField::Title => "Title *",
            FormField::Description => "Description *",
            FormField::Category => "Category *",
            FormField::Location => "Location *",
            FormField::ContactName => "Your name *",
            FormField::ContactEmail => "Email *",
            FormField::ContactPhone => "Phone",
            FormField::ImagePath => "Image file",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

pub struct AppState {
    pub items: Vec<Item>,
    pub view_indices: Vec<usize>,
    pub filter: ItemFilter,
    pub list_state: ListState,
    pub message: String,
    pub loading: bool,
    pub mode: InputMode,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub search_debounce: Debounce,
    pub form: ItemForm,
    pub image_path: String,
    pub form_field: FormField,
    pub submitting: bool,
    pub contact: Option<ContactCard>,
}

impl AppState {
    pub fn new(search_window: Duration) -> Self {
        let mut l_state = ListState::default();
        l_state.select(Some(0));
        Self {
            items: vec![],
            view_indices: vec![],
            filter: ItemFilter::default(),
            list_state: l_state,
            message: "/: Search | a: Report | t: Type | c: Category | m: Contact".to_string(),
            loading: true,
            mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            search_debounce: Debounce::new(search_window),
            form: ItemForm::default(),
            image_path: String::new(),
            form_field: FormField::Type,
            submitting: false,
            contact: None,
        }
    }

    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.loading = false;
        self.recalculate_view();
    }

    /// Replaces one item in place (after a status change) and refreshes the view.
    pub fn replace_item(&mut self, updated: Item) {
        if let Some(slot) = self.items.iter_mut().find(|i| i.id == updated.id) {
            *slot = updated;
        }
        self.recalculate_view();
    }

    /// A freshly stored report goes on top.
    pub fn prepend_item(&mut self, item: Item) {
        self.items.insert(0, item);
        self.recalculate_view();
    }

    pub fn recalculate_view(&mut self) {
        self.view_indices = filter_indices(&self.items, &self.filter);
        let sel = self.list_state.selected().unwrap_or(0);
        if self.view_indices.is_empty() {
            self.list_state.select(Some(0));
        } else if sel >= self.view_indices.len() {
            self.list_state.select(Some(self.view_indices.len() - 1));
        }
        let stale = match &self.contact {
            Some(card) => self.selected_item().map(|i| i.id.as_str()) != Some(card.item_id.as_str()),
            None => false,
        };
        if stale {
            self.contact = None;
        }
    }

    pub fn listing(&self) -> Listing {
        project(
            self.view_indices.iter().map(|&i| &self.items[i]),
            Surface::Terminal,
        )
    }

    pub fn stats(&self) -> Stats {
        Stats::collect(&self.items)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        let view_idx = self.list_state.selected()?;
        self.view_indices.get(view_idx).map(|&i| &self.items[i])
    }

    // --- Filters ---

    pub fn cycle_type(&mut self) {
        self.filter.kind = self.filter.kind.cycle();
        self.recalculate_view();
    }

    /// all -> each known category -> all
    pub fn cycle_category(&mut self) {
        self.filter.category = match &self.filter.category {
            CategoryFilter::All => CategoryFilter::Only(KNOWN_CATEGORIES[0].to_string()),
            CategoryFilter::Only(current) => {
                match KNOWN_CATEGORIES.iter().position(|c| c == current) {
                    Some(i) if i + 1 < KNOWN_CATEGORIES.len() => {
                        CategoryFilter::Only(KNOWN_CATEGORIES[i + 1].to_string())
                    }
                    _ => CategoryFilter::All,
                }
            }
        };
        self.recalculate_view();
    }

    pub fn reset_filters(&mut self) {
        self.filter = ItemFilter {
            search: String::new(),
            kind: TypeFilter::All,
            category: CategoryFilter::All,
        };
        self.search_debounce.cancel();
        self.recalculate_view();
    }

    // --- Search (debounced) ---

    pub fn start_search(&mut self) {
        self.mode = InputMode::Searching;
        self.input_buffer = self.filter.search.clone();
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Called after every keystroke in the search box.
    pub fn search_changed(&mut self, now: Instant) {
        self.filter.search = self.input_buffer.clone();
        self.search_debounce.touch(now);
    }

    /// Applies a pending search once the input has been quiet long enough.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.search_debounce.fire(now) {
            self.recalculate_view();
            return true;
        }
        false
    }

    pub fn finish_search(&mut self) {
        self.search_debounce.cancel();
        self.mode = InputMode::Normal;
        self.reset_input();
        self.recalculate_view();
    }

    pub fn cancel_search(&mut self) {
        self.filter.search.clear();
        self.finish_search();
    }

    // --- Contact ---

    pub fn show_contact(&mut self) -> Result<()> {
        let Some(id) = self.selected_item().map(|i| i.id.clone()) else {
            return Err(LostFoundError::Validation("no item selected".to_string()));
        };
        self.contact = Some(resolve_contact(&self.items, &id)?);
        Ok(())
    }

    // --- Report form ---

    /// Opens the form; whatever was left in it from a failed attempt is kept.
    pub fn open_form(&mut self) {
        self.mode = InputMode::Reporting;
        self.load_field(self.form_field);
    }

    pub fn close_form(&mut self) {
        self.store_field();
        self.mode = InputMode::Normal;
        self.reset_input();
    }

    pub fn form_value(&self, field: FormField) -> String {
        match field {
            FormField::Type => self.form.kind.to_string(),
            FormField::Title => self.form.title.clone(),
            FormField::Description => self.form.description.clone(),
            FormField::Category => self.form.category.clone(),
            FormField::Location => self.form.location.clone(),
            FormField::ContactName => self.form.contact_name.clone(),
            FormField::ContactEmail => self.form.contact_email.clone(),
            FormField::ContactPhone => self.form.contact_phone.clone(),
            FormField::ImagePath => self.image_path.clone(),
        }
    }

    fn load_field(&mut self, field: FormField) {
        self.form_field = field;
        self.input_buffer = self.form_value(field);
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Writes the input buffer back into the focused form field.
    pub fn store_field(&mut self) {
        let value = self.input_buffer.clone();
        match self.form_field {
            FormField::Type => {}
            FormField::Title => self.form.title = value,
            FormField::Description => self.form.description = value,
            FormField::Category => self.form.category = value,
            FormField::Location => self.form.location = value,
            FormField::ContactName => self.form.contact_name = value,
            FormField::ContactEmail => self.form.contact_email = value,
            FormField::ContactPhone => self.form.contact_phone = value,
            FormField::ImagePath => self.image_path = value,
        }
    }

    pub fn next_field(&mut self) {
        self.store_field();
        let i = (self.form_field.position() + 1) % FormField::ALL.len();
        self.load_field(FormField::ALL[i]);
    }

    pub fn previous_field(&mut self) {
        self.store_field();
        let len = FormField::ALL.len();
        let i = (self.form_field.position() + len - 1) % len;
        self.load_field(FormField::ALL[i]);
    }

    pub fn is_last_field(&self) -> bool {
        self.form_field == FormField::ImagePath
    }

    /// Left/right on the type or category field steps through the choices.
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.form_field {
            FormField::Type => {
                self.form.kind = match self.form.kind {
                    ItemType::Lost => ItemType::Found,
                    ItemType::Found => ItemType::Lost,
                };
                self.input_buffer = self.form.kind.to_string();
            }
            FormField::Category => {
                let len = KNOWN_CATEGORIES.len();
                let next = match KNOWN_CATEGORIES
                    .iter()
                    .position(|c| *c == self.input_buffer.trim())
                {
                    Some(i) if forward => (i + 1) % len,
                    Some(i) => (i + len - 1) % len,
                    None => 0,
                };
                self.input_buffer = KNOWN_CATEGORIES[next].to_string();
                self.form.category = self.input_buffer.clone();
            }
            _ => return,
        }
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Snapshot of the form for the store actor. `None` while a submission is pending.
    pub fn begin_submit(&mut self) -> Option<(ItemForm, Option<String>)> {
        self.store_field();
        if self.submitting {
            self.message = "A submission is already in progress".to_string();
            return None;
        }
        self.submitting = true;
        self.message = "Submitting...".to_string();
        let path = self.image_path.trim();
        let image_path = (!path.is_empty()).then(|| path.to_string());
        Some((self.form.clone(), image_path))
    }

    pub fn submit_succeeded(&mut self, item: Item) {
        self.submitting = false;
        self.message = format!("Reported '{}'", item.title);
        self.form.clear();
        self.image_path.clear();
        self.form_field = FormField::Type;
        self.mode = InputMode::Normal;
        self.reset_input();
        self.prepend_item(item);
        self.list_state.select(Some(0));
    }

    pub fn submit_failed(&mut self, error: String) {
        self.submitting = false;
        self.message = format!("Error: {}", error);
    }

    // --- Text input (same editing model for search and form) ---

    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        let byte_index = self.byte_index();
        self.input_buffer.insert(byte_index, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
    fn byte_index(&self) -> usize {
        self.input_buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input_buffer.len())
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }

    // --- Navigation ---

    pub fn next(&mut self) {
        let len = self.view_indices.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
        self.contact = None;
    }
    pub fn previous(&mut self) {
        let len = self.view_indices.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
        self.contact = None;
    }
    pub fn jump_forward(&mut self, step: usize) {
        if self.view_indices.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let new_index = (current + step).min(self.view_indices.len() - 1);
        self.list_state.select(Some(new_index));
        self.contact = None;
    }
    pub fn jump_backward(&mut self, step: usize) {
        if self.view_indices.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(current.saturating_sub(step)));
        self.contact = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemFields, ItemStatus};

    fn item(kind: ItemType, title: &str, category: &str) -> Item {
        Item::new(
            ItemFields {
                kind,
                title: title.to_string(),
                description: "desc".to_string(),
                category: category.to_string(),
                location: "Hall".to_string(),
                contact_name: "Alice".to_string(),
                contact_email: "a@x.com".to_string(),
                contact_phone: None,
            },
            None,
        )
    }

    fn state() -> AppState {
        let mut s = AppState::new(Duration::from_millis(300));
        s.set_items(vec![
            item(ItemType::Lost, "Blue Backpack", "Bags/Backpacks"),
            item(ItemType::Found, "Keys", "Keys"),
            item(ItemType::Found, "Laptop", "Electronics"),
        ]);
        s
    }

    #[test]
    fn search_waits_for_the_debounce_window() {
        let mut s = state();
        let t0 = Instant::now();
        s.start_search();
        for c in "back".chars() {
            s.enter_char(c);
            s.search_changed(t0);
        }
        assert_eq!(s.view_indices.len(), 3);
        assert!(!s.tick(t0 + Duration::from_millis(100)));
        assert!(s.tick(t0 + Duration::from_millis(300)));
        assert_eq!(s.listing().count_label, "1 item found");
        assert_eq!(s.listing().cards[0].title, "Blue Backpack");
    }

    #[test]
    fn type_and_category_cycles_narrow_the_view() {
        let mut s = state();
        s.cycle_type();
        assert_eq!(s.view_indices, vec![0]);
        s.cycle_type();
        assert_eq!(s.view_indices, vec![1, 2]);
        s.cycle_category();
        assert_eq!(s.filter.category, CategoryFilter::Only("Electronics".to_string()));
        assert_eq!(s.view_indices, vec![2]);
        s.reset_filters();
        assert_eq!(s.view_indices.len(), 3);
    }

    #[test]
    fn resolved_item_drops_out_of_view() {
        let mut s = state();
        let mut resolved = s.items[1].clone();
        resolved.status = ItemStatus::Resolved;
        s.replace_item(resolved);
        assert_eq!(s.view_indices, vec![0, 2]);
        assert_eq!(s.stats().resolved, 1);
    }

    #[test]
    fn contact_follows_selection() {
        let mut s = state();
        s.show_contact().unwrap();
        assert_eq!(s.contact.as_ref().unwrap().name, "Alice");
        s.next();
        assert!(s.contact.is_none());

        let mut empty = AppState::new(Duration::from_millis(300));
        empty.set_items(vec![]);
        match empty.show_contact() {
            Err(LostFoundError::Validation(msg)) => assert_eq!(msg, "no item selected"),
            other => panic!("expected a selection error, got {:?}", other),
        }
        assert!(empty.contact.is_none());
    }

    #[test]
    fn form_keeps_input_until_success() {
        let mut s = state();
        s.open_form();
        s.cycle_choice(true);
        assert_eq!(s.form.kind, ItemType::Found);
        s.next_field();
        for c in "Umbrella".chars() {
            s.enter_char(c);
        }
        s.next_field();
        assert_eq!(s.form.title, "Umbrella");

        let (form, image) = s.begin_submit().unwrap();
        assert_eq!(form.title, "Umbrella");
        assert_eq!(image, None);
        assert!(s.begin_submit().is_none());

        s.submit_failed("Invalid input: Description is required".to_string());
        assert_eq!(s.form.title, "Umbrella");
        assert!(!s.submitting);

        let stored = item(ItemType::Found, "Umbrella", "Other");
        s.submit_succeeded(stored);
        assert_eq!(s.form, ItemForm::default());
        assert_eq!(s.mode, InputMode::Normal);
        assert_eq!(s.items[0].title, "Umbrella");
    }

    #[test]
    fn editing_handles_multibyte_text() {
        let mut s = state();
        s.start_search();
        s.enter_char('é');
        s.enter_char('t');
        s.move_cursor_left();
        s.enter_char('x');
        assert_eq!(s.input_buffer, "éxt");
        s.delete_char();
        assert_eq!(s.input_buffer, "ét");
    }
}

//! Form-specialized state store
//!
//! Wraps a [`StateStore`] whose value is a JSON object of form fields,
//! keyed as `form_{form_id}`. Adds per-field update helpers plus
//! field-level error and touched maps. The transient maps are never part
//! of the persisted payload; they reset together via `reset_form` and on
//! `clear_saved`. Persistence mechanics are untouched: field updates go
//! through the same dirty/debounce/save path as any other update.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use super::options::StoreOptions;
use super::state_store::StateStore;

/// A form record: field name to JSON value.
pub type FormData = serde_json::Map<String, Value>;

/// An auto-saving container for a form's in-progress data.
pub struct FormStateStore {
    store: StateStore<FormData>,
    errors: RefCell<HashMap<String, Option<String>>>,
    touched: RefCell<HashMap<String, bool>>,
}

impl FormStateStore {
    /// Creates a form store keyed as `form_{form_id}`.
    pub fn create(form_id: &str, initial_data: FormData, options: StoreOptions<FormData>) -> Self {
        Self {
            store: StateStore::create(format!("form_{}", form_id), initial_data, options),
            errors: RefCell::new(HashMap::new()),
            touched: RefCell::new(HashMap::new()),
        }
    }

    /// Shallow-merges one field into the form data via the underlying
    /// update path (dirty + debounced save).
    pub fn update_field(&self, field: &str, value: Value) {
        let field = field.to_string();
        self.store.update(move |current| {
            let mut next = current.clone();
            next.insert(field, value);
            next
        });
    }

    /// Sets or clears the validation error for a field. Transient only.
    pub fn update_errors(&self, field: &str, error: Option<String>) {
        self.errors.borrow_mut().insert(field.to_string(), error);
    }

    /// Marks a field as touched. Transient only.
    pub fn mark_touched(&self, field: &str) {
        self.touched.borrow_mut().insert(field.to_string(), true);
    }

    /// Current validation error for a field, if any.
    pub fn field_error(&self, field: &str) -> Option<String> {
        self.errors.borrow().get(field).cloned().flatten()
    }

    /// Whether a field has been touched.
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.borrow().get(field).copied().unwrap_or(false)
    }

    /// Replaces the form data (with the initial data when `None`) and
    /// resets both transient maps. Persisted storage is untouched; that
    /// remains `clear_saved`'s job.
    pub fn reset_form(&self, new_data: Option<FormData>) {
        let data = new_data.unwrap_or_else(|| self.store.initial_value());
        self.store.set_value(data);
        self.errors.borrow_mut().clear();
        self.touched.borrow_mut().clear();
    }

    /// Current form data.
    pub fn data(&self) -> FormData {
        self.store.value()
    }

    /// One field of the current form data.
    pub fn field(&self, field: &str) -> Option<Value> {
        self.store.value().get(field).cloned()
    }

    /// See [`StateStore::dirty`].
    pub fn dirty(&self) -> bool {
        self.store.dirty()
    }

    /// See [`StateStore::last_error`].
    pub fn last_error(&self) -> Option<String> {
        self.store.last_error()
    }

    /// See [`StateStore::save_now`].
    pub fn save_now(&self) -> bool {
        self.store.save_now()
    }

    /// Clears persisted storage and resets form data and both transient
    /// maps, so "Start Fresh" leaves no stale field errors behind.
    pub fn clear_saved(&self) {
        self.store.clear_saved();
        self.errors.borrow_mut().clear();
        self.touched.borrow_mut().clear();
    }

    /// See [`StateStore::has_recoverable_data`].
    pub fn has_recoverable_data(&self) -> bool {
        self.store.has_recoverable_data()
    }

    /// The backend key (`form_{form_id}`).
    pub fn key(&self) -> &str {
        self.store.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn initial_recipe_form() -> FormData {
        let mut data = FormData::new();
        data.insert("name".to_string(), json!(""));
        data.insert("servings".to_string(), json!(1));
        data
    }

    #[test]
    fn test_key_convention() {
        let store = FormStateStore::create("recipe", initial_recipe_form(), StoreOptions::new());
        assert_eq!(store.key(), "form_recipe");
    }

    #[test]
    fn test_update_field_merges_single_field() {
        let store = FormStateStore::create("recipe", initial_recipe_form(), StoreOptions::new());
        store.update_field("name", json!("Salad"));

        assert_eq!(store.field("name"), Some(json!("Salad")));
        assert_eq!(store.field("servings"), Some(json!(1)));
        assert!(store.dirty());
    }

    #[test]
    fn test_transient_maps() {
        let store = FormStateStore::create("recipe", initial_recipe_form(), StoreOptions::new());

        assert_eq!(store.field_error("name"), None);
        assert!(!store.is_touched("name"));

        store.update_errors("name", Some("required".to_string()));
        store.mark_touched("name");
        assert_eq!(store.field_error("name"), Some("required".to_string()));
        assert!(store.is_touched("name"));

        store.update_errors("name", None);
        assert_eq!(store.field_error("name"), None);
    }

    #[test]
    fn test_reset_form_restores_initial_and_clears_transients() {
        let store = FormStateStore::create("recipe", initial_recipe_form(), StoreOptions::new());
        store.update_field("name", json!("Salad"));
        store.update_errors("name", Some("too plain".to_string()));
        store.mark_touched("name");

        store.reset_form(None);
        assert_eq!(store.field("name"), Some(json!("")));
        assert_eq!(store.field_error("name"), None);
        assert!(!store.is_touched("name"));
    }

    #[test]
    fn test_reset_form_with_replacement_data() {
        let store = FormStateStore::create("recipe", initial_recipe_form(), StoreOptions::new());

        let mut replacement = FormData::new();
        replacement.insert("name".to_string(), json!("Soup"));
        store.reset_form(Some(replacement));

        assert_eq!(store.field("name"), Some(json!("Soup")));
    }
}

//! Form Store Tests
//!
//! The form specialization must add field-level bookkeeping without
//! altering persistence mechanics:
//! - field updates ride the same debounced save path
//! - the transient error/touched maps never reach the backend
//! - reset_form leaves persisted storage alone; clear_saved removes it

use std::rc::Rc;
use std::time::Duration;

use serde_json::json;

use draftstore::backend::{MemoryBackend, PersistenceBackend};
use draftstore::store::{FormData, FormStateStore, ManualScheduler, StoreOptions};

const DELAY: Duration = Duration::from_millis(2000);

fn recipe_form() -> FormData {
    let mut data = FormData::new();
    data.insert("name".to_string(), json!(""));
    data.insert("calories".to_string(), json!(0));
    data
}

struct Fixture {
    backend: Rc<MemoryBackend>,
    scheduler: Rc<ManualScheduler>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            backend: Rc::new(MemoryBackend::new()),
            scheduler: Rc::new(ManualScheduler::new()),
        }
    }

    fn store(&self) -> FormStateStore {
        FormStateStore::create(
            "recipe",
            recipe_form(),
            StoreOptions::new()
                .backend(self.backend.clone())
                .scheduler(self.scheduler.clone())
                .auto_save_delay(DELAY),
        )
    }

    fn stored_record(&self) -> serde_json::Value {
        let raw = self.backend.get("form_recipe").unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

#[test]
fn test_field_updates_ride_the_debounced_save_path() {
    let fixture = Fixture::new();
    let store = fixture.store();

    store.update_field("name", json!("Salad"));
    store.update_field("calories", json!(350));
    assert!(store.dirty());
    assert_eq!(fixture.backend.set_count(), 0);

    fixture.scheduler.advance(DELAY);
    assert_eq!(fixture.backend.set_count(), 1);
    assert!(!store.dirty());

    let record = fixture.stored_record();
    assert_eq!(record["data"]["name"], "Salad");
    assert_eq!(record["data"]["calories"], 350);
}

#[test]
fn test_transient_maps_are_never_persisted() {
    let fixture = Fixture::new();
    let store = fixture.store();

    store.update_errors("name", Some("required".to_string()));
    store.mark_touched("name");
    store.update_field("name", json!("Salad"));
    assert!(store.save_now());

    let record = fixture.stored_record();
    assert!(record["data"].get("errors").is_none());
    assert!(record["data"].get("touched").is_none());

    // The maps are still live in memory
    assert_eq!(store.field_error("name"), Some("required".to_string()));
    assert!(store.is_touched("name"));
}

#[test]
fn test_recovery_restores_form_data_but_not_transients() {
    let fixture = Fixture::new();
    {
        let store = fixture.store();
        store.update_field("name", json!("Salad"));
        store.update_errors("name", Some("too plain".to_string()));
        store.mark_touched("name");
        assert!(store.save_now());
    }

    let recovered = fixture.store();
    assert_eq!(recovered.field("name"), Some(json!("Salad")));
    assert_eq!(recovered.field_error("name"), None);
    assert!(!recovered.is_touched("name"));
}

#[test]
fn test_reset_form_keeps_persisted_record() {
    let fixture = Fixture::new();
    let store = fixture.store();

    store.update_field("name", json!("Salad"));
    assert!(store.save_now());
    assert!(store.has_recoverable_data());

    store.reset_form(None);
    assert_eq!(store.field("name"), Some(json!("")));
    // Resetting the form is not "Start Fresh": storage still holds the draft
    assert!(store.has_recoverable_data());
}

#[test]
fn test_clear_saved_removes_record_and_transients() {
    let fixture = Fixture::new();
    let store = fixture.store();

    store.update_field("name", json!("Salad"));
    store.update_errors("name", Some("required".to_string()));
    store.mark_touched("name");
    assert!(store.save_now());

    store.clear_saved();
    assert!(!store.has_recoverable_data());
    assert_eq!(store.field("name"), Some(json!("")));
    assert_eq!(store.field_error("name"), None);
    assert!(!store.is_touched("name"));
}

#[test]
fn test_forms_with_distinct_ids_use_distinct_keys() {
    let backend = Rc::new(MemoryBackend::new());
    let options = || -> StoreOptions<FormData> {
        StoreOptions::new().backend(backend.clone())
    };

    let recipe = FormStateStore::create("recipe", recipe_form(), options());
    let profile = FormStateStore::create("profile", FormData::new(), options());

    assert_eq!(recipe.key(), "form_recipe");
    assert_eq!(profile.key(), "form_profile");

    recipe.update_field("name", json!("Salad"));
    assert!(recipe.save_now());
    assert!(recipe.has_recoverable_data());
    assert!(!profile.has_recoverable_data());
}

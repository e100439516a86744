//! Integration tests for StudyStore over the in-memory backend.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use fixtures::{full_study_set, study_set, titles};
use study_store::{
    InMemoryKeyValueStore, KeyValueStore, StoreError, StudySet, StudyStore, VocabularyItem,
};

fn counting(store: &StudyStore<InMemoryKeyValueStore>) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    store.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    hits
}

#[test]
fn added_set_is_listed_unchanged() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    let set = full_study_set("animals");

    store.add(set.clone()).unwrap();

    let sets = store.list();
    assert_eq!(sets.iter().filter(|s| **s == set).count(), 1);
    assert_eq!(sets.len(), 1);
}

#[test]
fn added_set_becomes_active() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("1", "Basics")).unwrap();
    store.add(study_set("2", "Advanced")).unwrap();

    assert_eq!(store.get_active().unwrap().id, "2");
    assert_eq!(store.active_id().as_deref(), Some("2"));
}

#[test]
fn dangling_pointer_falls_back_to_first() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("1", "Basics")).unwrap();
    store.add(study_set("2", "Advanced")).unwrap();

    store.set_active("nonexistent-id").unwrap();

    assert_eq!(store.active_id().as_deref(), Some("nonexistent-id"));
    assert_eq!(store.get_active().unwrap().id, "1");
}

#[test]
fn empty_collection_has_no_active_set() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    assert!(store.get_active().is_none());

    store.set_active("1").unwrap();
    assert!(store.get_active().is_none());
}

#[test]
fn fallback_follows_collection_changes() {
    let kv = InMemoryKeyValueStore::new();
    let store = StudyStore::new(kv.clone());
    store.set_active("missing").unwrap();
    assert!(store.get_active().is_none());

    // Another writer fills the collection behind the store's back.
    let other = StudyStore::new(kv);
    other.add(study_set("x", "Elsewhere")).unwrap();
    other.set_active("missing").unwrap();

    assert_eq!(store.get_active().unwrap().id, "x");
}

#[test]
fn deleting_active_moves_pointer_to_first() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("a", "A")).unwrap();
    store.add(study_set("b", "B")).unwrap();
    store.set_active("a").unwrap();

    assert!(store.delete("a").unwrap());

    assert_eq!(store.get_active().unwrap().id, "b");
    assert_eq!(store.active_id().as_deref(), Some("b"));
}

#[test]
fn deleting_last_set_clears_pointer() {
    let kv = InMemoryKeyValueStore::new();
    let store = StudyStore::new(kv.clone());
    store.add(study_set("a", "A")).unwrap();

    assert!(store.delete("a").unwrap());

    assert!(store.get_active().is_none());
    assert!(store.active_id().is_none());
    assert!(kv.get_item("lang_app_active_set_id").unwrap().is_none());
}

#[test]
fn deleting_inactive_set_keeps_pointer() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("a", "A")).unwrap();
    store.add(study_set("b", "B")).unwrap();
    store.add(study_set("c", "C")).unwrap();
    store.set_active("c").unwrap();

    store.delete("a").unwrap();
    assert_eq!(store.get_active().unwrap().id, "c");
}

#[test]
fn update_of_missing_id_changes_nothing() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("1", "Basics")).unwrap();
    let before = store.list();
    let hits = counting(&store);

    assert!(!store.update(study_set("ghost", "Ghost")).unwrap());

    assert_eq!(store.list(), before);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn update_replaces_whole_record() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(full_study_set("animals")).unwrap();

    let replacement = study_set("animals", "Tiere (leer)");
    assert!(store.update(replacement.clone()).unwrap());

    let stored = store.get("animals").unwrap();
    assert_eq!(stored, replacement);
    assert!(stored.vocabulary.is_empty());
    assert!(stored.difficulty.is_none());
}

#[test]
fn second_delete_is_a_no_op() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("a", "A")).unwrap();
    store.add(study_set("b", "B")).unwrap();

    assert!(store.delete("a").unwrap());
    let after_first = store.list();
    let active_after_first = store.active_id();

    assert!(!store.delete("a").unwrap());
    assert_eq!(store.list(), after_first);
    assert_eq!(store.active_id(), active_after_first);
}

#[test]
fn corrupt_collection_reads_as_empty() {
    let kv = InMemoryKeyValueStore::new();
    kv.set_item("lang_app_sets", "{definitely not json").unwrap();
    let store = StudyStore::new(kv.clone());

    assert!(store.list().is_empty());
    assert!(store.get_active().is_none());

    // The next write starts over from an empty collection.
    store.add(study_set("1", "Basics")).unwrap();
    assert_eq!(store.list().len(), 1);
}

#[test]
fn non_array_collection_reads_as_empty() {
    let kv = InMemoryKeyValueStore::new();
    kv.set_item("lang_app_sets", r#"{"id":"1"}"#).unwrap();
    assert!(StudyStore::new(kv).list().is_empty());
}

#[test]
fn duplicate_ids_match_first_entry() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("dup", "First")).unwrap();
    store.add(study_set("dup", "Second")).unwrap();

    assert_eq!(store.list().len(), 2);
    assert_eq!(store.get_active().unwrap().title, "First");

    store.update(study_set("dup", "First, edited")).unwrap();
    assert_eq!(titles(&store.list()), ["First, edited", "Second"]);

    store.delete("dup").unwrap();
    assert_eq!(titles(&store.list()), ["Second"]);
}

#[test]
fn basics_then_advanced_walkthrough() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());

    store.add(study_set("1", "Basics")).unwrap();
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.get_active().unwrap().title, "Basics");

    store.add(study_set("2", "Advanced")).unwrap();
    assert_eq!(store.get_active().unwrap().title, "Advanced");

    store.set_active("1").unwrap();
    assert_eq!(store.get_active().unwrap().title, "Basics");

    store.delete("1").unwrap();
    assert_eq!(store.get_active().unwrap().title, "Advanced");
}

#[test]
fn every_mutation_notifies() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    let hits = counting(&store);

    store.add(study_set("1", "Basics")).unwrap();
    store.update(study_set("1", "Basics II")).unwrap();
    store.set_active("1").unwrap();
    store.delete("1").unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[test]
fn no_op_delete_does_not_notify() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    let hits = counting(&store);
    store.delete("nothing").unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn listener_sees_new_state() {
    let store = Arc::new(StudyStore::new(InMemoryKeyValueStore::new()));
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

    let reader = Arc::clone(&store);
    let log = Arc::clone(&seen);
    store.subscribe(move || {
        let title = reader.get_active().map(|set| set.title);
        log.lock().unwrap().push(title);
    });

    store.add(study_set("1", "Basics")).unwrap();
    store.delete("1").unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec![Some("Basics".to_string()), None]);
}

#[test]
fn unsubscribed_listener_is_silent() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let id = store.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.add(study_set("1", "Basics")).unwrap();
    assert!(store.unsubscribe(id));
    store.add(study_set("2", "Advanced")).unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn quota_failure_is_reported_and_not_persisted() {
    let kv = InMemoryKeyValueStore::with_quota(400);
    let store = StudyStore::new(kv.clone());
    let hits = counting(&store);

    store.add(study_set("1", "Basics")).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let err = store.add(full_study_set("big")).unwrap_err();
    assert!(matches!(err, StoreError::QuotaExceeded { .. }));

    // Nothing landed: collection, pointer and listeners are as before.
    assert_eq!(titles(&store.list()), ["Basics"]);
    assert_eq!(store.active_id().as_deref(), Some("1"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn touch_records_last_used() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("1", "Basics")).unwrap();
    let at = Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap();

    assert!(store.touch("1", at).unwrap());
    assert!(!store.touch("missing", at).unwrap());

    assert_eq!(store.get("1").unwrap().last_used, Some(at));
}

#[test]
fn saving_a_word_from_reading() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(full_study_set("animals")).unwrap();

    let added = store
        .add_vocabulary("animals", VocabularyItem::new("Maus", "mouse"))
        .unwrap();
    assert!(added);

    let duplicate = store
        .add_vocabulary("animals", VocabularyItem::new(" maus", "mouse"))
        .unwrap();
    assert!(!duplicate);

    assert!(!store
        .add_vocabulary("missing", VocabularyItem::new("Maus", "mouse"))
        .unwrap());

    let words: Vec<_> = store
        .get("animals")
        .unwrap()
        .vocabulary
        .into_iter()
        .map(|item| item.word)
        .collect();
    assert_eq!(words, ["Hund", "Katze", "Maus"]);
}

#[test]
fn clear_removes_everything() {
    let kv = InMemoryKeyValueStore::new();
    let store = StudyStore::new(kv.clone());
    let hits = counting(&store);
    store.add(study_set("1", "Basics")).unwrap();

    store.clear().unwrap();

    assert!(store.list().is_empty());
    assert!(store.get_active().is_none());
    assert!(kv.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn reads_documents_written_by_the_browser_app() {
    let kv = InMemoryKeyValueStore::new();
    kv.set_item(
        "lang_app_sets",
        r#"[{"id":"1","title":"Basics","targetLanguage":"German","createdAt":"2024-01-01T00:00:00Z",
            "vocabulary":[],"flashcards":[],"exercises":{"fillInBlanks":[],"multipleChoice":[]}},
           {"id":"2","title":"Advanced","targetLanguage":"German","difficulty":"B2",
            "createdAt":"2024-01-02T00:00:00.000Z","lastUsed":"2024-01-03T10:00:00.000Z",
            "vocabulary":[{"word":"obwohl","translation":"although","grammarTip":"subordinating"}],
            "flashcards":[],"exercises":{"fillInBlanks":[],"multipleChoice":[]},
            "readingSections":[{"title":"Brief","content":"Liebe Anna, ..."}]}]"#,
    )
    .unwrap();
    kv.set_item("lang_app_active_set_id", "2").unwrap();

    let store = StudyStore::new(kv);
    let active = store.get_active().unwrap();
    assert_eq!(active.title, "Advanced");
    assert_eq!(active.difficulty.as_deref(), Some("B2"));
    assert_eq!(active.vocabulary[0].grammar_tip.as_deref(), Some("subordinating"));
    assert_eq!(active.reading_sections.unwrap()[0].title, "Brief");
}

#[test]
fn offset_less_timestamp_keeps_library_visible() {
    let kv = InMemoryKeyValueStore::new();
    kv.set_item(
        "lang_app_sets",
        r#"[{"id":"1","title":"Basics","targetLanguage":"German","createdAt":"2024-01-02T00:00:00Z"},
           {"id":"2","title":"Advanced","targetLanguage":"German","createdAt":"2024-01-02T00:00:00"}]"#,
    )
    .unwrap();
    let store = StudyStore::new(kv);

    assert_eq!(titles(&store.list()), ["Basics", "Advanced"]);
    assert_eq!(
        store.get("2").unwrap().created_at,
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    );

    store.add(study_set("3", "Expert")).unwrap();
    assert_eq!(titles(&store.list()), ["Basics", "Advanced", "Expert"]);
}

#[test]
fn undecodable_record_survives_writes() {
    let kv = InMemoryKeyValueStore::new();
    kv.set_item(
        "lang_app_sets",
        r#"[{"id":"1","title":"Basics","targetLanguage":"German","createdAt":"2024-01-01T00:00:00Z"},
           {"id":"odd","title":{"de":"Seltsam"},"createdAt":"someday"}]"#,
    )
    .unwrap();
    let store = StudyStore::new(kv.clone());

    assert_eq!(titles(&store.list()), ["Basics"]);

    store.add(study_set("2", "Advanced")).unwrap();
    store.update(study_set("1", "Basics II")).unwrap();
    assert!(!store.delete("odd").unwrap());

    let raw: serde_json::Value =
        serde_json::from_str(&kv.get_item("lang_app_sets").unwrap().unwrap()).unwrap();
    let records = raw.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["title"], "Basics II");
    assert_eq!(
        records[1],
        serde_json::json!({"id":"odd","title":{"de":"Seltsam"},"createdAt":"someday"})
    );
    assert_eq!(records[2]["id"], "2");
    assert_eq!(titles(&store.list()), ["Basics II", "Advanced"]);
}

#[test]
fn deleting_fallback_active_with_dangling_pointer() {
    let store = StudyStore::new(InMemoryKeyValueStore::new());
    store.add(study_set("a", "A")).unwrap();
    store.add(study_set("b", "B")).unwrap();
    store.set_active("ghost").unwrap();
    assert_eq!(store.get_active().unwrap().id, "a");

    assert!(store.delete("a").unwrap());

    assert_eq!(store.get_active().unwrap().id, "b");
    assert_eq!(store.active_id().as_deref(), Some("ghost"));
}

#[test]
fn deleting_fallback_active_with_no_pointer() {
    let kv = InMemoryKeyValueStore::new();
    let store = StudyStore::new(kv.clone());
    store.add(study_set("a", "A")).unwrap();
    store.add(study_set("b", "B")).unwrap();
    kv.remove_item("lang_app_active_set_id").unwrap();
    assert_eq!(store.get_active().unwrap().id, "a");

    assert!(store.delete("a").unwrap());
    assert_eq!(store.get_active().unwrap().id, "b");

    assert!(store.delete("b").unwrap());
    assert!(store.get_active().is_none());
}

#[test]
fn reading_grammar_and_unknown_fields_round_trip_through_store() {
    let kv = InMemoryKeyValueStore::new();
    let store = StudyStore::new(kv.clone());
    let set: StudySet = serde_json::from_str(
        r#"{"id":"rich","title":"Lesen","targetLanguage":"German","createdAt":"2024-01-01T00:00:00Z",
            "readingSections":[{"title":"Brief","content":"Liebe Anna, ...","translation":"Dear Anna, ...",
                                "level":"A2","audio":{"voice":"de-DE-Katja"}}],
            "grammarLessons":[{"title":"Dativ","explanation":"mit dem Hund","examples":["mit der Katze"],
                               "difficulty":3}],
            "sourceFile":"lesson1.csv","tags":["reise","alltag"]}"#,
    )
    .unwrap();

    store.add(set.clone()).unwrap();
    assert_eq!(store.get("rich").unwrap(), set);

    let raw: serde_json::Value =
        serde_json::from_str(&kv.get_item("lang_app_sets").unwrap().unwrap()).unwrap();
    let stored = &raw[0];
    assert_eq!(stored["sourceFile"], "lesson1.csv");
    assert_eq!(stored["tags"], serde_json::json!(["reise", "alltag"]));
    assert_eq!(stored["readingSections"][0]["audio"]["voice"], "de-DE-Katja");
    assert_eq!(stored["grammarLessons"][0]["difficulty"], 3);
}

#[test]
fn store_can_borrow_its_backend() {
    let kv = InMemoryKeyValueStore::new();
    let store = StudyStore::new(&kv);

    store.add(study_set("1", "Basics")).unwrap();

    assert!(store
        .backend()
        .get_item("lang_app_sets")
        .unwrap()
        .is_some());
    assert_eq!(kv.len(), 2);
}

use juggler_store::{Juggler, JugglerStore, Result, StoreConfig, StoreErrorKind, NO_ID};
use std::sync::Arc;
use tempfile::NamedTempFile;

// Helper function to create an in-memory store for testing
fn create_test_store() -> JugglerStore {
    JugglerStore::open_in_memory().unwrap()
}

// Helper function to create a temporary file-based store
fn create_temp_store() -> (JugglerStore, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let store = JugglerStore::open(StoreConfig::new(temp_file.path())).unwrap();
    (store, temp_file)
}

fn add(store: &JugglerStore, name: &str, country: &str, catches: u32) -> Juggler {
    let mut juggler = Juggler::new(name, country, catches);
    store.insert(&mut juggler).unwrap();
    juggler
}

fn names(jugglers: &[Juggler]) -> Vec<&str> {
    jugglers.iter().map(|j| j.name.as_str()).collect()
}

#[test]
fn test_basic_operations() {
    test_basic_operations_impl().unwrap();
}

fn test_basic_operations_impl() -> Result<()> {
    let store = create_test_store();

    // Insert a new juggler
    let mut anna = Juggler::new("Anna", "USA", 120);
    store.insert(&mut anna)?;
    assert_ne!(anna.id, NO_ID);
    assert_eq!(store.id_of("Anna")?, anna.id);

    // Search for her
    let found = store.search("ann")?;
    assert_eq!(found, vec![anna.clone()]);

    // Update her catches
    store.update_catches("Anna", 150)?;
    let all = store.list_all()?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].catches, 150);
    assert_eq!(all[0].id, anna.id);

    // Delete her
    store.delete("Anna")?;
    assert!(store.list_all()?.is_empty());

    Ok(())
}

#[test]
fn insert_assigns_distinct_ids() {
    let store = create_test_store();
    let anna = add(&store, "Anna", "USA", 120);
    let ian = add(&store, "Ian Stewart", "Canada", 94);
    assert!(anna.is_persisted());
    assert!(ian.is_persisted());
    assert_ne!(anna.id, ian.id);
}

#[test]
fn list_all_contains_every_inserted_record() {
    let store = create_test_store();
    let inserted = vec![
        add(&store, "Janne Mustonen", "Finland", 98),
        add(&store, "Ian Stewart", "Canada", 94),
        add(&store, "Aaron Gregg", "Canada", 88),
        add(&store, "Chad Taylor", "USA", 78),
    ];

    let all = store.list_all().unwrap();
    assert_eq!(all, inserted);
}

#[test]
fn duplicate_name_is_rejected() {
    let store = create_test_store();
    let original = add(&store, "Anna", "USA", 120);

    let mut copy = Juggler::new("Anna", "Sweden", 5);
    let err = store.insert(&mut copy).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Duplicate);
    assert!(err.is_duplicate());
    assert_eq!(copy.id, NO_ID);

    assert_eq!(store.list_all().unwrap(), vec![original]);
}

#[test]
fn update_changes_only_the_named_row() {
    let store = create_test_store();
    let anna = add(&store, "Anna", "USA", 120);
    let ian = add(&store, "Ian", "Canada", 94);

    store.update_catches("Anna", 200).unwrap();

    let all = store.list_all().unwrap();
    assert_eq!(all[0], Juggler { catches: 200, ..anna });
    assert_eq!(all[1], ian);
}

#[test]
fn update_of_unknown_name_is_not_found() {
    let store = create_test_store();
    let anna = add(&store, "Anna", "USA", 120);

    let err = store.update_catches("Bob", 10).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "juggler does not exist");

    // name matching is exact
    let err = store.update_catches("anna", 10).unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(store.list_all().unwrap(), vec![anna]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let store = create_test_store();
    add(&store, "Anna", "USA", 120);
    add(&store, "Joanne", "UK", 60);
    add(&store, "Ian", "Canada", 94);

    assert_eq!(names(&store.search("ANN").unwrap()), vec!["Anna", "Joanne"]);
    assert_eq!(names(&store.search("an").unwrap()), vec!["Anna", "Joanne", "Ian"]);
    assert_eq!(names(&store.search("IAN").unwrap()), vec!["Ian"]);
    assert_eq!(store.search("").unwrap().len(), 3);
}

#[test]
fn search_without_match_is_empty() {
    let store = create_test_store();
    add(&store, "Anna", "USA", 120);
    assert!(store.search("zz").unwrap().is_empty());

    let empty = create_test_store();
    assert!(empty.search("anything").unwrap().is_empty());
}

#[test]
fn search_treats_wildcards_literally() {
    let store = create_test_store();
    add(&store, "Anna", "USA", 120);
    add(&store, "Max_Power", "USA", 10);
    add(&store, "100% Juggler", "UK", 100);

    assert_eq!(names(&store.search("_").unwrap()), vec!["Max_Power"]);
    assert_eq!(names(&store.search("%").unwrap()), vec!["100% Juggler"]);
    assert!(store.search("a_n").unwrap().is_empty());
}

#[test]
fn delete_removes_exactly_one_row() {
    let store = create_test_store();
    add(&store, "Anna", "USA", 120);
    let ian = add(&store, "Ian", "Canada", 94);

    store.delete("Anna").unwrap();
    assert_eq!(store.list_all().unwrap(), vec![ian]);

    let err = store.delete("Anna").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "delete failed: juggler does not exist");
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn id_of_unknown_name_is_not_found() {
    let store = create_test_store();
    let err = store.id_of("Nobody").unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn records_survive_reopening_the_file() {
    let (store, temp_file) = create_temp_store();
    let anna = add(&store, "Anna", "USA", 120);
    assert_eq!(store.path(), temp_file.path());
    drop(store);

    // schema creation is idempotent
    let reopened = JugglerStore::open(StoreConfig::new(temp_file.path())).unwrap();
    assert_eq!(reopened.list_all().unwrap(), vec![anna]);
}

#[test]
fn unopenable_path_is_a_fault() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("jugglers.sqlite");
    let err = JugglerStore::open(StoreConfig::new(missing)).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Fault);
}

#[test]
fn shared_store_serializes_writers() {
    let (store, _temp_file) = create_temp_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let mut juggler = Juggler::new(format!("Juggler {i}"), "Nowhere", i);
                store.insert(&mut juggler).unwrap();
                store.update_catches(&juggler.name, i * 10).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 8);
    for juggler in all {
        let i: u32 = juggler.name["Juggler ".len()..].parse().unwrap();
        assert_eq!(juggler.catches, i * 10);
    }
}

use std::fs;
use std::path::Path;

use fio_core::{Engine, Role};
use fio_dict::{
    DictError, NameDictionaries, WordListSource, bundled_dir, index_path, word_list_path,
};
use fio_fuzzy::IndexOptions;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn write_lists(dir: &Path, given: &str, patronymic: &str, family: &str) {
    fs::write(word_list_path(dir, Role::Given), given).unwrap();
    fs::write(word_list_path(dir, Role::Patronymic), patronymic).unwrap();
    fs::write(word_list_path(dir, Role::Family), family).unwrap();
}

fn parts(engine: &Engine<NameDictionaries>, phrase: &str) -> Vec<(Role, String, String, f64)> {
    engine
        .break_apart(phrase)
        .unwrap()
        .iter()
        .map(|p| (p.role, p.src.clone(), p.found.clone(), p.percent))
        .collect()
}

#[test]
fn title_words_are_ignored_with_real_indices() {
    let dir = tempdir().unwrap();
    write_lists(dir.path(), "иван\n", "иванович\n", "иванов\n");

    let dicts = NameDictionaries::open(dir.path(), IndexOptions::default()).unwrap();
    let engine = Engine::new(dicts);

    assert_eq!(
        parts(&engine, "Главный инженер Иванов Иван Иванович"),
        vec![
            (Role::Family, "Иванов".into(), "иванов".into(), 1.0),
            (Role::Given, "Иван".into(), "иван".into(), 1.0),
            (Role::Patronymic, "Иванович".into(), "иванович".into(), 1.0),
        ]
    );
}

#[test]
fn open_persists_indices_and_reuses_them() {
    let dir = tempdir().unwrap();
    write_lists(dir.path(), "иван\nпетр\n", "иванович\n", "иванов\n");

    let first = NameDictionaries::open(dir.path(), IndexOptions::default()).unwrap();
    assert_eq!(first.index(Role::Given).len(), 2);
    for role in Role::ALL {
        assert!(index_path(dir.path(), role).is_file(), "{role} index missing");
    }

    // Persisted indices win over the edited list until a rebuild.
    fs::write(word_list_path(dir.path(), Role::Given), "иван\nпетр\nанна\n").unwrap();
    let reopened = NameDictionaries::open(dir.path(), IndexOptions::default()).unwrap();
    assert_eq!(reopened.index(Role::Given).len(), 2);

    let rebuilt = NameDictionaries::rebuild(dir.path(), IndexOptions::default()).unwrap();
    assert_eq!(rebuilt.index(Role::Given).len(), 3);
    let after = NameDictionaries::open(dir.path(), IndexOptions::default()).unwrap();
    assert_eq!(after.index(Role::Given).len(), 3);
}

#[test]
fn missing_word_list_is_fatal() {
    let dir = tempdir().unwrap();
    fs::write(word_list_path(dir.path(), Role::Given), "иван\n").unwrap();

    let err = NameDictionaries::open(dir.path(), IndexOptions::default())
        .err()
        .unwrap();
    match err {
        DictError::Io { path, .. } => assert_eq!(path, word_list_path(dir.path(), Role::Patronymic)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_word_list_is_fatal() {
    let dir = tempdir().unwrap();
    write_lists(dir.path(), "иван\n", "# пусто\n\n", "иванов\n");

    let err = NameDictionaries::open(dir.path(), IndexOptions::default())
        .err()
        .unwrap();
    assert!(matches!(err, DictError::EmptyWordList { .. }));
}

#[test]
fn corrupt_persisted_index_is_fatal() {
    let dir = tempdir().unwrap();
    write_lists(dir.path(), "иван\n", "иванович\n", "иванов\n");
    for role in Role::ALL {
        fs::write(index_path(dir.path(), role), "{ not json").unwrap();
    }

    let err = NameDictionaries::open(dir.path(), IndexOptions::default())
        .err()
        .unwrap();
    assert!(matches!(err, DictError::Index { .. }));
}

#[test]
fn bundled_dictionaries_handle_typos() {
    let dicts =
        NameDictionaries::load(&WordListSource::new(bundled_dir(), IndexOptions::default()))
            .unwrap();
    let engine = Engine::new(dicts);

    let exact = engine
        .break_apart("Главный инженер Иванов Иван Иванович")
        .unwrap();
    assert_eq!(exact.to_string(), "Иванов Иван Иванович");

    let typo = engine.break_apart("Ивонов Пётр Сергеевич").unwrap();
    assert_eq!(typo.to_string(), "Иванов Петр Сергеевич");
    let family = typo.get(Role::Family).unwrap();
    assert_eq!(family.src, "Ивонов");
    assert!((family.percent - 5.0 / 6.0).abs() < 1e-9);
}

use std::fs;
use todoey_core::repo::document::TodoDocument;
use todoey_core::{
    DocumentTodoRepository, RepoError, StorageError, TodoRepository, ValidationError,
};

#[test]
fn persist_then_load_reconstructs_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");

    let mut repo = DocumentTodoRepository::open(&path).unwrap();
    let groceries = repo.create_category("Groceries", "#FF0000").unwrap();
    let chores = repo.create_category("Chores", "#00FF00").unwrap();
    let milk = repo.create_item(groceries.id, "Milk").unwrap();
    let eggs = repo.create_item(groceries.id, "Eggs").unwrap();
    let sweep = repo.create_item(chores.id, "Sweep").unwrap();
    repo.toggle_done(eggs.id).unwrap();
    repo.persist().unwrap();

    let reopened = DocumentTodoRepository::open(&path).unwrap();
    assert_eq!(
        reopened.list_categories().unwrap(),
        vec![groceries.clone(), chores.clone()]
    );

    let groceries_items = reopened.list_items(groceries.id).unwrap();
    assert_eq!(groceries_items.len(), 2);
    assert_eq!(groceries_items[0], milk);
    assert_eq!(groceries_items[1].id, eggs.id);
    assert!(groceries_items[1].done);
    assert_eq!(reopened.list_items(chores.id).unwrap(), vec![sweep]);
    assert_eq!(reopened.document(), repo.document());
}

#[test]
fn every_mutation_is_written_without_explicit_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");

    let mut repo = DocumentTodoRepository::open(&path).unwrap();
    assert!(!path.exists());
    let category = repo.create_category("Groceries", "#FF0000").unwrap();
    repo.create_item(category.id, "Milk").unwrap();

    let raw = fs::read(&path).unwrap();
    let document = TodoDocument::from_slice(&raw).unwrap();
    assert_eq!(document.categories.len(), 1);
    assert_eq!(document.categories[0].items[0].title, "Milk");

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn missing_file_opens_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = DocumentTodoRepository::open(dir.path().join("absent.json")).unwrap();
    assert!(repo.list_categories().unwrap().is_empty());
}

#[test]
fn failed_write_leaves_in_memory_state_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    let mut repo = DocumentTodoRepository::open(blocker.join("todoey.json")).unwrap();
    fs::write(&blocker, b"not a directory").unwrap();

    let err = repo.create_category("Groceries", "#FF0000").unwrap_err();
    assert!(matches!(err, RepoError::Storage(StorageError::Io(_))));
    assert!(repo.list_categories().unwrap().is_empty());

    assert!(matches!(repo.persist(), Err(RepoError::Storage(_))));
}

#[test]
fn corrupt_file_fails_load_and_keeps_last_good_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");

    let mut repo = DocumentTodoRepository::open(&path).unwrap();
    let category = repo.create_category("Groceries", "#FF0000").unwrap();

    fs::write(&path, b"{ definitely not json").unwrap();
    let err = repo.load().unwrap_err();
    assert!(matches!(err, RepoError::Storage(StorageError::Encoding(_))));
    assert_eq!(repo.list_categories().unwrap(), vec![category]);

    assert!(matches!(
        DocumentTodoRepository::open(&path),
        Err(RepoError::Storage(_))
    ));
}

#[test]
fn open_or_empty_comes_up_empty_and_recovers_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");
    fs::write(&path, b"[]").unwrap();

    let mut repo = DocumentTodoRepository::open_or_empty(&path);
    assert!(repo.list_categories().unwrap().is_empty());
    assert_eq!(repo.path(), Some(path.as_path()));

    repo.create_category("Fresh start", "#FF0000").unwrap();
    let reopened = DocumentTodoRepository::open(&path).unwrap();
    assert_eq!(reopened.list_categories().unwrap().len(), 1);
}

#[test]
fn in_memory_store_treats_persist_and_load_as_no_ops() {
    let mut repo = DocumentTodoRepository::in_memory();
    let category = repo.create_category("Groceries", "#FF0000").unwrap();

    repo.persist().unwrap();
    repo.load().unwrap();
    assert_eq!(repo.list_categories().unwrap(), vec![category]);
    assert!(repo.path().is_none());
}

#[test]
fn rejected_input_does_not_touch_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todoey.json");

    let mut repo = DocumentTodoRepository::open(&path).unwrap();
    let err = repo.create_category(" ", "#FF0000").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankCategoryName)
    ));
    assert!(!path.exists());
}

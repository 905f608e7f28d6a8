//! Behaviour every backing medium must share.

use todoey_core::{
    DocumentTodoRepository, ItemSort, RecordRef, RepoError, SqliteTodoRepository, TodoRepository,
    TodoService, ValidationError,
};
use uuid::Uuid;

fn document() -> DocumentTodoRepository {
    DocumentTodoRepository::in_memory()
}

fn sqlite() -> SqliteTodoRepository {
    SqliteTodoRepository::open_in_memory().unwrap()
}

fn check_categories_keep_creation_order<R: TodoRepository>(mut repo: R) {
    assert!(repo.list_categories().unwrap().is_empty());

    let work = repo.create_category("Work", "#3498DB").unwrap();
    let home = repo.create_category("Home", "#E74C3C").unwrap();
    let again = repo.create_category("Work", "#2ECC71").unwrap();

    let ids: Vec<_> = repo
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.id)
        .collect();
    assert_eq!(ids, vec![work.id, home.id, again.id]);
    assert_ne!(work.id, again.id);
}

#[test]
fn categories_keep_creation_order() {
    check_categories_keep_creation_order(document());
    check_categories_keep_creation_order(sqlite());
}

fn check_blank_category_name_is_rejected<R: TodoRepository>(mut repo: R) {
    repo.create_category("Groceries", "#FF0000").unwrap();

    let err = repo.create_category("", "#FF0000").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankCategoryName)
    ));
    let err = repo.create_category("   ", "#FF0000").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    assert_eq!(repo.list_categories().unwrap().len(), 1);
}

#[test]
fn blank_category_name_is_rejected() {
    check_blank_category_name_is_rejected(document());
    check_blank_category_name_is_rejected(sqlite());
}

fn check_empty_category_lists_no_items<R: TodoRepository>(mut repo: R) {
    let category = repo.create_category("Groceries", "#FF0000").unwrap();
    let service = TodoService::new(repo);

    let items = service
        .items_for_category(category.id, ItemSort::ByTitle)
        .unwrap();
    assert!(items.is_empty());
}

#[test]
fn empty_category_lists_no_items() {
    check_empty_category_lists_no_items(document());
    check_empty_category_lists_no_items(sqlite());
}

fn check_item_creation_requires_known_category<R: TodoRepository>(mut repo: R) {
    let category = repo.create_category("Errands", "#FF0000").unwrap();
    repo.create_item(category.id, "Post letter").unwrap();

    let missing = Uuid::new_v4();
    let err = repo.create_item(missing, "Orphan").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(RecordRef::Category(id)) if id == missing));

    // Unknown category wins over a blank title.
    let err = repo.create_item(missing, "  ").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    assert_eq!(repo.list_categories().unwrap().len(), 1);
    assert_eq!(repo.list_items(category.id).unwrap().len(), 1);
}

#[test]
fn item_creation_requires_known_category() {
    check_item_creation_requires_known_category(document());
    check_item_creation_requires_known_category(sqlite());
}

fn check_item_defaults_and_blank_title<R: TodoRepository>(mut repo: R) {
    let category = repo.create_category("Errands", "#FF0000").unwrap();

    let item = repo.create_item(category.id, "  Post letter ").unwrap();
    assert_eq!(item.title, "Post letter");
    assert!(!item.done);
    assert_eq!(item.category_id, category.id);
    assert!(item.created_at > 0);

    let err = repo.create_item(category.id, "").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankItemTitle)
    ));
    assert_eq!(repo.list_items(category.id).unwrap(), vec![item]);
}

#[test]
fn item_defaults_and_blank_title() {
    check_item_defaults_and_blank_title(document());
    check_item_defaults_and_blank_title(sqlite());
}

fn check_toggle_twice_restores_done<R: TodoRepository>(mut repo: R) {
    let category = repo.create_category("Errands", "#FF0000").unwrap();
    let item = repo.create_item(category.id, "Post letter").unwrap();

    let toggled = repo.toggle_done(item.id).unwrap();
    assert!(toggled.done);
    assert!(repo.get_item(item.id).unwrap().done);

    let restored = repo.toggle_done(item.id).unwrap();
    assert_eq!(restored, item);

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.toggle_done(missing),
        Err(RepoError::NotFound(RecordRef::Item(id))) if id == missing
    ));
}

#[test]
fn toggle_twice_restores_done() {
    check_toggle_twice_restores_done(document());
    check_toggle_twice_restores_done(sqlite());
}

fn check_rename_item<R: TodoRepository>(mut repo: R) {
    let category = repo.create_category("Errands", "#FF0000").unwrap();
    let item = repo.create_item(category.id, "Post leter").unwrap();

    let renamed = repo.rename_item(item.id, "Post letter").unwrap();
    assert_eq!(renamed.title, "Post letter");
    assert_eq!(renamed.created_at, item.created_at);

    let err = repo.rename_item(item.id, " ").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.get_item(item.id).unwrap().title, "Post letter");
}

#[test]
fn rename_item_validates_title() {
    check_rename_item(document());
    check_rename_item(sqlite());
}

fn check_set_category_colour<R: TodoRepository>(mut repo: R) {
    let category = repo.create_category("Errands", "#FF0000").unwrap();

    let updated = repo.set_category_colour(category.id, "#00FF00").unwrap();
    assert_eq!(updated.colour_tag, "#00FF00");
    assert_eq!(repo.get_category(category.id).unwrap(), updated);

    assert!(matches!(
        repo.set_category_colour(Uuid::new_v4(), "#000000"),
        Err(RepoError::NotFound(RecordRef::Category(_)))
    ));
}

#[test]
fn set_category_colour_updates_tag() {
    check_set_category_colour(document());
    check_set_category_colour(sqlite());
}

fn check_delete_item<R: TodoRepository>(mut repo: R) {
    let category = repo.create_category("Errands", "#FF0000").unwrap();
    let first = repo.create_item(category.id, "First").unwrap();
    let second = repo.create_item(category.id, "Second").unwrap();
    let third = repo.create_item(category.id, "Third").unwrap();

    repo.delete_item(second.id).unwrap();
    assert_eq!(repo.list_items(category.id).unwrap(), vec![first, third]);

    assert!(matches!(
        repo.delete_item(second.id),
        Err(RepoError::NotFound(RecordRef::Item(id))) if id == second.id
    ));
    assert!(matches!(
        repo.get_item(second.id),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn delete_item_keeps_remaining_order() {
    check_delete_item(document());
    check_delete_item(sqlite());
}

fn check_delete_category_cascades<R: TodoRepository>(mut repo: R) {
    let doomed = repo.create_category("Doomed", "#FF0000").unwrap();
    let kept = repo.create_category("Kept", "#00FF00").unwrap();
    let doomed_item = repo.create_item(doomed.id, "Gone soon").unwrap();
    let kept_item = repo.create_item(kept.id, "Stays").unwrap();

    repo.delete_category(doomed.id).unwrap();

    assert!(matches!(
        repo.list_items(doomed.id),
        Err(RepoError::NotFound(RecordRef::Category(_)))
    ));
    assert!(matches!(
        repo.get_item(doomed_item.id),
        Err(RepoError::NotFound(RecordRef::Item(_)))
    ));
    assert_eq!(repo.list_items(kept.id).unwrap(), vec![kept_item]);

    let err = repo.delete_category(doomed.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(RecordRef::Category(id)) if id == doomed.id));
}

#[test]
fn delete_category_cascades_and_second_delete_fails() {
    check_delete_category_cascades(document());
    check_delete_category_cascades(sqlite());
}

fn check_items_are_scoped_to_their_category<R: TodoRepository>(mut repo: R) {
    let left = repo.create_category("Left", "#FF0000").unwrap();
    let right = repo.create_category("Right", "#00FF00").unwrap();
    let a = repo.create_item(left.id, "a").unwrap();
    let b = repo.create_item(right.id, "b").unwrap();
    let c = repo.create_item(left.id, "c").unwrap();

    assert_eq!(repo.list_items(left.id).unwrap(), vec![a, c]);
    assert_eq!(repo.list_items(right.id).unwrap(), vec![b]);
}

#[test]
fn items_are_scoped_to_their_category() {
    check_items_are_scoped_to_their_category(document());
    check_items_are_scoped_to_their_category(sqlite());
}

use todo_core::{CsvTodoRepository, MutationOutcome, StoreConfig, Todo, TodoId, TodoService};

fn service_in(dir: &tempfile::TempDir) -> TodoService<CsvTodoRepository> {
    let config = StoreConfig::in_data_dir(dir.path().join("data")).unwrap();
    TodoService::new(CsvTodoRepository::new(config))
}

#[test]
fn end_to_end_create_list_update_delete() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    assert_eq!(service.create_todo("Buy groceries").unwrap().id, TodoId::new("1"));
    assert_eq!(service.create_todo("Walk the dog").unwrap().id, TodoId::new("2"));
    assert_eq!(service.create_todo("Do laundry").unwrap().id, TodoId::new("3"));

    let texts: Vec<String> = service
        .list_todos()
        .unwrap()
        .items
        .into_iter()
        .map(|todo| todo.text)
        .collect();
    assert_eq!(texts, ["Buy groceries", "Walk the dog", "Do laundry"]);

    assert!(service
        .update_todo("2", "Walk the dog for 30 minutes")
        .unwrap()
        .is_applied());
    assert!(service.delete_todo("1").unwrap().is_applied());

    let remaining = service.list_todos().unwrap().items;
    assert_eq!(
        remaining,
        vec![
            Todo::new(TodoId::new("2"), "Walk the dog for 30 minutes"),
            Todo::new(TodoId::new("3"), "Do laundry"),
        ]
    );
}

#[test]
fn service_reports_missing_ids_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(&dir);

    assert_eq!(
        service.delete_todo("1").unwrap(),
        MutationOutcome::EmptyStore
    );

    service.create_todo("Buy groceries").unwrap();
    assert_eq!(
        service.update_todo("999", "x").unwrap(),
        MutationOutcome::NotFound
    );
    assert_eq!(service.delete_todo("999").unwrap(), MutationOutcome::NotFound);
}

#[test]
fn separate_services_share_the_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let writer = service_in(&dir);
    let reader = service_in(&dir);

    writer.create_todo("persisted immediately").unwrap();

    let listed = reader.list_todos().unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].text, "persisted immediately");
    assert_eq!(
        reader.repo().config().data_file(),
        dir.path().join("data").join("todos.csv")
    );
}

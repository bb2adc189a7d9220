use tasklist_core::{NewTask, Task, TaskId};

#[test]
fn task_serializes_with_expected_wire_fields() {
    let task = Task::new("65f0c0ffee", "ship release").toggled();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"id": "65f0c0ffee", "title": "ship release", "completed": true})
    );

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn task_accepts_document_store_id_field() {
    let decoded: Task = serde_json::from_value(serde_json::json!({
        "_id": "abc123",
        "title": "A",
        "completed": false
    }))
    .unwrap();

    assert_eq!(decoded.id, TaskId::new("abc123"));
}

#[test]
fn task_prefers_document_store_id_when_both_fields_are_sent() {
    let decoded: Task = serde_json::from_value(serde_json::json!({
        "_id": "65f",
        "id": "65f",
        "title": "A",
        "completed": false
    }))
    .unwrap();
    assert_eq!(decoded.id, TaskId::new("65f"));

    let decoded: Task = serde_json::from_value(serde_json::json!({
        "id": "virtual",
        "_id": "stored",
        "title": "A"
    }))
    .unwrap();
    assert_eq!(decoded.id, TaskId::new("stored"));
}

#[test]
fn task_without_any_id_field_is_rejected() {
    let err = serde_json::from_value::<Task>(serde_json::json!({"title": "A"})).unwrap_err();
    assert!(err.to_string().contains("neither `_id` nor `id`"));
}

#[test]
fn task_accepts_integer_ids() {
    let decoded: Task = serde_json::from_value(serde_json::json!({
        "id": 1,
        "title": "A",
        "completed": false
    }))
    .unwrap();

    assert_eq!(decoded.id.as_str(), "1");
}

#[test]
fn task_rejects_empty_and_non_scalar_ids() {
    let empty = serde_json::from_value::<Task>(serde_json::json!({
        "id": "",
        "title": "A"
    }));
    assert!(empty.is_err());

    let object = serde_json::from_value::<Task>(serde_json::json!({
        "id": {"nested": true},
        "title": "A"
    }));
    assert!(object.is_err());
}

#[test]
fn new_task_body_matches_create_request_shape() {
    let body = serde_json::to_value(NewTask::new("Buy milk")).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"title": "Buy milk", "completed": false})
    );
}

#[test]
fn renamed_keeps_identity_and_flag() {
    let task = Task::new("7", "old").toggled();
    let renamed = task.renamed("new");

    assert_eq!(renamed.id, task.id);
    assert!(renamed.completed);
    assert_eq!(renamed.title, "new");
}

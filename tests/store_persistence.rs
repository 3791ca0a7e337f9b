use ttrack::task::model::TaskStatus;
use ttrack::task::storage::TaskStorage;
use ttrack::task::store::TaskStore;

#[test]
fn store_round_trips_across_instances() {
    let td = tempfile::tempdir().expect("tempdir");
    let path = td.path().join("tasks.json");

    {
        let mut store = TaskStore::open(TaskStorage::new(path.clone())).expect("open store");
        assert_eq!(store.add("A").expect("add A").id, 1);
        assert_eq!(store.add("B").expect("add B").id, 2);
        assert_eq!(store.add("C").expect("add C").id, 3);
        assert!(store.set_status(2, TaskStatus::Ongoing).expect("set status"));
    }

    let reopened = TaskStore::open(TaskStorage::new(path)).expect("reopen store");
    let tasks = reopened.tasks();
    assert_eq!(tasks.len(), 3);

    let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let descriptions: Vec<&str> = tasks.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["A", "B", "C"]);

    assert_eq!(tasks[0].status, TaskStatus::Pending);
    assert_eq!(tasks[1].status, TaskStatus::Ongoing);
    assert_eq!(tasks[2].status, TaskStatus::Pending);
}

#[test]
fn next_id_is_recomputed_from_the_file() {
    let td = tempfile::tempdir().expect("tempdir");
    let path = td.path().join("tasks.json");

    {
        let mut store = TaskStore::open(TaskStorage::new(path.clone())).expect("open store");
        store.add("one").expect("add");
        store.add("two").expect("add");
        store.add("three").expect("add");
        // Removing a non-maximal id leaves a gap that stays a gap.
        assert!(store.remove(2).expect("remove"));
    }

    let mut reopened = TaskStore::open(TaskStorage::new(path)).expect("reopen store");
    assert_eq!(reopened.add("four").expect("add").id, 4);

    let ids: Vec<u64> = reopened.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn corrupt_data_file_fails_open() {
    let td = tempfile::tempdir().expect("tempdir");
    let path = td.path().join("tasks.json");
    std::fs::write(&path, "{ definitely not a task list").expect("write");

    assert!(TaskStore::open(TaskStorage::new(path)).is_err());
}

#[test]
fn timestamps_survive_the_round_trip() {
    let td = tempfile::tempdir().expect("tempdir");
    let path = td.path().join("tasks.json");

    let created_at = {
        let mut store = TaskStore::open(TaskStorage::new(path.clone())).expect("open store");
        store.add("dated").expect("add").created_at
    };

    let reopened = TaskStore::open(TaskStorage::new(path)).expect("reopen store");
    assert_eq!(reopened.tasks()[0].created_at, created_at);

    // The stored form parses back as RFC 3339.
    assert!(
        time::OffsetDateTime::parse(
            &created_at,
            &time::format_description::well_known::Rfc3339
        )
        .is_ok()
    );
}

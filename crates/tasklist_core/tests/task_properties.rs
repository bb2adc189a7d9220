use proptest::prelude::*;
use std::collections::HashSet;
use tasklist_core::{
    MemoryTaskRepository, NewTask, Task, TaskFilter, TaskId, TaskRepository, TaskService,
};

fn title_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ]{0,30}"
}

fn tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((title_strategy(), any::<bool>()), 0..20).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (title, completed))| Task {
                id: TaskId::new(index.to_string()),
                title,
                completed,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn create_appends_exactly_one_open_task(
        seed in tasks_strategy(),
        title in title_strategy(),
    ) {
        let repo = MemoryTaskRepository::with_tasks(seed.clone());
        let created = repo.create_task(&NewTask::new(title.clone())).unwrap();

        prop_assert_eq!(&created.title, &title);
        prop_assert!(!created.completed);
        prop_assert!(seed.iter().all(|task| task.id != created.id));

        let tasks = repo.list_tasks().unwrap();
        prop_assert_eq!(tasks.len(), seed.len() + 1);
        prop_assert_eq!(tasks.last(), Some(&created));
    }

    #[test]
    fn toggle_round_trip_restores_store(seed in tasks_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!seed.is_empty());
        let repo = MemoryTaskRepository::with_tasks(seed.clone());
        let service = TaskService::new(&repo);
        let target = pick.get(&seed);

        let once = service.toggle_task(target).unwrap();
        service.toggle_task(&once).unwrap();

        prop_assert_eq!(repo.list_tasks().unwrap(), seed);
    }

    #[test]
    fn delete_never_leaves_the_id_behind(seed in tasks_strategy(), id in "[0-9]{1,3}") {
        let repo = MemoryTaskRepository::with_tasks(seed.clone());
        let id = TaskId::new(id);
        let existed = seed.iter().any(|task| task.id == id);

        let removed = repo.delete_task(&id).unwrap();
        let tasks = repo.list_tasks().unwrap();

        prop_assert_eq!(removed, existed);
        prop_assert!(tasks.iter().all(|task| task.id != id));
        if !existed {
            prop_assert_eq!(tasks, seed);
        }
    }

    #[test]
    fn filters_partition_the_list(seed in tasks_strategy()) {
        for filter in TaskFilter::ALL {
            prop_assert!(filter.apply(&seed).iter().all(|task| filter.matches(task)));
        }

        let all = TaskFilter::All
            .apply(&seed)
            .into_iter()
            .map(|task| task.id)
            .collect::<HashSet<_>>();
        let union = TaskFilter::Active
            .apply(&seed)
            .into_iter()
            .chain(TaskFilter::Completed.apply(&seed))
            .map(|task| task.id)
            .collect::<HashSet<_>>();

        prop_assert_eq!(union, all);
        prop_assert_eq!(
            TaskFilter::Active.apply(&seed).len() + TaskFilter::Completed.apply(&seed).len(),
            seed.len()
        );
    }
}

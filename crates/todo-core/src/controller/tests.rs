//! Controller Tests
//!
//! TodoController and AttackController against an in-memory storage.

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::controller::{AttackController, AttackMode, TodoController};
    use crate::domain::{StorageError, Task, TaskFilter};
    use crate::routing::MemoryLocation;
    use crate::session::StaticSession;
    use crate::storage::{AccessGuard, Credential, MemoryStorage, TaskStorage};

    struct Fixture {
        storage: Rc<MemoryStorage>,
        location: MemoryLocation,
        todo: TodoController,
    }

    fn seed() -> Vec<Task> {
        vec![
            Task::new("1", "Buy milk", "alice"),
            Task::new("2", "Walk dog", "alice").with_completed(true),
            Task::new("3", "File taxes", "bob"),
            Task::new("4", "Fix bike", "bob").with_completed(true),
        ]
    }

    fn fixture_with(storage: MemoryStorage, session: StaticSession, path: &str) -> Fixture {
        let storage = Rc::new(storage);
        let location = MemoryLocation::new(path);
        let todo = TodoController::new(
            Rc::clone(&storage) as Rc<dyn TaskStorage>,
            Rc::new(location.clone()),
            Rc::new(session),
        );
        Fixture { storage, location, todo }
    }

    async fn alice_at(path: &str) -> Fixture {
        let mut f = fixture_with(
            MemoryStorage::with_tasks(seed()),
            StaticSession::new("alice").with_role("user"),
            path,
        );
        f.todo.refresh().await.unwrap();
        f
    }

    fn ids(todo: &TodoController) -> Vec<&str> {
        todo.todos().iter().map(|t| t.id.as_str()).collect()
    }

    // ========================
    // Querying
    // ========================

    #[tokio::test]
    async fn test_refresh_scopes_to_viewer() {
        let f = alice_at("/").await;
        assert_eq!(ids(&f.todo), vec!["1", "2"]);
        assert_eq!(f.storage.last_query(), Some(TaskFilter::all().with_owner("alice")));
    }

    #[tokio::test]
    async fn test_route_filters() {
        let f = alice_at("/active").await;
        assert_eq!(ids(&f.todo), vec!["1"]);
        assert_eq!(
            f.storage.last_query(),
            Some(TaskFilter::all().with_completed(false).with_owner("alice"))
        );

        let f = alice_at("/completed").await;
        assert_eq!(ids(&f.todo), vec!["2"]);
    }

    #[tokio::test]
    async fn test_elevated_viewer_sees_every_owner() {
        let mut f = fixture_with(
            MemoryStorage::with_tasks(seed()),
            StaticSession::new("root").with_role("admin"),
            "/active",
        );
        f.todo.refresh().await.unwrap();

        assert!(f.todo.show_all());
        assert_eq!(ids(&f.todo), vec!["1", "3"]);
        assert_eq!(f.storage.last_query(), Some(TaskFilter::all().with_completed(false)));
    }

    #[tokio::test]
    async fn test_path_change_refreshes_once() {
        let mut f = alice_at("").await;
        assert_eq!(f.todo.route().path(), "/");

        assert!(!f.todo.on_path_changed("").await.unwrap());
        assert!(!f.todo.on_path_changed("/").await.unwrap());
        assert_eq!(f.storage.queries().len(), 1);

        f.location.set_path("/completed");
        assert!(f.todo.on_path_changed("/completed").await.unwrap());
        assert_eq!(ids(&f.todo), vec!["2"]);
        assert_eq!(f.storage.queries().len(), 2);
    }

    // ========================
    // Add / edit
    // ========================

    #[tokio::test]
    async fn test_add_blank_title_is_noop() {
        let mut f = alice_at("/").await;
        assert_eq!(f.todo.add("   ").await.unwrap(), None);
        assert_eq!(f.todo.add("").await.unwrap(), None);
        assert_eq!(f.todo.todos().len(), 2);
        assert_eq!(f.storage.snapshot().len(), 4);
    }

    #[tokio::test]
    async fn test_add_appends_trimmed_task_owned_by_viewer() {
        let mut f = alice_at("/").await;
        f.todo.set_new_title("  Call mom ");

        let created = f.todo.add_pending().await.unwrap().unwrap();
        assert_eq!(created.title, "Call mom");
        assert_eq!(created.owner, "alice");
        assert!(!created.completed);
        assert_eq!(f.todo.todos().last(), Some(&created));
        assert_eq!(f.todo.new_title(), "");
        assert_eq!(f.todo.remaining_count(), 2);
    }

    #[tokio::test]
    async fn test_done_editing_persists_trimmed_title() {
        let mut f = alice_at("/").await;
        f.todo.edit("1");
        assert_eq!(f.todo.editing(), Some("1"));
        f.todo.set_title("1", "  Buy oat milk  ");

        f.todo.done_editing("1").await.unwrap();
        assert_eq!(f.todo.editing(), None);
        assert_eq!(f.todo.task("1").unwrap().title, "Buy oat milk");
        assert_eq!(f.storage.snapshot()[0].title, "Buy oat milk");
        assert_eq!(f.todo.snapshot("1"), None);
    }

    #[tokio::test]
    async fn test_done_editing_blank_title_removes_task() {
        let mut f = alice_at("/").await;
        f.todo.edit("1");
        f.todo.set_title("1", "   ");

        f.todo.done_editing("1").await.unwrap();
        assert_eq!(ids(&f.todo), vec!["2"]);
        assert!(f.storage.snapshot().iter().all(|t| t.id != "1"));
    }

    #[tokio::test]
    async fn test_done_editing_without_edit_is_noop() {
        let mut f = alice_at("/").await;
        f.todo.set_title("1", "");
        f.todo.done_editing("1").await.unwrap();
        assert_eq!(f.storage.snapshot().len(), 4);
    }

    #[tokio::test]
    async fn test_revert_editing_restores_snapshot() {
        let mut f = alice_at("/").await;
        let before = f.todo.task("1").cloned().unwrap();

        f.todo.edit("1");
        f.todo.set_title("1", "Something else");
        f.todo.revert_editing("1");

        assert_eq!(f.todo.task("1"), Some(&before));
        assert_eq!(f.todo.editing(), None);
        assert_eq!(f.todo.snapshot("1"), None);
    }

    // ========================
    // Completion
    // ========================

    #[tokio::test]
    async fn test_toggle_completion_persists() {
        let mut f = alice_at("/").await;
        f.todo.toggle_completion("1").await.unwrap();

        assert!(f.todo.task("1").unwrap().completed);
        assert!(f.storage.snapshot()[0].completed);
        assert_eq!(f.todo.remaining_count(), 0);
        assert!(f.todo.all_checked());
    }

    #[tokio::test]
    async fn test_failed_update_reverts_to_snapshot() {
        let mut f = alice_at("/").await;
        let before = f.todo.task("1").cloned().unwrap();
        f.storage.set_fail_updates(true);

        let err = f.todo.toggle_completion("1").await.unwrap_err();
        assert!(matches!(err, StorageError::Internal(_)));
        assert_eq!(f.todo.task("1"), Some(&before));
        assert_eq!(f.todo.remaining_count(), 1);

        f.todo.edit("1");
        f.todo.set_title("1", "Renamed");
        assert!(f.todo.done_editing("1").await.is_err());
        assert_eq!(f.todo.task("1"), Some(&before));
    }

    #[tokio::test]
    async fn test_successful_update_takes_server_value() {
        let mut f = alice_at("/").await;
        f.todo.edit("2");
        f.todo.set_title("2", "Walk the dog");
        f.todo.update("2").await.unwrap();

        assert_eq!(f.todo.task("2"), f.storage.snapshot().iter().find(|t| t.id == "2"));
    }

    #[tokio::test]
    async fn test_mark_all() {
        let mut f = alice_at("/").await;

        assert_eq!(f.todo.mark_all(true).await, 0);
        assert_eq!(f.todo.remaining_count(), 0);
        assert_eq!(f.todo.completed_count(), f.todo.todos().len());
        assert!(f.todo.all_checked());

        assert_eq!(f.todo.mark_all(false).await, 0);
        assert_eq!(f.todo.remaining_count(), f.todo.todos().len());
        assert_eq!(f.todo.completed_count(), 0);
        assert!(!f.todo.all_checked());
    }

    #[tokio::test]
    async fn test_toggle_all_flips_against_all_checked() {
        let mut f = alice_at("/").await;
        f.todo.toggle_all().await;
        assert!(f.todo.todos().iter().all(|t| t.completed));
        f.todo.toggle_all().await;
        assert!(f.todo.todos().iter().all(|t| !t.completed));
    }

    #[tokio::test]
    async fn test_mark_all_reports_failures() {
        let mut f = alice_at("/").await;
        f.storage.set_fail_updates(true);
        assert_eq!(f.todo.mark_all(true).await, 1);
        assert_eq!(f.todo.remaining_count(), 1);
    }

    // ========================
    // Removal
    // ========================

    #[tokio::test]
    async fn test_remove_and_clear_completed() {
        let mut f = alice_at("/").await;
        f.todo.add("Call mom").await.unwrap();
        f.todo.remove("1").await.unwrap();
        assert_eq!(f.todo.todos().len(), 2);

        f.todo.clear_completed().await.unwrap();
        assert!(f.todo.todos().iter().all(|t| !t.completed));
        assert_eq!(f.todo.completed_count(), 0);
        assert!(f.storage.snapshot().iter().all(|t| t.id != "2"));
    }

    #[tokio::test]
    async fn test_clear_completed_continues_past_failed_remove() {
        let mut f = fixture_with(
            MemoryStorage::with_tasks(vec![
                Task::new("1", "Walk dog", "alice").with_completed(true),
                Task::new("2", "Wash car", "alice").with_completed(true),
                Task::new("3", "Buy milk", "alice"),
            ]),
            StaticSession::new("alice"),
            "/",
        );
        f.todo.refresh().await.unwrap();

        // deleted elsewhere after the list was loaded
        let gone = f.todo.task("1").cloned().unwrap();
        f.storage.remove(&gone).await.unwrap();

        let err = f.todo.clear_completed().await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        assert_eq!(ids(&f.todo), vec!["1", "3"]);
        let remote: Vec<String> = f.storage.snapshot().into_iter().map(|t| t.id).collect();
        assert_eq!(remote, vec!["3".to_string()]);
    }

    #[tokio::test]
    async fn test_snapshots_stay_aligned_after_remove() {
        let mut f = alice_at("/").await;
        f.todo.edit("2");
        f.todo.remove("1").await.unwrap();
        f.todo.set_title("2", "Changed");
        f.todo.revert_editing("2");
        assert_eq!(f.todo.task("2").unwrap().title, "Walk dog");
    }

    #[tokio::test]
    async fn test_user_label() {
        let f = alice_at("/").await;
        assert_eq!(f.todo.user_label(), "alice (user)");
    }

    // ========================
    // Attack simulation
    // ========================

    #[tokio::test]
    async fn test_attack_strips_owner_for_elevated_flag() {
        let mut f = alice_at("/").await;
        let mut attack = AttackController::new(Rc::new(StaticSession::new("alice")), Credential::default());

        attack.set_show_all(true);
        attack.attack(&mut f.todo).await.unwrap();

        assert_eq!(attack.mode(), AttackMode::Attacking);
        assert_eq!(f.storage.last_query(), Some(TaskFilter::all()));
        assert_eq!(f.todo.todos().len(), 4);
    }

    #[tokio::test]
    async fn test_attack_forces_owner_on_writes() {
        let mut f = alice_at("/").await;
        let mut attack = AttackController::new(Rc::new(StaticSession::new("alice")), Credential::default());
        attack.attack(&mut f.todo).await.unwrap();
        assert_eq!(f.storage.last_query(), Some(TaskFilter::all().with_owner("alice")));

        attack.set_username("bob");
        let created = f.todo.add("Planted").await.unwrap().unwrap();
        assert_eq!(created.owner, "bob");

        // owner kept on update unless asked
        f.todo.toggle_completion("1").await.unwrap();
        assert_eq!(f.todo.task("1").unwrap().owner, "alice");

        attack.set_use_changed_user_on_update(true);
        f.todo.toggle_completion("1").await.unwrap();
        assert_eq!(f.todo.task("1").unwrap().owner, "bob");
    }

    #[tokio::test]
    async fn test_attack_is_not_stacked_twice() {
        let mut f = alice_at("/").await;
        let mut attack = AttackController::new(Rc::new(StaticSession::new("alice")), Credential::default());
        let original = f.todo.storage();

        attack.attack(&mut f.todo).await.unwrap();
        attack.attack(&mut f.todo).await.unwrap();
        attack.reset(&mut f.todo).await.unwrap();

        assert!(std::ptr::addr_eq(Rc::as_ptr(&original), Rc::as_ptr(&f.todo.storage())));
    }

    #[tokio::test]
    async fn test_reset_restores_storage_credential_and_settings() {
        let credential = Credential::new(Some("t-alice".to_string()));
        let guard = AccessGuard::new(credential.clone()).grant("t-alice", "alice", false);
        let mut f = fixture_with(
            MemoryStorage::with_tasks(seed()).with_guard(guard),
            StaticSession::new("alice"),
            "/",
        );
        f.todo.refresh().await.unwrap();
        let original = f.todo.storage();

        let session = Rc::new(StaticSession::new("alice"));
        let mut attack = AttackController::new(session, credential.clone());
        attack.set_show_all(true);
        attack.set_username("mallory");
        attack.attack(&mut f.todo).await.unwrap();

        // server keeps scoping even without the owner constraint
        assert_eq!(f.storage.last_query(), Some(TaskFilter::all()));
        assert_eq!(ids(&f.todo), vec!["1", "2"]);

        attack.set_authorization(false);
        assert_eq!(credential.token(), None);
        assert!(f.todo.refresh().await.unwrap_err().is_access_denied());

        attack.reset(&mut f.todo).await.unwrap();
        assert_eq!(attack.mode(), AttackMode::Normal);
        assert_eq!(credential.token().as_deref(), Some("t-alice"));
        assert!(std::ptr::addr_eq(Rc::as_ptr(&original), Rc::as_ptr(&f.todo.storage())));
        assert_eq!(attack.settings().username, "alice");
        assert!(!attack.settings().show_all);
        assert!(attack.settings().authorization);
        assert_eq!(f.storage.last_query(), Some(TaskFilter::all().with_owner("alice")));
        assert_eq!(ids(&f.todo), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_authorization_flag_only_applies_while_attacking() {
        let credential = Credential::new(Some("t-alice".to_string()));
        let mut f = alice_at("/").await;
        let mut attack = AttackController::new(Rc::new(StaticSession::new("alice")), credential.clone());

        attack.set_authorization(false);
        assert_eq!(credential.token().as_deref(), Some("t-alice"));

        attack.attack(&mut f.todo).await.unwrap();
        assert_eq!(credential.token(), None);

        attack.set_authorization(true);
        assert_eq!(credential.token().as_deref(), Some("t-alice"));
    }

    #[tokio::test]
    async fn test_forged_owner_rejected_by_guarded_storage() {
        let credential = Credential::new(Some("t-alice".to_string()));
        let guard = AccessGuard::new(credential.clone()).grant("t-alice", "alice", false);
        let mut f = fixture_with(
            MemoryStorage::with_tasks(seed()).with_guard(guard),
            StaticSession::new("alice"),
            "/",
        );
        f.todo.refresh().await.unwrap();

        let mut attack = AttackController::new(Rc::new(StaticSession::new("alice")), credential);
        attack.attack(&mut f.todo).await.unwrap();
        attack.set_username("bob");

        let err = f.todo.add("Planted").await.unwrap_err();
        assert!(matches!(err, StorageError::Forbidden(_)));
        assert_eq!(f.todo.todos().len(), 2);
    }
}

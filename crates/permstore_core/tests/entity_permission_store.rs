use permstore_core::db::open_db_in_memory;
use permstore_core::{
    Entity, EntityPermission, EntityPermissionQuery, EntityPermissionRepository, PermissionStore,
    RepoError, StoreOptions, ValidationError,
};
use rusqlite::Connection;

fn migrated_store(conn: &Connection) -> PermissionStore {
    let options = StoreOptions {
        automigrate_enabled: true,
        ..StoreOptions::default()
    };
    PermissionStore::try_new(options, conn).unwrap()
}

fn link(entity_type: &str, entity_id: &str, permission_id: &str) -> EntityPermission {
    let mut link = EntityPermission::new();
    link.set_entity_type(entity_type)
        .set_entity_id(entity_id)
        .set_permission_id(permission_id);
    link
}

#[test]
fn create_and_find_by_triple() {
    let conn = open_db_in_memory().unwrap();
    let store = migrated_store(&conn);
    let repo = store.entity_permissions(&conn);

    let mut created = link("USER", "u-1", "p-1");
    created.set_memo("granted by admin");
    repo.create_entity_permission(&mut created).unwrap();

    let found = repo
        .find_entity_permission_by_entity_and_permission("USER", "u-1", "p-1")
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), created.id());
    assert_eq!(found.memo(), "granted by admin");
    assert!(found.data_changed().is_empty());

    assert!(repo
        .find_entity_permission_by_entity_and_permission("USER", "u-1", "p-2")
        .unwrap()
        .is_none());
}

#[test]
fn duplicate_triple_is_rejected_while_alive() {
    let conn = open_db_in_memory().unwrap();
    let store = migrated_store(&conn);
    let repo = store.entity_permissions(&conn);

    let mut first = link("USER", "u-1", "p-1");
    repo.create_entity_permission(&mut first).unwrap();

    let error = repo
        .create_entity_permission(&mut link("USER", "u-1", "p-1"))
        .unwrap_err();
    assert!(matches!(
        error,
        RepoError::Duplicate { ref entity_type, ref entity_id, ref permission_id }
            if entity_type == "USER" && entity_id == "u-1" && permission_id == "p-1"
    ));

    // Varying any single member of the triple is a different link.
    repo.create_entity_permission(&mut link("GROUP", "u-1", "p-1")).unwrap();
    repo.create_entity_permission(&mut link("USER", "u-2", "p-1")).unwrap();
    repo.create_entity_permission(&mut link("USER", "u-1", "p-2")).unwrap();
    assert_eq!(
        repo.count_entity_permissions(&EntityPermissionQuery::new()).unwrap(),
        4
    );

    // Once soft-deleted, the triple can be granted again.
    repo.soft_delete_entity_permission(&mut first).unwrap();
    repo.create_entity_permission(&mut link("USER", "u-1", "p-1")).unwrap();
    let everything = EntityPermissionQuery::new()
        .with_entity_type("USER")
        .with_entity_id("u-1")
        .with_permission_id("p-1")
        .with_soft_deleted_included(true);
    assert_eq!(repo.count_entity_permissions(&everything).unwrap(), 2);
}

#[test]
fn create_requires_the_full_triple() {
    let conn = open_db_in_memory().unwrap();
    let store = migrated_store(&conn);
    let repo = store.entity_permissions(&conn);

    for (mut candidate, missing) in [
        (link("USER", "u-1", ""), "permission_id"),
        (link("USER", "", "p-1"), "entity_id"),
        (link("", "u-1", "p-1"), "entity_type"),
    ] {
        let error = repo.create_entity_permission(&mut candidate).unwrap_err();
        let rejected_field = match &error {
            RepoError::Validation(ValidationError::EmptyField { field, .. }) => Some(*field),
            _ => None,
        };
        assert_eq!(rejected_field, Some(missing), "{error}");
    }
    assert_eq!(
        repo.count_entity_permissions(&EntityPermissionQuery::new()).unwrap(),
        0
    );
}

#[test]
fn filters_select_links_for_one_entity() {
    let conn = open_db_in_memory().unwrap();
    let store = migrated_store(&conn);
    let repo = store.entity_permissions(&conn);

    for (entity_type, entity_id, permission_id, memo) in [
        ("USER", "u-1", "p-1", "Onboarding grant"),
        ("USER", "u-1", "p-2", "manual"),
        ("USER", "u-2", "p-1", "onboarding GRANT"),
        ("GROUP", "g-1", "p-1", ""),
    ] {
        let mut candidate = link(entity_type, entity_id, permission_id);
        candidate.set_memo(memo);
        repo.create_entity_permission(&mut candidate).unwrap();
    }

    let for_user = EntityPermissionQuery::new()
        .with_entity_type("USER")
        .with_entity_id("u-1")
        .with_order_by("permission_id")
        .with_sort_direction("asc".parse().unwrap());
    let permission_ids: Vec<String> = repo
        .list_entity_permissions(&for_user)
        .unwrap()
        .iter()
        .map(|link| link.permission_id().to_string())
        .collect();
    assert_eq!(permission_ids, ["p-1", "p-2"]);

    let onboarding = EntityPermissionQuery::new().with_memo_like("onboarding");
    assert_eq!(repo.count_entity_permissions(&onboarding).unwrap(), 2);

    let holders = EntityPermissionQuery::new().with_permission_id("p-1");
    assert_eq!(repo.count_entity_permissions(&holders).unwrap(), 3);
}

#[test]
fn lookup_by_id_set_and_soft_delete_by_id() {
    let conn = open_db_in_memory().unwrap();
    let store = migrated_store(&conn);
    let repo = store.entity_permissions(&conn);

    let mut a = link("USER", "u-1", "p-1");
    let mut b = link("USER", "u-1", "p-2");
    let mut c = link("USER", "u-1", "p-3");
    for candidate in [&mut a, &mut b, &mut c] {
        repo.create_entity_permission(candidate).unwrap();
    }

    let pair = EntityPermissionQuery::new()
        .with_id_in(vec![a.id().to_string(), c.id().to_string()]);
    assert_eq!(repo.list_entity_permissions(&pair).unwrap().len(), 2);

    repo.soft_delete_entity_permission_by_id(c.id()).unwrap();
    assert_eq!(repo.list_entity_permissions(&pair).unwrap().len(), 1);
    assert!(repo.find_entity_permission_by_id(c.id()).unwrap().is_none());

    assert!(matches!(
        repo.soft_delete_entity_permission_by_id(c.id()),
        Err(RepoError::NotFound { .. })
    ));

    repo.delete_entity_permission(&b).unwrap();
    let everything = EntityPermissionQuery::new().with_soft_deleted_included(true);
    assert_eq!(repo.count_entity_permissions(&everything).unwrap(), 2);
}

#[test]
fn update_changes_only_dirty_columns() {
    let conn = open_db_in_memory().unwrap();
    let store = migrated_store(&conn);
    let repo = store.entity_permissions(&conn);

    let mut created = link("USER", "u-1", "p-1");
    repo.create_entity_permission(&mut created).unwrap();

    created.set_meta("source", "import").unwrap();
    repo.update_entity_permission(&mut created).unwrap();
    assert!(created.data_changed().is_empty());

    let loaded = repo.find_entity_permission_by_id(created.id()).unwrap().unwrap();
    assert_eq!(loaded.meta("source"), "import");
    assert_eq!(loaded.entity_type(), "USER");
    assert_eq!(loaded.created_at(), created.created_at());
}

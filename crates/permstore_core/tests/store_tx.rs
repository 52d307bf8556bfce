use permstore_core::db::open_db;
use permstore_core::{
    Entity, Permission, PermissionQuery, PermissionRepository, PermissionStatus, PermissionStore,
    StoreOptions,
};

fn store_with_tables(conn: &rusqlite::Connection) -> PermissionStore {
    let options = StoreOptions {
        automigrate_enabled: true,
        ..StoreOptions::default()
    };
    PermissionStore::try_new(options, conn).unwrap()
}

#[test]
fn writes_inside_a_transaction_are_invisible_until_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("permissions.sqlite3");

    let mut writer = open_db(&path).unwrap();
    let reader = open_db(&path).unwrap();
    let store = store_with_tables(&writer);

    let mut permission = Permission::new();
    permission
        .set_handle("reports.export")
        .set_title("Export reports")
        .set_status(PermissionStatus::Active);

    let tx = writer.transaction().unwrap();
    {
        let repo = store.permissions(&tx);
        repo.create_permission(&mut permission).unwrap();
        permission.set_title("Export all reports");
        repo.update_permission(&mut permission).unwrap();
        assert!(repo.find_permission_by_id(permission.id()).unwrap().is_some());
    }

    assert!(store
        .permissions(&reader)
        .find_permission_by_id(permission.id())
        .unwrap()
        .is_none());

    tx.commit().unwrap();

    let committed = store
        .permissions(&reader)
        .find_permission_by_id(permission.id())
        .unwrap()
        .unwrap();
    assert_eq!(committed.title(), "Export all reports");
}

#[test]
fn rolled_back_writes_leave_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("permissions.sqlite3");

    let mut conn = open_db(&path).unwrap();
    let store = store_with_tables(&conn);

    let tx = conn.transaction().unwrap();
    store
        .permissions(&tx)
        .create_permission(&mut Permission::new())
        .unwrap();
    tx.rollback().unwrap();

    assert_eq!(
        store
            .permissions(&conn)
            .count_permissions(&PermissionQuery::new())
            .unwrap(),
        0
    );
}

//! Nested units of work against a real SQLite database

mod common;

use common::{TestDb, local_user};
use devshare_core::contracts::{AdminInit, CreateWorkspace, ListWorkspaces, UpdateWorkspace};
use devshare_core::{RepositoryFactory, UnitOfWork, UserFactory, UserRepository, Workspace, WorkspaceRepository};
use devshare_error::ErrorCode;
use pretty_assertions::assert_eq;

fn admin_init(email: &str) -> AdminInit {
    AdminInit {
        admin_name: "Ada Lovelace".into(),
        admin_email: email.into(),
        admin_password: "Password1!".into(),
        workspace_name: "engine".into(),
        workspace_description: "analytical".into(),
    }
}

#[tokio::test]
async fn nested_commit_persists_once() {
    let db = TestDb::new().await;
    let repo = db.backend.workspaces();
    let mut uow = db.backend.unit_of_work();

    uow.begin().await.unwrap();
    uow.begin().await.unwrap();
    repo.create(&mut uow, &Workspace::new("inner", "", None)).await.unwrap();
    uow.commit().await.unwrap();
    assert!(uow.is_active());
    uow.commit().await.unwrap();

    assert!(!uow.is_active());
    assert_eq!(db.workspace_rows().await, 1);
}

#[tokio::test]
async fn reuse_after_rollback_commits_nothing() {
    let db = TestDb::new().await;
    let repo = db.backend.workspaces();
    let mut uow = db.backend.unit_of_work();

    uow.begin().await.unwrap();
    uow.rollback().await.unwrap();

    uow.begin().await.unwrap();
    repo.create(&mut uow, &Workspace::new("late", "", None)).await.unwrap();
    uow.commit().await.unwrap();

    assert!(!uow.is_active());
    assert!(!uow.is_failed());
    assert_eq!(db.workspace_rows().await, 0);
}

#[tokio::test]
async fn inner_conflict_discards_outer_workspace() {
    let db = TestDb::new().await;
    let services = db.services();
    let users = services.user_service();

    let existing = db.seed_workspace("existing").await;
    let mut setup = db.backend.unit_of_work();
    users
        .create_local_user(&mut setup, local_user("ada@example.com", existing.id))
        .await
        .unwrap();

    // Outer step opens the transaction and writes a workspace; the inner
    // service call joins it and fails on the duplicate email.
    let mut uow = db.backend.unit_of_work();
    let workspace = Workspace::new("doomed", "", None);
    uow.begin().await.unwrap();
    db.backend.workspaces().create(&mut uow, &workspace).await.unwrap();

    let err = users
        .create_local_user(&mut uow, local_user("ada@example.com", workspace.id))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);

    uow.rollback().await.unwrap();

    let mut check = db.backend.unit_of_work();
    let lookup = db.backend.workspaces().get_by_id(&mut check, workspace.id).await;
    assert!(lookup.unwrap_err().is_not_found());
    assert_eq!(db.workspace_rows().await, 1);
}

#[tokio::test]
async fn driver_conflict_inside_nested_step_rolls_back_everything() {
    let db = TestDb::new().await;
    let existing = db.seed_workspace("existing").await;
    let users = db.backend.users();

    let first = UserFactory::create(None, None, "Ada", "ada@example.com", Some("pw-123456"), existing.id).unwrap();
    let mut setup = db.backend.unit_of_work();
    users.create(&mut setup, &first).await.unwrap();

    let mut uow = db.backend.unit_of_work();
    let workspace = Workspace::new("doomed", "", None);
    uow.begin().await.unwrap();
    db.backend.workspaces().create(&mut uow, &workspace).await.unwrap();

    uow.begin().await.unwrap();
    let duplicate = UserFactory::create(None, None, "Eve", "ada@example.com", Some("pw-654321"), workspace.id).unwrap();
    let err = users.create(&mut uow, &duplicate).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.metadata()["operation"], "create_user");

    uow.rollback().await.unwrap();
    assert!(uow.is_failed());
    assert_eq!(uow.commit().await.unwrap_err().message(), "no active transaction");

    assert_eq!(db.workspace_rows().await, 1);
}

#[tokio::test]
async fn initialize_system_creates_linked_admin() {
    let db = TestDb::new().await;
    let admin = db.services().admin_service();
    let mut uow = db.backend.unit_of_work();

    let res = admin
        .initialize_system(&mut uow, admin_init("ada@example.com"))
        .await
        .unwrap();
    assert_eq!(res.message, "System initialized successfully");
    assert_eq!(uow.depth(), 0);

    let mut check = db.backend.unit_of_work();
    let workspace = db.backend.workspaces().get_by_id(&mut check, res.workspace_id).await.unwrap();
    assert_eq!(workspace.admin_id, Some(res.admin_user_id));

    let user = db.backend.users().get_by_id(&mut check, res.admin_user_id).await.unwrap();
    assert_eq!(user.base.workspace_id, res.workspace_id);
    assert!(user.check_password("Password1!"));

    assert!(admin.is_initialized(&mut check).await.unwrap());
}

#[tokio::test]
async fn initialize_system_twice_is_conflict() {
    let db = TestDb::new().await;
    let admin = db.services().admin_service();

    let mut uow = db.backend.unit_of_work();
    admin.initialize_system(&mut uow, admin_init("ada@example.com")).await.unwrap();

    let mut again = db.backend.unit_of_work();
    let err = admin
        .initialize_system(&mut again, admin_init("grace@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "System already initialized");
    assert_eq!(db.workspace_rows().await, 1);
}

#[tokio::test]
async fn workspace_lifecycle() {
    let db = TestDb::new().await;
    let services = db.services();
    let workspaces = services.workspace_service();
    let admin = services.admin_service();

    let mut uow = services.unit_of_work();
    let init = admin.initialize_system(&mut uow, admin_init("ada@example.com")).await.unwrap();
    let admin_id = init.admin_user_id.to_string();

    let created = workspaces
        .create_workspace(
            &mut uow,
            CreateWorkspace {
                name: "frontend".into(),
                description: "ui".into(),
                admin_id: admin_id.clone(),
            },
        )
        .await
        .unwrap();

    let updated = workspaces
        .update_workspace(
            &mut uow,
            UpdateWorkspace {
                id: created.id.to_string(),
                name: Some("frontend-web".into()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "frontend-web");
    assert_eq!(updated.description, "ui");

    let owned = workspaces.get_workspaces_by_admin(&mut uow, &admin_id).await.unwrap();
    assert_eq!(owned.len(), 2);

    let page = workspaces
        .list_workspaces(
            &mut uow,
            ListWorkspaces {
                limit: Some(1),
                sort_by: Some("name".into()),
                order: Some("ASC".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "engine");

    workspaces.delete_workspace(&mut uow, &created.id.to_string()).await.unwrap();
    let err = workspaces
        .get_workspace(&mut uow, &created.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), format!("Workspace not found: {}", created.id));

    let err = workspaces.delete_workspace(&mut uow, &created.id.to_string()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn unknown_admin_is_rejected_by_foreign_key() {
    let db = TestDb::new().await;
    let workspaces = db.services().workspace_service();
    let mut uow = db.backend.unit_of_work();

    let err = workspaces
        .create_workspace(
            &mut uow,
            CreateWorkspace {
                name: "orphan".into(),
                description: String::new(),
                admin_id: uuid::Uuid::new_v4().to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidInput);
    assert_eq!(uow.depth(), 0);
    assert_eq!(db.workspace_rows().await, 0);
}

#[tokio::test]
async fn user_lookups() {
    let db = TestDb::new().await;
    let ws = db.seed_workspace("backend").await;
    let repo = db.backend.users();
    let mut uow = db.backend.unit_of_work();

    let oauth = UserFactory::create(
        Some(devshare_core::OauthProvider::GitHub),
        Some("octocat"),
        "Octo",
        "octo@example.com",
        None,
        ws.id,
    )
    .unwrap();
    repo.create(&mut uow, &oauth).await.unwrap();
    db.services()
        .user_service()
        .create_local_user(&mut uow, local_user("ada@example.com", ws.id))
        .await
        .unwrap();

    let found = repo
        .get_by_oauth_id(&mut uow, devshare_core::OauthProvider::GitHub, "octocat")
        .await
        .unwrap();
    assert_eq!(found.id(), oauth.id());
    assert_eq!(found.credentials, oauth.credentials);

    let by_email = repo.get_by_email(&mut uow, "nobody@example.com").await.unwrap_err();
    assert_eq!(by_email.message(), "User not found with email: nobody@example.com");

    assert_eq!(repo.get_by_workspace_id(&mut uow, ws.id).await.unwrap().len(), 2);
    assert_eq!(repo.count(&mut uow).await.unwrap(), 2);
    let listed = repo
        .list(&mut uow, &devshare_core::ListOptions::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn user_update_and_delete() {
    let db = TestDb::new().await;
    let ws = db.seed_workspace("backend").await;
    let repo = db.backend.users();
    let mut uow = db.backend.unit_of_work();

    let users = db.services().user_service();
    let ada_id = users
        .create_local_user(&mut uow, local_user("ada@example.com", ws.id))
        .await
        .unwrap()
        .id();
    users
        .create_local_user(&mut uow, local_user("grace@example.com", ws.id))
        .await
        .unwrap();

    let mut ada = repo.get_by_id(&mut uow, ada_id).await.unwrap();
    ada.base.name = "Countess Lovelace".into();
    repo.update(&mut uow, &ada).await.unwrap();
    let reloaded = repo.get_by_id(&mut uow, ada_id).await.unwrap();
    assert_eq!(reloaded.base.name, "Countess Lovelace");
    assert_eq!(reloaded.credentials, ada.credentials);

    ada.base.email = "grace@example.com".into();
    let taken = repo.update(&mut uow, &ada).await.unwrap_err();
    assert_eq!(taken.code(), ErrorCode::Conflict);

    repo.delete(&mut uow, ada_id).await.unwrap();
    let gone = repo.delete(&mut uow, ada_id).await.unwrap_err();
    assert_eq!(gone.code(), ErrorCode::NotFound);
    assert_eq!(gone.message(), format!("User not found: {ada_id}"));

    ada.base.email = "ada@example.com".into();
    let missing = repo.update(&mut uow, &ada).await.unwrap_err();
    assert_eq!(missing.code(), ErrorCode::NotFound);
    assert_eq!(repo.count(&mut uow).await.unwrap(), 1);
}

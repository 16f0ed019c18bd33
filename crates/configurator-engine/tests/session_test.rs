//! Integration tests for configurator sessions
//!
//! Drives a session end to end against the in-memory store: loading,
//! selecting, catalog edits with their round trips, and quoting.

use configurator_catalog::{parse_snapshot_json, CatalogError, Category, ConfigOption};
use configurator_core::{
    CategoryId, CategoryType, ConfiguratorId, EditToken, OptionId, Price, SessionConfig, Sku,
};
use configurator_engine::{
    ClearReason, ContactDetails, EngineError, MemoryStore, Session, SessionEvent, StoreError,
};
use std::sync::Arc;

const DESK: &str = r#"{
    "publicId": "desk",
    "name": "Desk",
    "categories": [
        {"id": "color", "name": "Color", "categoryType": "COLOR", "isPrimary": true, "options": [
            {"id": "red", "label": "Red", "price": 0, "sku": "R", "isDefault": true},
            {"id": "blue", "label": "Blue", "price": 20, "sku": "B"}
        ]},
        {"id": "material", "name": "Material", "categoryType": "MATERIAL", "options": [
            {"id": "steel", "label": "Steel", "price": 0, "sku": "S"},
            {"id": "titanium", "label": "Titanium", "price": 50, "sku": "T"}
        ]}
    ],
    "incompatibilities": [{"from": "B", "to": "T"}]
}"#;

fn cat_id(id: &str) -> CategoryId {
    CategoryId::new(id).expect("valid category ID")
}

fn opt_id(id: &str) -> OptionId {
    OptionId::new(id).expect("valid option ID")
}

fn desk_id() -> ConfiguratorId {
    ConfiguratorId::new("desk").expect("valid configurator ID")
}

fn token() -> EditToken {
    EditToken::new("edit-token").expect("valid token")
}

async fn create_session(store: Arc<MemoryStore>) -> Session {
    let mut session = Session::new(store, &SessionConfig::default());
    session.load(&desk_id()).await.expect("load configurator");
    session
}

fn desk_store() -> Arc<MemoryStore> {
    let snapshot = parse_snapshot_json(DESK, "desk").expect("parse snapshot");
    Arc::new(MemoryStore::with_snapshot(snapshot))
}

#[tokio::test]
async fn test_end_to_end_selection_flow() {
    let mut session = create_session(desk_store()).await;

    // Defaults: primary takes its default, non-primary its first free option
    assert_eq!(session.selection().get(&cat_id("color")), Some(&opt_id("red")));
    assert_eq!(
        session.selection().get(&cat_id("material")),
        Some(&opt_id("steel"))
    );
    assert_eq!(session.calculate_total(), Price::ZERO);

    let cleared = session
        .select_option(cat_id("color"), opt_id("blue"))
        .expect("select blue");
    assert!(cleared.is_empty());
    assert_eq!(session.calculate_total().to_string(), "20.00");

    let cleared = session
        .select_option(cat_id("material"), opt_id("titanium"))
        .expect("select titanium");
    assert_eq!(cleared.len(), 1);
    assert_eq!(cleared[0].category_id, cat_id("material"));
    assert_eq!(
        cleared[0].reason,
        ClearReason::Conflict {
            with: cat_id("color")
        }
    );

    assert_eq!(session.selection().get(&cat_id("color")), Some(&opt_id("blue")));
    assert!(session.selection().get(&cat_id("material")).is_none());
    assert_eq!(session.calculate_total(), Price::from_cents(2000));
}

#[tokio::test]
async fn test_cleared_selections_are_published() {
    let mut session = create_session(desk_store()).await;
    session
        .select_option(cat_id("color"), opt_id("blue"))
        .expect("select blue");

    let mut rx = session.subscribe();
    session
        .select_option(cat_id("material"), opt_id("titanium"))
        .expect("select titanium");

    let mut saw_cleared = false;
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::SelectionsCleared { cleared } = event {
            assert_eq!(cleared[0].category_id, cat_id("material"));
            saw_cleared = true;
        }
    }
    assert!(saw_cleared, "expected a SelectionsCleared event");
}

#[tokio::test]
async fn test_deselect_optional_category() {
    let mut session = create_session(desk_store()).await;
    session
        .select_option(cat_id("material"), opt_id("titanium"))
        .expect("select titanium");
    assert_eq!(session.calculate_total(), Price::from_cents(5000));

    let mut rx = session.subscribe();
    session
        .clear_selection(cat_id("material"))
        .expect("clear material");

    assert!(!session.selection().is_selected(&cat_id("material")));
    assert_eq!(session.calculate_total(), Price::ZERO);
    assert!(!session.is_option_blocked(&cat_id("color"), &opt_id("blue")));

    let mut saw_change = false;
    while let Ok(event) = rx.try_recv() {
        assert!(!matches!(event, SessionEvent::SelectionsCleared { .. }));
        if let SessionEvent::SelectionChanged { selection } = event {
            assert!(!selection.contains_key("material"));
            saw_change = true;
        }
    }
    assert!(saw_change, "expected a SelectionChanged event");

    // Deselecting again changes nothing
    session
        .clear_selection(cat_id("material"))
        .expect("clear material again");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_clear_notifications_can_be_disabled() {
    let snapshot = parse_snapshot_json(DESK, "desk").expect("parse snapshot");
    let config = SessionConfig {
        notify_on_clear: false,
        ..SessionConfig::default()
    };
    let mut session = Session::new(Arc::new(MemoryStore::with_snapshot(snapshot)), &config);
    session.load(&desk_id()).await.expect("load configurator");
    session
        .select_option(cat_id("color"), opt_id("blue"))
        .expect("select blue");

    let mut rx = session.subscribe();
    let cleared = session
        .select_option(cat_id("material"), opt_id("titanium"))
        .expect("select titanium");
    assert_eq!(cleared.len(), 1);

    while let Ok(event) = rx.try_recv() {
        assert!(!matches!(event, SessionEvent::SelectionsCleared { .. }));
    }
}

#[tokio::test]
async fn test_admin_edit_requires_token() {
    let store = desk_store();
    let mut session = create_session(Arc::clone(&store)).await;

    let result = session
        .delete_option(cat_id("material"), opt_id("steel"))
        .await;
    assert!(matches!(result, Err(EngineError::MissingCredential)));
    assert_eq!(store.calls(), vec!["fetch_configurator"]);
}

#[tokio::test]
async fn test_invalid_edit_rejected_before_round_trip() {
    let store = desk_store();
    let mut session = create_session(Arc::clone(&store)).await.with_token(token());

    let duplicate = ConfigOption::new(opt_id("red"), "Red again", Price::ZERO);
    let result = session.add_option(cat_id("color"), duplicate).await;
    assert!(matches!(
        result,
        Err(EngineError::Catalog(CatalogError::DuplicateOption { .. }))
    ));

    let retyped = Category::new(cat_id("color"), "Color").with_type(CategoryType::Finish);
    let result = session.update_category(retyped).await;
    assert!(matches!(
        result,
        Err(EngineError::Catalog(CatalogError::CategoryTypeLocked { .. }))
    ));

    assert_eq!(store.calls(), vec!["fetch_configurator"]);
}

#[tokio::test]
async fn test_store_failure_leaves_state_unchanged() {
    let store = desk_store();
    let mut session = create_session(Arc::clone(&store)).await.with_token(token());
    let before_catalog = session.catalog().clone();
    let before_selection = session.selection().clone();

    store.fail_next(StoreError::Rejected {
        message: "option is referenced by a quote".to_string(),
        code: Some("CONFLICT".to_string()),
    });
    let result = session
        .delete_option(cat_id("material"), opt_id("steel"))
        .await;

    assert!(matches!(
        result,
        Err(EngineError::Store(StoreError::Rejected { .. }))
    ));
    assert_eq!(session.catalog(), &before_catalog);
    assert_eq!(session.selection(), &before_selection);
}

#[tokio::test]
async fn test_admin_edits_apply_after_round_trip() {
    let store = desk_store();
    let mut session = create_session(Arc::clone(&store)).await.with_token(token());
    session
        .select_option(cat_id("color"), opt_id("blue"))
        .expect("select blue");

    // A new material option sharing Titanium's SKU is blocked by Blue
    let carbon = ConfigOption::new(opt_id("carbon"), "Carbon", Price::from_cents(3000))
        .with_sku(Sku::new("T").expect("valid SKU"));
    session
        .add_option(cat_id("material"), carbon)
        .await
        .expect("add option");
    assert!(session.is_option_blocked(&cat_id("material"), &opt_id("carbon")));

    // Deleting the selected color orphans it
    let cleared = session
        .delete_option(cat_id("color"), opt_id("blue"))
        .await
        .expect("delete option");
    assert_eq!(cleared.len(), 1);
    assert_eq!(cleared[0].reason, ClearReason::Orphaned);
    assert!(!session.is_option_blocked(&cat_id("material"), &opt_id("carbon")));

    session
        .add_category(Category::new(cat_id("finish"), "Finish"))
        .await
        .expect("add category");
    session
        .delete_category(cat_id("material"))
        .await
        .expect("delete category");

    assert_eq!(
        store.calls(),
        vec![
            "fetch_configurator",
            "create_option",
            "delete_option",
            "create_category",
            "delete_category",
        ]
    );
    let ids: Vec<&str> = session
        .catalog()
        .categories()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, vec!["color", "finish"]);
    assert!(session.selection().get(&cat_id("material")).is_none());
}

#[tokio::test]
async fn test_submit_quote() {
    let store = desk_store();
    let mut session = create_session(Arc::clone(&store)).await;
    session
        .select_option(cat_id("color"), opt_id("blue"))
        .expect("select blue");

    let invalid = session
        .submit_quote(ContactDetails::new("Ada", "not-an-email"))
        .await;
    assert!(matches!(invalid, Err(EngineError::Validation(_))));

    let receipt = session
        .submit_quote(ContactDetails::new("Ada", "ada@example.com"))
        .await
        .expect("submit quote");
    assert_eq!(receipt.quote_code, "Q-000001");

    let quotes = store.quotes();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].snapshot.total_price, Price::from_cents(2000));
    assert_eq!(quotes[0].snapshot.items.len(), 2);
}

#[tokio::test]
async fn test_submit_quote_requires_required_categories() {
    let snapshot = parse_snapshot_json(
        r#"{
            "publicId": "desk",
            "categories": [
                {"id": "engraving", "name": "Engraving", "isRequired": true, "options": [
                    {"id": "initials", "label": "Initials", "price": 15}
                ]}
            ]
        }"#,
        "desk",
    )
    .expect("parse snapshot");
    let mut session = Session::new(
        Arc::new(MemoryStore::with_snapshot(snapshot)),
        &SessionConfig::default(),
    );
    session.load(&desk_id()).await.expect("load configurator");

    let result = session
        .submit_quote(ContactDetails::new("Ada", "ada@example.com"))
        .await;
    assert!(matches!(
        result,
        Err(EngineError::IncompleteSelection { .. })
    ));

    session
        .select_option(cat_id("engraving"), opt_id("initials"))
        .expect("select initials");
    assert!(session
        .submit_quote(ContactDetails::new("Ada", "ada@example.com"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_load_unknown_configurator() {
    let mut session = Session::new(desk_store(), &SessionConfig::default());
    let result = session
        .load(&ConfiguratorId::new("lamp").expect("valid configurator ID"))
        .await;
    assert!(matches!(
        result,
        Err(EngineError::Store(StoreError::NotFound { .. }))
    ));
    assert!(session.catalog().is_empty());
}

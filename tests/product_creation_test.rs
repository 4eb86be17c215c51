mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tower::ServiceExt;

use common::{create_company, create_warehouse, TestApp};
use stockwatch_api::{
    entities::{inventory, inventory_history, product},
    errors::ServiceError,
    services::products::CreateProductWithStock,
};

fn input(sku: &str) -> CreateProductWithStock {
    CreateProductWithStock {
        name: "Widget".to_string(),
        sku: sku.to_string(),
        price: "19.99".to_string(),
        reorder_threshold: None,
        warehouse_id: None,
        initial_quantity: None,
    }
}

#[tokio::test]
async fn creates_product_with_inventory_and_history() {
    let app = TestApp::new().await;
    let company = create_company(&app.state, "Acme").await;
    let warehouse = create_warehouse(&app.state, company.id, "Main").await;

    let product_id = app
        .state
        .services
        .products
        .create_product_with_stock(CreateProductWithStock {
            name: "  Widget  ".to_string(),
            sku: "  widget-001 ".to_string(),
            price: "19.99".to_string(),
            reorder_threshold: Some(12),
            warehouse_id: Some(warehouse.id),
            initial_quantity: Some(7),
        })
        .await
        .expect("creation should succeed");

    let db = app.state.db.as_ref();

    let stored = product::Entity::find_by_id(product_id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Widget");
    assert_eq!(stored.sku, "WIDGET-001");
    assert_eq!(stored.price, dec!(19.99));
    assert_eq!(stored.reorder_threshold, 12);

    let inventory_row = inventory::Entity::find()
        .filter(inventory::Column::ProductId.eq(product_id))
        .one(db)
        .await
        .unwrap()
        .expect("inventory row should exist");
    assert_eq!(inventory_row.warehouse_id, warehouse.id);
    assert_eq!(inventory_row.quantity, 7);

    let history = inventory_history::Entity::find()
        .filter(inventory_history::Column::InventoryId.eq(inventory_row.id))
        .all(db)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_amount, 7);
    assert_eq!(history[0].reason.as_deref(), Some("Initial stock"));
}

#[tokio::test]
async fn product_without_warehouse_creates_no_inventory() {
    let app = TestApp::new().await;

    let product_id = app
        .state
        .services
        .products
        .create_product_with_stock(input("SOLO-1"))
        .await
        .unwrap();

    let count = inventory::Entity::find()
        .filter(inventory::Column::ProductId.eq(product_id))
        .count(app.state.db.as_ref())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn zero_initial_quantity_creates_inventory_without_history() {
    let app = TestApp::new().await;
    let company = create_company(&app.state, "Acme").await;
    let warehouse = create_warehouse(&app.state, company.id, "Main").await;

    let mut req = input("ZERO-1");
    req.warehouse_id = Some(warehouse.id);
    req.initial_quantity = Some(0);

    let product_id = app
        .state
        .services
        .products
        .create_product_with_stock(req)
        .await
        .unwrap();

    let db = app.state.db.as_ref();
    let inventory_row = inventory::Entity::find()
        .filter(inventory::Column::ProductId.eq(product_id))
        .one(db)
        .await
        .unwrap()
        .expect("inventory row should exist");
    assert_eq!(inventory_row.quantity, 0);

    let history_count = inventory_history::Entity::find()
        .filter(inventory_history::Column::InventoryId.eq(inventory_row.id))
        .count(db)
        .await
        .unwrap();
    assert_eq!(history_count, 0);
}

#[tokio::test]
async fn duplicate_sku_differing_by_case_and_whitespace_conflicts() {
    let app = TestApp::new().await;
    let service = &app.state.services.products;

    service.create_product_with_stock(input("sku-42")).await.unwrap();

    for variant in [" SKU-42", "Sku-42", "  sku-42  "] {
        let err = service
            .create_product_with_stock(input(variant))
            .await
            .expect_err("duplicate should be rejected");
        assert!(matches!(err, ServiceError::Conflict(_)), "variant {variant:?}");
    }

    let count = product::Entity::find()
        .filter(product::Column::Sku.eq("SKU-42"))
        .count(app.state.db.as_ref())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn racing_creates_of_same_sku_leave_exactly_one_product() {
    let app = TestApp::new().await;
    let service = app.state.services.products.clone();
    let other = service.clone();

    let (a, b) = tokio::join!(
        service.create_product_with_stock(input("race-77")),
        other.create_product_with_stock(input(" RACE-77 ")),
    );

    let outcomes = [a, b];
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one create must commit");
    assert!(
        outcomes
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, ServiceError::Conflict(_))),
        "the losing create must surface Conflict, not a storage error"
    );

    let count = product::Entity::find()
        .filter(product::Column::Sku.eq("RACE-77"))
        .count(app.state.db.as_ref())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn failed_create_leaves_no_partial_rows() {
    let app = TestApp::new().await;
    let service = &app.state.services.products;

    service.create_product_with_stock(input("ATOMIC-1")).await.unwrap();

    let mut dup = input("atomic-1");
    dup.warehouse_id = None;
    dup.initial_quantity = None;
    let err = service.create_product_with_stock(dup).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let db = app.state.db.as_ref();
    assert_eq!(product::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(inventory::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(inventory_history::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_warehouse_is_not_found() {
    let app = TestApp::new().await;

    let mut req = input("WH-MISSING");
    req.warehouse_id = Some(4242);
    let err = app
        .state
        .services
        .products
        .create_product_with_stock(req)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // Nothing committed
    let count = product::Entity::find().count(app.state.db.as_ref()).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn invalid_inputs_are_rejected_before_any_write() {
    let app = TestApp::new().await;
    let service = &app.state.services.products;

    let cases: Vec<CreateProductWithStock> = vec![
        CreateProductWithStock {
            name: "   ".to_string(),
            ..input("EMPTY-NAME")
        },
        CreateProductWithStock {
            sku: "   ".to_string(),
            ..input("ignored")
        },
        CreateProductWithStock {
            price: "not-a-price".to_string(),
            ..input("BAD-PRICE")
        },
        CreateProductWithStock {
            price: "-3.50".to_string(),
            ..input("NEG-PRICE")
        },
        CreateProductWithStock {
            reorder_threshold: Some(-1),
            ..input("NEG-THRESHOLD")
        },
        CreateProductWithStock {
            // initial quantity without a warehouse
            initial_quantity: Some(5),
            ..input("QTY-NO-WH")
        },
    ];

    for case in cases {
        let label = case.sku.clone();
        let err = service
            .create_product_with_stock(case)
            .await
            .expect_err("invalid input should be rejected");
        assert!(
            matches!(err, ServiceError::InvalidInput(_)),
            "case {label:?} returned {err:?}"
        );
    }

    let mut negative_qty = input("NEG-QTY");
    let company = create_company(&app.state, "Acme").await;
    let warehouse = create_warehouse(&app.state, company.id, "Main").await;
    negative_qty.warehouse_id = Some(warehouse.id);
    negative_qty.initial_quantity = Some(-3);
    let err = service
        .create_product_with_stock(negative_qty)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let count = product::Entity::find().count(app.state.db.as_ref()).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn price_is_quantized_with_bankers_rounding() {
    let app = TestApp::new().await;

    let mut req = input("ROUND-1");
    req.price = "2.675".to_string();
    let product_id = app
        .state
        .services
        .products
        .create_product_with_stock(req)
        .await
        .unwrap();

    let stored = product::Entity::find_by_id(product_id)
        .one(app.state.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.price, dec!(2.68));
}

#[tokio::test]
async fn create_product_endpoint_round_trip() {
    let app = TestApp::new().await;
    let company = create_company(&app.state, "Acme").await;
    let warehouse = create_warehouse(&app.state, company.id, "Main").await;

    let body = serde_json::json!({
        "name": "Widget",
        "sku": "http-001",
        "price": 19.99,
        "warehouse_id": warehouse.id,
        "initial_quantity": 3,
    });

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "Product created");
    assert!(json["product_id"].is_i64());

    // The same SKU again maps the conflict to 409
    let dup = serde_json::json!({
        "name": "Widget",
        "sku": "HTTP-001",
        "price": "19.99",
    });
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header("content-type", "application/json")
                .body(Body::from(dup.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

//! End-to-end checkout scenarios driven entirely through bus events.

use checkout::{
    CheckoutError, FlowState, InMemoryOrderTransport, InMemoryProductSource, RecordingViewSink,
    Storefront, ViewCall,
};
use domain::{DraftField, Money, PaymentMethod, Product, ProductId, StoreEvent};

type TestStorefront =
    Storefront<InMemoryProductSource, InMemoryOrderTransport, RecordingViewSink>;

fn product(id: &str, price: Option<i64>) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        description: format!("Description of {id}"),
        image: format!("{id}.png"),
        category: "misc".to_string(),
        price: price.map(Money::from_cents),
    }
}

fn setup(
    products: Vec<Product>,
) -> (
    TestStorefront,
    InMemoryProductSource,
    InMemoryOrderTransport,
    RecordingViewSink,
) {
    let source = InMemoryProductSource::with_products(products);
    let transport = InMemoryOrderTransport::new();
    let sink = RecordingViewSink::new();
    let store = Storefront::new(source.clone(), transport.clone(), sink.clone());
    (store, source, transport, sink)
}

fn catalog() -> Vec<Product> {
    vec![
        product("a", Some(1000)),
        product("b", Some(2500)),
        product("free", None),
    ]
}

async fn add_to_cart(store: &mut TestStorefront, id: &str) {
    store
        .dispatch(StoreEvent::ProductCardClicked {
            id: ProductId::new(id),
        })
        .await;
    store
        .dispatch(StoreEvent::AddToCartClicked {
            id: ProductId::new(id),
        })
        .await;
}

#[tokio::test]
async fn test_full_checkout_walkthrough() {
    let (mut store, _, transport, sink) = setup(catalog());
    store.start().await.unwrap();
    assert!(sink.any(|c| matches!(c, ViewCall::Catalog { count: 3 })));

    // Browse and collect two products.
    add_to_cart(&mut store, "a").await;
    add_to_cart(&mut store, "b").await;
    assert_eq!(store.cart().count(), 2);
    assert!(sink.any(|c| matches!(c, ViewCall::CartBadge { count: 2 })));

    // Open the cart and request checkout.
    store.dispatch(StoreEvent::CartIconClicked).await;
    assert!(sink.any(|c| matches!(
        c,
        ViewCall::CartView { count: 2, checkout_enabled: true, .. }
    )));
    store.dispatch(StoreEvent::CheckoutClicked).await;
    assert_eq!(store.flow().state(), FlowState::OrderDetails);

    // Fill the two steps.
    store
        .dispatch(StoreEvent::OrderStepSubmitted {
            payment: PaymentMethod::Card,
            address: "10 Main St".to_string(),
        })
        .await;
    assert_eq!(store.flow().state(), FlowState::ContactDetails);

    store
        .dispatch(StoreEvent::ContactStepSubmitted {
            email: "buyer@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
        })
        .await;
    assert_eq!(store.flow().state(), FlowState::Success);

    // The transport saw exactly the assembled request.
    let request = transport.last_request().unwrap();
    assert_eq!(request.payment, PaymentMethod::Card);
    assert_eq!(request.address, "10 Main St");
    assert_eq!(request.email, "buyer@example.com");
    assert_eq!(request.phone, "+1 555 0100");
    assert_eq!(request.total, Money::from_cents(3500));
    assert_eq!(
        request.items,
        vec![ProductId::new("a"), ProductId::new("b")]
    );
    assert!(sink.any(|c| matches!(
        c,
        ViewCall::Success { order_id, total }
            if order_id == "ORD-0001" && *total == Money::from_cents(3500)
    )));

    // Acknowledging clears cart and draft and returns to idle.
    store.dispatch(StoreEvent::SuccessAcknowledged).await;
    assert_eq!(store.flow().state(), FlowState::Idle);
    assert!(store.cart().is_empty());
    assert_eq!(store.draft().snapshot(), domain::DraftData::default());
    assert!(sink.any(|c| matches!(c, ViewCall::CartBadge { count: 0 })));
}

#[tokio::test]
async fn test_catalog_load_failure_leaves_catalog_empty() {
    let (mut store, source, _, sink) = setup(catalog());
    source.set_fail_on_fetch(true);

    let result = store.start().await;

    assert!(matches!(result, Err(CheckoutError::LoadFailed(_))));
    assert!(store.catalog().is_empty());
    assert!(sink.any(|c| matches!(c, ViewCall::Failure { .. })));

    // Retry succeeds and renders the catalog.
    source.set_fail_on_fetch(false);
    store.start().await.unwrap();
    assert_eq!(store.catalog().len(), 3);
    assert!(sink.any(|c| matches!(c, ViewCall::Catalog { count: 3 })));
}

#[tokio::test]
async fn test_preview_shows_cart_membership_and_purchasability() {
    let (mut store, _, _, sink) = setup(catalog());
    store.start().await.unwrap();

    store
        .dispatch(StoreEvent::ProductCardClicked {
            id: ProductId::new("free"),
        })
        .await;

    assert!(sink.any(|c| matches!(
        c,
        ViewCall::Preview { id, in_cart: false, purchasable: false } if id.as_str() == "free"
    )));
}

#[tokio::test]
async fn test_priceless_product_never_reaches_cart() {
    let (mut store, _, _, _) = setup(catalog());
    store.start().await.unwrap();

    add_to_cart(&mut store, "free").await;

    assert!(store.cart().is_empty());
}

#[tokio::test]
async fn test_removing_from_open_cart_rerenders_in_place() {
    let (mut store, _, _, sink) = setup(catalog());
    store.start().await.unwrap();
    add_to_cart(&mut store, "a").await;
    add_to_cart(&mut store, "b").await;

    store.dispatch(StoreEvent::CartIconClicked).await;
    sink.reset();

    store
        .dispatch(StoreEvent::RemoveFromCartClicked {
            id: ProductId::new("a"),
        })
        .await;

    assert_eq!(store.flow().state(), FlowState::CartView);
    assert!(sink.any(|c| matches!(
        c,
        ViewCall::CartView { count: 1, total, checkout_enabled: true }
            if *total == Money::from_cents(2500)
    )));
}

#[tokio::test]
async fn test_emptying_open_cart_disables_checkout() {
    let (mut store, _, _, sink) = setup(catalog());
    store.start().await.unwrap();
    add_to_cart(&mut store, "a").await;

    store.dispatch(StoreEvent::CartIconClicked).await;
    store
        .dispatch(StoreEvent::RemoveFromCartClicked {
            id: ProductId::new("a"),
        })
        .await;

    assert!(sink.any(|c| matches!(
        c,
        ViewCall::CartView { count: 0, checkout_enabled: false, .. }
    )));

    // The checkout gate refuses the empty cart; the state holds.
    store.dispatch(StoreEvent::CheckoutClicked).await;
    assert_eq!(store.flow().state(), FlowState::CartView);
}

#[tokio::test]
async fn test_field_inputs_drive_live_validation() {
    let (mut store, _, _, sink) = setup(catalog());
    store.start().await.unwrap();
    add_to_cart(&mut store, "a").await;
    store.dispatch(StoreEvent::CartIconClicked).await;
    store.dispatch(StoreEvent::CheckoutClicked).await;

    // Fresh order step: both fields missing, not ready.
    assert!(sink.any(|c| matches!(
        c,
        ViewCall::OrderForm { ready: false, errors, .. }
            if errors.contains(DraftField::Payment) && errors.contains(DraftField::Address)
    )));
    sink.reset();

    store
        .dispatch(StoreEvent::PaymentInput {
            method: PaymentMethod::Cash,
        })
        .await;
    assert!(sink.any(|c| matches!(
        c,
        ViewCall::OrderForm { ready: false, errors, .. }
            if !errors.contains(DraftField::Payment) && errors.contains(DraftField::Address)
    )));
    sink.reset();

    store
        .dispatch(StoreEvent::AddressInput {
            address: "10 Main St".to_string(),
        })
        .await;
    assert!(sink.any(|c| matches!(c, ViewCall::OrderForm { ready: true, errors, .. } if errors.is_empty())));
}

#[tokio::test]
async fn test_abandonment_preserves_draft_for_resume() {
    let (mut store, _, _, sink) = setup(catalog());
    store.start().await.unwrap();
    add_to_cart(&mut store, "a").await;
    store.dispatch(StoreEvent::CartIconClicked).await;
    store.dispatch(StoreEvent::CheckoutClicked).await;
    store
        .dispatch(StoreEvent::OrderStepSubmitted {
            payment: PaymentMethod::Card,
            address: "10 Main St".to_string(),
        })
        .await;

    // Abandon mid-checkout.
    store.dispatch(StoreEvent::ViewClosed).await;
    assert_eq!(store.flow().state(), FlowState::Idle);
    assert_eq!(store.cart().count(), 1);

    // Resume: the order step reopens already valid and prefilled.
    sink.reset();
    store.dispatch(StoreEvent::CartIconClicked).await;
    store.dispatch(StoreEvent::CheckoutClicked).await;

    assert!(sink.any(|c| matches!(
        c,
        ViewCall::OrderForm { ready: true, draft, .. }
            if draft.payment == Some(PaymentMethod::Card) && draft.address == "10 Main St"
    )));
}

#[tokio::test]
async fn test_submission_failure_allows_retry_without_reentry() {
    let (mut store, _, transport, sink) = setup(catalog());
    store.start().await.unwrap();
    add_to_cart(&mut store, "a").await;
    store.dispatch(StoreEvent::CartIconClicked).await;
    store.dispatch(StoreEvent::CheckoutClicked).await;
    store
        .dispatch(StoreEvent::OrderStepSubmitted {
            payment: PaymentMethod::Cash,
            address: "10 Main St".to_string(),
        })
        .await;

    transport.set_fail_on_submit(true);
    store
        .dispatch(StoreEvent::ContactStepSubmitted {
            email: "buyer@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
        })
        .await;

    assert_eq!(store.flow().state(), FlowState::ContactDetails);
    assert_eq!(store.cart().count(), 1);
    assert!(sink.any(|c| matches!(c, ViewCall::Failure { .. })));

    // The contact form still holds the entered data; one more submit
    // succeeds without retyping anything.
    transport.set_fail_on_submit(false);
    sink.reset();
    store
        .dispatch(StoreEvent::ContactStepSubmitted {
            email: "buyer@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
        })
        .await;

    assert_eq!(store.flow().state(), FlowState::Success);
    assert_eq!(transport.accepted_count(), 1);
    assert!(sink.any(|c| matches!(c, ViewCall::Success { .. })));
}

#[tokio::test]
async fn test_second_order_starts_from_clean_state() {
    let (mut store, _, transport, sink) = setup(catalog());
    store.start().await.unwrap();

    for expected_id in ["ORD-0001", "ORD-0002"] {
        sink.reset();
        add_to_cart(&mut store, "a").await;
        store.dispatch(StoreEvent::CartIconClicked).await;
        store.dispatch(StoreEvent::CheckoutClicked).await;
        store
            .dispatch(StoreEvent::OrderStepSubmitted {
                payment: PaymentMethod::Card,
                address: "10 Main St".to_string(),
            })
            .await;
        store
            .dispatch(StoreEvent::ContactStepSubmitted {
                email: "buyer@example.com".to_string(),
                phone: "+1 555 0100".to_string(),
            })
            .await;
        assert_eq!(store.flow().state(), FlowState::Success);
        assert!(sink.any(|c| matches!(
            c,
            ViewCall::Success { order_id, .. } if order_id == expected_id
        )));
        store.dispatch(StoreEvent::SuccessAcknowledged).await;

        let last = transport.last_request().unwrap();
        assert_eq!(last.total, Money::from_cents(1000));
    }
    assert_eq!(transport.accepted_count(), 2);
}

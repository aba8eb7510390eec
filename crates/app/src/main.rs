//! Storefront demo entry point.
//!
//! Wires the composition root with in-memory collaborators and walks a
//! complete checkout: browse, collect a cart, fill both form steps,
//! submit, acknowledge. Failure paths can be simulated via env flags.

mod config;
mod console;

use checkout::{InMemoryOrderTransport, InMemoryProductSource, Storefront};
use domain::{Money, PaymentMethod, Product, ProductId, StoreEvent};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::Config;
use console::ConsoleView;

fn seed_products() -> Vec<Product> {
    let entry = |id: &str, title: &str, category: &str, price: Option<i64>| Product {
        id: ProductId::new(id),
        title: title.to_string(),
        description: format!("{title} from the demo catalog"),
        image: format!("{id}.png"),
        category: category.to_string(),
        price: price.map(Money::from_cents),
    };

    vec![
        entry("aurora-lamp", "Aurora Desk Lamp", "home", Some(4900)),
        entry("field-mug", "Field Mug", "kitchen", Some(1800)),
        entry("trail-bottle", "Trail Bottle", "outdoor", Some(2400)),
        entry("pine-notebook", "Pine Notebook", "stationery", Some(900)),
        entry("sample-sticker", "Sample Sticker", "stationery", None),
    ]
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Build collaborators and the composition root
    let source = InMemoryProductSource::with_products(seed_products());
    let transport = InMemoryOrderTransport::new();
    if config.fail_catalog {
        source.set_fail_on_fetch(true);
    }
    if config.fail_submission {
        transport.set_fail_on_submit(true);
    }

    let mut store = Storefront::new(source, transport.clone(), ConsoleView);

    // 4. Load the catalog
    if store.start().await.is_err() {
        tracing::warn!("continuing with an empty catalog");
    }

    // 5. Walk a full checkout
    store
        .dispatch(StoreEvent::ProductCardClicked {
            id: ProductId::new("aurora-lamp"),
        })
        .await;
    store
        .dispatch(StoreEvent::AddToCartClicked {
            id: ProductId::new("aurora-lamp"),
        })
        .await;
    store
        .dispatch(StoreEvent::ProductCardClicked {
            id: ProductId::new("field-mug"),
        })
        .await;
    store
        .dispatch(StoreEvent::AddToCartClicked {
            id: ProductId::new("field-mug"),
        })
        .await;

    // A priceless product is refused by the workflow.
    store
        .dispatch(StoreEvent::ProductCardClicked {
            id: ProductId::new("sample-sticker"),
        })
        .await;
    store
        .dispatch(StoreEvent::AddToCartClicked {
            id: ProductId::new("sample-sticker"),
        })
        .await;
    store.dispatch(StoreEvent::ViewClosed).await;

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
    store.dispatch(StoreEvent::SuccessAcknowledged).await;

    tracing::info!(
        accepted_orders = transport.accepted_count(),
        cart_items = store.cart().count(),
        state = %store.flow().state(),
        "walkthrough finished"
    );

    // 6. Dump collected metrics
    println!("{}", metrics_handle.render());
}

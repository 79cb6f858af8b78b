use crate::commands::engine_storage;

pub async fn run(id: String) {
    let storage = engine_storage();
    let mut products = storage.load_products().await;

    let before = products.len();
    products.retain(|p| p.id != id);
    if products.len() == before {
        eprintln!("⚠️  No product with id {}", id);
        return;
    }

    if let Err(e) = storage.save_products(&products).await {
        eprintln!("❌ Failed to save product list: {}", e);
        std::process::exit(1);
    }

    // The tracking record goes with its product
    let mut tracking = storage.load_tracking().await;
    if tracking.remove(&id).is_some() {
        if let Err(e) = storage.save_tracking(&tracking).await {
            eprintln!("❌ Failed to save tracking map: {}", e);
            std::process::exit(1);
        }
    }

    println!("🗑️  Removed {} ({} still tracked)", id, products.len());
}

use crate::commands::engine_storage;
use crate::models::Product;
use crate::utils::generate_product_id;

pub async fn run(url: String, title: String, price: String) {
    let storage = engine_storage();
    let mut products = storage.load_products().await;

    if products.iter().any(|p| p.url == url) {
        eprintln!("⚠️  Already tracking {}", url);
        return;
    }

    let product = Product::new(generate_product_id(), title, url, price);
    let id = product.id.clone();
    products.push(product);

    match storage.save_products(&products).await {
        Ok(()) => {
            println!("✅ Saved as {} ({} tracked)", id, products.len());
        }
        Err(e) => {
            eprintln!("❌ Failed to save product: {}", e);
            std::process::exit(1);
        }
    }
}

use crate::commands::engine_storage;

pub async fn run() {
    let storage = engine_storage();
    let products = storage.load_products().await;

    if products.is_empty() {
        println!("⚠️  No products saved. Add one with 'pricewatch add'.");
        return;
    }

    let tracking = storage.load_tracking().await;

    println!("📊 Tracking {} product(s)\n", products.len());

    for product in &products {
        println!("🔹 {}  {}", product.id, product.title);
        println!("   {}", product.url);
        let saved_price = if product.price.is_empty() {
            "(none)"
        } else {
            product.price.as_str()
        };
        println!("   Saved price: {}", saved_price);

        match tracking.get(&product.id) {
            Some(record) => {
                println!(
                    "   Last check:  {}  ({:.2}, unchanged {}x, {} history entries)",
                    record.last_check_time.format("%Y-%m-%d %H:%M"),
                    record.last_price,
                    record.same_count,
                    record.history.len()
                );
            }
            None => {
                println!("   Last check:  never");
            }
        }
        println!();
    }
}

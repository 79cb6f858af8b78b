use crate::cli::EngineArgs;
use crate::commands::{build_coordinator, tracker_config};

pub async fn run(engine: EngineArgs) {
    let coordinator = match build_coordinator(tracker_config(&engine)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to start engine: {}", e);
            std::process::exit(1);
        }
    };

    println!("🔍 Checking saved products...\n");
    let results = coordinator.run_cycle().await;

    if results.is_empty() {
        println!("⚠️  No products saved. Add one with 'pricewatch add'.");
        return;
    }

    for result in &results {
        if !result.success {
            println!(
                "❌ {}  check failed: {}",
                result.product_id,
                result.error.as_deref().unwrap_or("unknown error")
            );
        } else if result.dropped {
            println!(
                "📉 {}  {:.2} → {:.2} (saved {:.2})",
                result.product_id, result.original_price, result.current_price, result.difference
            );
        } else if result.changed {
            println!(
                "📈 {}  {:.2} → {:.2}",
                result.product_id, result.original_price, result.current_price
            );
        } else {
            println!("➖ {}  {:.2} unchanged", result.product_id, result.current_price);
        }
    }

    let failed = results.iter().filter(|r| !r.success).count();
    println!(
        "\n✅ Checked {} product(s), {} failed",
        results.len(),
        failed
    );
}

use crate::commands::engine_storage;
use crate::constants::DEFAULT_MAX_HISTORY;
use crate::services::HistoryStore;

pub async fn run(id: String) {
    let store = HistoryStore::new(engine_storage(), DEFAULT_MAX_HISTORY);
    let history = store.get(&id).await;

    if history.is_empty() {
        println!("⚠️  No checks recorded yet for {}", id);
        return;
    }

    println!("📈 Price history for {} (oldest first)\n", id);
    for entry in &history {
        let marker = if entry.dropped { "📉" } else { "  " };
        println!(
            "{} {}  {:.2}",
            marker,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.price
        );
    }
}

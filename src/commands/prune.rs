use crate::commands::engine_storage;
use crate::constants::DEFAULT_MAX_HISTORY;
use crate::services::HistoryStore;

pub async fn run(id: String, days: i64) {
    let store = HistoryStore::new(engine_storage(), DEFAULT_MAX_HISTORY);

    match store.prune(&id, days).await {
        Ok(()) => {
            let remaining = store.get(&id).await.len();
            println!(
                "🧹 Pruned history of {} to the last {} days ({} entries kept)",
                id, days, remaining
            );
        }
        Err(e) => {
            eprintln!("❌ Prune failed: {}", e);
            std::process::exit(1);
        }
    }
}

pub mod change_detector;
pub mod coordinator;
pub mod extraction;
pub mod history_store;
pub mod notify;
pub mod price_parser;
pub mod storage;

pub use coordinator::TrackingCoordinator;
pub use extraction::{HttpPageFetcher, PageFetcher, PageHandle};
pub use history_store::HistoryStore;
pub use notify::{AlertEvaluator, LogNotifier, Notifier};
pub use storage::{EngineStorage, JsonFileStore, KeyValueStore};

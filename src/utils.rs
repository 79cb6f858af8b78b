use std::path::PathBuf;

/// Get data directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var("PRICEWATCH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("pricewatch_data"))
}

/// Generate a product id from the save timestamp
pub fn generate_product_id() -> String {
    format!("p{}", chrono::Utc::now().timestamp_millis())
}

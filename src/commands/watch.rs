use crate::cli::EngineArgs;
use crate::commands::{build_coordinator, tracker_config};
use crate::worker::CheckScheduler;

pub async fn run(engine: EngineArgs) {
    let config = tracker_config(&engine);
    let period = config.check_period_minutes;

    let coordinator = match build_coordinator(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to start engine: {}", e);
            std::process::exit(1);
        }
    };

    println!("👀 Watching saved products (checking every {} minutes)", period);
    println!("   Press Ctrl-C to stop");

    let scheduler = CheckScheduler::new(coordinator);

    // First pass right away, then the recurring timer takes over
    scheduler.trigger_now().await;
    scheduler.start(period);

    tokio::signal::ctrl_c().await.ok();
    scheduler.stop();
    println!("\n👋 Stopped");
}

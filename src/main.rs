use std::error::Error;
use std::sync::Arc;

use category_board::actions::{ActionDelays, CategoryBoard, LogSink, NotificationSink};
use category_board::console;
use category_board::domain::notice::Notice;
use category_board::domain::seed::demo_categories;
use category_board::models::config::AppConfig;
use category_board::repository::MemoryRepository;
use tokio::io::BufReader;

/// Prints notices to stdout and keeps them in the log.
struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notice: Notice) {
        println!("{notice}");
        LogSink.notify(notice);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load("config/default")?;
    log::info!("Starting category board with {config:?}");

    tokio::time::sleep(config.load_delay()).await;
    let categories = if config.seed_demo_data {
        demo_categories(chrono::Utc::now().naive_utc())?
    } else {
        Vec::new()
    };

    let board = CategoryBoard::new(
        Arc::new(MemoryRepository::new(categories)),
        Arc::new(ConsoleSink),
        ActionDelays::from(&config),
    );

    println!("{}", console::HELP);
    console::print_list(&board, "");

    console::run(&board, BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

use cloudkitchen_backend::app::app::App;
use cloudkitchen_backend::util::logger::Logger;
use dotenv::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file before anything reads them
    if let Err(e) = dotenv() {
        eprintln!("No .env file loaded: {e} (using system env vars)");
    }

    let _logger = match Logger::new() {
        Ok(l) => Some(l),
        Err(e) => {
            eprintln!("Failed to set up logging: {e}");
            None
        }
    };

    info!("Starting CloudKitchen backend");
    if std::env::var("MONGO_URI").is_err() {
        warn!("MONGO_URI not set, using mongodb://localhost:27017");
    }

    let app = App::new().await;
    app.start().await;
}

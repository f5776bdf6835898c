mod ui;
mod engine;
mod model;
use tracing_subscriber::EnvFilter;

use crate::engine::save_store::FileStore;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Solo Text RPG",
        options,
        Box::new(|_cc| {
            let store = FileStore::open_default()?;
            Ok(Box::new(ui::app::TextRpgApp::new(store)))
        }),
    )
}

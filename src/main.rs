use std::sync::Arc;

use sentiment_dashboard::{
    load_dataset,
    server,
    Dashboard,
    DashboardError,
    DashboardSettings,
};
use tokio::runtime::Runtime;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), DashboardError> {
    let settings = DashboardSettings::load();

    // Blocking download; must happen before the async runtime exists.
    let dataset = Arc::new(load_dataset(&settings)?);
    let dashboard = Arc::new(Dashboard::new(dataset, &settings)?);

    let rt = Runtime::new()?;
    rt.block_on(server::serve(dashboard, &settings.listen_address()))
}

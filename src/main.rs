use confstore::ConfigStore;
use confstore::Result;
use confstore::StoreSettings;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

/// Opens the store under the configured data directory and prints the
/// current snapshot as JSON.
///
/// An optional first argument names a settings file applied on top of
/// `CONFIG_PATH` and the environment.
fn main() -> Result<()> {
    init_observability();

    let mut settings = StoreSettings::new()?;
    if let Some(path) = std::env::args().nth(1) {
        settings = settings.with_override_config(&path)?;
    }
    let settings = settings.validate()?;
    info!("opening config store in {:?}", settings.data_dir);

    let store = ConfigStore::open(&settings, Vec::new())?;
    info!(
        "default transaction type: {}",
        store.get_default_transaction_type()
    );

    println!("{}", serde_json::to_string_pretty(&*store.snapshot())?);
    Ok(())
}

fn init_observability() {
    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();
}

use uptimeguard_core::{Config, CoreError, DeferStore, FileDeferStore};

pub fn run(config: &Config) -> Result<(), CoreError> {
    let store = FileDeferStore::new(&config.counter_path);
    store.reset()?;
    tracing::info!(path = %store.path().display(), "Deferral counter cleared");
    println!("deferral counter cleared");
    Ok(())
}

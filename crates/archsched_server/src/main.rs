use anyhow::Context;
use archsched_server::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new().context("failed to load settings")?;
    archsched_core::init_logging(&settings.logging.level, &settings.logging.dir)
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    archsched_server::run(settings).await
}

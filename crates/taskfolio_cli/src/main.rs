//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskfolio_core` linkage.
//! - Run the demo login → add → toggle → logout flow against the configured
//!   backend; notifications go to the log through `LogSink`.
//!
//! Usage: `taskfolio_cli [config.toml]`. Without a config file the probe runs
//! in memory with latency disabled.

use log::info;
use std::error::Error;
use taskfolio_core::{
    init_logging, ConfiguredTaskfolio, CoreConfig, LatencyConfig, LogSink, TaskFilter, TaskInput,
};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "password123";

fn load_config() -> Result<CoreConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)?;
            Ok(CoreConfig::from_toml(&source)?)
        }
        None => Ok(CoreConfig {
            latency: LatencyConfig::instant(),
            ..CoreConfig::default()
        }),
    }
}

async fn run_demo(config: &CoreConfig) -> Result<(), Box<dyn Error>> {
    let mut app = ConfiguredTaskfolio::from_config(config, LogSink)?;
    if app.current_user().is_none() {
        app.login(DEMO_EMAIL, DEMO_PASSWORD).await?;
    }

    let created = app
        .add_task(TaskInput::new("Try the CLI probe").with_description("smoke run"))
        .await?;
    app.toggle_task(&created.id).await?;

    for filter in TaskFilter::ALL {
        app.set_filter(filter);
        println!("filter={} visible={}", filter.as_str(), app.tasks().visible().len());
    }

    app.logout();
    info!("event=cli_probe module=cli status=ok");
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("taskfolio_core ping={}", taskfolio_core::ping());
    println!("taskfolio_core version={}", taskfolio_core::core_version());

    let config = load_config()?;
    init_logging(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run_demo(&config))
}

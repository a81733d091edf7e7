//! # Wardrobe Reference Scenario
//!
//! Runs the reference scenario against mock collaborators and exits non-zero
//! if any step fails.
//!
//! ```bash
//! wardrobe_scenario                  # default config, info logging
//! wardrobe_scenario -vv engine.toml  # custom config, trace logging
//! RUST_LOG=wardrobe_core=trace wardrobe_scenario
//! ```

use wardrobe::{init_logging, EngineConfig, LogConfig, LogFormat, ReferenceScenario};

#[tokio::main]
async fn main() {
    let mut verbosity = 0u8;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            _ => config_path = Some(arg),
        }
    }

    let log_config = LogConfig::from_verbosity(verbosity).with_format(LogFormat::Compact);
    if let Err(err) = init_logging(&log_config) {
        eprintln!("logging disabled: {err}");
    }

    let config = match config_path {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("✗ FATAL: {path}: {err}");
                std::process::exit(2);
            }
        },
        None => EngineConfig::default(),
    };

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                 WARDROBE REFERENCE SCENARIO");
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  Backoff:     {}ms → {}ms", config.backoff.initial_delay_ms, config.backoff.max_delay_ms);
    println!("  Cursed cap:  {}", config.cursed_item_cap);

    let mut scenario = match ReferenceScenario::new(&config) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("✗ FATAL: {err}");
            std::process::exit(2);
        }
    };
    scenario.run_all().await;
    scenario.print_results();

    if scenario.all_passed() {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}

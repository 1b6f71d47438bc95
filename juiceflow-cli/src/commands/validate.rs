//! `validate` command implementation.

use anyhow::{Context, Result};
use juiceflow::config::SimulationConfig;
use juiceflow::core::Stage;
use tracing::info;

use crate::cli::ValidateArgs;

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let config = SimulationConfig::from_json_file(&args.config)
        .with_context(|| format!("Invalid configuration in {}", args.config.display()))?;
    info!(config = %args.config.display(), "Configuration is valid");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print_config_summary(&config);
    }
    Ok(())
}

fn print_config_summary(config: &SimulationConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Plants: {}", config.plants);
    println!("Run for: {} ms", config.run_for_ms);
    println!("Oranges per bottle: {}", config.plant.items_per_bottle);
    println!("Drain policy: {}", config.plant.drain);
    println!("\nStages:");
    for stage in Stage::ALL {
        println!("  - {stage}: {} ms", config.plant.stages.cost_ms(stage));
    }
    println!(
        "\nOne orange end to end: {} ms (bottleneck: {})",
        config.plant.stages.end_to_end().as_millis(),
        config.plant.stages.bottleneck()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_accepts_good_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"plants": 2}}"#).unwrap();

        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };
        assert!(run_validate(&args).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"plant": {{"items_per_bottle": 0}}}}"#).unwrap();

        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        };
        assert!(run_validate(&args).is_err());
    }
}

//! `genui doctor`: Diagnose configuration and credentials.

use genui_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 genui Doctor — System Diagnostics");
    println!("====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults — run `genui onboard`");
        issues += 1;
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            println!(
                "     provider: {}  model: {}",
                config.default_provider, config.default_model
            );
            println!(
                "     max_retries: {}  max_depth: {}",
                config.agent.max_retries, config.validator.max_depth
            );

            if config.has_api_key() {
                println!("  ✅ API key configured for {}", config.default_provider);
            } else if config.default_provider == "ollama" {
                println!("  ✅ Local provider, no API key needed");
            } else {
                println!(
                    "  ❌ No API key for {} — set GENUI_API_KEY or add api_key to config.toml",
                    config.default_provider
                );
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Config file invalid: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

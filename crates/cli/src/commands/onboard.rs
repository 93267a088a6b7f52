//! `genui onboard`: First-time setup.

use genui_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🧩 genui — First-Time Setup");
    println!("===========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config file exists, leaving it untouched: {}", config_path.display());
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config file: {}", config_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. Set an API key: export OPENROUTER_API_KEY=...  (or edit config.toml)");
    println!("  2. Check the setup: genui doctor");
    println!("  3. Try it:          genui ask -m \"show my instances\"");

    Ok(())
}

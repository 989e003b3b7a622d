//! `chronicler onboard` — First-time setup.

use chronicler_config::AppConfig;
use chronicler_core::Result;

pub async fn run(config: &AppConfig) -> Result<()> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();
    let staging_dir = &config.archive.staging_dir;

    println!("🗄️  Chronicler — First-Time Setup");
    println!("================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if !staging_dir.exists() {
        std::fs::create_dir_all(staging_dir)?;
        println!("✅ Created staging directory: {}", staging_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Export a guild snapshot (JSON)");
        println!("   2. Run: chronicler channel <name> --guild guild.json\n");
    }

    Ok(())
}

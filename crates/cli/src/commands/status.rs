//! `chronicler status` — Show effective configuration.

use chronicler_config::AppConfig;
use chronicler_core::Result;

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("🗄️  Chronicler Status");
    println!("====================");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Staging dir:    {}", config.archive.staging_dir.display());
    println!("  Transcript:     <channel>_{}", config.archive.text_log_suffix);
    println!("  Attachments:    {}/", config.archive.attachments_dir);
    println!(
        "  Compression:    {}",
        config
            .archive
            .compression_level
            .map(|l| format!("deflate level {l}"))
            .unwrap_or_else(|| "deflate (default level)".into())
    );
    println!("  Output dir:     {}", config.delivery.output_dir.display());
    println!("  Fallback limit: {} B", config.delivery.fallback_filesize_limit);
    println!("  Log format:     {}", config.log_format);

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `chronicler onboard` first");
    }

    Ok(())
}

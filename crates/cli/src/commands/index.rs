//! `contextor rebuild-index`: Re-embed the chat corpus.

use std::time::Instant;

use contextor_config::AppConfig;
use contextor_pipeline::Pipeline;

pub async fn rebuild(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::from_config(config)?;

    println!("Rebuilding history index from {}", config.store.chat_dir.display());
    let started = Instant::now();
    let stats = pipeline.rebuild_index().await?;

    println!(
        "  Indexed {} documents from {} conversations in {:.1?}",
        stats.documents,
        stats.conversations,
        started.elapsed()
    );
    match &config.store.index_path {
        Some(path) => println!("  Saved to {}", path.display()),
        None => println!("  In-memory only (no store.index_path configured)"),
    }
    Ok(())
}

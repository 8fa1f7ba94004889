//! `contextor status`: Show configuration and index state.

use contextor_config::AppConfig;
use contextor_pipeline::Pipeline;

pub async fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::from_config(config)?;
    let index = pipeline.status().await?;

    println!("Contextor Status");
    println!("================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Chat dir:     {}", config.store.chat_dir.display());
    println!("  LLM:          {:?} {} ({})", config.llm.kind, config.llm.model, config.llm.base_url);
    println!("  Embeddings:   {:?} ({} dims)", config.embedding.provider, config.embedding.dimensions);
    println!("  Chunking:     {}", config.chunking.strategy);
    println!("  Web search:   {}", if config.web.enabled { "enabled" } else { "disabled" });
    println!("  Budget:       {} tokens, min similarity {}", config.assembler.max_tokens, config.assembler.min_similarity);
    println!();
    println!("  Index:        {} ({})", index.backend, if index.built { "built" } else { "not built" });
    println!("  Documents:    {}", index.documents);

    if !config.store.chat_dir.exists() {
        println!("\n  ⚠️  Chat directory does not exist yet");
    }
    Ok(())
}

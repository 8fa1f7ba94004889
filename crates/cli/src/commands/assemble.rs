//! `contextor assemble`: Build the augmented prompt for a query.

use contextor_config::AppConfig;
use contextor_pipeline::Pipeline;

pub async fn run(
    config: &AppConfig,
    query: &str,
    max_tokens: Option<usize>,
    min_similarity: Option<f32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::from_config(config)?;
    let max_tokens = max_tokens.unwrap_or(config.assembler.max_tokens);
    let min_similarity = min_similarity.unwrap_or(config.assembler.min_similarity);

    let ctx = pipeline.assemble(query, max_tokens, min_similarity).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ctx)?);
        return Ok(());
    }

    let sources: Vec<&str> = ctx.sources_used.iter().map(|s| s.as_str()).collect();
    eprintln!(
        "web: {} | history: {} | decided by: {:?} | sources: {} | tokens: {}/{}",
        ctx.decision.needs_web_search,
        ctx.decision.needs_chat_history,
        ctx.decision_origin,
        if sources.is_empty() { "none".to_string() } else { sources.join(", ") },
        ctx.token_usage,
        max_tokens,
    );
    println!("{}", ctx.prompt);
    Ok(())
}

//! `contextor classify`: Show which context sources a query needs.

use contextor_config::AppConfig;
use contextor_pipeline::Pipeline;

pub async fn run(config: &AppConfig, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::from_config(config)?;
    let result = pipeline.classify(query).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::relay::RelayEngine;
use anyhow::Result;

/// Run the search command: embed the query and print the raw index matches.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'lectern doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let credentials = Credentials::from_env()?;
    let engine = RelayEngine::new(&settings, &credentials)?;

    let spinner = Output::spinner("Searching...");

    let result = async {
        let embedding = engine.embedder().embed(query).await?;
        engine.index().query(&embedding, limit).await
    }
    .await;
    spinner.finish_and_clear();

    match result {
        Ok(matches) => {
            if matches.is_empty() {
                Output::warning("No matches found for your query.");
            } else {
                Output::success(&format!("Found {} matches", matches.len()));

                for record in &matches {
                    Output::match_result(
                        &record.id,
                        &record.metadata.subject,
                        record.metadata.stars,
                        record.score,
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}

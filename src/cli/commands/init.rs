//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Lectern Setup");
    println!();
    println!("Welcome to Lectern! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API keys
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    let mut missing = Vec::new();

    if std::env::var("OPENAI_API_KEY").is_err() {
        missing.push((
            "OPENAI_API_KEY",
            "https://platform.openai.com/api-keys",
            "export OPENAI_API_KEY='sk-...'",
        ));
    }

    if std::env::var("PINECONE_API_KEY").is_err() {
        missing.push((
            "PINECONE_API_KEY",
            "https://app.pinecone.io",
            "export PINECONE_API_KEY='...'",
        ));
    }

    if missing.is_empty() {
        Output::success("API keys are configured!");
    } else {
        for (name, source, export) in &missing {
            Output::warning(&format!("{} environment variable is not set.", name));
            println!();
            println!("  Get your key from: {}", style(*source).underlined());
            println!("  Set it in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
            println!("  {}", style(*export).green());
            println!();
        }

        if !prompt_continue("Continue without API keys?")? {
            println!();
            Output::info("Setup cancelled. Set your API keys and run 'lectern init' again.");
            return Ok(());
        }
    }

    println!();

    // Step 2: Create config file
    println!("{}", style("Step 2: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!(
            "  Set your index host with: {}",
            style("lectern config edit").green()
        );
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check configuration status", style("lectern doctor").cyan());
    println!("  {} Start the relay server", style("lectern serve").cyan());
    println!(
        "  {} Chat with the assistant",
        style("lectern chat").cyan()
    );
    println!();
    println!("For more help: {}", style("lectern --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}

//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::{IndexProvider, Settings};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Lectern Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    // Check API keys
    println!("{}", style("API Configuration").bold());
    let openai_check = check_openai_api_key();
    openai_check.print();
    checks.push(openai_check);

    if settings.index.provider == IndexProvider::Pinecone {
        let pinecone_check = check_pinecone_api_key();
        pinecone_check.print();
        checks.push(pinecone_check);
    }

    println!();

    // Check index configuration
    println!("{}", style("Index Configuration").bold());
    let index_checks = check_index(settings);
    for check in &index_checks {
        check.print();
    }
    checks.extend(index_checks);

    println!();

    // Check configuration file
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Lectern.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Lectern is ready to use.");
    }

    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check if the Pinecone API key is configured.
fn check_pinecone_api_key() -> CheckResult {
    match std::env::var("PINECONE_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let visible = key.len().min(6);
            let masked = format!("{}...", &key[..visible]);
            CheckResult::ok("PINECONE_API_KEY", &format!("configured ({})", masked))
        }
        Ok(_) => CheckResult::error(
            "PINECONE_API_KEY",
            "empty",
            "Set with: export PINECONE_API_KEY='...'",
        ),
        Err(_) => CheckResult::error(
            "PINECONE_API_KEY",
            "not set",
            "Set with: export PINECONE_API_KEY='...'",
        ),
    }
}

/// Check the index configuration.
fn check_index(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    results.push(CheckResult::ok(
        "Provider",
        &settings.index.provider.to_string(),
    ));

    match settings.index.provider {
        IndexProvider::Pinecone => {
            if settings.index.host.is_empty() {
                results.push(CheckResult::error(
                    "Index host",
                    "not configured",
                    "Set index.host in the config file (lectern config edit)",
                ));
            } else {
                results.push(CheckResult::ok("Index host", &settings.index.host));
            }
            results.push(CheckResult::ok("Namespace", &settings.index.namespace));
        }
        IndexProvider::Memory => {
            results.push(CheckResult::warning(
                "Index host",
                "in-memory index configured",
                "Records are lost on restart; use pinecone for real data",
            ));
        }
    }

    results
}

/// Check if the config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: lectern init (or lectern config edit)",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_memory_index_warns() {
        let mut settings = Settings::default();
        settings.index.provider = IndexProvider::Memory;
        let results = check_index(&settings);
        assert!(results.iter().any(|r| r.status == CheckStatus::Warning));
    }
}

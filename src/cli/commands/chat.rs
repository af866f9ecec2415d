//! Interactive chat command against a running relay.

use crate::client::{ChatClient, Conversation};
use crate::config::Settings;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
///
/// Each send streams to completion before the next prompt is shown, so
/// turns on one conversation never overlap.
pub async fn run_chat(url: Option<String>, settings: Settings) -> anyhow::Result<()> {
    let endpoint = url.unwrap_or_else(|| settings.server.chat_url.clone());
    let client = ChatClient::new(&endpoint);
    let mut conversation = Conversation::new();

    println!("\n{}", style("Lectern Chat").bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    if let Some(greeting) = conversation.last() {
        println!(
            "{} {}\n",
            style("Assistant:").cyan().bold(),
            greeting.content
        );
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("{}", style("Goodbye!").dim());
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            conversation = Conversation::new();
            println!("{}", style("Conversation cleared.").dim());
            continue;
        }

        print!("\n{} ", style("Assistant:").cyan().bold());
        stdout.flush()?;

        let mut rendered = String::new();
        client
            .send_message(&mut conversation, input, |content| {
                // Reformatting usually extends the previous render; print
                // just the new suffix, or reprint when earlier text changed.
                match content.strip_prefix(rendered.as_str()) {
                    Some(suffix) => print!("{}", suffix),
                    None => print!("\n{}", content),
                }
                rendered = content.to_string();
                io::stdout().flush().ok();
            })
            .await;

        println!("\n");
    }

    Ok(())
}

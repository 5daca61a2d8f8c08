//! Interactive Chat Loop

use std::time::Duration;

use assistant_core::{Agent, Conversation};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::output;

/// Interactive REPL driving one conversation session
pub struct Repl {
    agent: Agent,
    conversation: Conversation,
    model: String,
}

impl Repl {
    pub fn new(agent: Agent, model: impl Into<String>) -> Self {
        Self {
            agent,
            conversation: Conversation::new(),
            model: model.into(),
        }
    }

    /// Run until the user exits
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;

        output::print_welcome(&self.model, self.agent.tools().len());

        loop {
            let readline = rl.readline(&format!("{} ", "you>".cyan().bold()));

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    match line.to_lowercase().as_str() {
                        "exit" | "quit" => {
                            println!("{}", "Goodbye!".yellow());
                            break;
                        }
                        "help" => {
                            output::print_help();
                            continue;
                        }
                        "tools" => {
                            output::print_tools(self.agent.tools());
                            continue;
                        }
                        "clear" => {
                            self.conversation.clear();
                            output::print_notice("Conversation history cleared");
                            continue;
                        }
                        _ => {}
                    }

                    self.process(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".yellow());
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Route one chat message through the tool-calling loop.
    ///
    /// Ctrl-C while a round is in flight drops the round; turns already
    /// appended (always complete call/result pairs) stay in the history.
    async fn process(&mut self, input: &str) {
        let spinner = thinking_spinner();

        let result = tokio::select! {
            result = self.agent.chat(&mut self.conversation, input) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        spinner.finish_and_clear();

        match result {
            Some(Ok(answer)) => output::print_response(&answer),
            Some(Err(e)) => {
                tracing::error!(error = %e, "Chat turn failed");
                output::print_error(&e.user_message());
            }
            None => output::print_notice("Interrupted"),
        }
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("static template"),
    );
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

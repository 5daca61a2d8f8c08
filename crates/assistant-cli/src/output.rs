//! Terminal Output Formatting

use assistant_core::ToolRegistry;
use colored::Colorize;

pub fn print_welcome(model: &str, tool_count: usize) {
    println!();
    println!(
        "{}",
        "╭──────────────────────────────────────────────╮".blue()
    );
    println!(
        "{}",
        "│              AI CLI Assistant                │".blue()
    );
    println!(
        "{}",
        "╰──────────────────────────────────────────────╯".blue()
    );
    println!();
    println!("{} {}", "Model:".bold(), model);
    println!("{} {}", "Tools:".bold(), tool_count);
    println!();
    println!(
        "Type {} for commands, {} to quit.",
        "help".green(),
        "exit".green()
    );
}

pub fn print_help() {
    println!();
    println!("{}", "Commands:".bold());
    println!("  {}           - Show this help message", "help".green());
    println!("  {}          - List available tools", "tools".green());
    println!("  {}          - Clear conversation history", "clear".green());
    println!("  {}   - Exit the application", "exit, quit".green());
    println!();
    println!("Just type your message to chat with the AI assistant!");
    println!();
}

pub fn print_tools(registry: &ToolRegistry) {
    if registry.is_empty() {
        println!("{}", "No tools available".yellow());
        return;
    }

    println!();
    println!("{}", "Available Tools:".bold());
    for tool in registry.list() {
        let schema = tool.schema();
        println!("  • {} - {}", schema.name.green(), schema.description);
    }
    println!();
}

pub fn print_response(text: &str) {
    println!();
    println!("{}", "Assistant".bold().green());
    println!("{}", text);
    println!();
}

pub fn print_error(text: &str) {
    eprintln!("{} {}", "Error:".bold().red(), text.red());
}

pub fn print_notice(text: &str) {
    println!("{}", text.yellow());
}

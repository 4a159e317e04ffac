use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Reads one line from stdin after printing `prompt`.
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt_line("Password: "),
    }
}

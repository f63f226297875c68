use console::style;
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    pub fn info(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("{} {}", style("ℹ").blue().bold(), message);
            }
            OutputFormat::Json => {
                println!("{}", status_json("info", message));
            }
        }
    }

    pub fn warning(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("⚠").yellow().bold(), message);
            }
            OutputFormat::Json => {
                eprintln!("{}", status_json("warning", message));
            }
        }
    }

    pub fn error(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", style("✗").red().bold(), message);
            }
            OutputFormat::Json => {
                eprintln!("{}", status_json("error", message));
            }
        }
    }

    /// Print rows as a rounded table; a no-op in JSON mode
    pub fn table<T: Tabled>(&self, data: Vec<T>) {
        if let OutputFormat::Human = self.format {
            if data.is_empty() {
                println!("{}", style("(no data)").dim());
            } else {
                let mut table = Table::new(data);
                table.with(Style::rounded());
                println!("{}", table);
            }
        }
    }

    /// Print a line of pre-styled text; a no-op in JSON mode
    pub fn line(&self, text: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("{}", text);
        }
    }

    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "success",
                    "data": data,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Ok(())
    }

    pub fn section(&self, title: impl Display) {
        match self.format {
            OutputFormat::Human => {
                println!("\n{}", style(title).bold().underlined());
            }
            OutputFormat::Json => {}
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

fn status_json(status: &str, message: impl Display) -> String {
    let output = serde_json::json!({
        "status": status,
        "message": message.to_string(),
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
}

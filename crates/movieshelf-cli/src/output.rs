use clap::ValueEnum;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Success,
    Info,
    Warning,
    Error,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Kind::Success => "success",
            Kind::Info => "info",
            Kind::Warning => "warning",
            Kind::Error => "error",
        }
    }
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_json(&self) -> bool {
        self.format != OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message(Kind::Success, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message(Kind::Info, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message(Kind::Warning, msg.as_ref());
    }

    /// Shown even in quiet mode
    pub fn error(&self, msg: impl AsRef<str>) {
        self.message(Kind::Error, msg.as_ref());
    }

    fn message(&self, kind: Kind, msg: &str) {
        if self.quiet && !matches!(kind, Kind::Error) {
            return;
        }

        if self.is_json() {
            self.print_json(&json!({ "type": kind.label(), "message": msg }));
            return;
        }

        match kind {
            Kind::Success => println!("{} {}", "✓".green(), msg),
            Kind::Info => println!("{}", msg),
            Kind::Warning => println!("{} {}", "⚠".yellow(), msg),
            Kind::Error => eprintln!("{} {}", "✗".red(), msg),
        }
    }

    /// Structured result of a command; only printed in the JSON formats
    pub fn data<T: Serialize>(&self, data: &T) {
        if self.quiet || !self.is_json() {
            return;
        }
        match serde_json::to_value(data) {
            Ok(value) => self.print_json(&value),
            Err(e) => self.error(format!("Failed to serialize output: {}", e)),
        }
    }

    /// Human-format table; ignored in the JSON formats
    pub fn table(&self, table: &Table) {
        if self.quiet || self.is_json() {
            return;
        }
        println!("{table}");
    }

    /// Plain line in human format only
    pub fn line(&self, msg: impl AsRef<str>) {
        if self.quiet || self.is_json() {
            return;
        }
        println!("{}", msg.as_ref());
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
            _ => println!("{}", serde_json::to_string(data).unwrap_or_default()),
        }
    }
}

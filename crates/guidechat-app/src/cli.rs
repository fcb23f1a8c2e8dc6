use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use guidechat_ai::MAX_COMPETITORS;

/// Guidechat: SEO reports and chat against a guidelines assistant.
#[derive(Parser, Debug)]
#[command(name = "guidechat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (a tracing directive such as `guidechat=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload your page and competitor pages, ask for a report, then chat.
    Report(ReportArgs),
    /// Chat with the assistant.
    Chat,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Your web page, saved as PDF.
    #[arg(long, value_parser = pdf_path)]
    pub site: Option<PathBuf>,

    /// A competitor's web page, saved as PDF. Repeat up to three times.
    #[arg(long = "competitor", value_parser = pdf_path)]
    pub competitors: Vec<PathBuf>,

    /// Main keyword the pages are optimised for.
    #[arg(long)]
    pub keyword: String,

    /// Exit after the report instead of continuing in chat.
    #[arg(long)]
    pub no_chat: bool,
}

impl ReportArgs {
    pub fn check(&self) -> Result<(), String> {
        if self.competitors.len() > MAX_COMPETITORS {
            return Err(format!(
                "at most {MAX_COMPETITORS} competitor files are allowed, got {}",
                self.competitors.len()
            ));
        }
        Ok(())
    }
}

fn pdf_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if is_pdf(&path) {
        Ok(path)
    } else {
        Err(format!("{value} is not a .pdf file"))
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

pub fn parse() -> Args {
    Args::parse()
}

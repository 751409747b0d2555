// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use smart_finder::exporter::{self, SearchReport, ViewerPage};
use smart_finder::utils::logging::{
    format_error, format_info, format_keyword, format_success, format_warning,
};
use smart_finder::{
    Config, ConfiguredFinder, ConverterBackend, Document, DocumentKind, FinderError,
    PdfConverter, SearchHit, Session, SessionStats, Validator, extract_text,
};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[command(name = "smart_finder")]
#[command(version = "0.1.0")]
#[command(about = "Find and highlight the keyword closest to a query in PDF and Word documents", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Highlight the keyword closest to QUERY and write the annotated PDF
    Find {
        file: PathBuf,

        query: String,

        /// Highlighted PDF path (default: <stem>.highlighted.pdf next to FILE)
        #[arg(short, long, value_name = "PDF")]
        output: Option<PathBuf>,

        /// Also write an HTML page showing the first matching page
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// Also write a JSON search report
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// List the keywords extracted from a document
    Keywords {
        file: PathBuf,

        #[arg(short, long, value_name = "NUM")]
        limit: Option<usize>,
    },

    /// Print the plain text extracted from a document
    Extract { file: PathBuf },

    /// Interactive session: every line is a query
    Shell { file: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    smart_finder::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    let finder = ConfiguredFinder::from_config(config)
        .context("Failed to initialize finder")?
        .with_progress(std::io::stderr().is_terminal());

    let result = match cli.command {
        Commands::Find {
            file,
            query,
            output,
            html,
            report,
        } => cmd_find(&finder, &file, &query, output, html, report).await,
        Commands::Keywords { file, limit } => cmd_keywords(&finder, &file, limit).await,
        Commands::Extract { file } => cmd_extract(finder.config(), &file),
        Commands::Shell { file } => cmd_shell(&finder, file).await,
    };

    if let Err(err) = result {
        report_failure(&err);
        std::process::exit(1);
    }

    Ok(())
}

/// Known outcomes are shown as they are; anything else is logged and summarized.
fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<FinderError>() {
        Some(outcome) if outcome.is_recoverable_outcome() => {
            eprintln!("{}", format_warning(&outcome.to_string()));
        }
        _ => {
            error!("{:#}", err);
            eprintln!(
                "{}",
                format_error("Something went wrong while processing the document. Run with --verbose for details.")
            );
        }
    }
}

fn read_upload(path: &Path) -> Result<(String, Vec<u8>)> {
    Validator::validate_file_path(path)?;
    let name = Validator::upload_name(path)?;
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((name, bytes))
}

async fn open_document(finder: &ConfiguredFinder, session: &mut Session, path: &Path) -> Result<()> {
    let (name, bytes) = read_upload(path)?;
    let summary = finder.upload(session, &name, bytes).await?;

    info!(
        "Loaded {} ({}, {} segment(s), {} words)",
        summary.name, summary.kind, summary.segments, summary.words
    );
    for stage in &summary.stages {
        debug!("{}", stage.format());
    }
    if summary.keywords == 0 {
        println!(
            "{}",
            format_warning(&format!("{} has no extractable keywords", summary.name))
        );
    } else {
        println!(
            "{}",
            format_success(&format!(
                "Loaded {} with {} keyword(s)",
                summary.name, summary.keywords
            ))
        );
    }
    Ok(())
}

fn present_hit(
    finder: &ConfiguredFinder,
    session: &Session,
    input: &Path,
    hit: &SearchHit,
    output: Option<PathBuf>,
    html: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<()> {
    let output = output.unwrap_or_else(|| exporter::default_output_path(input));
    exporter::write_pdf(&output, &hit.pdf)?;

    println!(
        "{} {}",
        format_success("Closest keyword:"),
        format_keyword(&hit.keyword_match.keyword, hit.keyword_match.similarity)
    );
    println!("{}", format_info(&hit.format_summary()));
    println!("{}", format_info(&format!("Saved to {}", output.display())));

    if let Some(html) = html {
        let page = hit.first_page().unwrap_or(1);
        ViewerPage::new(&hit.query, &hit.pdf, page, finder.config().output.viewer_zoom)
            .write(&html)?;
        println!("{}", format_info(&format!("Viewer written to {}", html.display())));
    }

    if let Some(report) = report {
        let loaded = session.document().ok_or(FinderError::NoDocumentLoaded)?;
        SearchReport::new(&loaded.document, hit, Some(&output)).write(&report, true)?;
        println!("{}", format_info(&format!("Report written to {}", report.display())));
    }

    Ok(())
}

async fn cmd_find(
    finder: &ConfiguredFinder,
    file: &Path,
    query: &str,
    output: Option<PathBuf>,
    html: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<()> {
    let mut session = Session::new();
    open_document(finder, &mut session, file).await?;

    match finder.search(&mut session, query).await? {
        Some(hit) => present_hit(finder, &session, file, &hit, output, html, report),
        None => {
            println!("{}", format_info("Empty query, nothing to search"));
            Ok(())
        }
    }
}

async fn cmd_keywords(finder: &ConfiguredFinder, file: &Path, limit: Option<usize>) -> Result<()> {
    let mut session = Session::new();
    open_document(finder, &mut session, file).await?;
    print_keywords(finder, &mut session, limit).await
}

async fn print_keywords(
    finder: &ConfiguredFinder,
    session: &mut Session,
    limit: Option<usize>,
) -> Result<()> {
    let keywords = finder.keywords(session).await?;
    let shown = limit.unwrap_or(keywords.len()).min(keywords.len());

    for (idx, keyword) in keywords.iter().take(shown).enumerate() {
        println!("{:>4}. {}", idx + 1, keyword);
    }
    if shown < keywords.len() {
        println!("      ... {} more", keywords.len() - shown);
    }
    Ok(())
}

fn cmd_extract(config: &Config, file: &Path) -> Result<()> {
    let (name, bytes) = read_upload(file)?;
    let document = Document::new(name, bytes)?;

    let paginated = if document.kind == DocumentKind::Doc {
        ConverterBackend::from_config(&config.conversion).convert(&document.name, &document.bytes)?
    } else {
        Vec::new()
    };

    let text = extract_text(&document, &paginated)?;
    println!("{}", text.text);
    Ok(())
}

#[derive(Debug, PartialEq)]
enum ShellCommand {
    Open(PathBuf),
    Clear,
    Keywords,
    Help,
    Quit,
    Query(String),
    Unknown(String),
}

impl ShellCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Self::Query(line.to_string());
        };

        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command, ""),
        };

        match name {
            "open" if !argument.is_empty() => Self::Open(PathBuf::from(argument)),
            "clear" => Self::Clear,
            "keywords" => Self::Keywords,
            "help" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

async fn cmd_shell(finder: &ConfiguredFinder, file: Option<PathBuf>) -> Result<()> {
    let mut session = Session::new();
    let mut stats = SessionStats::new();
    let mut current: Option<PathBuf> = None;
    info!("Interactive session {}", session.id());

    if let Some(path) = file {
        match open_document(finder, &mut session, &path).await {
            Ok(()) => {
                stats.record_upload();
                current = Some(path);
            }
            Err(err) => report_failure(&err),
        }
    }

    println!(
        "{}",
        format_info("Type a word or phrase to search, :help for commands")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let outcome = match ShellCommand::parse(&line) {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                println!("  <text>          search the loaded document");
                println!("  :open <path>    load a PDF or Word document");
                println!("  :keywords       list extracted keywords");
                println!("  :clear          forget the loaded document");
                println!("  :quit           leave the shell");
                Ok(())
            }
            ShellCommand::Open(path) => {
                let result = open_document(finder, &mut session, &path).await;
                if result.is_ok() {
                    stats.record_upload();
                    current = Some(path);
                } else if !session.has_document() {
                    current = None;
                }
                result
            }
            ShellCommand::Clear => {
                session.clear();
                current = None;
                println!("{}", format_info("Document cleared"));
                Ok(())
            }
            ShellCommand::Keywords => print_keywords(finder, &mut session, None).await,
            ShellCommand::Query(query) => match finder.search(&mut session, &query).await {
                Ok(Some(hit)) => {
                    stats.record_search(true);
                    let input = current.as_deref().unwrap_or(Path::new("document.pdf"));
                    present_hit(finder, &session, input, &hit, None, None, None)
                }
                Ok(None) => Ok(()),
                Err(err) => {
                    stats.record_search(false);
                    Err(err.into())
                }
            },
            ShellCommand::Unknown(line) => {
                println!(
                    "{}",
                    format_warning(&format!("Unknown command {}, try :help", line))
                );
                Ok(())
            }
        };

        if let Err(err) = outcome {
            report_failure(&err);
        }
    }

    println!("{}", format_info(&stats.format()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_command_parsing() {
        assert_eq!(
            ShellCommand::parse(":open  docs/paper.pdf "),
            ShellCommand::Open(PathBuf::from("docs/paper.pdf"))
        );
        assert_eq!(ShellCommand::parse(":clear"), ShellCommand::Clear);
        assert_eq!(ShellCommand::parse(":q"), ShellCommand::Quit);
        assert_eq!(
            ShellCommand::parse("  large datasets "),
            ShellCommand::Query("large datasets".to_string())
        );
        assert_eq!(
            ShellCommand::parse(":open"),
            ShellCommand::Unknown(":open".to_string())
        );
    }
}

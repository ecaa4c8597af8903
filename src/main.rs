use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use qa_form::config::{ClientConfig, ConfigError};
use qa_form::{AskBackend, AskError, FormError, HttpBackend, QueryForm, RequestState, render};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Ask(#[from] AskError),
    #[error("form rejected submission: {0}")]
    Form(#[from] FormError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "qa-form", about = "Ask questions of a document QA backend")]
struct Cli {
    /// Backend base URL. Overrides `QA_FORM_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Path of the question endpoint. Overrides `QA_FORM_ASK_PATH`.
    #[arg(long)]
    ask_path: Option<String>,

    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// No request timeout unless set here or in `QA_FORM_REQUEST_TIMEOUT_SECS`.
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Log to stderr; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the backend root endpoint.
    Ping,
    /// Submit one question and print the outcome.
    Ask {
        #[arg(default_value = "")]
        question: String,
    },
    /// Read questions from stdin, one per line, until EOF.
    Interactive,
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let backend = HttpBackend::new(&config)?;
    tracing::debug!(url = %backend.ask_url(), "backend configured");

    match cli.command {
        Command::Ping => run_ping(&backend).await,
        Command::Ask { question } => run_ask(&backend, question).await,
        Command::Interactive => run_interactive(&backend).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

fn build_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(ask_path) = &cli.ask_path {
        config.ask_path.clone_from(ask_path);
    }
    if let Some(secs) = cli.connect_timeout_secs {
        config.timeouts.connect_secs = secs;
    }
    if let Some(secs) = cli.request_timeout_secs {
        config.timeouts.request_secs = Some(secs);
    }
    config.validate()?;
    Ok(config)
}

async fn run_ping(backend: &HttpBackend) -> Result<ExitCode, CliError> {
    let message = backend.ping().await?;
    println!("{message}");
    Ok(ExitCode::SUCCESS)
}

async fn run_ask(backend: &HttpBackend, question: String) -> Result<ExitCode, CliError> {
    let mut form = QueryForm::new();
    form.update_question(question);
    let mut stdout = io::stdout();
    submit_and_print(&mut form, backend, &mut stdout).await
}

async fn run_interactive(backend: &HttpBackend) -> Result<ExitCode, CliError> {
    let mut stdout = io::stdout();
    run_session(backend, BufReader::new(tokio::io::stdin()), &mut stdout).await
}

/// Submit each input line as a question until EOF. The runtime stays free
/// while waiting for the next line.
async fn run_session<B, R>(backend: &B, input: R, out: &mut impl Write) -> Result<ExitCode, CliError>
where
    B: AskBackend + ?Sized,
    R: AsyncBufRead + Unpin,
{
    let mut form = QueryForm::new();
    let mut lines = input.lines();

    loop {
        write!(out, "question> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(ExitCode::SUCCESS);
        };
        form.update_question(line);
        submit_and_print(&mut form, backend, out).await?;
    }
}

/// Print the loading view, submit, then print the outcome view. Exit code
/// reflects whether the question was answered.
async fn submit_and_print<B>(form: &mut QueryForm, backend: &B, out: &mut impl Write) -> Result<ExitCode, CliError>
where
    B: AskBackend + ?Sized,
{
    let submission = form.begin_submit()?;
    write!(out, "{}", render(form))?;
    out.flush()?;

    let outcome = backend.ask(&submission.query).await;
    form.complete(submission.ticket, outcome)?;
    write!(out, "{}", render(form))?;
    out.flush()?;

    Ok(match form.state() {
        RequestState::Succeeded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

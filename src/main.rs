//! TRIZ Problem Solver
//!
//! Serves the problem form by default. Also runs one-shot solves and an
//! interactive prompt from the terminal.
//!
//! Run with: GROQ_API_KEY=... cargo run -- serve --port 8501

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use triz_solver::{
    config::{SolverConfig, DEFAULT_MATRIX_PATH},
    llm::{GroqClient, LlmConfig, API_KEY_ENV, DEFAULT_API_URL, DEFAULT_MODEL},
    render, server,
    session::{SessionOptions, SolverSession},
};

/// TRIZ engineering problem solver
#[derive(Parser, Debug)]
#[command(name = "triz-solver")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// Compiled contradiction matrix (see triz-compile)
    #[arg(long, global = true, default_value = DEFAULT_MATRIX_PATH)]
    matrix: PathBuf,

    /// Principle catalog JSON; the built-in 40 principles when omitted
    #[arg(long, global = true)]
    principles: Option<PathBuf>,

    /// Model identifier
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Chat completions endpoint
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    timeout: u64,

    /// Send the per-principle requests concurrently
    #[arg(long, global = true)]
    concurrent: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the web form (default)
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8501)]
        port: u16,
    },

    /// Solve one problem and print the report
    Solve {
        /// Problem description
        #[arg(required = true, num_args = 1..)]
        problem: Vec<String>,
    },

    /// Interactive prompt
    Repl,
}

impl DataArgs {
    fn to_config(&self) -> SolverConfig {
        SolverConfig {
            matrix_path: self.matrix.clone(),
            principles_path: self.principles.clone(),
            llm: LlmConfig {
                api_url: self.api_url.clone(),
                api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
                model: self.model.clone(),
                timeout: Duration::from_secs(self.timeout),
            },
            session: SessionOptions {
                concurrent_explanations: self.concurrent,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let session = cli.data.to_config().build_session()?;

    match cli.command.unwrap_or(Command::Serve {
        host: "127.0.0.1".to_string(),
        port: 8501,
    }) {
        Command::Serve { host, port } => run_http_server(session, &host, port).await,
        Command::Solve { problem } => run_oneshot(&session, &problem.join(" ")).await,
        Command::Repl => run_cli_mode(&session).await,
    }
}

async fn run_http_server(session: SolverSession<GroqClient>, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    eprintln!("{} on http://{}", render::TITLE, addr);
    server::serve(Arc::new(session), addr).await
}

async fn run_oneshot(session: &SolverSession<GroqClient>, problem: &str) -> Result<()> {
    let report = session.solve(problem).await;
    print!("{}", render::render_text(&report));
    Ok(())
}

async fn run_cli_mode(session: &SolverSession<GroqClient>) -> Result<()> {
    use std::io::{self, BufRead, Write};

    println!("{}", render::TITLE);
    println!("{}", "=".repeat(render::TITLE.len()));
    println!("Describe an engineering problem, or 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line == "quit" || line == "exit" {
            break;
        }

        let report = session.solve(line).await;
        println!("{}", render::render_text(&report));
    }

    Ok(())
}

//! pdf-qa: terminal client for the PDF Q&A backend.
//! Runs one command (`upload`, `ask`, `docs`) or, with no command, an
//! interactive session that loads the document list on start.

use pdf_qa_client::config::{self, Config, ConfigError, CONFIG_ENV_VAR};
use pdf_qa_client::{Action, Client, Controller, Outcome, TerminalView};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

const USAGE: &str = "\
Usage: pdf-qa [--config <path>] [--base-url <url>] [COMMAND]

Commands:
  upload <file.pdf>    upload a PDF, then refresh the document list
  ask <question...>    ask a question about the uploaded documents
  docs                 list uploaded documents
  (none)               interactive session";

const SESSION_HELP: &str = "\
  select <path>     choose the file to upload
  upload [path]     upload the selected (or given) file
  ask <question>    ask a question
  docs              refresh the document list
  quit              leave";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    base_url: Option<String>,
    command: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--base-url" => {
                parsed.base_url = Some(args.next().ok_or("--base-url requires a URL")?);
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            _ => {
                parsed.command.push(arg);
                parsed.command.extend(args.by_ref());
            }
        }
    }
    Ok(parsed)
}

fn load_config(explicit: Option<PathBuf>) -> Result<Config, ConfigError> {
    // 1. --config <path> flag, 2. PDF_QA_CONFIG env var
    if let Some(path) = explicit.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)) {
        return config::load(&path);
    }
    // 3. Default path (~/.pdf-qa/config.yaml), optional
    let path = config::default_config_path().ok_or(ConfigError::NoPath)?;
    config::load_or_default(&path)
}

/// Actions for one command line (`upload x.pdf` selects then uploads).
fn parse_command(words: &[String]) -> Result<Vec<Action>, String> {
    let (name, rest) = match words.split_first() {
        Some((name, rest)) => (name.as_str(), rest),
        None => return Ok(Vec::new()),
    };
    match name {
        "select" => match rest.first() {
            Some(path) => Ok(vec![Action::Select(PathBuf::from(path))]),
            None => Err("select requires a path".into()),
        },
        "upload" => Ok(match rest.first() {
            Some(path) => vec![Action::Select(PathBuf::from(path)), Action::Upload],
            None => vec![Action::Upload],
        }),
        "ask" => Ok(vec![Action::Ask(rest.join(" "))]),
        "docs" => Ok(vec![Action::ListDocuments]),
        other => Err(format!("unknown command: {}", other)),
    }
}

async fn run_actions(
    controller: &mut Controller<TerminalView<io::Stdout, io::Stderr>>,
    actions: Vec<Action>,
) -> Outcome {
    let mut outcome = Outcome::Succeeded;
    for action in actions {
        outcome = controller.dispatch(action).await;
        if outcome != Outcome::Succeeded {
            break;
        }
    }
    outcome
}

fn main() {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("Error: {}\n\n{}", e, USAGE);
        process::exit(2);
    });

    let cfg = load_config(args.config).unwrap_or_else(|e| {
        eprintln!("Error: failed to load config: {}", e);
        process::exit(1);
    });
    let base_url = args.base_url.as_deref().unwrap_or_else(|| cfg.base_url());

    let client = Client::new(base_url).unwrap_or_else(|e| {
        eprintln!("Error: failed to create HTTP client: {}", e);
        process::exit(1);
    });
    log::info!("using backend at {}", client.base_url());
    let mut controller = Controller::new(client, TerminalView::stdio());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    if !args.command.is_empty() {
        let actions = parse_command(&args.command).unwrap_or_else(|e| {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            process::exit(2);
        });
        let outcome = rt.block_on(run_actions(&mut controller, actions));
        if outcome != Outcome::Succeeded {
            process::exit(1);
        }
        return;
    }

    // Interactive session.
    rt.block_on(controller.dispatch(Action::Load));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("> ");
        let _ = io::stderr().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Error: failed to read input: {}", e);
                process::exit(1);
            }
            None => break,
        };
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim_start()))
            .unwrap_or((line, ""));
        match name {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                eprintln!("{}", SESSION_HELP);
                continue;
            }
            _ => {}
        }
        // The remainder is one argument so paths and questions keep their spaces.
        let mut words = vec![name.to_string()];
        if !rest.is_empty() {
            words.push(rest.to_string());
        }
        match parse_command(&words) {
            Ok(actions) => {
                rt.block_on(run_actions(&mut controller, actions));
            }
            Err(e) => eprintln!("{} (type `help`)", e),
        }
    }
}

//! Interactive terminal autocomplete.
//!
//! Each input line replaces the field value and triggers a search. Commands:
//! `:select N`, `:esc`, `:outside`, `:quit`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use larch::config::Config;
use larch::{ActivationTarget, AutocompleteSession, SourcePolicy, TextField};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Interactive address autocomplete")]
struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore the remote provider and search the fallback catalogue only
    #[arg(long)]
    offline: bool,
}

enum Command {
    Select(usize),
    Escape,
    Outside,
    Quit,
    Input(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Some(Command::Input(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    match parts.next()? {
        "select" | "s" => parts.next()?.parse().ok().map(Command::Select),
        "esc" => Some(Command::Escape),
        "outside" => Some(Command::Outside),
        "quit" | "q" => Some(Command::Quit),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if args.offline {
        config.provider.enabled = false;
    }

    let policy = SourcePolicy::from_config(&config)?;
    info!("Primary suggestion source: {:?}", policy.primary_kind());

    let mut session = AutocompleteSession::new(policy, TextField::default());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Some(Command::Input(text)) => {
                session.type_text(&text).await;
                if let Some(advisory) = session.advisory() {
                    println!("! {}", advisory);
                }
                for (index, suggestion) in session.suggestions().iter().enumerate() {
                    println!("{:>2}. {}", index, suggestion.label);
                }
            }
            Some(Command::Select(index)) => match session.select(index).await {
                Some(address) => println!("{}", serde_json::to_string_pretty(&address)?),
                None => println!("no suggestion {}", index),
            },
            Some(Command::Escape) => session.escape(),
            Some(Command::Outside) => session.activate(ActivationTarget::Outside),
            Some(Command::Quit) => break,
            None => println!("unknown command: {}", line),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command(":select 2"), Some(Command::Select(2))));
        assert!(matches!(parse_command(":s 0"), Some(Command::Select(0))));
        assert!(matches!(parse_command(":esc"), Some(Command::Escape)));
        assert!(matches!(parse_command(":q"), Some(Command::Quit)));
        assert!(matches!(parse_command(":select x"), None));
        assert!(matches!(
            parse_command("149 Skill"),
            Some(Command::Input(ref text)) if text == "149 Skill"
        ));
    }
}

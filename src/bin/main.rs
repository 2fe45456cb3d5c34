//! name-oracle CLI: transliterate names and ask what they mean.

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use miette::{IntoDiagnostic, Result};

use name_oracle::config::OracleConfig;
use name_oracle::error::ConfigError;
use name_oracle::{Interpretation, OracleEngine, Reading};

#[derive(Parser)]
#[command(name = "name-oracle", version, about = "Phonetic name transliteration oracle")]
struct Cli {
    /// Config file (defaults to $NAME_ORACLE_CONFIG or the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CMU pronouncing dictionary (overrides the config).
    #[arg(long, global = true)]
    cmudict: Option<PathBuf>,

    /// Lexicon TOML consulted before the dictionary (overrides the config).
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transliterate a phrase into the lens script.
    Transliterate {
        /// Words to transliterate.
        #[arg(required = true)]
        text: Vec<String>,

        /// Target lens (hebrew, arabic, indic).
        #[arg(long, short)]
        lens: Option<String>,
    },

    /// Transliterate, interpret and score a phrase.
    Read {
        #[arg(required = true)]
        text: Vec<String>,

        #[arg(long, short)]
        lens: Option<String>,

        /// Print the reading as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the available lenses.
    Lenses,

    /// Write a default config file.
    InitConfig {
        /// Destination (defaults to the user config dir).
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Interactive loop: type names, see them in script.
    Repl {
        #[arg(long, short)]
        lens: Option<String>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::InitConfig { path, force } => init_config(path.clone(), *force),

        Commands::Transliterate { text, lens } => {
            let (config, engine) = load_engine(&cli)?;
            let lens = lens.as_deref().unwrap_or(&config.default_lens);
            println!("{}", engine.transliterate_phrase(&text.join(" "), lens));
            Ok(())
        }

        Commands::Read { text, lens, json } => {
            let (config, engine) = load_engine(&cli)?;
            let lens = lens.as_deref().unwrap_or(&config.default_lens);
            let reading = engine.read(&text.join(" "), lens);
            if *json {
                let out = serde_json::to_string_pretty(&reading.to_json()).into_diagnostic()?;
                println!("{out}");
            } else {
                print_reading(&reading);
            }
            Ok(())
        }

        Commands::Lenses => {
            let (_, engine) = load_engine(&cli)?;
            let default = engine.registry().default_lens();
            for profile in engine.lenses() {
                let marker = if profile.lens == default { " (default)" } else { "" };
                println!(
                    "{:<8} {:<12} translate from '{}'{}",
                    profile.lens, profile.name, profile.translation_source, marker
                );
            }
            Ok(())
        }

        Commands::Repl { lens } => {
            let (config, engine) = load_engine(&cli)?;
            let lens = lens.clone().unwrap_or(config.default_lens);
            repl(&engine, lens).into_diagnostic()
        }
    }
}

/// Config from --config / discovery, with CLI overrides applied.
fn load_engine(cli: &Cli) -> Result<(OracleConfig, OracleEngine)> {
    let mut config = match &cli.config {
        Some(path) => OracleConfig::load(path)?,
        None => OracleConfig::discover()?,
    };
    if let Some(path) = &cli.cmudict {
        config.phonemizer.cmudict_path = Some(path.clone());
    }
    if let Some(path) = &cli.lexicon {
        config.phonemizer.lexicon_path = Some(path.clone());
    }
    let engine = OracleEngine::from_config(&config)?;
    Ok((config, engine))
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path.or_else(OracleConfig::default_path) {
        Some(path) => path,
        None => miette::bail!("cannot determine a config directory; pass --path"),
    };
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.display().to_string(),
        }
        .into());
    }
    OracleConfig::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn print_reading(reading: &Reading) {
    println!("{} {}", "Lens:".bold(), reading.lens);
    println!("{} {}", "Script:".bold(), reading.script.clone().cyan());
    match &reading.interpretation {
        Interpretation::Translated(text) => println!("{} {}", "Interpretation:".bold(), text),
        Interpretation::Failed(message) => {
            println!("{} {}", "Interpretation:".bold(), format!("unavailable ({message})").red())
        }
        Interpretation::Skipped => println!("{} {}", "Interpretation:".bold(), "skipped".dim()),
    }
    if let Some(power) = reading.power {
        println!("{} {}", "Power:".bold(), power);
    }
}

fn repl(engine: &OracleEngine, mut lens: String) -> std::io::Result<()> {
    println!("{}", "Name Oracle. Type a name, ':lens <name>' to switch, 'exit' to quit.".bold());
    println!("---------------------------------------------------------------");

    loop {
        print!("\n[{}] > ", engine.resolve(&lens).lens);
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        match cmd {
            "exit" => break,
            "" => continue,
            s if s.starts_with(":lens") => {
                let requested = s[":lens".len()..].trim();
                match engine.registry().get(requested) {
                    Some(profile) => {
                        lens = profile.lens.clone();
                        println!("Switched to {}", profile.name);
                    }
                    None => println!("Unknown lens '{}'", requested),
                }
            }
            s => {
                let reading = engine.read(s, &lens);
                for word in &reading.words {
                    let glyphs = if word.outcome.is_rendered() {
                        word.outcome.as_str().to_string().cyan()
                    } else {
                        word.outcome.as_str().to_string().red()
                    };
                    println!("  {:<16} {:<24} {}", word.word, word.phonemes.join(" "), glyphs);
                }
                print_reading(&reading);
            }
        }
    }
    Ok(())
}

//! FactVerse terminal fact generator.
//!
//! Prints random facts from a local table, or fresh ones from an
//! OpenAI-compatible chat completions API when `OPENAI_API_KEY` is set.
//!
//! ```bash
//! factverse                          # Interactive menu
//! factverse --local                  # Never call the API
//! factverse --remote-only            # API only, no fact table needed
//! factverse --builtin                # Compiled-in demo facts
//! factverse --status                 # Show what is configured and exit
//! factverse --category fun --count 3 # Print facts without the menu
//! ```

mod display;
mod input;
mod menu;
mod shell;

use clap::{ArgAction, Parser};
use factverse_core::{
    FactEntry, FactProvider, FactStore, FactverseConfig, RecordError, RemoteFactClient,
    SessionRecorder,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use input::LineInput;
use shell::{Shell, ShellOptions};

#[derive(Parser, Debug)]
#[command(name = "factverse", version, about = "Hacker-style terminal fact generator")]
struct Args {
    /// JSON fact table (category -> list of facts)
    #[arg(long, value_name = "PATH")]
    facts: Option<PathBuf>,

    /// File that saved facts are appended to
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Use local facts only, even if an API key is set
    #[arg(long, conflicts_with = "remote_only")]
    local: bool,

    /// Use the API only; no local fact table is loaded
    #[arg(long, conflicts_with_all = ["builtin", "facts"])]
    remote_only: bool,

    /// Use the compiled-in demo facts instead of a fact table
    #[arg(long, conflicts_with = "facts")]
    builtin: bool,

    /// Print the generator status and exit
    #[arg(long)]
    status: bool,

    /// Print facts for this category and exit
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,

    /// Number of facts to print with --category
    #[arg(long, default_value_t = 1, requires = "category")]
    count: usize,

    /// Also append the printed facts to the output file
    #[arg(long, requires = "category")]
    save: bool,

    /// Chat model to use
    #[arg(long)]
    model: Option<String>,

    /// Seed for reproducible local picks
    #[arg(long)]
    seed: Option<u64>,

    /// Avoid repeating local facts within a session
    #[arg(long)]
    no_repeat: bool,

    /// Skip the typing animation and delays
    #[arg(long)]
    no_animation: bool,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    tracing::debug!(?config, "configuration");

    let remote = RemoteFactClient::from_config(&config.remote)?
        .map(|r| match config.seed {
            Some(seed) => r.with_seed(seed),
            None => r,
        });
    if args.remote_only && remote.is_none() {
        eprintln!("Error: --remote-only needs an API key.");
        eprintln!("Please set it in .env file or with: export OPENAI_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let store = if args.builtin {
        FactStore::builtin()
    } else if args.remote_only {
        FactStore::empty()
    } else {
        match FactStore::load(&config.facts_path).await {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Error loading {}: {e}", config.facts_path.display());
                std::process::exit(1);
            }
        }
    };

    let mut provider = FactProvider::new(Arc::new(store))
        .with_optional_remote(remote)
        .with_local_dedupe(config.dedupe_local);
    if let Some(seed) = config.seed {
        provider = provider.with_seed(seed);
    }

    if args.status {
        print!("{}", display::format_status(&provider.status(), &config.facts_path));
        return Ok(());
    }

    if provider.store().is_empty() && !provider.has_remote() {
        eprintln!(
            "Error: no facts found in {} and no OPENAI_API_KEY set.",
            config.facts_path.display()
        );
        eprintln!("Provide a fact table with --facts, use --builtin, or set an API key.");
        std::process::exit(1);
    }

    let recorder = SessionRecorder::new(&config.output_path);

    if let Some(category) = &args.category {
        let saving = args.save.then_some(recorder);
        let ok = print_facts(&mut provider, category, args.count, saving).await?;
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let options = ShellOptions {
        animate: !args.no_animation,
        ai_mode: provider.has_remote(),
        show_toggle: !args.remote_only,
    };
    let mut shell = Shell::new(provider, recorder, LineInput::stdin(), options);
    shell.run().await?;
    tracing::info!(
        seen = shell.provider().seen().len(),
        saved = shell.recorder().written(),
        "session ended"
    );

    Ok(())
}

/// Default to errors only so that fallbacks stay silent in the menu.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Environment first, then command-line overrides.
fn build_config(args: &Args) -> Result<FactverseConfig, factverse_core::ConfigError> {
    let mut config = FactverseConfig::from_env()?.with_dedupe_local(args.no_repeat);

    if let Some(path) = &args.facts {
        config = config.with_facts_path(path);
    }
    if let Some(path) = &args.output {
        config = config.with_output_path(path);
    }
    if let Some(model) = &args.model {
        config.remote = config.remote.with_model(model);
    }
    if args.local {
        config.remote = config.remote.disabled();
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    Ok(config)
}

/// One-shot mode: print `count` facts as `[TAG] text` lines.
///
/// Returns `false` if any fact was unavailable.
async fn print_facts(
    provider: &mut FactProvider,
    category: &str,
    count: usize,
    mut recorder: Option<SessionRecorder>,
) -> Result<bool, RecordError> {
    let prefer_remote = provider.has_remote();
    let mut ok = true;

    for _ in 0..count {
        let entry: FactEntry = provider
            .get_fact_until(category, prefer_remote, shell::ctrl_c())
            .await;
        println!("[{}] {}", entry.provenance.tag(), entry.text);
        ok &= !entry.is_error();

        if let Some(recorder) = recorder.as_mut() {
            recorder.record_entry(&entry).await?;
        }
    }

    Ok(ok)
}

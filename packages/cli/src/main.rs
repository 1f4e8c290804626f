mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, blocks, form, get_value, init, remove, set_prop, set_value, show, AddArgs, BlocksArgs, FormArgs,
    GetValueArgs, InitArgs, RemoveArgs, SetPropArgs, SetValueArgs, ShowArgs,
};
use config::Config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Formwork CLI - build forms out of blocks
#[derive(Parser, Debug)]
#[command(name = "formwork")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Formwork project
    Init(InitArgs),

    /// List the available block types
    Blocks(BlocksArgs),

    /// Print the block outline of the document
    Show(ShowArgs),

    /// Drop a new block onto a zone or container
    Add(AddArgs),

    /// Remove a block and everything inside it
    Remove(RemoveArgs),

    /// Set one property of a block
    SetProp(SetPropArgs),

    /// Store a value in the form data
    SetValue(SetValueArgs),

    /// Read a value from the form data
    GetValue(GetValueArgs),

    /// Show or submit a block's settings form
    Form(FormArgs),
}

fn init_tracing(verbose: u8, config_level: &str) {
    let level = match verbose {
        0 => config_level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();
    let config = Config::load(&cwd)?;

    init_tracing(cli.verbose, &config.log_level);
    debug!(cwd = %cwd, document = %config.document, "Loaded configuration");

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Blocks(args) => blocks(args, &config),
        Command::Show(args) => show(args, &config, &cwd),
        Command::Add(args) => add(args, &config, &cwd),
        Command::Remove(args) => remove(args, &config, &cwd),
        Command::SetProp(args) => set_prop(args, &config, &cwd),
        Command::SetValue(args) => set_value(args, &config, &cwd),
        Command::GetValue(args) => get_value(args, &config, &cwd),
        Command::Form(args) => form(args, &config, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

use anyhow::{anyhow, Result};
use inquire::Text;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use pdakit::cli::{parse_accounts_json, parse_args_json, Cli, Commands, ConfigCommands};
use pdakit::config::Config;
use pdakit::display::{
    display_derive_report, display_derived, display_error, display_not_found, display_readiness,
    display_seed_recipes, display_wire_args,
};
use pdakit::idl::{load_idl, IdlInstruction};
use pdakit::normalize::convert_args;
use pdakit::pda::{
    check_readiness, DecoderUnavailable, DerivationInputs, Deriver, MissingDependency,
    RpcAccountFetcher,
};
use pdakit::schema::{display_name, SchemaContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let result = run(cli).await;

    if let Err(e) = &result {
        display_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pdakit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Convert { instruction, args } => cmd_convert(&cli, instruction, args).await,
        Commands::Derive {
            instruction,
            account,
            args,
            accounts,
            interactive,
        } => {
            cmd_derive(
                &cli,
                instruction,
                account.as_deref(),
                args,
                accounts,
                *interactive,
            )
            .await
        }
        Commands::Check {
            instruction,
            account,
            args,
            accounts,
        } => cmd_check(&cli, instruction, account.as_deref(), args, accounts).await,
        Commands::Seeds { instruction } => cmd_seeds(&cli, instruction).await,
        Commands::Config { action } => cmd_config(action.clone()),
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Handle `convert` command - normalize instruction args to wire values
async fn cmd_convert(cli: &Cli, instruction: &str, args: &str) -> Result<()> {
    let ctx = load_context(cli).await?;
    let ix = find_instruction(&ctx, instruction)?;

    let values = convert_args(ix, &parse_args_json(args)?, &ctx)?;
    display_wire_args(ix, &values)?;
    Ok(())
}

/// Handle `derive` command - derive one PDA account, or all of them
async fn cmd_derive(
    cli: &Cli,
    instruction: &str,
    account: Option<&str>,
    args: &str,
    accounts: &str,
    interactive: bool,
) -> Result<()> {
    let ctx = load_context(cli).await?;
    let ix = find_instruction(&ctx, instruction)?;

    let mut inputs = DerivationInputs::new(parse_args_json(args)?, parse_accounts_json(accounts)?);
    if interactive {
        prompt_missing_args(ix, account, &mut inputs)?;
    }

    let config = load_config(cli);
    let fetcher = RpcAccountFetcher::new(&config.rpc_url, config.commitment_config()?);
    let deriver = Deriver::new(&ctx, &fetcher, &DecoderUnavailable);

    match account {
        Some(name) => {
            let derived = deriver.derive_account(&ix.name, name, &inputs).await?;
            display_derived(name, &derived);
        }
        None => {
            let report = deriver.derive_all(ix, &inputs).await?;
            if report.derived.is_empty() && report.pending.is_empty() {
                println!("No PDA accounts left to derive in {}", ix.name);
            }
            display_derive_report(&report);
        }
    }
    Ok(())
}

/// Handle `check` command - report missing inputs per PDA account
async fn cmd_check(
    cli: &Cli,
    instruction: &str,
    account: Option<&str>,
    args: &str,
    accounts: &str,
) -> Result<()> {
    let ctx = load_context(cli).await?;
    let ix = find_instruction(&ctx, instruction)?;
    let inputs = DerivationInputs::new(parse_args_json(args)?, parse_accounts_json(accounts)?);

    println!();
    for pda_account in pda_accounts(ix, account)? {
        if let Some(pda) = &pda_account.pda {
            display_readiness(&pda_account.name, &check_readiness(pda, &inputs));
        }
    }
    println!();
    Ok(())
}

/// Handle `seeds` command - show seed recipes
async fn cmd_seeds(cli: &Cli, instruction: &str) -> Result<()> {
    let ctx = load_context(cli).await?;
    let ix = find_instruction(&ctx, instruction)?;
    display_seed_recipes(ix);
    Ok(())
}

/// Handle `config` subcommands
fn cmd_config(action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let config = Config::load()?;
            let config_path = Config::file_path()?;

            println!();
            println!("pdakit configuration:");
            println!("  Config file: {}", config_path.display());
            println!(
                "  File exists: {}",
                if config_path.exists() { "yes" } else { "no (using defaults)" }
            );
            println!();
            println!("  RPC URL:    {}", config.rpc_url);
            println!("  Commitment: {}", config.commitment);
            println!();
            Ok(())
        }
        ConfigCommands::Set { url, commitment } => {
            if url.is_none() && commitment.is_none() {
                println!("No value provided to set.");
                println!("Usage: pdakit config set [--url <RPC_URL>] [--commitment <LEVEL>]");
                return Ok(());
            }

            let mut config = Config::load()?;
            if let Some(url) = url {
                config.rpc_url = url;
            }
            if let Some(commitment) = commitment {
                config.commitment = commitment;
            }

            config.validate()?;
            config.save()?;

            println!("Saved configuration to {}", Config::file_path()?.display());
            println!("  rpc_url = \"{}\"", config.rpc_url);
            println!("  commitment = \"{}\"", config.commitment);
            Ok(())
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Load the IDL from --idl or --program and index it
async fn load_context(cli: &Cli) -> Result<SchemaContext> {
    let source = cli.idl_source()?;
    let config = load_config(cli);
    let idl = load_idl(&source, &config.rpc_url).await?;
    Ok(SchemaContext::new(idl))
}

/// Config from file, with --url taking precedence
fn load_config(cli: &Cli) -> Config {
    let mut config = Config::load().unwrap_or_default();
    if let Some(url) = &cli.url {
        config.rpc_url = url.clone();
    }
    config
}

fn find_instruction<'a>(ctx: &'a SchemaContext, name: &str) -> Result<&'a IdlInstruction> {
    ctx.idl().instruction(name).ok_or_else(|| {
        let available: Vec<&str> = ctx
            .idl()
            .instructions
            .iter()
            .map(|ix| ix.name.as_str())
            .collect();
        display_not_found("Instruction", name, &available);
        anyhow!("Instruction '{}' not found", name)
    })
}

/// The named PDA account, or every PDA account when no name is given
fn pda_accounts<'a>(
    ix: &'a IdlInstruction,
    account: Option<&str>,
) -> Result<Vec<&'a pdakit::idl::IdlAccount>> {
    match account {
        Some(name) => {
            let found = ix.find_account(name).ok_or_else(|| {
                let available: Vec<&str> =
                    ix.flat_accounts().iter().map(|a| a.name.as_str()).collect();
                display_not_found("Account", name, &available);
                anyhow!("Account '{}' not found in {}", name, ix.name)
            })?;
            if found.pda.is_none() {
                return Err(anyhow!("Account '{}' is not a PDA", found.name));
            }
            Ok(vec![found])
        }
        None => Ok(ix
            .flat_accounts()
            .into_iter()
            .filter(|a| a.pda.is_some())
            .collect()),
    }
}

/// Ask for every argument the selected recipes still need.
///
/// Input that parses as JSON is used as-is, anything else as a string.
fn prompt_missing_args(
    ix: &IdlInstruction,
    account: Option<&str>,
    inputs: &mut DerivationInputs,
) -> Result<()> {
    let mut missing = Vec::new();
    for pda_account in pda_accounts(ix, account)? {
        if let Some(pda) = &pda_account.pda {
            for dependency in check_readiness(pda, inputs).missing {
                if let MissingDependency::Arg(name) = dependency {
                    if !missing.contains(&name) {
                        missing.push(name);
                    }
                }
            }
        }
    }

    for name in missing {
        let ty = ix
            .arg(&name)
            .map(|arg| display_name(&arg.ty))
            .unwrap_or_else(|| "?".to_string());
        let answer = Text::new(&format!("{} ({}):", name, ty)).prompt()?;
        let value = serde_json::from_str(&answer).unwrap_or(Value::String(answer));
        inputs.args.insert(name, value);
    }

    Ok(())
}

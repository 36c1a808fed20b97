//! Votelock CLI - Explore and simulate the vote-escrow ledger.

pub mod scenario;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scenario::{Scenario, Step};
use votelock_escrow::{ChainClock, EscrowConfig, Lockup};
use votelock_types::{floor_week, WEEK};

/// Main CLI.
#[derive(Parser)]
#[command(name = "votelock")]
#[command(about = "Votelock - vote-escrow ledger simulator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Log level (e.g. "info", "votelock_escrow=debug")
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the decay schedule for a hypothetical lockup
    Curve {
        /// Locked amount, in whole tokens
        #[arg(short, long)]
        amount: u64,

        /// Lock duration in weeks
        #[arg(short, long)]
        weeks: u64,

        /// Token decimals
        #[arg(short, long, default_value = "18")]
        decimals: u8,
    },

    /// Replay a TOML scenario file against an in-memory ledger
    Simulate {
        /// Scenario file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    match cli.command {
        Commands::Curve {
            amount,
            weeks,
            decimals,
        } => print_curve(amount, weeks, decimals),
        Commands::Simulate { file } => simulate(&file),
    }
}

fn print_curve(amount: u64, weeks: u64, decimals: u8) -> anyhow::Result<()> {
    let config = EscrowConfig::default();
    let unit = 10u128.pow(decimals as u32);
    let lockup = Lockup::new(amount as u128 * unit, weeks * WEEK);

    if weeks * WEEK > config.max_lock_time {
        anyhow::bail!("{} weeks exceeds the maximum lockup time", weeks);
    }

    println!(
        "Decay schedule for {} tokens locked {} week(s):",
        amount, weeks
    );
    println!("{:>6}  {:>24}  {:>7}", "week", "power", "% start");
    let start = votelock_escrow::power_at(&lockup, 0, config.max_lock_time);
    for week in 0..=weeks {
        let power = votelock_escrow::power_at(&lockup, week * WEEK, config.max_lock_time);
        let pct = if start == 0 { 0 } else { power * 100 / start };
        println!("{:>6}  {:>24}  {:>6}%", week, power, pct);
    }
    Ok(())
}

fn simulate(file: &PathBuf) -> anyhow::Result<()> {
    let scenario = Scenario::from_file(file)?;
    tracing::debug!("Loaded scenario from {}", file.display());
    let mut ledger = scenario.build_ledger();
    let unit = 10u128.pow(ledger.decimals() as u32);

    println!(
        "Simulating {} step(s) on {} ({})",
        scenario.steps.len(),
        ledger.name(),
        ledger.symbol()
    );

    for (i, step) in scenario.steps.iter().enumerate() {
        print!("step {:>3}: ", i + 1);
        match step {
            Step::Lockup {
                account,
                amount,
                weeks,
            } => {
                let end = floor_week(ledger.clock().now()) + weeks * WEEK;
                println!("lockup {} tokens for {} until week-end {}", amount, account, end);
                ledger.lockup(*account, *amount as u128 * unit, end)?;
            }
            Step::Withdraw { account } => {
                let credited = ledger.withdraw(*account)?;
                println!("withdraw {}: {} base units returned", account, credited);
            }
            Step::Delegate { account, to } => {
                match to {
                    Some(delegate) => println!("delegate {} -> {}", account, delegate),
                    None => println!("un-delegate {}", account),
                }
                ledger.delegate(*account, *to)?;
            }
            Step::Cleanup { delegate } => {
                let pruned = ledger.clean_up_weak_delegators(*delegate)?;
                println!("cleanup {}: pruned {} delegator(s)", delegate, pruned);
            }
            Step::Sleep { hours } => {
                println!("advance {} hour(s)", hours);
                ledger.clock_mut().mine_blocks(*hours, 3600);
            }
        }

        for account in &scenario.accounts {
            println!(
                "          {}  power {}",
                account.address,
                ledger.balance_of(&account.address)
            );
        }
        println!("          total supply {}", ledger.total_supply());
    }

    Ok(())
}

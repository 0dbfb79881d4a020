use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use gvl_sdk::{Governance, ManualClock, Summary, Timestamp, ValidationReport};

use crate::cli::*;
use crate::config::GovernanceConfig;
use crate::script::{Script, StepReport};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args, cli.format),
        Command::Config(args) => cmd_config(args, cli.format),
    }
}

fn cmd_run(args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = GovernanceConfig::load(args.config.as_deref())?;
    let script = Script::load(&args.script)?;

    let clock = Arc::new(ManualClock::new(Timestamp::zero()));
    let gov = Governance::new(config.voting, clock.clone())?;
    let reports = script.run(&gov, &clock)?;

    let summary = gov.summary()?;
    let report = gov.validate()?;
    let converged = gov.verify_replay()?;

    match format {
        OutputFormat::Text => print_text(&reports, &summary, &report, converged),
        OutputFormat::Json => {
            let out = json!({
                "steps": reports,
                "summary": {
                    "now": summary.now.as_secs(),
                    "total_supply": summary.total_supply.to_string(),
                    "max_minted": summary.max_minted.to_string(),
                    "total_burned": summary.total_burned.to_string(),
                    "accounts": summary.accounts,
                    "journal_entries": summary.journal_entries,
                    "votings": summary.votings,
                },
                "valid": report.is_valid(),
                "violations": report.violations.iter().map(|v| v.description.clone()).collect::<Vec<_>>(),
                "replay_converged": converged,
            });
            println!("{}", serde_json::to_string_pretty(&out).context("rendering report")?);
        }
    }

    if !report.is_valid() || !converged {
        anyhow::bail!("ledger audit failed");
    }
    Ok(())
}

fn print_text(reports: &[StepReport], summary: &Summary, report: &ValidationReport, converged: bool) {
    for step in reports {
        let mark = if step.ok { "✓".green() } else { "✗".yellow() };
        println!(
            "{} {} {:<13} {}",
            mark,
            format!("[{:>6}]", step.at).dimmed(),
            step.op.bold(),
            step.detail
        );
    }
    println!();
    println!(
        "Supply: {} (minted {}, burned {})",
        summary.total_supply.to_string().bold(),
        summary.max_minted,
        summary.total_burned
    );
    println!(
        "Accounts: {}  Journal: {}  Votings: {}",
        summary.accounts, summary.journal_entries, summary.votings
    );
    if report.is_valid() {
        println!("{} History and conservation verified", "✓".green().bold());
    } else {
        for violation in &report.violations {
            println!("{} {}", "✗".red().bold(), violation.description);
        }
    }
    let replay = if converged { "converged".green() } else { "diverged".red() };
    println!("  Replay: {}", replay);
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = GovernanceConfig::load(args.config.as_deref())?;
    match format {
        OutputFormat::Text => print!("{}", config.to_toml()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

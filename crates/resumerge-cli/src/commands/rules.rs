//! Rules command - inspect extraction rulesets.

use clap::{Args, Subcommand};
use console::style;

use resumerge_core::resume::rules::builtin;
use resumerge_core::{PatternRuleset, RulesetChoice};

use super::config::load_config;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// List built-in rulesets
    List,

    /// Print a ruleset as JSON (default: the configured one)
    Show {
        /// Built-in ruleset name
        name: Option<String>,
    },
}

pub async fn run(args: RulesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        RulesCommand::List => list_rulesets(config_path),
        RulesCommand::Show { name } => show_ruleset(name.as_deref(), config_path),
    }
}

fn list_rulesets(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let active = config.extraction.ruleset.ruleset().name;

    println!("{}", style("Built-in rulesets").bold());
    println!();

    for name in builtin::NAMES {
        let ruleset = builtin::by_name(name)?;
        let marker = if ruleset.name == active {
            style(" ◀ active").green().to_string()
        } else {
            String::new()
        };
        println!("  {}{}", style(&ruleset.name).cyan().bold(), marker);
        println!("    {}", ruleset.description);
        println!("    {} fields", ruleset.rules.len());
    }

    if let RulesetChoice::Custom(ruleset) = &config.extraction.ruleset {
        println!();
        println!(
            "  {} {} (custom, {} fields)",
            style(&ruleset.name).cyan().bold(),
            style("◀ active").green(),
            ruleset.rules.len()
        );
    }

    Ok(())
}

fn show_ruleset(name: Option<&str>, config_path: Option<&str>) -> anyhow::Result<()> {
    let ruleset: PatternRuleset = match name {
        Some(name) => builtin::by_name(name)?,
        None => load_config(config_path)?.extraction.ruleset.ruleset(),
    };

    // Surface invalid patterns before printing
    ruleset.compile()?;

    println!("{}", serde_json::to_string_pretty(&ruleset)?);

    Ok(())
}

use anyhow::bail;
use colored::*;
use leadflow_cli::render::{offers_table, questions_table};
use leadflow_config::Config;
use leadflow_core::Intent;

pub async fn list_offers(config: &Config, offline: bool) -> anyhow::Result<()> {
    let registry = super::registry(config, offline).await?;

    println!("{}", "Leadflow offers".blue().bold());
    println!();
    println!("{}", offers_table(&registry));
    println!("Total: {} offers", registry.offers().len().to_string().cyan());
    Ok(())
}

pub async fn show_questions(
    config: &Config,
    offline: bool,
    offer: &str,
    intent: Intent,
) -> anyhow::Result<()> {
    let registry = super::registry(config, offline).await?;

    let Some(details) = registry.offer(offer) else {
        bail!("unknown offer '{}'", offer);
    };
    if !details.supports(intent) {
        bail!("offer '{}' does not support the {} flow", offer, intent);
    }

    let questions = registry.questions(offer, intent);
    println!(
        "{}",
        format!("{} · {}", details.label, intent.label()).blue().bold()
    );
    println!();

    if questions.is_empty() {
        println!("{}", "No questions configured; this flow completes immediately".yellow());
        return Ok(());
    }

    println!("{}", questions_table(questions));
    Ok(())
}

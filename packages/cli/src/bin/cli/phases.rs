use colored::*;
use leadflow_cli::render::{progress_bar, timeline_table};
use leadflow_client::ClientError;
use leadflow_config::Config;
use leadflow_core::Intent;
use leadflow_timeline::{default_phases, PhaseBounds, PhaseBuilder};

pub async fn show_phases(config: &Config, offline: bool, flow: Intent) -> anyhow::Result<()> {
    let saved = if offline {
        Vec::new()
    } else {
        match super::api_client(config)?.custom_phases(flow).await {
            Ok(phases) => phases,
            Err(ClientError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        }
    };

    let custom = !saved.is_empty();
    let phases = if custom { saved } else { default_phases(flow) };
    let builder = PhaseBuilder::new(flow, phases, PhaseBounds::default());

    let source = if custom { "custom" } else { "starter" };
    println!(
        "{}",
        format!("{} timeline ({} phases)", flow.label(), source).blue().bold()
    );
    println!();
    println!("{}", timeline_table(&builder));

    let coverage = builder.coverage();
    println!(
        "Advice coverage: {} {}",
        progress_bar(coverage.percent(), 20).green(),
        format!("({}/{} steps)", coverage.with_advice, coverage.total).dimmed()
    );
    Ok(())
}

use colored::*;
use leadflow_cli::render::{category_lines, entries_table};
use leadflow_config::Config;
use leadflow_knowledge::CategoryTree;

pub async fn show_knowledge(config: &Config, search: Option<&str>) -> anyhow::Result<()> {
    let client = super::api_client(config)?;
    let brain = client.knowledge_brain().await?;
    let tree = CategoryTree::build(brain.entries, &brain.custom_categories);

    if let Some(query) = search {
        let hits = tree.search(query);
        if hits.is_empty() {
            println!("{}", format!("No knowledge matches '{}'", query).yellow());
            return Ok(());
        }
        println!("{}", entries_table(&hits));
        println!("Matches: {}", hits.len().to_string().cyan());
        return Ok(());
    }

    println!("{}", "Knowledge brain".blue().bold());
    println!();
    for line in category_lines(&tree) {
        println!("{}", line);
    }
    println!();
    println!("{}", "* custom category".dimmed());
    Ok(())
}

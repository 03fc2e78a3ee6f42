//! CLI mode
//!
//! Renders documents and decisions to stdout using the same service the
//! server uses.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::api::services::indexability::DecisionResponse;
use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::sitemap::{EntityKey, SitemapService};

const DEFAULT_SAMPLE_CONFIG_PATH: &str = "config.example.toml";

/// 需要目录的命令才连接存储
async fn sitemap_service() -> Result<Arc<SitemapService>> {
    let startup = lifetime::startup::prepare_startup().await?;
    Ok(startup.sitemap)
}

/// Run one CLI command
pub async fn run_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Render { kind, part } => {
            let sitemap = sitemap_service().await?;
            print!("{}", sitemap.render_sitemap_part(kind, part).await?);
        }
        Commands::Index => {
            let sitemap = sitemap_service().await?;
            print!("{}", sitemap.render_index().await?);
        }
        Commands::Static => {
            let sitemap = sitemap_service().await?;
            print!("{}", sitemap.render_static()?);
        }
        Commands::Decide { kind, key } => {
            let key = EntityKey::parse(kind, &key)?;
            let sitemap = sitemap_service().await?;
            let Some(decision) = sitemap.decide(&key).await? else {
                bail!("{} '{}' not found in the catalog", kind, key);
            };
            let json = serde_json::to_string_pretty(&DecisionResponse::from(decision))?;
            println!("{}", json);
        }
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force)?,
    }
    Ok(())
}

fn config_generate(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_CONFIG_PATH.to_string());

    if std::path::Path::new(&path).exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite",
            path
        );
    }

    eprintln!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );
    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Unable to write configuration file {}", path))?;
    eprintln!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::EntityKind;

    fn generate(path: &std::path::Path, force: bool) -> Commands {
        Commands::Config {
            action: ConfigCommands::Generate {
                output_path: Some(path.display().to_string()),
                force,
            },
        }
    }

    #[tokio::test]
    async fn test_config_generate_respects_force() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("routemap.toml");

        run_command(generate(&path, false)).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[sitemap]"));

        assert!(run_command(generate(&path, false)).await.is_err());
        run_command(generate(&path, true)).await.unwrap();
    }

    #[tokio::test]
    async fn test_decide_rejects_bad_key_before_connecting() {
        let err = run_command(Commands::Decide {
            kind: EntityKind::Routes,
            key: "not-a-route".to_string(),
        })
        .await
        .unwrap_err();
        assert!(err.downcast_ref::<crate::errors::RoutemapError>().is_some());
    }
}

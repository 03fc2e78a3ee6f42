//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::sitemap::EntityKind;

/// routemap - sitemap and indexability service for a travel catalog
#[derive(Parser)]
#[command(name = "routemap")]
#[command(version)]
#[command(about = "Sitemap and indexability service for a travel catalog", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without a subcommand the HTTP server starts.
#[derive(Subcommand)]
pub enum Commands {
    /// Render one sitemap part to stdout
    ///
    /// Usage: render <KIND> <PART>
    /// - KIND: airports, routes, airline-routes, airline-airports
    /// - PART: 1-based part index
    Render {
        kind: EntityKind,
        part: usize,
    },

    /// Render the sitemap index to stdout
    Index,

    /// Render the static sitemap to stdout
    Static,

    /// Print the indexability decision for one entity as JSON
    ///
    /// Keys: DEL, DEL-BOM, AI:DEL-BOM, AI:DEL
    Decide {
        kind: EntityKind,
        key: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from(["routemap", "render", "airline-routes", "2"]).unwrap();
        match cli.command {
            Some(Commands::Render { kind, part }) => {
                assert_eq!(kind, EntityKind::AirlineRoutes);
                assert_eq!(part, 2);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["routemap", "render", "blog", "1"]).is_err());
    }

    #[test]
    fn test_no_subcommand_runs_server() {
        let cli = Cli::try_parse_from(["routemap", "-c", "custom.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }
}

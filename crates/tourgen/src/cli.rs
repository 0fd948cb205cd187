//! Command-line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tourgen")]
#[command(version, long_about = None)]
#[command(about = "Generate a CodeTour walkthrough from the diff between two git revisions")]
pub struct Cli {
    /// Revision the tour starts from
    pub from: String,

    /// Revision the tour ends at
    #[arg(default_value = "HEAD")]
    pub to: String,

    /// Repository directory
    #[arg(short = 'C', long, default_value = ".")]
    pub repo: PathBuf,

    /// Write the tour to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only keep files matching GLOB (repeatable)
    #[arg(short, long = "include", value_name = "GLOB")]
    pub include: Vec<String>,

    /// Drop files matching GLOB (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Override the generated tour title
    #[arg(long)]
    pub title: Option<String>,

    /// Emit compact JSON instead of indented JSON
    #[arg(long)]
    pub compact: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["tourgen", "main"]);
        assert_eq!(cli.from, "main");
        assert_eq!(cli.to, "HEAD");
        assert_eq!(cli.repo, PathBuf::from("."));
        assert!(cli.output.is_none());
        assert!(!cli.compact);
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_repeated_options() {
        let cli = Cli::parse_from([
            "tourgen", "v1.0", "v1.1", "-i", "src/**", "--include", "*.md", "-x", "*.lock",
            "-o", "tour.json", "-vv",
        ]);
        assert_eq!(cli.to, "v1.1");
        assert_eq!(cli.include, vec!["src/**", "*.md"]);
        assert_eq!(cli.exclude, vec!["*.lock"]);
        assert_eq!(cli.output, Some(PathBuf::from("tour.json")));
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
    }
}

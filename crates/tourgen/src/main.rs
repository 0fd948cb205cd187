//! tourgen - generate a CodeTour from the diff between two git revisions

mod cli;
mod config;
mod filter;
mod git;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tourgen_core::{change_runs, RevisionInfo, StepSynthesizer, Tour};

use crate::cli::Cli;
use crate::config::Config;
use crate::filter::PathFilter;

const CODETOUR_SCHEMA: &str = "https://aka.ms/codetour-schema";

/// The tour as written to disk
#[derive(Serialize)]
struct TourDocument<'a> {
    #[serde(rename = "$schema")]
    schema: &'static str,
    #[serde(flatten)]
    tour: &'a Tour,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if !git::is_git_repo(&cli.repo) {
        bail!(git::GitError::NotARepo(cli.repo.clone()));
    }
    let root = git::get_repo_root(&cli.repo)?;
    log::debug!("Repository root: {}", root.display());

    let from = git::resolve_revision(&root, &cli.from)?;
    let to = git::resolve_revision(&root, &cli.to)?;
    log::info!("Building tour {} -> {}", from.short_hash, to.short_hash);

    let diff_text = git::get_diff_between(&root, &cli.from, &cli.to)
        .with_context(|| format!("Failed to diff {} against {}", cli.from, cli.to))?;

    let filter = PathFilter::new(&cli.include, config.exclude.iter().chain(&cli.exclude))?;
    let synthesizer = config.synthesizer()?;

    let mut tour = build_tour(&diff_text, &synthesizer, &filter, &from, &to);
    if let Some(title) = cli.title {
        tour = tour.with_title(title);
    }

    let json = render(&tour, cli.compact || config.compact)?;
    write_output(cli.output.as_deref(), &json)
}

/// Parse, filter and synthesize, keeping diff order
fn build_tour(
    diff_text: &str,
    synthesizer: &StepSynthesizer,
    filter: &PathFilter,
    from: &RevisionInfo,
    to: &RevisionInfo,
) -> Tour {
    if !filter.is_empty() {
        log::debug!("Filtering changed files by path");
    }

    let mut runs = change_runs(diff_text);
    let steps: Vec<_> = runs
        .by_ref()
        .filter(|run| {
            let keep = filter.allows(&run.file_path);
            if !keep {
                log::debug!("Skipping filtered file {}", run.file_path);
            }
            keep
        })
        .flat_map(|run| synthesizer.synthesize(run))
        .collect();

    if !runs.warnings().is_empty() {
        log::warn!(
            "Skipped {} unparseable line(s) in the diff",
            runs.warnings().len()
        );
    }
    log::info!("Generated {} step(s)", steps.len());

    Tour::assemble(steps, from, to)
}

fn render(tour: &Tour, compact: bool) -> Result<String> {
    let document = TourDocument {
        schema: CODETOUR_SCHEMA,
        tour,
    };
    let json = if compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    Ok(json)
}

fn write_output(output: Option<&Path>, json: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote tour to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

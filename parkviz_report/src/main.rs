// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the Vancouver parking-rate charts to SVG and HTML.

mod config;
mod html;
mod render;
mod svg;
mod views;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use kurbo::Point;
use log::{error, info, warn};
use parkviz_charts::{ChartState, UiEvent, reduce};

use crate::config::ReportConfig;
use crate::html::{HtmlFrame, HtmlSection, render_report};
use crate::render::{Renderer, render_sequence};
use crate::views::{View, ViewName, build, hover_anchor};

#[derive(Parser)]
#[command(name = "parkviz")]
#[command(about = "Render the Vancouver parking-rate charts to SVG and HTML")]
struct Cli {
    /// Log verbosity level
    #[arg(long, global = true, default_value = "info")]
    log_level: LogLevel,
    /// Report configuration JSON file. Every field is optional.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the input files; overrides the configuration.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Transition length in milliseconds for every chart; overrides the configuration.
    #[arg(long, global = true)]
    transition_ms: Option<f64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render every chart under every filter option into one HTML file
    Report {
        /// Output HTML file.
        #[arg(long, default_value = "parkviz_report.html")]
        out: PathBuf,
        /// Show each state this many milliseconds into its transition instead of settled.
        #[arg(long)]
        frame_ms: Option<f64>,
    },
    /// Render one chart state as SVG
    Render {
        /// Chart to render.
        view: ViewName,
        /// Filter value (a local area for the filterable charts).
        #[arg(long)]
        filter: Option<String>,
        /// Hover key to highlight, e.g. "Downtown" or "Downtown / weekday".
        #[arg(long)]
        hover: Option<String>,
        /// Pointer position for the tooltip as `X,Y`; defaults to the hovered mark's center.
        #[arg(long, value_parser = parse_point, requires = "hover")]
        pointer: Option<Point>,
        /// Show the state this many milliseconds into its transition instead of settled.
        #[arg(long)]
        frame_ms: Option<f64>,
        /// Output SVG file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `X,Y`, got `{s}`"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate `{v}`: {e}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level.to_level_filter())
        .format_module_path(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if cli.transition_ms.is_some() {
        config.transition_ms = cli.transition_ms;
    }

    match &cli.command {
        Commands::Report { out, frame_ms } => report(&config, out, *frame_ms),
        Commands::Render {
            view,
            filter,
            hover,
            pointer,
            frame_ms,
            out,
        } => {
            let view = build(*view, &config)?;
            let state = hover_state(view.as_ref(), filter.clone(), hover.as_deref(), *pointer)?;
            let mut renderer = Renderer::new(view.as_ref(), *frame_ms);
            let frame = renderer.render(&state)?;
            info!("{}: {} marks [{}]", view.title(), renderer.len(), frame.caption);
            match out {
                Some(path) => write(path, &frame.svg),
                None => {
                    print!("{}", frame.svg);
                    Ok(())
                }
            }
        }
    }
}

/// Builds the state for `filter` with an optional hover on `key`.
fn hover_state(
    view: &dyn View,
    filter: Option<String>,
    key: Option<&str>,
    pointer: Option<Point>,
) -> anyhow::Result<ChartState> {
    let state = reduce(&ChartState::new(), UiEvent::SelectFilter(filter));
    let Some(key) = key else {
        return Ok(state);
    };
    let pointer = match pointer {
        Some(p) => p,
        None => match hover_anchor(view, state.filter.as_deref(), key)? {
            Some(p) => p,
            None => bail!("`{key}` does not match any mark of {}", view.title()),
        },
    };
    Ok(reduce(
        &state,
        UiEvent::PointerEnter {
            key: key.to_owned(),
            pointer,
        },
    ))
}

/// Every filter option in turn, then a hover on the first key of the unfiltered chart.
fn report_states(view: &dyn View) -> anyhow::Result<Vec<ChartState>> {
    let mut states: Vec<ChartState> = view
        .filters()
        .into_iter()
        .map(|f| reduce(&ChartState::new(), UiEvent::SelectFilter(f)))
        .collect();
    if let Some(key) = view.keys(None)?.into_iter().next() {
        states.push(hover_state(view, None, Some(&key), None)?);
    }
    Ok(states)
}

fn report(config: &ReportConfig, out: &Path, frame_ms: Option<f64>) -> anyhow::Result<()> {
    let mut sections = Vec::new();
    for name in ViewName::ALL {
        let view = match build(name, config) {
            Ok(v) => v,
            Err(e) => {
                error!("skipping {}: {e:#}", name.as_str());
                continue;
            }
        };
        let frames = match report_states(view.as_ref())
            .and_then(|states| render_sequence(view.as_ref(), &states, frame_ms))
        {
            Ok(f) => f,
            Err(e) => {
                error!("failed to render {}: {e:#}", name.as_str());
                continue;
            }
        };
        let filters = view.filters().len();
        info!("{}: {} states", name.as_str(), frames.len());
        sections.push(HtmlSection {
            title: view.title().to_owned(),
            description: if filters > 1 {
                format!("{} filter options", filters)
            } else {
                String::new()
            },
            frames: frames
                .into_iter()
                .map(|f| HtmlFrame {
                    caption: format!(
                        "{} ({} enter, {} update, {} exit)",
                        f.caption, f.counts.enter, f.counts.update, f.counts.exit
                    ),
                    svg: f.svg,
                })
                .collect(),
        });
    }
    if sections.is_empty() {
        warn!("no chart could be rendered; check --data-dir");
    }
    write(out, &render_report("Vancouver Parking Rates", &sections))
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write `{}`", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_view;

    #[test]
    fn pointers_parse_from_pairs() {
        assert_eq!(parse_point("10, 20.5").unwrap(), Point::new(10.0, 20.5));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn report_walks_filters_then_hovers() {
        let view = test_view();
        let states = report_states(view.as_ref()).unwrap();
        assert_eq!(states.len(), 4);
        assert_eq!(states[1].filter.as_deref(), Some("Downtown"));
        let hover = states[3].hover.as_ref().unwrap();
        assert_eq!(hover.key, "Downtown / weekday");
    }

    #[test]
    fn unknown_hover_keys_are_errors() {
        let view = test_view();
        assert!(hover_state(view.as_ref(), None, Some("Atlantis / weekday"), None).is_err());
        let pinned = hover_state(
            view.as_ref(),
            None,
            Some("Atlantis / weekday"),
            Some(Point::new(5.0, 5.0)),
        )
        .unwrap();
        assert_eq!(pinned.hover.unwrap().pointer, Point::new(5.0, 5.0));
    }
}

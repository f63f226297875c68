//! Terminal rendering of presenter views
//!
//! Summary tiles become a table, the domestic/foreign split a single
//! proportional bar, and the nationality ranking one horizontal bar per row.

use anyhow::Result;
use console::{style, Color as TermColor};
use indicatif::ProgressBar;
use padron_core::presenter::{Color, ReportView, SeriesEntry, View};
use tabled::Tabled;

use crate::output::OutputWriter;
use crate::progress;

/// Width in cells of the distribution bar and of the longest ranking bar
const BAR_WIDTH: usize = 40;

pub const EMPTY_PROMPT: &str = "Enter a municipality name to see demographic insights.";

#[derive(Tabled)]
struct TileRow {
    #[tabled(rename = "Indicator")]
    title: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Draws views one after another, owning the spinner between them
pub struct Renderer<'a> {
    output: &'a OutputWriter,
    spinner: Option<ProgressBar>,
}

impl<'a> Renderer<'a> {
    pub fn new(output: &'a OutputWriter) -> Self {
        Self { output, spinner: None }
    }

    /// Replace whatever is on screen with `view`
    pub fn show(&mut self, view: &View) -> Result<()> {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }

        match view {
            View::ShowSpinner => {
                if !self.output.is_json() {
                    self.spinner = Some(progress::create_spinner("Fetching demographics..."));
                }
            }
            View::ShowEmptyPrompt => self.output.info(EMPTY_PROMPT),
            View::ShowError(message) => {
                self.output.error(format!("Error loading demographic data: {}", message))
            }
            View::ShowReport(report) => self.report(report)?,
        }

        Ok(())
    }

    fn report(&self, report: &ReportView) -> Result<()> {
        if self.output.is_json() {
            return self.output.result(report);
        }

        self.output.section(&report.municipality);
        let rows: Vec<TileRow> = report
            .tiles()
            .into_iter()
            .map(|tile| TileRow { title: tile.title, value: tile.to_string() })
            .collect();
        self.output.table(rows);

        self.output.section("Distribución por Origen");
        self.output.line(distribution_bar(&report.distribution_series, BAR_WIDTH));
        for entry in &report.distribution_series {
            self.output.line(format!(
                "{} {}: {}",
                paint("■", entry.color),
                entry.label,
                report.locale().format_count(entry.value)
            ));
        }

        self.output.section("Principales Nacionalidades");
        if report.nationality_series.is_empty() {
            self.output.line(style("(no data)").dim());
        }
        for line in ranking_bars(report, BAR_WIDTH) {
            self.output.line(line);
        }

        Ok(())
    }
}

/// One bar split proportionally between the series entries
fn distribution_bar(series: &[SeriesEntry], width: usize) -> String {
    let total: u64 = series.iter().map(|e| e.value).sum();
    if total == 0 {
        return style("░".repeat(width)).dim().to_string();
    }

    let mut bar = String::new();
    let mut used = 0;
    for (i, entry) in series.iter().enumerate() {
        let cells = if i + 1 == series.len() {
            width - used
        } else {
            scaled(entry.value, total, width).min(width - used)
        };
        used += cells;
        bar.push_str(&paint(&"█".repeat(cells), entry.color));
    }
    bar
}

/// `label  ████ value` rows scaled to the largest value
fn ranking_bars(report: &ReportView, width: usize) -> Vec<String> {
    let series = &report.nationality_series;
    let max = series.iter().map(|e| e.value).max().unwrap_or(0);
    let label_width = series.iter().map(|e| e.label.chars().count()).max().unwrap_or(0);

    series
        .iter()
        .map(|entry| {
            // Any non-zero count stays visible; zero draws no bar
            let cells = if entry.value == 0 { 0 } else { scaled(entry.value, max, width).max(1) };
            format!(
                "{:<label_width$}  {} {}",
                entry.label,
                paint(&"█".repeat(cells), entry.color),
                report.locale().format_count(entry.value),
            )
        })
        .collect()
}

fn scaled(value: u64, of: u64, width: usize) -> usize {
    ((value as f64 / of as f64) * width as f64).round() as usize
}

fn paint(text: &str, color: Color) -> String {
    match color.rgb() {
        Some(rgb) => style(text).fg(TermColor::Color256(ansi256(rgb))).to_string(),
        None => text.to_string(),
    }
}

/// Nearest entry of the xterm 6x6x6 color cube
fn ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    let level = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

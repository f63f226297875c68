//! Report presenter: maps a [`RequestState`] to the one view to show
//!
//! Everything here is pure. The presenter derives display-only values
//! (percentages, palette colors, pre-formatted tile text) and never touches
//! controller state.

use serde::Serialize;
use std::fmt;

use crate::format::{percent_of, NumberLocale};
use crate::models::{Report, RequestState};

/// Fixed chart palette, assigned by series position
pub const DEFAULT_PALETTE: [Color; 5] = [
    Color("#0088FE"),
    Color("#00C49F"),
    Color("#FFBB28"),
    Color("#FF8042"),
    Color("#8884D8"),
];

/// Label of the domestic slice of the distribution chart
pub const DOMESTIC_LABEL: &str = "Española";

/// Label of the foreign slice of the distribution chart
pub const FOREIGN_LABEL: &str = "Extranjera";

/// Hex RGB color, e.g. `#0088FE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color(pub &'static str);

impl Color {
    /// Red, green and blue components, or `None` for a malformed hex string
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The single thing the visualization layer should draw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum View {
    ShowSpinner,
    ShowError(String),
    ShowEmptyPrompt,
    ShowReport(ReportView),
}

/// One labeled, colored value of a chart series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesEntry {
    pub label: String,
    pub value: u64,
    pub color: Color,
}

/// A summary card: heading, main figure and optional share of the total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTile {
    pub title: &'static str,
    pub value: String,
    pub percent: Option<String>,
}

impl fmt::Display for SummaryTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.percent {
            Some(percent) => write!(f, "{} ({})", self.value, percent),
            None => f.write_str(&self.value),
        }
    }
}

/// Render-ready form of a [`Report`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub municipality: String,
    pub population_total: u64,
    pub population_spanish: u64,
    pub population_foreign: u64,
    /// Share of Spanish nationals, one decimal; 0 when the total is 0
    pub spanish_percent: f64,
    /// Share of foreign nationals, one decimal; 0 when the total is 0
    pub foreign_percent: f64,
    /// Always two entries: domestic first, foreign second
    pub distribution_series: Vec<SeriesEntry>,
    /// Nationality ranking in service order
    pub nationality_series: Vec<SeriesEntry>,
    #[serde(skip)]
    locale: NumberLocale,
}

impl ReportView {
    /// Total, domestic and foreign summary cards
    pub fn tiles(&self) -> [SummaryTile; 3] {
        let locale = self.locale;
        [
            SummaryTile {
                title: "Población Total",
                value: locale.format_count(self.population_total),
                percent: None,
            },
            SummaryTile {
                title: "Españoles",
                value: locale.format_count(self.population_spanish),
                percent: Some(locale.format_percent(self.spanish_percent)),
            },
            SummaryTile {
                title: "Extranjeros",
                value: locale.format_count(self.population_foreign),
                percent: Some(locale.format_percent(self.foreign_percent)),
            },
        ]
    }

    /// `"name: value"` line per nationality, in ranking order
    pub fn ranking_lines(&self) -> Vec<String> {
        self.nationality_series
            .iter()
            .map(|entry| format!("{}: {}", entry.label, self.locale.format_count(entry.value)))
            .collect()
    }

    pub fn locale(&self) -> NumberLocale {
        self.locale
    }
}

/// Presentation settings shared by every render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPresenter {
    palette: &'static [Color],
    top_nationalities: Option<usize>,
    locale: NumberLocale,
}

impl Default for ReportPresenter {
    fn default() -> Self {
        Self { palette: &DEFAULT_PALETTE, top_nationalities: None, locale: NumberLocale::En }
    }
}

impl ReportPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the first `n` nationalities. `None` passes the list through.
    pub fn with_top_nationalities(mut self, n: Option<usize>) -> Self {
        self.top_nationalities = n;
        self
    }

    pub fn with_locale(mut self, locale: NumberLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Use a custom palette; an empty slice keeps the current one
    pub fn with_palette(mut self, palette: &'static [Color]) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    /// Color for the series entry at `index`, cycling through the palette
    pub fn color_at(&self, index: usize) -> Color {
        self.palette[index % self.palette.len()]
    }

    /// Pick the view for a state. Total over every variant.
    pub fn select_view(&self, state: &RequestState) -> View {
        match state {
            RequestState::Idle => View::ShowEmptyPrompt,
            RequestState::Loading => View::ShowSpinner,
            RequestState::Failure(message) => View::ShowError(message.clone()),
            RequestState::Success(report) => View::ShowReport(self.to_report_view(report)),
        }
    }

    /// Derive percentages, chart series and colors from a report
    pub fn to_report_view(&self, report: &Report) -> ReportView {
        let distribution_series = [
            (DOMESTIC_LABEL, report.population_spanish),
            (FOREIGN_LABEL, report.population_foreign),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| SeriesEntry {
            label: label.to_string(),
            value,
            color: self.color_at(i),
        })
        .collect();

        let limit = self.top_nationalities.unwrap_or(usize::MAX);
        let nationality_series = report
            .nationality_breakdown
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, entry)| SeriesEntry {
                label: entry.name.clone(),
                value: entry.value,
                color: self.color_at(i),
            })
            .collect();

        ReportView {
            municipality: report.municipality.clone(),
            population_total: report.population_total,
            population_spanish: report.population_spanish,
            population_foreign: report.population_foreign,
            spanish_percent: percent_of(report.population_spanish, report.population_total),
            foreign_percent: percent_of(report.population_foreign, report.population_total),
            distribution_series,
            nationality_series,
            locale: self.locale,
        }
    }
}

/// [`ReportPresenter::select_view`] with default settings
pub fn select_view(state: &RequestState) -> View {
    ReportPresenter::default().select_view(state)
}

/// [`ReportPresenter::to_report_view`] with default settings
pub fn to_report_view(report: &Report) -> ReportView {
    ReportPresenter::default().to_report_view(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NationalityCount;
    use proptest::prelude::*;

    fn madrid() -> Report {
        Report {
            municipality: "Madrid".to_string(),
            population_total: 3_223_334,
            population_spanish: 2_700_000,
            population_foreign: 523_334,
            nationality_breakdown: vec![NationalityCount::new("Marroquí", 50_000)],
        }
    }

    fn report_with(total: u64, spanish: u64, foreign: u64, breakdown: Vec<NationalityCount>) -> Report {
        Report {
            municipality: "Test".to_string(),
            population_total: total,
            population_spanish: spanish,
            population_foreign: foreign,
            nationality_breakdown: breakdown,
        }
    }

    #[test]
    fn test_select_view_mapping() {
        assert_eq!(select_view(&RequestState::Idle), View::ShowEmptyPrompt);
        assert_eq!(select_view(&RequestState::Loading), View::ShowSpinner);
        assert_eq!(
            select_view(&RequestState::Failure("Municipality not found".into())),
            View::ShowError("Municipality not found".into())
        );
        assert_eq!(
            select_view(&RequestState::Success(madrid())),
            View::ShowReport(to_report_view(&madrid()))
        );
    }

    #[test]
    fn test_madrid_report_view() {
        let view = to_report_view(&madrid());

        assert_eq!(view.spanish_percent, 83.8);
        assert_eq!(view.foreign_percent, 16.2);

        let tiles: Vec<String> = view.tiles().iter().map(ToString::to_string).collect();
        assert_eq!(tiles, vec!["3,223,334", "2,700,000 (83.8%)", "523,334 (16.2%)"]);
        assert_eq!(view.ranking_lines(), vec!["Marroquí: 50,000"]);
    }

    #[test]
    fn test_distribution_series_order_and_colors() {
        let view = to_report_view(&madrid());

        assert_eq!(
            view.distribution_series,
            vec![
                SeriesEntry { label: DOMESTIC_LABEL.into(), value: 2_700_000, color: Color("#0088FE") },
                SeriesEntry { label: FOREIGN_LABEL.into(), value: 523_334, color: Color("#00C49F") },
            ]
        );
    }

    #[test]
    fn test_zero_total_yields_zero_percent() {
        let view = to_report_view(&report_with(0, 0, 0, Vec::new()));
        assert_eq!(view.spanish_percent, 0.0);
        assert_eq!(view.foreign_percent, 0.0);

        let view = to_report_view(&report_with(0, 12, 3, Vec::new()));
        assert_eq!(view.spanish_percent, 0.0);
        assert_eq!(view.foreign_percent, 0.0);
        assert_eq!(view.tiles()[1].to_string(), "12 (0.0%)");
    }

    #[test]
    fn test_percentages_use_total_as_denominator() {
        // 200 residents of unknown origin
        let view = to_report_view(&report_with(1_000, 500, 300, Vec::new()));
        assert_eq!(view.spanish_percent, 50.0);
        assert_eq!(view.foreign_percent, 30.0);
    }

    #[test]
    fn test_empty_breakdown_is_empty_ranking() {
        let view = to_report_view(&report_with(10, 10, 0, Vec::new()));
        assert!(view.nationality_series.is_empty());
        assert!(view.ranking_lines().is_empty());
    }

    #[test]
    fn test_nationality_order_is_preserved() {
        let breakdown = vec![
            NationalityCount::new("Rumana", 10),
            NationalityCount::new("Marroquí", 500),
            NationalityCount::new("China", 50),
        ];
        let view = to_report_view(&report_with(1_000, 440, 560, breakdown));

        let labels: Vec<&str> = view.nationality_series.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Rumana", "Marroquí", "China"]);
    }

    #[test]
    fn test_palette_cycles() {
        let breakdown: Vec<NationalityCount> =
            (0..7).map(|i| NationalityCount::new(format!("N{}", i), 1)).collect();
        let view = to_report_view(&report_with(7, 0, 7, breakdown));

        assert_eq!(view.nationality_series[5].color, DEFAULT_PALETTE[0]);
        assert_eq!(view.nationality_series[6].color, DEFAULT_PALETTE[1]);
    }

    #[test]
    fn test_top_nationalities_truncates() {
        let breakdown: Vec<NationalityCount> =
            (0..12).map(|i| NationalityCount::new(format!("N{}", i), 12 - i)).collect();
        let presenter = ReportPresenter::new().with_top_nationalities(Some(3));

        let view = presenter.to_report_view(&report_with(100, 22, 78, breakdown));
        assert_eq!(view.nationality_series.len(), 3);
        assert_eq!(view.nationality_series[2].label, "N2");
    }

    #[test]
    fn test_spanish_locale_formatting() {
        let view = ReportPresenter::new().with_locale(NumberLocale::Es).to_report_view(&madrid());
        assert_eq!(view.tiles()[2].to_string(), "523.334 (16,2%)");
        assert_eq!(view.ranking_lines(), vec!["Marroquí: 50.000"]);
    }

    #[test]
    fn test_custom_palette_and_empty_palette() {
        static MONO: [Color; 1] = [Color("#000000")];
        let presenter = ReportPresenter::new().with_palette(&MONO);
        assert_eq!(presenter.color_at(0), Color("#000000"));
        assert_eq!(presenter.color_at(9), Color("#000000"));

        let presenter = ReportPresenter::new().with_palette(&[]);
        assert_eq!(presenter.color_at(0), DEFAULT_PALETTE[0]);
    }

    #[test]
    fn test_color_rgb() {
        assert_eq!(Color("#0088FE").rgb(), Some((0x00, 0x88, 0xFE)));
        assert_eq!(Color("0088FE").rgb(), None);
        assert_eq!(Color("#08F").rgb(), None);
    }

    fn arb_state() -> impl Strategy<Value = RequestState> {
        let report = (0u64..10_000_000, 0u64..10_000_000, 0u64..10_000_000, 0usize..15).prop_map(
            |(total, spanish, foreign, n)| {
                let breakdown = (0..n).map(|i| NationalityCount::new(format!("N{}", i), i as u64)).collect();
                report_with(total, spanish, foreign, breakdown)
            },
        );

        prop_oneof![
            Just(RequestState::Idle),
            Just(RequestState::Loading),
            ".*".prop_map(RequestState::Failure),
            report.prop_map(RequestState::Success),
        ]
    }

    proptest! {
        #[test]
        fn prop_select_view_is_pure(state in arb_state()) {
            prop_assert_eq!(select_view(&state), select_view(&state));
        }

        #[test]
        fn prop_percentages_are_finite(
            total in 0u64..u64::MAX / 2,
            spanish in 0u64..1_000_000_000,
            foreign in 0u64..1_000_000_000,
        ) {
            let view = to_report_view(&report_with(total, spanish, foreign, Vec::new()));
            prop_assert!(view.spanish_percent.is_finite());
            prop_assert!(view.foreign_percent.is_finite());
            prop_assert!(view.spanish_percent >= 0.0);
            prop_assert!(view.foreign_percent >= 0.0);
            if total == 0 {
                prop_assert_eq!(view.spanish_percent, 0.0);
                prop_assert_eq!(view.foreign_percent, 0.0);
            }
        }

        #[test]
        fn prop_distribution_has_two_entries(
            spanish in 0u64..1_000_000,
            foreign in 0u64..1_000_000,
        ) {
            let view = to_report_view(&report_with(spanish + foreign, spanish, foreign, Vec::new()));
            prop_assert_eq!(view.distribution_series.len(), 2);
            prop_assert_eq!(view.distribution_series[0].value, spanish);
            prop_assert_eq!(view.distribution_series[1].value, foreign);
        }

        #[test]
        fn prop_breakdown_passes_through(n in 0usize..40) {
            let breakdown: Vec<NationalityCount> =
                (0..n).map(|i| NationalityCount::new(format!("N{}", i), i as u64)).collect();
            let view = to_report_view(&report_with(1, 1, 0, breakdown.clone()));
            prop_assert_eq!(view.nationality_series.len(), n);
            for (entry, source) in view.nationality_series.iter().zip(&breakdown) {
                prop_assert_eq!(&entry.label, &source.name);
                prop_assert_eq!(entry.value, source.value);
            }
        }
    }
}

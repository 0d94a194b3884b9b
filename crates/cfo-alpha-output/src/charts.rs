//! SVG charts for a computed dataset.
//!
//! Three charts are produced:
//! - `cfo_distribution`: histogram of `cfo_ratio`, stacked by industry
//! - `industry_rankings`: boxplot of `industry_rank` per industry
//! - `top_stocks`: bar chart of the top-N records by `cfo_ratio`
//!
//! Charts render to SVG strings ([`ChartRenderer::render_to_strings`]) or to
//! files in a directory ([`ChartRenderer::render_to_dir`]). An empty dataset
//! still yields valid, empty charts.

use cfo_alpha_data::{Dataset, TickerRecord, UNKNOWN_INDUSTRY};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while rendering charts.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Drawing backend error.
    #[error("Chart rendering error: {0}")]
    Render(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Render(err.to_string())
    }
}

/// The charts this module draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Stacked histogram of ratios by industry
    CfoDistribution,
    /// Boxplot of ranks per industry
    IndustryRankings,
    /// Top-N records by ratio
    TopStocks,
}

impl ChartKind {
    /// All charts, in output order.
    pub const ALL: [Self; 3] = [Self::CfoDistribution, Self::IndustryRankings, Self::TopStocks];

    /// Chart name, also the file stem.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CfoDistribution => "cfo_distribution",
            Self::IndustryRankings => "industry_rankings",
            Self::TopStocks => "top_stocks",
        }
    }

    /// File name the chart is written to.
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.name())
    }
}

/// Chart sizes and options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartConfig {
    /// Size of the distribution chart (default: 1000x600)
    pub distribution_size: (u32, u32),
    /// Size of the rankings and top-N charts (default: 1200x600)
    pub wide_size: (u32, u32),
    /// Histogram bin count (default: 10)
    pub bins: usize,
    /// Number of bars in the top-N chart (default: 10)
    pub top_n: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            distribution_size: (1000, 600),
            wide_size: (1200, 600),
            bins: 10,
            top_n: 10,
        }
    }
}

/// The three charts as SVG documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCharts {
    /// Stacked ratio histogram
    pub cfo_distribution: String,
    /// Rank boxplot
    pub industry_rankings: String,
    /// Top-N bar chart
    pub top_stocks: String,
}

impl RenderedCharts {
    /// SVG for one chart.
    pub fn get(&self, kind: ChartKind) -> &str {
        match kind {
            ChartKind::CfoDistribution => &self.cfo_distribution,
            ChartKind::IndustryRankings => &self.industry_rankings,
            ChartKind::TopStocks => &self.top_stocks,
        }
    }
}

/// Renders the chart set for a dataset.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    /// Create a renderer with the given configuration.
    pub const fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub const fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Render every chart to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Render`] if drawing fails.
    pub fn render_to_strings(&self, dataset: &Dataset) -> Result<RenderedCharts, ChartError> {
        Ok(RenderedCharts {
            cfo_distribution: self.render(ChartKind::CfoDistribution, dataset)?,
            industry_rankings: self.render(ChartKind::IndustryRankings, dataset)?,
            top_stocks: self.render(ChartKind::TopStocks, dataset)?,
        })
    }

    /// Render every chart into `dir` as `<name>.svg`, creating the directory
    /// if needed. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or writing fails.
    pub fn render_to_dir(&self, dataset: &Dataset, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
        std::fs::create_dir_all(dir)?;
        let charts = self.render_to_strings(dataset)?;

        ChartKind::ALL
            .iter()
            .map(|kind| {
                let path = dir.join(kind.file_name());
                std::fs::write(&path, charts.get(*kind))?;
                Ok(path)
            })
            .collect()
    }

    /// Render one chart to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Render`] if drawing fails.
    pub fn render(&self, kind: ChartKind, dataset: &Dataset) -> Result<String, ChartError> {
        let size = match kind {
            ChartKind::CfoDistribution => self.config.distribution_size,
            ChartKind::IndustryRankings | ChartKind::TopStocks => self.config.wide_size,
        };

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            root.fill(&WHITE)?;
            match kind {
                ChartKind::CfoDistribution => self.draw_distribution(&root, dataset)?,
                ChartKind::IndustryRankings => draw_rankings(&root, dataset)?,
                ChartKind::TopStocks => self.draw_top_stocks(&root, dataset)?,
            }
            root.present()?;
        }
        Ok(svg)
    }

    fn draw_distribution(
        &self,
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        dataset: &Dataset,
    ) -> Result<(), ChartError> {
        let stacks = ratio_histogram(dataset, self.config.bins);
        let max_count = stacks
            .totals()
            .into_iter()
            .max()
            .unwrap_or(0)
            .max(1);

        let mut chart = ChartBuilder::on(root)
            .caption(
                "Distribution of CFO/Market Cap Ratios by Industry",
                ("sans-serif", 24),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(stacks.lo..stacks.hi, 0f64..(max_count as f64 + 0.5))?;

        chart
            .configure_mesh()
            .x_desc("CFO/Market Cap Ratio")
            .y_desc("Count")
            .draw()?;

        let mut base = vec![0usize; stacks.bins];
        for (i, (label, counts)) in stacks.series.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            let rects: Vec<Rectangle<(f64, f64)>> = counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(bin, count)| {
                    let x0 = stacks.lo + bin as f64 * stacks.width;
                    let y0 = base[bin] as f64;
                    Rectangle::new(
                        [(x0, y0), (x0 + stacks.width, y0 + *count as f64)],
                        color.filled(),
                    )
                })
                .collect();
            for (bin, count) in counts.iter().enumerate() {
                base[bin] += count;
            }

            chart
                .draw_series(rects)?
                .label(label.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        if !stacks.series.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }
        Ok(())
    }

    fn draw_top_stocks(
        &self,
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        dataset: &Dataset,
    ) -> Result<(), ChartError> {
        let top = dataset.top_by_ratio(self.config.top_n);
        let labels: Vec<String> = top.iter().map(|r| r.ticker.clone()).collect();
        let (y_lo, y_hi) = value_range(top.iter().map(|r| r.cfo_ratio));
        let slots = labels.len().max(1) as u32;

        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("Top {} Stocks by CFO/Market Cap Ratio", self.config.top_n),
                ("sans-serif", 24),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..slots).into_segmented(), y_lo..y_hi)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1))
            .x_label_formatter(&|v| segment_label(v, &labels))
            .y_desc("CFO/Market Cap Ratio")
            .draw()?;

        let industries = industry_order(top.iter().copied());
        for (i, industry) in industries.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            let bars = top
                .iter()
                .enumerate()
                .filter(|(_, r)| r.industry.as_deref() == *industry)
                .map(|(slot, r)| (slot as u32, r.cfo_ratio));

            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(color.filled())
                        .margin(8)
                        .data(bars),
                )?
                .label(industry_label(*industry))
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        if !industries.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }
        Ok(())
    }
}

fn draw_rankings(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    dataset: &Dataset,
) -> Result<(), ChartError> {
    let groups = rank_groups(dataset);
    let labels: Vec<String> = groups.iter().map(|(label, _)| label.clone()).collect();
    let slots = labels.len().max(1) as u32;

    let mut chart = ChartBuilder::on(root)
        .caption("Industry Rankings Distribution", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0f32..1.05f32)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|v| segment_label(v, &labels))
        .x_desc("Industry")
        .y_desc("Industry Rank")
        .draw()?;

    chart.draw_series(groups.iter().enumerate().map(|(slot, (_, ranks))| {
        let quartiles = Quartiles::new(ranks.as_slice());
        Boxplot::new_vertical(SegmentValue::CenterOf(slot as u32), &quartiles)
            .width(30)
            .whisker_width(0.5)
            .style(Palette99::pick(slot).to_rgba())
    }))?;
    Ok(())
}

/// Histogram counts per industry over shared bins.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedHistogram {
    /// Left edge of the first bin
    pub lo: f64,
    /// Right edge of the last bin
    pub hi: f64,
    /// Bin width
    pub width: f64,
    /// Number of bins
    pub bins: usize,
    /// Industry label and per-bin counts, in order of first appearance
    pub series: Vec<(String, Vec<usize>)>,
}

impl StackedHistogram {
    /// Total count per bin across industries.
    pub fn totals(&self) -> Vec<usize> {
        (0..self.bins)
            .map(|bin| self.series.iter().map(|(_, counts)| counts[bin]).sum())
            .collect()
    }
}

/// Bin the finite ratios of `dataset`, split by industry.
///
/// Industries with no finite ratio are left out. A dataset with no finite
/// ratios gets the unit interval and no series.
pub fn ratio_histogram(dataset: &Dataset, bins: usize) -> StackedHistogram {
    let bins = bins.max(1);
    let finite = || dataset.iter().filter(|r| r.cfo_ratio.is_finite());

    let (lo, hi) = match finite().map(|r| r.cfo_ratio).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    }) {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => {
            let pad = if lo == 0.0 { 0.01 } else { lo.abs() * 0.1 };
            (lo - pad, hi + pad)
        }
        Some(range) => range,
    };
    let width = (hi - lo) / bins as f64;

    let mut series: Vec<(String, Vec<usize>)> = Vec::new();
    for industry in industry_order(finite()) {
        let mut counts = vec![0usize; bins];
        for record in finite().filter(|r| r.industry.as_deref() == industry) {
            let bin = ((record.cfo_ratio - lo) / width).floor() as usize;
            counts[bin.min(bins - 1)] += 1;
        }
        series.push((industry_label(industry), counts));
    }

    StackedHistogram {
        lo,
        hi,
        width,
        bins,
        series,
    }
}

/// Ranks per industry, for industries with at least one rank.
pub fn rank_groups(dataset: &Dataset) -> Vec<(String, Vec<f64>)> {
    industry_order(dataset.iter().filter(|r| r.industry_rank.is_some()))
        .into_iter()
        .map(|industry| {
            let ranks = dataset
                .iter()
                .filter(|r| r.industry.as_deref() == industry)
                .filter_map(|r| r.industry_rank)
                .collect();
            (industry_label(industry), ranks)
        })
        .collect()
}

/// Distinct industries in order of first appearance; `None` is one group.
fn industry_order<'a>(records: impl Iterator<Item = &'a TickerRecord>) -> Vec<Option<&'a str>> {
    let mut industries: Vec<Option<&'a str>> = Vec::new();
    for record in records {
        let industry = record.industry.as_deref();
        if !industries.contains(&industry) {
            industries.push(industry);
        }
    }
    industries
}

fn industry_label(industry: Option<&str>) -> String {
    industry.unwrap_or(UNKNOWN_INDUSTRY).to_string()
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo == hi {
        (0.0, 1.0)
    } else {
        let pad = (hi - lo) * 0.1;
        (if lo < 0.0 { lo - pad } else { 0.0 }, hi + pad)
    }
}

fn segment_label(value: &SegmentValue<u32>, labels: &[String]) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

use crate::core::RiskTier;
use crate::dashboard::{DashboardSnapshot, OutbreakView};
use crate::formatting::{band_color, group_thousands, tier_color, FormattingConfig, Painter};
use comfy_table::{presets, Cell, Color as TableColor, ContentArrangement, Table};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "terminal" => Ok(Self::Terminal),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Terminal => "terminal",
        })
    }
}

pub trait OutputWriter {
    fn write_snapshot(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_snapshot(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_snapshot(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        self.write_header(snapshot)?;
        self.write_summary(snapshot)?;
        self.write_outbreaks(snapshot)?;
        self.write_recent(snapshot)?;
        self.write_alerts(snapshot)?;
        self.write_predictions(snapshot)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        writeln!(self.writer, "# Outbreak Dashboard")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Last updated: {}", snapshot.last_updated)?;
        writeln!(self.writer, "Showing: {}", snapshot.selection)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        let metrics = &snapshot.metrics;

        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_summary_row("Active Outbreaks", &metrics.active_outbreaks.to_string())?;
        self.write_summary_row("Total Cases", &group_thousands(metrics.total_cases))?;
        self.write_summary_row("Total Deaths", &group_thousands(metrics.total_deaths))?;
        self.write_summary_row("High Risk Outbreaks", &metrics.high_risk_count.to_string())?;
        for tier in RiskTier::ALL.iter().rev() {
            self.write_summary_row(
                tier.label(),
                &metrics.distribution.count(*tier).to_string(),
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary_row(&mut self, metric: &str, value: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "| {metric} | {value} |")?;
        Ok(())
    }

    fn write_outbreaks(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        if snapshot.outbreaks.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Outbreaks")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Disease | Location | Cases | Deaths | Mortality | Risk | Updated |"
        )?;
        writeln!(
            self.writer,
            "|---------|----------|-------|--------|-----------|------|---------|"
        )?;
        for view in &snapshot.outbreaks {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {:.2}% | {} | {} |",
                view.record.disease,
                view.record.location,
                group_thousands(view.record.cases),
                group_thousands(view.record.deaths),
                view.mortality_rate,
                view.tier.label(),
                view.age
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_recent(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "## Recent Activity (last {}h)",
            snapshot.lookback_hours
        )?;
        writeln!(self.writer)?;
        if snapshot.recent_outbreaks.is_empty() {
            writeln!(self.writer, "_Nothing in window._")?;
        }
        for view in &snapshot.recent_outbreaks {
            writeln!(
                self.writer,
                "- {} in {}: {} cases, {} ({})",
                view.record.disease,
                view.record.location,
                view.cases_compact,
                view.tier.label(),
                view.age
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_alerts(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        if snapshot.alerts.is_empty() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "## Alerts ({} new)",
            snapshot.new_alert_count
        )?;
        writeln!(self.writer)?;
        for view in &snapshot.alerts {
            let marker = if view.record.is_new { " *new*" } else { "" };
            writeln!(
                self.writer,
                "- **{}** {}{} ({})",
                view.record.severity.as_str().to_uppercase(),
                view.record.title,
                marker,
                view.age
            )?;
            if !view.record.message.is_empty() {
                writeln!(self.writer, "  {}", view.record.message)?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_predictions(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        if snapshot.predictions.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Predictions")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Disease | Region | Probability | Confidence | Timeframe |"
        )?;
        writeln!(
            self.writer,
            "|---------|--------|-------------|------------|-----------|"
        )?;
        for view in &snapshot.predictions {
            writeln!(
                self.writer,
                "| {} | {} | {} ({}) | {} | {} |",
                view.record.disease,
                view.record.region,
                view.probability_label,
                view.band.as_str(),
                view.confidence_label,
                view.record.timeframe
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    painter: Painter,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self {
            writer,
            painter: Painter::new(formatting),
        }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_snapshot(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        self.print_header(snapshot)?;
        self.print_summary(snapshot)?;
        self.print_outbreaks(snapshot)?;
        self.print_recent(snapshot)?;
        self.print_alerts(snapshot)?;
        self.print_predictions(snapshot)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn print_header(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.painter.header("Outbreak Dashboard"))?;
        writeln!(self.writer, "{}", self.painter.header("=================="))?;
        writeln!(
            self.writer,
            "{}",
            self.painter.dim(&format!(
                "Last updated: {} | {}",
                snapshot.last_updated, snapshot.selection
            ))
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_summary(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        let metrics = &snapshot.metrics;
        let dist = &metrics.distribution;

        writeln!(self.writer, "{} Summary:", self.painter.emoji("📊", "*"))?;
        writeln!(self.writer, "  Active outbreaks: {}", metrics.active_outbreaks)?;
        writeln!(
            self.writer,
            "  Total cases: {}",
            group_thousands(metrics.total_cases)
        )?;
        writeln!(
            self.writer,
            "  Total deaths: {}",
            group_thousands(metrics.total_deaths)
        )?;
        writeln!(
            self.writer,
            "  High risk: {} (critical {}, high {}, medium {}, low {})",
            self.painter
                .paint(&metrics.high_risk_count.to_string(), tier_color(RiskTier::Critical)),
            dist.critical_count,
            dist.high_count,
            dist.medium_count,
            dist.low_count
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_outbreaks(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        if snapshot.outbreaks.is_empty() {
            writeln!(self.writer, "  No outbreaks reported.")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(self.writer, "{}", outbreak_table(&snapshot.outbreaks, &self.painter))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_recent(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} Recent activity (last {}h):",
            self.painter.emoji("🕒", "*"),
            snapshot.lookback_hours
        )?;
        if snapshot.recent_outbreaks.is_empty() {
            writeln!(self.writer, "  {}", self.painter.dim("nothing in window"))?;
        }
        for view in &snapshot.recent_outbreaks {
            writeln!(
                self.writer,
                "  - {} in {}: {} cases, {} ({})",
                view.record.disease,
                view.record.location,
                view.cases_compact,
                self.painter.tier(view.tier),
                self.painter.dim(&view.age)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_alerts(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        if snapshot.alerts.is_empty() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{} Alerts ({} new):",
            self.painter.emoji("🚨", "!"),
            snapshot.new_alert_count
        )?;
        for view in &snapshot.alerts {
            let location = view
                .record
                .location
                .as_deref()
                .map(|loc| format!(" - {loc}"))
                .unwrap_or_default();
            writeln!(
                self.writer,
                "  [{}] {}{} ({})",
                self.painter.severity(view.record.severity),
                view.record.title,
                location,
                self.painter.dim(&view.age)
            )?;
            if !view.record.message.is_empty() {
                writeln!(self.writer, "      {}", view.record.message)?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_predictions(&mut self, snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
        if snapshot.predictions.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{} Predictions:", self.painter.emoji("📈", "*"))?;
        for view in &snapshot.predictions {
            writeln!(
                self.writer,
                "  {} in {}: {} ({}), confidence {}, {}",
                view.record.disease,
                view.record.region,
                self.painter
                    .paint(&view.probability_label, band_color(view.band)),
                view.band.as_str(),
                view.confidence_label,
                view.record.timeframe
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

fn outbreak_table(outbreaks: &[OutbreakView], painter: &Painter) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if painter.uses_color() {
            presets::UTF8_FULL
        } else {
            presets::ASCII_FULL
        })
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Disease",
            "Location",
            "Cases",
            "Deaths",
            "Mortality",
            "Risk",
            "Trend",
            "Updated",
        ]);
    if painter.uses_color() {
        table.enforce_styling();
    }

    for view in outbreaks {
        let mut risk = Cell::new(view.tier.label());
        if painter.uses_color() {
            risk = risk.fg(table_color(tier_color(view.tier)));
        }
        table.add_row(vec![
            Cell::new(&view.record.disease),
            Cell::new(&view.record.location),
            Cell::new(view.cases_compact.as_str()),
            Cell::new(group_thousands(view.record.deaths)),
            Cell::new(format!("{:.2}%", view.mortality_rate)),
            risk,
            Cell::new(view.record.trend.as_str()),
            Cell::new(&view.age),
        ]);
    }
    table
}

fn table_color(color: colored::Color) -> TableColor {
    match color {
        colored::Color::Red => TableColor::Red,
        colored::Color::Yellow => TableColor::Yellow,
        colored::Color::Green => TableColor::Green,
        colored::Color::Blue => TableColor::Blue,
        colored::Color::TrueColor { r, g, b } => TableColor::Rgb { r, g, b },
        _ => TableColor::Reset,
    }
}

pub fn create_writer(
    format: OutputFormat,
    formatting: FormattingConfig,
    destination: Box<dyn Write>,
) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(destination)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination, formatting)),
    }
}

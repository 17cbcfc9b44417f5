use crate::batch::FeedBatch;
use crate::cli::ReportArgs;
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::config::{self, OutbreakmapConfig};
use crate::dashboard::{Dashboard, DashboardSnapshot};
use crate::errors::Error;
use crate::filter::DiseaseSelection;
use crate::formatting::FormattingConfig;
use crate::io::{self, OutputFormat};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Everything a report or watch run needs, resolved from flags and config.
pub struct ReportSession {
    pub dashboard: Dashboard,
    pub clock: Box<dyn Clock>,
    pub format: OutputFormat,
    pub formatting: FormattingConfig,
}

impl ReportSession {
    pub fn from_args(args: &ReportArgs) -> Result<Self> {
        let config = resolve_config(args)?;
        let format = args
            .format
            .unwrap_or_else(|| configured_format(&config.output.default_format));

        let clock: Box<dyn Clock> = match &args.now {
            Some(raw) => Box::new(FixedClock::new(parse_instant(raw)?)),
            None => Box::new(SystemClock),
        };

        let formatting = if args.plain {
            FormattingConfig::plain()
        } else {
            FormattingConfig::from_env()
        };

        let selection = args
            .disease
            .as_deref()
            .map(DiseaseSelection::parse)
            .unwrap_or_default();

        let dashboard = Dashboard::new(config)
            .with_selection(selection)
            .with_outbreak_alerts(args.outbreak_alerts);

        Ok(Self {
            dashboard,
            clock,
            format,
            formatting,
        })
    }

    /// Refresh against `batch`, apply pending dismissals, and return the
    /// snapshot that reflects them.
    pub fn refresh(&mut self, batch: &FeedBatch, dismiss: &[String]) -> Result<DashboardSnapshot> {
        let snapshot = self.dashboard.refresh(batch, self.clock.as_ref())?;

        let mut dismissed_any = false;
        for id in dismiss {
            if self.dashboard.dismiss_alert(id) {
                dismissed_any = true;
            } else if !self.dashboard.alerts().is_dismissed(id) {
                warn!(id = %id, "No active alert to dismiss");
            }
        }

        if dismissed_any {
            Ok(self.dashboard.refresh(batch, self.clock.as_ref())?)
        } else {
            Ok(snapshot)
        }
    }
}

pub fn run_report(args: ReportArgs) -> Result<()> {
    let mut session = ReportSession::from_args(&args)?;
    let batch = FeedBatch::load(&args.batch)?;
    let snapshot = session.refresh(&batch, &args.dismiss)?;

    let destination = io::open_destination(args.output.as_deref())?;
    let mut writer = io::create_writer(session.format, session.formatting, destination);
    writer.write_snapshot(&snapshot)?;
    Ok(())
}

/// Explicit `--config` must load; otherwise search upward from the working
/// directory. Command-line overrides are applied last.
pub(crate) fn resolve_config(args: &ReportArgs) -> Result<OutbreakmapConfig> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(hours) = args.lookback_hours {
        // Reject a bad flag before any feed is read.
        crate::filter::LookbackWindow::hours(hours)?;
        config.window.lookback_hours = hours;
    }
    if args.reclassify {
        config.classification.reclassify = true;
    }
    Ok(config)
}

pub(crate) fn load_config(path: Option<&std::path::Path>) -> Result<OutbreakmapConfig> {
    match path {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::load_config()),
    }
}

fn configured_format(raw: &str) -> OutputFormat {
    raw.parse().unwrap_or_else(|e| {
        warn!("{}; using terminal output", e);
        OutputFormat::Terminal
    })
}

/// Parse an RFC 3339 instant given on the command line.
pub fn parse_instant(raw: &str) -> crate::errors::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::InvalidTimestamp(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AlertRecord, AlertSeverity, Recency};
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn args() -> ReportArgs {
        ReportArgs {
            batch: PathBuf::from("feed.json"),
            format: Some(OutputFormat::Json),
            output: None,
            config: None,
            lookback_hours: None,
            now: Some("2026-10-18T12:00:00Z".into()),
            disease: None,
            dismiss: vec![],
            outbreak_alerts: false,
            reclassify: false,
            plain: true,
        }
    }

    fn alert(id: &str, severity: AlertSeverity) -> AlertRecord {
        AlertRecord {
            id: id.into(),
            severity,
            title: id.into(),
            message: String::new(),
            timestamp: Recency::Relative("just now".into()),
            location: None,
            is_new: true,
        }
    }

    #[test]
    fn test_parse_instant() {
        assert_eq!(
            parse_instant("2026-10-18T14:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_instant("yesterday"),
            Err(Error::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_session_uses_fixed_clock() {
        let session = ReportSession::from_args(&args()).unwrap();
        assert_eq!(
            session.clock.now(),
            Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
        );
        assert_eq!(session.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_lookback_flag_is_rejected() {
        let mut bad = args();
        bad.lookback_hours = Some(0.0);
        assert!(ReportSession::from_args(&bad).is_err());
    }

    #[test]
    fn test_dismiss_applies_to_rendered_snapshot() {
        let mut session = ReportSession::from_args(&args()).unwrap();
        let batch = FeedBatch {
            alerts: vec![
                alert("a1", AlertSeverity::Critical),
                alert("a2", AlertSeverity::Info),
            ],
            ..Default::default()
        };
        let snapshot = session
            .refresh(&batch, &["a1".to_string(), "missing".to_string()])
            .unwrap();
        let ids: Vec<_> = snapshot.alerts.iter().map(|a| a.record.id.as_str()).collect();
        assert_eq!(ids, vec!["a2"]);
    }

    #[test]
    fn test_unknown_default_format_falls_back() {
        assert_eq!(configured_format("xml"), OutputFormat::Terminal);
        assert_eq!(configured_format("markdown"), OutputFormat::Markdown);
    }
}

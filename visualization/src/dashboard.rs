//! The five-chart access statistics dashboard

use std::fmt;
use std::str::FromStr;

use aicp::AccessStats;

use crate::charts::{ChartCanvas, ChartRenderer, DrawOutcome};
use crate::errors::{Result, VisualizationError};

/// One chart slot on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Pie of visitor / resident / provider
    AccessType,
    /// Pie of the finer visitor types
    VisitorType,
    /// Bars per status
    Status,
    /// Bars per hour of day
    Hourly,
    /// Line over the last seven days
    Weekly,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::AccessType,
        ChartKind::VisitorType,
        ChartKind::Status,
        ChartKind::Hourly,
        ChartKind::Weekly,
    ];

    /// Stable name, also used as the export file stem
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::AccessType => "access_type",
            ChartKind::VisitorType => "visitor_type",
            ChartKind::Status => "status",
            ChartKind::Hourly => "hourly",
            ChartKind::Weekly => "weekly",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::AccessType => "Accesos por tipo",
            ChartKind::VisitorType => "Tipos de visitante",
            ChartKind::Status => "Accesos por estado",
            ChartKind::Hourly => "Accesos por hora",
            ChartKind::Weekly => "Últimos 7 días",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = VisualizationError;

    fn from_str(s: &str) -> Result<Self> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s.trim())
            .ok_or_else(|| VisualizationError::InvalidData {
                message: format!("unknown chart '{}'", s),
            })
    }
}

impl ChartRenderer {
    /// Draw the chart for `kind` from the matching `stats` dataset
    pub fn draw_chart(
        &self,
        kind: ChartKind,
        canvas: &mut ChartCanvas<'_>,
        stats: &AccessStats,
    ) -> Result<DrawOutcome> {
        match kind {
            ChartKind::AccessType => self.draw_pie(canvas, &stats.by_access_type),
            ChartKind::VisitorType => self.draw_pie(canvas, &stats.by_type),
            ChartKind::Status => self.draw_bar(canvas, &stats.by_status),
            ChartKind::Hourly => self.draw_hourly_bar(canvas, &stats.by_hour),
            ChartKind::Weekly => self.draw_line(canvas, &stats.by_date),
        }
    }

    /// Draw every slot; a failing chart stops the pass
    pub fn draw_dashboard(
        &self,
        stats: &AccessStats,
        slots: &mut [(ChartKind, ChartCanvas<'_>)],
    ) -> Result<Vec<(ChartKind, DrawOutcome)>> {
        let mut outcomes = Vec::with_capacity(slots.len());
        for (kind, canvas) in slots.iter_mut() {
            let outcome = self.draw_chart(*kind, canvas, stats)?;
            tracing::debug!(chart = %kind, ?outcome, "chart drawn");
            outcomes.push((*kind, outcome));
        }

        let empty = outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == DrawOutcome::EmptyState)
            .count();
        tracing::info!(charts = outcomes.len(), empty, total = stats.total, "dashboard rendered");
        Ok(outcomes)
    }
}

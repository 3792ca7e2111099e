use std::sync::Arc;

use chrono::NaiveDate;

use crate::aggregate::{
    self, Countdown, DaysUntilPoint, EventDay, EventTotals, Measure, RepDay, RepShare, RepTotals,
};
use crate::labels::EventLabels;
use crate::loader::SalesTable;
use crate::narrative;

/// The page an operator has selected, together with its filter
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Daily sales of one event, by display name
    EventTrend { event: String },
    /// Daily sales of one rep
    RepTrend { rep: String },
    /// Total sales of every event
    CumulativeEvents,
    /// Total sales of every rep, ranked by a measure
    CumulativeReps { by: Measure },
    /// The share of every rep in each event
    RepShare,
    /// Average sales to date of the events the same number of days from today
    DaysUntil { today: NaiveDate },
    /// Average sales curve aligned on the days between each sale and its event
    SalesCycle,
}

/// The result table of a page
#[derive(Clone, Debug, PartialEq)]
pub enum Table {
    EventDays(Vec<EventDay>),
    RepDays(Vec<RepDay>),
    Events(Vec<EventTotals>),
    Reps(Vec<RepTotals>),
    Shares {
        shares: Vec<RepShare>,
        top: Vec<RepShare>,
    },
    DaysUntil {
        points: Vec<DaysUntilPoint>,
        countdown: Vec<Countdown>,
    },
    SalesCycle(Vec<DaysUntilPoint>),
}

impl Table {
    /// Whether the selection matched no sales at all
    pub fn is_empty(&self) -> bool {
        match self {
            Table::EventDays(rows) => rows.is_empty(),
            Table::RepDays(rows) => rows.is_empty(),
            Table::Events(rows) => rows.is_empty(),
            Table::Reps(rows) => rows.is_empty(),
            Table::Shares { shares, .. } => shares.is_empty(),
            Table::DaysUntil { points, .. } => points.is_empty(),
            Table::SalesCycle(points) => points.is_empty(),
        }
    }

    /// Writes the table as CSV, with a header row
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);

        match self {
            Table::EventDays(rows) => rows.iter().try_for_each(|row| writer.serialize(row))?,
            Table::RepDays(rows) => rows.iter().try_for_each(|row| writer.serialize(row))?,
            Table::Events(rows) => rows.iter().try_for_each(|row| writer.serialize(row))?,
            Table::Reps(rows) => rows.iter().try_for_each(|row| writer.serialize(row))?,
            Table::Shares { shares, .. } => shares.iter().try_for_each(|row| writer.serialize(row))?,
            Table::DaysUntil { points, .. } => points.iter().try_for_each(|row| writer.serialize(row))?,
            Table::SalesCycle(points) => points.iter().try_for_each(|row| writer.serialize(row))?,
        }
        writer.flush()?;

        Ok(())
    }
}

/// Everything shown for one selection
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub title: String,
    pub table: Table,
    pub narrative: Vec<String>,
}

/// The dashboard over one loaded sales table
///
/// Every selection change is answered by [`Dashboard::view`], which
/// recomputes the result from scratch and keeps no state in between.
#[derive(Clone, Debug)]
pub struct Dashboard {
    table: Arc<SalesTable>,
    labels: EventLabels,
}

impl Dashboard {
    pub fn new(table: Arc<SalesTable>, labels: EventLabels) -> Self {
        Self { table, labels }
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    pub fn labels(&self) -> &EventLabels {
        &self.labels
    }

    /// The events to choose from, in chronological order
    pub fn events(&self) -> Vec<String> {
        aggregate::event_names(self.table.sales(), &self.labels)
    }

    /// The reps to choose from, in alphabetical order
    pub fn reps(&self) -> Vec<String> {
        aggregate::rep_names(self.table.sales())
    }

    /// Computes the page for a selection
    pub fn view(&self, selection: &Selection) -> View {
        let sales = self.table.sales();
        log::debug!("computing {:?} over {} sales", selection, sales.len());

        match selection {
            Selection::EventTrend { event } => {
                let days = aggregate::event_daily(sales, &self.labels, event);
                View {
                    title: format!("Total Sales Over Time for Event: {event}"),
                    narrative: narrative::event_trend(&days).into_iter().collect(),
                    table: Table::EventDays(days),
                }
            }
            Selection::RepTrend { rep } => {
                let days = aggregate::rep_daily(sales, rep);
                View {
                    title: format!("Total Sales Over Time for Rep: {rep}"),
                    narrative: narrative::rep_trend(&days).into_iter().collect(),
                    table: Table::RepDays(days),
                }
            }
            Selection::CumulativeEvents => {
                let totals = aggregate::event_totals(sales, &self.labels);
                View {
                    title: "Cumulative Stats for Events".to_owned(),
                    narrative: narrative::event_leader(&totals).into_iter().collect(),
                    table: Table::Events(totals),
                }
            }
            Selection::CumulativeReps { by } => {
                let totals = aggregate::rep_totals(sales, *by);
                View {
                    title: format!("Cumulative Stats for Reps by {by}"),
                    narrative: narrative::rep_leader(&totals).into_iter().collect(),
                    table: Table::Reps(totals),
                }
            }
            Selection::RepShare => {
                let shares = aggregate::rep_shares(sales, &self.labels);
                let top = aggregate::top_reps(&shares);
                View {
                    title: "Rep Share of Sales per Event".to_owned(),
                    narrative: narrative::top_reps(&top),
                    table: Table::Shares { shares, top },
                }
            }
            Selection::DaysUntil { today } => {
                let points = aggregate::days_until_event(sales, &self.labels, *today);
                let countdown = aggregate::countdown(sales, &self.labels, *today);
                let narrative = match points.is_empty() {
                    true => Vec::new(),
                    false => narrative::next_event(&countdown).into_iter().collect(),
                };
                View {
                    title: "Average Sales by Days Until Event".to_owned(),
                    narrative,
                    table: Table::DaysUntil { points, countdown },
                }
            }
            Selection::SalesCycle => {
                let points = aggregate::sales_cycle(sales, &self.labels);
                View {
                    title: "Average Sales Cycle by Days Before Event".to_owned(),
                    narrative: narrative::sales_cycle(&points).into_iter().collect(),
                    table: Table::SalesCycle(points),
                }
            }
        }
    }
}

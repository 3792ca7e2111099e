pub use self::{
    aggregate::{Measure, Measures, MIN_REP_ROWS},
    cache::TableCache,
    chart::{render_svg, ChartError},
    dashboard::{Dashboard, Selection, Table, View},
    labels::{EventLabel, EventLabels, LabelsError},
    loader::{export_utf8, AttemptError, Encoding, ExportError, LoadError, Loader, SalesTable},
    sale::{AccountId, Money, Sale},
};

pub mod aggregate;
mod cache;
mod chart;
mod dashboard;
mod labels;
mod loader;
pub mod narrative;
mod sale;

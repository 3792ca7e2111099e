use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use group_sales_dash::{
    export_utf8, render_svg, Dashboard, EventLabels, Loader, Measure, Selection,
};

/// A cli dashboard over group ticket sales
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the sales CSV export
    #[clap(short, long, default_value = "group_sales.csv")]
    input: PathBuf,
    /// A CSV file with the columns event_code, display_name and optionally event_date
    #[clap(short, long)]
    labels: Option<PathBuf>,
    /// Also render the page as an SVG chart to this path
    #[clap(short, long)]
    chart: Option<PathBuf>,
    /// Write the loaded export back to disk as utf-8
    #[clap(long)]
    export: Option<PathBuf>,
    #[clap(subcommand)]
    page: Page,
}

#[derive(Debug, Subcommand)]
enum Page {
    /// List the events to choose from
    Events,
    /// List the sales representatives to choose from
    Reps,
    /// Daily sales of one event
    EventTrend {
        /// The display name of the event
        event: String,
    },
    /// Daily sales of one sales representative
    RepTrend { rep: String },
    /// Total sales of every event
    CumulativeEvents,
    /// Total sales of every sales representative
    CumulativeReps {
        /// The measure to rank by: sales, orders or tickets
        #[clap(long, default_value = "sales")]
        by: Measure,
    },
    /// The share of every sales representative in each event
    RepShare,
    /// Average sales to date by days until the event
    DaysUntil {
        /// The reference day, defaults to the current day
        #[clap(long)]
        today: Option<chrono::NaiveDate>,
    },
    /// Average sales curve by days between the sale and the event
    SalesCycle,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let labels = match &args.labels {
        Some(path) => EventLabels::from_path(path)?,
        None => EventLabels::builtin(),
    };
    let loader = Loader::default();
    // a single page per run, so there is nothing to cache
    let table = Arc::new(loader.load(&args.input)?);
    log::info!("loaded {} sales as {}", table.len(), table.encoding());

    if let Some(path) = &args.export {
        // the export is a side effect and must not keep the dashboard from showing
        if let Err(e) = export_utf8(&table, path) {
            log::error!("{:#}", anyhow::Error::new(e));
        }
    }

    let dashboard = Dashboard::new(table, labels);
    let selection = match args.page {
        Page::Events => return print_options(dashboard.events()),
        Page::Reps => return print_options(dashboard.reps()),
        Page::EventTrend { event } => Selection::EventTrend { event },
        Page::RepTrend { rep } => Selection::RepTrend { rep },
        Page::CumulativeEvents => Selection::CumulativeEvents,
        Page::CumulativeReps { by } => Selection::CumulativeReps { by },
        Page::RepShare => Selection::RepShare,
        Page::DaysUntil { today } => Selection::DaysUntil {
            today: today.unwrap_or_else(|| chrono::Local::now().date_naive()),
        },
        Page::SalesCycle => Selection::SalesCycle,
    };

    let view = dashboard.view(&selection);
    eprintln!("{}", view.title);
    for line in &view.narrative {
        eprintln!("{line}");
    }
    view.table.write_csv(std::io::stdout())?;

    if let Some(path) = &args.chart {
        render_svg(&view, path)?;
    }

    Ok(())
}

fn print_options(options: Vec<String>) -> anyhow::Result<()> {
    for option in options {
        println!("{option}");
    }

    Ok(())
}

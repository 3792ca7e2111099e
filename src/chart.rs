use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::dashboard::{Table, View};
use crate::sale::as_f64;

const SIZE: (u32, u32) = (1000, 500);

/// Possible errors to occur while drawing a chart
#[derive(Debug, thiserror::Error)]
#[error("Failed to draw the chart: {0}")]
pub struct ChartError(String);

fn draw_error(e: impl std::fmt::Display) -> ChartError {
    ChartError(e.to_string())
}

/// Renders a page as an SVG chart
///
/// Daily trends and both days-until curves become line charts, everything
/// else a bar chart.
pub fn render_svg(view: &View, path: impl AsRef<Path>) -> Result<(), ChartError> {
    let root = SVGBackend::new(path.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    if view.table.is_empty() {
        root.draw(&Text::new(
            format!("{}: no sales for this selection", view.title),
            (20, 20),
            ("sans-serif", 20).into_font(),
        ))
        .map_err(draw_error)?;
        return root.present().map_err(draw_error);
    }

    match &view.table {
        Table::EventDays(days) => {
            let points = days
                .iter()
                .map(|d| (d.date, as_f64(d.sales)))
                .collect::<Vec<_>>();
            date_chart(&root, &view.title, &points)?;
        }
        Table::RepDays(days) => {
            let points = days
                .iter()
                .map(|d| (d.date, as_f64(d.sales)))
                .collect::<Vec<_>>();
            date_chart(&root, &view.title, &points)?;
        }
        Table::Events(totals) => {
            let bars = totals
                .iter()
                .map(|e| (e.event.clone(), as_f64(e.sales)))
                .collect::<Vec<_>>();
            bar_chart(&root, &view.title, "Total sales", &bars)?;
        }
        Table::Reps(totals) => {
            let bars = totals
                .iter()
                .map(|r| (r.rep.clone(), as_f64(r.sales)))
                .collect::<Vec<_>>();
            bar_chart(&root, &view.title, "Total sales", &bars)?;
        }
        Table::Shares { top, .. } => {
            let bars = top
                .iter()
                .map(|s| (format!("{} ({})", s.event, s.rep), s.percentage))
                .collect::<Vec<_>>();
            bar_chart(&root, &view.title, "Share of sales (%)", &bars)?;
        }
        Table::DaysUntil { points, .. } | Table::SalesCycle(points) => {
            let points = points
                .iter()
                .map(|p| (p.days_until, p.sales))
                .collect::<Vec<_>>();
            days_until_chart(&root, &view.title, &points)?;
        }
    }

    root.present().map_err(draw_error)?;
    log::info!("rendered {:?} to {}", view.title, path.as_ref().display());

    Ok(())
}

fn y_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values.fold((0f64, 0f64), |(min, max), v| (min.min(v), max.max(v)));
    match max > min {
        true => min..max * 1.1,
        false => min..min + 1.0,
    }
}

fn date_chart(
    root: &DrawingArea<SVGBackend, plotters::coord::Shift>,
    title: &str,
    points: &[(NaiveDate, f64)],
) -> Result<(), ChartError> {
    let first = points.first().map(|p| p.0).ok_or_else(|| draw_error("no data"))?;
    let last = points.last().map(|p| p.0).ok_or_else(|| draw_error("no data"))?;
    // a single day still needs a non empty range
    let last = if last > first { last } else { first + Duration::days(1) };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(first..last, y_range(points.iter().map(|p| p.1)))
        .map_err(draw_error)?;
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Total sales")
        .draw()
        .map_err(draw_error)?;
    chart
        .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
        .map_err(draw_error)?;

    Ok(())
}

fn days_until_chart(
    root: &DrawingArea<SVGBackend, plotters::coord::Shift>,
    title: &str,
    points: &[(i64, f64)],
) -> Result<(), ChartError> {
    let min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let max = points.iter().map(|p| p.0).max().unwrap_or(0).max(min + 1);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(min..max, y_range(points.iter().map(|p| p.1)))
        .map_err(draw_error)?;
    chart
        .configure_mesh()
        .x_desc("Days until event")
        .y_desc("Average cumulative sales")
        .draw()
        .map_err(draw_error)?;
    chart
        .draw_series(LineSeries::new(points.iter().copied(), RED.stroke_width(2)))
        .map_err(draw_error)?;

    Ok(())
}

fn bar_chart(
    root: &DrawingArea<SVGBackend, plotters::coord::Shift>,
    title: &str,
    y_desc: &str,
    bars: &[(String, f64)],
) -> Result<(), ChartError> {
    let labels = bars.iter().map(|(label, _)| label.as_str()).collect::<Vec<_>>();
    let label_for = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(idx) => labels.get(*idx as usize).map(|l| l.to_string()).unwrap_or_default(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0u32..bars.len() as u32).into_segmented(),
            y_range(bars.iter().map(|(_, v)| *v)),
        )
        .map_err(draw_error)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&label_for)
        .y_desc(y_desc)
        .draw()
        .map_err(draw_error)?;
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(10)
                .data(bars.iter().enumerate().map(|(idx, (_, value))| (idx as u32, *value))),
        )
        .map_err(draw_error)?;

    Ok(())
}

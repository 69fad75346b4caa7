//! Closing-price line chart rendered to SVG with plotters.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::domain::error::MarketError;
use crate::domain::ohlcv::OhlcvBar;

pub const SERIES_LABEL: &str = "Close Price";
pub const X_LABEL: &str = "Date";
pub const Y_LABEL: &str = "Close Price";

fn render_error<E: std::fmt::Display>(e: E) -> MarketError {
    MarketError::Render {
        reason: e.to_string(),
    }
}

/// Render `bars` (date-ordered) as a single close-price line with legend and grid.
pub fn render_close_chart(
    bars: &[OhlcvBar],
    title: &str,
    width: u32,
    height: u32,
) -> Result<String, MarketError> {
    let (first, last) = match (bars.first(), bars.last()) {
        (Some(f), Some(l)) => (f.date, l.date),
        _ => {
            return Err(MarketError::Render {
                reason: "no bars to plot".into(),
            })
        }
    };
    let x_end: NaiveDate = if last > first { last } else { first + Duration::days(1) };

    let min_close = bars.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
    let max_close = bars.iter().map(|b| b.close).fold(f64::NEG_INFINITY, f64::max);
    let padding = ((max_close - min_close) * 0.05).max(1e-6);
    let y_range = (min_close - padding)..(max_close + padding);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(first..x_end, y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .x_labels(10)
            .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
            .y_label_formatter(&|v: &f64| format!("{:.0}", v))
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(
                bars.iter().map(|b| (b.date, b.close)),
                BLUE.stroke_width(2),
            ))
            .map_err(render_error)?
            .label(SERIES_LABEL)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    Ok(svg)
}

//! SVG rendering of seasonality profiles.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

use crate::{ReportError, SeasonalityProfile};

/// Chart size in pixels.
const SIZE: (u32, u32) = (1200, 700);

const BETA_COLOR: RGBColor = RGBColor(31, 119, 180);
const DEPTH_COLOR: RGBColor = RGBColor(255, 127, 14);

fn draw_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Draw(err.to_string())
}

/// Finite points of a profile curve, indexed by label position.
fn finite_points(values: &[f64]) -> Vec<(i32, f64)> {
    values
        .iter()
        .zip(0_i32..)
        .filter(|(v, _)| v.is_finite())
        .map(|(&v, i)| (i, v))
        .collect()
}

fn y_range(beta: &[(i32, f64)], depth: &[(i32, f64)]) -> (f64, f64) {
    let values = beta.iter().chain(depth).map(|&(_, v)| v);
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if lo > hi {
        return (0.0, 2.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.05);
    (lo - pad, hi + pad)
}

/// Renders the normalized beta and depth curves as an SVG document.
///
/// The x axis carries every second half-hour label, rotated; points with a
/// NaN value are left out.
///
/// # Errors
///
/// Returns [`ReportError::Draw`] if the backend fails.
pub fn render_svg(profile: &SeasonalityProfile) -> Result<String, ReportError> {
    let labels = profile.labels();
    let beta = finite_points(profile.beta());
    let depth = finite_points(profile.depth());
    let (y_lo, y_hi) = y_range(&beta, &depth);
    let last = i32::try_from(labels.len().saturating_sub(1)).map_err(draw_error)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(60)
            .build_cartesian_2d(0..last, y_lo..y_hi)
            .map_err(draw_error)?;

        let label_style =
            TextStyle::from(("sans-serif", 12).into_font().transform(FontTransform::Rotate90))
                .pos(Pos::new(HPos::Left, VPos::Center));

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|i| {
                usize::try_from(*i)
                    .ok()
                    .filter(|i| i % 2 == 0)
                    .and_then(|i| labels.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .x_label_style(label_style)
            .x_desc("Hours")
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(LineSeries::new(beta.iter().copied(), BETA_COLOR.stroke_width(2)))
            .map_err(draw_error)?
            .label("beta")
            .legend(|(x, y)| {
                EmptyElement::at((x + 10, y))
                    + Rectangle::new([(-4, -4), (4, 4)], BETA_COLOR.filled())
            });
        chart
            .draw_series(beta.iter().map(|&c| {
                EmptyElement::at(c) + Rectangle::new([(-3, -3), (3, 3)], BETA_COLOR.filled())
            }))
            .map_err(draw_error)?;

        chart
            .draw_series(LineSeries::new(depth.iter().copied(), DEPTH_COLOR.stroke_width(2)))
            .map_err(draw_error)?
            .label("depth")
            .legend(|(x, y)| TriangleMarker::new((x + 10, y), 5, DEPTH_COLOR.filled()));
        chart
            .draw_series(
                depth
                    .iter()
                    .map(|&c| TriangleMarker::new(c, 5, DEPTH_COLOR.filled())),
            )
            .map_err(draw_error)?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerMiddle)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    Ok(svg)
}

/// Renders the profile and writes it to `path`.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn write_svg(profile: &SeasonalityProfile, path: &Path) -> Result<(), ReportError> {
    let svg = render_svg(profile)?;
    std::fs::write(path, svg)?;
    Ok(())
}

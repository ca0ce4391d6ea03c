//! SVG charts for the ranked skills.
//!
//! Both renderers return the SVG document as a string, or `None` when there is
//! nothing to draw, so the caller decides where the file goes.

use crate::domain::model::{CategoryShare, RankedSkill};
use crate::utils::error::{RadarError, Result};
use plotters::coord::ranged1d::SegmentValue;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::FontStyle;

pub const DEFAULT_CHART_TOP_N: usize = 30;

const VIRIDIS_STOPS: &[(u8, u8, u8)] = &[
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

// Set3-style qualitative palette
const CATEGORY_PALETTE: &[RGBColor] = &[
    RGBColor(141, 211, 199),
    RGBColor(255, 255, 179),
    RGBColor(190, 186, 218),
    RGBColor(251, 128, 114),
    RGBColor(128, 177, 211),
    RGBColor(253, 180, 98),
    RGBColor(179, 222, 105),
    RGBColor(252, 205, 229),
    RGBColor(217, 217, 217),
    RGBColor(188, 128, 189),
    RGBColor(204, 235, 197),
    RGBColor(255, 237, 111),
];

fn chart_err<E: std::fmt::Display>(e: E) -> RadarError {
    RadarError::ChartError {
        message: e.to_string(),
    }
}

/// Maps `t` in [0, 1] onto a viridis-like gradient.
pub fn viridis(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (VIRIDIS_STOPS.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let frac = scaled - lower as f64;
    let (r0, g0, b0) = VIRIDIS_STOPS[lower];
    let (r1, g1, b1) = VIRIDIS_STOPS[lower + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Horizontal bar chart of the top `top_n` skills, most common at the top.
pub fn render_skills_bar_chart(ranked: &[RankedSkill], top_n: usize) -> Result<Option<String>> {
    let to_plot: Vec<&RankedSkill> = ranked.iter().take(top_n).collect();
    if to_plot.is_empty() {
        tracing::warn!("No skills to visualize");
        return Ok(None);
    }

    let rows = to_plot.len();
    // 反轉順序，讓排名第一的在最上方
    let bottom_up: Vec<&RankedSkill> = to_plot.iter().rev().copied().collect();
    let labels: Vec<String> = bottom_up.iter().map(|r| r.skill.clone()).collect();
    let max_count = bottom_up.iter().map(|r| r.count).max().unwrap_or(1) as u32;
    let x_max = ((max_count as f64) * 1.2).ceil() as u32 + 1;

    let longest_label = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    let height = (rows as u32 * 28).max(600) + 120;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (1200, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Most In-Demand AI/ML Skills & Tools",
                ("sans-serif", 26).into_font().style(FontStyle::Bold),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size((longest_label * 8 + 20).clamp(80, 320))
            .build_cartesian_2d(0u32..x_max, (0usize..rows).into_segmented())
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Number of Job Postings Mentioning Skill")
            .y_labels(rows)
            .y_label_formatter(&|v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(bottom_up.iter().enumerate().map(|(i, skill)| {
                let color = viridis(skill.percentage / 100.0);
                let mut bar = Rectangle::new(
                    [
                        (0, SegmentValue::Exact(i)),
                        (skill.count as u32, SegmentValue::Exact(i + 1)),
                    ],
                    color.filled(),
                );
                bar.set_margin(3, 3, 0, 0);
                bar
            }))
            .map_err(chart_err)?;

        let label_style = ("sans-serif", 12).into_font().color(&RGBColor(128, 128, 128));
        chart
            .draw_series(bottom_up.iter().enumerate().map(|(i, skill)| {
                EmptyElement::at((skill.count as u32, SegmentValue::CenterOf(i)))
                    + Text::new(
                        format!("{:.1}%", skill.percentage),
                        (6, -6),
                        label_style.clone(),
                    )
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(Some(svg))
}

/// Pie chart of summed skill counts per category.
pub fn render_category_pie_chart(shares: &[CategoryShare]) -> Result<Option<String>> {
    let shares: Vec<&CategoryShare> = shares.iter().filter(|s| s.count > 0).collect();
    if shares.is_empty() {
        tracing::warn!("No data for pie chart");
        return Ok(None);
    }

    let sizes: Vec<f64> = shares.iter().map(|s| s.count as f64).collect();
    let labels: Vec<String> = shares.iter().map(|s| s.category.clone()).collect();
    let colors: Vec<RGBColor> = (0..shares.len())
        .map(|i| CATEGORY_PALETTE[i % CATEGORY_PALETTE.len()])
        .collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (1000, 800)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let root = root
            .titled(
                "Skill Categories Distribution",
                ("sans-serif", 26).into_font().style(FontStyle::Bold),
            )
            .map_err(chart_err)?;

        let (width, height) = root.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.32;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
        pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
        root.draw(&pie).map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(Some(svg))
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pie chart of issue counts per priority, as standalone SVG.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write as _;
use std::io::Write;

use crate::issue::Priority;
use crate::matrix::PriorityStatusMatrix;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 400;
const CX: f64 = 200.0;
const CY: f64 = 215.0;
const RADIUS: f64 = 150.0;
const LEGEND_X: u32 = 400;

/// One wedge of the pie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Slice {
    pub priority: Priority,
    pub count: u64,
    /// Share of the grand total, in `(0, 1]`.
    pub fraction: f64,
}

/// Wedges for every priority with a non-zero count, in display order.
pub(crate) fn slices(matrix: &PriorityStatusMatrix) -> Vec<Slice> {
    let total = matrix.grand_total();
    if total == 0 {
        return Vec::new();
    }
    matrix
        .row_totals()
        .iter()
        .filter(|&(_, &count)| count > 0)
        .map(|(&priority, &count)| Slice { priority, count, fraction: count as f64 / total as f64 })
        .collect()
}

fn color(priority: Priority) -> &'static str {
    match priority {
        Priority::Blocker => "#d62728",
        Priority::Critical => "#ff7f0e",
        Priority::Major => "#f4d03f",
        Priority::Minor => "#2ca02c",
        Priority::Trivial => "#1f77b4",
        Priority::Unknown => "#7f7f7f",
    }
}

fn point(angle: f64, radius: f64) -> (f64, f64) {
    (CX + radius * angle.cos(), CY + radius * angle.sin())
}

/// Renders the chart. An empty matrix yields a chart with no wedges and a
/// "No issues" note.
pub fn to_svg(matrix: &PriorityStatusMatrix) -> String {
    let slices = slices(matrix);
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="32" text-anchor="middle" font-size="18" font-weight="bold">Bug Priority Distribution</text>"#,
        WIDTH / 2
    );

    if slices.is_empty() {
        let _ = writeln!(
            svg,
            r##"<circle cx="{CX}" cy="{CY}" r="{RADIUS}" fill="#eeeeee" stroke="#cccccc"/>"##
        );
        let _ = writeln!(
            svg,
            r##"<text x="{CX}" y="{CY}" text-anchor="middle" font-size="16" fill="#666666">No issues</text>"##
        );
    } else {
        write_wedges(&mut svg, &slices);
        write_legend(&mut svg, &slices);
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_wedges(svg: &mut String, slices: &[Slice]) {
    let mut start = -FRAC_PI_2;
    for slice in slices {
        let sweep = slice.fraction * TAU;
        let fill = color(slice.priority);
        if slices.len() == 1 {
            let _ = writeln!(
                svg,
                r#"<circle cx="{CX}" cy="{CY}" r="{RADIUS}" fill="{fill}" stroke="white" stroke-width="2"/>"#
            );
        } else {
            let (x1, y1) = point(start, RADIUS);
            let (x2, y2) = point(start + sweep, RADIUS);
            let large_arc = u8::from(sweep > std::f64::consts::PI);
            let _ = writeln!(
                svg,
                r#"<path d="M {CX} {CY} L {x1:.2} {y1:.2} A {RADIUS} {RADIUS} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{fill}" stroke="white" stroke-width="2"/>"#
            );
        }

        let (lx, ly) = point(start + sweep / 2.0, RADIUS * 0.7);
        let _ = writeln!(
            svg,
            r#"<text x="{lx:.2}" y="{ly:.2}" text-anchor="middle" dominant-baseline="middle" font-size="12" font-weight="bold">{:.1}%</text>"#,
            slice.fraction * 100.0
        );
        start += sweep;
    }
}

fn write_legend(svg: &mut String, slices: &[Slice]) {
    let _ = writeln!(
        svg,
        r#"<text x="{LEGEND_X}" y="90" font-size="14" font-weight="bold">Priority</text>"#
    );
    for (i, slice) in slices.iter().enumerate() {
        let y = 105 + 24 * i as u32;
        let _ = writeln!(
            svg,
            r#"<rect x="{LEGEND_X}" y="{y}" width="14" height="14" fill="{}"/>"#,
            color(slice.priority)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="13">{} ({})</text>"#,
            LEGEND_X + 22,
            y + 12,
            slice.priority.label(),
            slice.count
        );
    }
}

/// Writes [`to_svg`] output to `out`.
pub fn write_svg<W: Write>(matrix: &PriorityStatusMatrix, mut out: W) -> std::io::Result<()> {
    out.write_all(to_svg(matrix).as_bytes())?;
    out.flush()
}

#[cfg(test)]
#[path = "chart_tests.rs"]
mod tests;

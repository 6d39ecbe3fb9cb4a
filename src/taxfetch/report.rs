// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{ops::Range, path::Path};

use itertools::{Itertools, MinMaxResult};
use log::info;
use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::errors::SeqforgeError;
use crate::taxfetch::filter::{by_descending_length, SeqSummary};

pub const CSV_COLUMNS: [&str; 3] = ["accession", "length", "description"];

const FONT_SIZE: u32 = 14;
const LABEL_FONT_SIZE: u32 = 6;
const MIN_WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const POINT_SPACING: u32 = 12;
const MARGIN: u32 = 10;
const X_LABEL_AREA: u32 = 90;
const Y_LABEL_AREA: u32 = 70;

/// One row per record, in the order given. The header row is always written, even for an empty
/// record set.
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[SeqSummary]) -> Result<(), SeqforgeError> {
    let path = path.as_ref();
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    wtr.write_record(CSV_COLUMNS)?;
    for rec in records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Chart width in pixels for `n_points` records: wide enough to keep the rotated accession labels
/// apart, never narrower than `MIN_WIDTH`.
pub fn chart_width(n_points: usize) -> u32 {
    let n = u32::try_from(n_points).unwrap_or(u32::MAX);
    n.saturating_mul(POINT_SPACING)
        .saturating_add(2 * MARGIN + Y_LABEL_AREA)
        .max(MIN_WIDTH)
}

// Length axis: data extremes plus 5% on each side, at least 1 bp.
fn length_axis(records: &[&SeqSummary]) -> Range<usize> {
    match records.iter().map(|r| r.length).minmax() {
        MinMaxResult::NoElements => 0..1,
        MinMaxResult::OneElement(len) => len.saturating_sub(1)..len + 1,
        MinMaxResult::MinMax(lo, hi) => {
            let pad = ((hi - lo) / 20).max(1);
            lo.saturating_sub(pad)..hi + pad
        }
    }
}

/// Line-and-marker PNG of length against accession, longest first. An empty record set gives
/// a chart with axes only.
pub fn write_length_chart<P: AsRef<Path>>(
    path: P,
    title: &str,
    records: &[SeqSummary],
) -> Result<(), SeqforgeError> {
    let path = path.as_ref();
    let sorted = by_descending_length(records);
    let n = sorted.len();

    let root = BitMapBackend::new(path, (chart_width(n), HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", FONT_SIZE).into_font())
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d((0..n.max(1)).into_segmented(), length_axis(&sorted))?;

    let accession = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => sorted
            .get(*i)
            .map(|r| r.accession.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.max(1))
        .x_label_formatter(&accession)
        .x_label_style(
            ("sans-serif", LABEL_FONT_SIZE)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc("Accession")
        .y_desc("Length (bp)")
        .draw()?;

    let points: Vec<(SegmentValue<usize>, usize)> = sorted
        .iter()
        .enumerate()
        .map(|(i, rec)| (SegmentValue::CenterOf(i), rec.length))
        .collect();
    chart.draw_series(LineSeries::new(points.iter().cloned(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new(p.clone(), 3, BLUE.filled())),
    )?;
    root.present()?;

    info!("Wrote chart of {} records to {}", n, path.display());
    Ok(())
}

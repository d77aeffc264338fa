//! Report rendering for the two rank groups.

use std::fmt::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::client::{Range, ResultSet};
use crate::config::OutputMode;
use crate::rank::RankGroup;

const RULE: &str = "-------------------------------";

/// JSON report shape: each rank group wrapped as a synthetic result set.
#[derive(Serialize)]
struct JsonReport {
    top_one: ResultSet,
    top_two: ResultSet,
}

/// Render the groups in the configured mode and write to stdout.
pub fn print_report(top1: RankGroup, top2: RankGroup, mode: OutputMode) -> Result<()> {
    let rendered = match mode {
        OutputMode::Text => render_text(&top1, &top2),
        OutputMode::Json => render_json(top1, top2)?,
    };

    print!("{rendered}");
    Ok(())
}

/// Plain-text ranking report: a count header and a numbered member list per
/// group. An empty group shows a zero count and no entries.
pub fn render_text(top1: &RankGroup, top2: &RankGroup) -> String {
    let mut out = String::new();

    render_group(&mut out, 1, top1);
    out.push('\n');
    render_group(&mut out, 2, top2);

    out
}

fn render_group(out: &mut String, rank: usize, group: &RankGroup) {
    let _ = writeln!(out, "Top Downloads #{} [{}]:", rank, group.downloads());
    let _ = writeln!(out, "{RULE}");
    for (i, item) in group.items().iter().enumerate() {
        let _ = writeln!(out, "{:2}. {}", i + 1, item.name);
    }
}

/// JSON ranking report, pretty-printed with stable field names.
pub fn render_json(top1: RankGroup, top2: RankGroup) -> Result<String> {
    let report = JsonReport {
        top_one: to_result_set(top1),
        top_two: to_result_set(top2),
    };

    let mut rendered =
        serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    rendered.push('\n');
    Ok(rendered)
}

fn to_result_set(group: RankGroup) -> ResultSet {
    let items = group.into_items();
    let count = items.len() as u64;

    ResultSet {
        results: items,
        range: Range {
            start_pos: 0,
            end_pos: count,
            total: count,
        },
    }
}

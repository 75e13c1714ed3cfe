//! Rendering of the CLI report views.
//!
//! Every view is derived from the same loaded [`RegistryEngine`] and comes in
//! two flavours: an aligned plain-text table for terminals and a JSON
//! document for piping into other tools. Rendering never mutates the engine.

use insights_core::error::{InsightsError, Result};
use insights_core::formatting::{format_count, format_miles, format_percent};
use insights_data::engine::RegistryEngine;

// ── Public API ─────────────────────────────────────────────────────────────────

/// Render `view` in the requested `format` ("table" or "json").
///
/// `top` bounds the ranking-style views (counties, makes, models, utilities).
pub fn render(engine: &RegistryEngine, view: &str, top: usize, format: &str) -> Result<String> {
    match format {
        "json" => {
            let value = json_value(engine, view, top)?;
            let mut out = serde_json::to_string_pretty(&value)?;
            out.push('\n');
            Ok(out)
        }
        _ => text_report(engine, view, top),
    }
}

// ── Text views ─────────────────────────────────────────────────────────────────

fn text_report(engine: &RegistryEngine, view: &str, top: usize) -> Result<String> {
    let text = match view {
        "summary" => summary_block(engine),
        "counties" => counties_table(engine, top),
        "years" => years_table(engine),
        "makes" => makes_table(engine, top),
        "models" => models_table(engine, top),
        "ranges" => ranges_table(engine),
        "utilities" => utilities_table(engine, top),
        "full" => full_report(engine, top),
        unknown => {
            return Err(InsightsError::Config(format!("Unknown view: {unknown}")));
        }
    };
    Ok(text)
}

fn summary_block(engine: &RegistryEngine) -> String {
    let summary = engine.dashboard_summary();
    if summary.total_vehicles == 0 {
        return "No vehicles loaded.\n".to_string();
    }

    key_value_block(&[
        ("Total vehicles", format_count(summary.total_vehicles)),
        (
            "Average electric range",
            format_miles(summary.avg_electric_range),
        ),
        ("BEV share", format!("{}%", summary.bev_percentage)),
        ("PHEV share", format!("{}%", summary.phev_percentage)),
        ("Top county", summary.top_county),
        ("Top make", summary.top_make),
        (
            "Model years",
            format!("{}-{}", summary.earliest_year, summary.latest_year),
        ),
    ])
}

fn counties_table(engine: &RegistryEngine, top: usize) -> String {
    let rows: Vec<Vec<String>> = bounded(engine.county_distribution(), top)
        .into_iter()
        .map(|c| vec![c.name, format_count(c.count), format_percent(c.percentage)])
        .collect();
    render_table(&["County", "Vehicles", "Share"], &rows, 1)
}

fn years_table(engine: &RegistryEngine) -> String {
    let rows: Vec<Vec<String>> = engine
        .yearly_trend()
        .into_iter()
        .map(|y| {
            vec![
                y.year.to_string(),
                format_count(y.total),
                format_count(y.bev),
                format_count(y.phev),
            ]
        })
        .collect();
    render_table(&["Year", "Total", "BEV", "PHEV"], &rows, 1)
}

fn makes_table(engine: &RegistryEngine, top: usize) -> String {
    let rows: Vec<Vec<String>> = bounded(engine.manufacturer_distribution(), top)
        .into_iter()
        .map(|m| {
            vec![
                m.name,
                format_count(m.count),
                format_percent(m.percentage),
                format!("{:.2}", m.avg_range),
            ]
        })
        .collect();
    render_table(&["Make", "Vehicles", "Share", "Avg Range (mi)"], &rows, 1)
}

fn models_table(engine: &RegistryEngine, top: usize) -> String {
    let rows: Vec<Vec<String>> = engine
        .model_rankings(top)
        .into_iter()
        .map(|m| {
            vec![
                m.make,
                m.model,
                format_count(m.count),
                format!("{:.2}", m.avg_range),
                format!("{:.2}", m.avg_year),
            ]
        })
        .collect();
    render_table(
        &["Make", "Model", "Vehicles", "Avg Range (mi)", "Avg Year"],
        &rows,
        2,
    )
}

fn ranges_table(engine: &RegistryEngine) -> String {
    let rows: Vec<Vec<String>> = engine
        .range_distribution()
        .into_iter()
        .map(|b| vec![b.label, format_count(b.count), format_percent(b.percentage)])
        .collect();
    render_table(&["Range (mi)", "Vehicles", "Share"], &rows, 1)
}

fn utilities_table(engine: &RegistryEngine, top: usize) -> String {
    let rows: Vec<Vec<String>> = bounded(engine.utility_distribution(), top)
        .into_iter()
        .map(|u| vec![u.name, format_count(u.count), format_percent(u.percentage)])
        .collect();
    render_table(&["Utility", "Vehicles", "Share"], &rows, 1)
}

fn full_report(engine: &RegistryEngine, top: usize) -> String {
    let mut out = String::new();
    push_section(&mut out, "Summary", summary_block(engine));
    push_section(&mut out, "Counties", counties_table(engine, top));
    push_section(&mut out, "Model Years", years_table(engine));
    push_section(&mut out, "Manufacturers", makes_table(engine, top));
    push_section(&mut out, "Top Models", models_table(engine, top));
    push_section(&mut out, "Electric Range", ranges_table(engine));
    push_section(&mut out, "Utilities", utilities_table(engine, top));
    if let Some(block) = metadata_block(engine) {
        push_section(&mut out, "Load", block);
    }
    out
}

/// Key/value block describing the most recent load, when one happened.
fn metadata_block(engine: &RegistryEngine) -> Option<String> {
    let meta = engine.last_load()?;
    Some(key_value_block(&[
        ("Source", meta.source.clone()),
        ("Loaded at", meta.generated_at.clone()),
        ("Rows parsed", format_count(meta.rows_parsed)),
        ("Rows skipped", format_count(meta.rows_skipped)),
        ("Load time", format!("{:.2}s", meta.load_time_seconds)),
    ]))
}

// ── JSON views ─────────────────────────────────────────────────────────────────

fn json_value(engine: &RegistryEngine, view: &str, top: usize) -> Result<serde_json::Value> {
    let value = match view {
        "summary" => serde_json::to_value(engine.dashboard_summary())?,
        "counties" => serde_json::to_value(bounded(engine.county_distribution(), top))?,
        "years" => serde_json::to_value(engine.yearly_trend())?,
        "makes" => serde_json::to_value(bounded(engine.manufacturer_distribution(), top))?,
        "models" => serde_json::to_value(engine.model_rankings(top))?,
        "ranges" => serde_json::to_value(engine.range_distribution())?,
        "utilities" => serde_json::to_value(bounded(engine.utility_distribution(), top))?,
        "full" => serde_json::json!({
            "summary": engine.dashboard_summary(),
            "counties": bounded(engine.county_distribution(), top),
            "years": engine.yearly_trend(),
            "makes": bounded(engine.manufacturer_distribution(), top),
            "models": engine.model_rankings(top),
            "ranges": engine.range_distribution(),
            "utilities": bounded(engine.utility_distribution(), top),
            "load": engine.last_load(),
        }),
        unknown => {
            return Err(InsightsError::Config(format!("Unknown view: {unknown}")));
        }
    };
    Ok(value)
}

// ── Private ────────────────────────────────────────────────────────────────────

/// Keep only the first `top` entries of an already-sorted listing.
fn bounded<T>(mut items: Vec<T>, top: usize) -> Vec<T> {
    items.truncate(top);
    items
}

/// Align `pairs` into a two-column key/value block.
fn key_value_block(pairs: &[(&str, String)]) -> String {
    let width = pairs
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in pairs {
        out.push_str(&format!("{label:<width$}  {value}\n"));
    }
    out
}

/// Render a header row, a rule and the data rows with aligned columns.
///
/// The first `label_cols` columns are left-aligned, the rest right-aligned.
fn render_table(headers: &[&str], rows: &[Vec<String>], label_cols: usize) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();

    let mut out = String::new();
    out.push_str(&format_row(&header_cells, &widths, label_cols));
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row, &widths, label_cols));
    }
    out
}

fn format_row(cells: &[String], widths: &[usize], label_cols: usize) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let width = widths[i];
        if i < label_cols {
            parts.push(format!("{cell:<width$}"));
        } else {
            parts.push(format!("{cell:>width$}"));
        }
    }
    let line = parts.join("  ");
    format!("{}\n", line.trim_end())
}

fn push_section(out: &mut String, title: &str, body: String) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!("=== {title} ===\n"));
    out.push_str(&body);
}

// ── Tests ──────────────────────────────────────────────────────────────────────

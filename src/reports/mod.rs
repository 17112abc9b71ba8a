use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keystat::config::Config;
use keystat::error::KsResult;
use keystat::layout::{Layout, Row};
use keystat::metrics::{Metric, MetricsResult};
use keystat::table::{Category, ClassificationTable};
use std::path::Path;
use strum::IntoEnumIterator;

const TRIGRAM_COLUMNS: [Metric; 17] = [
    Metric::Alternate,
    Metric::RollIn,
    Metric::RollOut,
    Metric::Roll,
    Metric::RollRatio,
    Metric::OnehandIn,
    Metric::OnehandOut,
    Metric::Onehand,
    Metric::OnehandRatio,
    Metric::Redirect,
    Metric::Sfb,
    Metric::DsfbAlt,
    Metric::DsfbRed,
    Metric::Dsfb,
    Metric::SfT,
    Metric::SfR,
    Metric::Unknown,
];

const FINGER_COLUMNS: [Metric; 11] = [
    Metric::LeftPinky,
    Metric::LeftRing,
    Metric::LeftMiddle,
    Metric::LeftIndex,
    Metric::Thumb,
    Metric::RightIndex,
    Metric::RightMiddle,
    Metric::RightRing,
    Metric::RightPinky,
    Metric::LeftTotal,
    Metric::RightTotal,
];

/// Fractions print as percentages; ratios print raw, `inf` included.
pub fn format_value(metric: Metric, value: f64) -> String {
    match metric {
        Metric::RollRatio | Metric::OnehandRatio => {
            if value.is_infinite() {
                "inf".to_string()
            } else {
                format!("{:.2}", value)
            }
        }
        _ => format!("{:.2}%", value * 100.0),
    }
}

fn header_color(metric: Metric) -> Option<Color> {
    match metric {
        Metric::Roll | Metric::RollIn | Metric::RollOut | Metric::Alternate => Some(Color::Green),
        Metric::Sfb | Metric::SfT | Metric::SfR | Metric::Redirect => Some(Color::Red),
        Metric::RollRatio | Metric::OnehandRatio => Some(Color::Cyan),
        _ => None,
    }
}

fn print_metric_table(title: &str, rows: &[(String, MetricsResult)], metrics: &[Metric], config: &Config) {
    let visible: Vec<Metric> = metrics
        .iter()
        .copied()
        .filter(|&m| config.is_column_visible(m))
        .collect();
    if visible.is_empty() || rows.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new(title).add_attribute(Attribute::Bold)];
    for &m in &visible {
        let cell = Cell::new(m.as_ref());
        header.push(match header_color(m) {
            Some(c) => cell.fg(c),
            None => cell,
        });
    }
    table.add_row(header);

    for i in 1..=visible.len() {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, result) in rows {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(
            visible
                .iter()
                .map(|&m| Cell::new(format_value(m, result.metric(m)))),
        );
        table.add_row(cells);
    }
    println!("\n{}", table);
}

pub fn print_results(rows: &[(String, MetricsResult)], config: &Config) {
    let title = format!("Trigrams ({})", config.thumb_space);
    print_metric_table(&title, rows, &TRIGRAM_COLUMNS, config);
    print_metric_table("Finger use", rows, &FINGER_COLUMNS, config);
    print_metric_table("Row use", rows, &Metric::ROW_USE, config);
}

/// 3x10 view of a layout's primary characters.
pub fn print_layout_grid(layout: &Layout) {
    let mut grid = [[' '; 10]; 3];
    for (&c, key) in &layout.keys {
        if key.shift {
            continue;
        }
        if let (Some(row), Some(col)) = (key.row, key.col) {
            if col < 10 {
                grid[row as usize][col] = c;
            }
        }
    }

    println!("\nLayout: {}", layout.name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    for row in Row::iter() {
        let cells: Vec<Cell> = grid[row as usize]
            .iter()
            .map(|c| Cell::new(c.to_string()).set_alignment(CellAlignment::Center))
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

/// Classification table grouped by category, with per-category counts.
pub fn print_classification(table: &ClassificationTable) {
    let counts = table.category_counts();
    let entries = table.sorted_entries();

    let mut out = Table::new();
    out.load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    out.add_row(vec![
        Cell::new("Category").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Finger triples"),
    ]);
    if let Some(col) = out.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for cat in Category::iter() {
        let triples: Vec<String> = entries
            .iter()
            .filter(|(_, c)| *c == cat)
            .map(|(t, _)| t.to_string())
            .collect();
        out.add_row(vec![
            Cell::new(cat.as_ref()).add_attribute(Attribute::Bold),
            Cell::new(counts.get(&cat).copied().unwrap_or(0)),
            Cell::new(triples.join(" ")),
        ]);
    }
    println!("{}", out);
    println!("Total: {} entries", table.len());
}

/// One row per layout, one column per metric key, in key order.
pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[(String, MetricsResult)]) -> KsResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let keys: Vec<&str> = rows
        .first()
        .map(|(_, r)| r.iter().map(|(k, _)| k).collect())
        .unwrap_or_default();

    let mut header = vec!["layout"];
    header.extend(keys.iter().copied());
    wtr.write_record(&header)?;

    for (name, result) in rows {
        let mut record = vec![name.clone()];
        record.extend(
            keys.iter()
                .map(|k| result.get(k).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

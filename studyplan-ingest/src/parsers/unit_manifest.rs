//! Unit manifest CSV parser.
//!
//! Expected header (column order is free, matched by name):
//!   title,order,estimated_minutes,material_ids,difficulty,topics
//!
//! `material_ids` and `topics` are `;`-separated lists.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;
use studyplan_core::{DifficultyLevel, Unit, UnitStatus};
use tracing::debug;

use crate::types::ManifestRow;

/// Parse a manifest file into units sorted by `order`.
pub fn parse_unit_manifest(path: impl AsRef<Path>) -> Result<Vec<Unit>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_unit_manifest_reader(file)
        .with_context(|| format!("parsing {}", path.as_ref().display()))
}

pub fn parse_unit_manifest_str(text: &str) -> Result<Vec<Unit>> {
    parse_unit_manifest_reader(text.as_bytes())
}

fn parse_unit_manifest_reader(input: impl Read) -> Result<Vec<Unit>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let Some(title_col) = col("title") else {
        bail!("manifest is missing a 'title' column");
    };
    let Some(minutes_col) = col("estimated_minutes") else {
        bail!("manifest is missing an 'estimated_minutes' column");
    };
    let order_col = col("order");
    let materials_col = col("material_ids");
    let difficulty_col = col("difficulty");
    let topics_col = col("topics");

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = i + 2;

        let title = record.get(title_col).unwrap_or("");
        if title.is_empty() {
            continue;
        }

        let minutes_str = record.get(minutes_col).unwrap_or("");
        let estimated_minutes: i32 = minutes_str
            .parse()
            .with_context(|| format!("row {line}: invalid estimated_minutes '{minutes_str}'"))?;

        let order = match order_col.and_then(|c| record.get(c)).filter(|s| !s.is_empty()) {
            Some(s) => Some(
                s.parse::<u32>()
                    .with_context(|| format!("row {line}: invalid order '{s}'"))?,
            ),
            None => None,
        };

        rows.push(ManifestRow {
            title: title.to_string(),
            order,
            estimated_minutes,
            material_ids: split_list(materials_col.and_then(|c| record.get(c))),
            difficulty: difficulty_col
                .and_then(|c| record.get(c))
                .unwrap_or("")
                .to_string(),
            topics: split_list(topics_col.and_then(|c| record.get(c))),
        });
    }

    let mut units = Vec::with_capacity(rows.len());
    for (pos, row) in rows.into_iter().enumerate() {
        units.push(row_to_unit(row, pos as u32 + 1)?);
    }
    units.sort_by_key(|u| u.order);

    debug!(units = units.len(), "parsed unit manifest");
    Ok(units)
}

fn row_to_unit(row: ManifestRow, position: u32) -> Result<Unit> {
    let Some(difficulty_level) = DifficultyLevel::parse(&row.difficulty) else {
        bail!("unit '{}': unknown difficulty '{}'", row.title, row.difficulty);
    };
    Ok(Unit {
        id: uuid::Uuid::new_v4().to_string(),
        title: row.title,
        order: row.order.unwrap_or(position),
        material_ids: row.material_ids,
        estimated_minutes: row.estimated_minutes,
        difficulty_level,
        topics: row.topics,
        status: UnitStatus::NotStarted,
    })
}

fn split_list(s: Option<&str>) -> Vec<String> {
    s.unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

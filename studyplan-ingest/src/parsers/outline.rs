//! Material outline parser (text)
//!
//! Turns a table of contents extracted from an uploaded material into units.
//!
//! Expected lines (anything else is ignored):
//!   Chapter 3: Thermodynamics (pp. 45-80)
//!   Unit 2 - Reaction Kinetics (pages 10-30)
//!   Section 4. Entropy (p. 81-88)

use anyhow::Result;
use regex::Regex;
use studyplan_core::Unit;
use tracing::debug;

pub const DEFAULT_MINUTES_PER_PAGE: i32 = 3;

/// Parse outline text into units, in document order.
///
/// Each unit's estimate is `page count * minutes_per_page`; every unit
/// references `material_id`.
pub fn parse_outline_text(text: &str, material_id: &str, minutes_per_page: i32) -> Result<Vec<Unit>> {
    let line_re = Regex::new(concat!(
        r"(?i)^\s*(?:chapter|unit|section|part)\s+(?P<num>[\dIVXivx]+)\s*[:.\-]\s*",
        r"(?P<title>.+?)\s*",
        r"\((?:pp?\.|pages?)\s*(?P<start>\d+)\s*[-–]\s*(?P<end>\d+)\)\s*$"
    ))?;

    let mut out = Vec::new();

    for line in text.lines() {
        let Some(caps) = line_re.captures(line) else {
            continue;
        };

        let (Ok(start), Ok(end)) = (caps["start"].parse::<i32>(), caps["end"].parse::<i32>()) else {
            debug!(line, "skipping outline entry with out-of-range page numbers");
            continue;
        };
        if end < start {
            debug!(line, "skipping outline entry with inverted page range");
            continue;
        }
        let Some(minutes) = end
            .checked_sub(start)
            .and_then(|d| d.checked_add(1))
            .and_then(|pages| pages.checked_mul(minutes_per_page))
        else {
            debug!(line, "skipping outline entry whose estimate overflows");
            continue;
        };

        let order = out.len() as u32 + 1;
        let unit = Unit::new(
            uuid::Uuid::new_v4().to_string(),
            caps["title"].trim(),
            order,
            minutes,
        )
        .with_materials([material_id]);
        out.push(unit);
    }

    Ok(out)
}

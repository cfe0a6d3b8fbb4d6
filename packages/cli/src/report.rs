//! Plain-text rendering of rankings and locality details.

use std::fmt::Write as _;

use crime_rate_analytics::color::crime_rate_color;
use crime_rate_analytics_models::{LocalityDetails, RankedLocality, RankedView};
use crime_rate_geography_models::CrimeRate;

use crate::session::Session;

fn ranked_lines(out: &mut String, title: &str, entries: &[RankedLocality]) {
    let _ = writeln!(out, "{title}");
    if entries.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        let color = crime_rate_color(CrimeRate::Rate(entry.rate))
            .map(|c| c.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:>2}. {:<32} {:>8.2}  {color}",
            i + 1,
            entry.name,
            entry.rate
        );
    }
}

/// Highest and lowest lists, plus how many suburbs had no rate.
#[must_use]
pub fn rankings(view: &RankedView) -> String {
    let mut out = String::new();
    ranked_lines(&mut out, "Highest crime rate (offences per 100 residents)", &view.highest);
    out.push('\n');
    ranked_lines(&mut out, "Lowest crime rate (offences per 100 residents)", &view.lowest);
    let _ = writeln!(
        out,
        "\n{} of {} suburbs ranked, {} with insufficient data",
        view.sorted.len(),
        view.total_features,
        view.missing_count()
    );
    out
}

#[must_use]
pub fn details(details: &LocalityDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", details.name);
    let _ = writeln!(out, "  Rank        {} ({})", details.rank_label(), details.tier);
    let _ = writeln!(out, "  Crime rate  {:.2}", details.rate);
    if let Some((lng, lat)) = details.center {
        let _ = writeln!(out, "  Center      {lng:.5}, {lat:.5}");
    }
    out
}

/// Details for `name`, its bare rate when it is on the map but unranked,
/// or a not-found line.
#[must_use]
pub fn lookup(session: &Session, name: &str) -> String {
    if let Some(found) = session.engine.details(name) {
        return details(&found);
    }
    match session.engine.rate_of(name) {
        Some(rate) => format!("{name}: {rate}\n"),
        None => format!("No suburb named {name:?} on this map.\n"),
    }
}

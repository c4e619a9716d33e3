// Colored terminal output for stage counts, rejections, clusters and
// frequency tables.
//
// main.rs delegates all display here; the library stages never print.

use std::collections::BTreeMap;

use colored::Colorize;
use indexmap::IndexMap;

use crate::pipeline::report::{Clustering, StageCounts};

/// Show how many records survived each stage.
pub fn display_stage_counts(counts: &StageCounts) {
    println!("\n{}", "=== Records per stage ===".bold());
    let rows = [
        ("Raw", counts.raw),
        ("Deduplicated", counts.deduplicated),
        ("Filtered", counts.filtered),
        ("Clustered", counts.clustered),
    ];
    let mut previous: Option<usize> = None;
    for (stage, count) in rows {
        let lost = previous.map(|p| p.saturating_sub(count)).unwrap_or(0);
        let lost_str = if lost > 0 {
            format!("(-{lost})").red().to_string()
        } else {
            String::new()
        };
        println!("  {:<14} {:>6} {}", stage, count, lost_str);
        previous = Some(count);
    }
}

/// Before/after line for a single stage.
pub fn display_before_after(label: &str, before: usize, after: usize) {
    println!(
        "Number of articles before {label}: {}",
        before.to_string().bold()
    );
    println!(
        "Number of articles after {label}: {}",
        after.to_string().bold()
    );
}

/// Rejection tally per criterion, in chain order.
pub fn display_rejections(tally: &IndexMap<String, usize>) {
    if tally.is_empty() {
        println!("  No inclusion criteria configured.");
        return;
    }
    println!("\n{}", "=== Rejections by first failing criterion ===".bold());
    for (criterion, count) in tally {
        let count_str = if *count > 0 {
            count.to_string().yellow()
        } else {
            count.to_string().dimmed()
        };
        println!("  {:<16} {:>6}", criterion, count_str);
    }
}

/// Cluster table: size and top terms per label.
pub fn display_clusters(clustering: &Clustering) {
    println!(
        "\n{}",
        format!(
            "=== {} clusters over {} documents ===",
            clustering.k,
            clustering.labels.len()
        )
        .bold()
    );
    let sizes = clustering.sizes();
    for (label, terms) in &clustering.terms {
        let size = sizes.get(label).copied().unwrap_or(0);
        println!(
            "  {:>3}. {:>4} docs  {}",
            label,
            size,
            super::truncate_chars(&terms.join(", "), 110).dimmed()
        );
    }
}

/// A ranked frequency table (keywords or n-grams).
pub fn display_ranked(title: &str, ranked: &[(String, usize)]) {
    println!("\n{}", format!("=== {title} ===").bold());
    if ranked.is_empty() {
        println!("  (nothing above the frequency floor)");
        return;
    }
    let widest = ranked.first().map(|(_, c)| *c).unwrap_or(1).max(1);
    for (term, count) in ranked {
        let filled = (*count * 20).div_ceil(widest);
        println!(
            "  {:<36} {:>5} {}",
            super::truncate_chars(term, 34),
            count,
            "=".repeat(filled).bright_green()
        );
    }
}

/// Records per publication year.
pub fn display_years(years: &BTreeMap<i32, usize>) {
    println!("\n{}", "=== Distribution by year ===".bold());
    for (year, count) in years {
        println!("  {year}  {:>5} {}", count, "#".repeat((*count).min(60)).bright_blue());
    }
}

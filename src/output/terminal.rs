// Colored terminal output for recommendations and search results.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::enrich::LinkedPlace;
use crate::filter::FilterHit;
use crate::recommend::FallbackReason;

/// Display a ranked recommendation list for `target`.
pub fn display_recommendations(target: &str, places: &[LinkedPlace]) {
    println!(
        "\n{}",
        format!("=== Places like \"{target}\" ({} results) ===", places.len()).bold()
    );
    println!();

    if places.is_empty() {
        println!("  No recommendations: every other place shares a review with this one.");
        return;
    }

    display_place_table(places);
}

/// Explain a fallback and show the unfiltered catalog it carries.
pub fn display_fallback(target: &str, reason: FallbackReason, places: &[LinkedPlace]) {
    let message = match reason {
        FallbackReason::NoTarget => "No place name given.".to_string(),
        FallbackReason::NotFound => format!("No place titled \"{target}\" in the catalog."),
    };
    println!("\n{} {}", "Note:".yellow(), message);
    println!(
        "{}",
        "  Titles match exactly and are case-sensitive. Try `hows-seoul search`.".dimmed()
    );
    println!(
        "\n{}",
        format!("=== All places ({} rows, unranked) ===", places.len()).bold()
    );
    println!();

    display_place_table(places);
}

fn display_place_table(places: &[LinkedPlace]) {
    println!(
        "  {:>4}  {:<16} {:<32} {:<24} {}",
        "Rank".dimmed(),
        "Region".dimmed(),
        "Title".dimmed(),
        "Category".dimmed(),
        "Link".dimmed(),
    );
    println!("  {}", "-".repeat(84).dimmed());

    for (i, linked) in places.iter().enumerate() {
        let link = match &linked.link {
            Some(link) => link.bright_blue().underline(),
            None => "-".dimmed(),
        };
        println!(
            "  {:>4}. {:<16} {:<32} {:<24} {}",
            i + 1,
            linked.place.search_term,
            linked.place.title.bold(),
            linked.place.category,
            link,
        );
    }
    println!();
}

/// Display keyword search results with review previews.
pub fn display_filter_hits(hits: &[FilterHit]) {
    if hits.is_empty() {
        println!("No matching places.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Search results ({} places) ===", hits.len()).bold()
    );
    println!();

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "  {:>2}. {} {} {}",
            i + 1,
            hit.title.bold(),
            format!("[{}]", hit.search_term).cyan(),
            hit.category.dimmed(),
        );
        println!("      {}", super::truncate_chars(&hit.review, 140).dimmed());
    }
    println!();
}

/// Display pairwise similarity between two places.
pub fn display_similarity(a: &str, b: &str, review: f64, category: f64, combined: f64) {
    println!("\n{}", format!("=== \"{a}\" vs \"{b}\" ===").bold());
    println!("  Review similarity:   {}", colorize_score(review));
    println!("  Category similarity: {}", colorize_score(category));
    println!("  Combined score:      {combined:.3}");
}

/// Color a [0, 1] similarity by strength.
fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.75 {
        text.bright_green()
    } else if score >= 0.25 {
        text.yellow()
    } else {
        text.dimmed()
    }
}

//! Plain-text rendering of ranked listings.

use leafdex_core::RankedListing;

/// One table row: distance, name, city, source tier.
#[must_use]
pub fn format_row(ranked: &RankedListing) -> String {
    let city = if ranked.listing.city.is_empty() {
        "-"
    } else {
        ranked.listing.city.as_str()
    };
    format!(
        "{:>8.1} km  {:<30} {:<16} [{}]",
        ranked.distance_km, ranked.listing.name, city, ranked.listing.source
    )
}

pub fn print_ranked(listings: &[RankedListing], limit: usize) {
    for ranked in listings.iter().take(limit) {
        println!("{}", format_row(ranked));
    }
    if listings.len() > limit {
        println!("… and {} more", listings.len() - limit);
    }
}

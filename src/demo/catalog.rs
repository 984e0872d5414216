// src/demo/catalog.rs

//! Mock recommendation cards.

use crate::demo::Coordinate;

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub category: String,
    pub rating: f32,
    pub location: Coordinate,
}

const CATALOG: &[(&str, &str, f32, f64, f64)] = &[
    ("Central Park", "attraction", 4.8, 40.7812, -73.9665),
    ("The Gourmet Kitchen", "restaurant", 4.5, 40.7580, -73.9855),
    ("Metropolitan Museum", "attraction", 4.7, 40.7794, -73.9632),
    ("Grand Central Market", "shopping", 4.3, 40.7527, -73.9772),
    ("Luxury Suites Hotel", "hotel", 4.9, 40.7614, -73.9776),
    ("City Lights Cinema", "entertainment", 4.2, 40.7648, -73.9808),
    ("Riverside Cafe", "restaurant", 4.4, 40.7731, -73.9712),
    ("Fashion District Mall", "shopping", 4.1, 40.7539, -73.9912),
    ("Botanical Gardens", "attraction", 4.6, 40.7882, -73.9532),
    ("Downtown Bistro", "restaurant", 4.3, 40.7681, -73.9826),
    ("Historic Theater", "entertainment", 4.7, 40.7590, -73.9845),
    ("City View Hotel", "hotel", 4.4, 40.7632, -73.9819),
];

/// The fixed catalogue of recommendations (`rec1` .. `rec12`).
pub fn mock_recommendations() -> Vec<Recommendation> {
    sample_cards(CATALOG.len())
}

/// `count` cards, cycling through the catalogue. Ids stay unique.
pub fn sample_cards(count: usize) -> Vec<Recommendation> {
    (0..count)
        .map(|i| {
            let (name, category, rating, lat, lng) = CATALOG[i % CATALOG.len()];
            Recommendation {
                id: format!("rec{}", i + 1),
                name: name.to_string(),
                category: category.to_string(),
                rating,
                location: Coordinate::new(lat, lng),
            }
        })
        .collect()
}

/// Cards matching `filter`; `"all"` keeps every card.
pub fn filter_by_category<'a>(cards: &'a [Recommendation], filter: &str) -> Vec<&'a Recommendation> {
    let filter = filter.trim();
    if filter.eq_ignore_ascii_case("all") {
        return cards.iter().collect();
    }
    cards
        .iter()
        .filter(|card| card.category.eq_ignore_ascii_case(filter))
        .collect()
}

/// Cards paired with their distance from `from`, nearest first.
pub fn rank_by_distance<'a>(cards: &'a [Recommendation], from: &Coordinate) -> Vec<(f64, &'a Recommendation)> {
    let mut ranked: Vec<(f64, &Recommendation)> = cards
        .iter()
        .map(|card| (from.distance_km(&card.location), card))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked
}

// Link enrichment: attach each place's detail-page link.
//
// Recommendation results only carry region, title and category. The link
// catalog (restaurant, hotel and cafe tables in the link store) maps titles
// to canonical detail pages. This is a left join on title: a place without a
// link keeps its plain title and is never dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::models::PlaceLink;
use crate::output::html::escape_html;
use crate::recommend::PlaceSummary;

/// Title → link lookup table. Case-sensitive, exact match.
#[derive(Debug, Clone, Default)]
pub struct LinkCatalog {
    links: HashMap<String, String>,
}

impl LinkCatalog {
    /// Build from stored links. When a title appears more than once (e.g. in
    /// both the restaurant and cafe tables) the first link wins.
    pub fn from_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = PlaceLink>,
    {
        let mut map = HashMap::new();
        for link in links {
            map.entry(link.title).or_insert(link.link);
        }
        Self { links: map }
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.links.get(title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// A recommended place with its link, if the catalog had one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedPlace {
    #[serde(flatten)]
    pub place: PlaceSummary,
    pub link: Option<String>,
}

impl LinkedPlace {
    /// The title as HTML: an anchor opening in a new tab when a link exists,
    /// escaped plain text otherwise.
    pub fn title_markup(&self) -> String {
        let title = escape_html(&self.place.title);
        match &self.link {
            Some(link) => format!(
                "<a href='{}' target='_blank'>{}</a>",
                escape_html(link),
                title
            ),
            None => title,
        }
    }
}

/// Left-join places to the link catalog, preserving order and row count.
pub fn enrich(places: &[PlaceSummary], links: &LinkCatalog) -> Vec<LinkedPlace> {
    places
        .iter()
        .map(|place| LinkedPlace {
            place: place.clone(),
            link: links.get(&place.title).map(str::to_string),
        })
        .collect()
}

// Database queries: CRUD operations for the link store.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::{PlaceKind, PlaceLink};

/// Sort key matching the order the source tables were concatenated in:
/// restaurants, then hotels, then cafes.
const KIND_ORDER: &str = "CASE kind
        WHEN 'restaurant' THEN 0
        WHEN 'hotel' THEN 1
        WHEN 'cafe' THEN 2
        ELSE 3 END";

/// Replace every link of `kind` with `links` (title, link) in one transaction.
///
/// Returns the number of rows inserted.
pub fn replace_links(conn: &Connection, kind: PlaceKind, links: &[(String, String)]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM place_links WHERE kind = ?1", params![kind.as_str()])?;
    {
        let mut stmt =
            tx.prepare("INSERT INTO place_links (kind, title, link) VALUES (?1, ?2, ?3)")?;
        for (title, link) in links {
            stmt.execute(params![kind.as_str(), title, link])?;
        }
    }
    tx.commit().context("Failed to commit link import")?;
    Ok(links.len())
}

/// Load every stored link, restaurants first, each kind in import order.
pub fn all_links(conn: &Connection) -> Result<Vec<PlaceLink>> {
    let sql = format!("SELECT kind, title, link FROM place_links ORDER BY {KIND_ORDER}, id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(kind, title, link)| {
            let kind = kind
                .parse::<PlaceKind>()
                .map_err(|e| anyhow::anyhow!("Corrupt place_links row for '{title}': {e}"))?;
            Ok::<_, anyhow::Error>(PlaceLink { kind, title, link })
        })
        .collect()
}

/// Number of stored links per kind (kinds with no rows report 0).
pub fn link_counts(conn: &Connection) -> Result<Vec<(PlaceKind, i64)>> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM place_links WHERE kind = ?1")?;
    let mut counts = Vec::with_capacity(PlaceKind::ALL.len());
    for kind in PlaceKind::ALL {
        let count: i64 = stmt.query_row(params![kind.as_str()], |row| row.get(0))?;
        counts.push((kind, count));
    }
    Ok(counts)
}

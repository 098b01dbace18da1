// Link catalog import from CSV exports of the source tables.
//
// Each export has at least TITLE and LINK columns (matched
// case-insensitively). Rows with an empty title or link carry nothing to
// join on and are skipped.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use super::models::PlaceKind;
use super::queries;

/// Parse (title, link) pairs from a CSV reader.
pub fn read_links<R: Read>(reader: R) -> Result<Vec<(String, String)>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("Failed to read CSV header")?.clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
    };
    let Some(title_col) = find("title") else {
        anyhow::bail!("Link file is missing a TITLE column");
    };
    let Some(link_col) = find("link") else {
        anyhow::bail!("Link file is missing a LINK column");
    };

    let mut links = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record.context("Malformed row in link file")?;
        let title = record.get(title_col).unwrap_or_default().trim();
        let link = record.get(link_col).unwrap_or_default().trim();
        if title.is_empty() || link.is_empty() {
            skipped += 1;
            continue;
        }
        links.push((title.to_string(), link.to_string()));
    }

    if skipped > 0 {
        warn!(skipped = skipped, "Skipped link rows without a title or link");
    }

    Ok(links)
}

/// Import a link CSV for one kind, replacing that kind's previous links.
pub fn import_link_file(conn: &Connection, kind: PlaceKind, path: &Path) -> Result<usize> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open link file {}", path.display()))?;
    let links = read_links(std::io::BufReader::new(file))?;
    let count = queries::replace_links(conn, kind, &links)?;

    info!(kind = %kind, path = %path.display(), links = count, "Imported place links");

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_links_uppercase_headers() {
        let data = "ID,TITLE,LINK,ADDRESS\n1,Onion,https://onion,성수\n2,Daelim,https://daelim,성수\n";
        let links = read_links(data.as_bytes()).unwrap();
        assert_eq!(
            links,
            vec![
                ("Onion".to_string(), "https://onion".to_string()),
                ("Daelim".to_string(), "https://daelim".to_string()),
            ]
        );
    }

    #[test]
    fn test_read_links_skips_empty() {
        let data = "title,link\nA,\n,https://b\nC,https://c\n";
        let links = read_links(data.as_bytes()).unwrap();
        assert_eq!(links, vec![("C".to_string(), "https://c".to_string())]);
    }

    #[test]
    fn test_read_links_missing_column() {
        let data = "title,url\nA,https://a\n";
        assert!(read_links(data.as_bytes()).is_err());
    }
}

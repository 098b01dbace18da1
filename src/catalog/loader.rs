// Catalog loaders for CSV and JSON exports.
//
// Column names are matched after trimming whitespace (and a UTF-8 BOM) and
// lowercasing, so `Title` and ` title ` both resolve. `검색어` and `title`
// are required; `category` and `review` may be absent entirely, in which case
// every row gets an empty string.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use super::traits::{CatalogSource, SourceStamp};
use super::{Catalog, Place, CATEGORY_COLUMN, REGION_COLUMN, REVIEW_COLUMN, TITLE_COLUMN};
use crate::error::CatalogError;

/// Load a catalog from a `.csv` or `.json` file.
pub fn load_path(path: &Path) -> Result<Catalog, CatalogError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let catalog = match extension.as_deref() {
        Some("csv") => from_csv_reader(reader)?,
        Some("json") => from_json_reader(reader)?,
        _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
    };

    info!(
        path = %path.display(),
        places = catalog.len(),
        "Loaded place catalog"
    );

    Ok(catalog)
}

/// Parse a CSV catalog with a header row.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut places = Vec::new();
    for record in rdr.records() {
        places.push(columns.place(&record?));
    }

    Ok(Catalog::new(places))
}

/// Parse a JSON catalog: an array of objects keyed by column name.
///
/// Null or missing `category`/`review` values become empty strings. A row
/// without `검색어` or `title` is rejected, naming the column.
pub fn from_json_reader<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let rows: Vec<JsonPlace> = serde_json::from_reader(reader)?;

    let places = rows
        .into_iter()
        .map(|row| {
            let search_term = row
                .search_term
                .ok_or_else(|| CatalogError::MissingColumn(REGION_COLUMN.to_string()))?;
            let title = row
                .title
                .ok_or_else(|| CatalogError::MissingColumn(TITLE_COLUMN.to_string()))?;
            Ok(Place {
                search_term,
                title,
                category: row.category.unwrap_or_default(),
                review: row.review.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    Ok(Catalog::new(places))
}

#[derive(Deserialize)]
struct JsonPlace {
    #[serde(rename = "검색어", default)]
    search_term: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    review: Option<String>,
}

/// Header positions of the catalog columns in a CSV file.
struct ColumnMap {
    region: usize,
    title: usize,
    category: Option<usize>,
    review: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, CatalogError> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |column: &str| names.iter().position(|n| n == column);

        Ok(Self {
            region: find(REGION_COLUMN)
                .ok_or_else(|| CatalogError::MissingColumn(REGION_COLUMN.to_string()))?,
            title: find(TITLE_COLUMN)
                .ok_or_else(|| CatalogError::MissingColumn(TITLE_COLUMN.to_string()))?,
            category: find(CATEGORY_COLUMN),
            review: find(REVIEW_COLUMN),
        })
    }

    fn place(&self, record: &csv::StringRecord) -> Place {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        Place {
            search_term: cell(Some(self.region)),
            title: cell(Some(self.title)),
            category: cell(self.category),
            review: cell(self.review),
        }
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// A catalog stored in a CSV or JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileSource {
    fn load(&self) -> Result<Catalog, CatalogError> {
        load_path(&self.path)
    }

    fn stamp(&self) -> Result<SourceStamp, CatalogError> {
        let meta = std::fs::metadata(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(SourceStamp {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_fills_missing_text_with_empty() {
        let data = "검색어,title,category,review\n\
                    성수,Onion,카페|베이커리,빵이 맛있어요\n\
                    성수,Daelim,,\n";
        let catalog = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.places()[1].category, "");
        assert_eq!(catalog.places()[1].review, "");
    }

    #[test]
    fn test_csv_headers_normalized() {
        let data = "\u{feff}검색어, Title ,CATEGORY,Review\n홍대,A,한식,good\n";
        let catalog = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.places()[0].title, "A");
        assert_eq!(catalog.places()[0].category, "한식");
    }

    #[test]
    fn test_csv_without_review_column() {
        let data = "검색어,title\n홍대,A\n";
        let catalog = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.places()[0].review, "");
        assert_eq!(catalog.places()[0].category, "");
    }

    #[test]
    fn test_csv_missing_title_column() {
        let data = "검색어,name,review\n홍대,A,good\n";
        let err = from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "title"));
    }

    #[test]
    fn test_csv_short_rows_are_kept() {
        let data = "검색어,title,category,review\n홍대,A\n";
        let catalog = from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.places()[0].review, "");
    }

    #[test]
    fn test_json_nulls_become_empty() {
        let data = r#"[
            {"검색어": "성수", "title": "A", "category": null, "review": "good"},
            {"검색어": "성수", "title": "B"}
        ]"#;
        let catalog = from_json_reader(data.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.places()[0].category, "");
        assert_eq!(catalog.places()[1].review, "");
    }

    #[test]
    fn test_json_row_without_title_rejected() {
        let data = r#"[{"검색어": "성수", "review": "good"}]"#;
        assert!(matches!(
            from_json_reader(data.as_bytes()),
            Err(CatalogError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_json_row_without_region_rejected() {
        let data = r#"[{"title": "A", "review": "good"}]"#;
        let err = from_json_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "검색어"));
    }

    #[test]
    fn test_csv_missing_region_column() {
        let data = "title,review\nA,good\n";
        let err = from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "검색어"));
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("hows-seoul-test-catalog.xlsx");
        std::fs::write(&path, b"not a spreadsheet").unwrap();
        let result = load_path(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(CatalogError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("hows-seoul-test-does-not-exist.csv");
        assert!(matches!(load_path(&path), Err(CatalogError::Io { .. })));
    }
}

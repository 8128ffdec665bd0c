use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

/// Departments selectable when registering an upload.
pub const DEPARTMENTS: [&str; 10] = [
    "Computer Science",
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "Engineering",
    "Literature",
    "History",
    "Psychology",
    "Economics",
];

/// Sentinel accepted by [`Catalog::filter`] to disable a categorical filter.
pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Research,
    Textbook,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Research => "research",
            DocType::Textbook => "textbook",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "research" => Some(DocType::Research),
            "textbook" => Some(DocType::Textbook),
            _ => None,
        }
    }
}

/// A registered library document. Only metadata is kept; the file itself
/// never leaves the student's machine.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub department: String,
    pub upload_date: NaiveDate,
    pub file_name: String,
}

/// The in-memory document listing, newest first.
///
/// Records are only ever prepended, so the vector order doubles as the
/// recency order and [`Catalog::recent`] never has to sort.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<DocumentRecord>,
    last_id: i64,
}

/// Fields of a record in the making. Produced by the upload workflow once
/// every required field is present.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub title: String,
    pub author: String,
    pub doc_type: DocType,
    pub department: String,
    pub file_name: String,
}

impl Catalog {
    /// The catalog every fresh process starts with.
    pub fn seeded() -> Self {
        let seed = |id: &str, title: &str, author: &str, doc_type, department: &str, date, file_name: &str| {
            let (year, month, day) = date;
            DocumentRecord {
                id: id.to_string(),
                title: title.to_string(),
                author: author.to_string(),
                doc_type,
                department: department.to_string(),
                upload_date: NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date"),
                file_name: file_name.to_string(),
            }
        };

        Self {
            records: vec![
                seed(
                    "1",
                    "Introduction to Computer Science",
                    "Dr. Smith",
                    DocType::Textbook,
                    "Computer Science",
                    (2024, 6, 15),
                    "intro-cs.pdf",
                ),
                seed(
                    "2",
                    "Machine Learning Research Paper",
                    "Prof. Johnson",
                    DocType::Research,
                    "Computer Science",
                    (2024, 6, 10),
                    "ml-research.pdf",
                ),
                seed(
                    "3",
                    "Organic Chemistry Fundamentals",
                    "Dr. Brown",
                    DocType::Textbook,
                    "Chemistry",
                    (2024, 6, 8),
                    "organic-chem.pdf",
                ),
            ],
            last_id: 0,
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            records: vec![],
            last_id: 0,
        }
    }

    /// Registers a new record at the front of the catalog and returns it.
    ///
    /// Ids are the creation time in milliseconds, bumped by one whenever two
    /// uploads land on the same tick. Duplicate titles and authors are
    /// permitted.
    pub fn add(&mut self, new: NewRecord) -> &DocumentRecord {
        let mut id = Utc::now().timestamp_millis();
        if id <= self.last_id {
            id = self.last_id + 1;
        }
        self.last_id = id;

        let record = DocumentRecord {
            id: id.to_string(),
            title: new.title,
            author: new.author,
            doc_type: new.doc_type,
            department: new.department,
            upload_date: Utc::now().date_naive(),
            file_name: new.file_name,
        };

        debug!("Registered {} ({})", record.title, record.id);

        self.records.insert(0, record);
        &self.records[0]
    }

    /// The `n` most recently added records, newest first.
    pub fn recent(&self, n: usize) -> &[DocumentRecord] {
        &self.records[..self.records.len().min(n)]
    }

    /// Pure, order-preserving filter over the catalog.
    ///
    /// `query` matches case-insensitively against title or author, with the
    /// empty query matching everything. `department` and `doc_type` must
    /// match exactly unless they are the [`FILTER_ALL`] sentinel.
    pub fn filter(&self, query: &str, department: &str, doc_type: &str) -> Vec<&DocumentRecord> {
        let query = query.to_lowercase();

        self.records
            .iter()
            .filter(|record| {
                let matches_query = query.is_empty()
                    || record.title.to_lowercase().contains(&query)
                    || record.author.to_lowercase().contains(&query);
                let matches_department =
                    department == FILTER_ALL || record.department == department;
                let matches_type = doc_type == FILTER_ALL || record.doc_type.as_str() == doc_type;

                matches_query && matches_department && matches_type
            })
            .collect()
    }

    /// Distinct departments present in the catalog, in catalog order.
    /// Drives the library page's department dropdown.
    pub fn departments_present(&self) -> Vec<&str> {
        let mut departments: Vec<&str> = vec![];
        for record in &self.records {
            if !departments.contains(&record.department.as_str()) {
                departments.push(record.department.as_str());
            }
        }
        departments
    }

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(title: &str, author: &str) -> NewRecord {
        NewRecord {
            title: title.to_string(),
            author: author.to_string(),
            doc_type: DocType::Textbook,
            department: "Computer Science".to_string(),
            file_name: "file.pdf".to_string(),
        }
    }

    #[test]
    fn seed_catalog_is_in_seed_order() {
        let catalog = Catalog::seeded();
        let recent = catalog.recent(3);

        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].title, "Introduction to Computer Science");
        assert_eq!(recent[1].title, "Machine Learning Research Paper");
        assert_eq!(recent[2].title, "Organic Chemistry Fundamentals");
        assert_eq!(recent[0].upload_date.to_string(), "2024-06-15");
    }

    #[test]
    fn add_prepends_a_freshly_stamped_record() {
        let mut catalog = Catalog::seeded();
        let before = catalog.len();

        let record = catalog.add(NewRecord {
            title: "Algorithms 101".to_string(),
            author: "A. Turing".to_string(),
            doc_type: DocType::Textbook,
            department: "Computer Science".to_string(),
            file_name: "algo.pdf".to_string(),
        });

        assert_eq!(record.title, "Algorithms 101");
        assert_eq!(record.upload_date, Utc::now().date_naive());
        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.recent(3)[0].title, "Algorithms 101");
    }

    #[test]
    fn ids_are_unique_even_on_the_same_tick() {
        let mut catalog = Catalog::seeded();

        let first = catalog.add(new_record("One", "A")).id.clone();
        let second = catalog.add(new_record("Two", "B")).id.clone();
        let third = catalog.add(new_record("Three", "C")).id.clone();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn duplicate_titles_are_permitted() {
        let mut catalog = Catalog::seeded();
        catalog.add(new_record("Same", "Same"));
        catalog.add(new_record("Same", "Same"));

        assert_eq!(catalog.filter("same", FILTER_ALL, FILTER_ALL).len(), 2);
    }

    #[test]
    fn unfiltered_filter_is_the_identity() {
        let catalog = Catalog::seeded();
        let all = catalog.filter("", FILTER_ALL, FILTER_ALL);

        assert_eq!(all.len(), catalog.len());
        for (filtered, record) in all.iter().zip(catalog.records()) {
            assert_eq!(filtered.id, record.id);
        }
    }

    #[test]
    fn filter_is_idempotent() {
        let mut catalog = Catalog::seeded();
        catalog.add(new_record("Compilers", "Dr. Smith"));

        let once: Vec<String> = catalog
            .filter("smith", "Computer Science", FILTER_ALL)
            .iter()
            .map(|r| r.id.clone())
            .collect();

        // Filtering the already-filtered set with the same predicates must
        // not drop anything further.
        for id in &once {
            let again = catalog.filter("smith", "Computer Science", FILTER_ALL);
            assert!(again.iter().any(|r| &r.id == id));
        }
        assert_eq!(
            once.len(),
            catalog.filter("smith", "Computer Science", FILTER_ALL).len()
        );
    }

    #[test]
    fn query_matching_is_case_insensitive() {
        let catalog = Catalog::seeded();

        let upper = catalog.filter("SMITH", FILTER_ALL, FILTER_ALL);
        let lower = catalog.filter("smith", FILTER_ALL, FILTER_ALL);

        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].author, "Dr. Smith");
        assert_eq!(upper.len(), lower.len());
        assert_eq!(upper[0].id, lower[0].id);
    }

    #[test]
    fn query_matches_title_or_author() {
        let catalog = Catalog::seeded();

        assert_eq!(catalog.filter("organic", FILTER_ALL, FILTER_ALL).len(), 1);
        assert_eq!(catalog.filter("johnson", FILTER_ALL, FILTER_ALL).len(), 1);
        assert!(catalog.filter("no such thing", FILTER_ALL, FILTER_ALL).is_empty());
    }

    #[test]
    fn categorical_filters_match_exactly() {
        let catalog = Catalog::seeded();

        assert_eq!(catalog.filter("", "Chemistry", FILTER_ALL).len(), 1);
        assert_eq!(catalog.filter("", FILTER_ALL, "research").len(), 1);
        assert_eq!(catalog.filter("", "Computer Science", "textbook").len(), 1);
        assert!(catalog.filter("", "Chem", FILTER_ALL).is_empty());
    }

    #[test]
    fn departments_present_are_distinct_in_catalog_order() {
        let catalog = Catalog::seeded();

        assert_eq!(
            catalog.departments_present(),
            vec!["Computer Science", "Chemistry"]
        );
    }

    #[test]
    fn recent_caps_at_catalog_size() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.recent(10).len(), 3);
        assert_eq!(catalog.recent(1).len(), 1);

        let empty = Catalog::empty();
        assert!(empty.recent(3).is_empty());
        assert!(empty.is_empty());
    }
}

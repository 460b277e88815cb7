//! Record filtering for list views.

use crate::record::{RecordType, VaultRecord};

/// Folder constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderFilter {
    /// Records with no folder.
    Unfiled,
    /// Records in exactly this folder.
    Named(String),
}

/// Conjunction of optional constraints. The default filter matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub favorites_only: bool,
    pub record_type: Option<RecordType>,
    pub folder: Option<FolderFilter>,
    /// Case-insensitive substring searched in name, username, url and notes.
    pub query: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn favorites(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    pub fn of_type(mut self, record_type: RecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }

    pub fn in_folder(mut self, folder: FolderFilter) -> Self {
        self.folder = Some(folder);
        self
    }

    /// Blank queries are ignored.
    pub fn search(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.trim().is_empty()).then(|| query.trim().to_lowercase());
        self
    }

    pub fn matches(&self, record: &VaultRecord) -> bool {
        if self.favorites_only && !record.favorite {
            return false;
        }

        if self.record_type.is_some_and(|t| t != record.record_type) {
            return false;
        }

        match &self.folder {
            Some(FolderFilter::Unfiled) if record.folder.is_some() => return false,
            Some(FolderFilter::Named(name)) if record.folder.as_deref() != Some(name.as_str()) => {
                return false;
            }
            _ => {}
        }

        match &self.query {
            Some(query) => {
                let query = query.to_lowercase();
                [
                    Some(record.name.as_str()),
                    Some(record.username.as_str()),
                    record.url.as_deref(),
                    record.notes.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&query))
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{NewRecord, RecordId};
    use chrono::Utc;

    fn record(fields: NewRecord, favorite: bool) -> VaultRecord {
        let mut r = VaultRecord::from_new(fields, RecordId::generate(), Utc::now()).unwrap();
        r.favorite = favorite;
        r
    }

    #[test]
    fn default_matches_all() {
        assert!(RecordFilter::new().matches(&record(NewRecord::named("x"), false)));
    }

    #[test]
    fn favorites_and_type() {
        let fav_card = record(
            NewRecord {
                record_type: RecordType::Card,
                ..NewRecord::named("Visa")
            },
            true,
        );
        let plain = record(NewRecord::named("Mail"), false);

        let filter = RecordFilter::new().favorites().of_type(RecordType::Card);
        assert!(filter.matches(&fav_card));
        assert!(!filter.matches(&plain));
        assert!(!RecordFilter::new().of_type(RecordType::Note).matches(&fav_card));
    }

    #[test]
    fn folders() {
        let filed = record(
            NewRecord {
                folder: Some("Work".into()),
                ..NewRecord::named("a")
            },
            false,
        );
        let loose = record(NewRecord::named("b"), false);

        let unfiled = RecordFilter::new().in_folder(FolderFilter::Unfiled);
        assert!(unfiled.matches(&loose));
        assert!(!unfiled.matches(&filed));

        let work = RecordFilter::new().in_folder(FolderFilter::Named("Work".into()));
        assert!(work.matches(&filed));
        assert!(!work.matches(&loose));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let r = record(
            NewRecord {
                username: "Bob".into(),
                url: Some("https://ACME.example".into()),
                notes: Some("Recovery codes in safe".into()),
                ..NewRecord::named("Acme")
            },
            false,
        );

        assert!(RecordFilter::new().search("acme.EX").matches(&r));
        assert!(RecordFilter::new().search("bob").matches(&r));
        assert!(RecordFilter::new().search("RECOVERY").matches(&r));
        assert!(!RecordFilter::new().search("zzz").matches(&r));
        assert!(RecordFilter::new().search("   ").matches(&r));
    }
}

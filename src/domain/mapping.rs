use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Routing for one cost-category bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketMapping {
    pub bucket: String,
    pub project: String,
    pub issue_type: String,
    pub anomaly_type: String,
    pub reporter: String,
}

impl fmt::Display for BucketMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} issue type:{} anomaly:{} reporter:{}",
            self.bucket, self.project, self.issue_type, self.anomaly_type, self.reporter
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct BucketMappings {
    entries: HashMap<String, BucketMapping>,
}

impl BucketMappings {
    pub fn load(path: &Path) -> AppResult<Self> {
        let file = File::open(path).map_err(|err| {
            AppError::Mapping(format!("cannot open {}: {err}", path.display()))
        })?;
        Self::from_reader(file)
    }

    /// Reads headerless rows of `bucket,project,issue type,anomaly type,reporter`.
    /// A bucket listed twice keeps its last row.
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for record in csv_reader.records() {
            let record = record.map_err(|err| AppError::Mapping(err.to_string()))?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            if record.len() < 5 {
                return Err(AppError::Mapping(format!(
                    "line {line}: expected 5 columns, found {}",
                    record.len()
                )));
            }
            let bucket = record[0].to_string();
            if bucket.is_empty() {
                return Err(AppError::Mapping(format!("line {line}: empty bucket name")));
            }
            entries.insert(
                bucket.clone(),
                BucketMapping {
                    bucket,
                    project: record[1].to_string(),
                    issue_type: record[2].to_string(),
                    anomaly_type: record[3].to_string(),
                    reporter: record[4].to_string(),
                },
            );
        }

        Ok(Self { entries })
    }

    pub fn get(&self, bucket: &str) -> Option<&BucketMapping> {
        self.entries.get(bucket)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mappings ordered by bucket name.
    pub fn sorted(&self) -> Vec<&BucketMapping> {
        let mut all = self.entries.values().collect::<Vec<_>>();
        all.sort_by(|a, b| a.bucket.cmp(&b.bucket));
        all
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_rows() {
        let data = "Prod,INFRA,Task,Cost,finops\nDev, SANDBOX ,Story,Cost,platform\n";
        let mappings = BucketMappings::from_reader(data.as_bytes()).unwrap();
        assert_eq!(mappings.len(), 2);
        let dev = mappings.get("Dev").unwrap();
        assert_eq!(dev.project, "SANDBOX");
        assert_eq!(dev.issue_type, "Story");
        assert_eq!(dev.reporter, "platform");
    }

    #[test]
    fn later_rows_replace_earlier_buckets() {
        let data = "Prod,INFRA,Task,Cost,a\nProd,OPS,Bug,Cost,b\n";
        let mappings = BucketMappings::from_reader(data.as_bytes()).unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings.get("Prod").unwrap().project, "OPS");
    }

    #[test]
    fn rejects_short_rows() {
        let data = "Prod,INFRA,Task,Cost,a\nDev,SANDBOX\n";
        let err = BucketMappings::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Mapping(msg) if msg.contains("line 2")));
    }

    #[test]
    fn handles_quoted_fields() {
        let data = "\"Prod, EU\",INFRA,Task,Cost,finops\n";
        let mappings = BucketMappings::from_reader(data.as_bytes()).unwrap();
        assert!(mappings.get("Prod, EU").is_some());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Prod,INFRA,Task,Cost,finops").unwrap();
        let mappings = BucketMappings::load(file.path()).unwrap();
        assert_eq!(mappings.sorted()[0].bucket, "Prod");
    }

    #[test]
    fn missing_file_is_a_mapping_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BucketMappings::load(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, AppError::Mapping(_)));
    }
}

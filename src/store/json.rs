use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::RwLock,
};
use tracing::{debug, info};

use super::{next_class_id, ClassRecord, ClassStore, NewClass};

const FILE_NAME: &str = "classes.json";

/// Classes persisted as one pretty-printed JSON array in `<dir>/classes.json`.
///
/// The file is read once at construction and rewritten (tmp file + rename)
/// on every mutation, under the write lock.
pub struct JsonFileStore {
    records: RwLock<Vec<ClassRecord>>,
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open the store in `dir`, creating the directory if needed.
    /// A missing `classes.json` is an empty store.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating store directory {}", dir.display()))?;

        let path = dir.join(FILE_NAME);
        let records: Vec<ClassRecord> = if path.exists() {
            let f = fs::File::open(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(f).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Vec::new()
        };
        info!(dir = %dir.display(), classes = records.len(), "opened class store");

        Ok(Self {
            records: RwLock::new(records),
            dir,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(FILE_NAME)
    }

    fn persist(&self, records: &[ClassRecord]) -> Result<()> {
        let path = self.path();
        let tmp_path = self.dir.join(format!(".{}.tmp", FILE_NAME));

        let mut tmp = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        serde_json::to_writer_pretty(&mut tmp, records).context("serializing classes")?;
        tmp.write_all(b"\n")?;
        tmp.sync_all()
            .with_context(|| format!("flushing {}", tmp_path.display()))?;
        drop(tmp);

        fs::rename(&tmp_path, &path).with_context(|| {
            format!("renaming {} -> {}", tmp_path.display(), path.display())
        })?;
        debug!(path = %path.display(), classes = records.len(), "persisted class store");
        Ok(())
    }
}

impl ClassStore for JsonFileStore {
    fn get(&self, id: &str) -> Result<Option<ClassRecord>> {
        let records = self.records.read().map_err(|_| anyhow!("class store lock poisoned"))?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<ClassRecord>> {
        let records = self.records.read().map_err(|_| anyhow!("class store lock poisoned"))?;
        Ok(records.clone())
    }

    fn update(&self, record: ClassRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("class store lock poisoned"))?;
        let Some(idx) = records.iter().position(|r| r.id == record.id) else {
            bail!("class {} not found", record.id);
        };

        let mut next = records.clone();
        next[idx] = record;
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn append(&self, class: NewClass) -> Result<ClassRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("class store lock poisoned"))?;
        let record = class.into_record(next_class_id(&records), Utc::now());

        let mut next = records.clone();
        next.push(record.clone());
        self.persist(&next)?;
        *records = next;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Student;
    use tempfile::TempDir;

    fn new_class(name: &str) -> NewClass {
        NewClass {
            name: name.into(),
            grade: Some("5th".into()),
            students: vec![Student {
                id: "STU001".into(),
                name: "John Doe".into(),
                email: Some("john@example.com".into()),
            }],
        }
    }

    #[test]
    fn test_records_survive_reopen() -> Result<()> {
        let tmp = TempDir::new()?;
        let store = JsonFileStore::open(tmp.path())?;
        assert!(store.list()?.is_empty());

        let rec = store.append(new_class("Math 101"))?;
        assert_eq!(rec.id, "cls-1");
        assert!(store.path().exists());

        let reopened = JsonFileStore::open(tmp.path())?;
        assert_eq!(reopened.list()?, vec![rec.clone()]);

        let second = reopened.append(new_class("Science 200"))?;
        assert_eq!(second.id, "cls-2");
        Ok(())
    }

    #[test]
    fn test_update_persists() -> Result<()> {
        let tmp = TempDir::new()?;
        let store = JsonFileStore::open(tmp.path())?;
        let mut rec = store.append(new_class("Math 101"))?;
        rec.students.clear();
        store.update(rec.clone())?;

        let reopened = JsonFileStore::open(tmp.path())?;
        assert_eq!(reopened.get(&rec.id)?.map(|r| r.students.len()), Some(0));

        rec.id = "cls-77".into();
        assert!(store.update(rec).is_err());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_an_error() -> Result<()> {
        let tmp = TempDir::new()?;
        fs::write(tmp.path().join(FILE_NAME), "not json")?;
        let err = JsonFileStore::open(tmp.path()).err().expect("open should fail");
        assert!(format!("{:#}", err).contains("parsing"));
        Ok(())
    }
}

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use std::sync::RwLock;

use super::{next_class_id, ClassRecord, ClassStore, NewClass};

/// In-process store; one instance per test or per CLI dry run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ClassRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ClassRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl ClassStore for MemoryStore {
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
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => bail!("class {} not found", record.id),
        }
    }

    fn append(&self, class: NewClass) -> Result<ClassRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("class store lock poisoned"))?;
        let record = class.into_record(next_class_id(&records), Utc::now());
        records.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Student;

    fn new_class(name: &str) -> NewClass {
        NewClass {
            name: name.into(),
            grade: None,
            students: vec![Student {
                id: "S1".into(),
                name: "Ann".into(),
                email: None,
            }],
        }
    }

    #[test]
    fn test_append_get_list() -> Result<()> {
        let store = MemoryStore::new();
        let a = store.append(new_class("Math"))?;
        let b = store.append(new_class("Art"))?;
        assert_eq!(a.id, "cls-1");
        assert_eq!(b.id, "cls-2");
        assert_eq!(store.get("cls-2")?.map(|r| r.name), Some("Art".into()));
        assert_eq!(store.get("cls-9")?, None);
        assert_eq!(store.list()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_update() -> Result<()> {
        let store = MemoryStore::new();
        let mut rec = store.append(new_class("Math"))?;
        rec.grade = Some("6th".into());
        store.update(rec.clone())?;
        assert_eq!(store.get(&rec.id)?, Some(rec.clone()));

        rec.id = "cls-404".into();
        let err = store.update(rec).unwrap_err();
        assert!(err.to_string().contains("cls-404 not found"));
        Ok(())
    }
}

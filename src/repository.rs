//! Data-access seam for records and subjects.
//!
//! The analytics code only ever sees the in-memory collections a
//! [`RecordRepository`] returns. Production deployments back the trait with
//! the remote spreadsheet service; [`InMemorySheets`] keeps the same row
//! layout in memory for embedding and tests.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::model::{Category, Record, Subject};
use crate::sheet::{decode_row, decode_subject, encode_into, encode_row};

/// Source of records and subjects.
///
/// Implementations surface transport or quota failures as
/// [`Error::Repository`] and never reinterpret them.
#[allow(async_fn_in_trait)]
pub trait RecordRepository {
    /// All employees, in sheet order.
    async fn list_subjects(&self) -> Result<Vec<Subject>>;

    /// Records of `category`, optionally only those owned by `subject`
    /// (trimmed, case-insensitive). For tickets the owner is the assignee.
    async fn fetch_records(&self, category: Category, subject: Option<&str>) -> Result<Vec<Record>>;

    /// Append a new record.
    async fn append_record(&self, record: &Record) -> Result<()>;

    /// Overwrite the record with the same id. Fails with
    /// [`Error::NotFound`] when no such record exists.
    async fn update_record(&self, record: &Record) -> Result<()>;
}

/// Spreadsheet-shaped store held in memory.
#[derive(Debug, Default)]
pub struct InMemorySheets {
    tables: RwLock<HashMap<Category, Vec<Vec<String>>>>,
    employees: RwLock<Vec<Vec<String>>>,
}

impl InMemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category's sheet with raw data rows.
    pub fn with_rows(mut self, category: Category, rows: Vec<Vec<String>>) -> Self {
        self.tables.get_mut().entry(category).or_default().extend(rows);
        self
    }

    /// Seed the employee sheet with raw data rows.
    pub fn with_employees(mut self, rows: Vec<Vec<String>>) -> Self {
        self.employees.get_mut().extend(rows);
        self
    }

    /// Snapshot of a category's raw rows.
    pub async fn rows(&self, category: Category) -> Vec<Vec<String>> {
        self.tables
            .read()
            .await
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }
}

impl RecordRepository for InMemorySheets {
    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let employees = self.employees.read().await;
        Ok(employees.iter().filter_map(|row| decode_subject(row)).collect())
    }

    async fn fetch_records(&self, category: Category, subject: Option<&str>) -> Result<Vec<Record>> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(&category) else {
            return Ok(Vec::new());
        };

        Ok(rows
            .iter()
            .map(|row| decode_row(category, row))
            .filter(|record| subject.is_none_or(|name| record.is_owned_by(name)))
            .collect())
    }

    async fn append_record(&self, record: &Record) -> Result<()> {
        let row = encode_row(record);
        self.tables
            .write()
            .await
            .entry(record.category)
            .or_default()
            .push(row);

        info!(category = %record.category, id = %record.id, "Record appended");
        Ok(())
    }

    async fn update_record(&self, record: &Record) -> Result<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&record.category)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| decode_row(record.category, row.as_slice()).id == record.id)
            })
            .ok_or_else(|| Error::NotFound {
                category: record.category,
                id: record.id.clone(),
            })?;

        encode_into(record, row);

        info!(category = %record.category, id = %record.id, "Record updated");
        Ok(())
    }
}

async fn find_record<R: RecordRepository>(repo: &R, category: Category, id: &str) -> Result<Record> {
    repo.fetch_records(category, None)
        .await?
        .into_iter()
        .find(|record| record.id == id)
        .ok_or_else(|| Error::NotFound {
            category,
            id: id.to_string(),
        })
}

/// Change a record's status, stamping or clearing its completion date.
///
/// See [`Record::set_status`] for which statuses count as done.
#[instrument(skip(repo, now))]
pub async fn update_status<R: RecordRepository>(
    repo: &R,
    category: Category,
    id: &str,
    status: &str,
    now: DateTime<Utc>,
) -> Result<Record> {
    let mut record = find_record(repo, category, id).await?;
    record.set_status(status, now);
    repo.update_record(&record).await?;
    Ok(record)
}

/// Record a revised deadline; the original deadline stays in place.
#[instrument(skip(repo))]
pub async fn shift_deadline<R: RecordRepository>(
    repo: &R,
    category: Category,
    id: &str,
    deadline: NaiveDate,
) -> Result<Record> {
    let mut record = find_record(repo, category, id).await?;
    record.shift_deadline(deadline);
    repo.update_record(&record).await?;
    Ok(record)
}

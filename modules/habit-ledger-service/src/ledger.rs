//! Create / list / delete operations over the record store, plus the
//! read-side aggregation entry points.

use crate::aggregate;
use crate::error::{LedgerError, LedgerResult};
use crate::store::Db;
use chrono::NaiveDate;
use habit_ledger_types::{Habit, Suggestion, TrendPoint};
use std::sync::Arc;
use uuid::Uuid;

pub struct Ledger {
    db: Arc<Db>,
}

impl Ledger {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    /// Validate, assign a fresh id and timestamp, and store one record.
    /// Creation never deduplicates: the same name on the same date makes
    /// a second, distinct record.
    pub fn create(
        &self,
        owner: &str,
        date: &str,
        name: &str,
        note: Option<String>,
        completed: bool,
    ) -> LedgerResult<String> {
        validate_date(date)?;
        if name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "habit name must not be empty".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let habit = Habit {
            id: id.clone(),
            owner: owner.to_string(),
            date: date.to_string(),
            name: name.to_string(),
            note,
            completed,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.db.put(&habit)?;
        Ok(id)
    }

    pub fn list(&self, owner: &str, date: &str) -> LedgerResult<Vec<Habit>> {
        self.db.get_by_owner_date(owner, date)
    }

    /// Delete by id. The id is not part of the storage key, so the owning
    /// date is resolved first via the owner-scoped scan.
    ///
    /// The two steps are not atomic: a concurrent delete of the same id
    /// between resolve and delete makes the second step fail `NotFound`,
    /// and that outcome is surfaced to the caller, never swallowed.
    pub fn delete(&self, owner: &str, id: &str) -> LedgerResult<()> {
        let date = self
            .db
            .find_date_by_id(owner, id)?
            .ok_or(LedgerError::NotFound)?;
        self.db.delete(owner, &date, id)
    }

    /// Completed-record counts per day, most recent first, at most 30
    /// entries. A store failure during the scan aborts the whole
    /// computation.
    pub fn trends(&self, owner: &str) -> LedgerResult<Vec<TrendPoint>> {
        let records = self.db.get_by_owner(owner)?;
        Ok(aggregate::trend_series(&records))
    }

    /// Deduplicated name/note catalog over all of the owner's records,
    /// completed or not.
    pub fn suggestions(&self, owner: &str) -> LedgerResult<Vec<Suggestion>> {
        let records = self.db.get_by_owner(owner)?;
        Ok(aggregate::suggestion_catalog(&records))
    }

    pub fn record_count(&self) -> LedgerResult<i64> {
        self.db.count_records()
    }
}

/// Accept only canonical zero-padded ISO dates; anything else would break
/// the lexicographic date ordering the trend view relies on.
fn validate_date(date: &str) -> LedgerResult<()> {
    let canonical = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string());
    match canonical {
        Ok(c) if c == date => Ok(()),
        _ => Err(LedgerError::Validation(format!("malformed date: {date:?}"))),
    }
}

//! SQLite record store for habit completion records.
//!
//! Records are grouped under the `(owner, date)` key. The habit id is an
//! ordinary column with no index of its own, so any lookup by id goes
//! through an owner-scoped scan-and-match.

use crate::error::{LedgerError, LedgerResult};
use habit_ledger_types::Habit;
use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use std::sync::Mutex;

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &str) -> SqliteResult<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS habits (
                owner TEXT NOT NULL,
                date TEXT NOT NULL,
                habit_id TEXT NOT NULL,
                name TEXT NOT NULL,
                note TEXT,
                completed INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        // (owner, date) is the only direct access path.
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_habits_owner_date
             ON habits(owner, date)",
            [],
        )?;
        Ok(())
    }

    /// Insert a freshly created record. Ids are new UUIDs and there is no
    /// upsert path, so an existing record is never overwritten.
    pub fn put(&self, habit: &Habit) -> LedgerResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO habits (owner, date, habit_id, name, note, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                habit.owner,
                habit.date,
                habit.id,
                habit.name,
                habit.note,
                habit.completed,
                habit.created_at
            ],
        )?;
        Ok(())
    }

    /// All records under one `(owner, date)` key, oldest first.
    pub fn get_by_owner_date(&self, owner: &str, date: &str) -> LedgerResult<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT owner, date, habit_id, name, note, completed, created_at
             FROM habits
             WHERE owner = ?1 AND date = ?2
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let habits = stmt
            .query_map(rusqlite::params![owner, date], |row| row_to_habit(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    /// Full scan of one owner's records across all dates, in creation
    /// order. Used only by the read-side aggregations.
    pub fn get_by_owner(&self, owner: &str) -> LedgerResult<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT owner, date, habit_id, name, note, completed, created_at
             FROM habits
             WHERE owner = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let habits = stmt
            .query_map(rusqlite::params![owner], |row| row_to_habit(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    /// Resolve which date a habit id lives under. This is the
    /// scan-and-match step behind delete-by-id; it cannot use an index.
    pub fn find_date_by_id(&self, owner: &str, id: &str) -> LedgerResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let date = conn
            .query_row(
                "SELECT date FROM habits WHERE owner = ?1 AND habit_id = ?2",
                rusqlite::params![owner, id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(date)
    }

    /// Remove exactly one record matching the full `(owner, date, id)`
    /// triple. Zero rows affected means the record is absent.
    pub fn delete(&self, owner: &str, date: &str, id: &str) -> LedgerResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM habits WHERE owner = ?1 AND date = ?2 AND habit_id = ?3",
            rusqlite::params![owner, date, id],
        )?;
        if changed == 0 {
            return Err(LedgerError::NotFound);
        }
        Ok(())
    }

    pub fn count_records(&self) -> LedgerResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_habit(row: &rusqlite::Row) -> rusqlite::Result<Habit> {
    Ok(Habit {
        owner: row.get(0)?,
        date: row.get(1)?,
        id: row.get(2)?,
        name: row.get(3)?,
        note: row.get(4)?,
        completed: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit(id: &str, date: &str, name: &str, created_at: &str) -> Habit {
        Habit {
            id: id.to_string(),
            owner: "admin".to_string(),
            date: date.to_string(),
            name: name.to_string(),
            note: None,
            completed: true,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn put_then_get_by_owner_date() {
        let db = Db::open(":memory:").unwrap();
        db.put(&habit("a", "2024-01-05", "Run", "2024-01-05T08:00:00+00:00"))
            .unwrap();

        let got = db.get_by_owner_date("admin", "2024-01-05").unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "a");
        assert_eq!(got[0].name, "Run");

        assert!(db.get_by_owner_date("admin", "2024-01-06").unwrap().is_empty());
        assert!(db.get_by_owner_date("other", "2024-01-05").unwrap().is_empty());
    }

    #[test]
    fn owner_scan_returns_creation_order() {
        let db = Db::open(":memory:").unwrap();
        db.put(&habit("b", "2024-01-06", "Read", "2024-01-06T09:00:00+00:00"))
            .unwrap();
        db.put(&habit("a", "2024-01-05", "Run", "2024-01-05T08:00:00+00:00"))
            .unwrap();
        db.put(&habit("c", "2024-01-05", "Swim", "2024-01-07T10:00:00+00:00"))
            .unwrap();

        let ids: Vec<String> = db
            .get_by_owner("admin")
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn find_date_by_id_scans_owner_partition() {
        let db = Db::open(":memory:").unwrap();
        db.put(&habit("a", "2024-01-05", "Run", "2024-01-05T08:00:00+00:00"))
            .unwrap();

        assert_eq!(
            db.find_date_by_id("admin", "a").unwrap(),
            Some("2024-01-05".to_string())
        );
        assert_eq!(db.find_date_by_id("admin", "missing").unwrap(), None);
        // Other owners never see the record.
        assert_eq!(db.find_date_by_id("other", "a").unwrap(), None);
    }

    #[test]
    fn delete_requires_exact_key_match() {
        let db = Db::open(":memory:").unwrap();
        db.put(&habit("a", "2024-01-05", "Run", "2024-01-05T08:00:00+00:00"))
            .unwrap();

        assert!(matches!(
            db.delete("admin", "2024-01-06", "a"),
            Err(LedgerError::NotFound)
        ));
        assert!(matches!(
            db.delete("other", "2024-01-05", "a"),
            Err(LedgerError::NotFound)
        ));

        db.delete("admin", "2024-01-05", "a").unwrap();
        assert!(db.get_by_owner_date("admin", "2024-01-05").unwrap().is_empty());
        assert!(matches!(
            db.delete("admin", "2024-01-05", "a"),
            Err(LedgerError::NotFound)
        ));
    }

    #[test]
    fn duplicate_names_on_one_date_are_distinct_records() {
        let db = Db::open(":memory:").unwrap();
        db.put(&habit("a", "2024-01-05", "Run", "2024-01-05T08:00:00+00:00"))
            .unwrap();
        db.put(&habit("b", "2024-01-05", "Run", "2024-01-05T09:00:00+00:00"))
            .unwrap();

        let got = db.get_by_owner_date("admin", "2024-01-05").unwrap();
        assert_eq!(got.len(), 2);
        db.delete("admin", "2024-01-05", "a").unwrap();
        let left = db.get_by_owner_date("admin", "2024-01-05").unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, "b");
    }
}

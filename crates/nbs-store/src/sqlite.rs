// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use nbs_core::{SolutionId, TargetId};
use nbs_model::{AdaptationTarget, Association, Envelope, Footprint, NewSolution, Score, Solution};
use nbs_query::{CatalogStore, QueryError};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use tracing::{debug, info};

use crate::{
    parse_database_url, DatabaseLocation, StoreError, StoreErrorCode, SCHEMA_SQL,
    SQLITE_SCHEMA_VERSION,
};

const SOLUTION_COLUMNS: &str =
    "id, name, definition, cobenefits, specificdetails, location, geometry";

/// SQLite-backed catalog store. One connection guarded by a mutex; every
/// write runs in its own transaction.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

struct SolutionRow {
    id: i64,
    name: String,
    definition: String,
    cobenefits: String,
    specific_details: String,
    location: String,
    geometry: Option<String>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "sqlite store opened");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn open_url(url: &str) -> Result<Self, StoreError> {
        match parse_database_url(url)? {
            DatabaseLocation::Memory => Self::open_in_memory(),
            DatabaseLocation::Path(path) => Self::open(&path),
        }
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        conn.execute_batch(&format!("PRAGMA user_version={SQLITE_SCHEMA_VERSION};"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "sqlite connection lock poisoned"))
    }

    fn load_solutions(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Solution>, StoreError> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(args, read_solution_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|row| hydrate(conn, row))
            .collect()
    }

    fn load_one(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Option<Solution>, StoreError> {
        let row = conn.query_row(sql, args, read_solution_row).optional()?;
        row.map(|row| hydrate(conn, row)).transpose()
    }

    fn insert_in_tx(tx: &Transaction<'_>, new: &NewSolution) -> Result<i64, StoreError> {
        for assoc in &new.adaptations {
            let exists: Option<i64> = tx
                .query_row(
                    "SELECT id FROM adaptationtarget WHERE id = ?1",
                    params![assoc.target.get()],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Err(StoreError::new(
                    StoreErrorCode::NotFound,
                    format!("adaptation target {} not found", assoc.target),
                ));
            }
        }
        tx.execute(
            "INSERT INTO naturebasedsolution (name, definition, cobenefits, specificdetails, location, geometry)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.name,
                new.definition,
                new.cobenefits,
                new.specific_details,
                new.location,
                new.geometry.as_ref().map(Footprint::to_json_string),
            ],
        )?;
        let id = tx.last_insert_rowid();
        if let Some(footprint) = &new.geometry {
            let env = footprint.envelope();
            tx.execute(
                "INSERT INTO naturebasedsolution_rtree (nbs_rowid, min_lon, max_lon, min_lat, max_lat)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, env.min_lon, env.max_lon, env.min_lat, env.max_lat],
            )?;
        }
        let mut stmt =
            tx.prepare("INSERT INTO nbs_target_assoc (nbs_id, target_id, value) VALUES (?1, ?2, ?3)")?;
        for assoc in &new.adaptations {
            stmt.execute(params![id, assoc.target.get(), i64::from(assoc.value)])?;
        }
        Ok(id)
    }
}

fn read_solution_row(row: &Row<'_>) -> rusqlite::Result<SolutionRow> {
    Ok(SolutionRow {
        id: row.get(0)?,
        name: row.get(1)?,
        definition: row.get(2)?,
        cobenefits: row.get(3)?,
        specific_details: row.get(4)?,
        location: row.get(5)?,
        geometry: row.get(6)?,
    })
}

fn corrupt(message: String) -> StoreError {
    StoreError::new(StoreErrorCode::Internal, message)
}

fn hydrate(conn: &Connection, row: SolutionRow) -> Result<Solution, StoreError> {
    let id = SolutionId::new(row.id).map_err(|e| corrupt(e.to_string()))?;
    let geometry = row
        .geometry
        .as_deref()
        .map(Footprint::parse_geojson_str)
        .transpose()
        .map_err(|e| corrupt(format!("stored geometry of solution {id}: {e}")))?;
    let mut stmt = conn.prepare_cached(
        "SELECT target_id, value FROM nbs_target_assoc WHERE nbs_id = ?1 ORDER BY target_id",
    )?;
    let pairs = stmt
        .query_map(params![row.id], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    let adaptations = pairs
        .into_iter()
        .map(|(target, value)| {
            Ok(Association {
                target: TargetId::new(target).map_err(|e| corrupt(e.to_string()))?,
                value: Score::new(value).map_err(|e| corrupt(e.to_string()))?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    Ok(Solution {
        id,
        name: row.name,
        definition: row.definition,
        cobenefits: row.cobenefits,
        specific_details: row.specific_details,
        location: row.location,
        geometry,
        adaptations,
    })
}

fn read_target(row: &Row<'_>) -> rusqlite::Result<(i64, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn to_target((id, name): (i64, String)) -> Result<AdaptationTarget, StoreError> {
    let id = TargetId::new(id).map_err(|e| corrupt(e.to_string()))?;
    AdaptationTarget::new(id, name).map_err(|e| corrupt(e.to_string()))
}

fn load_targets(conn: &Connection) -> Result<Vec<AdaptationTarget>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, type FROM adaptationtarget ORDER BY id")?;
    let rows = stmt
        .query_map([], read_target)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(to_target).collect()
}

impl CatalogStore for SqliteStore {
    fn solution_by_id(&self, id: SolutionId) -> Result<Option<Solution>, QueryError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {SOLUTION_COLUMNS} FROM naturebasedsolution WHERE id = ?1");
        Ok(Self::load_one(&conn, &sql, &[&id.get()])?)
    }

    fn solution_by_name(&self, name: &str) -> Result<Option<Solution>, QueryError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {SOLUTION_COLUMNS} FROM naturebasedsolution WHERE name = ?1");
        Ok(Self::load_one(&conn, &sql, &[&name])?)
    }

    fn candidate_solutions(&self, envelope: Option<&Envelope>) -> Result<Vec<Solution>, QueryError> {
        let conn = self.lock()?;
        let rows = match envelope {
            None => {
                let sql = format!("SELECT {SOLUTION_COLUMNS} FROM naturebasedsolution ORDER BY id");
                Self::load_solutions(&conn, &sql, &[])?
            }
            Some(env) => {
                let sql = format!(
                    "SELECT {SOLUTION_COLUMNS} FROM naturebasedsolution
                     WHERE id IN (
                       SELECT nbs_rowid FROM naturebasedsolution_rtree
                       WHERE max_lon >= ?1 AND min_lon <= ?2 AND max_lat >= ?3 AND min_lat <= ?4
                     )
                     ORDER BY id"
                );
                Self::load_solutions(
                    &conn,
                    &sql,
                    &[&env.min_lon, &env.max_lon, &env.min_lat, &env.max_lat],
                )?
            }
        };
        debug!(candidates = rows.len(), pruned = envelope.is_some(), "sqlite candidates loaded");
        Ok(rows)
    }

    fn target_by_id(&self, id: TargetId) -> Result<Option<AdaptationTarget>, QueryError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, type FROM adaptationtarget WHERE id = ?1",
                params![id.get()],
                read_target,
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(row.map(to_target).transpose()?)
    }

    fn all_targets(&self) -> Result<Vec<AdaptationTarget>, QueryError> {
        let conn = self.lock()?;
        Ok(load_targets(&conn)?)
    }

    /// Names are compared after case and whitespace normalisation.
    fn upsert_target(&self, name: &str) -> Result<AdaptationTarget, QueryError> {
        let mut conn = self.lock()?;
        if let Some(found) = load_targets(&conn)?
            .into_iter()
            .find(|target| target.matches_name(name))
        {
            return Ok(found);
        }
        let tx = conn.transaction().map_err(StoreError::from)?;
        tx.execute("INSERT INTO adaptationtarget (type) VALUES (?1)", params![name])
            .map_err(StoreError::from)?;
        let id = TargetId::new(tx.last_insert_rowid())
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let target = AdaptationTarget::new(id, name)?;
        tx.commit().map_err(StoreError::from)?;
        debug!(target_id = id.get(), "sqlite target inserted");
        Ok(target)
    }

    fn insert_solution(&self, new: NewSolution) -> Result<Solution, QueryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        let id = Self::insert_in_tx(&tx, &new)?;
        tx.commit().map_err(StoreError::from)?;
        debug!(solution_id = id, "sqlite solution committed");
        let sql = format!("SELECT {SOLUTION_COLUMNS} FROM naturebasedsolution WHERE id = ?1");
        Self::load_one(&conn, &sql, &[&id])?
            .ok_or_else(|| QueryError::internal(format!("solution {id} vanished after commit")))
    }

    fn ping(&self) -> Result<(), QueryError> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(StoreError::from)?;
        Ok(())
    }
}

// SPDX-License-Identifier: Apache-2.0

pub const SQLITE_SCHEMA_VERSION: i64 = 1;

/// Idempotent DDL. Geometry is stored as GeoJSON text in WGS84; the R*Tree
/// holds each footprint's envelope for candidate pruning.
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS adaptationtarget (
  id INTEGER PRIMARY KEY,
  type TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS naturebasedsolution (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL UNIQUE,
  definition TEXT NOT NULL,
  cobenefits TEXT NOT NULL,
  specificdetails TEXT NOT NULL,
  location TEXT NOT NULL,
  geometry TEXT
);
CREATE TABLE IF NOT EXISTS nbs_target_assoc (
  nbs_id INTEGER NOT NULL REFERENCES naturebasedsolution(id) ON DELETE CASCADE,
  target_id INTEGER NOT NULL REFERENCES adaptationtarget(id),
  value INTEGER NOT NULL CHECK (value BETWEEN 0 AND 100),
  PRIMARY KEY (nbs_id, target_id)
) WITHOUT ROWID;
CREATE INDEX IF NOT EXISTS idx_nbs_target_assoc_target ON nbs_target_assoc(target_id, value);
CREATE VIRTUAL TABLE IF NOT EXISTS naturebasedsolution_rtree USING rtree(
  nbs_rowid,
  min_lon, max_lon,
  min_lat, max_lat
);
";

//! PostgreSQL/PostGIS spatial store
//!
//! Read-only access to the three underlying tables: `sublocations` (area
//! geometry), `sublocation_statistics` (precomputed accessibility), and
//! `waterpoints` (source locations). This service never writes.
//!
//! Classification thresholds are applied in Rust (`crate::classify`), not in
//! SQL, so the policy lives in exactly one place.

use serde::Serialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;

use crate::{AreaStats, HydroError, Result, SubcountySummary};

/// Spatial database store
pub struct SpatialStore {
    pool: PgPool,
}

impl SpatialStore {
    /// Connect a new store
    pub async fn connect(database_url: &str, pool_size: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .connect(database_url)
            .await
            .map_err(|e| HydroError::Database(format!("PostgreSQL connection failed: {e}")))?;

        Ok(Self { pool })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetch per-area statistics, sorted by ascending accessibility
    pub async fn fetch_area_statistics(&self) -> Result<Vec<AreaStats>> {
        let rows: Vec<AreaStatsRow> = sqlx::query_as(
            r#"
            SELECT
                sublocation_name,
                avg_combined_accessibility::float8 AS accessibility,
                COALESCE(total_population, 0)::int8 AS population,
                COALESCE(water_points_count, 0)::int8 AS water_points,
                COALESCE(high_capacity_water_points, 0)::int8 AS high_capacity,
                COALESCE(medium_capacity_water_points, 0)::int8 AS medium_capacity,
                COALESCE(low_capacity_water_points, 0)::int8 AS low_capacity
            FROM sublocation_statistics
            ORDER BY avg_combined_accessibility ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HydroError::Database(format!("Area statistics query failed: {e}")))?;

        Ok(rows.into_iter().map(AreaStats::from).collect())
    }

    /// Fetch subcounty-wide aggregates
    pub async fn fetch_summary(&self) -> Result<SubcountySummary> {
        let row: SummaryRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_areas,
                AVG(avg_combined_accessibility)::float8 AS avg_accessibility,
                MIN(avg_combined_accessibility)::float8 AS min_accessibility,
                MAX(avg_combined_accessibility)::float8 AS max_accessibility,
                SUM(total_population)::int8 AS total_population,
                SUM(water_points_count)::int8 AS total_water_points
            FROM sublocation_statistics
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| HydroError::Database(format!("Summary query failed: {e}")))?;

        Ok(SubcountySummary {
            total_areas: row.total_areas,
            avg_accessibility: row.avg_accessibility,
            min_accessibility: row.min_accessibility,
            max_accessibility: row.max_accessibility,
            total_population: row.total_population,
            total_water_points: row.total_water_points,
        })
    }

    /// Fetch every named sublocation with unified geometry for the map view
    pub async fn fetch_map_areas(&self) -> Result<Vec<MapAreaRow>> {
        sqlx::query_as(
            r#"
            SELECT
                s.slname AS name,
                AVG(ss.avg_combined_accessibility)::float8 AS accessibility,
                AVG(ss.total_population)::float8 AS population,
                ST_AsGeoJSON(ST_Transform(ST_Union(s.geom), 4326)) AS geometry
            FROM sublocations s
            LEFT JOIN sublocation_statistics ss ON s.slname = ss.sublocation_name
            WHERE s.geom IS NOT NULL AND s.slname IS NOT NULL
            GROUP BY s.slname
            ORDER BY s.slname
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HydroError::Database(format!("Map data query failed: {e}")))
    }

    /// Fetch all water points with location geometry
    pub async fn fetch_water_points(&self) -> Result<Vec<WaterPointRow>> {
        sqlx::query_as(
            r#"
            SELECT
                source AS name,
                water_sour AS water_source,
                capacitysc::float8 AS capacity_score,
                status,
                ST_AsGeoJSON(ST_Transform(geom, 4326)) AS geometry
            FROM waterpoints
            WHERE geom IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HydroError::Database(format!("Water points query failed: {e}")))
    }

    /// Row counts and name lists for the three tables, for diagnostics
    pub async fn fetch_table_diagnostics(&self) -> Result<TableDiagnostics> {
        let sublocation_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sublocations WHERE geom IS NOT NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| HydroError::Database(format!("Debug query failed: {e}")))?;

        let sublocation_names: Vec<String> = sqlx::query_scalar(
            "SELECT locname FROM sublocations \
             WHERE geom IS NOT NULL AND locname IS NOT NULL ORDER BY locname",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HydroError::Database(format!("Debug query failed: {e}")))?;

        let stats_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sublocation_statistics")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| HydroError::Database(format!("Debug query failed: {e}")))?;

        let stats_names: Vec<String> = sqlx::query_scalar(
            "SELECT sublocation_name FROM sublocation_statistics ORDER BY sublocation_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HydroError::Database(format!("Debug query failed: {e}")))?;

        let waterpoint_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM waterpoints WHERE geom IS NOT NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| HydroError::Database(format!("Debug query failed: {e}")))?;

        Ok(TableDiagnostics {
            sublocations: NamedTableInfo {
                count: sublocation_count,
                names: sublocation_names,
            },
            statistics: NamedTableInfo {
                count: stats_count,
                names: stats_names,
            },
            waterpoints: TableCount {
                count: waterpoint_count,
            },
        })
    }
}

/// Per-area statistics row
#[derive(Debug, FromRow)]
struct AreaStatsRow {
    sublocation_name: String,
    accessibility: Option<f64>,
    population: i64,
    water_points: i64,
    high_capacity: i64,
    medium_capacity: i64,
    low_capacity: i64,
}

impl From<AreaStatsRow> for AreaStats {
    fn from(row: AreaStatsRow) -> Self {
        AreaStats {
            name: row.sublocation_name,
            accessibility: row.accessibility,
            population: row.population,
            water_points: row.water_points,
            high_capacity: row.high_capacity,
            medium_capacity: row.medium_capacity,
            low_capacity: row.low_capacity,
        }
    }
}

/// Subcounty aggregate row; SUM/AVG over an empty table come back NULL
#[derive(Debug, FromRow)]
struct SummaryRow {
    total_areas: i64,
    avg_accessibility: Option<f64>,
    min_accessibility: Option<f64>,
    max_accessibility: Option<f64>,
    total_population: Option<i64>,
    total_water_points: Option<i64>,
}

/// Sublocation map row with serialized GeoJSON geometry
#[derive(Debug, FromRow)]
pub struct MapAreaRow {
    pub name: String,
    pub accessibility: Option<f64>,
    pub population: Option<f64>,
    pub geometry: String,
}

/// Water point row with serialized GeoJSON geometry
#[derive(Debug, FromRow)]
pub struct WaterPointRow {
    pub name: Option<String>,
    pub water_source: Option<String>,
    pub capacity_score: Option<f64>,
    pub status: Option<String>,
    pub geometry: String,
}

/// Diagnostic counts for `/api/debug/tables`
#[derive(Debug, Serialize)]
pub struct TableDiagnostics {
    pub sublocations: NamedTableInfo,
    pub statistics: NamedTableInfo,
    pub waterpoints: TableCount,
}

#[derive(Debug, Serialize)]
pub struct NamedTableInfo {
    pub count: i64,
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TableCount {
    pub count: i64,
}

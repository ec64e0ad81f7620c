use super::{ComplianceStore, PepEntryRow, ScreeningResultRow, WatchlistEntryRow};
use crate::error::ComplianceResult;
use rusqlite::params;

impl ComplianceStore {
    // ── watchlist_entry ───────────────────────────────────────────────────

    pub fn upsert_watchlist_entry(&self, row: &WatchlistEntryRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO watchlist_entry (entry_id, full_name, program)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(entry_id) DO UPDATE SET full_name = ?2, program = ?3",
            params![row.entry_id, row.full_name, row.program],
        )?;
        Ok(())
    }

    pub fn get_watchlist(&self) -> ComplianceResult<Vec<WatchlistEntryRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT entry_id, full_name, program FROM watchlist_entry ORDER BY entry_id")?;
        let rows = stmt
            .query_map([], |r| {
                Ok(WatchlistEntryRow {
                    entry_id: r.get(0)?,
                    full_name: r.get(1)?,
                    program: r.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── pep_entry ─────────────────────────────────────────────────────────

    pub fn upsert_pep_entry(&self, row: &PepEntryRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO pep_entry (pep_id, full_name, position, country_code)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(pep_id) DO UPDATE SET
                 full_name = ?2, position = ?3, country_code = ?4",
            params![row.pep_id, row.full_name, row.position, row.country_code],
        )?;
        Ok(())
    }

    pub fn get_pep_registry(&self) -> ComplianceResult<Vec<PepEntryRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT pep_id, full_name, position, country_code FROM pep_entry ORDER BY pep_id",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(PepEntryRow {
                    pep_id: r.get(0)?,
                    full_name: r.get(1)?,
                    position: r.get(2)?,
                    country_code: r.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── screening_result ──────────────────────────────────────────────────

    pub fn insert_screening_result(&self, row: &ScreeningResultRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO screening_result (
                 screening_id, customer_id, screened_at, list, list_ref,
                 matched_name, match_score, exact
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                row.screening_id,
                row.customer_id,
                row.screened_at,
                row.list,
                row.list_ref,
                row.matched_name,
                row.match_score,
                row.exact,
            ],
        )?;
        Ok(())
    }

    pub fn screening_results_for_customer(
        &self,
        customer_id: &str,
    ) -> ComplianceResult<Vec<ScreeningResultRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT screening_id, customer_id, screened_at, list, list_ref,
                    matched_name, match_score, exact
             FROM screening_result WHERE customer_id = ?1
             ORDER BY screened_at ASC",
        )?;
        let rows = stmt
            .query_map(params![customer_id], |r| {
                Ok(ScreeningResultRow {
                    screening_id: r.get(0)?,
                    customer_id: r.get(1)?,
                    screened_at: r.get(2)?,
                    list: r.get(3)?,
                    list_ref: r.get(4)?,
                    matched_name: r.get(5)?,
                    match_score: r.get(6)?,
                    exact: r.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn screening_result_count(&self) -> ComplianceResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM screening_result", [], |r| r.get(0))?)
    }
}

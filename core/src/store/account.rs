use super::AccountStore;
use crate::{
    error::AnalyticsResult,
    filter::FilterSelection,
    record::{AccountRecord, Dimension},
    types::ACCOUNT_TABLE,
};
use rusqlite::{params, params_from_iter, Row};

const ACCOUNT_COLUMNS: &str = "account_id, balance, loan_amount, interest_rate, net_flow,
     risk_tolerance, region, account_type";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<AccountRecord> {
    Ok(AccountRecord {
        account_id: row.get(0)?,
        balance: row.get(1)?,
        loan_amount: row.get(2)?,
        interest_rate: row.get(3)?,
        net_flow: row.get(4)?,
        risk_tolerance: row.get(5)?,
        region: row.get(6)?,
        account_type: row.get(7)?,
    })
}

impl AccountStore {
    // ── Account writes (seeder / tests) ───────────────────────────

    pub fn insert_accounts(&mut self, records: &[AccountRecord]) -> AnalyticsResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {ACCOUNT_TABLE} ({ACCOUNT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ))?;
            for r in records {
                stmt.execute(params![
                    r.account_id,
                    r.balance,
                    r.loan_amount,
                    r.interest_rate,
                    r.net_flow,
                    r.risk_tolerance,
                    r.region,
                    r.account_type,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("Inserted {} account rows", records.len());
        Ok(records.len())
    }

    // ── Account reads ─────────────────────────────────────────────

    /// Sorted distinct non-null values of one categorical column.
    pub fn distinct_values(&self, dimension: Dimension) -> AnalyticsResult<Vec<String>> {
        let col = dimension.column();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {col} FROM {ACCOUNT_TABLE}
             WHERE {col} IS NOT NULL
             ORDER BY {col}"
        ))?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(values)
    }

    /// Every account passing the filter, ordered by account id.
    pub fn accounts(&self, filter: &FilterSelection) -> AnalyticsResult<Vec<AccountRecord>> {
        let sql = filter.to_sql();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM {ACCOUNT_TABLE} {} ORDER BY account_id",
            sql.clause
        ))?;
        let rows = stmt
            .query_map(params_from_iter(sql.params.iter()), account_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_matching(&self, filter: &FilterSelection) -> AnalyticsResult<i64> {
        let sql = filter.to_sql();
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {ACCOUNT_TABLE} {}", sql.clause),
            params_from_iter(sql.params.iter()),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn account_count(&self) -> AnalyticsResult<i64> {
        self.count_matching(&FilterSelection::all())
    }
}

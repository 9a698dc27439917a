//! Built-in presenters: aligned text tables and JSON lines.

use crate::{
    dashboard::{DashboardReport, Presenter},
    error::AnalyticsResult,
    format::Formatter,
    metrics::SegmentRow,
};
use std::io::Write;

pub const INSUFFICIENT_DATA: &str =
    "Not enough data after filters to compute Lorenz curve / Gini.";

/// Plain-text dashboard: overview, segment tables, concentration, Gini.
pub struct TextPresenter<W: Write> {
    out: W,
    fmt: Formatter,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W, fmt: Formatter) -> Self {
        Self { out, fmt }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn segment_table(&mut self, title: &str, key: &str, rows: &[SegmentRow]) -> AnalyticsResult<()> {
        writeln!(self.out, "{title}")?;
        if rows.is_empty() {
            writeln!(self.out, "  (no rows)")?;
            return Ok(());
        }
        let headers = [
            key,
            "accounts",
            "total balance",
            "avg balance",
            "total loan",
            "avg net flow",
            "total net flow",
            "wtd avg interest",
        ];
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                vec![
                    r.segment.clone(),
                    self.fmt.count(r.accounts),
                    self.fmt.money(Some(r.total_balance)),
                    self.fmt.money(r.avg_balance),
                    self.fmt.money(Some(r.total_loan_amount)),
                    self.fmt.money(r.avg_net_flow),
                    self.fmt.money(Some(r.total_net_flow)),
                    self.fmt.rate(r.weighted_avg_interest_rate),
                ]
            })
            .collect();
        write_table(&mut self.out, &headers, &body)
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn name(&self) -> &'static str {
        "text"
    }

    fn present(&mut self, report: &DashboardReport) -> AnalyticsResult<()> {
        let o = &report.overview;
        writeln!(self.out, "Portfolio overview")?;
        let overview_rows = vec![
            vec!["Accounts".to_string(), self.fmt.count(o.accounts)],
            vec!["Total balance".to_string(), self.fmt.money(Some(o.total_balance))],
            vec!["Total loan amount".to_string(), self.fmt.money(Some(o.total_loan_amount))],
            vec!["Weighted avg interest".to_string(), self.fmt.rate(o.weighted_avg_interest_rate)],
            vec!["Avg net flow".to_string(), self.fmt.money(o.avg_net_flow)],
            vec!["Total net flow".to_string(), self.fmt.money(Some(o.total_net_flow))],
        ];
        write_table(&mut self.out, &["metric", "value"], &overview_rows)?;
        writeln!(self.out)?;

        self.segment_table("Risk segmentation", "risk", &report.risk_segments)?;
        writeln!(self.out)?;
        self.segment_table("Net flow by account type", "account type", &report.account_type_flows)?;
        writeln!(self.out)?;
        self.segment_table("Net flow by region", "region", &report.region_flows)?;
        writeln!(self.out)?;

        writeln!(self.out, "Wealth concentration")?;
        let Some(c) = &report.concentration else {
            writeln!(self.out, "  {INSUFFICIENT_DATA}")?;
            writeln!(self.out, "  Gini coefficient: {} ({})", self.fmt.gini(None), report.gini_band.label())?;
            return Ok(());
        };
        let top_rows = vec![
            vec!["Total balance".to_string(), self.fmt.money(Some(c.total_balance))],
            vec!["Top 10% balance".to_string(), self.fmt.money(Some(c.top_decile_balance))],
            vec!["Top 10% share".to_string(), self.fmt.share(c.top_decile_share)],
            vec!["Accounts ranked".to_string(), self.fmt.count(c.accounts)],
            vec!["Accounts excluded".to_string(), self.fmt.count(c.excluded_accounts)],
        ];
        write_table(&mut self.out, &["metric", "value"], &top_rows)?;
        writeln!(self.out)?;

        let decile_rows: Vec<Vec<String>> = c
            .deciles
            .iter()
            .map(|d| {
                vec![
                    self.fmt.decile_label(d.decile),
                    self.fmt.count(d.accounts),
                    self.fmt.money(d.min_balance),
                    self.fmt.money(d.avg_balance),
                    self.fmt.money(d.max_balance),
                    self.fmt.money(Some(d.total_balance)),
                ]
            })
            .collect();
        write_table(
            &mut self.out,
            &["decile (D1 richest)", "accounts", "min", "avg", "max", "total"],
            &decile_rows,
        )?;
        writeln!(self.out)?;

        writeln!(self.out, "Wealth inequality")?;
        writeln!(
            self.out,
            "  Gini coefficient: {} ({})",
            self.fmt.gini(c.gini),
            report.gini_band.label()
        )?;
        writeln!(self.out, "  Lorenz curve: {} points", c.lorenz.len())?;
        Ok(())
    }
}

/// One JSON document per report, newline-terminated.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn name(&self) -> &'static str {
        "json"
    }

    fn present(&mut self, report: &DashboardReport) -> AnalyticsResult<()> {
        serde_json::to_writer(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> AnalyticsResult<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}", w = *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    writeln!(out, "  {}", line(headers.to_vec()).trim_end())?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "  {}", rule.join("-+-"))?;
    for row in rows {
        writeln!(out, "  {}", line(row.iter().map(String::as_str).collect()).trim_end())?;
    }
    Ok(())
}

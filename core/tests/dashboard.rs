//! End-to-end renders through the dashboard and the built-in presenters.

use wealth_core::{
    config::DashboardConfig,
    dashboard::{Dashboard, Presenter},
    error::AnalyticsError,
    filter::FilterSelection,
    format::Formatter,
    narrative::GiniBand,
    present::{JsonPresenter, TextPresenter, INSUFFICIENT_DATA},
    record::{AccountRecord, Dimension},
    store::AccountStore,
    synthetic::{self, SyntheticConfig},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn account(id: &str, balance: f64, risk: &str, region: &str, kind: &str) -> AccountRecord {
    AccountRecord {
        interest_rate: Some(0.03),
        net_flow: Some(balance / 10.0),
        loan_amount: Some(0.0),
        ..AccountRecord::new(id)
            .with_balance(balance)
            .with_category(Dimension::RiskTolerance, risk)
            .with_category(Dimension::Region, region)
            .with_category(Dimension::AccountType, kind)
    }
}

fn records() -> Vec<AccountRecord> {
    vec![
        account("a1", 1000.0, "Low", "Northeast", "Checking"),
        account("a2", 0.0, "Low", "Northeast", "Savings"),
        account("a3", 0.0, "Medium", "South", "Checking"),
        account("a4", 0.0, "High", "West", "Brokerage"),
    ]
}

fn store_dashboard(records: &[AccountRecord]) -> Dashboard<AccountStore> {
    let mut store = AccountStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.insert_accounts(records).unwrap();
    Dashboard::with_source(store, DashboardConfig::default_test()).unwrap()
}

fn temp_db(name: &str) -> String {
    let path = std::env::temp_dir().join(format!("wealth-{name}-{}.db", std::process::id()));
    path.to_string_lossy().into_owned()
}

fn remove_db(path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn default_selection_covers_every_known_value() {
    init_logging();
    let dashboard = store_dashboard(&records());
    let sel = dashboard.default_selection();
    assert_eq!(sel.risk_tolerance.len(), 3);
    assert_eq!(sel.region.len(), 3);
    assert_eq!(sel.account_type.len(), 3);

    let all = dashboard.render(&FilterSelection::all()).unwrap();
    let defaulted = dashboard.render(&sel).unwrap();
    assert_eq!(all.overview, defaulted.overview);
    assert_eq!(all.concentration, defaulted.concentration);
}

#[test]
fn unrestricted_render_fills_every_section() {
    init_logging();
    let dashboard = store_dashboard(&records());
    let report = dashboard.render(&FilterSelection::all()).unwrap();

    assert_eq!(report.overview.accounts, 4);
    assert!((report.overview.weighted_avg_interest_rate.unwrap() - 0.03).abs() < 1e-12);
    let risks: Vec<&str> = report.risk_segments.iter().map(|r| r.segment.as_str()).collect();
    assert_eq!(risks, vec!["Low", "Medium", "High"]);
    assert_eq!(report.account_type_flows[0].segment, "Checking");
    assert_eq!(report.region_flows[0].segment, "Northeast");

    let c = report.concentration.as_ref().unwrap();
    assert!((c.top_decile_share.unwrap() - 1.0).abs() < 1e-12);
    // One holder among four: 1 - 1/4.
    assert!((report.gini().unwrap() - 0.75).abs() < 1e-12);
    assert_eq!(report.gini_band, GiniBand::Extreme);
}

/// Both values are in the domain, but no record has both: zero accounts,
/// undefined averages, no concentration result, no crash.
#[test]
fn empty_intersection_renders_undefined() {
    init_logging();
    let dashboard = store_dashboard(&records());
    let sel = FilterSelection::all()
        .with(Dimension::RiskTolerance, ["High"])
        .with(Dimension::Region, ["Northeast"]);
    let report = dashboard.render(&sel).unwrap();

    assert_eq!(report.overview.accounts, 0);
    assert_eq!(report.overview.total_balance, 0.0);
    assert_eq!(report.overview.weighted_avg_interest_rate, None);
    assert_eq!(report.overview.avg_net_flow, None);
    assert!(report.risk_segments.is_empty());
    assert!(report.concentration.is_none());
    assert_eq!(report.gini(), None);
    assert_eq!(report.gini_band, GiniBand::Unknown);
}

#[test]
fn unknown_filter_value_matches_nothing() {
    init_logging();
    let dashboard = store_dashboard(&records());
    let sel = FilterSelection::all().with(Dimension::AccountType, ["Crypto"]);
    let report = dashboard.render(&sel).unwrap();
    assert_eq!(report.overview.accounts, 0);
    assert!(report.concentration.is_none());
}

/// The same selection gives the same report from SQL and from memory.
#[test]
fn store_and_in_memory_dashboards_agree() {
    init_logging();
    let data = synthetic::generate(&SyntheticConfig {
        accounts: 300,
        seed: 21,
        ..SyntheticConfig::default()
    });
    let mut sorted = data.clone();
    sorted.sort_by(|a, b| a.account_id.cmp(&b.account_id));

    let from_store = store_dashboard(&data);
    let from_memory = Dashboard::in_memory(sorted).unwrap();
    assert_eq!(from_store.domain(), from_memory.domain());

    let sel = FilterSelection::all().with(Dimension::RiskTolerance, ["Low", "High"]);
    assert_eq!(
        from_store.render(&sel).unwrap(),
        from_memory.render(&sel).unwrap()
    );
}

#[test]
fn text_presenter_shows_placeholders_not_numbers() {
    init_logging();
    let dashboard = store_dashboard(&records());
    let sel = FilterSelection::all().with(Dimension::Region, ["Nowhere"]);

    let fmt = Formatter::new(&dashboard.config);
    let mut presenter = TextPresenter::new(Vec::new(), fmt);
    dashboard.render_to(&sel, &mut presenter).unwrap();
    let text = String::from_utf8(presenter.into_inner()).unwrap();

    assert!(text.contains(INSUFFICIENT_DATA));
    assert!(text.contains("—"));
    assert!(text.contains("unknown"));
    assert!(!text.contains("NaN"));
}

#[test]
fn text_presenter_renders_decile_table() {
    init_logging();
    let dashboard = store_dashboard(&records());
    let fmt = Formatter::new(&dashboard.config);
    let mut presenter = TextPresenter::new(Vec::new(), fmt);
    dashboard
        .render_to(&FilterSelection::all(), &mut presenter)
        .unwrap();
    let text = String::from_utf8(presenter.into_inner()).unwrap();

    assert!(text.contains("D1"));
    assert!(text.contains("D10"));
    assert!(text.contains("$1,000"));
    assert!(text.contains("100.00%"));
    assert!(text.contains("0.750 (extreme concentration)"));
}

#[test]
fn json_presenter_emits_null_for_undefined() {
    init_logging();
    let dashboard = store_dashboard(&records());
    let sel = FilterSelection::all().with(Dimension::RiskTolerance, ["Nobody"]);

    let mut presenter = JsonPresenter::new(Vec::new());
    assert_eq!(presenter.name(), "json");
    dashboard.render_to(&sel, &mut presenter).unwrap();
    let out = String::from_utf8(presenter.into_inner()).unwrap();
    assert_eq!(out.lines().count(), 1);

    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["overview"]["accounts"], 0);
    assert!(v["overview"]["weighted_avg_interest_rate"].is_null());
    assert!(v["concentration"].is_null());
    assert_eq!(v["gini_band"], "unknown");
    assert_eq!(v["selection"]["risk_tolerance"][0], "Nobody");
}

// ── Store lifecycle ──────────────────────────────────────────────────────────

#[test]
fn missing_store_is_unavailable() {
    init_logging();
    let config = DashboardConfig {
        db_path: temp_db("missing"),
        ..DashboardConfig::default_test()
    };
    remove_db(&config.db_path);
    let err = Dashboard::open(config).err().expect("open should fail");
    assert!(matches!(err, AnalyticsError::StoreUnavailable { .. }), "{err}");
}

#[test]
fn store_without_account_table_is_unavailable() {
    init_logging();
    let path = temp_db("no-table");
    remove_db(&path);
    AccountStore::create(&path).unwrap().close().unwrap();

    let err = AccountStore::open_read_only(&path).err().expect("open should fail");
    assert!(matches!(err, AnalyticsError::StoreUnavailable { .. }), "{err}");
    remove_db(&path);
}

/// Seed a file, reopen it read-only through the dashboard, render, close.
#[test]
fn file_store_round_trip_is_read_only() {
    init_logging();
    let path = temp_db("round-trip");
    remove_db(&path);

    let mut writer = AccountStore::create(&path).unwrap();
    writer.migrate().unwrap();
    writer.insert_accounts(&records()).unwrap();
    writer.close().unwrap();

    let mut reader = AccountStore::open_read_only(&path).unwrap();
    assert_eq!(reader.account_count().unwrap(), 4);
    assert!(reader
        .insert_accounts(&[account("x", 1.0, "Low", "West", "Savings")])
        .is_err());
    reader.close().unwrap();

    let config = DashboardConfig {
        db_path: path.clone(),
        ..DashboardConfig::default_test()
    };
    let dashboard = Dashboard::open(config).unwrap();
    let report = dashboard.render(&dashboard.default_selection()).unwrap();
    assert_eq!(report.overview.accounts, 4);
    dashboard.close().unwrap();

    remove_db(&path);
}

//! aml-runner: headless ledger replay for the compliance engine.
//!
//! Usage:
//!   aml-runner --input data/sample_ledger.json --db run.db
//!   aml-runner --data-dir ./data
//!
//! Seeds the sanctions watchlist and PEP registry from the data directory,
//! loads a JSON ledger of customers and transactions, assesses every
//! transaction in time order, and prints the decisions plus an end-of-run
//! summary.

use anyhow::{Context, Result};
use aml_core::{
    config::{self, EngineConfig},
    engine::{ComplianceEngine, TransactionInput},
    store::{BusinessProfileRow, ComplianceStore, CustomerRow},
};
use chrono::{DateTime, Utc};
use std::env;
use std::path::Path;

#[derive(serde::Deserialize)]
struct LedgerFile {
    customers: Vec<LedgerCustomer>,
    transactions: Vec<LedgerTransaction>,
}

#[derive(serde::Deserialize)]
struct LedgerCustomer {
    customer_id: String,
    full_name: String,
    created_at: DateTime<Utc>,
    verification_status: String,
    #[serde(default)]
    is_international: bool,
    #[serde(default = "default_country")]
    country_code: String,
    #[serde(default)]
    source_of_funds: Option<String>,
    #[serde(default)]
    business: Option<LedgerBusiness>,
}

#[derive(serde::Deserialize)]
struct LedgerBusiness {
    legal_name: String,
    entity_type: String,
    abn: String,
    abn_status: String,
    industry_code: String,
    ubo_count: i64,
    #[serde(default)]
    any_ubo_pep: bool,
    #[serde(default)]
    any_ubo_sanctioned: bool,
}

#[derive(serde::Deserialize)]
struct LedgerTransaction {
    transaction_id: String,
    customer_id: String,
    amount: f64,
    #[serde(default = "default_currency")]
    currency: String,
    occurred_at: DateTime<Utc>,
    #[serde(default)]
    is_international: bool,
}

fn default_country() -> String {
    "AU".to_string()
}

fn default_currency() -> String {
    "AUD".to_string()
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let input = arg_value(&args, "--input")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{data_dir}/sample_ledger.json"));
    let config_path = arg_value(&args, "--config");

    println!("aml-runner");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!("  input:     {input}");
    println!();

    let store = ComplianceStore::open(db)?;
    store.migrate()?;

    let engine_config = match config_path {
        Some(p) => EngineConfig::from_file(Path::new(p))?,
        None => EngineConfig::default(),
    };

    seed_screening_lists(&store, data_dir)?;

    let engine = ComplianceEngine::new(store, engine_config);

    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("reading ledger file {input}"))?;
    let ledger: LedgerFile = serde_json::from_str(&raw)?;

    for c in &ledger.customers {
        engine.store.insert_customer(&CustomerRow {
            customer_id: c.customer_id.clone(),
            full_name: c.full_name.clone(),
            created_at: c.created_at.timestamp(),
            verification_status: c.verification_status.clone(),
            risk_level: "low".to_string(),
            risk_score: 0,
            is_pep: false,
            is_international: c.is_international,
            country_code: c.country_code.clone(),
            source_of_funds: c.source_of_funds.clone(),
        })?;
        if let Some(b) = &c.business {
            engine.store.insert_business_profile(&BusinessProfileRow {
                customer_id: c.customer_id.clone(),
                legal_name: b.legal_name.clone(),
                entity_type: b.entity_type.clone(),
                abn: b.abn.clone(),
                abn_status: b.abn_status.clone(),
                industry_code: b.industry_code.clone(),
                ubo_count: b.ubo_count,
                any_ubo_pep: b.any_ubo_pep,
                any_ubo_sanctioned: b.any_ubo_sanctioned,
            })?;
        }
    }

    let mut transactions = ledger.transactions;
    transactions.sort_by_key(|t| t.occurred_at);

    for t in &transactions {
        let decision = engine.assess(&TransactionInput {
            transaction_id: t.transaction_id.clone(),
            customer_id: t.customer_id.clone(),
            amount: t.amount,
            currency: t.currency.clone(),
            occurred_at: t.occurred_at,
            is_international: t.is_international,
        })?;

        let mut notes = Vec::new();
        if decision.structuring.flagged {
            notes.push("structuring".to_string());
        }
        for hit in &decision.screening_hits {
            notes.push(format!("{} hit {:.2}", hit.list.as_str(), hit.score));
        }
        if let Some(ttr) = &decision.ttr_id {
            notes.push(format!("TTR {ttr}"));
        }
        if let Some(smr) = &decision.smr_id {
            notes.push(format!("SMR {smr}"));
        }
        if let Some(inv) = &decision.investigation_id {
            notes.push(format!("EDD {inv}"));
        }

        println!(
            "{:<10} {:<8} ${:>10.2}  {:<12} score {:>3} ({}){}",
            t.transaction_id,
            t.customer_id,
            t.amount,
            decision.outcome.as_str(),
            decision.risk_score,
            decision.risk_level.as_str(),
            if notes.is_empty() {
                String::new()
            } else {
                format!("  [{}]", notes.join(", "))
            }
        );
    }

    print_summary(&engine)?;
    Ok(())
}

fn seed_screening_lists(store: &ComplianceStore, data_dir: &str) -> Result<()> {
    let watchlist_path = Path::new(data_dir).join("watchlist.json");
    if watchlist_path.exists() {
        for entry in config::load_watchlist(&watchlist_path)? {
            store.upsert_watchlist_entry(&entry)?;
        }
    } else {
        log::warn!("no watchlist file at {}", watchlist_path.display());
    }

    let pep_path = Path::new(data_dir).join("pep_registry.json");
    if pep_path.exists() {
        for entry in config::load_pep_registry(&pep_path)? {
            store.upsert_pep_entry(&entry)?;
        }
    } else {
        log::warn!("no PEP registry file at {}", pep_path.display());
    }

    Ok(())
}

fn print_summary(engine: &ComplianceEngine) -> Result<()> {
    println!();
    println!("── Summary ──────────────────────────────");
    println!("  customers:          {}", engine.store.customer_count()?);
    println!("  transactions:       {}", engine.store.transaction_count()?);
    println!("  screening hits:     {}", engine.store.screening_result_count()?);
    println!("  TTRs raised:        {}", engine.store.ttr_count()?);
    println!("  SMRs raised:        {}", engine.store.smr_count()?);
    println!("  open EDD cases:     {}", engine.store.open_investigation_count()?);
    println!("  audit events:       {}", engine.store.audit_event_count()?);
    Ok(())
}

fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

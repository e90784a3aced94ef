use tally::cli::classifier_settings;
use tally_config::Config;
use tally_core::{
    chart_or_sample, customers_or_sample, vendors_or_sample, ClassificationContext, ClassifierService,
    DocumentKind, EntityKind, ReconciliationService,
};
use tally_domain::{Money, Transaction};
use tally_storage_json::JsonStore;
use tempfile::tempdir;

use chrono::NaiveDate;

#[test]
fn configured_labels_drive_fallback_postings() {
    let mut config = Config::default();
    config.classifier.cash_label = "Operating Bank".into();
    config.classifier.expense_label = "Sundry".into();
    let service = ClassifierService::new(classifier_settings(&config.classifier));

    let date = NaiveDate::from_ymd_opt(2024, 7, 1).expect("date");
    let txn = Transaction::new(date, "Coffee", Money::from_units(-4));
    let result = service.classify(&txn, &Default::default(), ClassificationContext::default(), None);

    assert_eq!(result.posting.debit_account.name, "Sundry");
    assert_eq!(result.posting.credit_account.name, "Operating Bank");
    assert_eq!(result.posting.amount(), Money::from_units(4));
}

#[test]
fn stored_snapshot_balances_after_adjustment() {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::new(dir.path()).expect("store");
    let mut snapshot = store.load_snapshot().expect("empty snapshot");
    snapshot.assets.insert("cash".into(), "$1,250.50".into());
    snapshot.liabilities.insert("credit_card".into(), "250.50".into());

    ReconciliationService::auto_adjust(&mut snapshot);
    store.save_snapshot(&snapshot).expect("save");

    let reloaded = store.load_snapshot().expect("reload");
    assert_eq!(reloaded.retained_earnings(), Some("1000"));
    assert!(ReconciliationService::check_balance(&reloaded).balanced);
}

#[test]
fn sample_chart_is_usable_for_classification() {
    let chart = chart_or_sample("not a chart");
    let date = NaiveDate::from_ymd_opt(2024, 7, 1).expect("date");
    let txn = Transaction::new(date, "Invoice 42 paid", Money::from_units(900));

    let posting = ClassifierService::default().fallback_posting(&txn, &chart);

    assert_eq!(posting.debit_account.name, "Checking Account");
    assert_eq!(posting.credit_account.name, "Sales Revenue");
}

#[test]
fn sample_counterparties_drive_document_suggestions() {
    let customers = customers_or_sample("no customers");
    let vendors = vendors_or_sample("no vendors");
    let date = NaiveDate::from_ymd_opt(2024, 7, 1).expect("date");
    let service = ClassifierService::default();
    let context = ClassificationContext::new(&customers, &vendors);

    let bill = Transaction::new(date, "TechSource Solutions Inc laptop", Money::from_units(-1800));
    let result = service.classify(&bill, &Default::default(), context, None);
    assert_eq!(result.entity_suggestion.kind, EntityKind::Vendor);
    assert_eq!(result.document_suggestion.kind, DocumentKind::Bill);

    let invoice = Transaction::new(date, "Payment from Mike Chen", Money::from_units(300));
    let result = service.classify(&invoice, &Default::default(), context, None);
    assert_eq!(result.entity_suggestion.name, "Mike Chen");
    assert_eq!(result.document_suggestion.kind, DocumentKind::Invoice);
}

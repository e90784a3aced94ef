use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use tally_core::CoreError;
use tally_domain::{ChartOfAccounts, Customer, FinancialSnapshot, Vendor};

pub const SNAPSHOT_FILE: &str = "financial_snapshot.json";
pub const CHART_FILE: &str = "chart_of_accounts.json";
pub const CUSTOMERS_FILE: &str = "customers.json";
pub const VENDORS_FILE: &str = "vendors.json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence for the onboarding snapshot, chart and
/// customer and vendor lists.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.root.join(CHART_FILE)
    }

    /// An absent snapshot file is an empty snapshot.
    pub fn load_snapshot(&self) -> Result<FinancialSnapshot, CoreError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(FinancialSnapshot::default());
        }
        read_json(&path)
    }

    pub fn save_snapshot(&self, snapshot: &FinancialSnapshot) -> Result<(), CoreError> {
        write_json(&self.snapshot_path(), snapshot)
    }

    pub fn load_chart(&self) -> Result<Option<ChartOfAccounts>, CoreError> {
        let path = self.chart_path();
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    pub fn save_chart(&self, chart: &ChartOfAccounts) -> Result<(), CoreError> {
        write_json(&self.chart_path(), chart)
    }

    pub fn customers_path(&self) -> PathBuf {
        self.root.join(CUSTOMERS_FILE)
    }

    pub fn vendors_path(&self) -> PathBuf {
        self.root.join(VENDORS_FILE)
    }

    /// An absent list is empty.
    pub fn load_customers(&self) -> Result<Vec<Customer>, CoreError> {
        read_list(&self.customers_path())
    }

    pub fn save_customers(&self, customers: &[Customer]) -> Result<(), CoreError> {
        write_json(&self.customers_path(), &customers)
    }

    pub fn load_vendors(&self) -> Result<Vec<Vendor>, CoreError> {
        read_list(&self.vendors_path())
    }

    pub fn save_vendors(&self, vendors: &[Vendor]) -> Result<(), CoreError> {
        write_json(&self.vendors_path(), &vendors)
    }
}

pub fn load_snapshot_from_path(path: &Path) -> Result<FinancialSnapshot, CoreError> {
    read_json(path)
}

pub fn save_snapshot_to_path(snapshot: &FinancialSnapshot, path: &Path) -> Result<(), CoreError> {
    write_json(path, snapshot)
}

pub fn load_chart_from_path(path: &Path) -> Result<ChartOfAccounts, CoreError> {
    read_json(path)
}

fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    debug!(path = %path.display(), "loaded json document");
    Ok(value)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), "saved json document");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    path.with_extension(ext)
}

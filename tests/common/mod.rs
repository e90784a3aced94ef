use std::{fs, path::PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A temp dir holding a config whose data root points inside it.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let config = serde_json::json!({
            "ui_color_enabled": false,
            "data_root": dir.path().join("books"),
        });
        fs::write(dir.path().join("tally.json"), config.to_string()).expect("write config");
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("tally_cli").expect("binary");
        cmd.arg("--config").arg(self.path("tally.json"));
        cmd
    }
}

pub const UNBALANCED_SNAPSHOT: &str = r#"{
  "assets": {"cash": "$10,000", "accounts_receivable": "2000"},
  "liabilities": {"accounts_payable": "1000"},
  "equity": {"common_stock": "5000", "retained_earnings": "0"}
}"#;

pub const CHART: &str = r#"[
  {"name": "Checking Account", "account_type": "Asset", "sub_type": "Current Asset"},
  {"name": "Service Revenue", "account_type": "Income", "sub_type": "Operating Income"},
  {"name": "Office Expenses", "account_type": "Expense", "sub_type": "Operating Expense"}
]"#;

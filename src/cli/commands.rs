use std::{fs, path::Path};

use chrono::{Local, NaiveDate};

use serde::de::DeserializeOwned;
use tally_core::{
    accumulated_depreciation, months_in_service, net_book_value, parse_generated_chart,
    parse_generated_customers, parse_generated_vendors, sample_chart, sample_customers,
    sample_vendors, useful_life_years, BalanceResult,
    ClassificationContext, FallbackReason, ReconciliationService, StaticOracle, SuggestionOracle,
    USEFUL_LIFE_YEARS,
};
use tally_domain::{ChartOfAccounts, Customer, FinancialSnapshot, Money, Transaction, Vendor};
use tally_storage_json::{load_chart_from_path, load_snapshot_from_path, save_snapshot_to_path};

use super::{output, CliContext, Outcome};
use crate::{errors::TallyError, utils::build_info};

pub(super) fn check(context: &CliContext, args: &[String]) -> Result<Outcome, TallyError> {
    let snapshot = load_snapshot(context, args.first())?;
    let result = ReconciliationService::check_balance(&snapshot);
    print_balance(context, &result);
    output::info(format!(
        "  Completed   : {} fields, business questions {}",
        snapshot.completed_fields(),
        if snapshot.business_questions_complete() { "saved" } else { "pending" }
    ));
    output::info(format!(
        "  Onboarding  : {}",
        if snapshot.completed { "complete" } else { "in progress" }
    ));
    for key in ReconciliationService::ignored_equity_keys(&snapshot) {
        output::warning(format!("equity line `{key}` is not part of the balance check"));
    }

    if result.balanced {
        output::success("Assets = Liabilities + Equity");
        Ok(Outcome::Success)
    } else {
        output::warning(format!("Out of balance by {}", context.money(result.difference)));
        Ok(Outcome::Unbalanced)
    }
}

pub(super) fn adjust(context: &CliContext, args: &[String]) -> Result<Outcome, TallyError> {
    let mut snapshot = load_snapshot(context, args.first())?;
    let outcome = ReconciliationService::auto_adjust(&mut snapshot);
    print_balance(context, &outcome.result);

    if outcome.applied {
        match args.first() {
            Some(path) => save_snapshot_to_path(&snapshot, Path::new(path))?,
            None => context.store()?.save_snapshot(&snapshot)?,
        }
        output::success(format!(
            "Retained earnings set to {} (was {})",
            context.money(outcome.new_retained_earnings),
            context.money(outcome.previous_retained_earnings)
        ));
    } else {
        output::info("Already balanced; nothing changed");
    }
    Ok(Outcome::Success)
}

/// Without `--chart` the stored chart is used; `--chart -` forces an empty
/// one. Customers and vendors default to the stored lists.
pub(super) fn classify(context: &CliContext, mut args: Vec<String>) -> Result<Outcome, TallyError> {
    let suggestion = take_option(&mut args, "--suggestion")?;
    let chart_path = take_option(&mut args, "--chart")?;
    let customers_path = take_option(&mut args, "--customers")?;
    let vendors_path = take_option(&mut args, "--vendors")?;
    let date = take_option(&mut args, "--date")?
        .map(|raw| parse_date(&raw))
        .transpose()?
        .unwrap_or_else(|| Local::now().date_naive());

    let [amount, description @ ..] = args.as_slice() else {
        return Err(TallyError::Usage("classify needs <amount> <description...>".into()));
    };
    let transaction = Transaction::new(date, description.join(" "), parse_amount(amount)?);

    let chart = match chart_path.as_deref() {
        Some("-") => ChartOfAccounts::default(),
        Some(path) => load_chart_from_path(Path::new(path))?,
        None => context.store()?.load_chart()?.unwrap_or_default(),
    };
    let customers: Vec<Customer> = match customers_path {
        Some(path) => read_list(&path)?,
        None => context.store()?.load_customers()?,
    };
    let vendors: Vec<Vendor> = match vendors_path {
        Some(path) => read_list(&path)?,
        None => context.store()?.load_vendors()?,
    };

    let oracle = suggestion
        .map(fs::read_to_string)
        .transpose()?
        .map(StaticOracle::responding);
    let classification = context.classifier().classify(
        &transaction,
        &chart,
        ClassificationContext::new(&customers, &vendors),
        oracle.as_ref().map(|oracle| oracle as &dyn SuggestionOracle),
    );

    match &classification.fallback_reason {
        Some(FallbackReason::Unavailable(err)) => {
            output::warning(format!("suggestion unavailable ({err}); used basic analysis"))
        }
        Some(FallbackReason::Rejected(reason)) => {
            output::warning(format!("suggestion rejected ({reason}); used basic analysis"))
        }
        Some(FallbackReason::NoOracle) | None => {}
    }
    println!("{}", serde_json::to_string_pretty(&classification)?);
    Ok(Outcome::Success)
}

pub(super) fn chart(context: &CliContext, mut args: Vec<String>) -> Result<Outcome, TallyError> {
    let save = take_flag(&mut args, "--save");
    let [path] = args.as_slice() else {
        return Err(TallyError::Usage("chart needs <generated.json>".into()));
    };
    let raw = fs::read_to_string(path)?;
    let chart = match parse_generated_chart(&raw) {
        Ok(chart) => chart,
        Err(err) => {
            output::warning(format!("{err}; using the sample chart"));
            sample_chart()
        }
    };

    if save {
        let store = context.store()?;
        store.save_chart(&chart)?;
        output::success(format!(
            "Saved {} accounts to {}",
            chart.len(),
            store.chart_path().display()
        ));
    } else {
        println!("{}", serde_json::to_string_pretty(&chart)?);
    }
    Ok(Outcome::Success)
}

pub(super) fn customers(context: &CliContext, mut args: Vec<String>) -> Result<Outcome, TallyError> {
    let save = take_flag(&mut args, "--save");
    let [path] = args.as_slice() else {
        return Err(TallyError::Usage("customers needs <generated.json>".into()));
    };
    let customers = match parse_generated_customers(&fs::read_to_string(path)?) {
        Ok(customers) => customers,
        Err(err) => {
            output::warning(format!("{err}; using sample customers"));
            sample_customers()
        }
    };
    if save {
        let store = context.store()?;
        store.save_customers(&customers)?;
        output::success(format!(
            "Saved {} customers to {}",
            customers.len(),
            store.customers_path().display()
        ));
    } else {
        println!("{}", serde_json::to_string_pretty(&customers)?);
    }
    Ok(Outcome::Success)
}

pub(super) fn vendors(context: &CliContext, mut args: Vec<String>) -> Result<Outcome, TallyError> {
    let save = take_flag(&mut args, "--save");
    let [path] = args.as_slice() else {
        return Err(TallyError::Usage("vendors needs <generated.json>".into()));
    };
    let vendors = match parse_generated_vendors(&fs::read_to_string(path)?) {
        Ok(vendors) => vendors,
        Err(err) => {
            output::warning(format!("{err}; using sample vendors"));
            sample_vendors()
        }
    };
    if save {
        let store = context.store()?;
        store.save_vendors(&vendors)?;
        output::success(format!(
            "Saved {} vendors to {}",
            vendors.len(),
            store.vendors_path().display()
        ));
    } else {
        println!("{}", serde_json::to_string_pretty(&vendors)?);
    }
    Ok(Outcome::Success)
}

pub(super) fn config(context: &CliContext, args: Vec<String>) -> Result<Outcome, TallyError> {
    let manager = &context.manager;
    match args.split_first() {
        None => print_config(context),
        Some((action, rest)) => match action.as_str() {
            "show" => print_config(context),
            "backups" => {
                let names = manager.list_backups()?;
                if names.is_empty() {
                    output::info("No backups yet");
                }
                for name in names {
                    println!("{name}");
                }
                Ok(Outcome::Success)
            }
            "backup" => {
                let note = rest.join(" ");
                let note = Some(note.as_str()).filter(|note| !note.trim().is_empty());
                let name = manager.backup(&context.config, note)?;
                output::success(format!(
                    "Backed up to {}",
                    manager.backups_dir().join(name).display()
                ));
                Ok(Outcome::Success)
            }
            "restore" => {
                let [name] = rest else {
                    return Err(TallyError::Usage("config restore needs <name>".into()));
                };
                let restored = manager.restore(name)?;
                manager.save(&restored)?;
                output::success(format!(
                    "Restored {name} into {}",
                    manager.config_path().display()
                ));
                Ok(Outcome::Success)
            }
            other => Err(TallyError::Usage(format!("unknown config action `{other}`"))),
        },
    }
}

pub(super) fn depreciate(context: &CliContext, mut args: Vec<String>) -> Result<Outcome, TallyError> {
    let reporting = take_option(&mut args, "--as-of")?
        .map(|raw| parse_date(&raw))
        .transpose()?
        .unwrap_or_else(|| Local::now().date_naive());
    let [cost, purchase, life @ ..] = args.as_slice() else {
        return Err(TallyError::Usage(
            "depreciate needs <cost> <purchase-date> <asset-class|years>".into(),
        ));
    };
    if life.is_empty() {
        return Err(TallyError::Usage("depreciate needs an asset class or useful life".into()));
    }
    let cost = parse_amount(cost)?;
    let purchase = parse_date(purchase)?;
    let life = life.join(" ");
    let years = match life.parse::<f64>() {
        Ok(years) if years.is_finite() && years > 0.0 => years,
        Ok(_) => return Err(TallyError::InvalidArgument(format!("useful life `{life}` must be positive"))),
        Err(_) => useful_life_years(&life).ok_or_else(|| {
            let known: Vec<&str> = USEFUL_LIFE_YEARS.iter().map(|(name, _)| *name).collect();
            TallyError::InvalidArgument(format!(
                "unknown asset class `{life}` (known: {})",
                known.join(", ")
            ))
        })?,
    };

    output::section("Depreciation");
    output::info(format!("  Cost              : {}", context.money(cost)));
    output::info(format!("  Useful life       : {years} years"));
    output::info(format!(
        "  Months in service : {}",
        months_in_service(purchase, reporting).max(0)
    ));
    output::info(format!(
        "  Accumulated       : {}",
        context.money(accumulated_depreciation(cost, purchase, years, reporting))
    ));
    output::info(format!(
        "  Net book value    : {}",
        context.money(net_book_value(cost, purchase, years, reporting))
    ));
    Ok(Outcome::Success)
}

pub(super) fn version() -> Result<Outcome, TallyError> {
    let meta = build_info::current();
    output::section(format!("Tally {}", meta.version));
    for line in meta.summary_lines() {
        output::info(line);
    }
    Ok(Outcome::Success)
}

fn load_snapshot(context: &CliContext, path: Option<&String>) -> Result<FinancialSnapshot, TallyError> {
    match path {
        Some(path) => Ok(load_snapshot_from_path(Path::new(path))?),
        None => Ok(context.store()?.load_snapshot()?),
    }
}

fn print_balance(context: &CliContext, result: &BalanceResult) {
    output::section("Balance check");
    output::info(format!("  Assets      : {}", context.money(result.assets_total)));
    output::info(format!("  Liabilities : {}", context.money(result.liabilities_total)));
    output::info(format!("  Equity      : {}", context.money(result.equity_total)));
    output::info(format!("  Difference  : {}", context.money(result.difference)));
}

fn print_config(context: &CliContext) -> Result<Outcome, TallyError> {
    output::info(format!("Config file : {}", context.manager.config_path().display()));
    output::info(format!("Data root   : {}", context.config.resolve_data_root().display()));
    println!("{}", serde_json::to_string_pretty(&context.config)?);
    Ok(Outcome::Success)
}

/// A stored customer or vendor list; plain JSON arrays only.
fn read_list<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, TallyError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// Removes `name <value>` from `args`.
fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>, TallyError> {
    let Some(index) = args.iter().position(|arg| arg == name) else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        return Err(TallyError::Usage(format!("{name} needs a value")));
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Ok(Some(value))
}

fn take_flag(args: &mut Vec<String>, name: &str) -> bool {
    let before = args.len();
    args.retain(|arg| arg != name);
    args.len() != before
}

/// Strict amount parsing: `$` and `,` are allowed, anything else must be numeric.
fn parse_amount(raw: &str) -> Result<Money, TallyError> {
    let cleaned: String = raw.chars().filter(|ch| !matches!(ch, '$' | ',')).collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Money::from_f64(value)),
        _ => Err(TallyError::InvalidArgument(format!("`{raw}` is not an amount"))),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, TallyError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| TallyError::InvalidArgument(format!("`{raw}` is not a YYYY-MM-DD date")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn take_option_removes_pair() {
        let mut args = strings(&["chart.json", "--date", "2024-07-01", "150"]);
        assert_eq!(take_option(&mut args, "--date").expect("option"), Some("2024-07-01".into()));
        assert_eq!(args, strings(&["chart.json", "150"]));
        assert_eq!(take_option(&mut args, "--date").expect("absent"), None);
    }

    #[test]
    fn take_option_without_value_fails() {
        let mut args = strings(&["chart.json", "--suggestion"]);
        assert!(take_option(&mut args, "--suggestion").is_err());
    }

    #[test]
    fn amounts_are_parsed_strictly() {
        assert_eq!(parse_amount("$1,500.25").expect("amount"), Money::from_cents(150_025));
        assert_eq!(parse_amount("-150").expect("amount"), Money::from_units(-150));
        assert!(parse_amount("lots").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn dates_use_iso_format() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("07/01/2024").is_err());
    }
}

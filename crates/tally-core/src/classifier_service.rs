//! Maps transactions onto balanced two-account postings.

use serde::Serialize;
use tracing::{debug, warn};

use tally_domain::{
    contains_ignore_case, Account, AccountRef, AccountType, ChartOfAccounts, Counterparty,
    Customer, Money, Posting, Transaction, Vendor,
};

use crate::{
    oracle::{OracleError, OracleRequest, SuggestionOracle},
    suggestion::{
        validate_response, AccountSuggestion, Confidence, DocumentKind, DocumentSuggestion,
        EntityKind, EntitySuggestion, RejectionReason, SuggestionCheck,
    },
};

const CASH_KEYWORDS: [&str; 2] = ["cash", "bank"];
const DEPOSIT_KEYWORDS: [&str; 2] = ["checking", "savings"];

const FALLBACK_NOTES: &str =
    "Basic double-entry analysis using chart of accounts. Manual review recommended for accurate account selection.";

/// Fallback labels and request sizing for the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierSettings {
    pub cash_label: String,
    pub revenue_label: String,
    pub expense_label: String,
    pub chart_excerpt_limit: usize,
    pub entity_excerpt_limit: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            cash_label: "Cash".into(),
            revenue_label: "Service Revenue".into(),
            expense_label: "General Expenses".into(),
            chart_excerpt_limit: 50,
            entity_excerpt_limit: 20,
        }
    }
}

/// Optional customers and vendors used for entity matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationContext<'a> {
    pub customers: &'a [Customer],
    pub vendors: &'a [Vendor],
}

impl<'a> ClassificationContext<'a> {
    pub fn new(customers: &'a [Customer], vendors: &'a [Vendor]) -> Self {
        Self { customers, vendors }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ClassificationSource {
    Oracle,
    Fallback,
}

/// Why the deterministic procedure produced the result.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    NoOracle,
    Unavailable(OracleError),
    Rejected(RejectionReason),
}

/// A posting plus the surrounding suggestions shown to the user for review.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub posting: Posting,
    pub source: ClassificationSource,
    pub confidence: Confidence,
    pub account_suggestions: Vec<AccountSuggestion>,
    pub entity_suggestion: EntitySuggestion,
    pub document_suggestion: DocumentSuggestion,
    pub additional_notes: String,
    #[serde(skip)]
    pub fallback_reason: Option<FallbackReason>,
}

impl Classification {
    pub fn is_fallback(&self) -> bool {
        self.source == ClassificationSource::Fallback
    }
}

/// Stateless classifier. Every call is independent of every other call.
#[derive(Debug, Clone, Default)]
pub struct ClassifierService {
    settings: ClassifierSettings,
}

impl ClassifierService {
    /// Blank labels are replaced by the defaults.
    pub fn new(settings: ClassifierSettings) -> Self {
        let defaults = ClassifierSettings::default();
        let label = |value: String, default: String| {
            if value.trim().is_empty() {
                default
            } else {
                value
            }
        };
        Self {
            settings: ClassifierSettings {
                cash_label: label(settings.cash_label, defaults.cash_label),
                revenue_label: label(settings.revenue_label, defaults.revenue_label),
                expense_label: label(settings.expense_label, defaults.expense_label),
                ..settings
            },
        }
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Classifies a transaction, consulting `oracle` at most once. Oracle
    /// failures and invalid responses fall back to [`Self::fallback`].
    pub fn classify(
        &self,
        transaction: &Transaction,
        chart: &ChartOfAccounts,
        context: ClassificationContext<'_>,
        oracle: Option<&dyn SuggestionOracle>,
    ) -> Classification {
        let Some(oracle) = oracle else {
            return self.fallback_with(transaction, chart, context, FallbackReason::NoOracle);
        };

        let request = self.request(transaction, chart, context);
        let raw = match oracle.suggest(&request) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(transaction = %transaction.id, error = %err, "oracle call failed; using fallback");
                return self.fallback_with(
                    transaction,
                    chart,
                    context,
                    FallbackReason::Unavailable(err),
                );
            }
        };

        match validate_response(&raw, transaction, chart) {
            SuggestionCheck::Valid(suggestion) => {
                debug!(
                    transaction = %transaction.id,
                    debit = %suggestion.posting.debit_account.name,
                    credit = %suggestion.posting.credit_account.name,
                    "accepted oracle suggestion"
                );
                Classification {
                    confidence: suggestion.confidence(),
                    posting: suggestion.posting,
                    source: ClassificationSource::Oracle,
                    account_suggestions: suggestion.account_suggestions,
                    entity_suggestion: suggestion.entity_suggestion,
                    document_suggestion: suggestion.document_suggestion,
                    additional_notes: suggestion.additional_notes,
                    fallback_reason: None,
                }
            }
            SuggestionCheck::Rejected(reason) => {
                warn!(transaction = %transaction.id, %reason, "rejected oracle suggestion; using fallback");
                self.fallback_with(transaction, chart, context, FallbackReason::Rejected(reason))
            }
        }
    }

    /// Classifies each transaction independently, preserving input order.
    pub fn classify_all(
        &self,
        transactions: &[Transaction],
        chart: &ChartOfAccounts,
        context: ClassificationContext<'_>,
        oracle: Option<&dyn SuggestionOracle>,
    ) -> Vec<Classification> {
        transactions
            .iter()
            .map(|transaction| self.classify(transaction, chart, context, oracle))
            .collect()
    }

    /// The deterministic posting for a transaction.
    pub fn fallback_posting(&self, transaction: &Transaction, chart: &ChartOfAccounts) -> Posting {
        let amount = transaction.magnitude();
        let (primary, cash) = self.select_accounts(transaction.is_income(), chart);
        let (debit_account, credit_account) = if transaction.is_income() {
            (cash, primary)
        } else {
            (primary, cash)
        };
        let explanation = explain(transaction.is_income(), &debit_account, &credit_account);
        Posting::new(debit_account, credit_account, amount, explanation).unwrap_or_else(|err| {
            warn!(transaction = %transaction.id, error = %err, "fallback accounts invalid; using default labels");
            default_posting(transaction.is_income(), amount)
        })
    }

    /// Deterministic classification with entity and document suggestions.
    pub fn fallback(
        &self,
        transaction: &Transaction,
        chart: &ChartOfAccounts,
        context: ClassificationContext<'_>,
    ) -> Classification {
        self.fallback_with(transaction, chart, context, FallbackReason::NoOracle)
    }

    fn fallback_with(
        &self,
        transaction: &Transaction,
        chart: &ChartOfAccounts,
        context: ClassificationContext<'_>,
        reason: FallbackReason,
    ) -> Classification {
        let posting = self.fallback_posting(transaction, chart);
        let income = transaction.is_income();
        let (primary, cash) = if income {
            (&posting.credit_account, &posting.debit_account)
        } else {
            (&posting.debit_account, &posting.credit_account)
        };
        let account_suggestions = vec![
            AccountSuggestion {
                account_name: primary.name.clone(),
                account_type: primary.account_type,
                confidence: Confidence::Medium,
                reason: "Selected from chart of accounts based on transaction type".into(),
            },
            AccountSuggestion {
                account_name: cash.name.clone(),
                account_type: cash.account_type,
                confidence: Confidence::Medium,
                reason: "Cash/bank account from chart of accounts".into(),
            },
        ];
        let entity_suggestion = match_entity(transaction, context);
        let document_suggestion = suggest_document(&entity_suggestion, transaction.magnitude());
        debug!(
            transaction = %transaction.id,
            debit = %posting.debit_account.name,
            credit = %posting.credit_account.name,
            "fallback classification"
        );
        Classification {
            posting,
            source: ClassificationSource::Fallback,
            confidence: Confidence::Low,
            account_suggestions,
            entity_suggestion,
            document_suggestion,
            additional_notes: FALLBACK_NOTES.into(),
            fallback_reason: Some(reason),
        }
    }

    /// Returns `(primary, cash_side)` per the first-match rules. The cash-side
    /// search skips the primary account so the two sides always differ.
    fn select_accounts(&self, income: bool, chart: &ChartOfAccounts) -> (AccountRef, AccountRef) {
        let (keyword, label, kind) = if income {
            ("revenue", &self.settings.revenue_label, AccountType::Income)
        } else {
            ("expense", &self.settings.expense_label, AccountType::Expense)
        };
        let primary = chart
            .find_first(|account| {
                !account.name.trim().is_empty()
                    && (contains_ignore_case(&account.name, keyword)
                        || contains_ignore_case(&account.sub_type, keyword))
            })
            .map(AccountRef::from)
            .unwrap_or_else(|| AccountRef::new(label.clone(), kind));

        let not_primary = |account: &&Account| !account.is_named(&primary.name);
        let cash = chart
            .find_first(|account| is_cash_like(account) && not_primary(account))
            .or_else(|| chart.find_first(|account| is_deposit_account(account) && not_primary(account)))
            .map(AccountRef::from)
            .unwrap_or_else(|| AccountRef::new(self.settings.cash_label.clone(), AccountType::Asset));
        // Only the label can collide: chart candidates already skip the primary.
        let cash = if cash.same_account(&primary) {
            AccountRef::new(
                format!("{} ({})", cash.name, AccountType::Asset.noun()),
                AccountType::Asset,
            )
        } else {
            cash
        };

        (primary, cash)
    }

    fn request<'a>(
        &self,
        transaction: &'a Transaction,
        chart: &'a ChartOfAccounts,
        context: ClassificationContext<'a>,
    ) -> OracleRequest<'a> {
        let accounts = chart.accounts();
        OracleRequest {
            transaction,
            chart_of_accounts_excerpt: &accounts[..accounts.len().min(self.settings.chart_excerpt_limit)],
            customers_excerpt: &context.customers
                [..context.customers.len().min(self.settings.entity_excerpt_limit)],
            vendors_excerpt: &context.vendors
                [..context.vendors.len().min(self.settings.entity_excerpt_limit)],
        }
    }
}

fn is_cash_like(account: &Account) -> bool {
    CASH_KEYWORDS
        .iter()
        .any(|keyword| contains_ignore_case(&account.name, keyword))
}

/// Second tier for charts that name the bank account by its kind only
/// (`Checking Account`, `Business Savings`).
fn is_deposit_account(account: &Account) -> bool {
    account.account_type == AccountType::Asset
        && DEPOSIT_KEYWORDS
            .iter()
            .any(|keyword| contains_ignore_case(&account.name, keyword))
}

/// Built-in labels, always distinct and non-empty.
fn default_posting(income: bool, amount: Money) -> Posting {
    let defaults = ClassifierSettings::default();
    let cash = AccountRef::new(defaults.cash_label, AccountType::Asset);
    let (debit_account, credit_account) = if income {
        (cash, AccountRef::new(defaults.revenue_label, AccountType::Income))
    } else {
        (AccountRef::new(defaults.expense_label, AccountType::Expense), cash)
    };
    let explanation = explain(income, &debit_account, &credit_account);
    Posting {
        debit_account,
        debit_amount: amount,
        credit_account,
        credit_amount: amount,
        explanation,
    }
}

fn explain(income: bool, debit: &AccountRef, credit: &AccountRef) -> String {
    let lead = if income { "Money received" } else { "Money spent" };
    format!(
        "{lead}: debit {} ({}, debit {}) and credit {} ({}, credit {}).",
        debit.name,
        debit.account_type.noun(),
        debit.account_type.debit_effect(),
        credit.name,
        credit.account_type.noun(),
        credit.account_type.credit_effect(),
    )
}

fn match_entity(transaction: &Transaction, context: ClassificationContext<'_>) -> EntitySuggestion {
    let matched = if transaction.is_income() {
        context
            .customers
            .iter()
            .find(|customer| customer.mentioned_in(&transaction.description))
            .map(|customer| (EntityKind::Customer, customer.name.clone()))
    } else {
        context
            .vendors
            .iter()
            .find(|vendor| vendor.mentioned_in(&transaction.description))
            .map(|vendor| (EntityKind::Vendor, vendor.name.clone()))
    };
    match matched {
        Some((kind, name)) => EntitySuggestion {
            kind,
            name,
            confidence: Confidence::Medium,
            reason: "Name appears in the transaction description".into(),
        },
        None => EntitySuggestion {
            kind: EntityKind::New,
            name: String::new(),
            confidence: Confidence::Low,
            reason: "No existing entities matched".into(),
        },
    }
}

fn suggest_document(entity: &EntitySuggestion, amount: Money) -> DocumentSuggestion {
    let (kind, reason) = match entity.kind {
        EntityKind::Customer => (DocumentKind::Invoice, "Income from a known customer"),
        EntityKind::Vendor => (DocumentKind::Bill, "Payment to a known vendor"),
        EntityKind::New => (DocumentKind::None, "Insufficient data for document creation"),
    };
    DocumentSuggestion {
        kind,
        service_or_expense: String::new(),
        amount,
        confidence: Confidence::Low,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(amount: f64, description: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description,
            Money::from_f64(amount),
        )
    }

    #[test]
    fn income_debits_cash_and_credits_revenue() {
        let chart = ChartOfAccounts::new(vec![
            Account::new("Checking Account", AccountType::Asset),
            Account::new("Service Revenue", AccountType::Income),
        ]);
        let service = ClassifierService::default();
        let posting = service.fallback_posting(&txn(2500.0, "Client payment"), &chart);

        assert_eq!(posting.debit_account, AccountRef::new("Checking Account", AccountType::Asset));
        assert_eq!(posting.credit_account, AccountRef::new("Service Revenue", AccountType::Income));
        assert_eq!(posting.debit_amount, Money::from_units(2500));
        assert_eq!(posting.credit_amount, Money::from_units(2500));
    }

    #[test]
    fn expense_with_empty_chart_uses_fallback_labels() {
        let posting = ClassifierService::default()
            .fallback_posting(&txn(-150.0, "Office supplies"), &ChartOfAccounts::default());

        assert_eq!(posting.debit_account.name, "General Expenses");
        assert_eq!(posting.debit_account.account_type, AccountType::Expense);
        assert_eq!(posting.credit_account.name, "Cash");
        assert_eq!(posting.debit_amount, Money::from_units(150));
        assert_eq!(posting.credit_amount, Money::from_units(150));
    }

    #[test]
    fn primary_match_considers_sub_type() {
        let chart = ChartOfAccounts::new(vec![
            Account::new("Rent", AccountType::Expense).with_sub_type("Operating Expense"),
            Account::new("Bank of Springfield", AccountType::Asset),
        ]);
        let posting = ClassifierService::default().fallback_posting(&txn(-900.0, "June rent"), &chart);
        assert_eq!(posting.debit_account.name, "Rent");
        assert_eq!(posting.credit_account.name, "Bank of Springfield");
    }

    #[test]
    fn cash_search_skips_primary_account() {
        let chart = ChartOfAccounts::new(vec![Account::new("Cash Sales Revenue", AccountType::Income)]);
        let posting = ClassifierService::default().fallback_posting(&txn(40.0, "Till"), &chart);
        assert_eq!(posting.credit_account.name, "Cash Sales Revenue");
        assert_eq!(posting.debit_account.name, "Cash");
        assert!(posting.is_balanced());
    }

    #[test]
    fn cash_label_colliding_with_primary_is_disambiguated() {
        let chart = ChartOfAccounts::new(vec![
            Account::new("Cash", AccountType::Income).with_sub_type("Cash Sales Revenue"),
        ]);
        let posting = ClassifierService::default().fallback_posting(&txn(40.0, "Till"), &chart);
        assert_eq!(posting.credit_account, AccountRef::new("Cash", AccountType::Income));
        assert_eq!(posting.debit_account, AccountRef::new("Cash (asset)", AccountType::Asset));
        assert!(posting.is_balanced());
    }

    #[test]
    fn colliding_custom_labels_still_post_two_accounts() {
        let settings = ClassifierSettings {
            cash_label: "Operations".into(),
            expense_label: "operations".into(),
            ..ClassifierSettings::default()
        };
        let posting = ClassifierService::new(settings)
            .fallback_posting(&txn(-5.0, "Coffee"), &ChartOfAccounts::default());
        assert!(posting.is_balanced());
        assert_eq!(posting.credit_account.name, "Operations (asset)");
    }

    #[test]
    fn blank_labels_and_unnamed_accounts_are_skipped() {
        let settings = ClassifierSettings {
            revenue_label: "  ".into(),
            ..ClassifierSettings::default()
        };
        let chart = ChartOfAccounts::new(vec![
            Account::new("", AccountType::Income).with_sub_type("Operating Revenue"),
        ]);
        let posting = ClassifierService::new(settings).fallback_posting(&txn(75.0, "Sale"), &chart);
        assert_eq!(posting.credit_account.name, "Service Revenue");
        assert!(posting.is_balanced());
    }

    #[test]
    fn cash_or_bank_name_beats_checking_account() {
        let chart = ChartOfAccounts::new(vec![
            Account::new("Checking Account", AccountType::Asset),
            Account::new("Cash on Hand", AccountType::Asset),
        ]);
        let posting = ClassifierService::default().fallback_posting(&txn(-10.0, "Fee"), &chart);
        assert_eq!(posting.credit_account.name, "Cash on Hand");
    }

    #[test]
    fn first_match_wins_in_chart_order() {
        let chart = ChartOfAccounts::new(vec![
            Account::new("Petty Cash", AccountType::Asset),
            Account::new("Main Bank", AccountType::Asset),
            Account::new("Product Revenue", AccountType::Income),
            Account::new("Service Revenue", AccountType::Income),
        ]);
        let posting = ClassifierService::default().fallback_posting(&txn(10.0, "Sale"), &chart);
        assert_eq!(posting.debit_account.name, "Petty Cash");
        assert_eq!(posting.credit_account.name, "Product Revenue");
    }

    #[test]
    fn custom_labels_are_honoured() {
        let settings = ClassifierSettings {
            cash_label: "Operating Account".into(),
            expense_label: "Sundry Expenses".into(),
            ..ClassifierSettings::default()
        };
        let posting = ClassifierService::new(settings)
            .fallback_posting(&txn(-5.0, "Coffee"), &ChartOfAccounts::default());
        assert_eq!(posting.debit_account.name, "Sundry Expenses");
        assert_eq!(posting.credit_account.name, "Operating Account");
    }

    #[test]
    fn explanation_names_both_accounts_and_polarity() {
        let posting = ClassifierService::default()
            .fallback_posting(&txn(-150.0, "Office supplies"), &ChartOfAccounts::default());
        assert_eq!(
            posting.explanation,
            "Money spent: debit General Expenses (expense, debit increases) and credit Cash (asset, credit decreases)."
        );
    }

    #[test]
    fn fallback_matches_vendor_and_suggests_bill() {
        let vendors = vec![Vendor::new("Staples")];
        let context = ClassificationContext::new(&[], &vendors);
        let result = ClassifierService::default().fallback(
            &txn(-42.5, "STAPLES STORE 1123"),
            &ChartOfAccounts::default(),
            context,
        );
        assert_eq!(result.entity_suggestion.kind, EntityKind::Vendor);
        assert_eq!(result.entity_suggestion.name, "Staples");
        assert_eq!(result.document_suggestion.kind, DocumentKind::Bill);
        assert_eq!(result.document_suggestion.amount, Money::from_cents(4250));
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn no_oracle_is_recorded_as_fallback_reason() {
        let result = ClassifierService::default().classify(
            &txn(1.0, "Sale"),
            &ChartOfAccounts::default(),
            ClassificationContext::default(),
            None,
        );
        assert!(result.is_fallback());
        assert_eq!(result.fallback_reason, Some(FallbackReason::NoOracle));
        assert_eq!(result.entity_suggestion.kind, EntityKind::New);
        assert_eq!(result.document_suggestion.kind, DocumentKind::None);
    }
}

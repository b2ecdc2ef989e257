use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::display::TerminalDisplay;

/// Pagination block of the backend's paged responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub size: u64,
    pub number: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,

    #[serde(default)]
    pub page: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

/// Monthly summary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub savings_rate: f64,
    #[serde(default)]
    pub top_expense_categories: Vec<CategorySummary>,
    #[serde(default)]
    pub top_income_categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: u64,
    pub description: String,
    pub initial_amount: f64,
    pub current_amount: f64,
    #[serde(default)]
    pub interest_rate: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub creditor_name: String,
    pub start_date: String,
    pub due_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub payment_progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtCreate {
    pub description: String,
    pub initial_amount: f64,
    pub interest_rate: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub creditor_name: String,
    pub start_date: String,
    pub due_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtUpdate {
    pub description: String,
    pub initial_amount: f64,
    pub interest_rate: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub creditor_name: String,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayment {
    pub id: u64,
    pub amount: f64,
    pub payment_date: String,
    #[serde(default)]
    pub notes: String,
    pub debt_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPaymentCreate {
    pub amount: f64,
    pub payment_date: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: String,
    pub target_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCreate {
    pub name: String,
    pub description: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: String,
    pub target_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub name: String,
    pub description: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: String,
    pub target_date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: u64,
    pub amount: f64,
    #[serde(default)]
    pub created_at: String,
    pub goal_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCreate {
    pub amount: f64,
}

/// One row of the recent transactions report, either an income or an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_type: String,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: u64,
    pub description: String,
    pub amount: f64,
    pub creation_date: String,
    #[serde(default)]
    pub category_id: u64,
    #[serde(default)]
    pub category_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCreate {
    pub description: String,
    pub amount: f64,
    pub creation_date: String,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: u64,
    pub description: String,
    pub amount: f64,
    pub creation_date: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub account_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeCreate {
    pub description: String,
    pub amount: f64,
    pub creation_date: String,
    pub source_name: String,
    pub account_name: String,
}

/// Categories, income sources and accounts share the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedItem {
    pub id: u64,
    pub name: String,
}

pub type Category = NamedItem;
pub type IncomeSource = NamedItem;
pub type Account = NamedItem;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthData {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomesVsExpenses {
    pub period: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    pub savings_rate: f64,
    /// Keyed by `YYYY-MM`.
    #[serde(default)]
    pub monthly_comparison: BTreeMap<String, MonthData>,
}

impl TerminalDisplay for Debt {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Description", "Creditor", "Current", "Initial", "Due", "Status"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.description,
            self.creditor_name,
            format_amount(self.current_amount),
            format_amount(self.initial_amount),
            self.due_date,
            self.status,
        ]
    }
}

impl TerminalDisplay for DebtPayment {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Amount", "Date", "Notes"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_amount(self.amount),
            self.payment_date,
            self.notes,
        ]
    }
}

impl TerminalDisplay for Goal {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Name", "Current", "Target", "Progress", "Target Date"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name,
            format_amount(self.current_amount),
            format_amount(self.target_amount),
            format!("{:.0}%", self.progress_percentage),
            self.target_date,
        ]
    }
}

impl TerminalDisplay for Deposit {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Amount", "Created"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_amount(self.amount),
            self.created_at,
        ]
    }
}

impl TerminalDisplay for Transaction {
    fn table_titles() -> Vec<&'static str> {
        vec!["Type", "Description", "Amount", "Category", "Date"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.transaction_type,
            self.description,
            format_amount(self.amount),
            self.category,
            self.date,
        ]
    }
}

impl TerminalDisplay for Expense {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Description", "Amount", "Category", "Date"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.description,
            format_amount(self.amount),
            self.category_name,
            self.creation_date,
        ]
    }
}

impl TerminalDisplay for Income {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Description", "Amount", "Source", "Account", "Date"]
    }

    fn table_row(self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.description,
            format_amount(self.amount),
            self.source_name,
            self.account_name,
            self.creation_date,
        ]
    }
}

impl TerminalDisplay for NamedItem {
    fn table_titles() -> Vec<&'static str> {
        vec!["ID", "Name"]
    }

    fn table_row(self) -> Vec<String> {
        vec![self.id.to_string(), self.name]
    }
}

fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

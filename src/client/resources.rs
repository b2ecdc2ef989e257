use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::finance::{
    Debt, DebtPayment, DebtPaymentCreate, Deposit, DepositCreate, Expense, Goal, Income,
    IncomesVsExpenses, NamedItem, Page, Report, Transaction, UserInfo,
};
use crate::types::request::{
    ExpenseFilter, IncomeFilter, IncomesVsExpensesQuery, PageQuery, SimplePage,
};

use super::{ApiRequest, Client, RequestError};

/// The backend collections that support create, update and delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Expenses,
    Incomes,
    Goals,
    Debts,
    Categories,
    IncomeSources,
    Accounts,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Expenses => "/auth/expenses",
            Self::Incomes => "/auth/incomes",
            Self::Goals => "/auth/goals",
            Self::Debts => "/auth/debts",
            Self::Categories => "/auth/categories",
            Self::IncomeSources => "/auth/income-sources",
            Self::Accounts => "/auth/accounts",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Expenses => "expenses",
            Self::Incomes => "incomes",
            Self::Goals => "goals",
            Self::Debts => "debts",
            Self::Categories => "categories",
            Self::IncomeSources => "income-sources",
            Self::Accounts => "accounts",
        }
    }

    /// Collections whose items are a bare `{id, name}` and are listed with plain
    /// `page`/`size` paging.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            Self::Categories | Self::IncomeSources | Self::Accounts
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Reads, used by the dashboard fetch. These are not retried: a failed dashboard
// load is surfaced and the caller refetches.
impl Client {
    pub async fn get_user_info(&self) -> Result<UserInfo, RequestError> {
        self.send(&ApiRequest::get("/auth/users/me")).await
    }

    pub async fn get_monthly_report(&self) -> Result<Report, RequestError> {
        self.send(&ApiRequest::get("/auth/reports/monthly-summary"))
            .await
    }

    pub async fn get_recent_transactions(&self) -> Result<Vec<Transaction>, RequestError> {
        let resp: Option<Vec<Transaction>> = self
            .send(&ApiRequest::get("/auth/reports/recent-transactions"))
            .await?;
        Ok(resp.unwrap_or_default())
    }

    pub async fn get_debts(&self, query: &PageQuery) -> Result<Page<Debt>, RequestError> {
        let req = ApiRequest::get(Collection::Debts.path()).query(query)?;
        self.send(&req).await
    }

    pub async fn get_goals(&self, query: &PageQuery) -> Result<Page<Goal>, RequestError> {
        let req = ApiRequest::get(Collection::Goals.path()).query(query)?;
        self.send(&req).await
    }

    pub async fn get_deposits(
        &self,
        goal_id: u64,
        query: &PageQuery,
    ) -> Result<Page<Deposit>, RequestError> {
        let req = ApiRequest::get(format!("/auth/goals/deposit/{goal_id}")).query(query)?;
        self.send(&req).await
    }

    pub async fn get_expenses(&self, filter: &ExpenseFilter) -> Result<Page<Expense>, RequestError> {
        let req = ApiRequest::get("/auth/expenses/filter").query(filter)?;
        self.send(&req).await
    }

    pub async fn get_incomes(&self, filter: &IncomeFilter) -> Result<Page<Income>, RequestError> {
        let req = ApiRequest::get("/auth/incomes/filter").query(filter)?;
        self.send(&req).await
    }

    /// List categories, income sources or accounts with full sorting parameters.
    pub async fn get_named(
        &self,
        collection: Collection,
        query: &PageQuery,
    ) -> Result<Page<NamedItem>, RequestError> {
        Self::check_named(collection)?;
        let req = ApiRequest::get(collection.path()).query(query)?;
        self.send(&req).await
    }

    pub async fn get_incomes_vs_expenses(
        &self,
        query: &IncomesVsExpensesQuery,
    ) -> Result<IncomesVsExpenses, RequestError> {
        let req = ApiRequest::get("/auth/reports/income-vs-expense").query(query)?;
        self.send(&req).await
    }
}

// Mutations and the detail screens' lookups, retried on network failures.
impl Client {
    pub async fn create<B: Serialize>(
        &self,
        collection: Collection,
        body: &B,
    ) -> Result<Value, RequestError> {
        let req = ApiRequest::post(collection.path()).json(body)?;
        self.send_with_retry(&req).await
    }

    pub async fn update<B: Serialize>(
        &self,
        collection: Collection,
        id: u64,
        body: &B,
    ) -> Result<Value, RequestError> {
        let req = ApiRequest::put(format!("{}/{id}", collection.path())).json(body)?;
        self.send_with_retry(&req).await
    }

    pub async fn delete(&self, collection: Collection, id: u64) -> Result<(), RequestError> {
        let req = ApiRequest::delete(format!("{}/{id}", collection.path()));
        let _: Value = self.send_with_retry(&req).await?;
        Ok(())
    }

    pub async fn post_deposit(
        &self,
        goal_id: u64,
        deposit: &DepositCreate,
    ) -> Result<Value, RequestError> {
        let req = ApiRequest::post(format!("/auth/goals/deposit/{goal_id}")).json(deposit)?;
        self.send_with_retry(&req).await
    }

    pub async fn post_debt_payment(
        &self,
        debt_id: u64,
        payment: &DebtPaymentCreate,
    ) -> Result<Value, RequestError> {
        let req = ApiRequest::post(format!("/auth/debts/{debt_id}/payment")).json(payment)?;
        self.send_with_retry(&req).await
    }

    pub async fn get_debt_payments(
        &self,
        debt_id: u64,
        page: SimplePage,
    ) -> Result<Page<DebtPayment>, RequestError> {
        let req = ApiRequest::get(format!("/auth/debts/{debt_id}/payments")).query(&page)?;
        self.send_with_retry(&req).await
    }

    /// List categories, income sources or accounts with plain paging.
    pub async fn list_named(
        &self,
        collection: Collection,
        page: SimplePage,
    ) -> Result<Page<NamedItem>, RequestError> {
        Self::check_named(collection)?;
        let req = ApiRequest::get(collection.path()).query(&page)?;
        self.send_with_retry(&req).await
    }

    fn check_named(collection: Collection) -> Result<(), RequestError> {
        if !collection.is_named() {
            return Err(RequestError::Client(format!(
                "'{collection}' is not a list of named items"
            )));
        }
        Ok(())
    }
}

pub mod factory;
pub mod options;

use std::future::Future;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::config::TtlPolicy;
use crate::cache::{Cache, CacheKey, DisableCache, Resource, UnionCache};
use crate::client::resources::Collection;
use crate::client::{Client, RequestError};
use crate::types::finance::{
    Account, Category, Debt, Deposit, Expense, Goal, Income, IncomeSource, IncomesVsExpenses,
    Page, Report, Transaction, UserInfo,
};

pub use options::{DepositsQuery, FetchOptions};

/// The loaded dashboard slots. Slots that were not requested stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub user_info: Option<UserInfo>,
    pub report: Option<Report>,
    pub debts: Option<Page<Debt>>,
    pub goals: Option<Page<Goal>>,
    pub deposits: Option<Page<Deposit>>,
    pub transactions: Option<Vec<Transaction>>,
    pub expenses: Option<Page<Expense>>,
    pub incomes: Option<Page<Income>>,
    pub categories: Option<Page<Category>>,
    pub income_sources: Option<Page<IncomeSource>>,
    pub accounts: Option<Page<Account>>,
    pub incomes_vs_expenses: Option<IncomesVsExpenses>,

    /// Every slot was served from the cache, no request was sent.
    #[serde(skip)]
    pub from_cache: bool,
}

impl FinancialSnapshot {
    /// What is still owed across the loaded debts.
    pub fn debts_value_summary(&self) -> f64 {
        match self.debts.as_ref() {
            Some(debts) => debts.content.iter().map(|d| d.current_amount).sum(),
            None => 0.0,
        }
    }

    pub fn goals_count(&self) -> usize {
        self.goals.as_ref().map(|g| g.content.len()).unwrap_or(0)
    }
}

/// Loads the financial dashboard through a TTL cache.
///
/// The cache is all or nothing per call: if every requested slot is fresh no request
/// is sent, otherwise every requested slot is fetched again, concurrently. Results are
/// written back only when all of the requests succeed. Mutations never touch the
/// cache; call [`FinancialData::refresh`] after one.
pub struct FinancialData {
    client: Arc<Client>,
    cache: Option<UnionCache>,
    no_cache: DisableCache,
    ttl: TtlPolicy,
}

impl FinancialData {
    pub fn new(client: Arc<Client>, cache: Option<UnionCache>, ttl: TtlPolicy) -> Self {
        Self {
            client,
            cache,
            no_cache: DisableCache,
            ttl,
        }
    }

    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    fn cache(&self) -> &dyn Cache {
        match self.cache.as_ref() {
            Some(cache) => cache,
            None => &self.no_cache,
        }
    }

    pub async fn fetch(&self, opts: &FetchOptions) -> Result<FinancialSnapshot, RequestError> {
        if opts.is_empty() {
            return Ok(FinancialSnapshot::default());
        }

        if !opts.disable_cache {
            if let Some(snapshot) = self.read_cache(opts) {
                debug!("All {} requested slots served from cache", opts.keys().len());
                return Ok(snapshot);
            }
        }

        let snapshot = self.fetch_remote(opts).await?;
        self.write_cache(opts, &snapshot);
        Ok(snapshot)
    }

    /// Drop every cached slot, including deposits of all goals, then fetch.
    pub async fn refresh(&self, opts: &FetchOptions) -> Result<FinancialSnapshot, RequestError> {
        self.invalidate(None);
        self.fetch(opts).await
    }

    pub fn invalidate(&self, key: Option<&CacheKey>) {
        if let Err(err) = self.cache().invalidate(key) {
            warn!("Invalidate cache failed: {err:#}");
        }
        match key {
            Some(key) => debug!("Cache entry '{key}' invalidated"),
            None => info!("Cache cleared"),
        }
    }

    /// Drop cached deposits of one goal, or of every goal.
    pub fn invalidate_deposits(&self, goal_id: Option<u64>) {
        let result = match goal_id {
            Some(goal_id) => self
                .cache()
                .invalidate(Some(&CacheKey::with_sub_key(Resource::Deposits, goal_id))),
            None => self.cache().invalidate_resource(Resource::Deposits),
        };
        if let Err(err) = result {
            warn!("Invalidate deposits cache failed: {err:#}");
        }
    }

    fn read_cache(&self, opts: &FetchOptions) -> Option<FinancialSnapshot> {
        let mut snapshot = FinancialSnapshot {
            from_cache: true,
            ..Default::default()
        };

        if opts.user_info {
            snapshot.user_info = Some(self.cached(CacheKey::new(Resource::UserInfo))?);
        }
        if opts.report {
            snapshot.report = Some(self.cached(CacheKey::new(Resource::Report))?);
        }
        if opts.debts.is_some() {
            snapshot.debts = Some(self.cached(CacheKey::new(Resource::Debts))?);
        }
        if opts.goals.is_some() {
            snapshot.goals = Some(self.cached(CacheKey::new(Resource::Goals))?);
        }
        if let Some(deposits) = opts.deposits.as_ref() {
            let key = CacheKey::with_sub_key(Resource::Deposits, deposits.goal_id);
            snapshot.deposits = Some(self.cached(key)?);
        }
        if opts.transactions {
            snapshot.transactions = Some(self.cached(CacheKey::new(Resource::Transactions))?);
        }
        if opts.expenses.is_some() {
            snapshot.expenses = Some(self.cached(CacheKey::new(Resource::Expenses))?);
        }
        if opts.incomes.is_some() {
            snapshot.incomes = Some(self.cached(CacheKey::new(Resource::Incomes))?);
        }
        if opts.categories.is_some() {
            snapshot.categories = Some(self.cached(CacheKey::new(Resource::Categories))?);
        }
        if opts.income_sources.is_some() {
            snapshot.income_sources = Some(self.cached(CacheKey::new(Resource::IncomeSources))?);
        }
        if opts.accounts.is_some() {
            snapshot.accounts = Some(self.cached(CacheKey::new(Resource::Accounts))?);
        }
        if opts.incomes_vs_expenses.is_some() {
            snapshot.incomes_vs_expenses =
                Some(self.cached(CacheKey::new(Resource::IncomesVsExpenses))?);
        }

        Some(snapshot)
    }

    fn cached<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let value = match self.cache().get(&key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("Cache miss for '{key}'");
                return None;
            }
            Err(err) => {
                warn!("Read cache '{key}' failed: {err:#}");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(err) => {
                warn!("Cached '{key}' has unexpected shape, ignoring it: {err}");
                None
            }
        }
    }

    async fn fetch_remote(&self, opts: &FetchOptions) -> Result<FinancialSnapshot, RequestError> {
        let client = self.client.as_ref();
        debug!("Fetching {} slots from server", opts.keys().len());

        let (
            user_info,
            report,
            debts,
            goals,
            deposits,
            transactions,
            expenses,
            incomes,
            categories,
            income_sources,
            accounts,
            incomes_vs_expenses,
        ) = tokio::try_join!(
            when(opts.user_info.then(|| client.get_user_info())),
            when(opts.report.then(|| client.get_monthly_report())),
            when(opts.debts.as_ref().map(|q| client.get_debts(q))),
            when(opts.goals.as_ref().map(|q| client.get_goals(q))),
            when(
                opts.deposits
                    .as_ref()
                    .map(|d| client.get_deposits(d.goal_id, &d.query))
            ),
            when(opts.transactions.then(|| client.get_recent_transactions())),
            when(opts.expenses.as_ref().map(|f| client.get_expenses(f))),
            when(opts.incomes.as_ref().map(|f| client.get_incomes(f))),
            when(
                opts.categories
                    .as_ref()
                    .map(|q| client.get_named(Collection::Categories, q))
            ),
            when(
                opts.income_sources
                    .as_ref()
                    .map(|q| client.get_named(Collection::IncomeSources, q))
            ),
            when(
                opts.accounts
                    .as_ref()
                    .map(|q| client.get_named(Collection::Accounts, q))
            ),
            when(
                opts.incomes_vs_expenses
                    .as_ref()
                    .map(|q| client.get_incomes_vs_expenses(q))
            ),
        )?;

        Ok(FinancialSnapshot {
            user_info,
            report,
            debts,
            goals,
            deposits,
            transactions,
            expenses,
            incomes,
            categories,
            income_sources,
            accounts,
            incomes_vs_expenses,
            from_cache: false,
        })
    }

    fn write_cache(&self, opts: &FetchOptions, snapshot: &FinancialSnapshot) {
        self.store(CacheKey::new(Resource::UserInfo), &snapshot.user_info);
        self.store(CacheKey::new(Resource::Report), &snapshot.report);
        self.store(CacheKey::new(Resource::Debts), &snapshot.debts);
        self.store(CacheKey::new(Resource::Goals), &snapshot.goals);
        if let Some(deposits) = opts.deposits.as_ref() {
            let key = CacheKey::with_sub_key(Resource::Deposits, deposits.goal_id);
            self.store(key, &snapshot.deposits);
        }
        self.store(CacheKey::new(Resource::Transactions), &snapshot.transactions);
        self.store(CacheKey::new(Resource::Expenses), &snapshot.expenses);
        self.store(CacheKey::new(Resource::Incomes), &snapshot.incomes);
        self.store(CacheKey::new(Resource::Categories), &snapshot.categories);
        self.store(
            CacheKey::new(Resource::IncomeSources),
            &snapshot.income_sources,
        );
        self.store(CacheKey::new(Resource::Accounts), &snapshot.accounts);
        self.store(
            CacheKey::new(Resource::IncomesVsExpenses),
            &snapshot.incomes_vs_expenses,
        );
    }

    fn store<T: Serialize>(&self, key: CacheKey, data: &Option<T>) {
        let data = match data {
            Some(data) => data,
            None => return,
        };
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(err) => {
                warn!("Encode '{key}' for cache failed: {err}");
                return;
            }
        };
        if let Err(err) = self.cache().set(key, value, self.ttl.ttl(key.resource)) {
            warn!("Write cache '{key}' failed: {err:#}");
        }
    }
}

async fn when<T, F>(fut: Option<F>) -> Result<Option<T>, RequestError>
where
    F: Future<Output = Result<T, RequestError>>,
{
    match fut {
        Some(fut) => fut.await.map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::finance::PageInfo;

    fn debt(id: u64, current_amount: f64) -> Debt {
        Debt {
            id,
            description: format!("debt {id}"),
            initial_amount: 1000.0,
            current_amount,
            interest_rate: 0.0,
            kind: String::from("LOAN"),
            creditor_name: String::from("Bank"),
            start_date: String::from("2026-01-01"),
            due_date: String::from("2027-01-01"),
            status: String::from("ACTIVE"),
            created_at: String::new(),
            payment_progress: 0.0,
        }
    }

    #[test]
    fn test_snapshot_summary() {
        let mut snapshot = FinancialSnapshot::default();
        assert_eq!(snapshot.debts_value_summary(), 0.0);
        assert_eq!(snapshot.goals_count(), 0);

        snapshot.debts = Some(Page {
            content: vec![debt(1, 250.5), debt(2, 100.0)],
            page: PageInfo::default(),
        });
        assert_eq!(snapshot.debts_value_summary(), 350.5);
    }
}

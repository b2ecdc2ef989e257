use crate::cache::{CacheKey, Resource};
use crate::types::request::{ExpenseFilter, IncomeFilter, IncomesVsExpensesQuery, PageQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositsQuery {
    pub goal_id: u64,
    pub query: PageQuery,
}

/// Which dashboard slots to load. A slot is requested when its field is set; the
/// value carries the query parameters of the backend call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub user_info: bool,
    pub report: bool,
    pub debts: Option<PageQuery>,
    pub goals: Option<PageQuery>,
    pub deposits: Option<DepositsQuery>,
    pub transactions: bool,
    pub expenses: Option<ExpenseFilter>,
    pub incomes: Option<IncomeFilter>,
    pub categories: Option<PageQuery>,
    pub income_sources: Option<PageQuery>,
    pub accounts: Option<PageQuery>,
    pub incomes_vs_expenses: Option<IncomesVsExpensesQuery>,

    /// Skip the cache lookup. Fetched data is still written to the cache.
    pub disable_cache: bool,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slots of the home screen.
    pub fn dashboard() -> Self {
        Self::new()
            .with_user_info()
            .with_report()
            .with_transactions()
            .with_incomes_vs_expenses(IncomesVsExpensesQuery::default())
    }

    /// Request `resource` with its default query. Deposits need a goal id and are
    /// requested with [`FetchOptions::with_deposits`] instead.
    pub fn with_resource(self, resource: Resource) -> Self {
        match resource {
            Resource::UserInfo => self.with_user_info(),
            Resource::Report => self.with_report(),
            Resource::Debts => self.with_debts(PageQuery::newest()),
            Resource::Goals => self.with_goals(PageQuery::newest()),
            Resource::Deposits => self,
            Resource::Transactions => self.with_transactions(),
            Resource::Expenses => self.with_expenses(ExpenseFilter::default()),
            Resource::Incomes => self.with_incomes(IncomeFilter::default()),
            Resource::Categories => self.with_categories(PageQuery::by_name()),
            Resource::IncomeSources => self.with_income_sources(PageQuery::by_name()),
            Resource::Accounts => self.with_accounts(PageQuery::by_name()),
            Resource::IncomesVsExpenses => {
                self.with_incomes_vs_expenses(IncomesVsExpensesQuery::default())
            }
        }
    }

    pub fn with_user_info(mut self) -> Self {
        self.user_info = true;
        self
    }

    pub fn with_report(mut self) -> Self {
        self.report = true;
        self
    }

    pub fn with_debts(mut self, query: PageQuery) -> Self {
        self.debts = Some(query);
        self
    }

    pub fn with_goals(mut self, query: PageQuery) -> Self {
        self.goals = Some(query);
        self
    }

    pub fn with_deposits(mut self, goal_id: u64, query: PageQuery) -> Self {
        self.deposits = Some(DepositsQuery { goal_id, query });
        self
    }

    pub fn with_transactions(mut self) -> Self {
        self.transactions = true;
        self
    }

    pub fn with_expenses(mut self, filter: ExpenseFilter) -> Self {
        self.expenses = Some(filter);
        self
    }

    pub fn with_incomes(mut self, filter: IncomeFilter) -> Self {
        self.incomes = Some(filter);
        self
    }

    pub fn with_categories(mut self, query: PageQuery) -> Self {
        self.categories = Some(query);
        self
    }

    pub fn with_income_sources(mut self, query: PageQuery) -> Self {
        self.income_sources = Some(query);
        self
    }

    pub fn with_accounts(mut self, query: PageQuery) -> Self {
        self.accounts = Some(query);
        self
    }

    pub fn with_incomes_vs_expenses(mut self, query: IncomesVsExpensesQuery) -> Self {
        self.incomes_vs_expenses = Some(query);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.disable_cache = true;
        self
    }

    /// Cache keys of every requested slot.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys = Vec::new();
        let singletons = [
            (self.user_info, Resource::UserInfo),
            (self.report, Resource::Report),
            (self.debts.is_some(), Resource::Debts),
            (self.goals.is_some(), Resource::Goals),
            (self.transactions, Resource::Transactions),
            (self.expenses.is_some(), Resource::Expenses),
            (self.incomes.is_some(), Resource::Incomes),
            (self.categories.is_some(), Resource::Categories),
            (self.income_sources.is_some(), Resource::IncomeSources),
            (self.accounts.is_some(), Resource::Accounts),
            (self.incomes_vs_expenses.is_some(), Resource::IncomesVsExpenses),
        ];
        for (requested, resource) in singletons {
            if requested {
                keys.push(CacheKey::new(resource));
            }
        }
        if let Some(deposits) = self.deposits.as_ref() {
            keys.push(CacheKey::with_sub_key(Resource::Deposits, deposits.goal_id));
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use fintrack::cache::Resource;
use fintrack::config::ConfigArgs;
use fintrack::display::{self, DisplayStyle, TerminalDisplay};
use fintrack::finance::factory::FinancialDataFactory;
use fintrack::finance::{FetchOptions, FinancialSnapshot};
use fintrack::types::finance::Page;
use fintrack::types::request::{
    Direction, ExpenseFilter, FilterType, IncomeFilter, IncomesVsExpensesQuery, PageQuery,
};
use serde::Serialize;

use super::{build_client, RunCommand};

/// Fetch financial data from the server.
#[derive(Args)]
pub struct GetArgs {
    /// The resource to fetch.
    pub resource: Resource,

    /// The goal whose deposits to fetch, required by `deposits`.
    #[arg(long)]
    pub goal_id: Option<u64>,

    /// The page number to query, starting at 0.
    #[arg(long)]
    pub page: Option<u64>,

    /// The number of items per page.
    #[arg(long)]
    pub size: Option<u64>,

    /// Field to sort by, e.g. `createdAt` or `name`.
    #[arg(long)]
    pub sort_by: Option<String>,

    #[arg(long)]
    pub direction: Option<Direction>,

    /// Period filter of expenses and incomes.
    #[arg(long)]
    pub filter: Option<FilterType>,

    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub month: Option<u32>,

    /// Number of months of the incomes vs expenses report.
    #[arg(long)]
    pub months: Option<u32>,

    /// Last month of the incomes vs expenses report, `YYYY-MM`.
    #[arg(long)]
    pub period: Option<String>,

    /// The display style.
    #[arg(short, long, default_value = "table")]
    pub output: DisplayStyle,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for GetArgs {
    async fn run(&self) -> Result<()> {
        let opts = self.build_options()?;

        let ps = self.config.build_path_set()?;
        let client = build_client(&self.config)?;
        let data = FinancialDataFactory::load(&ps)?.build(client)?;

        let snapshot = data.fetch(&opts).await?;
        self.display(snapshot)
    }
}

impl GetArgs {
    fn build_options(&self) -> Result<FetchOptions> {
        let opts = FetchOptions::new();
        let opts = match self.resource {
            Resource::Debts => opts.with_debts(self.page_query(PageQuery::newest())),
            Resource::Goals => opts.with_goals(self.page_query(PageQuery::newest())),
            Resource::Deposits => {
                let goal_id = match self.goal_id {
                    Some(goal_id) => goal_id,
                    None => bail!("--goal-id is required to fetch deposits"),
                };
                opts.with_deposits(goal_id, self.page_query(PageQuery::newest()))
            }
            Resource::Categories => opts.with_categories(self.page_query(PageQuery::by_name())),
            Resource::IncomeSources => {
                opts.with_income_sources(self.page_query(PageQuery::by_name()))
            }
            Resource::Accounts => opts.with_accounts(self.page_query(PageQuery::by_name())),
            Resource::Expenses => opts.with_expenses(self.expense_filter()),
            Resource::Incomes => opts.with_incomes(self.income_filter()),
            Resource::IncomesVsExpenses => {
                let mut query = IncomesVsExpensesQuery::default();
                if let Some(months) = self.months {
                    query.months = months;
                }
                if let Some(period) = self.period.as_ref() {
                    query.period = period.clone();
                }
                opts.with_incomes_vs_expenses(query)
            }
            resource => opts.with_resource(resource),
        };
        Ok(opts)
    }

    fn page_query(&self, mut query: PageQuery) -> PageQuery {
        if let Some(page) = self.page {
            query.page = page;
        }
        if let Some(size) = self.size {
            query.size = size;
        }
        if let Some(sort_by) = self.sort_by.as_ref() {
            query.sort_by = sort_by.clone();
        }
        if let Some(direction) = self.direction {
            query.direction = direction;
        }
        query
    }

    fn expense_filter(&self) -> ExpenseFilter {
        let base = ExpenseFilter::default();
        let query = self.page_query(PageQuery {
            page: base.page,
            size: base.size,
            sort_by: base.sort_by.clone(),
            direction: base.direction,
        });
        ExpenseFilter {
            kind: self.filter.unwrap_or(base.kind),
            year: self.year,
            month: self.month,
            page: query.page,
            size: query.size,
            sort_by: query.sort_by,
            direction: query.direction,
        }
    }

    fn income_filter(&self) -> IncomeFilter {
        let expense = self.expense_filter();
        IncomeFilter {
            kind: expense.kind,
            year: expense.year,
            month: expense.month,
            source_name: None,
            account_type: None,
            page: expense.page,
            size: expense.size,
            sort_by: expense.sort_by,
            direction: expense.direction,
        }
    }

    fn display(&self, snapshot: FinancialSnapshot) -> Result<()> {
        let style = self.output;
        match self.resource {
            Resource::UserInfo => display::display_json(snapshot.user_info),
            Resource::Report => display::display_json(snapshot.report),
            Resource::IncomesVsExpenses => display::display_json(snapshot.incomes_vs_expenses),
            Resource::Debts => {
                let total = snapshot.debts_value_summary();
                show_page(snapshot.debts, style)?;
                if matches!(style, DisplayStyle::Table) {
                    println!("Total owed: {total:.2}");
                }
                Ok(())
            }
            Resource::Goals => {
                let count = snapshot.goals_count();
                show_page(snapshot.goals, style)?;
                if matches!(style, DisplayStyle::Table) {
                    println!("Goals on this page: {count}");
                }
                Ok(())
            }
            Resource::Deposits => show_page(snapshot.deposits, style),
            Resource::Transactions => {
                display::display_list(snapshot.transactions.unwrap_or_default(), style)
            }
            Resource::Expenses => show_page(snapshot.expenses, style),
            Resource::Incomes => show_page(snapshot.incomes, style),
            Resource::Categories => show_page(snapshot.categories, style),
            Resource::IncomeSources => show_page(snapshot.income_sources, style),
            Resource::Accounts => show_page(snapshot.accounts, style),
        }
    }
}

fn show_page<T>(page: Option<Page<T>>, style: DisplayStyle) -> Result<()>
where
    T: Serialize + TerminalDisplay,
{
    match page {
        Some(page) => display::display_page(page, style),
        None => {
            println!("<no data>");
            Ok(())
        }
    }
}

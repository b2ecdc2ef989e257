use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::table::Table;
use crate::types::finance::Page;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DisplayStyle {
    Table,
    Json,
}

/// Types that know how to render themselves as a table row.
pub trait TerminalDisplay {
    fn table_titles() -> Vec<&'static str>;
    fn table_row(self) -> Vec<String>;
}

pub fn display_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}

pub fn display_list<T: Serialize + TerminalDisplay>(list: Vec<T>, style: DisplayStyle) -> Result<()> {
    match style {
        DisplayStyle::Table => {
            if list.is_empty() {
                println!("<empty list>");
                return Ok(());
            }
            let mut table = Table::with_capacity(list.len() + 1);
            let titles = T::table_titles();
            table.add(titles.iter().map(|s| s.to_string()).collect());

            for item in list {
                table.add(item.table_row());
            }

            table.show();
        }
        DisplayStyle::Json => display_json(list)?,
    }
    Ok(())
}

pub fn display_page<T: Serialize + TerminalDisplay>(page: Page<T>, style: DisplayStyle) -> Result<()> {
    if matches!(style, DisplayStyle::Json) {
        return display_json(page);
    }

    let info = page.page.clone();
    display_list(page.content, style)?;
    if info.total_pages > 0 {
        println!(
            "Page {}/{}, total {}",
            info.number + 1,
            info.total_pages,
            info.total_elements
        );
    }
    Ok(())
}

use std::io::{self, IsTerminal, Write};

use anyhow::bail;
use dialoguer::{Input, Select};

use super::{write_records, write_summary, write_update};
use crate::{
    domain::record::{EXPENSE, INCOME},
    Ledger, Record, SearchQuery, UpdateRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Balance,
    Add,
    Edit,
    Search,
    Quit,
}

impl Action {
    const ALL: [Action; 5] = [
        Action::Balance,
        Action::Add,
        Action::Edit,
        Action::Search,
        Action::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::Balance => "Show the current balance, income and expenses",
            Action::Add => "Add a new income or expense record",
            Action::Edit => "Edit existing records",
            Action::Search => "Find records by date, category or amount",
            Action::Quit => "Quit",
        }
    }
}

/// Menu loop over `ledger`. Returns when the user quits or cancels the menu.
///
/// Prompts are drawn on the terminal; results of each action go to `out`.
pub fn run(ledger: &Ledger, mut out: impl Write) -> anyhow::Result<()> {
    if !io::stdin().is_terminal() {
        bail!("the interactive menu needs a terminal, use a subcommand instead");
    }

    let labels: Vec<_> = Action::ALL.iter().map(|action| action.label()).collect();

    loop {
        let Some(choice) = Select::new()
            .with_prompt("Choose an action")
            .items(&labels)
            .default(0)
            .interact_opt()?
        else {
            return Ok(());
        };

        let outcome = match Action::ALL[choice] {
            Action::Balance => show_balance(ledger, &mut out),
            Action::Add => add(ledger, &ask_record()?, &mut out),
            Action::Edit => edit(ledger, &ask_update()?, &mut out),
            Action::Search => find(ledger, &ask_query()?, &mut out),
            Action::Quit => return Ok(()),
        };

        // A failed action is reported and the menu stays open.
        if let Err(err) = outcome {
            writeln!(out, "Error: {err:#}")?;
        }
        writeln!(out)?;
    }
}

fn ask(prompt: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

/// Blank answers mean "skip this field".
fn ask_optional(prompt: &str) -> anyhow::Result<Option<String>> {
    let value = ask(&format!("{prompt} (leave empty to skip)"))?;
    Ok(Some(value).filter(|value| !value.is_empty()))
}

fn ask_record() -> anyhow::Result<Record> {
    let date = ask("Date")?;
    let categories = [EXPENSE, INCOME];
    let category = Select::new()
        .with_prompt("Category")
        .items(&categories)
        .default(0)
        .interact()?;
    let amount = ask("Amount")?;
    let description = ask("Description")?;

    Ok(Record::new(date, categories[category], amount, description))
}

fn ask_update() -> anyhow::Result<UpdateRequest> {
    Ok(UpdateRequest {
        date: ask("Date")?,
        category: ask_optional("New category")?,
        amount: ask_optional("New amount")?,
        description: ask_optional("New description")?,
    })
}

fn ask_query() -> anyhow::Result<SearchQuery> {
    Ok(SearchQuery {
        date: ask_optional("Date")?,
        category: ask_optional("Category")?,
        amount: ask_optional("Amount")?,
    })
}

fn show_balance(ledger: &Ledger, out: &mut impl Write) -> anyhow::Result<()> {
    write_summary(out, &ledger.summarize()?)?;
    Ok(())
}

fn add(ledger: &Ledger, record: &Record, out: &mut impl Write) -> anyhow::Result<()> {
    ledger.append(record)?;
    writeln!(out, "New record added.")?;
    Ok(())
}

fn edit(ledger: &Ledger, request: &UpdateRequest, out: &mut impl Write) -> anyhow::Result<()> {
    write_update(out, &ledger.update(request)?)?;
    Ok(())
}

fn find(ledger: &Ledger, query: &SearchQuery, out: &mut impl Write) -> anyhow::Result<()> {
    write_records(out, &ledger.search(query)?)
}

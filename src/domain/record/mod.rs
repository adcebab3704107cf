use serde::Serialize;

/// Category value that decreases the balance. Every other category counts as income.
pub const EXPENSE: &str = "Expense";
pub const INCOME: &str = "Income";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Income,
    Expense,
}

impl Category {
    /// Classify a raw category cell. The comparison is exact and case-sensitive.
    pub fn classify(raw: &str) -> Self {
        if raw == EXPENSE {
            Self::Expense
        } else {
            Self::Income
        }
    }
}

/// One ledger line.
///
/// All fields are kept as text exactly as stored in the file, so a record read from a ledger
/// can be written back unchanged even when its amount is not a valid number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

impl Record {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            description: description.into(),
        }
    }

    /// Build a record from positional cells. Missing cells become empty strings and cells past
    /// the fourth are ignored.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let mut fields = fields.into_iter().map(str::to_owned);
        let mut next = || fields.next().unwrap_or_default();

        Self {
            date: next(),
            category: next(),
            amount: next(),
            description: next(),
        }
    }

    pub fn kind(&self) -> Category {
        Category::classify(&self.category)
    }

    pub fn fields(&self) -> [&str; 4] {
        [&self.date, &self.category, &self.amount, &self.description]
    }
}

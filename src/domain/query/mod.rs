use super::record::Record;

/// Treat empty strings as "not supplied", the way an interactive prompt left blank does.
fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Field-equality search. A record matches when any supplied criterion matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub date: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        supplied(&self.date).is_none()
            && supplied(&self.category).is_none()
            && supplied(&self.amount).is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        [
            (supplied(&self.date), record.date.as_str()),
            (supplied(&self.category), record.category.as_str()),
            (supplied(&self.amount), record.amount.as_str()),
        ]
        .into_iter()
        .any(|(criterion, value)| criterion == Some(value))
    }
}

/// In-place edit of every record whose date equals `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    pub date: String,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
}

impl UpdateRequest {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.date == self.date
    }

    /// Overwrite the supplied fields of `record`. Returns whether anything changed.
    pub fn apply(&self, record: &mut Record) -> bool {
        let mut changed = false;

        for (replacement, field) in [
            (supplied(&self.category), &mut record.category),
            (supplied(&self.amount), &mut record.amount),
            (supplied(&self.description), &mut record.description),
        ] {
            if let Some(replacement) = replacement.filter(|value| *value != field.as_str()) {
                *field = replacement.to_owned();
                changed = true;
            }
        }

        changed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// At least one record carried the requested date.
    pub updated: bool,
    pub matched: usize,
}

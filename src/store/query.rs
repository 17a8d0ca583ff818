//! Builder for the query string understood by the database REST layer.
//!
//! Filters are rendered as `column=operator.value` pairs, so a lookup like
//! `Query::new().eq("cnpj", "12345678000199").limit(1)` becomes
//! `?cnpj=eq.12345678000199&limit=1`.

use std::fmt::Display;

/// Sort direction of an `order` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projection, including embedded resources such as `*,conveniados(nome_fantasia)`.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "neq", value)
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn filter(mut self, column: &str, operator: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("{}.{}", operator, value)));
        self
    }

    /// Renders the query as key/value pairs, ready to be url-encoded.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);

        pairs.push((
            "select".to_string(),
            self.select.clone().unwrap_or_else(|| "*".to_string()),
        ));
        pairs.extend(self.filters.iter().cloned());

        if let Some((ref column, direction)) = self.order {
            pairs.push((
                "order".to_string(),
                format!("{}.{}", column, direction.as_str()),
            ));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }
}

//! Dynamic WHERE clause for dashboard filters over the `farms f` alias.

use crate::models::dashboard::DashboardFilter;

/// A positional parameter referenced by the generated clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterBind {
    Text(String),
    Number(f64),
}

/// Conditions over `farms f`, in bind order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmConditions {
    pub conditions: Vec<String>,
    pub binds: Vec<FilterBind>,
}

impl FarmConditions {
    /// Build the qualifying-population predicate for a filter.
    pub fn from_filter(filter: &DashboardFilter) -> Self {
        let mut out = Self::default();

        if let Some(state) = filter.state_code() {
            let n = out.push(FilterBind::Text(state.to_string()));
            out.conditions.push(format!("f.state = ${n}"));
        }
        if let Some(min) = filter.area_min {
            let n = out.push(FilterBind::Number(min));
            out.conditions.push(format!("f.total_area >= ${n}"));
        }
        if let Some(max) = filter.area_max {
            let n = out.push(FilterBind::Number(max));
            out.conditions.push(format!("f.total_area <= ${n}"));
        }
        if let Some(search) = filter.search_text() {
            let n = out.push(FilterBind::Text(format!("%{}%", escape_like(search))));
            out.conditions.push(format!(
                "(f.name ILIKE ${n} OR f.city ILIKE ${n} OR f.state ILIKE ${n})"
            ));
        }
        if let Some(crop) = filter.crop_name() {
            let n = out.push(FilterBind::Text(crop.to_string()));
            out.conditions.push(format!(
                "EXISTS (SELECT 1 FROM crops fc WHERE fc.farm_id = f.id AND fc.name = ${n})"
            ));
        }

        out
    }

    fn push(&mut self, bind: FilterBind) -> usize {
        self.binds.push(bind);
        self.binds.len()
    }

    /// Add a parameterless condition.
    pub fn and(mut self, condition: &str) -> Self {
        self.conditions.push(condition.to_string());
        self
    }

    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside ILIKE.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Bind every filter parameter, in order, onto a `query_as` or `query_scalar`.
macro_rules! bind_filters {
    ($query:expr, $binds:expr) => {{
        let mut query = $query;
        for bind in $binds {
            query = match bind {
                $crate::repositories::filters::FilterBind::Text(text) => query.bind(text.clone()),
                $crate::repositories::filters::FilterBind::Number(n) => query.bind(*n),
            };
        }
        query
    }};
}

pub(crate) use bind_filters;

//! Listing query composer.
//!
//! A [`PersonFilter`] compiles to an ordered list of typed predicates which
//! are pushed into a `QueryBuilder` with bound parameters. Field order is
//! fixed (name, surname, age-min, age-max, gender), so the same filter
//! always yields the same SQL text and placeholder numbering.

use people_core::{PageRequest, PersonFilter};
use sqlx::{Postgres, QueryBuilder};

pub const PEOPLE_FROM: &str = "FROM people p JOIN info i ON p.id = i.person_id WHERE 1 = 1";

pub const PEOPLE_COLUMNS: &str =
    "SELECT p.id, p.name, p.surname, p.patronymic, i.age, i.gender, i.gender_probability";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Surname,
    Age,
    Gender,
}

impl Column {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Name => "p.name",
            Self::Surname => "p.surname",
            Self::Age => "i.age",
            Self::Gender => "i.gender",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    AtLeast,
    AtMost,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Int(i32),
}

/// One `AND <column> <op> $n` clause and the value bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: Column,
    pub comparison: Comparison,
    pub value: FilterValue,
}

impl Predicate {
    fn new(column: Column, comparison: Comparison, value: FilterValue) -> Self {
        Self {
            column,
            comparison,
            value,
        }
    }
}

/// Compile the present filter fields in their fixed order.
pub fn predicates(filter: &PersonFilter) -> Vec<Predicate> {
    let mut out = Vec::with_capacity(5);

    if let Some(name) = &filter.name {
        out.push(Predicate::new(
            Column::Name,
            Comparison::Eq,
            FilterValue::Text(name.clone()),
        ));
    }
    if let Some(surname) = &filter.surname {
        out.push(Predicate::new(
            Column::Surname,
            Comparison::Eq,
            FilterValue::Text(surname.clone()),
        ));
    }
    if let Some(min) = filter.age_min {
        out.push(Predicate::new(
            Column::Age,
            Comparison::AtLeast,
            FilterValue::Int(min),
        ));
    }
    if let Some(max) = filter.age_max {
        out.push(Predicate::new(
            Column::Age,
            Comparison::AtMost,
            FilterValue::Int(max),
        ));
    }
    if let Some(gender) = &filter.gender {
        out.push(Predicate::new(
            Column::Gender,
            Comparison::Eq,
            FilterValue::Text(gender.clone()),
        ));
    }

    out
}

pub fn push_predicates(qb: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    for p in predicates {
        qb.push(" AND ")
            .push(p.column.as_sql())
            .push(" ")
            .push(p.comparison.as_sql())
            .push(" ");
        match &p.value {
            FilterValue::Text(s) => qb.push_bind(s.clone()),
            FilterValue::Int(n) => qb.push_bind(*n),
        };
    }
}

/// `LIMIT $n OFFSET $n+1` with `limit = per_page`, `offset = (page - 1) * per_page`.
pub fn push_pagination(qb: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    qb.push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
}

/// `SELECT COUNT(*)` over the filtered join, ignoring pagination.
pub fn count_query(predicates: &[Predicate]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) {PEOPLE_FROM}"));
    push_predicates(&mut qb, predicates);
    qb
}

/// The filtered join for one page, ordered by id.
pub fn page_query(predicates: &[Predicate], page: PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("{PEOPLE_COLUMNS} {PEOPLE_FROM}"));
    push_predicates(&mut qb, predicates);
    qb.push(" ORDER BY p.id");
    push_pagination(&mut qb, page);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_filter() -> PersonFilter {
        PersonFilter {
            name: Some("Alice".into()),
            surname: Some("Smith".into()),
            age_min: Some(20),
            age_max: Some(40),
            gender: Some("female".into()),
        }
    }

    #[test]
    fn empty_filter_has_no_predicates() {
        assert!(predicates(&PersonFilter::default()).is_empty());
        let qb = count_query(&[]);
        assert_eq!(qb.sql(), format!("SELECT COUNT(*) {PEOPLE_FROM}"));
    }

    #[test]
    fn predicates_follow_fixed_field_order() {
        let preds = predicates(&full_filter());
        let shape: Vec<(Column, Comparison)> =
            preds.iter().map(|p| (p.column, p.comparison)).collect();
        assert_eq!(
            shape,
            vec![
                (Column::Name, Comparison::Eq),
                (Column::Surname, Comparison::Eq),
                (Column::Age, Comparison::AtLeast),
                (Column::Age, Comparison::AtMost),
                (Column::Gender, Comparison::Eq),
            ]
        );
        assert_eq!(preds[2].value, FilterValue::Int(20));
        assert_eq!(preds[4].value, FilterValue::Text("female".into()));
    }

    #[test]
    fn count_query_numbers_placeholders_in_order() {
        let qb = count_query(&predicates(&full_filter()));
        assert_eq!(
            qb.sql(),
            format!(
                "SELECT COUNT(*) {PEOPLE_FROM} AND p.name = $1 AND p.surname = $2 \
                 AND i.age >= $3 AND i.age <= $4 AND i.gender = $5"
            )
        );
    }

    #[test]
    fn sparse_filter_renumbers_placeholders() {
        let filter = PersonFilter {
            surname: Some("Smith".into()),
            gender: Some("male".into()),
            ..Default::default()
        };
        let qb = count_query(&predicates(&filter));
        assert!(qb.sql().ends_with(" AND p.surname = $1 AND i.gender = $2"));
    }

    #[test]
    fn page_query_appends_limit_and_offset_after_filters() {
        let filter = PersonFilter {
            age_max: Some(40),
            ..Default::default()
        };
        let qb = page_query(&predicates(&filter), PageRequest::new(3, 10).unwrap());
        assert_eq!(
            qb.sql(),
            format!("{PEOPLE_COLUMNS} {PEOPLE_FROM} AND i.age <= $1 ORDER BY p.id LIMIT $2 OFFSET $3")
        );
    }

    #[test]
    fn same_filter_compiles_to_same_sql() {
        let a = page_query(&predicates(&full_filter()), PageRequest::new(1, 5).unwrap());
        let b = page_query(&predicates(&full_filter()), PageRequest::new(1, 5).unwrap());
        assert_eq!(a.sql(), b.sql());
    }
}

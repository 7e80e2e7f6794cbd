//! Postgres implementation of the `PersonStore` port.
//!
//! All SQL is runtime-checked (`sqlx::query`, not `sqlx::query!`) to avoid a
//! compile-time database requirement. Multi-statement operations run in a
//! `sqlx::Transaction`; returning early drops it, which rolls it back.

use std::collections::HashMap;

use async_trait::async_trait;
use people_core::{
    DemographicInfo, Identity, NationalityCandidate, NewPerson, PageRequest, PeopleError,
    PersonFilter, PersonId, PersonPage, PersonRecord, PersonStore, Result,
};
use sqlx::{PgExecutor, PgPool};

use crate::query;
use crate::rows::{InfoRow, NationalityRow, PersonRow};

fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> PeopleError {
    move |e| PeopleError::Database(format!("{context}: {e}"))
}

fn tx_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> PeopleError {
    move |e| PeopleError::Transaction(format!("{context}: {e}"))
}

#[derive(Clone)]
pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Existence probe; absent ids become `NotFound`.
    async fn ensure_exists(&self, id: PersonId) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM people WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err("failed to check existence"))?;
        if exists {
            Ok(())
        } else {
            Err(PeopleError::NotFound(id))
        }
    }
}

async fn fetch_info<'e, E: PgExecutor<'e>>(executor: E, id: PersonId) -> Result<DemographicInfo> {
    let row: InfoRow = sqlx::query_as(
        "SELECT age, gender, gender_probability FROM info WHERE person_id = $1",
    )
    .bind(id)
    .fetch_one(executor)
    .await
    .map_err(db_err("failed to read info"))?;
    Ok(row.into())
}

async fn fetch_nationalities<'e, E: PgExecutor<'e>>(
    executor: E,
    id: PersonId,
) -> Result<Vec<NationalityCandidate>> {
    let rows: Vec<NationalityRow> = sqlx::query_as(
        "SELECT person_id, nationality, probability FROM countries WHERE person_id = $1 ORDER BY id",
    )
    .bind(id)
    .fetch_all(executor)
    .await
    .map_err(db_err("failed to read countries"))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Nationalities for many people in one round trip, grouped by person in
/// insertion order.
async fn fetch_nationalities_for<'e, E: PgExecutor<'e>>(
    executor: E,
    ids: &[PersonId],
) -> Result<HashMap<PersonId, Vec<NationalityCandidate>>> {
    let rows: Vec<NationalityRow> = sqlx::query_as(
        "SELECT person_id, nationality, probability FROM countries \
         WHERE person_id = ANY($1) ORDER BY person_id, id",
    )
    .bind(ids)
    .fetch_all(executor)
    .await
    .map_err(db_err("failed to read countries"))?;

    let mut grouped: HashMap<PersonId, Vec<NationalityCandidate>> = HashMap::new();
    for row in rows {
        grouped.entry(row.person_id).or_default().push(row.into());
    }
    Ok(grouped)
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn create(&self, person: &NewPerson) -> Result<PersonId> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(tx_err("failed to begin transaction"))?;

        let id: PersonId = sqlx::query_scalar(
            "INSERT INTO people (name, surname, patronymic) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&person.identity.name)
        .bind(&person.identity.surname)
        .bind(&person.identity.patronymic)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("failed to insert into people"))?;

        sqlx::query(
            "INSERT INTO info (person_id, age, gender, gender_probability) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(person.info.age)
        .bind(&person.info.gender)
        .bind(person.info.gender_probability)
        .execute(&mut *tx)
        .await
        .map_err(db_err("failed to insert into info"))?;

        for n in &person.nationality {
            sqlx::query(
                "INSERT INTO countries (person_id, nationality, probability) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(&n.country_id)
            .bind(n.probability)
            .execute(&mut *tx)
            .await
            .map_err(db_err("failed to insert into countries"))?;
        }

        tx.commit()
            .await
            .map_err(tx_err("failed to commit transaction"))?;

        tracing::debug!(person_id = id, countries = person.nationality.len(), "person rows inserted");
        Ok(id)
    }

    async fn update(&self, id: PersonId, identity: &Identity) -> Result<PersonRecord> {
        self.ensure_exists(id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(tx_err("failed to begin transaction"))?;

        let updated = sqlx::query(
            "UPDATE people SET name = $1, surname = $2, patronymic = $3 WHERE id = $4",
        )
        .bind(&identity.name)
        .bind(&identity.surname)
        .bind(&identity.patronymic)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err("failed to update people"))?;

        // Deleted between the probe and the update.
        if updated.rows_affected() == 0 {
            return Err(PeopleError::NotFound(id));
        }

        let info = fetch_info(&mut *tx, id).await?;
        let nationality = fetch_nationalities(&mut *tx, id).await?;

        tx.commit()
            .await
            .map_err(tx_err("failed to commit transaction"))?;

        Ok(PersonRecord {
            id,
            identity: identity.clone(),
            info,
            nationality,
        })
    }

    async fn delete(&self, id: PersonId) -> Result<()> {
        self.ensure_exists(id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(tx_err("failed to begin transaction"))?;

        // Children before parent: countries and info reference people.id.
        sqlx::query("DELETE FROM countries WHERE person_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("failed to delete from countries"))?;

        sqlx::query("DELETE FROM info WHERE person_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("failed to delete from info"))?;

        let deleted = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("failed to delete from people"))?;

        if deleted.rows_affected() == 0 {
            return Err(PeopleError::NotFound(id));
        }

        tx.commit()
            .await
            .map_err(tx_err("failed to commit transaction"))?;
        Ok(())
    }

    async fn get_by_id(&self, id: PersonId) -> Result<PersonRecord> {
        self.ensure_exists(id).await?;

        let sql = format!("{} {} AND p.id = $1", query::PEOPLE_COLUMNS, query::PEOPLE_FROM);
        // Deleted between the probe and the read.
        let row: PersonRow = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("failed to read person"))?
            .ok_or(PeopleError::NotFound(id))?;

        let nationality = fetch_nationalities(&self.pool, id).await?;
        Ok(row.into_record(nationality))
    }

    async fn list(&self, filter: &PersonFilter, page: PageRequest) -> Result<PersonPage> {
        let predicates = query::predicates(filter);

        let mut count = query::count_query(&predicates);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("failed to count people"))?;

        let mut select = query::page_query(&predicates, page);
        let rows: Vec<PersonRow> = select
            .build_query_as::<PersonRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("failed to list people"))?;

        let ids: Vec<PersonId> = rows.iter().map(|r| r.id).collect();
        let mut nationalities = if ids.is_empty() {
            HashMap::new()
        } else {
            fetch_nationalities_for(&self.pool, &ids).await?
        };

        let people = rows
            .into_iter()
            .map(|row| {
                let nationality = nationalities.remove(&row.id).unwrap_or_default();
                row.into_record(nationality)
            })
            .collect();

        Ok(PersonPage {
            people,
            total,
            page,
        })
    }
}

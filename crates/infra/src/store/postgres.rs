//! Postgres-backed party store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `UniqueViolation` | Identity key raced in by another write (partial unique index) |
//! | Database (other) | Any other | `Backend` | Check constraint, permissions, etc. |
//! | PoolClosed | N/A | `Backend` | Connection pool was closed |
//! | Other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! ## Ordering
//!
//! Listing and search order by `(create_timestamp, party_guid)`, so results are stable
//! between calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use partyhub_core::{Entity, PartyId};
use partyhub_parties::{
    Actor, Address, Audit, ContactInfo, IdentityKey, NewParty, Party, PartyStore, PartyType,
    StoreError,
};

const SCHEMA: &str = include_str!("../../migrations/0001_parties.sql");

const SELECT_PARTY: &str = r#"
    SELECT party_guid, party_type_code, first_name, party_name,
           email, phone_no, phone_ext,
           suite_no, address_line_1, address_line_2, city, province_code, postal_code,
           create_user, create_timestamp, update_user, update_timestamp
    FROM parties
"#;

/// Postgres-backed party store.
///
/// Uses a SQLx connection pool, so the store is `Send + Sync` and cheap to share.
pub struct PostgresPartyStore {
    pool: Arc<PgPool>,
}

impl PostgresPartyStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e, None))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Apply the bundled schema. Idempotent.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e, None))?;
        Ok(())
    }

    async fn fetch_optional(
        &self,
        operation: &'static str,
        sql: &str,
        binds: &[&str],
    ) -> Result<Option<Party>, StoreError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let row = query
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e, None))?;
        row.as_ref().map(row_to_party).transpose()
    }
}

#[async_trait::async_trait]
impl PartyStore for PostgresPartyStore {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PartyId) -> Result<Option<Party>, StoreError> {
        let sql = format!("{SELECT_PARTY} WHERE party_guid = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e, None))?;
        row.as_ref().map(row_to_party).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_name(
        &self,
        first_name: &str,
        party_name: &str,
    ) -> Result<Option<Party>, StoreError> {
        let sql = format!(
            "{SELECT_PARTY} WHERE party_type_code = 'PER' AND first_name = $1 AND party_name = $2"
        );
        self.fetch_optional("find_by_name", &sql, &[first_name, party_name])
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_organization_name(
        &self,
        party_name: &str,
    ) -> Result<Option<Party>, StoreError> {
        let sql = format!("{SELECT_PARTY} WHERE party_type_code = 'ORG' AND party_name = $1");
        self.fetch_optional("find_by_organization_name", &sql, &[party_name])
            .await
    }

    #[instrument(skip(self))]
    async fn search_by_name(
        &self,
        term: &str,
        type_filter: Option<PartyType>,
        limit: usize,
    ) -> Result<Vec<Party>, StoreError> {
        let sql = format!(
            r#"{SELECT_PARTY}
            WHERE ($2::varchar IS NULL OR party_type_code = $2)
              AND (party_name ILIKE $1 ESCAPE '\' OR first_name ILIKE $1 ESCAPE '\')
            ORDER BY create_timestamp, party_guid
            LIMIT $3"#
        );
        let rows = sqlx::query(&sql)
            .bind(format!("%{}%", escape_like(term)))
            .bind(type_filter.map(PartyType::code))
            .bind(limit_param(limit))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("search_by_name", e, None))?;
        rows.iter().map(row_to_party).collect()
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: usize) -> Result<Vec<Party>, StoreError> {
        let sql = format!("{SELECT_PARTY} ORDER BY create_timestamp, party_guid LIMIT $1");
        let rows = sqlx::query(&sql)
            .bind(limit_param(limit))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e, None))?;
        rows.iter().map(row_to_party).collect()
    }

    #[instrument(skip(self, party), fields(party_type = %party.party_type))]
    async fn insert(&self, party: NewParty, actor: &Actor) -> Result<Party, StoreError> {
        let key = party.identity_key();
        let party = party.into_party(PartyId::new(), Audit::created(actor, Utc::now()));
        let contact = party.contact();
        let address = party.address();
        let audit = party.audit();

        sqlx::query(
            r#"
            INSERT INTO parties (
                party_guid, party_type_code, first_name, party_name,
                email, phone_no, phone_ext,
                suite_no, address_line_1, address_line_2, city, province_code, postal_code,
                create_user, create_timestamp, update_user, update_timestamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(party.id().as_uuid())
        .bind(party.party_type().code())
        .bind(party.first_name())
        .bind(party.party_name())
        .bind(contact.email.as_deref())
        .bind(contact.phone_no.as_deref())
        .bind(contact.phone_ext.as_deref())
        .bind(address.suite_no.as_deref())
        .bind(address.address_line_1.as_deref())
        .bind(address.address_line_2.as_deref())
        .bind(address.city.as_deref())
        .bind(address.province_code.as_deref())
        .bind(address.postal_code.as_deref())
        .bind(&audit.create_user)
        .bind(audit.create_timestamp)
        .bind(&audit.update_user)
        .bind(audit.update_timestamp)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e, Some(&key)))?;

        Ok(party)
    }

    #[instrument(skip(self, party), fields(party_id = %party.id_typed()))]
    async fn update(&self, mut party: Party, actor: &Actor) -> Result<Party, StoreError> {
        let key = party.identity_key();
        party.stamp_update(actor, Utc::now());
        let contact = party.contact();
        let address = party.address();
        let audit = party.audit();

        let result = sqlx::query(
            r#"
            UPDATE parties SET
                first_name = $2, party_name = $3,
                email = $4, phone_no = $5, phone_ext = $6,
                suite_no = $7, address_line_1 = $8, address_line_2 = $9,
                city = $10, province_code = $11, postal_code = $12,
                update_user = $13, update_timestamp = $14
            WHERE party_guid = $1
            "#,
        )
        .bind(party.id().as_uuid())
        .bind(party.first_name())
        .bind(party.party_name())
        .bind(contact.email.as_deref())
        .bind(contact.phone_no.as_deref())
        .bind(contact.phone_ext.as_deref())
        .bind(address.suite_no.as_deref())
        .bind(address.address_line_1.as_deref())
        .bind(address.address_line_2.as_deref())
        .bind(address.city.as_deref())
        .bind(address.province_code.as_deref())
        .bind(address.postal_code.as_deref())
        .bind(&audit.update_user)
        .bind(audit.update_timestamp)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e, Some(&key)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(party.id_typed()));
        }
        Ok(party)
    }
}

fn row_to_party(row: &PgRow) -> Result<Party, StoreError> {
    let get_err = |e: sqlx::Error| StoreError::Backend(format!("failed to read party row: {e}"));

    let id: Uuid = row.try_get("party_guid").map_err(get_err)?;
    let type_code: String = row.try_get("party_type_code").map_err(get_err)?;
    let party_type = PartyType::from_code(&type_code)
        .ok_or_else(|| StoreError::Backend(format!("unknown party_type_code {type_code:?}")))?;

    let contact = ContactInfo {
        email: row.try_get("email").map_err(get_err)?,
        phone_no: row.try_get("phone_no").map_err(get_err)?,
        phone_ext: row.try_get("phone_ext").map_err(get_err)?,
    };
    let address = Address {
        suite_no: row.try_get("suite_no").map_err(get_err)?,
        address_line_1: row.try_get("address_line_1").map_err(get_err)?,
        address_line_2: row.try_get("address_line_2").map_err(get_err)?,
        city: row.try_get("city").map_err(get_err)?,
        province_code: row.try_get("province_code").map_err(get_err)?,
        postal_code: row.try_get("postal_code").map_err(get_err)?,
    };
    let audit = Audit {
        create_user: row.try_get("create_user").map_err(get_err)?,
        create_timestamp: row
            .try_get::<DateTime<Utc>, _>("create_timestamp")
            .map_err(get_err)?,
        update_user: row.try_get("update_user").map_err(get_err)?,
        update_timestamp: row
            .try_get::<DateTime<Utc>, _>("update_timestamp")
            .map_err(get_err)?,
    };

    Ok(Party::hydrate(
        PartyId::from_uuid(id),
        party_type,
        row.try_get("first_name").map_err(get_err)?,
        row.try_get("party_name").map_err(get_err)?,
        contact,
        address,
        audit,
    ))
}

/// Escape `%`, `_` and `\` so user input matches literally inside an `ILIKE` pattern.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error, key: Option<&IdentityKey>) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                if let Some(key) = key {
                    return StoreError::UniqueViolation(key.clone());
                }
            }
            StoreError::Backend(format!(
                "database error in {}: {}",
                operation,
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        other => StoreError::Backend(format!("database error in {}: {}", operation, other)),
    }
}

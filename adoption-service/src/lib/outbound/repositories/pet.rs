use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Row;
use sqlx::Transaction;

use crate::domain::pet::models::Pet;
use crate::domain::pet::models::PetId;
use crate::domain::pet::models::PetKind;
use crate::domain::pet::models::PetStatus;
use crate::domain::pet::ports::PetRepository;
use crate::pet::errors::PetError;

const SELECT_PET: &str = r#"
    SELECT p.id, p.name, p.breed, p.age, p.location, p.status, p.created_at,
           k.id AS kind_id, k.name AS kind_name
    FROM pets p
    JOIN pet_kinds k ON k.id = p.kind_id
"#;

pub struct PostgresPetRepository {
    pool: PgPool,
}

impl PostgresPetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_pet(row: &PgRow) -> Result<Pet, PetError> {
        let status: String = row.get("status");
        Ok(Pet {
            id: PetId(row.get("id")),
            name: row.get("name"),
            kind: PetKind {
                id: row.get("kind_id"),
                name: row.get("kind_name"),
            },
            breed: row.get("breed"),
            age: row.get("age"),
            location: row.get("location"),
            status: PetStatus::from_str(&status)?,
            created_at: row.get("created_at"),
        })
    }

    /// Resolve a kind name to its id, inserting it on first sight.
    async fn upsert_kind(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<i64, PetError> {
        let row = sqlx::query(
            r#"
            INSERT INTO pet_kinds (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(name)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        Ok(row.get("id"))
    }
}

#[async_trait]
impl PetRepository for PostgresPetRepository {
    async fn create(&self, mut pet: Pet) -> Result<Pet, PetError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        let kind_id = Self::upsert_kind(&mut tx, &pet.kind.name).await?;

        let row = sqlx::query(
            r#"
            INSERT INTO pets (name, kind_id, breed, age, location, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&pet.name)
        .bind(kind_id)
        .bind(&pet.breed)
        .bind(pet.age)
        .bind(&pet.location)
        .bind(pet.status.as_str())
        .bind(pet.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        pet.id = PetId(row.get("id"));
        pet.kind.id = kind_id;
        Ok(pet)
    }

    async fn find_by_id(&self, id: PetId) -> Result<Option<Pet>, PetError> {
        let sql = format!("{SELECT_PET} WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_pet).transpose()
    }

    async fn find_by_status(&self, status: PetStatus) -> Result<Vec<Pet>, PetError> {
        let sql = format!("{SELECT_PET} WHERE p.status = $1 ORDER BY p.id");
        let rows = sqlx::query(&sql)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_pet).collect()
    }

    async fn list_all(&self) -> Result<Vec<Pet>, PetError> {
        let sql = format!("{SELECT_PET} ORDER BY p.id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_pet).collect()
    }

    async fn update(&self, mut pet: Pet) -> Result<Pet, PetError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        let kind_id = Self::upsert_kind(&mut tx, &pet.kind.name).await?;

        let result = sqlx::query(
            r#"
            UPDATE pets
            SET name = $1, kind_id = $2, breed = $3, age = $4, location = $5, status = $6
            WHERE id = $7
            "#,
        )
        .bind(&pet.name)
        .bind(kind_id)
        .bind(&pet.breed)
        .bind(pet.age)
        .bind(&pet.location)
        .bind(pet.status.as_str())
        .bind(pet.id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PetError::NotFound(pet.id.0));
        }

        tx.commit()
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        pet.kind.id = kind_id;
        Ok(pet)
    }

    async fn delete(&self, id: PetId) -> Result<(), PetError> {
        let result = sqlx::query("DELETE FROM pets WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| PetError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PetError::NotFound(id.0));
        }

        Ok(())
    }
}

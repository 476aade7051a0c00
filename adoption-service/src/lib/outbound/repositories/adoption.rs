use std::str::FromStr;

use async_trait::async_trait;
use auth::Role;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::adoption::errors::AdoptionError;
use crate::adoption::models::Adoption;
use crate::adoption::models::AdoptionId;
use crate::adoption::models::AdoptionStatus;
use crate::adoption::models::NewAdoption;
use crate::adoption::ports::AdoptionRepository;
use crate::domain::pet::models::Pet;
use crate::domain::pet::models::PetId;
use crate::domain::pet::models::PetKind;
use crate::domain::pet::models::PetStatus;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;

const SELECT_ADOPTION: &str = r#"
    SELECT a.id, a.status, a.adoption_date,
           u.id AS user_id, u.username, u.name AS user_name, u.email, u.phone,
           u.password_hash,
           COALESCE(array_agg(r.role) FILTER (WHERE r.role IS NOT NULL), '{}') AS roles,
           p.id AS pet_id, p.name AS pet_name, p.breed, p.age, p.location,
           p.status AS pet_status, p.created_at AS pet_created_at,
           k.id AS kind_id, k.name AS kind_name
    FROM adoptions a
    JOIN users u ON u.id = a.user_id
    JOIN pets p ON p.id = a.pet_id
    JOIN pet_kinds k ON k.id = p.kind_id
    LEFT JOIN user_roles r ON r.user_id = u.id
"#;

pub struct PostgresAdoptionRepository {
    pool: PgPool,
}

impl PostgresAdoptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_adoption(row: &PgRow) -> Result<Adoption, AdoptionError> {
        let roles = row
            .try_get::<Vec<String>, _>("roles")
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?
            .iter()
            .map(|r| Role::from_str(r))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AdoptionError::Unknown(e.to_string()))?;

        let user = User {
            id: UserId(row.get("user_id")),
            username: Username::new(row.get("username"))
                .map_err(|e| AdoptionError::Unknown(e.to_string()))?,
            name: row.get("user_name"),
            email: EmailAddress::new(row.get("email"))
                .map_err(|e| AdoptionError::Unknown(e.to_string()))?,
            phone: row.get("phone"),
            password_hash: row.get("password_hash"),
            roles,
        };

        let pet_status: String = row.get("pet_status");
        let pet = Pet {
            id: PetId(row.get("pet_id")),
            name: row.get("pet_name"),
            kind: PetKind {
                id: row.get("kind_id"),
                name: row.get("kind_name"),
            },
            breed: row.get("breed"),
            age: row.get("age"),
            location: row.get("location"),
            status: PetStatus::from_str(&pet_status)
                .map_err(|e| AdoptionError::Unknown(e.to_string()))?,
            created_at: row.get("pet_created_at"),
        };

        Ok(Adoption {
            id: AdoptionId(row.get("id")),
            user,
            pet,
            status: AdoptionStatus::new(row.get("status"))?,
            adoption_date: row.get("adoption_date"),
        })
    }
}

#[async_trait]
impl AdoptionRepository for PostgresAdoptionRepository {
    async fn create(&self, adoption: NewAdoption) -> Result<Adoption, AdoptionError> {
        let row = sqlx::query(
            r#"
            INSERT INTO adoptions (user_id, pet_id, status, adoption_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(adoption.user.id.0)
        .bind(adoption.pet.id.0)
        .bind(adoption.status.as_str())
        .bind(adoption.adoption_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        Ok(Adoption {
            id: AdoptionId(row.get("id")),
            user: adoption.user,
            pet: adoption.pet,
            status: adoption.status,
            adoption_date: adoption.adoption_date,
        })
    }

    async fn find_by_id(&self, id: AdoptionId) -> Result<Option<Adoption>, AdoptionError> {
        let sql = format!("{SELECT_ADOPTION} WHERE a.id = $1 GROUP BY a.id, u.id, p.id, k.id");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_adoption).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Adoption>, AdoptionError> {
        let sql = format!("{SELECT_ADOPTION} GROUP BY a.id, u.id, p.id, k.id ORDER BY a.id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_adoption).collect()
    }

    async fn update(&self, adoption: Adoption) -> Result<Adoption, AdoptionError> {
        let result = sqlx::query(
            r#"
            UPDATE adoptions
            SET user_id = $1, pet_id = $2, status = $3, adoption_date = $4
            WHERE id = $5
            "#,
        )
        .bind(adoption.user.id.0)
        .bind(adoption.pet.id.0)
        .bind(adoption.status.as_str())
        .bind(adoption.adoption_date)
        .bind(adoption.id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AdoptionError::NotFound(adoption.id.0));
        }

        Ok(adoption)
    }

    async fn delete(&self, id: AdoptionId) -> Result<(), AdoptionError> {
        let result = sqlx::query("DELETE FROM adoptions WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AdoptionError::NotFound(id.0));
        }

        Ok(())
    }

    async fn decide(
        &self,
        adoption: &Adoption,
        pet_status: PetStatus,
        require_pet_available: bool,
    ) -> Result<Adoption, AdoptionError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        let result = sqlx::query("UPDATE adoptions SET status = $1 WHERE id = $2")
            .bind(adoption.status.as_str())
            .bind(adoption.id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AdoptionError::NotFound(adoption.id.0));
        }

        // The guard keeps two racing approvals from both claiming the pet;
        // losing it rolls the adoption write back with the transaction.
        let pet_update = if require_pet_available {
            sqlx::query("UPDATE pets SET status = $1 WHERE id = $2 AND status = 'AVAILABLE'")
        } else {
            sqlx::query("UPDATE pets SET status = $1 WHERE id = $2")
        };

        let result = pet_update
            .bind(pet_status.as_str())
            .bind(adoption.pet.id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AdoptionError::PetUnavailable(adoption.pet.id.0));
        }

        tx.commit()
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?;

        let mut decided = adoption.clone();
        decided.pet.status = pet_status;
        Ok(decided)
    }
}

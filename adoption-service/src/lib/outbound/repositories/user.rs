use std::str::FromStr;

use async_trait::async_trait;
use auth::Role;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const SELECT_USER: &str = r#"
    SELECT u.id, u.username, u.name, u.email, u.phone, u.password_hash,
           COALESCE(array_agg(r.role) FILTER (WHERE r.role IS NOT NULL), '{}') AS roles
    FROM users u
    LEFT JOIN user_roles r ON r.user_id = u.id
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User, UserError> {
        let roles = row
            .try_get::<Vec<String>, _>("roles")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .iter()
            .map(|r| Role::from_str(r))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| UserError::Unknown(e.to_string()))?;

        Ok(User {
            id: UserId(row.get("id")),
            username: Username::new(row.get("username"))?,
            name: row.get("name"),
            email: EmailAddress::new(row.get("email"))?,
            phone: row.get("phone"),
            password_hash: row.get("password_hash"),
            roles,
        })
    }

    fn map_unique_violation(e: sqlx::Error, user: &User) -> UserError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                if db_err.constraint() == Some("users_username_key") {
                    return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
                }
                if db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
        }
        UserError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, mut user: User) -> Result<User, UserError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, name, email, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.username.as_str())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.phone)
        .bind(&user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::map_unique_violation(e, &user))?;

        user.id = UserId(row.get("id"));

        for role in &user.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
                .bind(user.id.0)
                .bind(role.granted_name())
                .execute(&mut *tx)
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let sql = format!("{SELECT_USER} WHERE u.id = $1 GROUP BY u.id");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let sql = format!("{SELECT_USER} WHERE u.username = $1 GROUP BY u.id");
        let row = sqlx::query(&sql)
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let sql = format!("{SELECT_USER} GROUP BY u.id ORDER BY u.id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, phone = $3
            WHERE id = $4
            "#,
        )
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.phone)
        .bind(user.id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, &user))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.0));
        }

        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.0));
        }

        Ok(())
    }
}

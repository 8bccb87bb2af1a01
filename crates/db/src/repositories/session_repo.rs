//! Repository for the `employee_sessions` table.

use smarthr_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, EmployeeSession};

const COLUMNS: &str = "id, employee_id, refresh_token_hash, expires_at, is_revoked, \
    user_agent, ip_address, created_at, updated_at";

/// Provides refresh-session operations.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<EmployeeSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO employee_sessions
                (employee_id, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmployeeSession>(&query)
            .bind(input.employee_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Find the live session matching a refresh-token hash.
    ///
    /// Revoked and expired sessions are never returned.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<EmployeeSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM employee_sessions
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, EmployeeSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a single session (refresh-token rotation).
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE employee_sessions SET is_revoked = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Revoke every session belonging to an employee (logout).
    pub async fn revoke_all_for_employee(pool: &PgPool, employee_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE employee_sessions SET is_revoked = true
             WHERE employee_id = $1 AND is_revoked = false",
        )
        .bind(employee_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

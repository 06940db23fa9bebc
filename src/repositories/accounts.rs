use crate::structs::accounts::{Account, AccountListing, DbAccount, NewAccount};
use async_trait::async_trait;
use sqlx::{Error, PgPool};
use uuid::Uuid;

/// 客戶資料的讀寫介面, 排線只會用到 `list_active_accounts`
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// 全部客戶, 無法解析的資料放在 `invalid`
    async fn list_accounts(&self, user_id: Uuid) -> Result<AccountListing, Error>;

    async fn list_active_accounts(&self, user_id: Uuid) -> Result<Vec<Account>, Error>;

    async fn create_account(&self, user_id: Uuid, account: NewAccount) -> Result<Account, Error>;

    async fn update_account(
        &self,
        user_id: Uuid,
        id: Uuid,
        account: NewAccount,
    ) -> Result<Account, Error>;

    /// 軟刪除, 只把 is_active 設成 false
    async fn deactivate_account(&self, user_id: Uuid, id: Uuid) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "id, name, address, region, frequency, priority, tags, is_active";

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn list_accounts(&self, user_id: Uuid) -> Result<AccountListing, Error> {
        let rows = sqlx::query_as::<_, DbAccount>(&format!(
            r#"
                SELECT {ACCOUNT_COLUMNS}
                FROM accounts
                WHERE user_id = $1
                ORDER BY created_at, id
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(AccountListing::from_rows(rows))
    }

    async fn list_active_accounts(&self, user_id: Uuid) -> Result<Vec<Account>, Error> {
        let rows = sqlx::query_as::<_, DbAccount>(&format!(
            r#"
                SELECT {ACCOUNT_COLUMNS}
                FROM accounts
                WHERE user_id = $1 AND is_active = TRUE
                ORDER BY created_at, id
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_accounts(rows))
    }

    async fn create_account(&self, user_id: Uuid, account: NewAccount) -> Result<Account, Error> {
        let row = sqlx::query_as::<_, DbAccount>(&format!(
            r#"
                INSERT INTO accounts (id, user_id, name, address, region, frequency, priority, tags, is_active, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, NOW(), NOW())
                RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4()) // $1
        .bind(user_id) // $2
        .bind(&account.name) // $3
        .bind(&account.address) // $4
        .bind(account.region.as_str()) // $5
        .bind(account.frequency.as_str()) // $6
        .bind(account.priority) // $7
        .bind(account.tag_strings()) // $8
        .fetch_one(&self.pool)
        .await?;

        decode_row(row)
    }

    async fn update_account(
        &self,
        user_id: Uuid,
        id: Uuid,
        account: NewAccount,
    ) -> Result<Account, Error> {
        let row = sqlx::query_as::<_, DbAccount>(&format!(
            r#"
                UPDATE accounts
                SET
                    name = $3,
                    address = $4,
                    region = $5,
                    frequency = $6,
                    priority = $7,
                    tags = $8,
                    updated_at = NOW()
                WHERE id = $1 AND user_id = $2
                RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id) // $1
        .bind(user_id) // $2
        .bind(&account.name) // $3
        .bind(&account.address) // $4
        .bind(account.region.as_str()) // $5
        .bind(account.frequency.as_str()) // $6
        .bind(account.priority) // $7
        .bind(account.tag_strings()) // $8
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        decode_row(row)
    }

    async fn deactivate_account(&self, user_id: Uuid, id: Uuid) -> Result<(), Error> {
        let result = sqlx::query(
            r#"
                UPDATE accounts
                SET is_active = FALSE, updated_at = NOW()
                WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        Ok(())
    }
}

fn decode_row(row: DbAccount) -> Result<Account, Error> {
    Account::try_from(row).map_err(|err| Error::Decode(Box::new(err)))
}

// 排線用: 區域或頻率已經不認得的舊資料直接略過, 不讓整批失敗
fn into_accounts(rows: Vec<DbAccount>) -> Vec<Account> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match Account::try_from(row) {
                Ok(account) => Some(account),
                Err(err) => {
                    tracing::warn!("skip account {}: {}", id, err);
                    None
                }
            }
        })
        .collect()
}

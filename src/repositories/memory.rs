use crate::{
    repositories::{accounts::AccountRepository, weekly_routes::WeeklyRouteRepository},
    structs::{
        accounts::{Account, AccountListing, NewAccount},
        weekly_routes::WeeklyRouteRecord,
    },
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Error;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// 測試用的記憶體版 repository
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<Vec<(Uuid, Account)>>,
    weekly_routes: Mutex<HashMap<(Uuid, NaiveDate), WeeklyRouteRecord>>,
}

impl MemoryStore {
    pub async fn insert_account(&self, user_id: Uuid, account: Account) {
        self.accounts.lock().await.push((user_id, account));
    }

    async fn owned_by(&self, user_id: Uuid) -> Vec<Account> {
        self.accounts
            .lock()
            .await
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, account)| account.clone())
            .collect()
    }

    pub async fn weekly_route_count(&self) -> usize {
        self.weekly_routes.lock().await.len()
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn list_accounts(&self, user_id: Uuid) -> Result<AccountListing, Error> {
        Ok(AccountListing {
            accounts: self.owned_by(user_id).await,
            invalid: Vec::new(),
        })
    }

    async fn list_active_accounts(&self, user_id: Uuid) -> Result<Vec<Account>, Error> {
        let accounts = self.owned_by(user_id).await;
        Ok(accounts.into_iter().filter(|account| account.is_active).collect())
    }

    async fn create_account(&self, user_id: Uuid, account: NewAccount) -> Result<Account, Error> {
        let account = account.into_account(Uuid::new_v4());
        self.insert_account(user_id, account.clone()).await;
        Ok(account)
    }

    async fn update_account(
        &self,
        user_id: Uuid,
        id: Uuid,
        account: NewAccount,
    ) -> Result<Account, Error> {
        let mut accounts = self.accounts.lock().await;
        let (_, stored) = accounts
            .iter_mut()
            .find(|(owner, stored)| *owner == user_id && stored.id == id)
            .ok_or(Error::RowNotFound)?;

        let is_active = stored.is_active;
        *stored = Account {
            is_active,
            ..account.into_account(id)
        };

        Ok(stored.clone())
    }

    async fn deactivate_account(&self, user_id: Uuid, id: Uuid) -> Result<(), Error> {
        let mut accounts = self.accounts.lock().await;
        let (_, stored) = accounts
            .iter_mut()
            .find(|(owner, stored)| *owner == user_id && stored.id == id)
            .ok_or(Error::RowNotFound)?;

        stored.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl WeeklyRouteRepository for MemoryStore {
    async fn upsert_weekly_routes(&self, record: &WeeklyRouteRecord) -> Result<(), Error> {
        self.weekly_routes
            .lock()
            .await
            .insert((record.user_id, record.week_start_date), record.clone());
        Ok(())
    }

    async fn get_weekly_routes(
        &self,
        user_id: Uuid,
        week_start_date: NaiveDate,
    ) -> Result<Option<WeeklyRouteRecord>, Error> {
        Ok(self
            .weekly_routes
            .lock()
            .await
            .get(&(user_id, week_start_date))
            .cloned())
    }
}

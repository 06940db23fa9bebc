use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{collections::BTreeSet, fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// 業務區域, 決定客戶能排在哪一天
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Lakeland,
    #[serde(rename = "Haines City", alias = "HainesCity")]
    HainesCity,
    Tampa,
    Orlando,
    Villages,
    Ocala,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Lakeland => "Lakeland",
            Region::HainesCity => "Haines City",
            Region::Tampa => "Tampa",
            Region::Orlando => "Orlando",
            Region::Villages => "Villages",
            Region::Ocala => "Ocala",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Lakeland" => Ok(Region::Lakeland),
            "Haines City" | "HainesCity" => Ok(Region::HainesCity),
            "Tampa" => Ok(Region::Tampa),
            "Orlando" => Ok(Region::Orlando),
            "Villages" => Ok(Region::Villages),
            "Ocala" => Ok(Region::Ocala),
            other => Err(UnknownValue {
                kind: "region",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Weekly,
    Biweekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl FromStr for Frequency {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(UnknownValue {
                kind: "frequency",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountTag {
    FirstStop,
    LastStop,
    JulietFalls,
}

impl AccountTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTag::FirstStop => "firstStop",
            AccountTag::LastStop => "lastStop",
            AccountTag::JulietFalls => "julietFalls",
        }
    }
}

impl FromStr for AccountTag {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "firstStop" => Ok(AccountTag::FirstStop),
            "lastStop" => Ok(AccountTag::LastStop),
            "julietFalls" => Ok(AccountTag::JulietFalls),
            other => Err(UnknownValue {
                kind: "tag",
                value: other.to_string(),
            }),
        }
    }
}

/// 一個實際要跑的客戶點
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub region: Region,
    pub frequency: Frequency,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub tags: BTreeSet<AccountTag>,
    pub is_active: bool,
}

impl Account {
    pub fn has_tag(&self, tag: AccountTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// 新增 / 修改客戶的 payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub address: String,
    pub region: Region,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub tags: BTreeSet<AccountTag>,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.address.trim().is_empty() {
            return Err("address must not be empty".to_string());
        }
        Ok(())
    }

    pub fn tag_strings(&self) -> Vec<String> {
        self.tags.iter().map(|tag| tag.as_str().to_string()).collect()
    }

    pub fn into_account(self, id: Uuid) -> Account {
        Account {
            id,
            name: self.name,
            address: self.address,
            region: self.region,
            frequency: self.frequency,
            priority: self.priority,
            tags: self.tags,
            is_active: true,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub region: String,
    pub frequency: String,
    pub priority: i32,
    pub tags: Vec<String>,
    pub is_active: bool,
}

/// 讀得出來但區域 / 頻率已經不認得的舊資料, 讓業務可以看到並改掉
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidAccount {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub region: String,
    pub frequency: String,
    pub is_active: bool,
    pub reason: String,
}

/// 客戶清單: 正常的客戶加上無法解析的資料
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountListing {
    pub accounts: Vec<Account>,
    pub invalid: Vec<InvalidAccount>,
}

impl AccountListing {
    pub fn from_rows(rows: Vec<DbAccount>) -> Self {
        let mut listing = Self::default();

        for row in rows {
            let invalid = InvalidAccount {
                id: row.id,
                name: row.name.clone(),
                address: row.address.clone(),
                region: row.region.clone(),
                frequency: row.frequency.clone(),
                is_active: row.is_active,
                reason: String::new(),
            };

            match Account::try_from(row) {
                Ok(account) => listing.accounts.push(account),
                Err(err) => listing.invalid.push(InvalidAccount {
                    reason: err.to_string(),
                    ..invalid
                }),
            }
        }

        listing
    }
}

impl TryFrom<DbAccount> for Account {
    type Error = UnknownValue;

    fn try_from(row: DbAccount) -> Result<Self, Self::Error> {
        let tags = row
            .tags
            .iter()
            .filter_map(|raw| match raw.parse::<AccountTag>() {
                Ok(tag) => Some(tag),
                Err(err) => {
                    tracing::debug!("account {} ignores {}", row.id, err);
                    None
                }
            })
            .collect();

        Ok(Account {
            id: row.id,
            name: row.name,
            address: row.address,
            region: row.region.parse()?,
            frequency: row.frequency.parse()?,
            priority: row.priority,
            tags,
            is_active: row.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn db_account(region: &str, tags: &[&str]) -> DbAccount {
        DbAccount {
            id: Uuid::nil(),
            name: "Publix #1021".to_string(),
            address: "3636 S Florida Ave, Lakeland, FL".to_string(),
            region: region.to_string(),
            frequency: "biweekly".to_string(),
            priority: 2,
            tags: tags.iter().map(ToString::to_string).collect(),
            is_active: true,
        }
    }

    #[test]
    fn region_accepts_display_name_and_alias() {
        assert_eq!("Haines City".parse::<Region>(), Ok(Region::HainesCity));
        assert_eq!("HainesCity".parse::<Region>(), Ok(Region::HainesCity));
        assert_eq!(
            serde_json::from_value::<Region>(json!("HainesCity")).unwrap(),
            Region::HainesCity
        );
        assert_eq!(
            serde_json::to_value(Region::HainesCity).unwrap(),
            json!("Haines City")
        );
        assert!("DTE Tampa".parse::<Region>().is_err());
    }

    #[test]
    fn account_json_is_camel_case() {
        let account = NewAccount {
            name: "Celebration".to_string(),
            address: "Celebration, FL".to_string(),
            region: Region::Orlando,
            frequency: Frequency::Weekly,
            priority: 0,
            tags: BTreeSet::from([AccountTag::FirstStop]),
        }
        .into_account(Uuid::nil());

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["isActive"], json!(true));
        assert_eq!(value["tags"], json!(["firstStop"]));
        assert_eq!(value["region"], json!("Orlando"));
    }

    #[test]
    fn db_row_skips_unknown_tags() {
        let account = Account::try_from(db_account("Lakeland", &["lastStop", "vip"])).unwrap();
        assert_eq!(account.region, Region::Lakeland);
        assert_eq!(account.frequency, Frequency::Biweekly);
        assert!(account.has_tag(AccountTag::LastStop));
        assert_eq!(account.tags.len(), 1);
    }

    #[test]
    fn db_row_with_unknown_region_fails() {
        let err = Account::try_from(db_account("DTE Legends", &[])).unwrap_err();
        assert_eq!(err.kind, "region");
    }

    #[test]
    fn listing_keeps_unparsable_rows_visible() {
        let mut stale = db_account("DTE Tampa", &[]);
        stale.id = Uuid::from_u128(7);

        let listing = AccountListing::from_rows(vec![db_account("Ocala", &[]), stale]);

        assert_eq!(listing.accounts.len(), 1);
        assert_eq!(listing.invalid.len(), 1);
        assert_eq!(listing.invalid[0].id, Uuid::from_u128(7));
        assert_eq!(listing.invalid[0].region, "DTE Tampa");
        assert_eq!(listing.invalid[0].reason, "unknown region: DTE Tampa");
    }

    #[test]
    fn new_account_rejects_blank_address() {
        let payload: NewAccount = serde_json::from_value(json!({
            "name": "Winn-Dixie",
            "address": "   ",
            "region": "Tampa"
        }))
        .unwrap();

        assert!(payload.validate().is_err());
        assert_eq!(payload.frequency, Frequency::Weekly);
    }
}

use crate::{
    services::route_link::build_route_url,
    structs::{
        accounts::{Account, AccountTag, Frequency, Region},
        weekly_routes::{DailyRoute, WeeklyRoutes},
    },
};
use chrono::{Datelike, NaiveDate};
use std::{collections::HashMap, ops::Range};

const MONDAY_LAKELAND: Range<usize> = 0..4;
const MONDAY_HAINES_CITY: Range<usize> = 0..3;
const MONDAY_CAP: usize = 7;
const TUESDAY_TAMPA: Range<usize> = 0..7;
const WEDNESDAY_VILLAGES: Range<usize> = 0..7;
const THURSDAY_OCALA: Range<usize> = 0..5;
const FRIDAY_MIDDLE_CAP: usize = 5;
const FLEX_DAY_LAKELAND: Range<usize> = 4..8;
const HALF_DAY_FRIDAY_LAKELAND: Range<usize> = 0..3;

/// 月中、月底那週只跑半天
const HALF_DAY_DATES: [u32; 3] = [15, 30, 31];
/// Villages 只在輪替的前兩週跑
const VILLAGES_WEEKS: [u32; 2] = [1, 2];
const MONTHLY_WEEK: u32 = 1;

// "DTE Legends" / "DTE Tampa" 不在 Region 裡, 這類資料在讀取時就被擋掉了
const FRIDAY_BLOCKED_REGIONS: [Region; 3] = [Region::Tampa, Region::Ocala, Region::Villages];

pub fn is_villages_week(week_number: u32) -> bool {
    VILLAGES_WEEKS.contains(&week_number)
}

/// 這週是否要跑這個客戶
pub fn is_eligible(account: &Account, week_number: u32) -> bool {
    let region_ok = account.region != Region::Villages || is_villages_week(week_number);
    let frequency_ok = account.frequency != Frequency::Monthly || week_number == MONTHLY_WEEK;

    region_ok && frequency_ok
}

pub fn is_half_day(week_start_date: NaiveDate) -> bool {
    HALF_DAY_DATES.contains(&week_start_date.day())
}

/// 依照區域、頻率與標籤把客戶分配到一週六個桶子
///
/// 純函式: 相同輸入一定得到相同輸出, 不會修改傳入的 accounts。
/// `accounts` 應該已經只剩 active 的客戶, 各區內的順序就是傳入的順序。
pub fn assign_weekly_routes(
    accounts: &[Account],
    week_number: u32,
    week_start_date: NaiveDate,
    origin: &str,
) -> WeeklyRoutes {
    let buckets = RegionBuckets::group(
        accounts
            .iter()
            .filter(|account| is_eligible(account, week_number)),
    );

    let half_day = is_half_day(week_start_date);
    let plan = if half_day {
        DayPlan::half_day(&buckets)
    } else {
        DayPlan::regular(&buckets, accounts, week_number)
    };

    let routes = plan.into_routes(origin);

    tracing::debug!(
        week_number,
        %week_start_date,
        eligible = buckets.eligible_count(),
        half_day,
        monday = routes.monday.stops.len(),
        tuesday = routes.tuesday.stops.len(),
        wednesday = routes.wednesday.stops.len(),
        thursday = routes.thursday.stops.len(),
        friday = routes.friday.stops.len(),
        flex_day = routes.flex_day.stops.len(),
        "weekly routes assigned"
    );

    routes
}

struct RegionBuckets<'a> {
    buckets: HashMap<Region, Vec<&'a Account>>,
}

impl<'a> RegionBuckets<'a> {
    fn group(accounts: impl Iterator<Item = &'a Account>) -> Self {
        let mut buckets: HashMap<Region, Vec<&'a Account>> = HashMap::new();
        for account in accounts {
            buckets.entry(account.region).or_default().push(account);
        }
        Self { buckets }
    }

    fn get(&self, region: Region) -> &[&'a Account] {
        self.buckets
            .get(&region)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn eligible_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// 取 bucket 裡 [start, end) 的客戶, 超出範圍的部分直接略過
    fn slice(&self, region: Region, range: Range<usize>) -> Vec<Account> {
        self.get(region)
            .iter()
            .skip(range.start)
            .take(range.len())
            .map(|account| (*account).clone())
            .collect()
    }
}

#[derive(Default)]
struct DayPlan {
    monday: Vec<Account>,
    tuesday: Vec<Account>,
    wednesday: Vec<Account>,
    thursday: Vec<Account>,
    friday: Vec<Account>,
    flex_day: Vec<Account>,
}

impl DayPlan {
    fn regular(buckets: &RegionBuckets<'_>, all_accounts: &[Account], week_number: u32) -> Self {
        let mut monday = buckets.slice(Region::Lakeland, MONDAY_LAKELAND);
        monday.extend(buckets.slice(Region::HainesCity, MONDAY_HAINES_CITY));
        monday.truncate(MONDAY_CAP);

        let wednesday = if is_villages_week(week_number) {
            buckets.slice(Region::Villages, WEDNESDAY_VILLAGES)
        } else {
            Vec::new()
        };

        let mut thursday = buckets.slice(Region::Ocala, THURSDAY_OCALA);
        if week_number % 2 == 1 {
            // 不看資格也不去重, 直接放在第一站
            if let Some(juliet_falls) = all_accounts
                .iter()
                .find(|account| account.has_tag(AccountTag::JulietFalls))
            {
                thursday.insert(0, juliet_falls.clone());
            }
        }

        Self {
            monday,
            tuesday: buckets.slice(Region::Tampa, TUESDAY_TAMPA),
            wednesday,
            thursday,
            friday: friday_stops(buckets.get(Region::Orlando)),
            flex_day: buckets.slice(Region::Lakeland, FLEX_DAY_LAKELAND),
        }
    }

    /// 半天週: 整週只剩週五跑 Lakeland 前三家
    fn half_day(buckets: &RegionBuckets<'_>) -> Self {
        Self {
            friday: buckets.slice(Region::Lakeland, HALF_DAY_FRIDAY_LAKELAND),
            ..Self::default()
        }
    }

    fn into_routes(self, origin: &str) -> WeeklyRoutes {
        WeeklyRoutes {
            monday: daily_route(origin, self.monday),
            tuesday: daily_route(origin, self.tuesday),
            wednesday: daily_route(origin, self.wednesday),
            thursday: daily_route(origin, self.thursday),
            friday: daily_route(origin, self.friday),
            flex_day: daily_route(origin, self.flex_day),
        }
    }
}

/// 週五: firstStop 在最前、lastStop 在最後, 中間最多五家
///
/// 多個客戶帶同一個標籤時取第一個。
fn friday_stops(orlando: &[&Account]) -> Vec<Account> {
    let candidates: Vec<&Account> = orlando
        .iter()
        .copied()
        .filter(|account| !FRIDAY_BLOCKED_REGIONS.contains(&account.region))
        .collect();

    let first_stop = candidates
        .iter()
        .copied()
        .find(|account| account.has_tag(AccountTag::FirstStop));
    let last_stop = candidates
        .iter()
        .copied()
        .find(|account| account.has_tag(AccountTag::LastStop));

    let middle = candidates
        .iter()
        .copied()
        .filter(|account| !is_pinned(first_stop, account) && !is_pinned(last_stop, account))
        .take(FRIDAY_MIDDLE_CAP);

    first_stop
        .into_iter()
        .chain(middle)
        .chain(last_stop)
        .cloned()
        .collect()
}

fn is_pinned(pinned: Option<&Account>, account: &Account) -> bool {
    pinned.is_some_and(|pinned| std::ptr::eq(pinned, account))
}

fn daily_route(origin: &str, stops: Vec<Account>) -> DailyRoute {
    DailyRoute {
        google_route: build_route_url(origin, &stops),
        stops,
    }
}

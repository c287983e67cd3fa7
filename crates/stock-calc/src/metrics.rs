//! 庫存指標計算（庫存天數、週轉率）

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub use stock_core::classification::NO_SALES_DOS;
use stock_core::StockStatus;

/// 平均銷量採用的月份數
pub const MONTH_WINDOW: usize = 3;

/// 月銷量換算天數
pub const DAYS_PER_MONTH: i64 = 30;

/// 四捨五入（.5 進位）
pub fn round_half_up(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// 日銷量商數取整前保留的小數位數
///
/// 日銷量若為循環小數（如 2/3），28 位截位會讓 .5 的商數落在 .4999…
const QUOTIENT_DP: u32 = 12;

/// 庫存天數（DOS）
///
/// 日銷量為 0 時返回哨兵值 999（無銷售），不做除法
pub fn days_of_stock(current_stock: i64, daily_rate: Decimal) -> i64 {
    if daily_rate <= Decimal::ZERO {
        return NO_SALES_DOS;
    }

    Decimal::from(current_stock)
        .checked_div(daily_rate)
        .map(|days| round_half_up(round_half_up(days, QUOTIENT_DP), 0))
        .and_then(|days| days.to_i64())
        // 溢出視同無銷售
        .unwrap_or(NO_SALES_DOS)
}

/// 以銷售分數精確計算庫存天數：round(庫存 × 天數 / 銷量)，.5 進位
///
/// 全程整數運算，不經過日銷量小數。銷量或天數不為正時返回 999。
pub fn days_of_stock_from_sales(current_stock: i64, total_qty: i64, days: i64) -> i64 {
    if total_qty <= 0 || days <= 0 {
        return NO_SALES_DOS;
    }

    let numerator = i128::from(current_stock) * i128::from(days);
    let denominator = i128::from(total_qty);

    numerator
        .checked_abs()
        .and_then(|n| n.checked_mul(2))
        .and_then(|n| n.checked_add(denominator))
        .map(|n| n / (2 * denominator))
        .map(|rounded| if numerator < 0 { -rounded } else { rounded })
        .and_then(|rounded| i64::try_from(rounded).ok())
        .unwrap_or(NO_SALES_DOS)
}

/// 日銷量 = 總銷量 / 天數；天數不為正時為 0
pub fn daily_rate(total_qty: i64, days: i64) -> Decimal {
    if days <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(total_qty) / Decimal::from(days)
}

/// 依庫存天數分級
pub fn stock_status(dos: i64) -> StockStatus {
    StockStatus::from_dos(dos)
}

/// 月平均銷量：近三個月合計 / 3，四捨五入取整
///
/// 月份不足三個時，缺少的月份以 0 計
pub fn average_monthly_sales(window_sales: &[i64]) -> i64 {
    let total: i64 = window_sales.iter().take(MONTH_WINDOW).sum();
    let average = Decimal::from(total) / Decimal::from(MONTH_WINDOW as i64);
    round_half_up(average, 0).to_i64().unwrap_or(0)
}

/// 取排序後的最後 N 個月份
pub fn last_months<'a, I>(months: I, count: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<String> = months.into_iter().cloned().collect();
    sorted.sort();
    sorted.dedup();

    let skip = sorted.len().saturating_sub(count);
    sorted.into_iter().skip(skip).collect()
}

/// 週轉率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnoverRatios {
    /// 倉庫庫存 / 月平均銷量（TW），無銷售時為 None
    pub turnover_weeks: Option<Decimal>,

    /// 全部庫存 / 月平均銷量（TO），無銷售時為 None
    pub turnover_overall: Option<Decimal>,
}

impl TurnoverRatios {
    /// 計算週轉率，四捨五入到小數一位
    pub fn calculate(warehouse_stock: i64, global_stock: i64, avg_monthly_sales: i64) -> Self {
        if avg_monthly_sales <= 0 {
            return Self::undefined();
        }

        let ratio = |stock: i64| {
            Decimal::from(stock)
                .checked_div(Decimal::from(avg_monthly_sales))
                .map(|r| round_half_up(r, 1))
        };

        Self {
            turnover_weeks: ratio(warehouse_stock),
            turnover_overall: ratio(global_stock),
        }
    }

    /// 無法計算（月平均銷量為 0）
    pub fn undefined() -> Self {
        Self {
            turnover_weeks: None,
            turnover_overall: None,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.turnover_weeks.is_some() && self.turnover_overall.is_some()
    }
}

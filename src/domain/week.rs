// ==========================================
// 需求分配引擎 - 交期周 (BSD / Due Week)
// ==========================================
// 格式: W<ww>'<yy>，例如 W49'23
// 比较: 先年后周，两位年份按原样比较（调用方不得跨世纪）
// ==========================================

use crate::domain::error::{ValidationError, ValidationResult};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 交期周
///
/// 字段顺序即排序顺序: (year, week)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DueWeek {
    year: u32,
    week: u32,
}

impl DueWeek {
    /// 构造交期周
    ///
    /// # 参数
    /// - `year`: 两位年份 (0..=99)
    /// - `week`: 周号 (1..=53)
    pub fn new(year: u32, week: u32) -> ValidationResult<Self> {
        if year > 99 {
            return Err(ValidationError::InvalidDueWeek {
                value: format!("W{:02}'{}", week, year),
                reason: "年份必须为两位数".to_string(),
            });
        }
        if !(1..=53).contains(&week) {
            return Err(ValidationError::InvalidDueWeek {
                value: format!("W{}'{:02}", week, year),
                reason: "周号必须在 1..=53".to_string(),
            });
        }
        Ok(Self { year, week })
    }

    /// 由日期计算所在 ISO 周
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year().rem_euclid(100) as u32,
            week: iso.week(),
        }
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// 扁平排序键: year * 52 + week
    pub fn sort_key(&self) -> u32 {
        self.year * 52 + self.week
    }

    /// 该周周一（按 2000 年代解释两位年份）
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(2000 + self.year as i32, self.week, Weekday::Mon)
    }

    /// 距参考周的提前期（周数，可为负表示已逾期）
    ///
    /// 优先使用 ISO 日历差；周号在该年不存在（如无第 53 周）时退回扁平排序键之差
    pub fn lead_time_from(&self, reference: DueWeek) -> i64 {
        match (self.monday(), reference.monday()) {
            (Some(due), Some(base)) => (due - base).num_weeks(),
            _ => self.sort_key() as i64 - reference.sort_key() as i64,
        }
    }
}

impl FromStr for DueWeek {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = |reason: &str| ValidationError::InvalidDueWeek {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let body = raw
            .strip_prefix('W')
            .or_else(|| raw.strip_prefix('w'))
            .ok_or_else(|| invalid("缺少 W 前缀"))?;
        let (week_part, year_part) = body
            .split_once('\'')
            .ok_or_else(|| invalid("缺少 ' 分隔符"))?;

        let week: u32 = week_part
            .trim()
            .parse()
            .map_err(|_| invalid("周号不是数字"))?;
        let year: u32 = year_part
            .trim()
            .parse()
            .map_err(|_| invalid("年份不是数字"))?;

        DueWeek::new(year, week).map_err(|_| invalid("周号或年份超出范围"))
    }
}

impl TryFrom<String> for DueWeek {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DueWeek> for String {
    fn from(w: DueWeek) -> Self {
        w.to_string()
    }
}

impl fmt::Display for DueWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{:02}'{:02}", self.week, self.year)
    }
}

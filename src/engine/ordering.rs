// ==========================================
// 需求分配引擎 - 需求排序
// ==========================================
// 职责: 按交期周分组，组间按时间先后，组内按剩余需求量降序
// 输入: 已校验的需求行
// 输出: 按交期周排列的分组序列
// ==========================================

use crate::domain::demand::DemandLine;
use crate::domain::week::DueWeek;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::instrument;

/// 同一交期周的需求行（组内已按剩余需求量降序）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueWeekGroup {
    pub due_week: DueWeek,
    pub lines: Vec<DemandLine>,
}

// ==========================================
// DemandOrdering - 需求排序器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DemandOrdering {
    // 无状态
}

impl DemandOrdering {
    pub fn new() -> Self {
        Self {}
    }

    /// 扁平排序
    ///
    /// 排序键: (year*52 + week, 工序字符串, 类型字符串)，字典序升序
    pub fn sort_flat(&self, mut lines: Vec<DemandLine>) -> Vec<DemandLine> {
        lines.sort_by(|a, b| self.compare_flat(a, b));
        lines
    }

    /// 按交期周分组
    ///
    /// 组间按 (year, week) 升序；组内按 remaining_balance 降序（稳定排序，保留输入顺序作为并列次序）
    pub fn group_by_due_week(&self, lines: Vec<DemandLine>) -> Vec<DueWeekGroup> {
        let mut grouped: BTreeMap<DueWeek, Vec<DemandLine>> = BTreeMap::new();
        for line in lines {
            grouped.entry(line.due_week).or_default().push(line);
        }

        grouped
            .into_iter()
            .map(|(due_week, mut lines)| {
                lines.sort_by(|a, b| b.remaining_balance.cmp(&a.remaining_balance));
                DueWeekGroup { due_week, lines }
            })
            .collect()
    }

    /// 完整排序流程: 扁平排序 -> 分组
    #[instrument(skip(self, lines), fields(count = lines.len()))]
    pub fn order(&self, lines: Vec<DemandLine>) -> Vec<DueWeekGroup> {
        let groups = self.group_by_due_week(self.sort_flat(lines));
        tracing::debug!(groups = groups.len(), "需求行已按交期周分组");
        groups
    }

    fn compare_flat(&self, a: &DemandLine, b: &DemandLine) -> Ordering {
        a.due_week
            .sort_key()
            .cmp(&b.due_week.sort_key())
            .then_with(|| a.finish_process.as_str().cmp(b.finish_process.as_str()))
            .then_with(|| a.finish_type.to_string().cmp(&b.finish_type.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(week: &str, part: &str, process: &str, ftype: &str, balance: i64) -> DemandLine {
        DemandLine::parse(week, part, process, ftype, balance, 100).unwrap()
    }

    #[test]
    fn test_groups_are_chronological_and_balance_descending() {
        let lines = vec![
            line("W02'25", "C", "LEADSCAN", "STD", 10),
            line("W50'24", "A", "LEADSCAN", "STD", 100),
            line("W50'24", "B", "TAPEREEL", "STD", 300),
            line("W02'25", "D", "LEADSCAN", "STD", 20),
        ];

        let groups = DemandOrdering::new().order(lines);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].due_week.to_string(), "W50'24");
        assert_eq!(groups[1].due_week.to_string(), "W02'25");

        let first: Vec<&str> = groups[0]
            .lines
            .iter()
            .map(|l| l.finish_part_number.as_str())
            .collect();
        assert_eq!(first, vec!["B", "A"]);

        let second: Vec<&str> = groups[1]
            .lines
            .iter()
            .map(|l| l.finish_part_number.as_str())
            .collect();
        assert_eq!(second, vec!["D", "C"]);
    }

    #[test]
    fn test_flat_sort_key_breaks_ties_by_process_then_type() {
        let lines = vec![
            line("W10'24", "T", "TAPEREEL", "STD", 1),
            line("W10'24", "L2", "LEADSCAN", "STD", 1),
            line("W10'24", "L1", "LEADSCAN", "CUST", 1),
            line("W09'24", "E", "TAPEREEL", "STD", 1),
        ];

        let sorted = DemandOrdering::new().sort_flat(lines);
        let parts: Vec<&str> = sorted
            .iter()
            .map(|l| l.finish_part_number.as_str())
            .collect();
        assert_eq!(parts, vec!["E", "L1", "L2", "T"]);
    }

    #[test]
    fn test_equal_balances_keep_flat_order() {
        let lines = vec![
            line("W10'24", "T", "TAPEREEL", "STD", 50),
            line("W10'24", "L", "LEADSCAN", "STD", 50),
        ];

        let groups = DemandOrdering::new().order(lines);
        assert_eq!(groups[0].lines[0].finish_part_number, "L");
        assert_eq!(groups[0].lines[1].finish_part_number, "T");
    }
}

//! Ordering and grouping of executions before replay.

use std::collections::BTreeMap;

use crate::records::TradeExecution;

/// Sorts executions by `deal_time`, keeping creation order among executions on the same day.
///
/// `sort_by_key` is stable, which is what makes same-day FIFO matching deterministic.
pub fn chronological<'a, I>(trades: I) -> Vec<&'a TradeExecution>
where
    I: IntoIterator<Item = &'a TradeExecution>,
{
    let mut ordered: Vec<&TradeExecution> = trades.into_iter().collect();
    ordered.sort_by_key(|trade| trade.deal_time);
    ordered
}

/// Groups executions per security id, each group in chronological order.
pub fn group_by_security<'a, I>(trades: I) -> BTreeMap<String, Vec<&'a TradeExecution>>
where
    I: IntoIterator<Item = &'a TradeExecution>,
{
    let mut groups: BTreeMap<String, Vec<&TradeExecution>> = BTreeMap::new();
    for trade in chronological(trades) {
        groups.entry(trade.sid.clone()).or_default().push(trade);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn trade(id: &str, sid: &str, d: u32) -> TradeExecution {
        TradeExecution::new(
            id,
            sid,
            NaiveDate::from_ymd_opt(2024, 5, d).unwrap(),
            dec!(1),
            1,
            dec!(0),
        )
    }

    #[test]
    fn test_same_day_keeps_creation_order() {
        let trades = vec![
            trade("late", "A", 9),
            trade("first", "A", 2),
            trade("second", "A", 2),
            trade("third", "A", 2),
        ];
        let ids: Vec<&str> = chronological(&trades).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third", "late"]);
    }

    #[test]
    fn test_group_by_security() {
        let trades = vec![trade("a1", "A", 3), trade("b1", "B", 1), trade("a0", "A", 1)];
        let groups = group_by_security(&trades);

        assert_eq!(groups.len(), 2);
        let a_ids: Vec<&str> = groups["A"].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(a_ids, vec!["a0", "a1"]);
    }
}

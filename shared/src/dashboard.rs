//! 控制面板统计

use crate::models::{Claim, ClaimStatus};

/// 控制面板上展示的最近理赔条数
pub const RECENT_CLAIMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClaimStats {
    pub total: usize,
    /// 待处理（含审核中）
    pub pending: usize,
    /// 已批准（含已结算）
    pub approved: usize,
    pub rejected: usize,
    pub total_estimated_loss: f64,
}

impl ClaimStats {
    pub fn from_claims(claims: &[Claim]) -> Self {
        claims.iter().fold(Self::default(), |mut stats, claim| {
            stats.total += 1;
            stats.total_estimated_loss += claim.estimated_loss;
            match claim.status {
                ClaimStatus::Pending | ClaimStatus::UnderReview => stats.pending += 1,
                ClaimStatus::Approved | ClaimStatus::Settled => stats.approved += 1,
                ClaimStatus::Rejected => stats.rejected += 1,
            }
            stats
        })
    }

    /// 批准率（百分比），没有理赔时为 `None`
    pub fn approval_rate(&self) -> Option<f64> {
        let decided = self.approved + self.rejected;
        (decided > 0).then(|| self.approved as f64 * 100.0 / decided as f64)
    }
}

/// 按创建时间倒序的前 `limit` 条理赔；没有时间戳的排在最后
pub fn recent_claims(claims: &[Claim], limit: usize) -> Vec<Claim> {
    let mut sorted = claims.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    sorted.truncate(limit);
    sorted
}

/// 金额显示，保留两位小数并加千分位
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisasterType, PropertyType};
    use chrono::{TimeZone, Utc};

    fn claim(id: u64, status: ClaimStatus, loss: f64, day: Option<u32>) -> Claim {
        Claim {
            id,
            disaster_type: DisasterType::Flood,
            property_type: PropertyType::House,
            description: String::new(),
            estimated_loss: loss,
            status,
            predicted_approval: None,
            predicted_limit: None,
            created_at: day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_under_review_counts_as_pending_and_settled_as_approved() {
        let claims = vec![
            claim(1, ClaimStatus::Pending, 100.0, Some(1)),
            claim(2, ClaimStatus::Approved, 200.0, Some(2)),
            claim(3, ClaimStatus::Settled, 300.0, Some(3)),
            claim(4, ClaimStatus::UnderReview, 400.0, Some(4)),
        ];
        let stats = ClaimStats::from_claims(&claims);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 0);
        assert_eq!(stats.total_estimated_loss, 1000.0);
    }

    #[test]
    fn test_empty_list() {
        let stats = ClaimStats::from_claims(&[]);
        assert_eq!(stats, ClaimStats::default());
        assert_eq!(stats.approval_rate(), None);
    }

    #[test]
    fn test_approval_rate_ignores_open_claims() {
        let claims = vec![
            claim(1, ClaimStatus::Approved, 1.0, None),
            claim(2, ClaimStatus::Rejected, 1.0, None),
            claim(3, ClaimStatus::Pending, 1.0, None),
        ];
        assert_eq!(ClaimStats::from_claims(&claims).approval_rate(), Some(50.0));
    }

    #[test]
    fn test_recent_claims_newest_first() {
        let claims = vec![
            claim(1, ClaimStatus::Pending, 1.0, Some(3)),
            claim(2, ClaimStatus::Pending, 1.0, None),
            claim(3, ClaimStatus::Pending, 1.0, Some(9)),
            claim(4, ClaimStatus::Pending, 1.0, Some(5)),
        ];
        let ids: Vec<_> = recent_claims(&claims, 3).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 4, 1]);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(-42.0), "-$42.00");
    }
}

//! Derived numbers for dashboard headers and summary cards.

use serde::Serialize;

use crate::types::{
    Automation, CreditPool, CreditUsage, DeliveryStatus, Lead, LeadStatus, MessageLog, Sheet,
};

pub fn total_credits<'a>(logs: impl IntoIterator<Item = &'a MessageLog>) -> u64 {
    logs.into_iter().map(|log| u64::from(log.credits)).sum()
}

pub fn active_count<'a>(automations: impl IntoIterator<Item = &'a Automation>) -> usize {
    automations.into_iter().filter(|a| a.enabled).count()
}

pub fn total_rows<'a>(sheets: impl IntoIterator<Item = &'a Sheet>) -> u64 {
    sheets.into_iter().map(|sheet| u64::from(sheet.rows)).sum()
}

/// `round(100 * used / total)`, or 0 when `total` is 0.
pub fn percent_used(used: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (used as f64 * 100.0 / total as f64).round() as u64
}

impl CreditPool {
    pub fn percent_used(&self) -> u64 {
        percent_used(u64::from(self.used), u64::from(self.total))
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.used)
    }
}

impl CreditUsage {
    pub fn remaining(&self) -> u64 {
        u64::from(self.email.remaining()) + u64::from(self.sms.remaining())
    }
}

/// Count per lead status, in display order, zero counts included.
pub fn lead_status_counts<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> Vec<(LeadStatus, usize)> {
    let mut counts: Vec<(LeadStatus, usize)> =
        LeadStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for lead in leads {
        if let Some(entry) = counts.iter_mut().find(|(status, _)| *status == lead.status) {
            entry.1 += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliverySummary {
    pub total: usize,
    pub credits: u64,
    pub by_status: Vec<(DeliveryStatus, usize)>,
}

impl DeliverySummary {
    pub fn count(&self, status: DeliveryStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Messages that reached the recipient (delivered, opened or clicked).
    pub fn reached(&self) -> usize {
        self.count(DeliveryStatus::Delivered)
            + self.count(DeliveryStatus::Opened)
            + self.count(DeliveryStatus::Clicked)
    }
}

pub fn delivery_summary<'a>(logs: impl IntoIterator<Item = &'a MessageLog>) -> DeliverySummary {
    let mut summary = DeliverySummary {
        by_status: DeliveryStatus::ALL.iter().map(|status| (*status, 0)).collect(),
        ..DeliverySummary::default()
    };
    for log in logs {
        summary.total += 1;
        summary.credits += u64::from(log.credits);
        if let Some(entry) = summary.by_status.iter_mut().find(|(s, _)| *s == log.status) {
            entry.1 += 1;
        }
    }
    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBand {
    Healthy,
    Degraded,
    Failing,
}

impl RateBand {
    pub fn for_rate(success_rate: f64) -> Self {
        if success_rate >= 97.0 {
            RateBand::Healthy
        } else if success_rate >= 90.0 {
            RateBand::Degraded
        } else {
            RateBand::Failing
        }
    }
}

impl Automation {
    pub fn rate_band(&self) -> RateBand {
        RateBand::for_rate(self.success_rate)
    }
}

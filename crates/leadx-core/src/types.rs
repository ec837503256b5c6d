// crates/leadx-core/src/types.rs

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use leadx_repository::Record;
use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Declares a closed set of values that carry a display label.
///
/// The label is what the list views show, what filter selections are parsed
/// from (case-insensitively) and what data files serialize.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = LabelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| LabelError {
                        kind: $kind,
                        value: trimmed.to_string(),
                    })
            }
        }
    };
}

labelled_enum!(LeadStatus, "lead status" {
    New => "New",
    Active => "Active",
    Contacted => "Contacted",
    Responded => "Responded",
    Unsubscribed => "Unsubscribed",
});

labelled_enum!(LeadSource, "lead source" {
    GoogleSheets => "Google Sheets",
    CsvImport => "CSV Import",
    Manual => "Manual",
    Api => "API",
});

labelled_enum!(Trigger, "trigger" {
    NewRow => "New Row",
    StatusChange => "Status Change",
    TimeDelay => "Time Delay",
    Scheduled => "Scheduled",
});

labelled_enum!(ActionKind, "action" {
    SendEmail => "Send Email",
    SendSms => "Send SMS",
});

labelled_enum!(
    /// Delivery channel of a message. Also used as the template kind.
    Channel, "channel" {
        Email => "email",
        Sms => "sms",
    }
);

labelled_enum!(DeliveryStatus, "delivery status" {
    Delivered => "delivered",
    Opened => "opened",
    Clicked => "clicked",
    Bounced => "bounced",
    Failed => "failed",
    Pending => "pending",
});

labelled_enum!(SyncStatus, "sync status" {
    Synced => "synced",
    Syncing => "syncing",
    Error => "error",
});

impl ActionKind {
    pub fn channel(&self) -> Channel {
        match self {
            ActionKind::SendEmail => Channel::Email,
            ActionKind::SendSms => Channel::Sms,
        }
    }
}

pub type TemplateKind = Channel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub source: LeadSource,
    pub last_contacted: Option<NaiveDateTime>,
    pub created_date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Newest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<LeadNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadNote {
    pub id: String,
    pub text: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub id: String,
    pub name: String,
    pub trigger: Trigger,
    pub action: ActionKind,
    pub sheet: String,
    pub enabled: bool,
    pub last_run: String,
    /// Percentage in `0.0..=100.0`.
    pub success_rate: f64,
    pub runs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLog {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub lead_name: String,
    pub lead_email: String,
    pub channel: Channel,
    pub automation: String,
    pub status: DeliveryStatus,
    pub credits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    pub provider: String,
    pub provider_message_id: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: String,
    pub name: String,
    pub tab: String,
    pub status: SyncStatus,
    pub last_sync: String,
    pub rows: u32,
    pub automations: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    pub category: String,
    pub variables: Vec<String>,
    pub last_edited: String,
    pub preview: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreditPool {
    pub used: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreditUsage {
    pub email: CreditPool,
    pub sms: CreditPool,
}

impl Record for Lead {
    const KIND: &'static str = "lead";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Automation {
    const KIND: &'static str = "automation";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for MessageLog {
    const KIND: &'static str = "message";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Sheet {
    const KIND: &'static str = "sheet";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Template {
    const KIND: &'static str = "template";

    fn id(&self) -> &str {
        &self.id
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfileView {
        pub uid: String,
        pub display_name: String,
        pub email: String,
        pub photo_url: Option<String>,
        /// Summary of the environment the user belongs to, if any.
        pub ambiente: Option<environment::AmbienteSummary>,
        /// True when the user still has to create or join an environment.
        pub needs_setup: bool,
    }

    /// Request body for editing the profile. At least one field must be
    /// present.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProfileUpdate {
        pub display_name: Option<String>,
        pub photo_url: Option<String>,
    }
}

pub mod environment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AmbienteNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AmbienteUpdate {
        pub name: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AmbienteSummary {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AmbienteView {
        pub id: String,
        pub name: String,
        pub owner_id: String,
        /// Members in join order.
        pub members: Vec<MemberView>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MemberView {
        pub uid: String,
        pub display_name: String,
        pub email: String,
        pub photo_url: Option<String>,
    }

    /// Request body for kicking a member (owner only).
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RemoveMember {
        pub uid: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// The `type` filter of the list and report endpoints.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TypeFilter {
        #[default]
        All,
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListQuery {
        pub ambiente_id: String,
        #[serde(rename = "type", default)]
        pub kind: TypeFilter,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub page_size: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub ambiente_id: String,
        pub description: String,
        /// Decimal string, e.g. "49.90".
        pub amount: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub category: Option<String>,
        pub date: NaiveDate,
    }

    /// Request body for editing an entry. Absent fields keep their stored
    /// value; an empty `category` clears it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        pub description: Option<String>,
        pub amount: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        pub category: Option<String>,
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: String,
        pub ambiente_id: String,
        pub description: String,
        pub amount: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub category: Option<String>,
        pub date: NaiveDate,
        pub added_by: String,
        pub added_by_name: String,
        pub related_goal_id: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// Request body of the CSV batch import.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BatchImport {
        pub ambiente_id: String,
        /// Raw CSV text, header row included.
        pub csv: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BatchImported {
        pub imported: usize,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalQuery {
        pub ambiente_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalNew {
        pub ambiente_id: String,
        pub name: String,
        /// Decimal string, must be positive.
        pub target_amount: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalDeposit {
        pub ambiente_id: String,
        /// Decimal string, must be positive.
        pub amount: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalView {
        pub id: String,
        pub ambiente_id: String,
        pub name: String,
        pub target_amount: String,
        pub current_amount: String,
        pub owner_id: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }
}

pub mod invite {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InviteStatus {
        Pending,
        Accepted,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InviteNew {
        /// Recipient email; matched case-insensitively on acceptance.
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InviteView {
        pub id: String,
        pub sender_id: String,
        pub sender_name: String,
        pub recipient_email: String,
        pub ambiente_id: String,
        pub ambiente_name: String,
        pub status: InviteStatus,
        pub created_at: DateTime<Utc>,
        pub accepted_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InviteListResponse {
        pub invites: Vec<InviteView>,
    }

    /// What accepting an invite would do, without doing it.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvitePreviewView {
        pub invite: InviteView,
        pub current_ambiente: Option<environment::AmbienteSummary>,
        pub will_leave_current: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InviteAccepted {
        pub ambiente: environment::AmbienteSummary,
        pub left_ambiente_id: Option<String>,
    }
}

pub mod report {
    use super::*;
    use super::transaction::TypeFilter;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportQuery {
        pub ambiente_id: String,
        #[serde(rename = "type", default)]
        pub kind: TypeFilter,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TotalsView {
        pub income: String,
        pub expense: String,
        pub balance: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryTotalView {
        pub category: String,
        pub total: String,
        /// Hex chart color, stable per category within a response set.
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DailyPointView {
        pub date: NaiveDate,
        pub income: String,
        pub expense: String,
        pub balance: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportView {
        pub totals: TotalsView,
        pub expense_by_category: Vec<CategoryTotalView>,
        pub income_by_category: Vec<CategoryTotalView>,
        pub daily: Vec<DailyPointView>,
    }
}

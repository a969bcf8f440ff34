//! Kingmi receivable records: issuance, settlement, transfer, financing and
//! repayment history.
use super::error::ValidationError;
use super::schema::{
    Filter, Record, RecordKind, later, later_if_both, legal, null_as_empty, one_of, positive,
    present, unset,
};
use serde::{Deserialize, Serialize};

/// 1 accounts receivable, 2 accounts payable
pub const CREDENTIAL_TYPES: &[i64] = &[1, 2];
pub const FLAGS: &[i64] = &[0, 1];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default = "unset")]
    pub kingmi_id: i64,
    #[serde(default = "unset")]
    pub open_enterprise_id: i64,
    #[serde(default = "unset")]
    pub down_enterprise_id: i64,
    #[serde(default = "unset")]
    pub factorying_enterprise_id: i64,
    #[serde(default = "unset")]
    pub credential_type: i64,
    #[serde(default = "unset")]
    pub amount: i64,
    #[serde(default = "unset")]
    pub created_date: i64,
    #[serde(default = "unset")]
    pub due_date: i64,
    #[serde(default = "unset")]
    pub if_guarantee: i64,
    #[serde(default = "unset")]
    pub if_transfer: i64,
    #[serde(default = "unset")]
    pub if_delay: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApplicationFilter {
    pub kingmi_id: Option<i64>,
    pub open_enterprise_id: Option<i64>,
    pub down_enterprise_id: Option<i64>,
    pub factorying_enterprise_id: Option<i64>,
    pub credential_type: Option<i64>,
    pub created_date: Option<i64>,
    pub due_date: Option<i64>,
    pub if_guarantee: Option<i64>,
    pub if_transfer: Option<i64>,
    pub if_delay: Option<i64>,
}

impl Record for Application {
    const KIND: RecordKind = RecordKind::Application;
    type Filter = ApplicationFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("kingmiId", self.kingmi_id)?;
        legal("openEnterpriseId", self.open_enterprise_id)?;
        legal("downEnterpriseId", self.down_enterprise_id)?;
        legal("factoryingEnterpriseId", self.factorying_enterprise_id)?;
        one_of("credentialType", self.credential_type, CREDENTIAL_TYPES)?;
        positive("amount", self.amount)?;
        positive("createdDate", self.created_date)?;
        positive("dueDate", self.due_date)?;
        later(("createdDate", self.created_date), ("dueDate", self.due_date))?;
        one_of("ifGuarantee", self.if_guarantee, FLAGS)?;
        one_of("ifTransfer", self.if_transfer, FLAGS)?;
        one_of("ifDelay", self.if_delay, FLAGS)
    }

    fn natural_key(&self) -> Vec<String> {
        vec![self.kingmi_id.to_string()]
    }
}

impl Filter for ApplicationFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.kingmi_id, |v| legal("kingmiId", v))?;
        present(self.open_enterprise_id, |v| legal("openEnterpriseId", v))?;
        present(self.down_enterprise_id, |v| legal("downEnterpriseId", v))?;
        present(self.factorying_enterprise_id, |v| {
            legal("factoryingEnterpriseId", v)
        })?;
        present(self.credential_type, |v| {
            one_of("credentialType", v, CREDENTIAL_TYPES)
        })?;
        present(self.created_date, |v| positive("createdDate", v))?;
        present(self.due_date, |v| positive("dueDate", v))?;
        later_if_both(
            ("createdDate", self.created_date),
            ("dueDate", self.due_date),
        )?;
        present(self.if_guarantee, |v| one_of("ifGuarantee", v, FLAGS))?;
        present(self.if_transfer, |v| one_of("ifTransfer", v, FLAGS))?;
        present(self.if_delay, |v| one_of("ifDelay", v, FLAGS))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    #[serde(default = "unset")]
    pub kingmi_id: i64,
    #[serde(default = "unset")]
    pub due_date: i64,
    #[serde(default = "unset")]
    pub soa_date: i64,
    #[serde(default = "unset")]
    pub amount: i64,
    #[serde(default = "unset")]
    pub due_interest: i64,
    #[serde(default)]
    pub overdue_days: i64,
    #[serde(default)]
    pub overdue_penalty: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettlementFilter {
    pub kingmi_id: Option<i64>,
    pub due_date: Option<i64>,
    pub soa_date: Option<i64>,
}

impl Record for Settlement {
    const KIND: RecordKind = RecordKind::Settlement;
    type Filter = SettlementFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("kingmiId", self.kingmi_id)?;
        positive("dueDate", self.due_date)?;
        positive("soaDate", self.soa_date)?;
        positive("amount", self.amount)?;
        positive("dueInterest", self.due_interest)?;
        legal("overdueDays", self.overdue_days)?;
        legal("overduePenalty", self.overdue_penalty)
    }

    fn natural_key(&self) -> Vec<String> {
        vec![self.kingmi_id.to_string()]
    }
}

impl Filter for SettlementFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.kingmi_id, |v| legal("kingmiId", v))?;
        present(self.due_date, |v| positive("dueDate", v))?;
        present(self.soa_date, |v| positive("soaDate", v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(default = "unset")]
    pub kingmi_id: i64,
    #[serde(default = "unset")]
    pub transferee: i64,
    #[serde(default = "unset")]
    pub amount: i64,
    #[serde(default = "unset")]
    pub transfer_date: i64,
    #[serde(default = "unset")]
    pub due_date: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransferFilter {
    pub kingmi_id: Option<i64>,
    pub transferee: Option<i64>,
    pub transfer_date: Option<i64>,
    pub due_date: Option<i64>,
}

impl Record for Transfer {
    const KIND: RecordKind = RecordKind::Transfer;
    type Filter = TransferFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("kingmiId", self.kingmi_id)?;
        legal("transferee", self.transferee)?;
        positive("amount", self.amount)?;
        positive("transferDate", self.transfer_date)?;
        positive("dueDate", self.due_date)?;
        later(
            ("transferDate", self.transfer_date),
            ("dueDate", self.due_date),
        )
    }

    fn natural_key(&self) -> Vec<String> {
        vec![self.kingmi_id.to_string()]
    }
}

impl Filter for TransferFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.kingmi_id, |v| legal("kingmiId", v))?;
        present(self.transferee, |v| legal("transferee", v))?;
        present(self.transfer_date, |v| positive("transferDate", v))?;
        present(self.due_date, |v| positive("dueDate", v))?;
        later_if_both(
            ("transferDate", self.transfer_date),
            ("dueDate", self.due_date),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financing {
    #[serde(default = "unset")]
    pub financing_id: i64,
    #[serde(default = "unset")]
    pub amount: i64,
    #[serde(default = "unset")]
    pub due_date: i64,
    #[serde(default = "unset")]
    pub if_protocol_interest: i64,
    #[serde(default = "unset")]
    pub protocol_interest_proportion: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FinancingFilter {
    pub financing_id: Option<i64>,
    pub due_date: Option<i64>,
    pub if_protocol_interest: Option<i64>,
}

impl Record for Financing {
    const KIND: RecordKind = RecordKind::Financing;
    type Filter = FinancingFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("financingId", self.financing_id)?;
        positive("amount", self.amount)?;
        positive("dueDate", self.due_date)?;
        one_of("ifProtocolInterest", self.if_protocol_interest, FLAGS)?;
        legal(
            "protocolInterestProportion",
            self.protocol_interest_proportion,
        )
    }

    fn natural_key(&self) -> Vec<String> {
        vec![self.financing_id.to_string()]
    }
}

impl Filter for FinancingFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.financing_id, |v| legal("financingId", v))?;
        present(self.due_date, |v| positive("dueDate", v))?;
        present(self.if_protocol_interest, |v| {
            one_of("ifProtocolInterest", v, FLAGS)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentHistory {
    #[serde(default = "unset")]
    pub financing_id: i64,
    #[serde(default = "unset")]
    pub due_repayment: i64,
    #[serde(default = "unset")]
    pub due_interest: i64,
    #[serde(default = "unset")]
    pub due_date: i64,
    #[serde(default = "unset")]
    pub repayment_amount: i64,
    #[serde(default = "unset")]
    pub repayment_date: i64,
    #[serde(default)]
    pub overdue_payment: i64,
    #[serde(default)]
    pub overdue_days: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepaymentHistoryFilter {
    pub financing_id: Option<i64>,
    pub due_date: Option<i64>,
    pub repayment_date: Option<i64>,
}

impl Record for RepaymentHistory {
    const KIND: RecordKind = RecordKind::RepaymentHistory;
    type Filter = RepaymentHistoryFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("financingId", self.financing_id)?;
        positive("dueRepayment", self.due_repayment)?;
        positive("dueInterest", self.due_interest)?;
        positive("dueDate", self.due_date)?;
        positive("repaymentAmount", self.repayment_amount)?;
        positive("repaymentDate", self.repayment_date)?;
        legal("overduePayment", self.overdue_payment)?;
        legal("overdueDays", self.overdue_days)
    }

    fn natural_key(&self) -> Vec<String> {
        vec![self.financing_id.to_string()]
    }
}

impl Filter for RepaymentHistoryFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.financing_id, |v| legal("financingId", v))?;
        present(self.due_date, |v| positive("dueDate", v))?;
        present(self.repayment_date, |v| positive("repaymentDate", v))
    }
}

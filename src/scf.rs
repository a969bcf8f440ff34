//! Supply-chain-finance platform records keyed under a credit-granting company
use super::error::ValidationError;
use super::schema::{
    Filter, Record, RecordKind, later, later_if_both, legal, non_empty, null_as_empty, positive,
    present, unset,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScfUserCompany {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company_name: String,
    #[serde(default = "unset")]
    pub credit_granting_company_id: i64,
    #[serde(default = "unset")]
    pub certificate_no: i64,
    #[serde(default = "unset")]
    pub pass_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScfUserCompanyFilter {
    pub company_name: Option<String>,
    pub credit_granting_company_id: Option<i64>,
    pub certificate_no: Option<i64>,
    pub pass_time: Option<i64>,
}

impl Record for ScfUserCompany {
    const KIND: RecordKind = RecordKind::ScfUserCompany;
    type Filter = ScfUserCompanyFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("companyName", &self.company_name)?;
        legal("creditGrantingCompanyId", self.credit_granting_company_id)?;
        legal("certificateNo", self.certificate_no)?;
        positive("passTime", self.pass_time)
    }

    fn natural_key(&self) -> Vec<String> {
        vec![
            self.credit_granting_company_id.to_string(),
            self.certificate_no.to_string(),
        ]
    }
}

impl Filter for ScfUserCompanyFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.company_name.as_deref(), |v| non_empty("companyName", v))?;
        present(self.credit_granting_company_id, |v| {
            legal("creditGrantingCompanyId", v)
        })?;
        present(self.certificate_no, |v| legal("certificateNo", v))?;
        present(self.pass_time, |v| positive("passTime", v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScfFinance {
    #[serde(default = "unset")]
    pub credit_granting_company_id: i64,
    #[serde(default = "unset")]
    pub core_company_id: i64,
    #[serde(default = "unset")]
    pub financing_no: i64,
    #[serde(default = "unset")]
    pub financing_amount: i64,
    /// Financing term in days.
    #[serde(default = "unset")]
    pub term: i64,
    /// Older clients send this as `CredentialNo`.
    #[serde(default = "unset", alias = "CredentialNo")]
    pub credential_no: i64,
    #[serde(default = "unset")]
    pub interest: i64,
    #[serde(default = "unset")]
    pub apply_date: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScfFinanceFilter {
    pub credit_granting_company_id: Option<i64>,
    pub core_company_id: Option<i64>,
    pub financing_no: Option<i64>,
    pub financing_amount: Option<i64>,
    pub term: Option<i64>,
    pub credential_no: Option<i64>,
    pub interest: Option<i64>,
    pub apply_date: Option<i64>,
}

impl Record for ScfFinance {
    const KIND: RecordKind = RecordKind::ScfFinance;
    type Filter = ScfFinanceFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("creditGrantingCompanyId", self.credit_granting_company_id)?;
        legal("coreCompanyId", self.core_company_id)?;
        legal("financingNo", self.financing_no)?;
        positive("financingAmount", self.financing_amount)?;
        positive("term", self.term)?;
        legal("credentialNo", self.credential_no)?;
        legal("interest", self.interest)?;
        positive("applyDate", self.apply_date)
    }

    fn natural_key(&self) -> Vec<String> {
        vec![
            self.credit_granting_company_id.to_string(),
            self.financing_no.to_string(),
        ]
    }
}

impl Filter for ScfFinanceFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.credit_granting_company_id, |v| {
            legal("creditGrantingCompanyId", v)
        })?;
        present(self.core_company_id, |v| legal("coreCompanyId", v))?;
        present(self.financing_no, |v| legal("financingNo", v))?;
        present(self.financing_amount, |v| positive("financingAmount", v))?;
        present(self.term, |v| positive("term", v))?;
        present(self.credential_no, |v| legal("credentialNo", v))?;
        present(self.interest, |v| legal("interest", v))?;
        present(self.apply_date, |v| positive("applyDate", v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScfLoan {
    #[serde(default = "unset")]
    pub credit_granting_company_id: i64,
    #[serde(default = "unset")]
    pub financing_no: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub payee_name: String,
    #[serde(default = "unset")]
    pub loan_amount: i64,
    #[serde(default = "unset")]
    pub loan_date: i64,
    #[serde(default = "unset")]
    pub due_date: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScfLoanFilter {
    pub credit_granting_company_id: Option<i64>,
    pub financing_no: Option<i64>,
    pub payee_name: Option<String>,
    pub loan_amount: Option<i64>,
    pub loan_date: Option<i64>,
    pub due_date: Option<i64>,
}

impl Record for ScfLoan {
    const KIND: RecordKind = RecordKind::ScfLoan;
    type Filter = ScfLoanFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("creditGrantingCompanyId", self.credit_granting_company_id)?;
        legal("financingNo", self.financing_no)?;
        non_empty("payeeName", &self.payee_name)?;
        positive("loanAmount", self.loan_amount)?;
        positive("loanDate", self.loan_date)?;
        positive("dueDate", self.due_date)?;
        later(("loanDate", self.loan_date), ("dueDate", self.due_date))
    }

    fn natural_key(&self) -> Vec<String> {
        vec![
            self.credit_granting_company_id.to_string(),
            self.financing_no.to_string(),
        ]
    }
}

impl Filter for ScfLoanFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.credit_granting_company_id, |v| {
            legal("creditGrantingCompanyId", v)
        })?;
        present(self.financing_no, |v| legal("financingNo", v))?;
        present(self.payee_name.as_deref(), |v| non_empty("payeeName", v))?;
        present(self.loan_amount, |v| positive("loanAmount", v))?;
        present(self.loan_date, |v| positive("loanDate", v))?;
        present(self.due_date, |v| positive("dueDate", v))?;
        later_if_both(("loanDate", self.loan_date), ("dueDate", self.due_date))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScfContract {
    #[serde(default = "unset")]
    pub credit_granting_company_id: i64,
    #[serde(default = "unset")]
    pub core_company_id: i64,
    #[serde(default = "unset")]
    pub financing_no: i64,
    #[serde(default = "unset")]
    pub contract_no: i64,
    #[serde(default = "unset")]
    pub sign_date: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default = "unset")]
    pub contract_template_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScfContractFilter {
    pub credit_granting_company_id: Option<i64>,
    pub core_company_id: Option<i64>,
    pub financing_no: Option<i64>,
    pub contract_no: Option<i64>,
    pub sign_date: Option<i64>,
    pub subject: Option<String>,
    pub contract_template_id: Option<i64>,
}

impl Record for ScfContract {
    const KIND: RecordKind = RecordKind::ScfContract;
    type Filter = ScfContractFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("creditGrantingCompanyId", self.credit_granting_company_id)?;
        legal("coreCompanyId", self.core_company_id)?;
        legal("financingNo", self.financing_no)?;
        legal("contractNo", self.contract_no)?;
        positive("signDate", self.sign_date)?;
        non_empty("subject", &self.subject)?;
        legal("contractTemplateId", self.contract_template_id)
    }

    fn natural_key(&self) -> Vec<String> {
        vec![
            self.credit_granting_company_id.to_string(),
            self.contract_no.to_string(),
        ]
    }
}

impl Filter for ScfContractFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.credit_granting_company_id, |v| {
            legal("creditGrantingCompanyId", v)
        })?;
        present(self.core_company_id, |v| legal("coreCompanyId", v))?;
        present(self.financing_no, |v| legal("financingNo", v))?;
        present(self.contract_no, |v| legal("contractNo", v))?;
        present(self.sign_date, |v| positive("signDate", v))?;
        present(self.subject.as_deref(), |v| non_empty("subject", v))?;
        present(self.contract_template_id, |v| {
            legal("contractTemplateId", v)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScfLoanRepayment {
    #[serde(default = "unset")]
    pub credit_granting_company_id: i64,
    #[serde(default = "unset")]
    pub financing_no: i64,
    #[serde(default = "unset")]
    pub repayment_amount: i64,
    #[serde(default = "unset")]
    pub repayment_interest: i64,
    #[serde(default = "unset")]
    pub repayment_principal: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScfLoanRepaymentFilter {
    pub credit_granting_company_id: Option<i64>,
    pub financing_no: Option<i64>,
    pub repayment_amount: Option<i64>,
    pub repayment_interest: Option<i64>,
    pub repayment_principal: Option<i64>,
}

impl Record for ScfLoanRepayment {
    const KIND: RecordKind = RecordKind::ScfLoanRepayment;
    type Filter = ScfLoanRepaymentFilter;

    fn validate(&self) -> Result<(), ValidationError> {
        legal("creditGrantingCompanyId", self.credit_granting_company_id)?;
        legal("financingNo", self.financing_no)?;
        positive("repaymentAmount", self.repayment_amount)?;
        legal("repaymentInterest", self.repayment_interest)?;
        legal("repaymentPrincipal", self.repayment_principal)
    }

    fn natural_key(&self) -> Vec<String> {
        vec![
            self.credit_granting_company_id.to_string(),
            self.financing_no.to_string(),
        ]
    }
}

impl Filter for ScfLoanRepaymentFilter {
    fn validate(&self) -> Result<(), ValidationError> {
        present(self.credit_granting_company_id, |v| {
            legal("creditGrantingCompanyId", v)
        })?;
        present(self.financing_no, |v| legal("financingNo", v))?;
        present(self.repayment_amount, |v| positive("repaymentAmount", v))?;
        present(self.repayment_interest, |v| legal("repaymentInterest", v))?;
        present(self.repayment_principal, |v| legal("repaymentPrincipal", v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_company_name_is_rejected() {
        let company: ScfUserCompany = serde_json::from_str(
            r#"{"companyName":"","creditGrantingCompanyId":1,"certificateNo":2,"passTime":3}"#,
        )
        .unwrap();
        assert_eq!(
            company.validate(),
            Err(ValidationError::Empty {
                field: "companyName"
            })
        );
    }

    #[test]
    fn loan_key_has_company_and_financing_number() {
        let loan = ScfLoan {
            credit_granting_company_id: 12,
            financing_no: 3400,
            payee_name: "Acme Components".into(),
            loan_amount: 90_000,
            loan_date: 20230105,
            due_date: 20230705,
        };
        assert!(loan.validate().is_ok());
        assert_eq!(loan.natural_key(), vec!["12".to_string(), "3400".into()]);
    }

    #[test]
    fn loan_due_date_follows_loan_date() {
        let loan = ScfLoan {
            credit_granting_company_id: 12,
            financing_no: 3400,
            payee_name: "Acme Components".into(),
            loan_amount: 90_000,
            loan_date: 20230705,
            due_date: 20230105,
        };
        assert_eq!(loan.validate().unwrap_err().field(), "dueDate");
    }

    #[test]
    fn repayment_interest_may_be_zero() {
        let repayment = ScfLoanRepayment {
            credit_granting_company_id: 1,
            financing_no: 2,
            repayment_amount: 300,
            repayment_interest: 0,
            repayment_principal: 300,
        };
        assert!(repayment.validate().is_ok());
    }

    #[test]
    fn finance_requires_term() {
        let finance: ScfFinance = serde_json::from_str(
            r#"{"creditGrantingCompanyId":1,"coreCompanyId":2,"financingNo":3,
                "financingAmount":4000,"credentialNo":5,"interest":6,"applyDate":20230101}"#,
        )
        .unwrap();
        assert_eq!(
            finance.validate(),
            Err(ValidationError::Missing { field: "term" })
        );
    }

    #[test]
    fn finance_accepts_legacy_credential_no() {
        let finance: ScfFinance = serde_json::from_str(
            r#"{"creditGrantingCompanyId":1,"coreCompanyId":2,"financingNo":3,
                "financingAmount":4000,"term":90,"CredentialNo":5,"interest":6,
                "applyDate":20230101}"#,
        )
        .unwrap();
        assert_eq!(finance.credential_no, 5);
        assert!(finance.validate().is_ok());

        // stored under the camelCase name
        let doc: serde_json::Value = serde_json::from_slice(&finance.encode().unwrap()).unwrap();
        assert_eq!(doc["credentialNo"], serde_json::json!(5));
        assert!(doc.get("CredentialNo").is_none());
    }

    #[test]
    fn null_payee_name_reads_as_empty() {
        let loan: ScfLoan = serde_json::from_str(
            r#"{"creditGrantingCompanyId":1,"financingNo":2,"payeeName":null,
                "loanAmount":10,"loanDate":1,"dueDate":2}"#,
        )
        .unwrap();
        assert_eq!(
            loan.validate(),
            Err(ValidationError::Empty { field: "payeeName" })
        );
    }
}

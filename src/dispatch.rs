//! Named-operation dispatch onto the record pipelines
use super::context::{Invocation, Response};
use super::error::InvokeError;
use super::kingmi::{Application, Financing, RepaymentHistory, Settlement, Transfer};
use super::schema::RecordKind;
use super::scf::{ScfContract, ScfFinance, ScfLoan, ScfLoanRepayment, ScfUserCompany};
use super::service::RecordService;
use super::store::StateStore;
use std::collections::HashMap;
use tracing::{debug, info_span, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Init,
    Apply,
    QueryApplication,
    Settle,
    QuerySettlement,
    Transfer,
    QueryTransfer,
    Financing,
    QueryFinance,
    WriteRepaymentHistory,
    QueryRepaymentHistory,
    CreateScfUserCompany,
    QueryScfUserCompany,
    CreateScfFinance,
    QueryScfFinance,
    CreateScfLoan,
    QueryScfLoan,
    CreateScfContract,
    QueryScfContract,
    CreateScfLoanRepayment,
    QueryScfLoanRepayment,
}

impl Operation {
    pub const ALL: [Operation; 21] = [
        Self::Init,
        Self::Apply,
        Self::QueryApplication,
        Self::Settle,
        Self::QuerySettlement,
        Self::Transfer,
        Self::QueryTransfer,
        Self::Financing,
        Self::QueryFinance,
        Self::WriteRepaymentHistory,
        Self::QueryRepaymentHistory,
        Self::CreateScfUserCompany,
        Self::QueryScfUserCompany,
        Self::CreateScfFinance,
        Self::QueryScfFinance,
        Self::CreateScfLoan,
        Self::QueryScfLoan,
        Self::CreateScfContract,
        Self::QueryScfContract,
        Self::CreateScfLoanRepayment,
        Self::QueryScfLoanRepayment,
    ];

    /// Name callers invoke the operation by.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Apply => "Apply",
            Self::QueryApplication => "QueryApplication",
            Self::Settle => "Settle",
            Self::QuerySettlement => "QuerySettlement",
            Self::Transfer => "Transfer",
            Self::QueryTransfer => "QueryTransfer",
            Self::Financing => "Financing",
            Self::QueryFinance => "QueryFinance",
            Self::WriteRepaymentHistory => "WriteRepaymentHistory",
            Self::QueryRepaymentHistory => "QueryRepaymentHistory",
            Self::CreateScfUserCompany => "CreateSCFUserCompany",
            Self::QueryScfUserCompany => "QuerySCFUserCompany",
            Self::CreateScfFinance => "CreateSCFFinance",
            Self::QueryScfFinance => "QuerySCFFinance",
            Self::CreateScfLoan => "CreateSCFLoan",
            Self::QueryScfLoan => "QuerySCFLoan",
            Self::CreateScfContract => "CreateSCFContract",
            Self::QueryScfContract => "QuerySCFContract",
            Self::CreateScfLoanRepayment => "CreateSCFLoanRepayment",
            Self::QueryScfLoanRepayment => "QuerySCFLoanRepayment",
        }
    }

    /// Record type the operation reads or writes; `None` for `Init`.
    pub fn record_kind(&self) -> Option<RecordKind> {
        let kind = match self {
            Self::Init => return None,
            Self::Apply | Self::QueryApplication => RecordKind::Application,
            Self::Settle | Self::QuerySettlement => RecordKind::Settlement,
            Self::Transfer | Self::QueryTransfer => RecordKind::Transfer,
            Self::Financing | Self::QueryFinance => RecordKind::Financing,
            Self::WriteRepaymentHistory | Self::QueryRepaymentHistory => {
                RecordKind::RepaymentHistory
            }
            Self::CreateScfUserCompany | Self::QueryScfUserCompany => RecordKind::ScfUserCompany,
            Self::CreateScfFinance | Self::QueryScfFinance => RecordKind::ScfFinance,
            Self::CreateScfLoan | Self::QueryScfLoan => RecordKind::ScfLoan,
            Self::CreateScfContract | Self::QueryScfContract => RecordKind::ScfContract,
            Self::CreateScfLoanRepayment | Self::QueryScfLoanRepayment => {
                RecordKind::ScfLoanRepayment
            }
        };
        Some(kind)
    }
}

pub struct Dispatcher<S> {
    service: RecordService<S>,
    operations: HashMap<&'static str, Operation>,
}

impl<S: StateStore> Dispatcher<S> {
    pub fn new(store: S) -> Self {
        let operations = Operation::ALL.iter().map(|op| (op.name(), *op)).collect();
        Self {
            service: RecordService::new(store),
            operations,
        }
    }

    pub fn service(&self) -> &RecordService<S> {
        &self.service
    }

    pub fn resolve(&self, function: &str) -> Result<Operation, InvokeError> {
        self.operations
            .get(function)
            .copied()
            .ok_or_else(|| InvokeError::UnknownOperation(function.to_string()))
    }

    pub fn execute(&self, operation: Operation, args: &[String]) -> Result<Vec<u8>, InvokeError> {
        let service = &self.service;
        match operation {
            Operation::Init => Ok(Vec::new()),
            Operation::Apply => service.create::<Application>(args),
            Operation::QueryApplication => service.query::<Application>(args),
            Operation::Settle => service.create::<Settlement>(args),
            Operation::QuerySettlement => service.query::<Settlement>(args),
            Operation::Transfer => service.create::<Transfer>(args),
            Operation::QueryTransfer => service.query::<Transfer>(args),
            Operation::Financing => service.create::<Financing>(args),
            Operation::QueryFinance => service.query::<Financing>(args),
            Operation::WriteRepaymentHistory => service.create::<RepaymentHistory>(args),
            Operation::QueryRepaymentHistory => service.query::<RepaymentHistory>(args),
            Operation::CreateScfUserCompany => service.create::<ScfUserCompany>(args),
            Operation::QueryScfUserCompany => service.query::<ScfUserCompany>(args),
            Operation::CreateScfFinance => service.create::<ScfFinance>(args),
            Operation::QueryScfFinance => service.query::<ScfFinance>(args),
            Operation::CreateScfLoan => service.create::<ScfLoan>(args),
            Operation::QueryScfLoan => service.query::<ScfLoan>(args),
            Operation::CreateScfContract => service.create::<ScfContract>(args),
            Operation::QueryScfContract => service.query::<ScfContract>(args),
            Operation::CreateScfLoanRepayment => service.create::<ScfLoanRepayment>(args),
            Operation::QueryScfLoanRepayment => service.query::<ScfLoanRepayment>(args),
        }
    }

    /// Resolves and runs one invocation, folding any failure into an error
    /// response.
    pub fn invoke(&self, invocation: &Invocation) -> Response {
        let span = info_span!(
            "invoke",
            tx = %invocation.tx_id,
            function = %invocation.function,
        );
        let _enter = span.enter();
        debug!(args = ?invocation.args, at = %invocation.timestamp, "invoke is running");

        let result = self.resolve(&invocation.function).and_then(|op| {
            if let Some(kind) = op.record_kind() {
                debug!(%kind, "dispatching to record pipeline");
            }
            self.execute(op, &invocation.args)
        });

        if let Err(e) = &result {
            warn!(error = %e, retryable = e.is_retryable(), "invocation rejected");
        }
        result.into()
    }
}

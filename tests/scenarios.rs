use anyhow::Context;
use scf_ledger::{
    ACK, Dispatcher, InvokeError, SledStore, StateStore,
    context::Invocation,
    key::CompositeKey,
    kingmi::{Application, Transfer},
    scf::{ScfLoan, ScfUserCompany},
};
use serde_json::{Value, json};
use tempfile::tempdir; // Use for test db cleanup.

fn application(kingmi_id: i64) -> Value {
    json!({
        "kingmiId": kingmi_id,
        "openEnterpriseId": 1,
        "downEnterpriseId": 2,
        "factoryingEnterpriseId": 3,
        "credentialType": 1,
        "amount": 1000,
        "createdDate": 20230101,
        "dueDate": 20230601,
        "ifGuarantee": 1,
        "ifTransfer": 0,
        "ifDelay": 0
    })
}

fn call(dispatcher: &Dispatcher<SledStore>, function: &str, arg: &Value) -> anyhow::Result<Vec<u8>> {
    let op = dispatcher.resolve(function)?;
    Ok(dispatcher.execute(op, &[arg.to_string()])?)
}

fn open(name: &str) -> anyhow::Result<(tempfile::TempDir, Dispatcher<SledStore>)> {
    // sled locks its directory, so every test gets its own database under a
    // temp dir that is removed with the guard
    let temp_dir = tempdir()?;
    let store = SledStore::open(temp_dir.path().join(name))?;
    Ok((temp_dir, Dispatcher::new(store)))
}

#[test]
fn apply_then_duplicate_then_reversed_dates() -> anyhow::Result<()> {
    let (_dir, dispatcher) = open("apply.db")?;

    let ack = call(&dispatcher, "Apply", &application(100)).context("first apply failed: ")?;
    assert_eq!(ack, ACK);

    let op = dispatcher.resolve("Apply")?;
    let err = dispatcher
        .execute(op, &[application(100).to_string()])
        .unwrap_err();
    assert!(matches!(err, InvokeError::Duplicate { .. }), "got {err}");

    let mut reversed = application(101);
    reversed["createdDate"] = json!(20230601);
    reversed["dueDate"] = json!(20230101);
    let err = dispatcher
        .execute(op, &[reversed.to_string()])
        .unwrap_err();
    assert!(matches!(err, InvokeError::Validation { .. }), "got {err}");

    // nothing was written for the rejected application
    let key = CompositeKey::new("application", &["101"])?;
    assert!(!dispatcher.service().store().exists(&key)?);

    Ok(())
}

#[test]
fn duplicate_rejected_even_with_different_payload() -> anyhow::Result<()> {
    let (_dir, dispatcher) = open("duplicate.db")?;

    call(&dispatcher, "Apply", &application(7))?;

    let mut changed = application(7);
    changed["amount"] = json!(99_999);
    assert!(call(&dispatcher, "Apply", &changed).is_err());

    let stored = call(&dispatcher, "QueryApplication", &json!({ "kingmiId": 7 }))?;
    let stored: Vec<Application> = serde_json::from_slice(&stored)?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].amount, 1000);

    Ok(())
}

#[test]
fn transfer_round_trips_through_query() -> anyhow::Result<()> {
    let (_dir, dispatcher) = open("transfer.db")?;

    let submitted = json!({
        "kingmiId": 42,
        "transferee": 9,
        "amount": 250,
        "transferDate": 20230301,
        "dueDate": 20230901,
        "note": "partial transfer"
    });
    call(&dispatcher, "Transfer", &submitted)?;

    let payload = call(&dispatcher, "QueryTransfer", &json!({ "kingmiId": 42 }))?;
    let found: Vec<Transfer> = serde_json::from_slice(&payload)?;
    let expected: Transfer = serde_json::from_value(submitted)?;

    assert_eq!(found, vec![expected]);
    Ok(())
}

#[test]
fn query_matches_every_field_of_the_filter() -> anyhow::Result<()> {
    let (_dir, dispatcher) = open("and.db")?;

    for (id, guarantee, delay) in [(1, 1, 0), (2, 1, 1), (3, 0, 0), (4, 1, 0)] {
        let mut app = application(id);
        app["ifGuarantee"] = json!(guarantee);
        app["ifDelay"] = json!(delay);
        call(&dispatcher, "Apply", &app)?;
    }

    let payload = call(
        &dispatcher,
        "QueryApplication",
        &json!({ "ifGuarantee": 1, "ifDelay": 0 }),
    )?;
    let found: Vec<Application> = serde_json::from_slice(&payload)?;
    let ids: Vec<i64> = found.iter().map(|a| a.kingmi_id).collect();
    assert_eq!(ids, vec![1, 4]);

    let payload = call(
        &dispatcher,
        "QueryApplication",
        &json!({ "ifGuarantee": 0, "ifDelay": 1 }),
    )?;
    assert_eq!(payload, b"[]");

    Ok(())
}

#[test]
fn query_results_stay_within_record_type() -> anyhow::Result<()> {
    let (_dir, dispatcher) = open("scoped.db")?;

    call(&dispatcher, "Apply", &application(5))?;
    call(
        &dispatcher,
        "Settle",
        &json!({"kingmiId": 5, "dueDate": 20230601, "soaDate": 20230603,
                "amount": 1000, "dueInterest": 20}),
    )?;

    let payload = call(&dispatcher, "QuerySettlement", &json!({ "kingmiId": 5 }))?;
    let found: Vec<Value> = serde_json::from_slice(&payload)?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["soaDate"], json!(20230603));

    Ok(())
}

#[test]
fn records_survive_reopening_the_database() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("reopen.db");

    {
        let dispatcher = Dispatcher::new(SledStore::open(&db_path)?);
        call(
            &dispatcher,
            "Financing",
            &json!({"financingId": 11, "amount": 5000, "dueDate": 20240101,
                    "ifProtocolInterest": 1, "protocolInterestProportion": 30}),
        )?;
        dispatcher.service().store().flush()?;
    }

    let dispatcher = Dispatcher::new(SledStore::open(&db_path)?);
    let payload = call(&dispatcher, "QueryFinance", &json!({ "financingId": 11 }))?;
    let found: Vec<Value> = serde_json::from_slice(&payload)?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["protocolInterestProportion"], json!(30));

    // and the key is still taken
    assert!(
        call(
            &dispatcher,
            "Financing",
            &json!({"financingId": 11, "amount": 1, "dueDate": 20240101,
                    "ifProtocolInterest": 0, "protocolInterestProportion": 0}),
        )
        .is_err()
    );
    Ok(())
}

#[test]
fn concurrent_creators_of_one_key_have_one_winner() -> anyhow::Result<()> {
    let (_dir, dispatcher) = open("race.db")?;
    let op = dispatcher.resolve("WriteRepaymentHistory")?;
    let payload = json!({
        "financingId": 77,
        "dueRepayment": 1000,
        "dueInterest": 10,
        "dueDate": 20230601,
        "repaymentAmount": 1010,
        "repaymentDate": 20230530
    })
    .to_string();

    let (dispatcher, payload) = (&dispatcher, &payload);
    let results: Vec<Result<Vec<u8>, InvokeError>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || dispatcher.execute(op, &[payload.clone()])))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("creator thread panicked"))
            .collect()
    });

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(InvokeError::Duplicate { .. })))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(duplicates, 7);
    Ok(())
}

#[test]
fn supply_chain_finance_flow() -> anyhow::Result<()> {
    let (_dir, dispatcher) = open("scf.db")?;

    call(
        &dispatcher,
        "CreateSCFUserCompany",
        &json!({"companyName": "Shenzhen Parts Co", "creditGrantingCompanyId": 8,
                "certificateNo": 123456, "passTime": 1672531200}),
    )?;
    call(
        &dispatcher,
        "CreateSCFFinance",
        &json!({"creditGrantingCompanyId": 8, "coreCompanyId": 2, "financingNo": 900,
                "financingAmount": 200000, "term": 180, "credentialNo": 31,
                "interest": 5, "applyDate": 20230110}),
    )?;
    call(
        &dispatcher,
        "CreateSCFContract",
        &json!({"creditGrantingCompanyId": 8, "coreCompanyId": 2, "financingNo": 900,
                "contractNo": 5001, "signDate": 20230112, "subject": "factoring agreement",
                "contractTemplateId": 3}),
    )?;
    call(
        &dispatcher,
        "CreateSCFLoan",
        &json!({"creditGrantingCompanyId": 8, "financingNo": 900,
                "payeeName": "Shenzhen Parts Co", "loanAmount": 195000,
                "loanDate": 20230115, "dueDate": 20230714}),
    )?;
    call(
        &dispatcher,
        "CreateSCFLoanRepayment",
        &json!({"creditGrantingCompanyId": 8, "financingNo": 900,
                "repaymentAmount": 200000, "repaymentInterest": 5000,
                "repaymentPrincipal": 195000}),
    )?;

    // a second loan for the same company under a new financing number is fine
    call(
        &dispatcher,
        "CreateSCFLoan",
        &json!({"creditGrantingCompanyId": 8, "financingNo": 901,
                "payeeName": "Shenzhen Parts Co", "loanAmount": 1000,
                "loanDate": 20230201, "dueDate": 20230801}),
    )?;

    let payload = call(
        &dispatcher,
        "QuerySCFLoan",
        &json!({ "creditGrantingCompanyId": 8 }),
    )?;
    let loans: Vec<ScfLoan> = serde_json::from_slice(&payload)?;
    assert_eq!(loans.len(), 2);

    let payload = call(
        &dispatcher,
        "QuerySCFUserCompany",
        &json!({ "companyName": "Shenzhen Parts Co" }),
    )?;
    let companies: Vec<ScfUserCompany> = serde_json::from_slice(&payload)?;
    assert_eq!(companies[0].certificate_no, 123456);

    assert_eq!(dispatcher.service().store().len(), 6);
    Ok(())
}

#[test]
fn invoke_reports_failures_as_error_responses() -> anyhow::Result<()> {
    let (_dir, dispatcher) = open("invoke.db")?;

    let ok = dispatcher.invoke(&Invocation::new(
        "Apply",
        vec![application(300).to_string()],
    )?);
    assert!(ok.is_success());
    assert_eq!(ok.payload, ACK);

    let missing = dispatcher.invoke(&Invocation::new(
        "Apply",
        vec![json!({"kingmiId": 301}).to_string()],
    )?);
    assert!(!missing.is_success());
    assert!(missing.message.contains("openEnterpriseId"));

    let no_args = dispatcher.invoke(&Invocation::new("QueryApplication", vec![])?);
    assert!(no_args.message.contains("Expecting 1"));

    Ok(())
}

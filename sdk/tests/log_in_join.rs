//! Behavioural tests for the log-in fan-out over a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use moysklad_sdk::domain::ports::{ApiError, Endpoint, TransportError, ACCESS_DENIED_CODE};
use moysklad_sdk::domain::{DataService, Error, ErrorCode, ObjectType};
use moysklad_sdk::test_support::{FixedClock, ScriptedTransport};
use rstest::{fixture, rstest};
use serde_json::Value;

mod support;

use support::{auth, company_settings, currency, employee, group, metadata, rows};

#[fixture]
fn now() -> NaiveDateTime {
    "2024-03-14T12:30:00".parse().expect("fixture moment")
}

fn service(transport: Arc<ScriptedTransport>, now: NaiveDateTime) -> DataService {
    DataService::new(transport, Arc::new(FixedClock::at(now)))
}

fn currencies() -> Value {
    rows(vec![currency(2, "rub"), currency(3, "usd")])
}

fn groups() -> Value {
    rows(vec![group(4), group(5)])
}

/// Every constituent answers, each after its own delay.
fn delayed(delays: [u64; 5]) -> ScriptedTransport {
    let [employee_ms, settings_ms, currency_ms, metadata_ms, group_ms] = delays;
    ScriptedTransport::new()
        .respond_after(
            Endpoint::ContextEmployee,
            Duration::from_millis(employee_ms),
            Ok(employee()),
        )
        .respond_after(
            Endpoint::CompanySettings,
            Duration::from_millis(settings_ms),
            Ok(company_settings()),
        )
        .respond_after(
            Endpoint::Currency,
            Duration::from_millis(currency_ms),
            Ok(currencies()),
        )
        .respond_after(
            Endpoint::EntityMetadata,
            Duration::from_millis(metadata_ms),
            Ok(metadata()),
        )
        .respond_after(Endpoint::Group, Duration::from_millis(group_ms), Ok(groups()))
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn joined_session_carries_every_constituent(now: NaiveDateTime) {
    let transport = Arc::new(delayed([0; 5]));
    let session = service(Arc::clone(&transport), now)
        .log_in(&auth())
        .await
        .expect("log-in succeeds");

    assert_eq!(session.employee.name, "Ivanov");
    assert_eq!(session.currencies.len(), 2);
    assert_eq!(session.groups.len(), 2);
    assert_eq!(session.counterparty_tags, vec!["vip", "wholesale"]);
    assert_eq!(session.price_types, vec!["Retail", "Bulk"]);
    assert_eq!(session.create_shared.get(&ObjectType::CustomerOrder), Some(&true));
    assert_eq!(
        session
            .states
            .get(&ObjectType::Counterparty)
            .map(Vec::len),
        Some(1)
    );
    assert_eq!(transport.calls().len(), 5);
}

#[rstest]
#[case::employee_last([50, 10, 20, 30, 40])]
#[case::groups_first([40, 30, 20, 10, 1])]
#[case::metadata_last([10, 20, 30, 90, 5])]
#[tokio::test(start_paused = true)]
async fn result_does_not_depend_on_completion_order(
    now: NaiveDateTime,
    #[case] delays: [u64; 5],
) {
    let reference = service(Arc::new(delayed([0; 5])), now)
        .log_in(&auth())
        .await
        .expect("immediate log-in succeeds");
    let reordered = service(Arc::new(delayed(delays)), now)
        .log_in(&auth())
        .await
        .expect("delayed log-in succeeds");

    assert_eq!(reordered, reference);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn first_failure_abandons_the_reads_still_in_flight(now: NaiveDateTime) {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond_after(
                Endpoint::ContextEmployee,
                Duration::from_millis(20),
                Err(TransportError::network("connection reset")),
            )
            .respond(Endpoint::CompanySettings, Ok(company_settings()))
            .respond(Endpoint::Currency, Ok(currencies()))
            .hang(Endpoint::EntityMetadata)
            .hang(Endpoint::Group),
    );

    let error = service(Arc::clone(&transport), now)
        .log_in(&auth())
        .await
        .expect_err("log-in fails");

    assert_eq!(error, Error::from(TransportError::network("connection reset")));
    assert_eq!(error.code(), ErrorCode::Transport);
    assert_eq!(transport.abandoned_requests(), 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn currency_denial_surfaces_as_plan_restriction(now: NaiveDateTime) {
    let transport = ScriptedTransport::new()
        .respond(Endpoint::ContextEmployee, Ok(employee()))
        .respond(Endpoint::CompanySettings, Ok(company_settings()))
        .respond(
            Endpoint::Currency,
            Err(TransportError::api(
                403_u16,
                vec![ApiError::new(ACCESS_DENIED_CODE, "access denied")],
            )),
        )
        .hang(Endpoint::EntityMetadata)
        .hang(Endpoint::Group);

    let error = service(Arc::new(transport), now)
        .log_in(&auth())
        .await
        .expect_err("log-in fails");

    assert_eq!(error.code(), ErrorCode::PlanRestriction);
}

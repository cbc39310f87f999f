mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fleet_wizard::wizard::{FieldMap, SubmitPolicy, WizardController};
use fleet_wizard::SubmitError;
use common::{company_schema, filled_company_controller};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
struct NetworkError(&'static str);

#[derive(Debug, Clone, PartialEq)]
struct Created {
    id: u32,
    name: String,
}

#[tokio::test]
async fn successful_submit_returns_record_and_clears_flag() {
    let controller = filled_company_controller();
    let result = controller
        .submit(|fields: FieldMap| async move {
            assert_eq!(fields.len(), 3);
            Ok::<_, NetworkError>(Created {
                id: 7,
                name: fields["name"].to_string(),
            })
        })
        .await;

    assert_eq!(
        result.unwrap(),
        Created {
            id: 7,
            name: "Acme Haulage".into()
        }
    );
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn rejected_submit_is_propagated_untouched() {
    let controller = filled_company_controller();
    let result = controller
        .submit(|_| async { Err::<Created, _>(NetworkError("connection reset")) })
        .await;

    match result {
        Err(SubmitError::Rejected(err)) => assert_eq!(err, NetworkError("connection reset")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn invalid_record_never_reaches_on_submit() {
    let controller = WizardController::new(company_schema(), FieldMap::new()).unwrap();
    controller.set_field("email", "ops@acme.test");
    let calls = AtomicUsize::new(0);

    let result = controller
        .submit(|_| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<(), NetworkError>(())
        })
        .await;

    let errors = result.unwrap_err().field_errors().cloned().unwrap();
    assert_eq!(errors["name"], "name is required");
    assert_eq!(errors["fleet_size"], "fleet_size is required");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.errors(), errors);
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn strict_policy_catches_earlier_step_invalidated_later() {
    let controller = filled_company_controller();
    controller.advance();
    controller.advance();
    controller.set_field("name", "   ");

    let result = controller
        .submit(|_| async { Ok::<(), NetworkError>(()) })
        .await;
    let err = result.unwrap_err();
    assert_eq!(
        err.field_errors().and_then(|errors| errors.get("name")).map(String::as_str),
        Some("name is required")
    );
    assert_eq!(controller.current_step(), 3);
}

#[tokio::test]
async fn final_step_policy_only_checks_last_step() {
    let controller = filled_company_controller().with_policy(SubmitPolicy::FinalStep);
    controller.set_field("name", "");

    let result = controller
        .submit(|fields| async move { Ok::<_, NetworkError>(fields.len()) })
        .await;
    assert_eq!(result.unwrap(), 3);

    controller.set_field("email", "");
    let result = controller
        .submit(|_| async { Ok::<usize, NetworkError>(0) })
        .await;
    assert!(matches!(result, Err(SubmitError::ValidationFailed(_))));
}

#[tokio::test]
async fn second_submit_while_pending_is_rejected() {
    let controller = Arc::new(filled_company_controller());
    let calls = Arc::new(AtomicUsize::new(0));
    let (release, released) = oneshot::channel::<()>();

    let first = {
        let controller = Arc::clone(&controller);
        let calls = Arc::clone(&calls);
        tokio::spawn(async move {
            controller
                .submit(move |fields| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let _ = released.await;
                    Ok::<_, NetworkError>(fields.len())
                })
                .await
        })
    };

    while !controller.is_submitting() {
        tokio::task::yield_now().await;
    }

    let second_calls = Arc::clone(&calls);
    let second = controller
        .submit(move |_| async move {
            second_calls.fetch_add(1, Ordering::SeqCst);
            Ok::<usize, NetworkError>(0)
        })
        .await;
    assert!(matches!(second, Err(SubmitError::AlreadySubmitting)));
    assert!(controller.is_submitting());

    release.send(()).unwrap();
    let first = first.await.unwrap();
    assert_eq!(first.unwrap(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn dropping_a_pending_submit_releases_the_flag() {
    let controller = filled_company_controller();
    let pending = controller.submit(|_| std::future::pending::<Result<(), NetworkError>>());
    let timed_out = tokio::time::timeout(Duration::from_millis(20), pending).await;
    assert!(timed_out.is_err());
    assert!(!controller.is_submitting());

    let result = controller
        .submit(|_| async { Ok::<_, NetworkError>("again") })
        .await;
    assert_eq!(result.unwrap(), "again");
}

#[tokio::test]
async fn submit_can_be_retried_after_rejection() {
    let controller = filled_company_controller();
    let attempts = AtomicUsize::new(0);
    for expected in [1, 2] {
        let _ = controller
            .submit(|_| async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(NetworkError("timeout"))
            })
            .await;
        assert_eq!(attempts.load(Ordering::SeqCst), expected);
        assert!(!controller.is_submitting());
    }
}

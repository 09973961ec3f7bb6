//! Multi-component scenarios from spec §8, exercised against the
//! in-memory `Store` fake so they run without a live Postgres instance.

use std::sync::Arc;

use calcmesh_orchestrator::dispatcher::{Dispatcher, TaskOutcome};
use calcmesh_orchestrator::persistence::InMemoryStore;
use calcmesh_orchestrator::registry::Registry;
use calcmesh_shared::domain::ExpressionOutcome;

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(Registry::new()), Arc::new(InMemoryStore::new()))
}

/// Drain every ready task to completion by feeding back a fixed result
/// function, simulating an agent pool running to exhaustion.
async fn run_to_completion(dispatcher: &Dispatcher, compute: impl Fn(&str, &str, &str) -> TaskOutcome) {
    while let Some(task) = dispatcher.get_task_for_agent() {
        let outcome = compute(&task.arg1, &task.arg2, &task.operation);
        dispatcher.submit_task_result(&task.id, outcome).await.unwrap();
    }
}

fn arithmetic_outcome(arg1: &str, arg2: &str, op: &str) -> TaskOutcome {
    let a: f64 = arg1.parse().unwrap();
    match op {
        "~" => TaskOutcome::Ok(-a),
        "+" => TaskOutcome::Ok(a + arg2.parse::<f64>().unwrap()),
        "-" => TaskOutcome::Ok(a - arg2.parse::<f64>().unwrap()),
        "*" => TaskOutcome::Ok(a * arg2.parse::<f64>().unwrap()),
        "/" => {
            let b: f64 = arg2.parse().unwrap();
            if b == 0.0 {
                TaskOutcome::Err("devision by zero".to_string())
            } else {
                TaskOutcome::Ok(a / b)
            }
        }
        other => panic!("unexpected operation {other}"),
    }
}

#[tokio::test]
async fn scenario_1_operator_precedence() {
    let dispatcher = dispatcher();
    let id = dispatcher.submit_expression(1, "2+2*2").await.unwrap();
    run_to_completion(&dispatcher, arithmetic_outcome).await;

    let view = dispatcher.get_expression_by_id(1, id).await.unwrap().unwrap();
    assert_eq!(view.status, "completed");
    assert!(matches!(view.outcome, ExpressionOutcome::Numeric(v) if v == 6.0));
}

#[tokio::test]
async fn scenario_2_parenthesized_expression() {
    let dispatcher = dispatcher();
    let id = dispatcher.submit_expression(1, "(52-49)*4-1").await.unwrap();
    run_to_completion(&dispatcher, arithmetic_outcome).await;

    let view = dispatcher.get_expression_by_id(1, id).await.unwrap().unwrap();
    assert!(matches!(view.outcome, ExpressionOutcome::Numeric(v) if v == 11.0));
}

#[tokio::test]
async fn scenario_3_division_by_zero() {
    let dispatcher = dispatcher();
    let id = dispatcher.submit_expression(1, "6/0").await.unwrap();
    run_to_completion(&dispatcher, arithmetic_outcome).await;

    let view = dispatcher.get_expression_by_id(1, id).await.unwrap().unwrap();
    assert_eq!(view.status, "completed with error");
    assert!(matches!(view.outcome, ExpressionOutcome::Error(ref e) if e == "devision by zero"));
}

#[tokio::test]
async fn scenario_4_unbalanced_parenthesis_never_creates_a_task() {
    let dispatcher = dispatcher();
    let id = dispatcher.submit_expression(1, "2+(").await.unwrap();

    assert!(dispatcher.get_task_for_agent().is_none());

    let view = dispatcher.get_expression_by_id(1, id).await.unwrap().unwrap();
    assert_eq!(view.status, "completed with error");
    assert!(matches!(view.outcome, ExpressionOutcome::Error(ref e) if e == "no closing parenthesis"));
}

#[tokio::test]
async fn scenario_5_leading_unary_minus() {
    let dispatcher = dispatcher();
    let id = dispatcher.submit_expression(1, "-3+4").await.unwrap();
    run_to_completion(&dispatcher, arithmetic_outcome).await;

    let view = dispatcher.get_expression_by_id(1, id).await.unwrap().unwrap();
    assert!(matches!(view.outcome, ExpressionOutcome::Numeric(v) if v == 1.0));
}

#[tokio::test]
async fn scenario_6_concurrent_expressions_stay_scoped_per_user() {
    let dispatcher = dispatcher();
    let id_a = dispatcher.submit_expression(1, "1+2").await.unwrap();
    let id_b = dispatcher.submit_expression(2, "3*4").await.unwrap();

    run_to_completion(&dispatcher, arithmetic_outcome).await;

    let user_1 = dispatcher.get_expressions_by_user(1).await.unwrap();
    let user_2 = dispatcher.get_expressions_by_user(2).await.unwrap();

    assert_eq!(user_1.len(), 1);
    assert_eq!(user_1[0].id, id_a);
    assert!(matches!(user_1[0].outcome, ExpressionOutcome::Numeric(v) if v == 3.0));

    assert_eq!(user_2.len(), 1);
    assert_eq!(user_2[0].id, id_b);
    assert!(matches!(user_2[0].outcome, ExpressionOutcome::Numeric(v) if v == 12.0));
}

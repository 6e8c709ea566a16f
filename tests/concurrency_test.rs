use eco_ledger::domain::points::Points;
use std::sync::Arc;

mod common;
use common::{ADMIN, fresh_ledger, id};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reports_are_serialized() {
    let ledger = Arc::new(fresh_ledger().await);
    ledger
        .register_vehicle(&id("user1"), 1, "Tesla", "Model S", "electric")
        .await
        .unwrap();
    ledger
        .register_business(&id(ADMIN), "Green Store", id("store"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger.report_mileage(&id("user1"), 10).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(ledger.balance_of(&id("user1")).await.unwrap(), Points::new(4000));

    // 50 redemptions of 100 against 4000 points: exactly 40 can succeed.
    let mut handles = Vec::new();
    for _ in 0..50 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger
                .redeem_points(&id("user1"), &id("store"), 100)
                .await
                .is_ok()
        }));
    }
    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap() {
            succeeded += 1;
        }
    }
    assert_eq!(succeeded, 40);
    assert_eq!(ledger.balance_of(&id("user1")).await.unwrap(), Points::ZERO);

    let events = ledger.events().await.unwrap();
    assert_eq!(events.len(), 2 + 50 + 40);
    for (index, record) in events.iter().enumerate() {
        assert_eq!(record.sequence, index as u64 + 1);
    }
    ledger.audit().await.unwrap();
}

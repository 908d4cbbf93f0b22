//! Admin review queue tests.

use redy_auth::{Identity, Profile, Role};
use redy_checkout::{AdminStats, ApprovalPipeline, CheckoutError};
use redy_commerce::ids::{CategoryId, UserId, VendorId};
use redy_commerce::prelude::{ApprovalStatus, Condition, Money, Product};
use redy_db::MemoryStore;

fn admin() -> Identity {
    Identity {
        user_id: UserId::new("admin-1"),
        email: "admin@redy.cl".to_string(),
    }
}

fn setup() -> (MemoryStore, Product) {
    let db = MemoryStore::new();
    db.seed_profile(Profile::new("admin-1", Role::Admin));
    db.seed_profile(Profile::new("buyer-1", Role::Buyer));

    let product = Product::new(
        VendorId::new("vendor-1"),
        CategoryId::new("furniture"),
        "Oak table",
        Money::clp(80_000),
        Condition::Good,
    );
    db.seed_product(product.clone());
    (db, product)
}

#[tokio::test]
async fn test_approve_stamps_and_persists() {
    let (db, product) = setup();
    let pipeline = ApprovalPipeline::new(&db);

    let queue = pipeline.review_queue(&admin()).await.unwrap();
    assert_eq!(queue.len(), 1);

    let approved = pipeline.approve(&admin(), &product.id).await.unwrap();
    assert_eq!(approved.approval_status, ApprovalStatus::Approved);
    assert_eq!(approved.approved_by, Some(UserId::new("admin-1")));
    assert!(approved.approved_at.is_some());

    assert!(pipeline.review_queue(&admin()).await.unwrap().is_empty());

    // A double-submitted review is a no-op, not a failure.
    let again = pipeline.approve(&admin(), &product.id).await.unwrap();
    assert_eq!(again.approval_status, ApprovalStatus::Approved);
}

#[tokio::test]
async fn test_reject_requires_reason_and_is_terminal() {
    let (db, product) = setup();
    let pipeline = ApprovalPipeline::new(&db);

    assert!(matches!(
        pipeline.reject(&admin(), &product.id, "  ").await,
        Err(CheckoutError::Commerce(_))
    ));

    let rejected = pipeline
        .reject(&admin(), &product.id, "Missing photos")
        .await
        .unwrap();
    assert_eq!(rejected.approval_status, ApprovalStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Missing photos"));

    // Once rejected, approval is refused.
    assert!(pipeline.approve(&admin(), &product.id).await.is_err());
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let (db, product) = setup();
    let pipeline = ApprovalPipeline::new(&db);

    let buyer = Identity {
        user_id: UserId::new("buyer-1"),
        email: "ana@example.cl".to_string(),
    };
    assert!(matches!(
        pipeline.approve(&buyer, &product.id).await,
        Err(CheckoutError::Auth(_))
    ));

    let stranger = Identity {
        user_id: UserId::new("ghost"),
        email: "ghost@example.cl".to_string(),
    };
    assert!(matches!(
        pipeline.review_queue(&stranger).await,
        Err(CheckoutError::Auth(_))
    ));
}

#[tokio::test]
async fn test_stats_counts_listings_and_vendors() {
    let (db, product) = setup();
    let pipeline = ApprovalPipeline::new(&db);
    pipeline.approve(&admin(), &product.id).await.unwrap();

    db.seed_product(Product::new(
        VendorId::new("vendor-2"),
        CategoryId::new("furniture"),
        "Bookshelf",
        Money::clp(30_000),
        Condition::Excellent,
    ));
    db.seed_profile(Profile::new("vendor-1", Role::Seller));
    db.seed_profile(Profile::new("vendor-2", Role::Seller));

    let stats = pipeline.stats(&admin()).await.unwrap();
    assert_eq!(
        stats,
        AdminStats {
            pending_products: 1,
            approved_products: 1,
            rejected_products: 0,
            active_vendors: 2,
            paid_orders: 0,
            total_sales: Money::clp(0),
            total_commission: Money::clp(0),
        }
    );
}

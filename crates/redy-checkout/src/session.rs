//! Interactive checkout session.
//!
//! The session drives the two-phase flow: collect and validate the buyer
//! form, then take payment events until the charge settles or the buyer
//! walks away. A declined charge leaves the cart intact so the buyer can
//! retry with another method.

use crate::error::CheckoutError;
use crate::pipeline::OrderPipeline;
use redy_auth::{AuthProvider, Identity};
use redy_commerce::cart::{CartStore, DeviceStorage};
use redy_commerce::checkout::{BuyerDraft, CheckoutStage};
use redy_commerce::prelude::Order;
use redy_commerce::rut;
use redy_db::Datastore;
use redy_payments::{PaymentGateway, PaymentMethod, PaymentStatus};
use tracing::info;

/// Where a checkout attempt lands.
pub enum CheckoutEntry {
    /// Checkout can proceed.
    Session(CheckoutSession),
    /// No authenticated user.
    RedirectToLogin,
    /// Nothing to buy.
    RedirectToCart,
}

/// Event from the payment stage.
#[derive(Debug, Clone)]
pub enum PaymentEvent {
    /// Buyer submitted a payment method.
    Submit(PaymentMethod),
    /// Payment widget failed before a charge could be attempted.
    ClientError(String),
}

/// Result of handling a payment event.
#[derive(Debug, Clone)]
pub enum EventOutcome {
    /// Charge accepted (settled or pending settlement); order exists and
    /// the cart has been cleared.
    Settled { order: Order },
    /// Charge declined; order recorded as payment-failed, cart kept.
    Declined { order: Order, reason: String },
    /// No charge was attempted; cart kept.
    Aborted { reason: String },
}

/// A buyer's in-progress checkout.
pub struct CheckoutSession {
    identity: Identity,
    draft: BuyerDraft,
    stage: CheckoutStage,
}

impl CheckoutSession {
    /// Start checkout for the current user and cart.
    ///
    /// The draft is pre-seeded from the stored profile where fields are
    /// available, so returning buyers only confirm.
    pub async fn begin<S: DeviceStorage>(
        auth: &dyn AuthProvider,
        db: &dyn Datastore,
        cart: &CartStore<S>,
    ) -> Result<CheckoutEntry, CheckoutError> {
        let identity = match auth.current_user().await? {
            Some(identity) => identity,
            None => return Ok(CheckoutEntry::RedirectToLogin),
        };
        if cart.cart().is_empty() {
            return Ok(CheckoutEntry::RedirectToCart);
        }

        let mut draft = BuyerDraft::new();
        draft.email = identity.email.clone();
        if let Some(profile) = db.get_profile(&identity.user_id).await? {
            if let Some(rut) = profile.rut {
                draft.rut = rut::format(&rut);
            }
            draft.full_name = profile.full_name.unwrap_or_default();
            draft.phone = profile.phone.unwrap_or_default();
            draft.region = profile.region.unwrap_or_default();
            draft.city = profile.city.unwrap_or_default();
            draft.address = profile.address.unwrap_or_default();
        }

        info!(user_id = %identity.user_id, items = cart.item_count(), "checkout started");
        Ok(CheckoutEntry::Session(Self {
            identity,
            draft,
            stage: CheckoutStage::CollectingInfo,
        }))
    }

    /// Validate the form and move to the payment stage.
    pub fn continue_to_payment(&mut self) -> Result<(), CheckoutError> {
        self.draft
            .validate()
            .map_err(CheckoutError::InvalidBuyerInfo)?;
        self.stage.transition_to(CheckoutStage::AwaitingPayment)?;
        Ok(())
    }

    /// Go back to the form from payment or after an abort.
    pub fn edit_info(&mut self) -> Result<(), CheckoutError> {
        self.stage.transition_to(CheckoutStage::CollectingInfo)?;
        Ok(())
    }

    /// Retry payment after an abort, keeping the validated form.
    pub fn retry_payment(&mut self) -> Result<(), CheckoutError> {
        self.stage.transition_to(CheckoutStage::AwaitingPayment)?;
        Ok(())
    }

    /// Handle a payment event. Only legal while awaiting payment.
    pub async fn handle_event<S: DeviceStorage>(
        &mut self,
        event: PaymentEvent,
        cart: &mut CartStore<S>,
        db: &dyn Datastore,
        gateway: &dyn PaymentGateway,
    ) -> Result<EventOutcome, CheckoutError> {
        if self.stage != CheckoutStage::AwaitingPayment {
            return Err(CheckoutError::WrongStage {
                stage: self.stage.as_str().to_string(),
            });
        }

        let method = match event {
            PaymentEvent::Submit(method) => method,
            PaymentEvent::ClientError(reason) => {
                self.stage.transition_to(CheckoutStage::Aborted)?;
                return Ok(EventOutcome::Aborted { reason });
            }
        };

        let vendor_id = match cart.cart().vendor() {
            Some(pin) => pin.id.clone(),
            None => return Err(CheckoutError::EmptyCart),
        };
        let items = cart.cart().items().to_vec();

        let pipeline = OrderPipeline::new(db, gateway);
        let receipt = match pipeline
            .run(&self.identity, &self.draft, &items, &vendor_id, method)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                // Charge never settled; keep the cart for a retry.
                self.stage.transition_to(CheckoutStage::Aborted)?;
                return Err(e);
            }
        };

        if receipt.charge.status.is_accepted() {
            self.stage.transition_to(CheckoutStage::Settled)?;
            cart.clear()?;
            Ok(EventOutcome::Settled {
                order: receipt.order,
            })
        } else {
            self.stage.transition_to(CheckoutStage::Aborted)?;
            let reason = receipt
                .charge
                .status_detail
                .clone()
                .unwrap_or_else(|| PaymentStatus::Rejected.as_str().to_string());
            Ok(EventOutcome::Declined {
                order: receipt.order,
                reason,
            })
        }
    }

    /// The buyer this session belongs to.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The form being edited.
    pub fn draft(&self) -> &BuyerDraft {
        &self.draft
    }

    /// Mutable access to the form while collecting info.
    pub fn draft_mut(&mut self) -> &mut BuyerDraft {
        &mut self.draft
    }

    /// Current stage.
    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }
}

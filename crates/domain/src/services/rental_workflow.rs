//! Rental request submission, history and admin review.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::change_feed::{ChangeFeed, RequestChange};
use super::decision_notifier::{DecisionNotifier, NotificationOutcome};
use super::store::{ProfileStore, ProviderApplicationStore, RentalRequestStore};
use crate::error::WorkflowError;
use crate::models::{
    AdminCapability, DecideRentalRequest, Decision, DecisionSubject, EquipmentDescriptor,
    NewProviderApplication, NewRentalRequest, Profile, ProviderApplication, RentalRequest,
    RentalRequestWithRequester, RequestKind, Requester, ReviewQueue, Session,
    SubmitProviderApplication, SubmitRentalRequest,
};

/// Result of an admin decision made from the review queue.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDecision {
    pub request: RentalRequest,
    /// Whether the requester was emailed about it.
    pub email_sent: bool,
}

#[derive(Clone)]
pub struct RentalWorkflow {
    rentals: Arc<dyn RentalRequestStore>,
    providers: Arc<dyn ProviderApplicationStore>,
    profiles: Arc<dyn ProfileStore>,
    changes: ChangeFeed,
    notifier: Option<DecisionNotifier>,
}

impl RentalWorkflow {
    pub fn new(
        rentals: Arc<dyn RentalRequestStore>,
        providers: Arc<dyn ProviderApplicationStore>,
        profiles: Arc<dyn ProfileStore>,
        changes: ChangeFeed,
    ) -> Self {
        Self {
            rentals,
            providers,
            profiles,
            changes,
            notifier: None,
        }
    }

    /// Emails requesters after each review decision.
    pub fn with_notifier(mut self, notifier: DecisionNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Records a pending rental request for the signed-in user.
    pub async fn submit_rental_request(
        &self,
        session: &Session,
        input: SubmitRentalRequest,
    ) -> Result<RentalRequest, WorkflowError> {
        input.validate()?;

        let name = input.equipment_name.trim();

        let price = input
            .equipment_price
            .amount()
            .ok_or_else(|| WorkflowError::Validation("Equipment price is not a number".into()))?;
        shared::validation::validate_daily_rate(price).map_err(|e| {
            WorkflowError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid equipment price".to_string()),
            )
        })?;

        let request = self
            .rentals
            .insert(NewRentalRequest {
                user_id: session.user_id,
                equipment: EquipmentDescriptor {
                    name: name.to_string(),
                    price,
                },
                requested_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            request_id = %request.id,
            user_id = %session.user_id,
            equipment = %request.equipment_name,
            "Rental request submitted"
        );

        Ok(request)
    }

    pub async fn submit_provider_application(
        &self,
        session: &Session,
        input: SubmitProviderApplication,
    ) -> Result<ProviderApplication, WorkflowError> {
        input.validate()?;

        let company_name = input.company_name.trim();

        let application = self
            .providers
            .insert(NewProviderApplication {
                user_id: session.user_id,
                company_name: company_name.to_string(),
                requested_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            application_id = %application.id,
            user_id = %session.user_id,
            "Provider application submitted"
        );

        Ok(application)
    }

    /// The caller's own rental requests, newest first.
    pub async fn rental_history(
        &self,
        session: &Session,
    ) -> Result<Vec<RentalRequest>, WorkflowError> {
        let mut requests = self.rentals.list_for_user(session.user_id).await?;
        requests.sort_by(|a, b| b.request_date.cmp(&a.request_date));
        Ok(requests)
    }

    pub async fn own_profile(&self, session: &Session) -> Result<Profile, WorkflowError> {
        self.profiles
            .find_by_user_id(session.user_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound("Profile".to_string()))
    }

    /// All rental requests with requester contact details, split into pending and processed.
    pub async fn review_queue(
        &self,
        _admin: &AdminCapability,
    ) -> Result<ReviewQueue, WorkflowError> {
        let requests = self.rentals.list_all().await?;

        let mut user_ids: Vec<Uuid> = requests.iter().map(|r| r.user_id).collect();
        user_ids.sort();
        user_ids.dedup();

        let requesters: HashMap<Uuid, Requester> = self
            .profiles
            .find_by_user_ids(&user_ids)
            .await?
            .into_iter()
            .map(|p| {
                (
                    p.user_id,
                    Requester {
                        full_name: p.full_name,
                        email: p.email,
                    },
                )
            })
            .collect();

        let enriched = requests
            .into_iter()
            .map(|request| {
                let requester = requesters.get(&request.user_id).cloned().unwrap_or_default();
                RentalRequestWithRequester { request, requester }
            })
            .collect();

        Ok(ReviewQueue::from_requests(enriched))
    }

    /// Approves or rejects one rental request. Overwrites any earlier decision.
    pub async fn decide(
        &self,
        admin: &AdminCapability,
        request_id: Uuid,
        input: DecideRentalRequest,
    ) -> Result<ReviewDecision, WorkflowError> {
        input.validate()?;

        let decision = Decision::now(input.status, input.admin_notes);
        let request = self
            .rentals
            .record_decision(request_id, &decision)
            .await?
            .ok_or_else(|| WorkflowError::NotFound("Rental request".to_string()))?;

        tracing::info!(
            admin_id = %admin.admin_id(),
            request_id = %request_id,
            status = %decision.status,
            "Rental request decided"
        );

        self.changes.publish(RequestChange {
            kind: RequestKind::Rental,
            request_id,
            user_id: request.user_id,
            status: request.status,
        });

        let email_sent = match &self.notifier {
            Some(notifier) => {
                let subject = DecisionSubject::Rental {
                    equipment_name: request.equipment_name.clone(),
                    equipment_price: request.equipment_price,
                };
                match notifier
                    .notify(
                        request.user_id,
                        &subject,
                        decision.status,
                        decision.admin_notes.as_deref(),
                    )
                    .await
                {
                    Ok(outcome) => outcome == NotificationOutcome::Sent,
                    Err(e) => {
                        tracing::warn!(
                            request_id = %request_id,
                            error = %e,
                            "Decision saved but requester email failed"
                        );
                        false
                    }
                }
            }
            None => false,
        };

        Ok(ReviewDecision {
            request,
            email_sent,
        })
    }

    /// All customer profiles, newest first.
    pub async fn customers(&self, _admin: &AdminCapability) -> Result<Vec<Profile>, WorkflowError> {
        let mut profiles = self.profiles.list_all().await?;
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecisionStatus, NewProfile, PriceInput, ProfileRole, RequestStatus};
    use crate::services::memory::InMemoryStore;
    use crate::services::notification::MockEmailTransport;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn workflow(store: &InMemoryStore) -> RentalWorkflow {
        RentalWorkflow::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            ChangeFeed::new(16),
        )
    }

    async fn sign_up(store: &InMemoryStore, role: ProfileRole) -> Session {
        let user_id = Uuid::new_v4();
        ProfileStore::create(
            store,
            NewProfile {
                user_id,
                full_name: Some(Name().fake()),
                email: SafeEmail().fake(),
                phone: None,
                role,
                password_hash: "hash".to_string(),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        Session::new(user_id, role, format!("jti-{}", user_id))
    }

    fn submit(name: &str, price: PriceInput) -> SubmitRentalRequest {
        SubmitRentalRequest {
            equipment_name: name.to_string(),
            equipment_price: price,
        }
    }

    fn decide_body(status: DecisionStatus, notes: Option<&str>) -> DecideRentalRequest {
        DecideRentalRequest {
            status,
            admin_notes: notes.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_request() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let renter = sign_up(&store, ProfileRole::Renter).await;

        let before = Utc::now();
        let request = wf
            .submit_rental_request(&renter, submit("  Power Tiller ", PriceInput::Amount(450.0)))
            .await
            .unwrap();
        let after = Utc::now();

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.equipment_name, "Power Tiller");
        assert_eq!(request.equipment_price, 450.0);
        assert!(request.response_date.is_none());
        assert!(request.admin_notes.is_none());
        assert!(request.request_date >= before && request.request_date <= after);
        assert_eq!(wf.rental_history(&renter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_accepts_display_price() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let renter = sign_up(&store, ProfileRole::Renter).await;

        let request = wf
            .submit_rental_request(
                &renter,
                submit("Rotavator", PriceInput::Display("$1,200/day".into())),
            )
            .await
            .unwrap();
        assert_eq!(request.equipment_price, 1200.0);
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_input() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let renter = sign_up(&store, ProfileRole::Renter).await;

        let blank = wf
            .submit_rental_request(&renter, submit("   ", PriceInput::Amount(10.0)))
            .await;
        match blank {
            Err(WorkflowError::Validation(msg)) => assert_eq!(msg, "Value cannot be blank"),
            other => panic!("unexpected {:?}", other),
        }

        let negative = wf
            .submit_rental_request(&renter, submit("Sprayer", PriceInput::Amount(-5.0)))
            .await;
        assert!(matches!(negative, Err(WorkflowError::Validation(_))));

        let garbage = wf
            .submit_rental_request(&renter, submit("Sprayer", PriceInput::Display("call us".into())))
            .await;
        assert!(matches!(garbage, Err(WorkflowError::Validation(_))));

        assert!(wf.rental_history(&renter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_deduplication() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let renter = sign_up(&store, ProfileRole::Renter).await;

        for _ in 0..2 {
            wf.submit_rental_request(&renter, submit("Baler", PriceInput::Amount(300.0)))
                .await
                .unwrap();
        }
        assert_eq!(wf.rental_history(&renter).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_decide_overwrites_previous_decision() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let renter = sign_up(&store, ProfileRole::Renter).await;
        let admin = sign_up(&store, ProfileRole::Admin).await.admin().unwrap();

        let first = wf
            .submit_rental_request(&renter, submit("Tractor", PriceInput::Amount(1500.0)))
            .await
            .unwrap();
        let other = wf
            .submit_rental_request(&renter, submit("Trailer", PriceInput::Amount(200.0)))
            .await
            .unwrap();

        wf.decide(&admin, first.id, decide_body(DecisionStatus::Approved, None))
            .await
            .unwrap();
        let second = wf
            .decide(
                &admin,
                first.id,
                decide_body(DecisionStatus::Rejected, Some("Double booked")),
            )
            .await
            .unwrap();

        assert_eq!(second.request.status, RequestStatus::Rejected);
        assert_eq!(second.request.admin_notes.as_deref(), Some("Double booked"));
        assert!(!second.email_sent);

        let history = wf.rental_history(&renter).await.unwrap();
        let untouched = history.iter().find(|r| r.id == other.id).unwrap();
        assert_eq!(untouched.status, RequestStatus::Pending);
        assert!(untouched.response_date.is_none());
    }

    #[tokio::test]
    async fn test_decide_unknown_request() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let admin = sign_up(&store, ProfileRole::Admin).await.admin().unwrap();

        let result = wf
            .decide(&admin, Uuid::new_v4(), decide_body(DecisionStatus::Approved, None))
            .await;
        assert!(matches!(result, Err(WorkflowError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_renter_cannot_obtain_admin_capability() {
        let store = InMemoryStore::new();
        let renter = sign_up(&store, ProfileRole::Renter).await;
        assert!(matches!(renter.admin(), Err(WorkflowError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_review_queue_enriches_and_orders() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let renter = sign_up(&store, ProfileRole::Renter).await;
        let admin = sign_up(&store, ProfileRole::Admin).await.admin().unwrap();

        let mut ids = Vec::new();
        for name in ["Harrow", "Seeder", "Sprayer"] {
            let r = wf
                .submit_rental_request(&renter, submit(name, PriceInput::Amount(100.0)))
                .await
                .unwrap();
            ids.push(r.id);
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        wf.decide(&admin, ids[1], decide_body(DecisionStatus::Approved, None))
            .await
            .unwrap();

        let queue = wf.review_queue(&admin).await.unwrap();
        let pending: Vec<_> = queue.pending.iter().map(|r| r.request.id).collect();
        assert_eq!(pending, vec![ids[2], ids[0]]);
        assert_eq!(queue.processed.len(), 1);
        assert_eq!(queue.processed[0].request.id, ids[1]);

        let profile = wf.own_profile(&renter).await.unwrap();
        assert_eq!(queue.pending[0].requester.email, profile.email);
        assert_eq!(queue.pending[0].requester.full_name, profile.full_name);
    }

    #[tokio::test]
    async fn test_decide_with_notifier_emails_requester() {
        let store = InMemoryStore::new();
        let transport = MockEmailTransport::new();
        let changes = ChangeFeed::new(16);
        let notifier = DecisionNotifier::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(transport.clone()),
            changes.clone(),
        );
        let wf = RentalWorkflow::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            changes.clone(),
        )
        .with_notifier(notifier);

        let renter = sign_up(&store, ProfileRole::Renter).await;
        let admin = sign_up(&store, ProfileRole::Admin).await.admin().unwrap();
        let request = wf
            .submit_rental_request(&renter, submit("Tractor", PriceInput::Amount(150.0)))
            .await
            .unwrap();

        let mut rx = changes.subscribe();
        let outcome = wf
            .decide(&admin, request.id, decide_body(DecisionStatus::Approved, None))
            .await
            .unwrap();

        assert!(outcome.email_sent);
        assert_eq!(transport.sent().await.len(), 1);
        let change = rx.recv().await.unwrap();
        assert_eq!(change.request_id, request.id);
        assert_eq!(change.user_id, renter.user_id);
        assert_eq!(change.status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn test_submit_does_not_publish_change() {
        let store = InMemoryStore::new();
        let changes = ChangeFeed::new(16);
        let wf = RentalWorkflow::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            changes.clone(),
        );
        let renter = sign_up(&store, ProfileRole::Renter).await;

        let mut rx = changes.subscribe();
        wf.submit_rental_request(&renter, submit("Seed Drill", PriceInput::Amount(90.0)))
            .await
            .unwrap();

        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_decide_survives_email_failure() {
        let store = InMemoryStore::new();
        let changes = ChangeFeed::new(16);
        let notifier = DecisionNotifier::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(MockEmailTransport::failing()),
            changes.clone(),
        );
        let wf = workflow(&store).with_notifier(notifier);

        let renter = sign_up(&store, ProfileRole::Renter).await;
        let admin = sign_up(&store, ProfileRole::Admin).await.admin().unwrap();
        let request = wf
            .submit_rental_request(&renter, submit("Tractor", PriceInput::Amount(150.0)))
            .await
            .unwrap();

        let outcome = wf
            .decide(&admin, request.id, decide_body(DecisionStatus::Rejected, None))
            .await
            .unwrap();
        assert!(!outcome.email_sent);
        assert_eq!(outcome.request.status, RequestStatus::Rejected);
    }

    #[tokio::test]
    async fn test_customers_newest_first() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let first = sign_up(&store, ProfileRole::Renter).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let admin_session = sign_up(&store, ProfileRole::Admin).await;
        let admin = admin_session.admin().unwrap();

        let customers = wf.customers(&admin).await.unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].user_id, admin_session.user_id);
        assert_eq!(customers[1].user_id, first.user_id);
    }

    #[tokio::test]
    async fn test_provider_application_is_pending() {
        let store = InMemoryStore::new();
        let wf = workflow(&store);
        let renter = sign_up(&store, ProfileRole::Renter).await;

        let app = wf
            .submit_provider_application(
                &renter,
                SubmitProviderApplication {
                    company_name: "Green Acres Co-op".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(app.status, RequestStatus::Pending);
        assert_eq!(app.user_id, renter.user_id);
    }
}

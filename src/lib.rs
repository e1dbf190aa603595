pub mod config;
pub mod domain {
    pub mod event;
    pub mod payment;
    pub mod transitions;
}
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod payments;
        pub mod webhooks;
    }
}
pub mod processor;
pub mod repo {
    pub mod payments_repo;
    pub mod tenants_repo;
}
pub mod service {
    pub mod event_processor;
    pub mod notifier;
    pub mod payment_service;
}
pub mod webhook {
    pub mod verify;
}

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub event_processor: service::event_processor::EventProcessor,
    pub payments_repo: repo::payments_repo::PaymentsRepo,
    pub verifier: webhook::verify::WebhookVerifier,
}

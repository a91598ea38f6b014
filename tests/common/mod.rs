#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use brevo_messaging::{
    MessageDispatcher,
    application::{
        services::{
            clock::{Clock, Sleeper},
            naming::NameGenerator,
        },
        usecases::{
            send_transactional_sms::SendTransactionalSmsUseCase,
            send_whatsapp_campaign::{WhatsAppCampaignConfig, WhatsAppCampaignOrchestrator},
        },
    },
    infrastructure::brevo::InMemoryBrevo,
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += TimeDelta::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Moves the clock instead of waiting and remembers each delay.
pub struct RecordingSleeper {
    clock: Arc<ManualClock>,
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn advancing(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            slept: Mutex::new(Vec::new()),
        }
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
        self.clock.advance(duration);
    }
}

#[derive(Default)]
pub struct CountingNames(AtomicUsize);

impl NameGenerator for CountingNames {
    fn next(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

pub struct TestRig {
    pub brevo: Arc<InMemoryBrevo>,
    pub clock: Arc<ManualClock>,
    pub sleeper: Arc<RecordingSleeper>,
    pub dispatcher: MessageDispatcher,
}

impl TestRig {
    pub fn new() -> Self {
        Self::with_config(WhatsAppCampaignConfig::default())
    }

    pub fn with_config(config: WhatsAppCampaignConfig) -> Self {
        let brevo = Arc::new(InMemoryBrevo::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let sleeper = Arc::new(RecordingSleeper::advancing(clock.clone()));
        let orchestrator = WhatsAppCampaignOrchestrator::with_runtime(
            brevo.clone(),
            brevo.clone(),
            config,
            clock.clone(),
            sleeper.clone(),
            Arc::new(CountingNames::default()),
        );
        let dispatcher = MessageDispatcher::from_parts(
            SendTransactionalSmsUseCase::new(brevo.clone()),
            orchestrator,
        );

        Self {
            brevo,
            clock,
            sleeper,
            dispatcher,
        }
    }
}

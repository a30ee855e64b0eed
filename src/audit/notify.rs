//! Audit notifications
//!
//! After a record is persisted the auditor publishes one `AuditNotification`
//! to every registered subscriber, synchronously and in registration order.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use super::entity::{AuditableEntity, EntityIdentity};
use super::record::AuditRecord;

/// An entity together with the audit just recorded for it
pub struct AuditNotification<'a> {
    pub entity: &'a dyn AuditableEntity,
    pub record: Option<&'a AuditRecord>,
}

/// Receives audit notifications
pub trait AuditSubscriber: Send + Sync {
    fn audited(&self, notification: &AuditNotification<'_>);
}

/// Observer list the auditor publishes to
#[derive(Default, Clone)]
pub struct NotificationChannel {
    subscribers: Vec<Arc<dyn AuditSubscriber>>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn AuditSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn with_subscriber(mut self, subscriber: Arc<dyn AuditSubscriber>) -> Self {
        self.subscribe(subscriber);
        self
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish(&self, notification: &AuditNotification<'_>) {
        for subscriber in &self.subscribers {
            subscriber.audited(notification);
        }
    }
}

/// Owned copy of a notification, for consumers on other threads
#[derive(Debug, Clone, PartialEq)]
pub struct AuditedMessage {
    pub identity: EntityIdentity,
    pub record: Option<AuditRecord>,
}

/// Forwards notifications over an mpsc channel
pub struct ChannelSubscriber {
    sender: Mutex<Sender<AuditedMessage>>,
}

impl ChannelSubscriber {
    /// Create a subscriber and the receiving end of its channel
    pub fn new() -> (Arc<Self>, Receiver<AuditedMessage>) {
        let (sender, receiver) = mpsc::channel();
        let subscriber = Arc::new(Self {
            sender: Mutex::new(sender),
        });
        (subscriber, receiver)
    }
}

impl AuditSubscriber for ChannelSubscriber {
    fn audited(&self, notification: &AuditNotification<'_>) {
        let message = AuditedMessage {
            identity: notification.entity.identity(),
            record: notification.record.cloned(),
        };

        // A dropped receiver just means nobody is listening any more
        if let Ok(sender) = self.sender.lock() {
            let _ = sender.send(message);
        }
    }
}

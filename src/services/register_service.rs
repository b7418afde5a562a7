//! Registration lifecycle: non-versioned submissions.
//!
//! Create, edit, and removal requests land in the submission queue as
//! files tagged with the original submitter; administrators consume them
//! out of band. Cancellation is reserved to the original submitter.

use std::sync::Arc;

use crate::config::{NotificationTemplates, Template};
use crate::error::{AppError, Result};
use crate::models::review::PendingRecord;
use crate::models::service::RegisteredService;
use crate::models::user::UserProfile;
use crate::services::notification_service::NotificationService;
use crate::services::queue_service::QueueService;
use crate::services::registry_service::RegistryService;
use crate::services::workflow_service::timestamp;

pub struct RegisterService {
    queue: QueueService,
    registry: RegistryService,
    notifier: Arc<NotificationService>,
    templates: NotificationTemplates,
}

impl RegisterService {
    pub fn new(
        queue: QueueService,
        registry: RegistryService,
        notifier: Arc<NotificationService>,
        templates: NotificationTemplates,
    ) -> Self {
        Self {
            queue,
            registry,
            notifier,
            templates,
        }
    }

    /// Queue a brand-new service registration. A service without an
    /// assigned id gets a timestamp-derived surrogate.
    pub async fn submit_new(&self, user: &UserProfile, service: RegisteredService) -> Result<()> {
        let id = if service.id > 0 {
            service.id.to_string()
        } else {
            timestamp()
        };
        let body = serde_json::to_vec_pretty(&service)?;
        self.queue
            .create(&format!("submit-{id}.json"), &body, user)
            .await?;
        self.notify(user, &self.templates.submit, &service.name).await;
        Ok(())
    }

    /// Queue an edit. A numeric `id` targets the published service and
    /// writes `edit-<serviceId>.json`; anything else is taken as the
    /// literal name of an existing pending record to overwrite.
    pub async fn save_edit(
        &self,
        user: &UserProfile,
        id: &str,
        service: RegisteredService,
    ) -> Result<()> {
        let filename = if id.parse::<i64>().is_ok() {
            format!("edit-{}.json", service.id)
        } else {
            id.to_string()
        };
        let body = serde_json::to_vec_pretty(&service)?;
        self.queue.write(&filename, &body, user).await?;
        self.notify(user, &self.templates.change, &service.name).await;
        Ok(())
    }

    /// Queue a removal request for a published service.
    pub async fn request_removal(&self, user: &UserProfile, id: i64) -> Result<()> {
        let service = self.registry.find_by_id(id).await?;
        let body = serde_json::to_vec_pretty(&service)?;
        self.queue
            .write(&format!("remove-{}.json", service.id), &body, user)
            .await?;
        self.notify(user, &self.templates.remove, &service.name).await;
        Ok(())
    }

    /// Fetch a published service the caller owns.
    pub async fn fetch_owned(&self, user: &UserProfile, id: i64) -> Result<RegisteredService> {
        let service = self.registry.find_by_id(id).await?;
        if !service.is_owner(&user.email) {
            return Err(AppError::AccessDenied("you do not own this service".into()));
        }
        Ok(service)
    }

    /// Cancel a pending submission. Only the original submitter may cancel;
    /// the stored author email must equal the caller's exactly.
    pub async fn cancel(&self, user: &UserProfile, filename: &str) -> Result<()> {
        let author = self.queue.read_author(filename).await;
        if author.email != user.email {
            return Err(AppError::AccessDenied(
                "you are not the original submitter of this request".into(),
            ));
        }
        self.queue.delete(filename).await
    }

    /// Promote a draft service: strip the environment restriction and queue
    /// the result as an edit of the published definition.
    pub async fn promote(&self, user: &UserProfile, id: i64) -> Result<()> {
        let mut service = self.registry.find_by_id(id).await?;
        service.environments = None;
        self.save_edit(user, &id.to_string(), service).await
    }

    /// Enumerate the queue for administrators.
    pub async fn list_pending(&self) -> Result<Vec<PendingRecord>> {
        self.queue.list().await
    }

    /// Number of records awaiting action.
    pub async fn pending_count(&self) -> usize {
        self.queue.count().await
    }

    async fn notify(&self, user: &UserProfile, template: &Template, arg: &str) {
        if self.notifier.is_configured() {
            self.notifier.send(template, &user.email, arg).await;
        }
    }
}

//! Customer notifications.
//!
//! Notification records are persisted; the actual push/email/SMS delivery
//! channels are stubbed as structured log lines, to be wired to real
//! providers outside this service.

use std::sync::Arc;
use storefront_core::error::AppError;
use uuid::Uuid;

use crate::models::{NewNotification, Notification, NotificationKind, Order};
use crate::repository::NotificationRepository;
use crate::services::metrics::record_notification;

pub struct NotificationTemplate {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub body: &'static str,
    pub email_subject: &'static str,
    pub email_body: &'static str,
    pub sms_body: &'static str,
}

/// Template for a status-driven customer notification.
pub fn template(key: &str) -> Option<&'static NotificationTemplate> {
    match key {
        "order_confirmation" => Some(&NotificationTemplate {
            kind: NotificationKind::OrderConfirmation,
            title: "Order Confirmed!",
            body: "Your order has been received and confirmed.",
            email_subject: "Order Confirmation - Fresh Market",
            email_body:
                "Thank you for your order! We have received your order and it is being processed.",
            sms_body:
                "Your Fresh Market order has been confirmed. We will notify you when it's ready for delivery.",
        }),
        "order_preparing" => Some(&NotificationTemplate {
            kind: NotificationKind::StatusUpdate,
            title: "Order Being Prepared",
            body: "Your order is now being prepared for delivery.",
            email_subject: "Order Update - Being Prepared",
            email_body: "Good news! Your order is now being prepared by our team.",
            sms_body:
                "Your Fresh Market order is being prepared. Estimated delivery time will be updated soon.",
        }),
        "order_out_for_delivery" => Some(&NotificationTemplate {
            kind: NotificationKind::StatusUpdate,
            title: "Out for Delivery",
            body: "Your order is on the way to your delivery address.",
            email_subject: "Order Update - Out for Delivery",
            email_body: "Your order is now out for delivery and should arrive soon.",
            sms_body: "Your Fresh Market order is out for delivery. Please be available to receive it.",
        }),
        "order_delivered" => Some(&NotificationTemplate {
            kind: NotificationKind::StatusUpdate,
            title: "Order Delivered",
            body: "Your order has been successfully delivered. Thank you!",
            email_subject: "Order Delivered - Thank You!",
            email_body:
                "Your order has been delivered successfully. Thank you for choosing Fresh Market!",
            sms_body: "Your Fresh Market order has been delivered. Thank you for your business!",
        }),
        "price_update" => Some(&NotificationTemplate {
            kind: NotificationKind::PriceUpdate,
            title: "Price Update",
            body: "Prices have been updated for some products.",
            email_subject: "Fresh Market - Price Updates",
            email_body:
                "We have updated prices for some of our products. Check out the latest prices on our app.",
            sms_body:
                "Fresh Market: Some product prices have been updated. Visit our app to see the latest prices.",
        }),
        _ => None,
    }
}

pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Record and "send" a status notification for an order.
    ///
    /// Statuses without a customer-visible template produce no notification.
    pub async fn send_order_status(
        &self,
        order: &Order,
        template_key: &str,
    ) -> Result<Option<Notification>, AppError> {
        let Some(template) = template(template_key) else {
            tracing::debug!(key = template_key, "No notification template for status");
            return Ok(None);
        };

        let notification = self
            .repo
            .insert_notification(&NewNotification {
                customer_id: order.customer_id,
                kind: template.kind.as_str().to_string(),
                title: template.title.to_string(),
                message: template.body.to_string(),
            })
            .await?;

        self.send_push(order, template.title, template.body);
        if let Some(email) = &order.customer_email {
            self.send_email(email, template.email_subject, template.email_body);
        }
        self.send_sms(&order.customer_phone, template.sms_body);

        Ok(Some(notification))
    }

    /// Record and "send" the price-update broadcast after an admin
    /// changes catalog prices.
    pub async fn send_price_update(&self) -> Result<Option<Notification>, AppError> {
        let Some(template) = template("price_update") else {
            return Ok(None);
        };

        let notification = self
            .repo
            .insert_notification(&NewNotification {
                customer_id: None,
                kind: template.kind.as_str().to_string(),
                title: template.title.to_string(),
                message: template.body.to_string(),
            })
            .await?;

        tracing::info!(channel = "push", title = template.title, "Sending price update broadcast");
        record_notification("push");

        Ok(Some(notification))
    }

    /// Record and "send" a promotional broadcast.
    pub async fn send_promotion(
        &self,
        title: &str,
        message: &str,
    ) -> Result<Notification, AppError> {
        let notification = self
            .repo
            .insert_notification(&NewNotification {
                customer_id: None,
                kind: NotificationKind::Promotion.as_str().to_string(),
                title: title.to_string(),
                message: message.to_string(),
            })
            .await?;

        tracing::info!(channel = "push", title = title, "Sending promotion broadcast");
        record_notification("push");

        Ok(notification)
    }

    pub async fn list(&self, customer_id: Option<Uuid>) -> Result<Vec<Notification>, AppError> {
        self.repo.list_notifications(customer_id).await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<bool, AppError> {
        self.repo.mark_notification_read(id).await
    }

    // Delivery stubs. Real providers live outside this service.

    fn send_push(&self, order: &Order, title: &str, body: &str) {
        tracing::info!(
            channel = "push",
            order_id = %order.id,
            title = title,
            body = body,
            "Sending push notification"
        );
        record_notification("push");
    }

    fn send_email(&self, email: &str, subject: &str, body: &str) {
        tracing::info!(
            channel = "email",
            email = email,
            subject = subject,
            body = body,
            "Sending email notification"
        );
        record_notification("email");
    }

    fn send_sms(&self, phone: &str, message: &str) {
        tracing::info!(
            channel = "sms",
            phone = phone,
            message = message,
            "Sending SMS notification"
        );
        record_notification("sms");
    }
}

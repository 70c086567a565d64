use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::config::{AppConfig, GMAIL_USER_ENV_VAR, SENDGRID_API_KEY_ENV_VAR};
use crate::errors::ReminderError;
use crate::expiry::{days_until_expiry, reminder_text};
use crate::models::StoredItem;
use crate::store::MemoryStore;

pub const REMINDER_SUBJECT: &str = "🚨 智能冰箱提醒：食品即將過期";
const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const GMAIL_SMTP_RELAY: &str = "smtp.gmail.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub to: String,
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// HTML alternative of `body`.
    pub html_body: String,
    pub item_count: usize,
}

/// Red once expired, orange a day before, amber otherwise.
fn urgency_color(days: i64) -> &'static str {
    match days {
        d if d <= 0 => "#dc2626",
        1 => "#ea580c",
        _ => "#f59e0b",
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Reminder {
    pub fn build(to: &str, items: &[StoredItem], today: NaiveDate) -> Self {
        let mut lines = Vec::with_capacity(items.len());
        let mut list_items = Vec::with_capacity(items.len());
        for stored in items {
            let days = days_until_expiry(stored.item.expiry_date, today);
            lines.push(format!(
                "• {} ({}) - {}",
                stored.item.name,
                stored.item.compartment,
                reminder_text(days)
            ));
            list_items.push(format!(
                "<li style=\"color: {}; margin: 5px 0;\"><strong>{}</strong> ({}) - {}</li>",
                urgency_color(days),
                escape_html(&stored.item.name),
                stored.item.compartment,
                reminder_text(days)
            ));
        }

        let body = format!(
            "您好！\n\n您的冰箱中有 {} 項食品即將過期或已過期：\n\n{}\n\n請盡快處理這些食品，避免浪費。\n\n智能冰箱管理系統",
            items.len(),
            lines.join("\n")
        );
        let html_body = format!(
            concat!(
                "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">",
                "<h2 style=\"color: #ef4444;\">🚨 食品過期提醒</h2>",
                "<p>您好！</p>",
                "<p>您的冰箱中有 <strong>{}</strong> 項食品即將過期或已過期：</p>",
                "<ul style=\"background-color: #fef2f2; padding: 15px; border-radius: 8px;\">{}</ul>",
                "<p>請盡快處理這些食品，避免浪費。</p>",
                "<p style=\"color: #6b7280; font-size: 14px;\">智能冰箱管理系統</p>",
                "</div>"
            ),
            items.len(),
            list_items.concat()
        );

        Self {
            to: to.to_string(),
            subject: REMINDER_SUBJECT.to_string(),
            body,
            html_body,
            item_count: items.len(),
        }
    }
}

#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, reminder: &Reminder) -> Result<(), ReminderError>;
}

/// Writes reminders to the log instead of delivering them.
pub struct ConsoleNotifier;

#[async_trait]
impl ReminderNotifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send(&self, reminder: &Reminder) -> Result<(), ReminderError> {
        info!(
            to = %reminder.to,
            items = reminder.item_count,
            subject = %reminder.subject,
            "\n{}",
            reminder.body
        );
        Ok(())
    }
}

pub struct SendGridNotifier {
    api_key: String,
    from: String,
    client: Client,
}

impl SendGridNotifier {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            api_key,
            from,
            client: Client::new(),
        }
    }

    /// Request body for the v3 mail send API. SendGrid requires the
    /// `text/plain` part to precede `text/html`.
    pub fn payload(&self, reminder: &Reminder) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": reminder.to }] }],
            "from": { "email": self.from },
            "subject": reminder.subject,
            "content": [
                { "type": "text/plain", "value": reminder.body },
                { "type": "text/html", "value": reminder.html_body },
            ],
        })
    }
}

#[async_trait]
impl ReminderNotifier for SendGridNotifier {
    fn name(&self) -> &'static str {
        "sendgrid"
    }

    async fn send(&self, reminder: &Reminder) -> Result<(), ReminderError> {
        let payload = self.payload(reminder);

        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ReminderError::Delivery(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ReminderError::Delivery(format!("{}: {}", status, body)))
        }
    }
}

/// Sends through Gmail SMTP with an app password; the account is also the
/// sender.
pub struct GmailNotifier {
    user: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl GmailNotifier {
    pub fn new(user: String, pass: String) -> Result<Self, ReminderError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(GMAIL_SMTP_RELAY)
            .map_err(|e| ReminderError::Delivery(e.to_string()))?
            .credentials(Credentials::new(user.clone(), pass))
            .build();
        Ok(Self { user, transport })
    }

    /// The multipart/alternative message for `reminder`.
    pub fn message(&self, reminder: &Reminder) -> Result<Message, ReminderError> {
        let from: Mailbox = self
            .user
            .parse()
            .map_err(|e| ReminderError::Delivery(format!("invalid sender '{}': {}", self.user, e)))?;
        let to: Mailbox = reminder
            .to
            .parse()
            .map_err(|e| ReminderError::Delivery(format!("invalid recipient '{}': {}", reminder.to, e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(reminder.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                reminder.body.clone(),
                reminder.html_body.clone(),
            ))
            .map_err(|e| ReminderError::Delivery(e.to_string()))
    }
}

#[async_trait]
impl ReminderNotifier for GmailNotifier {
    fn name(&self) -> &'static str {
        "gmail"
    }

    async fn send(&self, reminder: &Reminder) -> Result<(), ReminderError> {
        let message = self.message(reminder)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| ReminderError::Delivery(e.to_string()))?;
        Ok(())
    }
}

/// Picks the delivery channel: Gmail when both credentials are set, then
/// SendGrid, then the log.
pub fn notifier_from_config(config: &AppConfig) -> Result<Box<dyn ReminderNotifier>, ReminderError> {
    if let (Some(user), Some(pass)) = (&config.gmail_user, &config.gmail_pass) {
        info!(user = %user, "Using Gmail SMTP for reminders");
        return Ok(Box::new(GmailNotifier::new(user.clone(), pass.clone())?));
    }
    if let Some(key) = &config.sendgrid_api_key {
        info!("Using SendGrid for reminders");
        return Ok(Box::new(SendGridNotifier::new(key.clone(), config.reminder_from.clone())));
    }
    info!(
        "Neither {} nor {} set, reminders are written to the log",
        GMAIL_USER_ENV_VAR, SENDGRID_API_KEY_ENV_VAR
    );
    Ok(Box::new(ConsoleNotifier))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ReminderOutcome {
    NothingToSend,
    Sent { items: usize },
    Failed { items: usize, reason: String },
}

/// Sends one reminder for everything expiring within `days_ahead`.
///
/// Delivery failures are reported in the outcome; only a missing address or
/// an unreadable store is an error.
pub async fn check_and_send(
    store: &MemoryStore,
    notifier: &dyn ReminderNotifier,
    email: &str,
    days_ahead: i64,
    today: NaiveDate,
) -> Result<ReminderOutcome, ReminderError> {
    if email.trim().is_empty() {
        return Err(ReminderError::MissingEmail);
    }

    let expiring = store.expiring(days_ahead, today)?;
    if expiring.is_empty() {
        info!(days_ahead, "No items expiring, no reminder needed");
        return Ok(ReminderOutcome::NothingToSend);
    }

    let reminder = Reminder::build(email.trim(), &expiring, today);
    match notifier.send(&reminder).await {
        Ok(()) => {
            info!(to = %reminder.to, items = reminder.item_count, notifier = notifier.name(), "Expiry reminder sent");
            Ok(ReminderOutcome::Sent { items: reminder.item_count })
        }
        Err(e) => {
            error!(to = %reminder.to, notifier = notifier.name(), error = %e, "Expiry reminder failed");
            Ok(ReminderOutcome::Failed {
                items: reminder.item_count,
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Compartment, InventoryItem};
    use chrono::Duration;
    use std::sync::Mutex;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Reminder>>,
        fail: bool,
    }

    #[async_trait]
    impl ReminderNotifier for RecordingNotifier {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, reminder: &Reminder) -> Result<(), ReminderError> {
            if self.fail {
                return Err(ReminderError::Delivery("smtp down".to_string()));
            }
            self.sent.lock().unwrap().push(reminder.clone());
            Ok(())
        }
    }

    fn stocked_store() -> MemoryStore {
        let store = MemoryStore::new();
        for (name, days) in [("牛奶", 2), ("魚", -1), ("醬油", 100)] {
            store
                .create(
                    InventoryItem::new(name, Category::Other, Compartment::BottomShelf, today() + Duration::days(days)),
                    None,
                )
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_sends_reminder_for_expiring_items() {
        let store = stocked_store();
        let notifier = RecordingNotifier::default();
        let outcome = check_and_send(&store, &notifier, "me@example.com", 3, today()).await.unwrap();
        assert_eq!(outcome, ReminderOutcome::Sent { items: 2 });

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, REMINDER_SUBJECT);
        assert!(sent[0].body.contains("• 魚 (底層架) - 已過期"));
        assert!(sent[0].body.contains("• 牛奶 (底層架) - 2天後過期"));
        assert!(!sent[0].body.contains("醬油"));
    }

    #[tokio::test]
    async fn test_nothing_to_send() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();
        let outcome = check_and_send(&store, &notifier, "me@example.com", 3, today()).await.unwrap();
        assert_eq!(outcome, ReminderOutcome::NothingToSend);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_email_is_rejected() {
        let store = stocked_store();
        let result = check_and_send(&store, &ConsoleNotifier, "  ", 3, today()).await;
        assert!(matches!(result, Err(ReminderError::MissingEmail)));
    }

    fn config(gmail: Option<(&str, &str)>, sendgrid: Option<&str>) -> AppConfig {
        AppConfig {
            image_api_key_present: false,
            image_api_base_url: None,
            image_timeout: std::time::Duration::from_secs(30),
            sendgrid_api_key: sendgrid.map(str::to_string),
            reminder_from: "noreply@smartfridge.com".to_string(),
            gmail_user: gmail.map(|(user, _)| user.to_string()),
            gmail_pass: gmail.map(|(_, pass)| pass.to_string()),
        }
    }

    #[tokio::test]
    async fn test_notifier_selection_order() {
        let both = config(Some(("fridge@gmail.com", "app-password")), Some("SG.key"));
        assert_eq!(notifier_from_config(&both).unwrap().name(), "gmail");

        let sendgrid_only = config(None, Some("SG.key"));
        assert_eq!(notifier_from_config(&sendgrid_only).unwrap().name(), "sendgrid");

        let mut half_gmail = config(Some(("fridge@gmail.com", "app-password")), Some("SG.key"));
        half_gmail.gmail_pass = None;
        assert_eq!(notifier_from_config(&half_gmail).unwrap().name(), "sendgrid");

        assert_eq!(notifier_from_config(&config(None, None)).unwrap().name(), "console");
    }

    #[test]
    fn test_html_body_lists_items_with_urgency() {
        let store = stocked_store();
        store
            .create(
                InventoryItem::new("<b>起司</b>", Category::Dairy, Compartment::TopShelf, today() + Duration::days(1)),
                None,
            )
            .unwrap();
        let items = store.expiring(3, today()).unwrap();
        let reminder = Reminder::build("me@example.com", &items, today());

        assert!(reminder.html_body.contains("<strong>3</strong> 項食品"));
        assert!(reminder.html_body.contains("color: #dc2626;\"><strong>魚</strong> (底層架) - 已過期"));
        assert!(reminder.html_body.contains("color: #ea580c;\"><strong>&lt;b&gt;起司&lt;/b&gt;</strong> (頂層架) - 1天後過期"));
        assert!(reminder.html_body.contains("color: #f59e0b;\"><strong>牛奶</strong> (底層架) - 2天後過期"));
        assert!(!reminder.html_body.contains("醬油"));
    }

    #[test]
    fn test_sendgrid_payload_carries_text_and_html() {
        let items = stocked_store().expiring(3, today()).unwrap();
        let reminder = Reminder::build("me@example.com", &items, today());
        let notifier = SendGridNotifier::new("SG.key".to_string(), "noreply@smartfridge.com".to_string());

        let payload = notifier.payload(&reminder);
        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "me@example.com");
        assert_eq!(payload["from"]["email"], "noreply@smartfridge.com");
        assert_eq!(payload["subject"], REMINDER_SUBJECT);
        let content = payload["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "text/plain");
        assert_eq!(content[0]["value"], reminder.body.as_str());
        assert_eq!(content[1]["type"], "text/html");
        assert_eq!(content[1]["value"], reminder.html_body.as_str());
    }

    #[tokio::test]
    async fn test_gmail_message_is_plain_and_html_alternative() {
        let items = stocked_store().expiring(3, today()).unwrap();
        let reminder = Reminder::build("me@example.com", &items, today());
        let notifier = GmailNotifier::new("fridge@gmail.com".to_string(), "app-password".to_string()).unwrap();

        let message = notifier.message(&reminder).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: fridge@gmail.com"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("Content-Type: text/plain; charset=utf-8"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));

        let bad = Reminder { to: "not an address".to_string(), ..reminder };
        assert!(matches!(notifier.message(&bad), Err(ReminderError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_an_outcome() {
        let store = stocked_store();
        let notifier = RecordingNotifier { fail: true, ..Default::default() };
        let outcome = check_and_send(&store, &notifier, "me@example.com", 3, today()).await.unwrap();
        assert!(matches!(outcome, ReminderOutcome::Failed { items: 2, .. }));
    }
}

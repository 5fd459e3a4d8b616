use database::services::{enrollment::DecidedEnrollment, grade::PostedGrade};
use models::status::ApprovalStatus;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    phone_number: &'a str,
    message: &'a str,
}

/// Status document served at the bot's root URL
#[derive(Debug, Deserialize)]
struct ServiceStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    connected: bool,
    #[serde(default)]
    bot_name: String,
}

/// Fire-and-forget client of the WhatsApp bot. Delivery failures are logged
/// and never reach the caller.
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    target: Option<(Client, String)>,
}

impl Notifier {
    pub fn new(base_url: Option<String>) -> Result<Self, reqwest::Error> {
        let target = match base_url {
            Some(base_url) => {
                let client = Client::builder().timeout(Duration::from_secs(5)).build()?;
                Some((client, base_url))
            }
            None => None,
        };

        Ok(Self { target })
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Queues a message on a background task. Students without a bound phone
    /// number are skipped.
    pub fn send(&self, phone_number: Option<&str>, message: String) {
        let (Some((client, base_url)), Some(phone_number)) = (&self.target, phone_number) else {
            return;
        };

        let client = client.clone();
        let url = format!("{base_url}/send");
        let phone_number = phone_number.to_string();

        tokio::spawn(async move {
            let request = SendRequest {
                phone_number: &phone_number,
                message: &message,
            };

            match client.post(&url).json(&request).send().await {
                Ok(response) if response.status().is_success() => {
                    log::debug!("Sent WhatsApp notification to {phone_number}");
                }
                Ok(response) => {
                    log::warn!(
                        "WhatsApp service rejected notification to {phone_number}: {}",
                        response.status()
                    );
                }
                Err(err) => log::warn!("Failed to reach WhatsApp service: {err}"),
            }
        });
    }

    pub fn enrollment_decided(&self, decided: &DecidedEnrollment) {
        self.send(decided.student.phone.as_deref(), enrollment_message(decided));
    }

    pub fn grade_posted(&self, posted: &PostedGrade) {
        self.send(posted.student.phone.as_deref(), grade_message(posted));
    }

    /// Logs whether the bot is reachable and connected
    pub async fn check_service(&self) {
        let Some((client, base_url)) = &self.target else {
            log::info!("WhatsApp notifications disabled, WHATSAPP_SERVICE_URL is not set");
            return;
        };

        let response = match client.get(base_url.as_str()).send().await {
            Ok(response) => response,
            Err(err) => {
                log::warn!("WhatsApp service at {base_url} is offline: {err}");
                return;
            }
        };

        if !response.status().is_success() {
            log::warn!("WhatsApp service at {base_url} answered {}", response.status());
            return;
        }

        match response.json::<ServiceStatus>().await {
            Ok(status) if status.connected => log::info!(
                "WhatsApp service online and connected as {} ({})",
                status.bot_name,
                status.status
            ),
            Ok(status) => log::warn!(
                "WhatsApp service online but not connected ({}), scan the QR code to connect",
                status.status
            ),
            Err(err) => log::warn!("Unreadable WhatsApp service status: {err}"),
        }
    }
}

fn enrollment_message(decided: &DecidedEnrollment) -> String {
    let course = format!("{} {}", decided.course.code, decided.course.name);

    match decided.enrollment.approval_status {
        ApprovalStatus::Approved => format!(
            "KRS {course} ({} {}) telah disetujui.",
            decided.enrollment.academic_year, decided.enrollment.semester
        ),
        _ => format!(
            "KRS {course} ditolak: {}",
            decided
                .enrollment
                .rejection_reason
                .as_deref()
                .unwrap_or("tanpa keterangan")
        ),
    }
}

fn grade_message(posted: &PostedGrade) -> String {
    format!(
        "Nilai {} {}: {:.2} ({}).",
        posted.course.code, posted.course.name, posted.grade.final_score, posted.grade.letter
    )
}

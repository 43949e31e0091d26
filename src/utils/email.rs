use chrono::{DateTime, Utc};
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use campus_config::EmailConfig;
use campus_core::AppError;

#[derive(Debug, Clone)]
pub struct AdmissionMail {
    pub student_name: String,
    pub unique_id: String,
    pub course_name: String,
    pub login_email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct PaymentMail {
    pub student_name: String,
    pub unique_id: String,
    pub payment_id: String,
    pub amount_paid: f64,
    pub amount_due: f64,
    pub payment_date: DateTime<Utc>,
    pub payment_method: String,
}

#[derive(Debug, Clone)]
pub enum Mail {
    AdmissionConfirmation(AdmissionMail),
    PaymentConfirmation(PaymentMail),
}

impl Mail {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::AdmissionConfirmation(_) => "Admission Confirmed",
            Self::PaymentConfirmation(_) => "Fee Payment Received",
        }
    }

    pub fn text_body(&self) -> String {
        match self {
            Self::AdmissionConfirmation(m) => format!(
                "Hi {},\n\n\
                 Congratulations! Your admission to {} has been accepted.\n\n\
                 Student ID: {}\n\
                 Login email: {}\n\
                 Password: {}\n\n\
                 Please keep your student ID safe. You will need it to pay your fees.\n\n\
                 Best regards,\n\
                 Campus Admissions",
                m.student_name, m.course_name, m.unique_id, m.login_email, m.password
            ),
            Self::PaymentConfirmation(m) => format!(
                "Hi {},\n\n\
                 We have received your fee payment.\n\n\
                 Student ID: {}\n\
                 Payment ID: {}\n\
                 Amount paid: {:.2}\n\
                 Amount due: {:.2}\n\
                 Date: {}\n\
                 Method: {}\n\n\
                 Best regards,\n\
                 Campus Accounts",
                m.student_name,
                m.unique_id,
                m.payment_id,
                m.amount_paid,
                m.amount_due,
                m.payment_date.format("%d %b %Y %H:%M UTC"),
                m.payment_method
            ),
        }
    }

    pub fn html_body(&self) -> String {
        let (heading, name, rows) = match self {
            Self::AdmissionConfirmation(m) => (
                format!("Welcome to {}", m.course_name),
                &m.student_name,
                vec![
                    ("Student ID", m.unique_id.clone()),
                    ("Login email", m.login_email.clone()),
                    ("Password", m.password.clone()),
                ],
            ),
            Self::PaymentConfirmation(m) => (
                "Payment received".to_string(),
                &m.student_name,
                vec![
                    ("Student ID", m.unique_id.clone()),
                    ("Payment ID", m.payment_id.clone()),
                    ("Amount paid", format!("{:.2}", m.amount_paid)),
                    ("Amount due", format!("{:.2}", m.amount_due)),
                    ("Date", m.payment_date.format("%d %b %Y %H:%M UTC").to_string()),
                    ("Method", m.payment_method.clone()),
                ],
            ),
        };

        let table_rows: String = rows
            .iter()
            .map(|(label, value)| {
                format!(
                    r#"<tr><td style="padding: 6px 12px; color: #666;">{}</td><td style="padding: 6px 12px; font-weight: 600;">{}</td></tr>"#,
                    label, value
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{subject}</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background-color: #1e3a8a; color: white; padding: 20px; text-align: center; border-radius: 5px 5px 0 0;">
        <h1 style="margin: 0;">{heading}</h1>
    </div>
    <div style="background-color: #f9f9f9; padding: 30px; border-radius: 0 0 5px 5px;">
        <p>Hi {name},</p>
        <table style="border-collapse: collapse;">{table_rows}</table>
        <p style="margin-top: 30px; font-size: 12px; color: #666;">This is an automated message. Please do not reply.</p>
    </div>
</body>
</html>"#,
            subject = self.subject(),
            heading = heading,
            name = name,
            table_rows = table_rows,
        )
    }
}

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send without blocking the caller. Failures are logged and dropped.
    pub fn send_in_background(self, to_email: String, mail: Mail) {
        tokio::spawn(async move {
            if let Err(err) = self.send(&to_email, &mail).await {
                tracing::warn!(
                    to = %to_email,
                    subject = mail.subject(),
                    error = %err.error,
                    "Failed to send email"
                );
            }
        });
    }

    #[instrument(skip(self, mail), fields(subject = mail.subject()))]
    pub async fn send(&self, to_email: &str, mail: &Mail) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!(to = %to_email, "SMTP disabled, skipping email");
            return Ok(());
        }

        self.send_email(to_email, mail.subject(), &mail.text_body(), &mail.html_body())
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment_mail() -> Mail {
        Mail::PaymentConfirmation(PaymentMail {
            student_name: "Karan Mehta".to_string(),
            unique_id: "STU2025000123".to_string(),
            payment_id: "ORDER_0011223344556677".to_string(),
            amount_paid: 1500.0,
            amount_due: 43500.0,
            payment_date: Utc::now(),
            payment_method: "Online".to_string(),
        })
    }

    #[test]
    fn test_admission_mail_contains_credentials() {
        let mail = Mail::AdmissionConfirmation(AdmissionMail {
            student_name: "Karan Mehta".to_string(),
            unique_id: "STU2025000123".to_string(),
            course_name: "BCA".to_string(),
            login_email: "karan@example.com".to_string(),
            password: "Xy7#pQ2!".to_string(),
        });

        let text = mail.text_body();
        assert!(text.contains("STU2025000123"));
        assert!(text.contains("Xy7#pQ2!"));
        assert!(mail.html_body().contains("Welcome to BCA"));
        assert_eq!(mail.subject(), "Admission Confirmed");
    }

    #[test]
    fn test_payment_mail_formats_amounts() {
        let mail = payment_mail();
        let text = mail.text_body();
        assert!(text.contains("Amount paid: 1500.00"));
        assert!(text.contains("Amount due: 43500.00"));
        assert!(mail.html_body().contains("ORDER_0011223344556677"));
    }

    #[tokio::test]
    async fn test_disabled_config_skips_sending() {
        let service = EmailService::new(EmailConfig::disabled());
        assert!(service.send("karan@example.com", &payment_mail()).await.is_ok());
    }
}

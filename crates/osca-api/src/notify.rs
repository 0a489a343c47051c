//! Outbound notifications to citizens.
//!
//! Nothing leaves the process: each message is written to the log at `info`
//! under the `osca::notify` target, with the recipient and content that
//! would have been sent.

use osca_core::application::{Application, ApplicationStatus, FormData};
use rand_core::{OsRng, RngCore};
use tracing::info;

const TARGET: &str = "osca::notify";

pub fn send_sms(to: &str, message: &str) {
  info!(target: TARGET, channel = "sms", to, message, "notification");
}

pub fn send_email(to: &str, to_name: &str, subject: &str) {
  info!(target: TARGET, channel = "email", to, to_name, subject, "notification");
}

/// A six-digit one-time code for `to`. The code is returned to the caller
/// since no message is actually delivered.
pub fn send_otp(to: &str) -> String {
  let otp = (100_000 + OsRng.next_u32() % 900_000).to_string();
  info!(target: TARGET, channel = "otp", to, otp = %otp, "notification");
  otp
}

pub fn notify_registration_success(name: &str, email: &str) {
  info!(target: TARGET, name, "registration received");
  send_email(email, name, "Complete Registration!");
}

/// The message body sent when an application is approved or rejected.
pub fn status_message(
  name: &str,
  kind: &str,
  status: ApplicationStatus,
  reason: &str,
) -> String {
  let verdict = match status {
    ApplicationStatus::Approved => "APPROVED",
    _ => "DISAPPROVED",
  };
  let reason = match reason {
    "" => String::new(),
    r => format!(" Reason: {r}"),
  };
  format!("Hello {name}, your {kind} application was {verdict}.{reason}")
}

pub fn notify_status_update(
  name: &str,
  contact: &str,
  email: &str,
  kind: &str,
  status: ApplicationStatus,
  reason: &str,
) {
  send_sms(contact, &status_message(name, kind, status, reason));
  if !email.is_empty() {
    send_email(email, name, &format!("SeniorConnect: {kind} Update"));
  }
}

fn form_field(form: Option<&FormData>, field: fn(&FormData) -> &Option<String>) -> &str {
  form.and_then(|f| field(f).as_deref()).unwrap_or("")
}

/// Notify the applicant after a review decision. Other transitions send
/// nothing.
pub fn application_reviewed(app: &Application) {
  if !matches!(
    app.status,
    ApplicationStatus::Approved | ApplicationStatus::Rejected
  ) {
    return;
  }
  let form = app.form_data.as_ref();
  notify_status_update(
    &app.user_name,
    form_field(form, |f| &f.contact_number),
    form_field(form, |f| &f.email),
    app.kind.as_ref(),
    app.status,
    &app.rejection_reason,
  );
}

/// Notify a registrant that their submission was received.
pub fn application_received(app: &Application) {
  let form = app.form_data.as_ref();
  let name = match (form_field(form, |f| &f.first_name), form_field(form, |f| &f.last_name)) {
    ("", "") => app.user_name.clone(),
    (first, last) => format!("{first} {last}").trim().to_owned(),
  };
  notify_registration_success(&name, form_field(form, |f| &f.email));
}

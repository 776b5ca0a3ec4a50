//! HTML bodies for the transactional notifications.

use redress_core::models::complaint::{Complaint, Priority, Status};

use crate::mail::OutgoingEmail;

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#e74c3c",
        Priority::Medium => "#f39c12",
        Priority::Low => "#27ae60",
    }
}

/// Welcome note sent to a freshly registered user.
pub fn welcome(to: &str, name: &str) -> OutgoingEmail {
    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">Welcome, {name}!</h2>
  <p>Thank you for registering with our Complaint Management System.</p>
  <p>You can now submit complaints and track their progress.</p>
  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="margin-top: 0; color: #555;">Getting Started</h3>
    <ul>
      <li>Submit new complaints through the complaint form</li>
      <li>Track the status of your submitted complaints</li>
      <li>Receive updates on complaint progress</li>
    </ul>
  </div>
  <p style="color: #666; font-size: 14px;">
    If you have any questions, please contact our support team.
  </p>
</div>"#
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: "Welcome to Complaint Management System".into(),
        html_body,
    }
}

/// New-complaint notice sent to the admin address.
pub fn new_complaint(to: &str, complaint: &Complaint) -> OutgoingEmail {
    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">New Complaint Submitted</h2>
  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="margin-top: 0; color: #555;">{title}</h3>
    <p><strong>Category:</strong> {category}</p>
    <p><strong>Priority:</strong> <span style="color: {color};">{priority}</span></p>
    <p><strong>Description:</strong></p>
    <p style="background-color: white; padding: 15px; border-radius: 5px; border-left: 4px solid #3498db;">
      {description}
    </p>
    <p><strong>Date Submitted:</strong> {submitted}</p>
  </div>
  <p style="color: #666; font-size: 14px;">
    Please review and take appropriate action on this complaint.
  </p>
</div>"#,
        title = complaint.title,
        category = complaint.category,
        color = priority_color(complaint.priority),
        priority = complaint.priority,
        description = complaint.description,
        submitted = complaint.date_submitted.to_rfc2822(),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: format!("New Complaint: {}", complaint.title),
        html_body,
    }
}

/// Status-change notice sent to the admin address.
pub fn status_update(to: &str, complaint: &Complaint, previous: Status) -> OutgoingEmail {
    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #333;">Complaint Status Updated</h2>
  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="margin-top: 0; color: #555;">{title}</h3>
    <p><strong>Previous Status:</strong> <span style="color: #e74c3c;">{previous}</span></p>
    <p><strong>New Status:</strong> <span style="color: #27ae60;">{status}</span></p>
    <p><strong>Category:</strong> {category}</p>
    <p><strong>Priority:</strong> {priority}</p>
  </div>
  <p style="color: #666; font-size: 14px;">
    The complaint status has been successfully updated.
  </p>
</div>"#,
        title = complaint.title,
        previous = previous,
        status = complaint.status,
        category = complaint.category,
        priority = complaint.priority,
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Complaint Status Updated: {}", complaint.title),
        html_body,
    }
}

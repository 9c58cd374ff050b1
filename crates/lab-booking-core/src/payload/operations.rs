//! Single-purpose booking operations: status, payment and reschedule.

use serde::{Deserialize, Serialize};

use crate::draft::ValidationError;
use crate::models::{ActionType, Schedule};

/// Statuses staff can move a booking to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Verified,
    SampleCollected,
    ReportUploaded,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Verified,
        BookingStatus::SampleCollected,
        BookingStatus::ReportUploaded,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Verified => "verified",
            BookingStatus::SampleCollected => "sample_collected",
            BookingStatus::ReportUploaded => "report_uploaded",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Online => "online",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "cash" => Some(PaymentMethod::Cash),
            "online" => Some(PaymentMethod::Online),
            _ => None,
        }
    }
}

/// An operation on an existing booking, outside the full edit flow.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOperation {
    UpdateStatus { status: Option<BookingStatus> },
    UpdatePayment { method: Option<PaymentMethod> },
    Reschedule { schedule: Schedule },
}

impl BookingOperation {
    pub fn action_type(&self) -> ActionType {
        match self {
            BookingOperation::UpdateStatus { .. } => ActionType::UpdateStatus,
            BookingOperation::UpdatePayment { .. } => ActionType::UpdatePayment,
            BookingOperation::Reschedule { .. } => ActionType::UpdateSchedule,
        }
    }

    /// Validate and build the `PATCH` body. Remarks are always required.
    pub fn into_payload(self, remarks: &str) -> Result<OperationPayload, ValidationError> {
        let remarks = remarks.trim();
        if remarks.is_empty() {
            return Err(ValidationError::MissingRemarks);
        }

        let mut payload = OperationPayload {
            action_type: self.action_type(),
            remarks: remarks.to_string(),
            status: None,
            payment_method: None,
            payment_status: None,
            scheduled_date: None,
            scheduled_time: None,
        };

        match self {
            BookingOperation::UpdateStatus { status } => {
                payload.status = Some(status.ok_or(ValidationError::MissingStatus)?);
            }
            BookingOperation::UpdatePayment { method } => {
                let method = method.ok_or(ValidationError::MissingPaymentMethod)?;
                if method == PaymentMethod::Cash {
                    payload.payment_status = Some("success".to_string());
                }
                payload.payment_method = Some(method);
            }
            BookingOperation::Reschedule { schedule } => {
                if !schedule.is_complete() {
                    return Err(ValidationError::MissingSchedule);
                }
                if schedule.parsed_date().is_none() {
                    return Err(ValidationError::InvalidScheduleDate(schedule.date));
                }
                if schedule.parsed_time().is_none() {
                    return Err(ValidationError::InvalidScheduleTime(schedule.time));
                }
                payload.scheduled_date = Some(schedule.date.trim().to_string());
                payload.scheduled_time = Some(schedule.time.trim().to_string());
            }
        }

        Ok(payload)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationPayload {
    pub action_type: ActionType,
    pub remarks: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Set to `success` for cash payments collected on site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
}

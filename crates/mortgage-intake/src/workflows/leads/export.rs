use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::repository::LeadRecord;

#[derive(Debug)]
pub enum LeadExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for LeadExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadExportError::Io(err) => write!(f, "failed to write lead export: {}", err),
            LeadExportError::Csv(err) => write!(f, "could not encode lead export row: {}", err),
        }
    }
}

impl std::error::Error for LeadExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadExportError::Io(err) => Some(err),
            LeadExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LeadExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LeadExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Serialize)]
struct LeadRow<'a> {
    #[serde(rename = "Lead ID")]
    lead_id: &'a str,
    #[serde(rename = "Created At")]
    created_at: String,
    #[serde(rename = "First Name")]
    first_name: &'a str,
    #[serde(rename = "Last Name")]
    last_name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Phone")]
    phone: &'a str,
    #[serde(rename = "Province")]
    province: &'a str,
    #[serde(rename = "Grade")]
    grade: &'static str,
    #[serde(rename = "Score")]
    total_score: u8,
    #[serde(rename = "Priority")]
    priority: &'static str,
    #[serde(rename = "Approval Probability")]
    approval_probability: u8,
    #[serde(rename = "Assign To")]
    assign_to: &'a str,
    #[serde(rename = "Team")]
    team: &'a str,
    #[serde(rename = "Follow Up")]
    follow_up: &'a str,
    #[serde(rename = "Status")]
    status: &'static str,
}

impl<'a> From<&'a LeadRecord> for LeadRow<'a> {
    fn from(record: &'a LeadRecord) -> Self {
        let personal = &record.answers.personal_info;
        Self {
            lead_id: &record.lead_id.0,
            created_at: record.created_at.to_rfc3339(),
            first_name: &personal.first_name,
            last_name: &personal.last_name,
            email: &personal.email,
            phone: &personal.phone,
            province: record
                .answers
                .loan_details
                .province
                .map_or("", |province| province.label()),
            grade: record.score.grade.label(),
            total_score: record.score.total_score,
            priority: record.score.priority.label(),
            approval_probability: record.score.approval_probability,
            assign_to: &record.routing.assign_to,
            team: &record.routing.team,
            follow_up: &record.score.follow_up_strategy.timeframe,
            status: record.status.label(),
        }
    }
}

/// Write scored leads as CRM import CSV with a header row. Returns the row count.
pub fn export_csv<W: Write>(records: &[LeadRecord], writer: W) -> Result<usize, LeadExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(LeadRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

pub fn export_csv_to_path<P: AsRef<Path>>(
    records: &[LeadRecord],
    path: P,
) -> Result<usize, LeadExportError> {
    let file = std::fs::File::create(path)?;
    export_csv(records, file)
}

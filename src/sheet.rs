//! Row codec for the spreadsheet-backed tables.
//!
//! Each category lives in its own sheet with a fixed column layout. Rows
//! arrive as ordered string cells; trailing empty cells may be missing.

use crate::dates::{format_local_date, parse_local_date};
use crate::model::{Category, Record, Subject};

/// Column positions (0-based) of one category's sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Sheet (tab) name.
    pub sheet: &'static str,
    /// Number of columns a full row carries.
    pub width: usize,
    pub id: usize,
    pub subject: usize,
    pub created_by: Option<usize>,
    pub status: Option<usize>,
    pub created: usize,
    pub planned: Option<usize>,
    pub completed: usize,
    /// First and second revised deadline.
    pub revisions: Option<[usize; 2]>,
    pub revision_count: Option<usize>,
    pub approval: Option<usize>,
}

/// `DelegationMaster!A:M`
pub const DELEGATION_LAYOUT: SheetLayout = SheetLayout {
    sheet: "DelegationMaster",
    width: 13,
    id: 0,
    subject: 1,
    created_by: None,
    status: Some(10),
    created: 3,
    planned: Some(4),
    completed: 7,
    revisions: Some([5, 6]),
    revision_count: Some(8),
    approval: Some(12),
};

/// `ChecklistMaster!A:K`. Checklist items have no creation column; the
/// planned date doubles as the date the item comes due.
pub const CHECKLIST_LAYOUT: SheetLayout = SheetLayout {
    sheet: "ChecklistMaster",
    width: 11,
    id: 3,
    subject: 0,
    created_by: None,
    status: None,
    created: 6,
    planned: Some(6),
    completed: 7,
    revisions: None,
    revision_count: None,
    approval: None,
};

/// `HelpTicketsMaster!A:H`
pub const HELP_TICKET_LAYOUT: SheetLayout = SheetLayout {
    sheet: "HelpTicketsMaster",
    width: 8,
    id: 0,
    subject: 2,
    created_by: Some(1),
    status: Some(4),
    created: 5,
    planned: None,
    completed: 6,
    revisions: None,
    revision_count: None,
    approval: None,
};

/// `SupportTicketsMaster!A:H`
pub const SUPPORT_TICKET_LAYOUT: SheetLayout = SheetLayout {
    sheet: "SupportTicketsMaster",
    ..HELP_TICKET_LAYOUT
};

/// `Employee!A:H`: name in column B, department in column E.
pub const EMPLOYEE_SHEET: &str = "Employee";
const EMPLOYEE_WIDTH: usize = 8;
const EMPLOYEE_NAME: usize = 1;
const EMPLOYEE_DEPARTMENT: usize = 4;

impl SheetLayout {
    /// Layout of the sheet holding `category`.
    pub fn for_category(category: Category) -> &'static SheetLayout {
        match category {
            Category::Delegation => &DELEGATION_LAYOUT,
            Category::Checklist => &CHECKLIST_LAYOUT,
            Category::HelpTicket => &HELP_TICKET_LAYOUT,
            Category::SupportTicket => &SUPPORT_TICKET_LAYOUT,
        }
    }

    /// A1 range covering the data rows (row 1 is the header).
    pub fn data_range(&self) -> String {
        format!("{}!A2:{}", self.sheet, column_letter(self.width - 1))
    }
}

/// A1 range covering the employee data rows.
pub fn employee_range() -> String {
    format!("{EMPLOYEE_SHEET}!A2:{}", column_letter(EMPLOYEE_WIDTH - 1))
}

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn optional_cell(row: &[String], index: usize) -> Option<String> {
    let value = cell(row, index).trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Decode one data row of `category`'s sheet.
///
/// Unparsable date cells become `None`; the classifier decides what that
/// means for the record.
pub fn decode_row(category: Category, row: &[String]) -> Record {
    let layout = SheetLayout::for_category(category);

    Record {
        id: cell(row, layout.id).trim().to_string(),
        category,
        subject: cell(row, layout.subject).trim().to_string(),
        created_by: layout.created_by.and_then(|i| optional_cell(row, i)),
        status: layout.status.and_then(|i| optional_cell(row, i)),
        created_at: parse_local_date(cell(row, layout.created)),
        planned_at: layout.planned.and_then(|i| parse_local_date(cell(row, i))),
        completed_at: parse_local_date(cell(row, layout.completed)),
        revised_deadlines: layout
            .revisions
            .map(|[first, second]| {
                [
                    parse_local_date(cell(row, first)),
                    parse_local_date(cell(row, second)),
                ]
            })
            .unwrap_or_default(),
        revision_count: layout
            .revision_count
            .and_then(|i| cell(row, i).trim().parse().ok())
            .unwrap_or(0),
        approval: layout.approval.and_then(|i| optional_cell(row, i)),
    }
}

/// Encode a record as a new row.
pub fn encode_row(record: &Record) -> Vec<String> {
    let mut row = Vec::new();
    encode_into(record, &mut row);
    row
}

/// Write a record's mapped cells into an existing row, leaving unmapped
/// cells (task text, photo links, ...) untouched.
///
/// A date cell that already holds the same date keeps its text, so a
/// stamped time of day survives an update.
pub fn encode_into(record: &Record, row: &mut Vec<String>) {
    let layout = SheetLayout::for_category(record.category);
    if row.len() < layout.width {
        row.resize(layout.width, String::new());
    }

    row[layout.id] = record.id.clone();
    row[layout.subject] = record.subject.clone();
    if let Some(i) = layout.created_by {
        row[i] = record.created_by.clone().unwrap_or_default();
    }
    if let Some(i) = layout.status {
        row[i] = record.status.clone().unwrap_or_default();
    }

    write_date(row, layout.created, record.created_at);
    if let Some(i) = layout.planned {
        write_date(row, i, record.planned_at);
    }
    write_date(row, layout.completed, record.completed_at);

    if let Some(slots) = layout.revisions {
        for (i, date) in slots.into_iter().zip(record.revised_deadlines) {
            write_date(row, i, date);
        }
    }
    if let Some(i) = layout.revision_count {
        if record.revision_count > 0 || !row[i].trim().is_empty() {
            row[i] = record.revision_count.to_string();
        }
    }
    if let Some(i) = layout.approval {
        row[i] = record.approval.clone().unwrap_or_default();
    }
}

fn write_date(row: &mut [String], index: usize, date: Option<chrono::NaiveDate>) {
    if parse_local_date(&row[index]) == date {
        return;
    }
    row[index] = date.map(format_local_date).unwrap_or_default();
}

/// Decode an employee row. Rows without a name are skipped.
pub fn decode_subject(row: &[String]) -> Option<Subject> {
    let name = optional_cell(row, EMPLOYEE_NAME)?;
    Some(Subject {
        name,
        department: optional_cell(row, EMPLOYEE_DEPARTMENT),
    })
}

//! HTML fragments for the dashboard.
//!
//! Every function here is pure. Text that originated from a user or from the
//! backend goes through [`escape_html`] before it is written out.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use fleetdesk_core::format::{PLACEHOLDER, escape_html, format_age_days, format_km, format_timestamp};
use fleetdesk_core::{DraftId, VehicleId};
use fleetdesk_fleet::triage::{TagCounts, TriageEntry};
use fleetdesk_fleet::{Deficiency, IssueTag, KeyRecord, MeetingMinutes, Vehicle, VehicleStatus};

use crate::modal::ModalState;
use crate::toast::Toast;
use crate::view::{LoadState, TriageView};

/// Open deficiencies shown on a collapsed list before "Show all".
pub const DEFICIENCY_PREVIEW: usize = 3;

/// Replacement markup for one element, addressed by its DOM id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPatch {
    pub target_id: String,
    pub html: String,
}

pub fn row_dom_id(id: VehicleId) -> String {
    format!("vehicle-row-{id}")
}

/// Summary counts followed by the list, the loading line, or the error panel.
pub fn render_triage(view: &TriageView, now: DateTime<Utc>) -> String {
    let mut html = render_summary(&view.counts(now));
    match &view.snapshot {
        LoadState::Loading => html.push_str(r#"<div class="triage-loading">Loading vehicles…</div>"#),
        LoadState::Failed(message) => html.push_str(&render_error_panel(message)),
        LoadState::Loaded(_) => {
            let entries = view.visible(now);
            html.push_str(r#"<div class="triage-list">"#);
            if entries.is_empty() {
                html.push_str(r#"<div class="triage-empty">No vehicles match.</div>"#);
            }
            for entry in &entries {
                html.push_str(&render_row(entry, view, now));
            }
            html.push_str("</div>");
        }
    }
    html
}

pub fn render_summary(counts: &TagCounts) -> String {
    let mut html = String::from(r#"<div class="triage-summary">"#);
    let _ = write!(
        html,
        r#"<span class="count count-total">{} vehicles</span>"#,
        counts.total
    );
    for tag in IssueTag::ALL {
        let _ = write!(
            html,
            r#"<span class="count count-{}">{}: {}</span>"#,
            tag.as_str().to_lowercase(),
            tag.label(),
            counts.get(tag)
        );
    }
    html.push_str("</div>");
    html
}

pub fn render_error_panel(message: &str) -> String {
    format!(
        r#"<div class="error-panel" role="alert">{}</div>"#,
        escape_html(message)
    )
}

pub fn status_badge(status: VehicleStatus) -> String {
    format!(
        r#"<span class="badge status-{}">{}</span>"#,
        status.as_str().to_lowercase(),
        status.display_name()
    )
}

fn issue_chip(tag: IssueTag) -> String {
    format!(
        r#"<span class="chip chip-{}">{}</span>"#,
        tag.as_str().to_lowercase(),
        tag.label()
    )
}

/// Label of the preview toggle, or `None` when everything already fits.
pub fn show_all_label(open_count: usize, showing_all: bool) -> Option<String> {
    if open_count <= DEFICIENCY_PREVIEW {
        return None;
    }
    Some(if showing_all {
        format!("Show top {DEFICIENCY_PREVIEW}")
    } else {
        format!("Show all {open_count} deficiencies")
    })
}

pub fn render_row(entry: &TriageEntry<'_>, view: &TriageView, now: DateTime<Utc>) -> String {
    let vehicle = entry.vehicle;
    let expanded = view.is_expanded(vehicle.id);
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="triage-row{}" id="{}" data-vehicle-id="{}">"#,
        if expanded { " expanded" } else { "" },
        row_dom_id(vehicle.id),
        vehicle.id
    );
    let _ = write!(
        html,
        r#"<button class="row-toggle" aria-expanded="{expanded}"><span class="label">{}</span><span class="plate">{}</span><span class="driver">{}</span>{}<span class="chips">"#,
        escape_html(&vehicle.display_label()),
        text_or_placeholder(vehicle.license_plate.as_deref()),
        text_or_placeholder(vehicle.driver_name.as_deref()),
        status_badge(vehicle.status),
    );
    for tag in entry.flags.tags() {
        html.push_str(&issue_chip(tag));
    }
    html.push_str("</span></button>");
    if expanded {
        html.push_str(&render_row_detail(vehicle, view.shows_all(vehicle.id), now));
    }
    html.push_str("</div>");
    html
}

fn render_row_detail(vehicle: &Vehicle, show_all: bool, now: DateTime<Utc>) -> String {
    let mut html = String::from(r#"<div class="row-detail"><dl>"#);
    let mut field = |name: &str, value: String| {
        let _ = write!(html, "<dt>{name}</dt><dd>{value}</dd>");
    };
    field("Current km", format_km(vehicle.current_km));
    field("Service due", format_km(vehicle.service_due_km));
    field("Km remaining", format_km(vehicle.km_remaining));
    field(
        "Last inspection",
        format!(
            "{} ({})",
            format_timestamp(vehicle.last_submission_at),
            format_age_days(vehicle.last_submission_at, now)
        ),
    );
    field(
        "Inspected by",
        text_or_placeholder(vehicle.last_submission_by.as_deref()),
    );
    field("Office notes", text_or_placeholder(vehicle.office_notes.as_deref()));
    html.push_str("</dl>");

    let open: Vec<&Deficiency> = vehicle.deficiencies.iter().filter(|d| d.is_open()).collect();
    if !open.is_empty() {
        let shown = if show_all { open.len() } else { open.len().min(DEFICIENCY_PREVIEW) };
        html.push_str(r#"<ul class="deficiencies">"#);
        for deficiency in &open[..shown] {
            html.push_str(&deficiency_item(deficiency));
        }
        html.push_str("</ul>");
        if let Some(label) = show_all_label(open.len(), show_all) {
            let _ = write!(
                html,
                r#"<button class="show-all" data-vehicle-id="{}">{label}</button>"#,
                vehicle.id
            );
        }
    }
    html.push_str("</div>");
    html
}

fn deficiency_item(deficiency: &Deficiency) -> String {
    format!(
        r#"<li class="deficiency"><span class="severity">{}</span> {} <span class="deficiency-status">{}</span></li>"#,
        escape_html(&deficiency.severity),
        escape_html(&deficiency.description),
        escape_html(deficiency.status.as_str()),
    )
}

/// Patch for a single row after an expand or show-all toggle. `None` when the
/// row is not currently visible.
pub fn row_patch(view: &TriageView, id: VehicleId, now: DateTime<Utc>) -> Option<RowPatch> {
    let entries = view.visible(now);
    let entry = entries.iter().find(|e| e.vehicle.id == id)?;
    Some(RowPatch {
        target_id: row_dom_id(id),
        html: render_row(entry, view, now),
    })
}

/// Editable deficiency list on the vehicle detail page. `draft` is the
/// unsaved "+ Create deficiency" row, which has no persisted id yet.
pub fn render_deficiency_panel(vehicle: &Vehicle, draft: Option<DraftId>) -> String {
    let mut html = format!(
        r#"<div class="deficiency-panel" id="deficiencies-{}"><table><thead><tr><th>Description</th><th>Severity</th><th>Status</th><th>Updated</th><th></th></tr></thead><tbody>"#,
        vehicle.id
    );
    if vehicle.deficiencies.is_empty() && draft.is_none() {
        html.push_str(r#"<tr class="empty"><td colspan="5">No deficiencies recorded.</td></tr>"#);
    }
    for deficiency in &vehicle.deficiencies {
        let edit = match deficiency.id {
            Some(id) => format!(r#"<button class="edit-deficiency" data-deficiency-id="{id}">Edit</button>"#),
            None => String::new(),
        };
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{} {}</td><td>{edit}</td></tr>",
            escape_html(&deficiency.description),
            escape_html(&deficiency.severity),
            escape_html(deficiency.status.as_str()),
            text_or_placeholder(deficiency.updated_by.as_deref()),
            format_timestamp(deficiency.updated_at),
        );
    }
    match draft {
        Some(draft) => {
            let _ = write!(
                html,
                r#"<tr class="draft" data-draft-id="{draft}"><td colspan="5">New deficiency (unsaved)</td></tr>"#
            );
        }
        None => html.push_str(
            r#"<tr class="create"><td colspan="5"><button class="create-deficiency">+ Create deficiency</button></td></tr>"#,
        ),
    }
    html.push_str("</tbody></table></div>");
    html
}

/// Inline error area inside a modal; empty when there is nothing to show.
pub fn render_modal_error<P>(modal: &ModalState<P>) -> String {
    match modal.error() {
        Some(message) => format!(
            r#"<div class="modal-error" role="alert">{}</div>"#,
            escape_html(message)
        ),
        None => String::new(),
    }
}

pub fn render_keys_table(keys: &[KeyRecord]) -> String {
    let mut html = String::from(
        r#"<table class="keys"><thead><tr><th>Key</th><th>Vehicle</th><th>Signed out to</th><th>Since</th><th></th></tr></thead><tbody>"#,
    );
    if keys.is_empty() {
        html.push_str(r#"<tr class="empty"><td colspan="5">No keys are signed out.</td></tr>"#);
    }
    for key in keys {
        let _ = write!(
            html,
            r#"<tr data-key-id="{}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><button class="return-key" data-key-id="{}">Return</button></td></tr>"#,
            key.id,
            escape_html(&key.key_number),
            text_or_placeholder(key.vehicle_label.as_deref()),
            text_or_placeholder(key.signed_out_to.as_deref()),
            format_timestamp(key.signed_out_at),
            key.id,
        );
    }
    html.push_str("</tbody></table>");
    html
}

pub fn render_minutes_list(minutes: &[MeetingMinutes]) -> String {
    let mut html = String::from(r#"<ul class="meeting-minutes">"#);
    for entry in minutes {
        let _ = write!(
            html,
            r#"<li data-minutes-id="{}"><h3>{}</h3><p class="meta">{} · {}</p><p>{}</p></li>"#,
            entry.id,
            escape_html(&entry.title),
            entry.held_on.format("%Y-%m-%d"),
            escape_html(&entry.attendees.join(", ")),
            escape_html(&entry.body),
        );
    }
    html.push_str("</ul>");
    html
}

pub fn render_toast(toast: &Toast) -> String {
    let mut html = format!(
        r#"<div class="toast" data-dismiss-ms="{}"><strong>{}</strong>"#,
        toast.dismiss_after.as_millis(),
        escape_html(&toast.title)
    );
    if let Some(detail) = &toast.detail {
        let _ = write!(html, r#"<div class="toast-detail">{}</div>"#, escape_html(detail));
    }
    html.push_str("</div>");
    html
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(text) => escape_html(text),
        None => PLACEHOLDER.to_string(),
    }
}

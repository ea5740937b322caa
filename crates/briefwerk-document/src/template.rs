// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Letter HTML composition.
//
// Produces the fixed A4 layout the renderer converts to PDF: letterhead,
// document title and number, participants table, activity details, and the
// signature block carrying the scannable code plus the printed validation
// code. Layout only — the validation semantics live in briefwerk-verify.

use briefwerk_core::config::SchoolIdentity;
use briefwerk_core::types::PermissionLetter;
use chrono::{DateTime, Utc};

/// Long-form date used in the letter body and the signature line.
fn format_long_date(date: DateTime<Utc>) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

/// Compose the printable HTML for a letter.
///
/// `qr_svg` is the inline SVG of the scannable verification code; when it
/// is absent the validation code still prints as text, so the document
/// remains verifiable by manual entry.
pub fn compose_letter_html(
    school: &SchoolIdentity,
    letter: &PermissionLetter,
    validation_code: &str,
    qr_svg: Option<&str>,
    issued_on: DateTime<Utc>,
) -> String {
    let participant_rows: String = letter
        .participants
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "<tr><td class=\"no-col\">{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                i + 1,
                p.name,
                p.class_group,
                p.note.as_deref().unwrap_or("-"),
            )
        })
        .collect();

    let qr_block = match qr_svg {
        Some(svg) => format!("<div class=\"qr-code\">{svg}</div>"),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"><meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} Letter</title>
<style>
  *{{margin:0;padding:0;box-sizing:border-box}}
  body{{font-family:'Times New Roman',serif;font-size:12px;line-height:1.45;color:#000;background:#fff}}
  .page{{width:210mm;min-height:297mm;padding:14mm 14mm 16mm;margin:0 auto;position:relative}}
  .header{{text-align:center;margin-bottom:10px;border-bottom:3px solid #000;padding-bottom:8px}}
  .header h1{{font-size:16px;font-weight:bold;text-transform:uppercase;margin-bottom:2px}}
  .header h2{{font-size:24px;font-weight:900;text-transform:uppercase;margin-bottom:4px}}
  .header p{{font-size:11px;margin-bottom:2px}}
  .document-title{{text-align:center;margin:14px 0 12px}}
  .document-title h3{{font-size:18px;font-weight:bold;text-decoration:underline;margin-bottom:6px}}
  .document-number{{font-size:14px;font-weight:600}}
  .content{{margin-bottom:18px;text-align:justify;line-height:1.6;font-size:13px}}
  .content p{{margin-bottom:10px}}
  table{{border-collapse:collapse;width:100%}}
  .participants-table{{margin:10px 0;border:1px solid #000;font-size:13px}}
  .participants-table th,.participants-table td{{border:1px solid #000;padding:6px 8px;vertical-align:top}}
  .participants-table th{{background:#f5f5f5;font-weight:bold;text-align:center}}
  .participants-table .no-col{{width:30px;text-align:center}}
  thead{{display:table-header-group}}
  tr{{page-break-inside:avoid}}
  .info-table{{margin:8px 0 4px;border:none;font-size:13px}}
  .info-table td{{border:none;padding:2px 0}}
  .info-table .label{{width:80px}}.info-table .colon{{width:20px}}
  .signature-section{{margin-top:24px;display:flex;justify-content:flex-end;font-size:13px}}
  .sign-box{{width:240px;text-align:center}}
  .qr-code{{width:90px;height:90px;margin:8px auto 6px}}
  .qr-code svg{{width:90px;height:90px}}
  .validation-code{{font-family:monospace;font-weight:bold;font-size:10px}}
  .validation-text{{color:#666;font-size:8px}}
  @media print{{.page{{margin:0;box-shadow:none}}}}
</style>
</head>
<body>
  <div class="page">
    <div class="header">
      <h1>{authority}</h1>
      <h2>{school_name}</h2>
      <p>{address}</p>
      <p>Email: {email} &nbsp; Website: {website}</p>
    </div>

    <div class="document-title">
      <h3>{title}</h3>
      <div class="document-number">Number: {number}</div>
    </div>

    <div class="content">
      <p>The undersigned, Principal of {school_name}, hereby states that:</p>

      <table class="participants-table">
        <thead>
          <tr><th class="no-col">No</th><th>Name</th><th>Class / Role</th><th>Note</th></tr>
        </thead>
        <tbody>
{participant_rows}        </tbody>
        <tfoot>
          <tr><td colspan="4" style="text-align:center;font-weight:bold;padding:6px 0;">Total participants: {participant_count}</td></tr>
        </tfoot>
      </table>

      <table class="info-table">
        <tr><td class="label">Activity</td><td class="colon">:</td><td>{activity}</td></tr>
        <tr><td class="label">Date</td><td class="colon">:</td><td>{activity_date}</td></tr>
        <tr><td class="label">Location</td><td class="colon">:</td><td>{location}</td></tr>
        <tr><td class="label">Time</td><td class="colon">:</td><td>{time_start} – {time_end}</td></tr>
      </table>

      <p>This letter is issued to be used as appropriate.</p>
    </div>

    <div class="signature-section">
      <div class="sign-box">
        <div>{city}, {issued_date}</div>
        {qr_block}
        <div class="validation-code">{validation_code}</div>
        <div class="validation-text">Document validation code</div>
      </div>
    </div>
  </div>
</body>
</html>"#,
        title = letter.letter_type.document_title(),
        authority = school.authority,
        school_name = school.school_name,
        address = school.address,
        email = school.email,
        website = school.website,
        number = letter.letter_number,
        participant_rows = participant_rows,
        participant_count = letter.participant_count(),
        activity = letter.activity,
        activity_date = format_long_date(letter.date),
        location = letter.location,
        time_start = letter.time_start,
        time_end = letter.time_end,
        city = school.city,
        issued_date = format_long_date(issued_on),
        validation_code = validation_code,
        qr_block = qr_block,
    )
}

//! Plain-text rendering for the offline subcommands.

use std::fmt::Write as _;

use chrono::Datelike as _;
use manning_core::{
  calendar::{CalendarMonth, DayCell, WEEKDAY_HEADERS},
  coverage::ApplicationCoverage,
};

/// A month grid, one week per line, followed by the at-risk days.
///
/// Markers: `!` at risk, `*` someone unavailable, `>` today. Days outside the
/// month are shown in parentheses.
pub fn calendar(month: CalendarMonth, cells: &[DayCell]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", month.label());
  if cells.is_empty() {
    out.push_str("(select a team and an application)\n");
    return out;
  }

  for header in WEEKDAY_HEADERS {
    let _ = write!(out, "{header:>6}");
  }
  out.push('\n');

  for week in cells.chunks(7) {
    for cell in week {
      let day = cell.date.day();
      let marker = if cell.is_at_risk {
        '!'
      } else if !cell.unavailable_developers.is_empty() {
        '*'
      } else {
        ' '
      };
      let today = if cell.is_today { '>' } else { ' ' };
      let label = if cell.is_current_month { format!("{day}") } else { format!("({day})") };
      let _ = write!(out, "{today}{label:>4}{marker}");
    }
    out.push('\n');
  }

  for cell in cells.iter().filter(|c| c.is_at_risk) {
    let names: Vec<&str> = cell.unavailable_developers.iter().map(|d| d.name.as_str()).collect();
    let _ = writeln!(
      out,
      "{}  at risk: {}  (away: {})",
      cell.date,
      cell.affected_applications.join(", "),
      names.join(", ")
    );
  }
  out
}

pub fn coverage(rows: &[ApplicationCoverage]) -> String {
  let mut out = String::new();
  if rows.is_empty() {
    out.push_str("no application skills on this team\n");
  }
  for row in rows {
    let names: Vec<&str> = row.developers.iter().map(|d| d.name.as_str()).collect();
    let _ = writeln!(out, "{:<24} {:>3}  {}", row.application, row.count, names.join(", "));
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use manning_core::calendar::DeveloperRef;

  use super::*;

  fn cell(date: NaiveDate, at_risk: bool) -> DayCell {
    DayCell {
      date,
      is_current_month: true,
      is_today: false,
      is_at_risk: at_risk,
      unavailable_developers: if at_risk {
        vec![DeveloperRef { id: "a".into(), name: "Dev A".into() }]
      } else {
        Vec::new()
      },
      affected_applications: if at_risk { vec!["Ledger".into()] } else { Vec::new() },
    }
  }

  #[test]
  fn grid_lists_risk_days() {
    let first = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
    let cells: Vec<DayCell> = first
      .iter_days()
      .take(7)
      .enumerate()
      .map(|(i, d)| cell(d, i == 3))
      .collect();
    let text = calendar(CalendarMonth::containing(first).unwrap(), &cells);

    assert!(text.starts_with("September 2024\n"));
    assert!(text.contains("4!"));
    assert!(text.contains("2024-09-04  at risk: Ledger  (away: Dev A)"));
  }

  #[test]
  fn empty_grid_prompts_for_selection() {
    let month = CalendarMonth::new(2024, 6).unwrap();
    assert!(calendar(month, &[]).contains("select a team"));
  }
}

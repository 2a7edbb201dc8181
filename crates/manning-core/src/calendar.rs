//! Calendar projector: the month grid of the support-availability view.
//!
//! A grid always starts on a Sunday and ends on a Saturday, filling partial
//! weeks at either edge with days of the adjacent months. Every cell carries
//! the [`assess_day`] verdict for the selected team and application.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::{
  Error, Result,
  availability::{ApplicationSelection, assess_day, team_developers},
  model::{Developer, TeamData},
};

/// Column headers of the grid, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// ─── Month ───────────────────────────────────────────────────────────────────

/// A calendar month, held as its first and last day together with the
/// whole-week window the grid spans.
///
/// Only months whose window fits inside the representable date range can be
/// constructed, so none of the accessors can overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
  first:  NaiveDate,
  last:   NaiveDate,
  window: (NaiveDate, NaiveDate),
}

impl CalendarMonth {
  /// `month` is 1-based.
  pub fn new(year: i32, month: u32) -> Result<Self> {
    Self::build(year, month).ok_or(Error::InvalidMonth { year, month })
  }

  fn build(year: i32, month: u32) -> Option<Self> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    let lead = first.weekday().num_days_from_sunday();
    let trail = 6 - last.weekday().num_days_from_sunday();
    let start = first.checked_sub_days(Days::new(lead.into()))?;
    let end = last.checked_add_days(Days::new(trail.into()))?;
    Some(Self { first, last, window: (start, end) })
  }

  /// The month `date` falls in.
  pub fn containing(date: NaiveDate) -> Result<Self> { Self::new(date.year(), date.month()) }

  pub fn year(self) -> i32 { self.first.year() }

  pub fn month(self) -> u32 { self.first.month() }

  pub fn first_day(self) -> NaiveDate { self.first }

  pub fn last_day(self) -> NaiveDate { self.last }

  /// `None` at the start of the supported range.
  pub fn previous(self) -> Option<Self> {
    match self.month() {
      1 => Self::build(self.year().checked_sub(1)?, 12),
      m => Self::build(self.year(), m - 1),
    }
  }

  /// `None` at the end of the supported range.
  pub fn next(self) -> Option<Self> {
    match self.month() {
      12 => Self::build(self.year().checked_add(1)?, 1),
      m => Self::build(self.year(), m + 1),
    }
  }

  pub fn contains(self, date: NaiveDate) -> bool {
    date.year() == self.year() && date.month() == self.month()
  }

  /// The inclusive grid window: the Sunday on or before the first day through
  /// the Saturday on or after the last day.
  pub fn display_window(self) -> (NaiveDate, NaiveDate) { self.window }

  /// e.g. "June 2024".
  pub fn label(self) -> String { self.first.format("%B %Y").to_string() }
}

// ─── Cells ───────────────────────────────────────────────────────────────────

/// A lightweight pointer to a developer, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeveloperRef {
  pub id:   String,
  pub name: String,
}

impl From<&Developer> for DeveloperRef {
  fn from(d: &Developer) -> Self { Self { id: d.id.clone(), name: d.name.clone() } }
}

/// One day of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
  pub date:                   NaiveDate,
  /// False for spillover days of the adjacent months.
  pub is_current_month:       bool,
  pub is_today:               bool,
  pub is_at_risk:             bool,
  pub unavailable_developers: Vec<DeveloperRef>,
  pub affected_applications:  Vec<String>,
}

impl DayCell {
  /// One-line summary of who is away, as shown inside a cell.
  pub fn unavailable_summary(&self) -> String {
    match self.unavailable_developers.as_slice() {
      [] => String::new(),
      [only] => only.name.clone(),
      many => format!("{} developers unavailable", many.len()),
    }
  }
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// The inputs of a projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarQuery {
  pub month:       CalendarMonth,
  pub team_id:     Option<String>,
  pub application: Option<ApplicationSelection>,
}

/// Project the grid for `query`.
///
/// Returns no cells when no team or no application is selected, or when the
/// selected team does not exist.
pub fn compute_calendar(
  roster: &TeamData,
  query: &CalendarQuery,
  today: NaiveDate,
) -> Vec<DayCell> {
  let (Some(team_id), Some(selection)) = (&query.team_id, &query.application) else {
    return Vec::new();
  };
  if roster.team(team_id).is_none() {
    return Vec::new();
  }

  let team = team_developers(roster, team_id);
  let (start, end) = query.month.display_window();

  start
    .iter_days()
    .take_while(|date| *date <= end)
    .map(|date| {
      let verdict = assess_day(&team, selection, date);
      DayCell {
        date,
        is_current_month: query.month.contains(date),
        is_today: date == today,
        is_at_risk: verdict.is_at_risk,
        unavailable_developers: verdict.unavailable.into_iter().map(DeveloperRef::from).collect(),
        affected_applications: verdict.affected_applications,
      }
    })
    .collect()
}

pub fn has_any_risk_days(cells: &[DayCell]) -> bool { cells.iter().any(|c| c.is_at_risk) }

// ─── State ───────────────────────────────────────────────────────────────────

/// A user action on the availability view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
  PreviousMonth,
  NextMonth,
  /// Jump to the month containing today.
  Today,
  SelectTeam(Option<String>),
  SelectApplication(Option<ApplicationSelection>),
}

/// The displayed month and selections, plus the grid they produce.
///
/// Every event goes through [`CalendarState::dispatch`], which recomputes the
/// whole grid.
#[derive(Debug, Clone)]
pub struct CalendarState {
  query: CalendarQuery,
  cells: Vec<DayCell>,
}

impl CalendarState {
  /// Start on the month containing `today` with nothing selected.
  pub fn new(today: NaiveDate) -> Result<Self> {
    Ok(Self {
      query: CalendarQuery {
        month:       CalendarMonth::containing(today)?,
        team_id:     None,
        application: None,
      },
      cells: Vec::new(),
    })
  }

  pub fn query(&self) -> &CalendarQuery { &self.query }

  pub fn cells(&self) -> &[DayCell] { &self.cells }

  /// Apply `event` and recompute. Navigating past either end of the supported
  /// range leaves the month unchanged.
  pub fn dispatch(
    &mut self,
    event: CalendarEvent,
    roster: &TeamData,
    today: NaiveDate,
  ) -> &[DayCell] {
    let month = match event {
      CalendarEvent::PreviousMonth => self.query.month.previous(),
      CalendarEvent::NextMonth => self.query.month.next(),
      CalendarEvent::Today => CalendarMonth::containing(today).ok(),
      CalendarEvent::SelectTeam(team_id) => {
        self.query.team_id = team_id;
        None
      }
      CalendarEvent::SelectApplication(app) => {
        self.query.application = app;
        None
      }
    };
    if let Some(month) = month {
      self.query.month = month;
    }
    self.refresh(roster, today)
  }

  /// Recompute against a new roster snapshot without changing selections.
  pub fn refresh(&mut self, roster: &TeamData, today: NaiveDate) -> &[DayCell] {
    self.cells = compute_calendar(roster, &self.query, today);
    &self.cells
  }
}

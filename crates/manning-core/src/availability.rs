//! Availability index: who can support which application on a given day.
//!
//! Everything here is a pure read over a [`TeamData`] snapshot. A date is "at
//! risk" for an application when every team developer holding that
//! application skill is on vacation; a team with nobody holding the skill is
//! never at risk for it.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Developer, TeamData};

// ─── Selection ───────────────────────────────────────────────────────────────

/// Which applications a risk query covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationSelection {
  /// Every application held by someone on the team.
  All,
  One(String),
}

impl ApplicationSelection {
  /// The wire form of [`ApplicationSelection::All`].
  pub const ALL: &'static str = "*";
}

impl From<String> for ApplicationSelection {
  fn from(raw: String) -> Self {
    if raw == Self::ALL { Self::All } else { Self::One(raw) }
  }
}

impl From<ApplicationSelection> for String {
  fn from(selection: ApplicationSelection) -> Self { selection.to_string() }
}

impl FromStr for ApplicationSelection {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(s.to_owned().into()) }
}

impl fmt::Display for ApplicationSelection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str(Self::ALL),
      Self::One(app) => f.write_str(app),
    }
  }
}

// ─── Per-developer checks ────────────────────────────────────────────────────

/// True iff the developer rates `application` strictly above zero.
pub fn has_application_skill(developer: &Developer, application: &str) -> bool {
  developer
    .app_skills
    .get(application)
    .is_some_and(|rating| *rating > 0)
}

/// True iff any vacation entry covers `date`. Weekends are not excluded.
pub fn is_on_vacation(developer: &Developer, date: NaiveDate) -> bool {
  developer
    .availability
    .vacation_days
    .iter()
    .any(|entry| entry.covers(date))
}

/// Weekday dates covered by the developer's vacation entries, each entry
/// counted on its own.
pub fn working_vacation_days(developer: &Developer) -> usize {
  developer
    .availability
    .vacation_days
    .iter()
    .map(|entry| entry.working_days())
    .sum()
}

// ─── Team views ──────────────────────────────────────────────────────────────

/// Developers assigned to `team_id`: primary members first, then shared
/// resources lent to the team. Each developer appears once.
pub fn team_developers<'a>(roster: &'a TeamData, team_id: &str) -> Vec<&'a Developer> {
  let primary = roster
    .developers
    .iter()
    .filter(|d| d.team_id.as_deref() == Some(team_id));
  let shared = roster
    .developers
    .iter()
    .filter(|d| d.team_id.as_deref() != Some(team_id) && d.is_assigned_to(team_id));
  primary.chain(shared).collect()
}

/// Every application skill held by at least one of `developers`.
pub fn applications_of<'a>(developers: &[&'a Developer]) -> BTreeSet<&'a str> {
  developers
    .iter()
    .flat_map(|d| d.app_skills.iter())
    .filter(|(_, rating)| **rating > 0)
    .map(|(app, _)| app.as_str())
    .collect()
}

/// Every application skill held by someone on `team_id`.
pub fn team_applications<'a>(roster: &'a TeamData, team_id: &str) -> BTreeSet<&'a str> {
  applications_of(&team_developers(roster, team_id))
}

// ─── Risk ────────────────────────────────────────────────────────────────────

/// Coverage of one application on one date.
#[derive(Debug, Clone)]
pub struct ApplicationRisk<'a> {
  pub application: &'a str,
  /// Team developers holding the skill.
  pub skilled:     usize,
  /// The skilled developers who are on vacation.
  pub unavailable: Vec<&'a Developer>,
}

impl ApplicationRisk<'_> {
  pub fn is_at_risk(&self) -> bool {
    self.skilled > 0 && self.unavailable.len() == self.skilled
  }
}

pub fn application_risk<'a>(
  team: &[&'a Developer],
  application: &'a str,
  date: NaiveDate,
) -> ApplicationRisk<'a> {
  let skilled: Vec<&Developer> = team
    .iter()
    .copied()
    .filter(|d| has_application_skill(d, application))
    .collect();
  let unavailable = skilled
    .iter()
    .copied()
    .filter(|d| is_on_vacation(d, date))
    .collect();

  ApplicationRisk { application, skilled: skilled.len(), unavailable }
}

/// The risk verdict for one date under an [`ApplicationSelection`].
#[derive(Debug, Clone, Default)]
pub struct DayAssessment<'a> {
  pub is_at_risk:            bool,
  pub unavailable:           Vec<&'a Developer>,
  /// Applications with nobody available, in name order.
  pub affected_applications: Vec<String>,
}

/// Assess `date` for the team whose developers are `team`.
///
/// For a single application the unavailable list holds every skilled
/// developer on vacation, at risk or not. For [`ApplicationSelection::All`]
/// it is the union over the affected applications only.
pub fn assess_day<'a>(
  team: &[&'a Developer],
  selection: &'a ApplicationSelection,
  date: NaiveDate,
) -> DayAssessment<'a> {
  match selection {
    ApplicationSelection::One(app) => {
      let risk = application_risk(team, app, date);
      let is_at_risk = risk.is_at_risk();
      DayAssessment {
        is_at_risk,
        affected_applications: if is_at_risk { vec![app.clone()] } else { Vec::new() },
        unavailable: risk.unavailable,
      }
    }
    ApplicationSelection::All => {
      let mut assessment = DayAssessment::default();
      for app in applications_of(team) {
        let risk = application_risk(team, app, date);
        if !risk.is_at_risk() {
          continue;
        }
        assessment.affected_applications.push(app.to_owned());
        for dev in risk.unavailable {
          if !assessment.unavailable.iter().any(|d| d.id == dev.id) {
            assessment.unavailable.push(dev);
          }
        }
      }
      assessment.is_at_risk = !assessment.affected_applications.is_empty();
      assessment
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{Team, VacationDay};

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn dev(id: &str, team: Option<&str>, apps: &[(&str, u8)]) -> Developer {
    let mut d = Developer::new(id, id.to_uppercase());
    d.team_id = team.map(str::to_owned);
    d.app_skills = apps.iter().map(|(a, r)| ((*a).to_owned(), *r)).collect();
    d
  }

  fn team(id: &str) -> Team {
    Team {
      id:               id.into(),
      name:             id.to_uppercase(),
      manager_id:       None,
      developers:       Vec::new(),
      shared_resources: Vec::new(),
      description:      String::new(),
    }
  }

  fn roster(devs: Vec<Developer>) -> TeamData {
    let mut data = TeamData::empty(day(2024, 6, 1));
    data.teams = vec![team("t1"), team("t2")];
    data.developers = devs;
    data
  }

  #[test]
  fn zero_rating_is_not_a_skill() {
    let d = dev("a", None, &[("Ledger", 0), ("Billing", 3)]);
    assert!(!has_application_skill(&d, "Ledger"));
    assert!(has_application_skill(&d, "Billing"));
    assert!(!has_application_skill(&d, "Payroll"));
  }

  #[test]
  fn vacation_check_includes_weekends() {
    let mut d = dev("a", None, &[]);
    // Sat 2024-06-08 .. Sun 2024-06-09
    d.availability.vacation_days =
      vec![VacationDay::range(day(2024, 6, 8), day(2024, 6, 9), "weekend")];
    assert!(is_on_vacation(&d, day(2024, 6, 8)));
    assert!(is_on_vacation(&d, day(2024, 6, 9)));
    assert!(!is_on_vacation(&d, day(2024, 6, 10)));
    assert_eq!(working_vacation_days(&d), 0);
  }

  #[test]
  fn overlapping_entries_count_separately_in_working_days() {
    let mut d = dev("a", None, &[]);
    d.availability.vacation_days = vec![
      VacationDay::range(day(2024, 6, 10), day(2024, 6, 14), "week"),
      VacationDay::single(day(2024, 6, 12), "doubled"),
    ];
    assert_eq!(working_vacation_days(&d), 6);
  }

  #[test]
  fn team_developers_include_shared_once() {
    let mut shared = dev("s", None, &[]);
    shared.is_shared_resource = true;
    shared.assigned_teams = vec!["t1".into(), "t2".into()];

    let mut both = dev("b", Some("t1"), &[]);
    both.is_shared_resource = true;
    both.assigned_teams = vec!["t1".into()];

    let data = roster(vec![shared, dev("p", Some("t1"), &[]), both, dev("o", Some("t2"), &[])]);
    let ids: Vec<&str> = team_developers(&data, "t1").into_iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["p", "b", "s"]);

    let ids: Vec<&str> = team_developers(&data, "t2").into_iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["o", "s"]);
  }

  #[test]
  fn team_applications_ignore_zero_ratings_and_other_teams() {
    let data = roster(vec![
      dev("a", Some("t1"), &[("Ledger", 4), ("Billing", 0)]),
      dev("b", Some("t1"), &[("Payroll", 2)]),
      dev("c", Some("t2"), &[("Billing", 9)]),
    ]);
    let apps: Vec<&str> = team_applications(&data, "t1").into_iter().collect();
    assert_eq!(apps, ["Ledger", "Payroll"]);
  }

  #[test]
  fn nobody_skilled_is_never_at_risk() {
    let mut a = dev("a", Some("t1"), &[("Ledger", 5)]);
    a.availability.vacation_days = vec![VacationDay::single(day(2024, 6, 11), "")];
    let data = roster(vec![a]);
    let team = team_developers(&data, "t1");

    let risk = application_risk(&team, "Billing", day(2024, 6, 11));
    assert_eq!(risk.skilled, 0);
    assert!(!risk.is_at_risk());
  }

  #[test]
  fn all_skilled_away_is_at_risk() {
    let mut a = dev("a", Some("t1"), &[("Ledger", 5)]);
    a.availability.vacation_days = vec![VacationDay::single(day(2024, 6, 11), "")];
    let mut b = dev("b", Some("t1"), &[("Ledger", 7)]);
    b.availability.vacation_days =
      vec![VacationDay::range(day(2024, 6, 10), day(2024, 6, 12), "")];
    let data = roster(vec![a, b]);
    let team = team_developers(&data, "t1");

    assert!(application_risk(&team, "Ledger", day(2024, 6, 11)).is_at_risk());
    assert!(!application_risk(&team, "Ledger", day(2024, 6, 10)).is_at_risk());
  }

  #[test]
  fn single_application_reports_unavailable_even_when_covered() {
    let mut a = dev("a", Some("t1"), &[("Ledger", 5)]);
    a.availability.vacation_days =
      vec![VacationDay::range(day(2024, 6, 10), day(2024, 6, 12), "")];
    let data = roster(vec![a, dev("b", Some("t1"), &[("Ledger", 5)])]);
    let team = team_developers(&data, "t1");
    let selection = ApplicationSelection::One("Ledger".into());

    let verdict = assess_day(&team, &selection, day(2024, 6, 11));
    assert!(!verdict.is_at_risk);
    assert!(verdict.affected_applications.is_empty());
    assert_eq!(verdict.unavailable.len(), 1);
    assert_eq!(verdict.unavailable[0].id, "a");
  }

  #[test]
  fn all_applications_union_only_affected() {
    // a: Ledger + Billing, b: Billing, c: Payroll.
    let mut a = dev("a", Some("t1"), &[("Ledger", 5), ("Billing", 5)]);
    a.availability.vacation_days = vec![VacationDay::single(day(2024, 6, 11), "")];
    let b = dev("b", Some("t1"), &[("Billing", 5)]);
    let mut c = dev("c", Some("t1"), &[("Payroll", 5)]);
    c.availability.vacation_days = vec![VacationDay::single(day(2024, 6, 11), "")];
    let data = roster(vec![a, b, c]);
    let team = team_developers(&data, "t1");

    let verdict = assess_day(&team, &ApplicationSelection::All, day(2024, 6, 11));
    assert!(verdict.is_at_risk);
    assert_eq!(verdict.affected_applications, ["Ledger", "Payroll"]);
    let ids: Vec<&str> = verdict.unavailable.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["a", "c"]);

    let calm = assess_day(&team, &ApplicationSelection::All, day(2024, 6, 12));
    assert!(!calm.is_at_risk);
    assert!(calm.unavailable.is_empty());
  }

  #[test]
  fn selection_wire_form() {
    assert_eq!("*".parse::<ApplicationSelection>().unwrap(), ApplicationSelection::All);
    assert_eq!(
      "Ledger".parse::<ApplicationSelection>().unwrap(),
      ApplicationSelection::One("Ledger".into())
    );
    assert_eq!(serde_json::to_value(ApplicationSelection::All).unwrap(), "*");
  }
}

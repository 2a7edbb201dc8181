//! Dashboard aggregates over the roster.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  availability::working_vacation_days,
  model::{AvailabilityStatus, Developer, SkillKind, TeamData},
};

/// Headline counts for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
  pub managers:                 usize,
  pub teams:                    usize,
  pub teams_with_managers:      usize,
  pub developers:               usize,
  pub primary_developers:       usize,
  pub shared_resources:         usize,
  pub active_developers:        usize,
  /// Developers with neither a primary team nor any lending assignment.
  pub unassigned_developers:    usize,
  pub developers_with_vacation: usize,
  /// Vacation entries across all developers, not days.
  pub vacation_entries:         usize,
  pub working_vacation_days:    usize,
  pub tech_skills:              usize,
  pub app_skills:               usize,
  pub last_updated:             NaiveDate,
}

impl RosterSummary {
  pub fn of(roster: &TeamData) -> Self {
    let devs = &roster.developers;
    let count = |pred: fn(&Developer) -> bool| devs.iter().filter(|d| pred(d)).count();

    Self {
      managers:                 roster.managers.len(),
      teams:                    roster.teams.len(),
      teams_with_managers:      roster.teams.iter().filter(|t| t.manager_id.is_some()).count(),
      developers:               devs.len(),
      primary_developers:       count(|d| !d.is_shared_resource),
      shared_resources:         count(|d| d.is_shared_resource),
      active_developers:        count(|d| d.availability.status == AvailabilityStatus::Active),
      unassigned_developers:    count(|d| d.team_id.is_none() && d.assigned_teams.is_empty()),
      developers_with_vacation: count(|d| !d.availability.vacation_days.is_empty()),
      vacation_entries:         devs.iter().map(|d| d.availability.vacation_days.len()).sum(),
      working_vacation_days:    devs.iter().map(working_vacation_days).sum(),
      tech_skills:              roster.skill_definitions.tech_skills.len(),
      app_skills:               roster.skill_definitions.app_skills.len(),
      last_updated:             roster.organization.last_updated,
    }
  }
}

/// How many developers rate one defined skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillUsage {
  pub kind:       SkillKind,
  pub name:       String,
  pub developers: usize,
}

/// Usage of every defined skill of `kind`, in name order.
pub fn skill_usage(roster: &TeamData, kind: SkillKind) -> Vec<SkillUsage> {
  roster
    .skill_definitions
    .of_kind(kind)
    .keys()
    .map(|name| SkillUsage {
      kind,
      name: name.clone(),
      developers: roster.skill_usage(kind, name),
    })
    .collect()
}

/// Human-readable byte size: "512 B", "1.5 KB", "2.0 MB".
pub fn format_data_size(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = KB * 1024;
  match bytes {
    b if b < KB => format!("{b} B"),
    b if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
    b => format!("{:.1} MB", b as f64 / MB as f64),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    management::{DeveloperInput, SkillInput, TeamInput},
    model::VacationDay,
  };

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn summary_counts() {
    let mut data = TeamData::empty(day(2024, 6, 1));
    let team = data.add_team(TeamInput { name: "T".into(), ..Default::default() }).unwrap();
    let a = data
      .add_developer(DeveloperInput { team_id: Some(team.id.clone()), ..Default::default() })
      .unwrap();
    data
      .add_developer(DeveloperInput {
        is_shared_resource: true,
        assigned_teams: vec![team.id.clone()],
        ..Default::default()
      })
      .unwrap();
    data.add_developer(DeveloperInput::default()).unwrap();
    // Fri..Mon and a Saturday
    data.add_vacation(&a.id, VacationDay::range(day(2024, 6, 7), day(2024, 6, 10), "")).unwrap();
    data.add_vacation(&a.id, VacationDay::single(day(2024, 6, 15), "")).unwrap();
    data.developers[2].availability.status = AvailabilityStatus::Inactive;

    let s = RosterSummary::of(&data);
    assert_eq!(s.teams, 1);
    assert_eq!(s.teams_with_managers, 0);
    assert_eq!(s.developers, 3);
    assert_eq!(s.primary_developers, 2);
    assert_eq!(s.shared_resources, 1);
    assert_eq!(s.active_developers, 2);
    assert_eq!(s.unassigned_developers, 1);
    assert_eq!(s.developers_with_vacation, 1);
    assert_eq!(s.vacation_entries, 2);
    assert_eq!(s.working_vacation_days, 2);
    assert_eq!(s.last_updated, day(2024, 6, 1));
  }

  #[test]
  fn usage_per_skill() {
    let mut data = TeamData::empty(day(2024, 6, 1));
    for name in ["Java", "Go"] {
      data
        .upsert_skill(SkillKind::Tech, None, SkillInput { name: name.into(), ..Default::default() })
        .unwrap();
    }
    let dev = data.add_developer(DeveloperInput::default()).unwrap();
    data.set_skill_rating(&dev.id, SkillKind::Tech, "Java", 0).unwrap();

    let usage = skill_usage(&data, SkillKind::Tech);
    let pairs: Vec<(&str, usize)> = usage.iter().map(|u| (u.name.as_str(), u.developers)).collect();
    assert_eq!(pairs, [("Go", 0), ("Java", 1)]);
  }

  #[test]
  fn data_size_units() {
    assert_eq!(format_data_size(512), "512 B");
    assert_eq!(format_data_size(1536), "1.5 KB");
    assert_eq!(format_data_size(2 * 1024 * 1024), "2.0 MB");
  }
}

//! Per-team application coverage: how many developers can support each
//! application the team knows.

use serde::Serialize;

use crate::{
  availability::{applications_of, has_application_skill, team_developers},
  calendar::DeveloperRef,
  model::TeamData,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationCoverage {
  pub application: String,
  pub developers:  Vec<DeveloperRef>,
  pub count:       usize,
}

/// Every application held by someone on `team_id`, with the developers who
/// hold it. Sorted by descending count, then by application name.
pub fn team_applications_with_coverage(
  roster: &TeamData,
  team_id: &str,
) -> Vec<ApplicationCoverage> {
  let team = team_developers(roster, team_id);
  let mut coverage: Vec<ApplicationCoverage> = applications_of(&team)
    .into_iter()
    .map(|app| {
      let developers: Vec<DeveloperRef> = team
        .iter()
        .copied()
        .filter(|d| has_application_skill(d, app))
        .map(DeveloperRef::from)
        .collect();
      ApplicationCoverage {
        application: app.to_owned(),
        count: developers.len(),
        developers,
      }
    })
    .collect();

  coverage.sort_by(|a, b| {
    b.count.cmp(&a.count).then_with(|| a.application.cmp(&b.application))
  });
  coverage
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::model::Developer;

  fn dev(id: &str, team: &str, apps: &[(&str, u8)]) -> Developer {
    let mut d = Developer::new(id, id.to_uppercase());
    d.team_id = Some(team.into());
    d.app_skills = apps.iter().map(|(a, r)| ((*a).to_owned(), *r)).collect();
    d
  }

  #[test]
  fn sorted_by_count_then_name() {
    let mut data = TeamData::empty(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    data.developers = vec![
      dev("a", "t", &[("Payroll", 3), ("Ledger", 5), ("Zeta", 1)]),
      dev("b", "t", &[("Ledger", 7), ("Billing", 2)]),
      dev("c", "t", &[("Zeta", 4), ("Ghost", 0)]),
      dev("x", "other", &[("Payroll", 9)]),
    ];

    let coverage = team_applications_with_coverage(&data, "t");
    let order: Vec<(&str, usize)> =
      coverage.iter().map(|c| (c.application.as_str(), c.count)).collect();
    assert_eq!(order, [("Ledger", 2), ("Zeta", 2), ("Billing", 1), ("Payroll", 1)]);

    let ledger: Vec<&str> = coverage[0].developers.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ledger, ["a", "b"]);
  }

  #[test]
  fn includes_shared_resources() {
    let mut data = TeamData::empty(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let mut lent = dev("s", "other", &[("Ledger", 5)]);
    lent.is_shared_resource = true;
    lent.assigned_teams = vec!["t".into()];
    data.developers = vec![lent];

    let coverage = team_applications_with_coverage(&data, "t");
    assert_eq!(coverage.len(), 1);
    assert_eq!(coverage[0].developers[0].name, "S");
    assert!(team_applications_with_coverage(&data, "nobody").is_empty());
  }
}

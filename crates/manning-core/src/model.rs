//! The roster document: the whole object graph persisted as one JSON value.
//!
//! Field names serialise in camelCase so a document exported by the browser
//! front-end can be imported unchanged, and vice versa.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::{Result, management::MAX_RATING};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Whether a developer is currently part of the active workforce.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AvailabilityStatus {
  #[default]
  Active,
  Inactive,
}

/// The two families of skills tracked per developer.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SkillKind {
  /// Technical skills, e.g. "Java" or "CICD".
  Tech,
  /// Application knowledge; drives support-availability risk.
  App,
}

// ─── Vacations ───────────────────────────────────────────────────────────────

/// The dates a vacation entry covers.
///
/// Dates that are missing or unparseable in the stored document deserialise as
/// `None`; such an entry covers nothing and is skipped by every date check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VacationSpan {
  Single {
    #[serde(
      default,
      deserialize_with = "lenient_date",
      skip_serializing_if = "Option::is_none"
    )]
    date: Option<NaiveDate>,
  },
  /// Inclusive on both ends.
  Range {
    #[serde(
      rename = "startDate",
      default,
      deserialize_with = "lenient_date",
      skip_serializing_if = "Option::is_none"
    )]
    start_date: Option<NaiveDate>,
    #[serde(
      rename = "endDate",
      default,
      deserialize_with = "lenient_date",
      skip_serializing_if = "Option::is_none"
    )]
    end_date:   Option<NaiveDate>,
  },
}

/// One entry of a developer's vacation calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationDay {
  #[serde(flatten)]
  pub span:        VacationSpan,
  #[serde(default)]
  pub description: String,
}

impl VacationDay {
  pub fn single(date: NaiveDate, description: impl Into<String>) -> Self {
    Self {
      span:        VacationSpan::Single { date: Some(date) },
      description: description.into(),
    }
  }

  pub fn range(
    start: NaiveDate,
    end: NaiveDate,
    description: impl Into<String>,
  ) -> Self {
    Self {
      span:        VacationSpan::Range {
        start_date: Some(start),
        end_date:   Some(end),
      },
      description: description.into(),
    }
  }

  /// The inclusive `(first, last)` dates covered, or `None` when the entry is
  /// malformed.
  pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
    match self.span {
      VacationSpan::Single { date } => date.map(|d| (d, d)),
      VacationSpan::Range { start_date, end_date } => start_date.zip(end_date),
    }
  }

  /// Whether `date` falls on this entry. Weekends are not excluded.
  pub fn covers(&self, date: NaiveDate) -> bool {
    self
      .bounds()
      .is_some_and(|(first, last)| first <= date && date <= last)
  }

  /// Every covered date in ascending order. Empty for malformed or inverted
  /// entries.
  pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
    self
      .bounds()
      .filter(|(first, last)| first <= last)
      .into_iter()
      .flat_map(|(first, last)| {
        first.iter_days().take_while(move |d| *d <= last)
      })
  }

  /// Number of covered Monday–Friday dates.
  pub fn working_days(&self) -> usize {
    self.dates().filter(|d| !is_weekend(*d)).count()
  }
}

pub fn is_weekend(date: NaiveDate) -> bool {
  matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Availability of a developer: a status flag and their vacation calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
  #[serde(default)]
  pub status:        AvailabilityStatus,
  #[serde(default)]
  pub vacation_days: Vec<VacationDay>,
}

// ─── Entities ────────────────────────────────────────────────────────────────

/// Skill name → rating on the 0–10 scale. A missing entry means the skill is
/// not possessed.
pub type SkillRatings = BTreeMap<String, u8>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
  pub id:          String,
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub role:        String,
  /// Ids of the teams this manager leads.
  #[serde(default)]
  pub teams:       Vec<String>,
  #[serde(default)]
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
  pub id:               String,
  #[serde(default)]
  pub name:             String,
  #[serde(default, deserialize_with = "empty_as_none")]
  pub manager_id:       Option<String>,
  #[serde(default)]
  pub developers:       Vec<String>,
  #[serde(default)]
  pub shared_resources: Vec<String>,
  #[serde(default)]
  pub description:      String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
  pub id:                 String,
  #[serde(default)]
  pub name:               String,
  /// Primary team.
  #[serde(default, deserialize_with = "empty_as_none")]
  pub team_id:            Option<String>,
  #[serde(default)]
  pub is_shared_resource: bool,
  /// Teams a shared resource is lent to; ignored unless `is_shared_resource`.
  #[serde(default)]
  pub assigned_teams:     Vec<String>,
  #[serde(default, deserialize_with = "lenient_ratings")]
  pub tech_skills:        SkillRatings,
  #[serde(default, deserialize_with = "lenient_ratings")]
  pub app_skills:         SkillRatings,
  #[serde(default)]
  pub availability:       Availability,
}

impl Developer {
  /// A developer with no team, no skills and no vacations.
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      id:                 id.into(),
      name:               name.into(),
      team_id:            None,
      is_shared_resource: false,
      assigned_teams:     Vec::new(),
      tech_skills:        SkillRatings::new(),
      app_skills:         SkillRatings::new(),
      availability:       Availability::default(),
    }
  }

  /// Whether the developer counts as a member of `team_id`, either as its
  /// primary team or as a shared resource lent to it.
  pub fn is_assigned_to(&self, team_id: &str) -> bool {
    self.team_id.as_deref() == Some(team_id)
      || (self.is_shared_resource
        && self.assigned_teams.iter().any(|t| t == team_id))
  }

  pub fn skills(&self, kind: SkillKind) -> &SkillRatings {
    match kind {
      SkillKind::Tech => &self.tech_skills,
      SkillKind::App => &self.app_skills,
    }
  }

  pub fn skills_mut(&mut self, kind: SkillKind) -> &mut SkillRatings {
    match kind {
      SkillKind::Tech => &mut self.tech_skills,
      SkillKind::App => &mut self.app_skills,
    }
  }
}

// ─── Skill definitions ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillDefinition {
  pub description: String,
  /// Free-text scale label, e.g. "1-10".
  pub scale:       String,
  pub category:    String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDefinitions {
  #[serde(default)]
  pub tech_skills: BTreeMap<String, SkillDefinition>,
  /// The recognised application names.
  #[serde(default)]
  pub app_skills:  BTreeMap<String, SkillDefinition>,
}

impl SkillDefinitions {
  pub fn of_kind(&self, kind: SkillKind) -> &BTreeMap<String, SkillDefinition> {
    match kind {
      SkillKind::Tech => &self.tech_skills,
      SkillKind::App => &self.app_skills,
    }
  }

  pub fn of_kind_mut(
    &mut self,
    kind: SkillKind,
  ) -> &mut BTreeMap<String, SkillDefinition> {
    match kind {
      SkillKind::Tech => &mut self.tech_skills,
      SkillKind::App => &mut self.app_skills,
    }
  }
}

// ─── Document envelope ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
  pub name:         String,
  pub version:      String,
  /// Falls back to the epoch when missing or unparseable.
  #[serde(deserialize_with = "lenient_day")]
  pub last_updated: NaiveDate,
}

impl Default for Organization {
  fn default() -> Self {
    Self {
      name:         "ProjectManning Organization".into(),
      version:      "1.0.0".into(),
      last_updated: NaiveDate::default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillScales {
  pub tech_skills_scale: String,
  pub app_skills_scale:  String,
}

impl Default for SkillScales {
  fn default() -> Self {
    Self { tech_skills_scale: "0-10".into(), app_skills_scale: "0-10".into() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
  pub skill_scales:              SkillScales,
  pub default_tech_skill_rating: u8,
  pub default_app_skill_rating:  u8,
  pub shared_resource_indicator: String,
  pub vacation_tracking:         bool,
}

impl Default for Metadata {
  fn default() -> Self {
    Self {
      skill_scales:              SkillScales::default(),
      default_tech_skill_rating: 7,
      default_app_skill_rating:  8,
      shared_resource_indicator: "isSharedResource".into(),
      vacation_tracking:         true,
    }
  }
}

/// The complete roster: every manager, team, developer and skill definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamData {
  pub organization:      Organization,
  pub managers:          Vec<Manager>,
  pub teams:             Vec<Team>,
  pub developers:        Vec<Developer>,
  pub skill_definitions: SkillDefinitions,
  #[serde(default)]
  pub metadata:          Metadata,
}

impl TeamData {
  /// An empty roster stamped with `today`.
  pub fn empty(today: NaiveDate) -> Self {
    Self {
      organization:      Organization { last_updated: today, ..Organization::default() },
      managers:          Vec::new(),
      teams:             Vec::new(),
      developers:        Vec::new(),
      skill_definitions: SkillDefinitions::default(),
      metadata:          Metadata::default(),
    }
  }

  /// Parse a document.
  ///
  /// The top-level sections other than `metadata` must be present. Inside
  /// them decoding is lenient: missing fields default, unparseable dates are
  /// dropped and fractional ratings are rounded onto the scale.
  pub fn from_json(raw: &str) -> Result<Self> { Ok(serde_json::from_str(raw)?) }

  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn to_pretty_json(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn manager(&self, id: &str) -> Option<&Manager> {
    self.managers.iter().find(|m| m.id == id)
  }

  pub fn team(&self, id: &str) -> Option<&Team> {
    self.teams.iter().find(|t| t.id == id)
  }

  pub fn developer(&self, id: &str) -> Option<&Developer> {
    self.developers.iter().find(|d| d.id == id)
  }

  /// The recognised application-skill names, in name order.
  pub fn application_names(&self) -> impl Iterator<Item = &str> {
    self.skill_definitions.app_skills.keys().map(String::as_str)
  }

  /// Record that the document changed on `today`.
  pub fn touch(&mut self, today: NaiveDate) {
    self.organization.last_updated = today;
  }
}

// ─── Lenient field decoding ──────────────────────────────────────────────────

/// Parse a stored calendar date. Accepts `YYYY-MM-DD` as well as a full
/// ISO 8601 timestamp, of which only the date part is kept.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  let day = raw.get(..10).unwrap_or(raw);
  NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Value::deserialize(deserializer)?;
  Ok(raw.as_str().and_then(parse_day))
}

fn lenient_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(lenient_date(deserializer)?.unwrap_or_default())
}

/// Blank strings stand for "none", as the front-end's select boxes submit.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// A stored rating rounded onto the 0-10 scale. Numeric strings count; `null`
/// and anything else non-numeric means the skill is not rated.
fn rating_of(raw: &Value) -> Option<u8> {
  let value = match raw {
    Value::Number(n) => n.as_f64()?,
    Value::String(s) => s.trim().parse().ok()?,
    _ => return None,
  };
  value
    .is_finite()
    .then(|| value.round().clamp(0.0, f64::from(MAX_RATING)) as u8)
}

/// Ratings left unset by the front-end are stored as `null`; treat them as
/// absent.
fn lenient_ratings<'de, D>(deserializer: D) -> Result<SkillRatings, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: BTreeMap<String, Value> = BTreeMap::deserialize(deserializer)?;
  Ok(
    raw
      .into_iter()
      .filter_map(|(name, rating)| rating_of(&rating).map(|r| (name, r)))
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn single_vacation_covers_only_its_date() {
    let v = VacationDay::single(day(2024, 6, 11), "dentist");
    assert!(v.covers(day(2024, 6, 11)));
    assert!(!v.covers(day(2024, 6, 10)));
    assert!(!v.covers(day(2024, 6, 12)));
  }

  #[test]
  fn range_vacation_is_inclusive() {
    let v = VacationDay::range(day(2024, 6, 10), day(2024, 6, 12), "trip");
    assert!(!v.covers(day(2024, 6, 9)));
    assert!(v.covers(day(2024, 6, 10)));
    assert!(v.covers(day(2024, 6, 11)));
    assert!(v.covers(day(2024, 6, 12)));
    assert!(!v.covers(day(2024, 6, 13)));
  }

  #[test]
  fn working_days_skip_weekends() {
    // Fri 2024-06-07 .. Mon 2024-06-10
    let v = VacationDay::range(day(2024, 6, 7), day(2024, 6, 10), "long weekend");
    assert_eq!(v.dates().count(), 4);
    assert_eq!(v.working_days(), 2);

    let saturday = VacationDay::single(day(2024, 6, 8), "");
    assert_eq!(saturday.working_days(), 0);
  }

  #[test]
  fn inverted_range_covers_nothing() {
    let v = VacationDay::range(day(2024, 6, 12), day(2024, 6, 10), "");
    assert_eq!(v.dates().count(), 0);
    assert!(!v.covers(day(2024, 6, 11)));
  }

  #[test]
  fn decodes_front_end_vacation_entries() {
    let raw = r#"[
      {"type":"single","date":"2024-06-11","description":"dentist"},
      {"type":"range","startDate":"2024-06-10","endDate":"2024-06-12","description":"trip"},
      {"type":"range","startDate":"","endDate":"","description":"unfinished"},
      {"type":"single","date":"2024-06-14T00:00:00.000Z","description":"iso"}
    ]"#;
    let entries: Vec<VacationDay> = serde_json::from_str(raw).unwrap();

    assert_eq!(entries[0], VacationDay::single(day(2024, 6, 11), "dentist"));
    assert_eq!(
      entries[1],
      VacationDay::range(day(2024, 6, 10), day(2024, 6, 12), "trip")
    );
    assert_eq!(entries[2].bounds(), None);
    assert!(!entries[2].covers(day(2024, 6, 11)));
    assert!(entries[3].covers(day(2024, 6, 14)));
  }

  #[test]
  fn vacation_serialises_in_front_end_shape() {
    let v = VacationDay::range(day(2024, 6, 10), day(2024, 6, 12), "trip");
    let json = serde_json::to_value(&v).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "type": "range",
        "startDate": "2024-06-10",
        "endDate": "2024-06-12",
        "description": "trip",
      })
    );
  }

  #[test]
  fn decodes_developer_with_null_ratings_and_empty_team() {
    let raw = r#"{
      "id": "dev-1",
      "name": "Ada",
      "teamId": "",
      "isSharedResource": true,
      "assignedTeams": ["team-1"],
      "techSkills": {"Java": 8, "Data": null},
      "appSkills": {"Ledger": 5},
      "availability": {"status": "inactive", "vacationDays": []}
    }"#;
    let dev: Developer = serde_json::from_str(raw).unwrap();

    assert_eq!(dev.team_id, None);
    assert!(dev.is_assigned_to("team-1"));
    assert_eq!(dev.tech_skills.len(), 1);
    assert_eq!(dev.app_skills.get("Ledger"), Some(&5));
    assert_eq!(dev.availability.status, AvailabilityStatus::Inactive);
  }

  #[test]
  fn assigned_teams_ignored_unless_shared() {
    let mut dev = Developer::new("dev-1", "Ada");
    dev.assigned_teams = vec!["team-2".into()];
    assert!(!dev.is_assigned_to("team-2"));

    dev.is_shared_resource = true;
    assert!(dev.is_assigned_to("team-2"));
  }

  #[test]
  fn empty_document_round_trips() {
    let data = TeamData::empty(day(2024, 6, 1));
    let parsed = TeamData::from_json(&data.to_json().unwrap()).unwrap();
    assert_eq!(parsed, data);
    assert_eq!(parsed.metadata.default_app_skill_rating, 8);
  }

  #[test]
  fn incomplete_document_is_rejected() {
    assert!(TeamData::from_json(r#"{"managers": []}"#).is_err());
    assert!(TeamData::from_json("not json").is_err());
  }

  #[test]
  fn decodes_loosely_typed_document() {
    let raw = r#"{
      "organization": {"name": "Acme", "lastUpdated": "2024-06-03T09:15:00.000Z"},
      "managers": [{"id": "mgr-1", "name": "Ann"}],
      "teams": [{"id": "team-1", "name": "Core", "managerId": ""}],
      "developers": [{
        "id": "dev-1",
        "teamId": "team-1",
        "appSkills": {"Ledger": 7.5, "Payroll": "4", "Billing": 14, "Legacy": "n/a"}
      }],
      "skillDefinitions": {
        "appSkills": {"Ledger": {"description": "General ledger"}}
      },
      "metadata": {"vacationTracking": true}
    }"#;
    let data = TeamData::from_json(raw).unwrap();

    assert_eq!(data.organization.name, "Acme");
    assert_eq!(data.organization.version, "1.0.0");
    assert_eq!(data.organization.last_updated, day(2024, 6, 3));
    assert_eq!(data.teams[0].manager_id, None);

    let ratings = &data.developers[0].app_skills;
    assert_eq!(ratings.get("Ledger"), Some(&8));
    assert_eq!(ratings.get("Payroll"), Some(&4));
    assert_eq!(ratings.get("Billing"), Some(&MAX_RATING));
    assert_eq!(ratings.get("Legacy"), None);

    assert_eq!(data.skill_definitions.app_skills["Ledger"].category, "");
    assert_eq!(data.metadata.default_tech_skill_rating, 7);
  }

  #[test]
  fn unparseable_last_updated_falls_back_to_epoch() {
    let raw = r#"{
      "organization": {"lastUpdated": 42},
      "managers": [], "teams": [], "developers": [], "skillDefinitions": {}
    }"#;
    let data = TeamData::from_json(raw).unwrap();
    assert_eq!(data.organization.last_updated, NaiveDate::default());
  }

  #[test]
  fn skill_kind_string_forms() {
    assert_eq!(SkillKind::App.to_string(), "app");
    assert_eq!("tech".parse::<SkillKind>().unwrap(), SkillKind::Tech);
    assert!("other".parse::<SkillKind>().is_err());
  }
}

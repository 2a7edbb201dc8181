//! Roster mutations: CRUD over managers, teams, developers, skills and
//! vacations.
//!
//! Every operation keeps the redundant links of the document in step: a
//! manager's `teams` mirrors the teams' `manager_id`, and a team's
//! `developers`/`shared_resources` mirror the developers' assignments.
//! Deleting an entity scrubs every reference to it.

use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  model::{
    Availability, Developer, Manager, SkillDefinition, SkillKind, SkillRatings, Team,
    TeamData, VacationDay, empty_as_none,
  },
};

/// Highest rating on the skill scale.
pub const MAX_RATING: u8 = 10;

/// A fresh id of the form `{prefix}-{32 hex digits}`.
pub fn generate_id(prefix: &str) -> String {
  format!("{prefix}-{}", Uuid::new_v4().simple())
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Editable fields of a manager.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerInput {
  pub name:        String,
  pub role:        String,
  pub teams:       Vec<String>,
  pub description: String,
}

/// Editable fields of a team.
///
/// The member lists are applied as developer assignments: listed developers
/// move onto the team and unlisted former members leave it. `None` leaves
/// the current members as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamInput {
  pub name:             String,
  #[serde(deserialize_with = "empty_as_none")]
  pub manager_id:       Option<String>,
  pub developers:       Option<Vec<String>>,
  pub shared_resources: Option<Vec<String>>,
  pub description:      String,
}

/// Editable fields of a developer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeveloperInput {
  pub name:               String,
  #[serde(deserialize_with = "empty_as_none")]
  pub team_id:            Option<String>,
  pub is_shared_resource: bool,
  pub assigned_teams:     Vec<String>,
  pub tech_skills:        SkillRatings,
  pub app_skills:         SkillRatings,
  /// Ignored on create. On update, `None` keeps the current record.
  pub availability:       Option<Availability>,
}

impl DeveloperInput {
  /// The teams the developer is lent to, honouring the shared flag.
  fn effective_assigned_teams(&self) -> &[String] {
    if self.is_shared_resource { &self.assigned_teams } else { &[] }
  }
}

/// A skill definition together with its name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillInput {
  pub name:        String,
  pub description: String,
  pub scale:       String,
  pub category:    String,
}

// ─── List helpers ────────────────────────────────────────────────────────────

fn link(list: &mut Vec<String>, id: &str) {
  if !list.iter().any(|x| x == id) {
    list.push(id.to_owned());
  }
}

fn unlink(list: &mut Vec<String>, id: &str) { list.retain(|x| x != id); }

fn dedup(ids: &[String]) -> Vec<String> {
  let mut out = Vec::with_capacity(ids.len());
  for id in ids {
    link(&mut out, id);
  }
  out
}

fn check_ratings(ratings: &SkillRatings) -> Result<()> {
  match ratings.values().find(|r| **r > MAX_RATING) {
    Some(r) => Err(Error::RatingOutOfScale(*r)),
    None => Ok(()),
  }
}

fn check_vacation(vacation: &VacationDay) -> Result<()> {
  match vacation.bounds() {
    Some((start, end)) if end < start => Err(Error::InvertedVacationRange { start, end }),
    _ => Ok(()),
  }
}

impl TeamData {
  fn manager_mut(&mut self, id: &str) -> Result<&mut Manager> {
    self
      .managers
      .iter_mut()
      .find(|m| m.id == id)
      .ok_or_else(|| Error::ManagerNotFound(id.to_owned()))
  }

  fn team_mut(&mut self, id: &str) -> Result<&mut Team> {
    self
      .teams
      .iter_mut()
      .find(|t| t.id == id)
      .ok_or_else(|| Error::TeamNotFound(id.to_owned()))
  }

  fn developer_mut(&mut self, id: &str) -> Result<&mut Developer> {
    self
      .developers
      .iter_mut()
      .find(|d| d.id == id)
      .ok_or_else(|| Error::DeveloperNotFound(id.to_owned()))
  }

  fn require_teams<'a>(&self, ids: impl IntoIterator<Item = &'a String>) -> Result<()> {
    for id in ids {
      if self.team(id).is_none() {
        return Err(Error::TeamNotFound(id.clone()));
      }
    }
    Ok(())
  }

  fn require_developers<'a>(&self, ids: impl IntoIterator<Item = &'a String>) -> Result<()> {
    for id in ids {
      if self.developer(id).is_none() {
        return Err(Error::DeveloperNotFound(id.clone()));
      }
    }
    Ok(())
  }

  /// Make `members` the primary members of `team_id`. Each listed developer
  /// leaves their previous team; former members not listed become unassigned.
  fn set_primary_members(&mut self, team_id: &str, members: &[String]) {
    let mut moved = Vec::new();
    for developer in &mut self.developers {
      let here = developer.team_id.as_deref() == Some(team_id);
      if members.contains(&developer.id) {
        if !here {
          if let Some(old) = developer.team_id.replace(team_id.to_owned()) {
            moved.push((developer.id.clone(), old));
          }
        }
      } else if here {
        developer.team_id = None;
      }
    }
    for (developer_id, old) in moved {
      if let Some(team) = self.teams.iter_mut().find(|t| t.id == old) {
        unlink(&mut team.developers, &developer_id);
      }
    }
    if let Some(team) = self.teams.iter_mut().find(|t| t.id == team_id) {
      team.developers = members.to_vec();
    }
  }

  /// Make `members` the shared resources lent to `team_id`. Listed developers
  /// become shared resources; unlisted ones lose the assignment.
  fn set_shared_members(&mut self, team_id: &str, members: &[String]) {
    for developer in &mut self.developers {
      if members.contains(&developer.id) {
        developer.is_shared_resource = true;
        link(&mut developer.assigned_teams, team_id);
      } else {
        unlink(&mut developer.assigned_teams, team_id);
      }
    }
    if let Some(team) = self.teams.iter_mut().find(|t| t.id == team_id) {
      team.shared_resources = members.to_vec();
    }
  }

  fn check_team_input(&self, input: &TeamInput) -> Result<()> {
    if let Some(manager_id) = &input.manager_id {
      self.manager(manager_id).ok_or_else(|| Error::ManagerNotFound(manager_id.clone()))?;
    }
    let listed = input.developers.iter().chain(&input.shared_resources).flatten();
    self.require_developers(listed)
  }

  fn apply_team_members(&mut self, team_id: &str, input: &TeamInput) {
    if let Some(developers) = &input.developers {
      self.set_primary_members(team_id, &dedup(developers));
    }
    if let Some(shared) = &input.shared_resources {
      self.set_shared_members(team_id, &dedup(shared));
    }
  }

  /// Point `team_id` at `manager_id`, detaching it from whichever manager led
  /// it before.
  fn assign_team_manager(&mut self, team_id: &str, manager_id: Option<&str>) {
    for manager in &mut self.managers {
      if Some(manager.id.as_str()) != manager_id {
        unlink(&mut manager.teams, team_id);
      }
    }
    if let Some(manager_id) = manager_id {
      if let Some(manager) = self.managers.iter_mut().find(|m| m.id == manager_id) {
        link(&mut manager.teams, team_id);
      }
    }
    if let Some(team) = self.teams.iter_mut().find(|t| t.id == team_id) {
      team.manager_id = manager_id.map(str::to_owned);
    }
  }

  // ─── Managers ──────────────────────────────────────────────────────────────

  pub fn add_manager(&mut self, input: ManagerInput) -> Result<Manager> {
    self.require_teams(&input.teams)?;

    let manager = Manager {
      id:          generate_id("mgr"),
      name:        input.name,
      role:        input.role,
      teams:       Vec::new(),
      description: input.description,
    };
    self.managers.push(manager.clone());
    for team_id in dedup(&input.teams) {
      self.assign_team_manager(&team_id, Some(&manager.id));
    }
    self.manager(&manager.id).cloned().ok_or(Error::ManagerNotFound(manager.id))
  }

  pub fn update_manager(&mut self, id: &str, input: ManagerInput) -> Result<Manager> {
    self.require_teams(&input.teams)?;
    let previous = self.manager_mut(id)?.teams.clone();
    let next = dedup(&input.teams);

    for team_id in previous.iter().filter(|t| !next.contains(t)) {
      self.assign_team_manager(team_id, None);
    }
    for team_id in &next {
      self.assign_team_manager(team_id, Some(id));
    }

    let manager = self.manager_mut(id)?;
    manager.name = input.name;
    manager.role = input.role;
    manager.description = input.description;
    manager.teams = next;
    Ok(manager.clone())
  }

  /// Remove a manager; the teams they led are left without one.
  pub fn delete_manager(&mut self, id: &str) -> Result<Manager> {
    let index = self
      .managers
      .iter()
      .position(|m| m.id == id)
      .ok_or_else(|| Error::ManagerNotFound(id.to_owned()))?;
    let removed = self.managers.remove(index);
    for team in &mut self.teams {
      if team.manager_id.as_deref() == Some(id) {
        team.manager_id = None;
      }
    }
    Ok(removed)
  }

  // ─── Teams ─────────────────────────────────────────────────────────────────

  pub fn add_team(&mut self, input: TeamInput) -> Result<Team> {
    self.check_team_input(&input)?;

    let team = Team {
      id:               generate_id("team"),
      name:             input.name.clone(),
      manager_id:       None,
      developers:       Vec::new(),
      shared_resources: Vec::new(),
      description:      input.description.clone(),
    };
    let id = team.id.clone();
    self.teams.push(team);
    self.assign_team_manager(&id, input.manager_id.as_deref());
    self.apply_team_members(&id, &input);
    self.team(&id).cloned().ok_or(Error::TeamNotFound(id))
  }

  pub fn update_team(&mut self, id: &str, input: TeamInput) -> Result<Team> {
    self.check_team_input(&input)?;

    let team = self.team_mut(id)?;
    team.name = input.name.clone();
    team.description = input.description.clone();
    self.assign_team_manager(id, input.manager_id.as_deref());
    self.apply_team_members(id, &input);
    self.team(id).cloned().ok_or_else(|| Error::TeamNotFound(id.to_owned()))
  }

  /// Remove a team. Its primary members become unassigned, shared resources
  /// lose the assignment and its manager no longer lists it.
  pub fn delete_team(&mut self, id: &str) -> Result<Team> {
    let index = self
      .teams
      .iter()
      .position(|t| t.id == id)
      .ok_or_else(|| Error::TeamNotFound(id.to_owned()))?;
    let removed = self.teams.remove(index);

    for developer in &mut self.developers {
      if developer.team_id.as_deref() == Some(id) {
        developer.team_id = None;
      }
      unlink(&mut developer.assigned_teams, id);
    }
    for manager in &mut self.managers {
      unlink(&mut manager.teams, id);
    }
    Ok(removed)
  }

  // ─── Developers ────────────────────────────────────────────────────────────

  fn check_developer_input(&self, input: &DeveloperInput) -> Result<()> {
    self.require_teams(input.team_id.iter().chain(input.effective_assigned_teams()))?;
    check_ratings(&input.tech_skills)?;
    check_ratings(&input.app_skills)?;
    if let Some(availability) = &input.availability {
      availability.vacation_days.iter().try_for_each(check_vacation)?;
    }
    Ok(())
  }

  /// Add a developer. New developers start active with no vacations.
  pub fn add_developer(&mut self, input: DeveloperInput) -> Result<Developer> {
    self.check_developer_input(&input)?;

    let assigned = dedup(input.effective_assigned_teams());
    let developer = Developer {
      id:                 generate_id("dev"),
      name:               input.name,
      team_id:            input.team_id,
      is_shared_resource: input.is_shared_resource,
      assigned_teams:     if input.is_shared_resource { assigned.clone() } else { Vec::new() },
      tech_skills:        input.tech_skills,
      app_skills:         input.app_skills,
      availability:       Availability::default(),
    };

    if let Some(team_id) = &developer.team_id {
      link(&mut self.team_mut(team_id)?.developers, &developer.id);
    }
    for team_id in &assigned {
      link(&mut self.team_mut(team_id)?.shared_resources, &developer.id);
    }
    self.developers.push(developer.clone());
    Ok(developer)
  }

  pub fn update_developer(&mut self, id: &str, input: DeveloperInput) -> Result<Developer> {
    self.check_developer_input(&input)?;
    let current = self.developer_mut(id)?;
    let old_team = current.team_id.clone();
    let old_assigned =
      if current.is_shared_resource { current.assigned_teams.clone() } else { Vec::new() };
    let new_assigned = dedup(input.effective_assigned_teams());

    if old_team != input.team_id {
      if let Some(old_team) = &old_team {
        if let Some(team) = self.teams.iter_mut().find(|x| &x.id == old_team) {
          unlink(&mut team.developers, id);
        }
      }
      if let Some(team_id) = &input.team_id {
        link(&mut self.team_mut(team_id)?.developers, id);
      }
    }
    for team_id in old_assigned.iter().filter(|t| !new_assigned.contains(t)) {
      if let Some(team) = self.teams.iter_mut().find(|x| &x.id == team_id) {
        unlink(&mut team.shared_resources, id);
      }
    }
    for team_id in new_assigned.iter().filter(|t| !old_assigned.contains(t)) {
      link(&mut self.team_mut(team_id)?.shared_resources, id);
    }

    let developer = self.developer_mut(id)?;
    developer.name = input.name;
    developer.team_id = input.team_id;
    developer.is_shared_resource = input.is_shared_resource;
    developer.assigned_teams = if input.is_shared_resource { new_assigned } else { Vec::new() };
    developer.tech_skills = input.tech_skills;
    developer.app_skills = input.app_skills;
    if let Some(availability) = input.availability {
      developer.availability = availability;
    }
    Ok(developer.clone())
  }

  /// Remove a developer and every team membership pointing at them.
  pub fn delete_developer(&mut self, id: &str) -> Result<Developer> {
    let index = self
      .developers
      .iter()
      .position(|d| d.id == id)
      .ok_or_else(|| Error::DeveloperNotFound(id.to_owned()))?;
    let removed = self.developers.remove(index);
    for team in &mut self.teams {
      unlink(&mut team.developers, id);
      unlink(&mut team.shared_resources, id);
    }
    Ok(removed)
  }

  /// Rate a developer on one skill. The skill need not be defined.
  pub fn set_skill_rating(
    &mut self,
    developer_id: &str,
    kind: SkillKind,
    skill: &str,
    rating: u8,
  ) -> Result<()> {
    if rating > MAX_RATING {
      return Err(Error::RatingOutOfScale(rating));
    }
    if skill.trim().is_empty() {
      return Err(Error::EmptySkillName);
    }
    self
      .developer_mut(developer_id)?
      .skills_mut(kind)
      .insert(skill.to_owned(), rating);
    Ok(())
  }

  // ─── Skills ────────────────────────────────────────────────────────────────

  /// Create or replace a skill definition.
  ///
  /// With `previous_name` set to a different name this is a rename: the old
  /// definition is dropped and every developer's rating moves to the new name.
  pub fn upsert_skill(
    &mut self,
    kind: SkillKind,
    previous_name: Option<&str>,
    input: SkillInput,
  ) -> Result<()> {
    let name = input.name.trim().to_owned();
    if name.is_empty() {
      return Err(Error::EmptySkillName);
    }

    let definitions = self.skill_definitions.of_kind_mut(kind);
    if let Some(old) = previous_name.filter(|old| *old != name) {
      definitions
        .remove(old)
        .ok_or_else(|| Error::SkillNotFound { kind, name: old.to_owned() })?;
      for developer in &mut self.developers {
        let ratings = developer.skills_mut(kind);
        if let Some(rating) = ratings.remove(old) {
          ratings.insert(name.clone(), rating);
        }
      }
    }

    self.skill_definitions.of_kind_mut(kind).insert(name, SkillDefinition {
      description: input.description,
      scale:       input.scale,
      category:    input.category,
    });
    Ok(())
  }

  /// Remove a skill definition and every developer's rating for it.
  pub fn delete_skill(&mut self, kind: SkillKind, name: &str) -> Result<SkillDefinition> {
    let removed = self
      .skill_definitions
      .of_kind_mut(kind)
      .remove(name)
      .ok_or_else(|| Error::SkillNotFound { kind, name: name.to_owned() })?;
    for developer in &mut self.developers {
      developer.skills_mut(kind).remove(name);
    }
    Ok(removed)
  }

  /// Number of developers holding a rating for the skill.
  pub fn skill_usage(&self, kind: SkillKind, name: &str) -> usize {
    self.developers.iter().filter(|d| d.skills(kind).contains_key(name)).count()
  }

  // ─── Vacations ─────────────────────────────────────────────────────────────

  pub fn add_vacation(&mut self, developer_id: &str, vacation: VacationDay) -> Result<()> {
    check_vacation(&vacation)?;
    self.developer_mut(developer_id)?.availability.vacation_days.push(vacation);
    Ok(())
  }

  pub fn update_vacation(
    &mut self,
    developer_id: &str,
    index: usize,
    vacation: VacationDay,
  ) -> Result<()> {
    check_vacation(&vacation)?;
    let slot = self
      .developer_mut(developer_id)?
      .availability
      .vacation_days
      .get_mut(index)
      .ok_or_else(|| Error::VacationIndexOutOfRange {
        developer: developer_id.to_owned(),
        index,
      })?;
    *slot = vacation;
    Ok(())
  }

  pub fn delete_vacation(&mut self, developer_id: &str, index: usize) -> Result<VacationDay> {
    let days = &mut self.developer_mut(developer_id)?.availability.vacation_days;
    if index >= days.len() {
      return Err(Error::VacationIndexOutOfRange { developer: developer_id.to_owned(), index });
    }
    Ok(days.remove(index))
  }
}

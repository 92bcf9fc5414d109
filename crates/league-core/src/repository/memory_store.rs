//! 进程内联赛存储
//!
//! 与 PostgreSQL 实现保持相同的约束语义（外键、删除限制、级联、版本比较），
//! 用于本地运行与测试。数据仅存在于进程生命周期内。

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::traits::{
    FranchiseRepositoryTrait, LeagueStore, PlayerRepositoryTrait, SponsorRepositoryTrait,
    TeamRepositoryTrait,
};
use crate::error::{LeagueError, Result};
use crate::models::{
    Franchise, FranchiseRelation, NewFranchise, NewPlayer, NewSponsor, NewTeam, Player,
    PlayerRelation, Sponsor, SponsorRelation, Team, TeamRelation,
};

#[derive(Default)]
struct Tables {
    franchises: BTreeMap<i64, Franchise>,
    teams: BTreeMap<i64, Team>,
    players: BTreeMap<i64, Player>,
    sponsors: BTreeMap<i64, Sponsor>,
    /// (team_id, sponsor_id)
    team_sponsors: BTreeSet<(i64, i64)>,
    franchise_seq: i64,
    team_seq: i64,
    player_seq: i64,
    sponsor_seq: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

fn bare_franchise(f: &Franchise) -> Franchise {
    Franchise {
        teams: None,
        sponsors: None,
        ..f.clone()
    }
}

fn bare_team(t: &Team) -> Team {
    Team {
        franchise: None,
        players: None,
        sponsors: None,
        ..t.clone()
    }
}

fn bare_player(p: &Player) -> Player {
    Player {
        team: None,
        ..p.clone()
    }
}

fn bare_sponsor(s: &Sponsor) -> Sponsor {
    Sponsor {
        franchise: None,
        teams: None,
        ..s.clone()
    }
}

impl Tables {
    fn require_franchise(&self, franchise_id: i64) -> Result<()> {
        if self.franchises.contains_key(&franchise_id) {
            Ok(())
        } else {
            Err(LeagueError::invalid(
                "franchiseId",
                format!("俱乐部不存在: {}", franchise_id),
            ))
        }
    }

    fn require_team(&self, team_id: i64) -> Result<()> {
        if self.teams.contains_key(&team_id) {
            Ok(())
        } else {
            Err(LeagueError::invalid(
                "teamId",
                format!("球队不存在: {}", team_id),
            ))
        }
    }

    fn franchise_with(&self, franchise: &Franchise, include: &[FranchiseRelation]) -> Franchise {
        let mut out = bare_franchise(franchise);
        if include.contains(&FranchiseRelation::Teams) {
            out.teams = Some(
                self.teams
                    .values()
                    .filter(|t| t.franchise_id == franchise.id)
                    .map(bare_team)
                    .collect(),
            );
        }
        if include.contains(&FranchiseRelation::Sponsors) {
            out.sponsors = Some(
                self.sponsors
                    .values()
                    .filter(|s| s.franchise_id == franchise.id)
                    .map(bare_sponsor)
                    .collect(),
            );
        }
        out
    }

    fn team_with(&self, team: &Team, include: &[TeamRelation]) -> Team {
        let mut out = bare_team(team);
        if include.contains(&TeamRelation::Franchise) {
            out.franchise = self
                .franchises
                .get(&team.franchise_id)
                .map(|f| Box::new(bare_franchise(f)));
        }
        if include.contains(&TeamRelation::Players) {
            out.players = Some(
                self.players
                    .values()
                    .filter(|p| p.team_id == team.id)
                    .map(bare_player)
                    .collect(),
            );
        }
        if include.contains(&TeamRelation::Sponsors) {
            out.sponsors = Some(
                self.team_sponsors
                    .range((team.id, i64::MIN)..=(team.id, i64::MAX))
                    .filter_map(|(_, sponsor_id)| self.sponsors.get(sponsor_id))
                    .map(bare_sponsor)
                    .collect(),
            );
        }
        out
    }

    fn player_with(&self, player: &Player, include: &[PlayerRelation]) -> Player {
        let mut out = bare_player(player);
        if include.contains(&PlayerRelation::Team) {
            out.team = self
                .teams
                .get(&player.team_id)
                .map(|t| Box::new(bare_team(t)));
        }
        out
    }

    fn sponsor_with(&self, sponsor: &Sponsor, include: &[SponsorRelation]) -> Sponsor {
        let mut out = bare_sponsor(sponsor);
        if include.contains(&SponsorRelation::Franchise) {
            out.franchise = self
                .franchises
                .get(&sponsor.franchise_id)
                .map(|f| Box::new(bare_franchise(f)));
        }
        if include.contains(&SponsorRelation::Teams) {
            let mut teams: Vec<Team> = self
                .team_sponsors
                .iter()
                .filter(|(_, sponsor_id)| *sponsor_id == sponsor.id)
                .filter_map(|(team_id, _)| self.teams.get(team_id))
                .map(bare_team)
                .collect();
            teams.sort_by_key(|t| t.id);
            out.teams = Some(teams);
        }
        out
    }
}

/// 进程内联赛存储
///
/// 克隆共享同一份数据
#[derive(Clone, Default)]
pub struct MemoryLeagueStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeagueStore for MemoryLeagueStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl FranchiseRepositoryTrait for MemoryLeagueStore {
    async fn list_franchises(&self, include: &[FranchiseRelation]) -> Result<Vec<Franchise>> {
        let tables = self.tables.read();
        Ok(tables
            .franchises
            .values()
            .map(|f| tables.franchise_with(f, include))
            .collect())
    }

    async fn get_franchise(
        &self,
        id: i64,
        include: &[FranchiseRelation],
    ) -> Result<Option<Franchise>> {
        let tables = self.tables.read();
        Ok(tables
            .franchises
            .get(&id)
            .map(|f| tables.franchise_with(f, include)))
    }

    async fn insert_franchise(&self, franchise: &NewFranchise) -> Result<Franchise> {
        let mut tables = self.tables.write();
        let now = Utc::now();
        let row = Franchise {
            id: next_id(&mut tables.franchise_seq),
            name: franchise.name.clone(),
            home_city: franchise.home_city.clone(),
            logo_url: franchise.logo_url.clone(),
            version: 1,
            created_at: now,
            updated_at: now,
            teams: None,
            sponsors: None,
        };
        tables.franchises.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_franchise(&self, franchise: &Franchise) -> Result<Franchise> {
        let mut tables = self.tables.write();
        let conflict = LeagueError::ConcurrencyConflict {
            entity: "franchise",
            id: franchise.id,
        };
        let Some(stored) = tables.franchises.get_mut(&franchise.id) else {
            return Err(conflict);
        };
        if stored.version != franchise.version {
            return Err(conflict);
        }

        stored.name = franchise.name.clone();
        stored.home_city = franchise.home_city.clone();
        stored.logo_url = franchise.logo_url.clone();
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_franchise(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.franchises.contains_key(&id) {
            return Err(LeagueError::FranchiseNotFound(id));
        }

        let team_count = tables.teams.values().filter(|t| t.franchise_id == id).count();
        let sponsor_count = tables
            .sponsors
            .values()
            .filter(|s| s.franchise_id == id)
            .count();
        if team_count > 0 || sponsor_count > 0 {
            return Err(LeagueError::DeleteRestricted {
                entity: "franchise",
                id,
                reason: format!(
                    "俱乐部下存在 {} 支球队、{} 个赞助商",
                    team_count, sponsor_count
                ),
            });
        }

        tables.franchises.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TeamRepositoryTrait for MemoryLeagueStore {
    async fn list_teams(&self, include: &[TeamRelation]) -> Result<Vec<Team>> {
        let tables = self.tables.read();
        Ok(tables
            .teams
            .values()
            .map(|t| tables.team_with(t, include))
            .collect())
    }

    async fn get_team(&self, id: i64, include: &[TeamRelation]) -> Result<Option<Team>> {
        let tables = self.tables.read();
        Ok(tables.teams.get(&id).map(|t| tables.team_with(t, include)))
    }

    async fn insert_team(&self, team: &NewTeam) -> Result<Team> {
        let mut tables = self.tables.write();
        tables.require_franchise(team.franchise_id)?;

        let now = Utc::now();
        let row = Team {
            id: next_id(&mut tables.team_seq),
            name: team.name.clone(),
            city: team.city.clone(),
            logo_url: team.logo_url.clone(),
            franchise_id: team.franchise_id,
            version: 1,
            created_at: now,
            updated_at: now,
            franchise: None,
            players: None,
            sponsors: None,
        };
        tables.teams.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_team(&self, team: &Team) -> Result<Team> {
        let mut tables = self.tables.write();
        let conflict = LeagueError::ConcurrencyConflict {
            entity: "team",
            id: team.id,
        };
        match tables.teams.get(&team.id) {
            Some(stored) if stored.version == team.version => {}
            _ => return Err(conflict),
        }
        tables.require_franchise(team.franchise_id)?;

        let Some(stored) = tables.teams.get_mut(&team.id) else {
            return Err(conflict);
        };
        stored.name = team.name.clone();
        stored.city = team.city.clone();
        stored.logo_url = team.logo_url.clone();
        stored.franchise_id = team.franchise_id;
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_team(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.teams.contains_key(&id) {
            return Err(LeagueError::TeamNotFound(id));
        }

        let player_count = tables.players.values().filter(|p| p.team_id == id).count();
        if player_count > 0 {
            return Err(LeagueError::DeleteRestricted {
                entity: "team",
                id,
                reason: format!("球队下存在 {} 名球员", player_count),
            });
        }

        tables.teams.remove(&id);
        tables.team_sponsors.retain(|(team_id, _)| *team_id != id);
        Ok(())
    }

    async fn link_sponsor(&self, team_id: i64, sponsor_id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.teams.contains_key(&team_id) || !tables.sponsors.contains_key(&sponsor_id) {
            return Err(LeagueError::invalid("teamId,sponsorId", "球队或赞助商不存在"));
        }
        if !tables.team_sponsors.insert((team_id, sponsor_id)) {
            return Err(LeagueError::DuplicateLink {
                team_id,
                sponsor_id,
            });
        }
        Ok(())
    }

    async fn unlink_sponsor(&self, team_id: i64, sponsor_id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.team_sponsors.remove(&(team_id, sponsor_id)) {
            return Err(LeagueError::LinkNotFound {
                team_id,
                sponsor_id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerRepositoryTrait for MemoryLeagueStore {
    async fn list_players(&self, include: &[PlayerRelation]) -> Result<Vec<Player>> {
        let tables = self.tables.read();
        Ok(tables
            .players
            .values()
            .map(|p| tables.player_with(p, include))
            .collect())
    }

    async fn get_player(&self, id: i64, include: &[PlayerRelation]) -> Result<Option<Player>> {
        let tables = self.tables.read();
        Ok(tables
            .players
            .get(&id)
            .map(|p| tables.player_with(p, include)))
    }

    async fn insert_player(&self, player: &NewPlayer) -> Result<Player> {
        let mut tables = self.tables.write();
        tables.require_team(player.team_id)?;

        let now = Utc::now();
        let row = Player {
            id: next_id(&mut tables.player_seq),
            name: player.name.clone(),
            age: player.age,
            role: player.role.clone(),
            team_id: player.team_id,
            version: 1,
            created_at: now,
            updated_at: now,
            team: None,
        };
        tables.players.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_player(&self, player: &Player) -> Result<Player> {
        let mut tables = self.tables.write();
        let conflict = LeagueError::ConcurrencyConflict {
            entity: "player",
            id: player.id,
        };
        match tables.players.get(&player.id) {
            Some(stored) if stored.version == player.version => {}
            _ => return Err(conflict),
        }
        tables.require_team(player.team_id)?;

        let Some(stored) = tables.players.get_mut(&player.id) else {
            return Err(conflict);
        };
        stored.name = player.name.clone();
        stored.age = player.age;
        stored.role = player.role.clone();
        stored.team_id = player.team_id;
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_player(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        tables
            .players
            .remove(&id)
            .map(|_| ())
            .ok_or(LeagueError::PlayerNotFound(id))
    }
}

#[async_trait]
impl SponsorRepositoryTrait for MemoryLeagueStore {
    async fn list_sponsors(&self, include: &[SponsorRelation]) -> Result<Vec<Sponsor>> {
        let tables = self.tables.read();
        Ok(tables
            .sponsors
            .values()
            .map(|s| tables.sponsor_with(s, include))
            .collect())
    }

    async fn get_sponsor(&self, id: i64, include: &[SponsorRelation]) -> Result<Option<Sponsor>> {
        let tables = self.tables.read();
        Ok(tables
            .sponsors
            .get(&id)
            .map(|s| tables.sponsor_with(s, include)))
    }

    async fn list_sponsors_by_team(
        &self,
        team_id: i64,
        include: &[SponsorRelation],
    ) -> Result<Vec<Sponsor>> {
        let tables = self.tables.read();
        Ok(tables
            .team_sponsors
            .range((team_id, i64::MIN)..=(team_id, i64::MAX))
            .filter_map(|(_, sponsor_id)| tables.sponsors.get(sponsor_id))
            .map(|s| tables.sponsor_with(s, include))
            .collect())
    }

    async fn insert_sponsor(&self, sponsor: &NewSponsor) -> Result<Sponsor> {
        let mut tables = self.tables.write();
        tables.require_franchise(sponsor.franchise_id)?;

        let now = Utc::now();
        let row = Sponsor {
            id: next_id(&mut tables.sponsor_seq),
            name: sponsor.name.clone(),
            logo_url: sponsor.logo_url.clone(),
            franchise_id: sponsor.franchise_id,
            version: 1,
            created_at: now,
            updated_at: now,
            franchise: None,
            teams: None,
        };
        tables.sponsors.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_sponsor(&self, sponsor: &Sponsor) -> Result<Sponsor> {
        let mut tables = self.tables.write();
        let conflict = LeagueError::ConcurrencyConflict {
            entity: "sponsor",
            id: sponsor.id,
        };
        match tables.sponsors.get(&sponsor.id) {
            Some(stored) if stored.version == sponsor.version => {}
            _ => return Err(conflict),
        }
        tables.require_franchise(sponsor.franchise_id)?;

        let Some(stored) = tables.sponsors.get_mut(&sponsor.id) else {
            return Err(conflict);
        };
        stored.name = sponsor.name.clone();
        stored.logo_url = sponsor.logo_url.clone();
        stored.franchise_id = sponsor.franchise_id;
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_sponsor(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.sponsors.remove(&id).is_none() {
            return Err(LeagueError::SponsorNotFound(id));
        }
        tables
            .team_sponsors
            .retain(|(_, sponsor_id)| *sponsor_id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_franchise(name: &str) -> NewFranchise {
        NewFranchise {
            name: name.to_string(),
            home_city: Some("Chennai".to_string()),
            logo_url: None,
        }
    }

    fn new_team(name: &str, franchise_id: i64) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            city: Some("Chennai".to_string()),
            logo_url: None,
            franchise_id,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_entity() {
        let store = MemoryLeagueStore::new();
        let a = store.insert_franchise(&new_franchise("A")).await.unwrap();
        let b = store.insert_franchise(&new_franchise("B")).await.unwrap();
        let team = store.insert_team(&new_team("T", a.id)).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(team.id, 1);
        assert_eq!(a.version, 1);
    }

    #[tokio::test]
    async fn test_insert_team_requires_existing_franchise() {
        let store = MemoryLeagueStore::new();
        let err = store.insert_team(&new_team("T", 99)).await.unwrap_err();

        match err {
            LeagueError::Validation { field, .. } => assert_eq!(field, "franchiseId"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.list_teams(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relations_only_loaded_when_requested() {
        let store = MemoryLeagueStore::new();
        let f = store.insert_franchise(&new_franchise("A")).await.unwrap();
        store.insert_team(&new_team("T", f.id)).await.unwrap();

        let plain = store.get_franchise(f.id, &[]).await.unwrap().unwrap();
        assert!(plain.teams.is_none());
        assert!(plain.sponsors.is_none());

        let loaded = store
            .get_franchise(f.id, &[FranchiseRelation::Teams])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.teams.map(|t| t.len()), Some(1));
        assert!(loaded.sponsors.is_none());
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts() {
        let store = MemoryLeagueStore::new();
        let f = store.insert_franchise(&new_franchise("A")).await.unwrap();

        let mut first = f.clone();
        first.name = "B".to_string();
        let updated = store.update_franchise(&first).await.unwrap();
        assert_eq!(updated.version, 2);

        let mut stale = f.clone();
        stale.name = "C".to_string();
        let err = store.update_franchise(&stale).await.unwrap_err();
        assert!(matches!(err, LeagueError::ConcurrencyConflict { .. }));

        let current = store.get_franchise(f.id, &[]).await.unwrap().unwrap();
        assert_eq!(current.name, "B");
    }

    #[tokio::test]
    async fn test_delete_team_restricted_by_players_and_cascades_links() {
        let store = MemoryLeagueStore::new();
        let f = store.insert_franchise(&new_franchise("A")).await.unwrap();
        let team = store.insert_team(&new_team("T", f.id)).await.unwrap();
        let sponsor = store
            .insert_sponsor(&NewSponsor {
                name: "S".to_string(),
                logo_url: None,
                franchise_id: f.id,
            })
            .await
            .unwrap();
        store.link_sponsor(team.id, sponsor.id).await.unwrap();
        let player = store
            .insert_player(&NewPlayer {
                name: "P".to_string(),
                age: 25,
                role: "Batsman".to_string(),
                team_id: team.id,
            })
            .await
            .unwrap();

        let err = store.delete_team(team.id).await.unwrap_err();
        assert!(matches!(err, LeagueError::DeleteRestricted { .. }));

        store.delete_player(player.id).await.unwrap();
        store.delete_team(team.id).await.unwrap();

        let sponsor = store
            .get_sponsor(sponsor.id, &[SponsorRelation::Teams])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sponsor.teams, Some(vec![]));
    }

    #[tokio::test]
    async fn test_link_sponsor_rejects_duplicates() {
        let store = MemoryLeagueStore::new();
        let f = store.insert_franchise(&new_franchise("A")).await.unwrap();
        let team = store.insert_team(&new_team("T", f.id)).await.unwrap();
        let sponsor = store
            .insert_sponsor(&NewSponsor {
                name: "S".to_string(),
                logo_url: None,
                franchise_id: f.id,
            })
            .await
            .unwrap();

        store.link_sponsor(team.id, sponsor.id).await.unwrap();
        let err = store.link_sponsor(team.id, sponsor.id).await.unwrap_err();
        assert!(matches!(err, LeagueError::DuplicateLink { .. }));

        store.unlink_sponsor(team.id, sponsor.id).await.unwrap();
        let err = store.unlink_sponsor(team.id, sponsor.id).await.unwrap_err();
        assert!(matches!(err, LeagueError::LinkNotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_sponsors_by_team_only_returns_linked() {
        let store = MemoryLeagueStore::new();
        let f = store.insert_franchise(&new_franchise("A")).await.unwrap();
        let first = store.insert_team(&new_team("T1", f.id)).await.unwrap();
        let second = store.insert_team(&new_team("T2", f.id)).await.unwrap();
        let mut sponsor_ids = Vec::new();
        for name in ["S1", "S2", "S3"] {
            let sponsor = store
                .insert_sponsor(&NewSponsor {
                    name: name.to_string(),
                    logo_url: None,
                    franchise_id: f.id,
                })
                .await
                .unwrap();
            sponsor_ids.push(sponsor.id);
        }
        store.link_sponsor(first.id, sponsor_ids[2]).await.unwrap();
        store.link_sponsor(first.id, sponsor_ids[0]).await.unwrap();
        store.link_sponsor(second.id, sponsor_ids[1]).await.unwrap();

        let sponsors = store
            .list_sponsors_by_team(first.id, &[SponsorRelation::Franchise])
            .await
            .unwrap();
        let ids: Vec<i64> = sponsors.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![sponsor_ids[0], sponsor_ids[2]]);
        assert!(sponsors.iter().all(|s| s.franchise.is_some()));
        assert!(sponsors[0].teams.is_none());
    }
}

//! PostgreSQL 存储集成测试
//!
//! 需要可用的数据库：`DATABASE_URL` 缺省时使用默认配置中的连接串。
//! 运行方式：`cargo test -p league-core --test pg_store_test -- --ignored`

use fake::Fake;
use fake::faker::company::en::CompanyName;
use league_core::repository::{
    FranchiseRepositoryTrait, PlayerRepositoryTrait, SponsorRepositoryTrait, TeamRepositoryTrait,
};
use league_core::{
    FranchiseRelation, LeagueError, NewFranchise, NewPlayer, NewSponsor, NewTeam, PgLeagueStore,
    SponsorRelation, TeamRelation,
};
use league_shared::{config::DatabaseConfig, database::Database};

async fn store() -> PgLeagueStore {
    let mut config = DatabaseConfig::default();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.url = url;
    }
    let db = Database::connect(&config).await.unwrap();
    db.run_migrations().await.unwrap();
    PgLeagueStore::new(db.pool().clone())
}

async fn franchise(store: &PgLeagueStore) -> i64 {
    store
        .insert_franchise(&NewFranchise {
            name: CompanyName().fake(),
            home_city: Some("Toronto".to_string()),
            logo_url: None,
        })
        .await
        .unwrap()
        .id
}

async fn team(store: &PgLeagueStore, franchise_id: i64) -> i64 {
    store
        .insert_team(&NewTeam {
            name: CompanyName().fake(),
            city: None,
            logo_url: None,
            franchise_id,
        })
        .await
        .unwrap()
        .id
}

async fn sponsor(store: &PgLeagueStore, franchise_id: i64) -> i64 {
    store
        .insert_sponsor(&NewSponsor {
            name: CompanyName().fake(),
            logo_url: None,
            franchise_id,
        })
        .await
        .unwrap()
        .id
}

async fn player(store: &PgLeagueStore, team_id: i64) -> i64 {
    store
        .insert_player(&NewPlayer {
            name: "John Doe".to_string(),
            age: 25,
            role: "Bowler".to_string(),
            team_id,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_update_with_stale_version_conflicts() {
    let store = store().await;
    let id = franchise(&store).await;

    let first = store.get_franchise(id, &[]).await.unwrap().unwrap();
    let mut renamed = first.clone();
    renamed.name = "Renamed".to_string();
    let updated = store.update_franchise(&renamed).await.unwrap();
    assert_eq!(updated.version, first.version + 1);

    let err = store.update_franchise(&first).await.unwrap_err();
    assert!(matches!(err, LeagueError::ConcurrencyConflict { entity: "franchise", .. }));

    let current = store.get_franchise(id, &[]).await.unwrap().unwrap();
    assert_eq!(current.name, "Renamed");
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_insert_with_missing_parent_is_validation_error() {
    let store = store().await;

    let err = store
        .insert_team(&NewTeam {
            name: "Orphan".to_string(),
            city: None,
            logo_url: None,
            franchise_id: i64::MAX,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LeagueError::Validation { ref field, .. } if field == "franchiseId"));

    let err = store
        .insert_player(&NewPlayer {
            name: "Nobody".to_string(),
            age: 30,
            role: "Batsman".to_string(),
            team_id: i64::MAX,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LeagueError::Validation { ref field, .. } if field == "teamId"));
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_franchise_delete_restricted_by_teams_and_sponsors() {
    let store = store().await;
    let franchise_id = franchise(&store).await;
    let team_id = team(&store, franchise_id).await;
    let sponsor_id = sponsor(&store, franchise_id).await;

    let err = store.delete_franchise(franchise_id).await.unwrap_err();
    assert!(matches!(err, LeagueError::DeleteRestricted { entity: "franchise", .. }));

    store.delete_team(team_id).await.unwrap();
    let err = store.delete_franchise(franchise_id).await.unwrap_err();
    assert!(matches!(err, LeagueError::DeleteRestricted { .. }));

    store.delete_sponsor(sponsor_id).await.unwrap();
    store.delete_franchise(franchise_id).await.unwrap();

    let err = store.delete_franchise(franchise_id).await.unwrap_err();
    assert!(matches!(err, LeagueError::FranchiseNotFound(id) if id == franchise_id));
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_team_delete_restricted_by_players_and_cascades_links() {
    let store = store().await;
    let franchise_id = franchise(&store).await;
    let team_id = team(&store, franchise_id).await;
    let sponsor_id = sponsor(&store, franchise_id).await;
    let player_id = player(&store, team_id).await;
    store.link_sponsor(team_id, sponsor_id).await.unwrap();

    let err = store.delete_team(team_id).await.unwrap_err();
    assert!(matches!(err, LeagueError::DeleteRestricted { entity: "team", .. }));

    store.delete_player(player_id).await.unwrap();
    store.delete_team(team_id).await.unwrap();

    let sponsor = store
        .get_sponsor(sponsor_id, &[SponsorRelation::Teams])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sponsor.teams.map(|teams| teams.len()), Some(0));
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_link_sponsor_duplicate_and_missing() {
    let store = store().await;
    let franchise_id = franchise(&store).await;
    let team_id = team(&store, franchise_id).await;
    let sponsor_id = sponsor(&store, franchise_id).await;

    store.link_sponsor(team_id, sponsor_id).await.unwrap();
    let err = store.link_sponsor(team_id, sponsor_id).await.unwrap_err();
    assert!(matches!(err, LeagueError::DuplicateLink { .. }));

    let err = store.link_sponsor(team_id, i64::MAX).await.unwrap_err();
    assert!(matches!(err, LeagueError::Validation { .. }));

    store.unlink_sponsor(team_id, sponsor_id).await.unwrap();
    let err = store.unlink_sponsor(team_id, sponsor_id).await.unwrap_err();
    assert!(matches!(err, LeagueError::LinkNotFound { .. }));
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_relations_are_batch_loaded_on_request() {
    let store = store().await;
    let franchise_id = franchise(&store).await;
    let first_team = team(&store, franchise_id).await;
    let second_team = team(&store, franchise_id).await;
    let sponsor_id = sponsor(&store, franchise_id).await;
    player(&store, first_team).await;
    store.link_sponsor(first_team, sponsor_id).await.unwrap();
    store.link_sponsor(second_team, sponsor_id).await.unwrap();

    let plain = store.get_franchise(franchise_id, &[]).await.unwrap().unwrap();
    assert!(plain.teams.is_none());
    assert!(plain.sponsors.is_none());

    let loaded = store
        .get_franchise(
            franchise_id,
            &[FranchiseRelation::Teams, FranchiseRelation::Sponsors],
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.teams.map(|t| t.len()), Some(2));
    assert_eq!(loaded.sponsors.map(|s| s.len()), Some(1));

    let teams = store
        .list_teams(&[
            TeamRelation::Franchise,
            TeamRelation::Players,
            TeamRelation::Sponsors,
        ])
        .await
        .unwrap();
    let first = teams.iter().find(|t| t.id == first_team).unwrap();
    assert_eq!(
        first.franchise.as_ref().map(|f| f.id),
        Some(franchise_id)
    );
    assert_eq!(first.players.as_ref().map(|p| p.len()), Some(1));
    assert_eq!(
        first
            .sponsors
            .as_ref()
            .map(|s| s.iter().map(|s| s.id).collect::<Vec<_>>()),
        Some(vec![sponsor_id])
    );

    let sponsor = store
        .get_sponsor(sponsor_id, &[SponsorRelation::Franchise, SponsorRelation::Teams])
        .await
        .unwrap()
        .unwrap();
    let mut team_ids: Vec<i64> = sponsor.teams.unwrap().iter().map(|t| t.id).collect();
    team_ids.sort_unstable();
    assert_eq!(team_ids, vec![first_team, second_team]);
    assert!(sponsor.franchise.is_some());

    let linked = store
        .list_sponsors_by_team(second_team, &[SponsorRelation::Franchise])
        .await
        .unwrap();
    assert_eq!(linked.iter().map(|s| s.id).collect::<Vec<_>>(), vec![sponsor_id]);
}

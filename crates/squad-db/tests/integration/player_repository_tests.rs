use chrono::NaiveDate;
use squad_core::models::PlayerRecord;
use squad_core::traits::PlayerStore;
use squad_db::{Database, PlayerRepository};

use crate::common::setup_test_db;

fn saka() -> PlayerRecord {
    PlayerRecord {
        id: 433177,
        name: "Bukayo Saka".into(),
        team_name: "Arsenal FC".into(),
        shirt_number: 7,
        position: "RIGHT WINGER".into(),
        date_of_birth: NaiveDate::from_ymd_opt(2001, 9, 5).unwrap(),
        nationality: "England".into(),
        nationality_flag_url: "https://tmssl.akamaized.net/images/flagge/tiny/189.png".into(),
        market_value: 120_000_000,
        image_url: "https://img.a.transfermarkt.technology/portrait/medium/433177.jpg".into(),
        profile_url: "https://www.transfermarkt.com/bukayo-saka/profil/spieler/433177".into(),
    }
}

fn raya() -> PlayerRecord {
    PlayerRecord {
        id: 262749,
        name: "David Raya".into(),
        shirt_number: 22,
        position: "GOALKEEPER".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1995, 9, 15).unwrap(),
        nationality: "Spain".into(),
        market_value: 35_000_000,
        profile_url: "https://www.transfermarkt.com/david-raya/profil/spieler/262749".into(),
        ..saka()
    }
}

#[tokio::test]
async fn upsert_and_get_player() {
    let (pool, _container) = setup_test_db().await;
    let repo = PlayerRepository::new(pool);

    let written = repo.upsert_players(&[saka(), raya()]).await.unwrap();
    assert_eq!(written, 2);

    let stored = repo
        .get_player("Arsenal FC", 433177)
        .await
        .unwrap()
        .expect("Should find the player");
    assert_eq!(stored, saka());

    assert!(repo.get_player("Chelsea FC", 433177).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_is_idempotent() {
    let (pool, _container) = setup_test_db().await;
    let repo = PlayerRepository::new(pool.clone());

    repo.upsert_players(&[saka()]).await.unwrap();
    repo.upsert_players(&[saka()]).await.unwrap();

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn upsert_overwrites_changed_fields() {
    let (pool, _container) = setup_test_db().await;
    let repo = PlayerRepository::new(pool);

    repo.upsert_players(&[saka()]).await.unwrap();
    let revalued = PlayerRecord {
        market_value: 140_000_000,
        shirt_number: 77,
        ..saka()
    };
    repo.upsert_players(&[revalued.clone()]).await.unwrap();

    let stored = repo.get_player("Arsenal FC", 433177).await.unwrap().unwrap();
    assert_eq!(stored, revalued);
}

#[tokio::test]
async fn same_player_in_two_teams_is_two_rows() {
    let (pool, _container) = setup_test_db().await;
    let repo = PlayerRepository::new(pool);

    let loaned = PlayerRecord {
        team_name: "Brentford FC".into(),
        ..saka()
    };
    repo.upsert_players(&[saka(), loaned]).await.unwrap();

    assert_eq!(repo.list_team("Arsenal FC").await.unwrap().len(), 1);
    assert_eq!(repo.list_team("Brentford FC").await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_team_orders_by_shirt_number() {
    let (pool, _container) = setup_test_db().await;
    let repo = PlayerRepository::new(pool);

    repo.upsert_players(&[raya(), saka()]).await.unwrap();

    let team = repo.list_team("Arsenal FC").await.unwrap();
    let shirts: Vec<u32> = team.iter().map(|p| p.shirt_number).collect();
    assert_eq!(shirts, vec![7, 22]);
    assert!(repo.list_team("Unknown FC").await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_batch_writes_nothing() {
    let (pool, _container) = setup_test_db().await;
    let repo = PlayerRepository::new(pool);

    assert_eq!(repo.upsert_players(&[]).await.unwrap(), 0);
}

#[tokio::test]
async fn store_trait_and_facade() {
    let (pool, _container) = setup_test_db().await;
    let db = Database::from_pool(pool);
    let repo = db.player_repo();

    repo.health_check().await.unwrap();
    let written = PlayerStore::upsert_players(&repo, &[raya()]).await.unwrap();
    assert_eq!(written, 1);
    assert!(repo.get_player("Arsenal FC", 262749).await.unwrap().is_some());
}

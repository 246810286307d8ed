#![allow(dead_code)]

use member_search::db::{DbPool, establish_connection_pool, run_pending_migrations};
use member_search::domain::member::NewMember;
use member_search::domain::team::NewTeam;
use member_search::domain::types::{Age, TeamId, TeamName, Username};
use member_search::repository::{DieselRepository, MemberWriter, TeamWriter};
use tempfile::TempDir;

/// SQLite database living in a temporary directory for the duration of a test.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let database_url = path.to_str().expect("utf-8 temp path").to_string();

        let pool = establish_connection_pool(&database_url).expect("create pool");
        run_pending_migrations(&pool).expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repository(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

/// Inserts `teamA` with members aged 10 and 20, and `teamB` with members
/// aged 30 and 40. Returns the ids of both teams.
pub fn seed_teams(repo: &DieselRepository) -> (TeamId, TeamId) {
    let team_a = repo
        .create_team(&NewTeam::new(TeamName::new("teamA").unwrap()))
        .unwrap();
    let team_b = repo
        .create_team(&NewTeam::new(TeamName::new("teamB").unwrap()))
        .unwrap();

    for (username, age, team) in [
        ("member1", 10, team_a.id),
        ("member2", 20, team_a.id),
        ("member3", 30, team_b.id),
        ("member4", 40, team_b.id),
    ] {
        repo.create_member(&NewMember::new(
            Username::new(username).unwrap(),
            Age::new(age).unwrap(),
            Some(team),
        ))
        .unwrap();
    }

    (team_a.id, team_b.id)
}

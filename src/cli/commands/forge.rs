//! Forge command handler

use std::io::Write;

use crate::config::SecurityConfig;
use crate::db::{DemoAdmin, Store};

pub const DEMO_ADMIN: DemoAdmin<'static> = DemoAdmin {
    name: "Grey Li",
    username: "demo",
    password: "demo",
};

pub const DEMO_MOVIES: &[(&str, &str)] = &[
    ("My Neighbor Totoro", "1988"),
    ("Dead Poets Society", "1989"),
    ("A Perfect World", "1993"),
    ("Leon", "1994"),
    ("Mahjong", "1996"),
    ("Swallowtail Butterfly", "1996"),
    ("King of Comedy", "1999"),
    ("Devils on the Doorstep", "1999"),
    ("WALL-E", "2008"),
    ("The Pork of Music", "2012"),
];

pub async fn cmd_forge<W: Write>(
    store: &Store,
    security: &SecurityConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    let had_admin = store.find_admin().await?.is_some();

    store.seed_demo(&DEMO_ADMIN, DEMO_MOVIES, security).await?;

    if !had_admin {
        writeln!(
            out,
            "Demo login: {} / {}",
            DEMO_ADMIN.username, DEMO_ADMIN.password
        )?;
    }
    writeln!(out, "Insert Done!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inserts_demo_data() {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let security = SecurityConfig {
            argon2_memory_cost_kib: 64,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };

        let mut out = Vec::new();
        cmd_forge(&store, &security, &mut out).await.unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Insert Done!"));
        assert!(output.contains("Demo login: demo / demo"));
        assert_eq!(store.count_movies().await.unwrap(), DEMO_MOVIES.len() as u64);

        let admin = store.find_admin().await.unwrap().unwrap();
        assert_eq!(admin.name, "Grey Li");
        assert!(store.verify_user_password("demo", "demo").await.unwrap());
    }
}

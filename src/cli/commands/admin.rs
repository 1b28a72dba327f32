//! Admin command handler

use std::io::Write;

use crate::config::SecurityConfig;
use crate::db::{AdminUpsert, Store};

pub async fn cmd_admin<W: Write>(
    store: &Store,
    security: &SecurityConfig,
    username: &str,
    password: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    if username.is_empty() {
        anyhow::bail!("Username cannot be empty");
    }
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let outcome = store.upsert_admin(username, password, security).await?;
    match outcome {
        AdminUpsert::Created => writeln!(out, "Creating user ...")?,
        AdminUpsert::Updated => writeln!(out, "Renaming user ...")?,
    }

    writeln!(out, "Done!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 64,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[tokio::test]
    async fn creates_then_renames() {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let security = fast_params();

        let mut out = Vec::new();
        cmd_admin(&store, &security, "bzh", "123456", &mut out)
            .await
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Creating user ..."));
        assert!(output.contains("Done!"));
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert!(store.verify_user_password("bzh", "123456").await.unwrap());

        let mut out = Vec::new();
        cmd_admin(&store, &security, "ty", "9999", &mut out)
            .await
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Renaming user ..."));
        assert!(output.contains("Done!"));
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(store.find_admin().await.unwrap().unwrap().username, "ty");
        assert!(store.verify_user_password("ty", "9999").await.unwrap());
    }

    #[tokio::test]
    async fn reports_rename_for_seeded_admin() {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let security = fast_params();
        store.upsert_admin("seeded", "pw", &security).await.unwrap();

        let mut out = Vec::new();
        cmd_admin(&store, &security, "grey", "secret", &mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Renaming user ...\nDone!\n");
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rejects_empty_credentials() {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let security = fast_params();
        let mut out = Vec::new();

        assert!(cmd_admin(&store, &security, "", "pw", &mut out).await.is_err());
        assert!(cmd_admin(&store, &security, "admin", "", &mut out).await.is_err());
        assert_eq!(store.count_users().await.unwrap(), 0);
        assert!(out.is_empty());
    }
}

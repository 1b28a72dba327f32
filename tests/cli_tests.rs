use clap::Parser;
use watchlist::cli::{Cli, Commands};
use watchlist::config::{Config, SecurityConfig};
use watchlist::db::Store;
use watchlist::run;

fn temp_config() -> (Config, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("watchlist-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.security = SecurityConfig {
        argon2_memory_cost_kib: 64,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    };
    (config, path)
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("watchlist").chain(args.iter().copied()))
        .expect("arguments should parse")
}

#[test]
fn parses_subcommands() {
    assert!(matches!(parse(&["initdb"]).command, Some(Commands::Initdb { drop: false })));
    assert!(matches!(
        parse(&["initdb", "--drop"]).command,
        Some(Commands::Initdb { drop: true })
    ));
    assert!(matches!(parse(&["forge"]).command, Some(Commands::Forge)));
    assert!(matches!(parse(&["web"]).command, Some(Commands::Serve)));
    assert!(parse(&[]).command.is_none());

    let cli = parse(&["admin", "--username", "grey", "--password", "secret"]);
    match cli.command {
        Some(Commands::Admin { username, password }) => {
            assert_eq!(username, "grey");
            assert_eq!(password, "secret");
        }
        _ => panic!("expected admin command"),
    }

    let cli = parse(&["--config", "other.toml", "serve"]);
    assert_eq!(cli.config.unwrap().to_str(), Some("other.toml"));

    assert!(Cli::try_parse_from(["watchlist", "admin", "--username", "grey"]).is_err());
}

#[tokio::test]
async fn initdb_forge_admin_sequence() {
    let (config, path) = temp_config();

    run(parse(&["initdb"]), config.clone()).await.unwrap();
    run(parse(&["forge"]), config.clone()).await.unwrap();
    run(
        parse(&["admin", "--username", "grey", "--password", "secret"]),
        config.clone(),
    )
    .await
    .unwrap();

    let store = Store::from_config(&config).await.unwrap();
    assert_eq!(store.count_movies().await.unwrap(), 10);
    assert_eq!(store.count_users().await.unwrap(), 1);

    let admin = store.find_admin().await.unwrap().unwrap();
    assert_eq!(admin.name, "Grey Li");
    assert_eq!(admin.username, "grey");
    assert!(store.verify_user_password("grey", "secret").await.unwrap());
    assert!(!store.verify_user_password("demo", "demo").await.unwrap());

    run(parse(&["initdb", "--drop"]), config.clone()).await.unwrap();
    assert_eq!(store.count_movies().await.unwrap(), 0);
    assert_eq!(store.count_users().await.unwrap(), 0);

    drop(store);
    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn admin_rejects_empty_password() {
    let (config, path) = temp_config();

    let result = run(
        parse(&["admin", "--username", "grey", "--password", ""]),
        config.clone(),
    )
    .await;
    assert!(result.is_err());

    let store = Store::from_config(&config).await.unwrap();
    assert_eq!(store.count_users().await.unwrap(), 0);

    drop(store);
    std::fs::remove_file(path).ok();
}

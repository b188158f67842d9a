#[cfg(test)]
mod tests {
    use serial_test::serial;

    use crate::config::AppConfig;

    #[test]
    #[serial]
    fn test_defaults() {
        temp_env::with_vars_unset(
            [
                "DATABASE_URL",
                "ROCKET_DATABASE_URL",
                "ROCKET_SCHEDULE_OWNER_ID",
                "ROCKET_BCRYPT_COST",
            ],
            || {
                let config = AppConfig::load().expect("Failed to load config");
                assert_eq!(config, AppConfig::default());
                assert_eq!(config.schedule_owner_id, 1);
            },
        );
    }

    #[test]
    #[serial]
    fn test_database_url_from_env() {
        temp_env::with_var("DATABASE_URL", Some("sqlite://elsewhere.db"), || {
            let config = AppConfig::load().expect("Failed to load config");
            assert_eq!(config.database_url, "sqlite://elsewhere.db");
        });
    }

    #[test]
    #[serial]
    fn test_rocket_prefixed_overrides() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", None),
                ("ROCKET_SCHEDULE_OWNER_ID", Some("7")),
                ("ROCKET_BCRYPT_COST", Some("5")),
            ],
            || {
                let config = AppConfig::load().expect("Failed to load config");
                assert_eq!(config.schedule_owner_id, 7);
                assert_eq!(config.bcrypt_cost, 5);
            },
        );
    }

    #[test]
    #[serial]
    fn test_raw_database_url_wins_over_rocket_prefixed() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("sqlite://raw.db")),
                ("ROCKET_DATABASE_URL", Some("sqlite://prefixed.db")),
            ],
            || {
                let config = AppConfig::load().expect("Failed to load config");
                assert_eq!(config.database_url, "sqlite://raw.db");
            },
        );
    }

    #[test]
    #[serial]
    fn test_out_of_range_bcrypt_cost_is_rejected() {
        for cost in ["3", "32", "40"] {
            temp_env::with_var("ROCKET_BCRYPT_COST", Some(cost), || {
                let err = AppConfig::load().expect_err("Out of range cost was accepted");
                assert!(
                    err.to_string().contains("bcrypt_cost"),
                    "Unexpected error: {}",
                    err
                );
            });
        }
    }

    #[test]
    #[serial]
    fn test_bcrypt_cost_bounds_are_accepted() {
        for cost in [4, 31] {
            temp_env::with_var("ROCKET_BCRYPT_COST", Some(cost.to_string()), || {
                let config = AppConfig::load().expect("Failed to load config");
                assert_eq!(config.bcrypt_cost, cost);
            });
        }
    }
}

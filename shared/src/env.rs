use std::env;

use strum::EnumString;

#[derive(Debug, Default, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

// ENV が未設定または不正な値のときはビルドプロファイルに従う
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => v.parse().unwrap_or(default_env),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("development", Environment::Development)]
    #[case("production", Environment::Production)]
    fn parses_lowercase_names(#[case] raw: &str, #[case] expected: Environment) {
        assert_eq!(raw.parse::<Environment>().ok(), Some(expected));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("staging".parse::<Environment>().is_err());
    }
}

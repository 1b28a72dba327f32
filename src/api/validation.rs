use serde::Deserialize;

use super::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub name: String,
}

/// A movie form whose fields passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct MovieInput<'a> {
    pub title: &'a str,
    pub year: &'a str,
}

/// Route ids that are not numbers behave like ids that do not exist.
pub fn parse_movie_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::not_found("Movie", raw))
}

/// Fields are stored as typed; only an empty value is rejected.
fn required(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub fn validate_movie(form: &MovieForm) -> Option<MovieInput<'_>> {
    Some(MovieInput {
        title: required(&form.title)?,
        year: required(&form.year)?,
    })
}

pub fn validate_name(form: &SettingsForm) -> Option<&str> {
    required(&form.name)
}

pub fn validate_credentials(form: &LoginForm) -> Option<(&str, &str)> {
    Some((required(&form.username)?, required(&form.password)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, year: &str) -> MovieForm {
        MovieForm {
            title: title.to_string(),
            year: year.to_string(),
        }
    }

    #[test]
    fn test_parse_movie_id() {
        assert_eq!(parse_movie_id("1").unwrap(), 1);
        assert!(parse_movie_id("0").is_err());
        assert!(parse_movie_id("-4").is_err());
        assert!(parse_movie_id("abc").is_err());
    }

    #[test]
    fn test_validate_movie() {
        assert_eq!(
            validate_movie(&movie("New Movie", "2019")),
            Some(MovieInput {
                title: "New Movie",
                year: "2019"
            })
        );

        assert!(validate_movie(&movie("", "2019")).is_none());
        assert!(validate_movie(&movie("bacde", "")).is_none());
    }

    #[test]
    fn test_validate_movie_accepts_any_non_empty_value() {
        let title = "x".repeat(120);
        let form = movie(&title, "19945");
        let input = validate_movie(&form).unwrap();
        assert_eq!(input.title, title);
        assert_eq!(input.year, "19945");

        let form = movie("  Leon ", " ");
        assert_eq!(
            validate_movie(&form),
            Some(MovieInput {
                title: "  Leon ",
                year: " "
            })
        );
    }

    #[test]
    fn test_validate_name() {
        let ok = SettingsForm {
            name: "Grey Li".to_string(),
        };
        assert_eq!(validate_name(&ok), Some("Grey Li"));
        assert!(validate_name(&SettingsForm::default()).is_none());

        let long = SettingsForm {
            name: "n".repeat(21),
        };
        assert_eq!(validate_name(&long), Some(long.name.as_str()));
    }

    #[test]
    fn test_validate_credentials() {
        let form = LoginForm {
            username: "test".to_string(),
            password: " 123".to_string(),
        };
        assert_eq!(validate_credentials(&form), Some(("test", " 123")));

        let form = LoginForm {
            username: String::new(),
            password: "123".to_string(),
        };
        assert!(validate_credentials(&form).is_none());

        let form = LoginForm {
            username: "test".to_string(),
            password: String::new(),
        };
        assert!(validate_credentials(&form).is_none());
    }
}

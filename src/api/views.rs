//! HTML rendering.
//!
//! Handlers build a view model per request and the functions here turn it
//! into markup. Every piece of user data goes through `html_escape`.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

use crate::db::{Movie, User};

/// What the current caller may do on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub is_authenticated: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl Capabilities {
    #[must_use]
    pub const fn for_user(user: Option<&User>) -> Self {
        let signed_in = user.is_some();
        Self {
            is_authenticated: signed_in,
            can_create: signed_in,
            can_edit: signed_in,
            can_delete: signed_in,
        }
    }
}

/// Shared page chrome: navigation and pending flash messages.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub owner_name: Option<String>,
    pub caps: Capabilities,
    pub flashes: Vec<String>,
}

impl Chrome {
    #[must_use]
    pub fn new(owner: Option<&User>, viewer: Option<&User>, flashes: Vec<String>) -> Self {
        Self {
            owner_name: owner.map(|u| u.name.clone()),
            caps: Capabilities::for_user(viewer),
            flashes,
        }
    }
}

pub struct IndexView {
    pub chrome: Chrome,
    pub movies: Vec<Movie>,
}

impl IndexView {
    #[must_use]
    pub fn render(&self) -> String {
        let caps = self.chrome.caps;
        let mut body = String::new();

        let _ = writeln!(body, "<p>{} Titles</p>", self.movies.len());

        if caps.can_create {
            body.push_str(
                r#"<form method="post">
    Name <input type="text" name="title" autocomplete="off" required>
    Year <input type="text" name="year" autocomplete="off" required>
    <input class="btn" type="submit" name="submit" value="Add">
</form>
"#,
            );
        }

        body.push_str("<ul class=\"movie-list\">\n");
        for movie in &self.movies {
            let _ = write!(
                body,
                "    <li>{} - {}\n        <span class=\"float-right\">\n",
                text(&movie.title),
                text(&movie.year)
            );
            if caps.can_edit {
                let _ = writeln!(
                    body,
                    "            <a class=\"btn\" href=\"/movie/edit/{}\">Edit</a>",
                    movie.id
                );
            }
            if caps.can_delete {
                let _ = writeln!(
                    body,
                    "            <form class=\"inline-form\" method=\"post\" action=\"/movie/delete/{}\">\
                     <input class=\"btn\" type=\"submit\" name=\"delete\" value=\"Delete\"></form>",
                    movie.id
                );
            }
            body.push_str("        </span>\n    </li>\n");
        }
        body.push_str("</ul>\n");

        layout("Watchlist", &self.chrome, &body)
    }
}

pub struct EditView {
    pub chrome: Chrome,
    pub movie: Movie,
}

impl EditView {
    #[must_use]
    pub fn render(&self) -> String {
        let body = format!(
            r#"<h3>Edit item</h3>
<form method="post">
    Name <input type="text" name="title" autocomplete="off" required value="{}">
    Year <input type="text" name="year" autocomplete="off" required value="{}">
    <input class="btn" type="submit" name="submit" value="Update">
</form>
"#,
            attr(&self.movie.title),
            attr(&self.movie.year)
        );
        layout("Edit item - Watchlist", &self.chrome, &body)
    }
}

pub struct SettingsView {
    pub chrome: Chrome,
    pub current_name: String,
}

impl SettingsView {
    #[must_use]
    pub fn render(&self) -> String {
        let body = format!(
            r#"<h3>Settings</h3>
<form method="post">
    Your Name <input type="text" name="name" autocomplete="off" required value="{}">
    <input class="btn" type="submit" name="submit" value="Save">
</form>
"#,
            attr(&self.current_name)
        );
        layout("Settings - Watchlist", &self.chrome, &body)
    }
}

pub struct LoginView {
    pub chrome: Chrome,
}

impl LoginView {
    #[must_use]
    pub fn render(&self) -> String {
        let body = r#"<h3>Login</h3>
<form method="post">
    Username<br>
    <input type="text" name="username" required><br><br>
    Password<br>
    <input type="password" name="password" required><br><br>
    <input class="btn" type="submit" name="submit" value="Submit">
</form>
"#;
        layout("Login - Watchlist", &self.chrome, body)
    }
}

#[must_use]
pub fn not_found_page() -> String {
    standalone(
        "404 - Watchlist",
        "<h2>Page Not Found - 404</h2>\n<a class=\"btn\" href=\"/\">Go Back</a>\n",
    )
}

#[must_use]
pub fn error_page() -> String {
    standalone(
        "500 - Watchlist",
        "<h2>Internal Server Error - 500</h2>\n<a class=\"btn\" href=\"/\">Go Back</a>\n",
    )
}

fn heading(owner_name: Option<&str>) -> String {
    owner_name.map_or_else(
        || "Watch-List".to_string(),
        |name| format!("{}'s Watch-List", text(name)),
    )
}

fn layout(title: &str, chrome: &Chrome, body: &str) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"utf-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
         <title>{}</title>\n</head>\n<body>\n<h2>{}</h2>\n<nav>\n    <ul>\n        \
         <li><a href=\"/\">Home</a></li>\n",
        text(title),
        heading(chrome.owner_name.as_deref())
    );

    if chrome.caps.is_authenticated {
        page.push_str("        <li><a href=\"/settings\">Settings</a></li>\n");
        page.push_str("        <li><a href=\"/logout\">Logout</a></li>\n");
    } else {
        page.push_str("        <li><a href=\"/login\">Login</a></li>\n");
    }
    page.push_str("    </ul>\n</nav>\n");

    for message in &chrome.flashes {
        let _ = writeln!(page, "<div class=\"alert\">{}</div>", text(message));
    }

    page.push_str(body);
    page.push_str("<footer>\n    <small>&copy; Watchlist</small>\n</footer>\n</body>\n</html>\n");
    page
}

fn standalone(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"utf-8\">\n    \
         <title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        text(title)
    )
}

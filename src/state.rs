use std::sync::Arc;

use minijinja::Environment;
use tokio::sync::{Mutex, RwLock};

use crate::{catalog::Catalog, config::Config, session::SessionStore, upload::Uploader};

/// Display pages reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Dashboard,
    Library,
    Profile,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Library => "library",
            Page::Profile => "profile",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "dashboard" => Some(Page::Dashboard),
            "library" => Some(Page::Library),
            "profile" => Some(Page::Profile),
            _ => None,
        }
    }
}

/// Light/dark display mode. Styling only, no effect on data or logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Process-local navigation state. Never persisted; the page selection goes
/// back to the dashboard on logout.
#[derive(Debug, Default)]
pub struct Nav {
    pub page: Page,
    pub theme: Theme,
}

/// Everything the handlers share: the template environment plus the live
/// session, catalog, upload workflow and navigation state.
#[derive(Clone)]
pub struct Portal {
    pub env: Environment<'static>,
    pub title: String,
    pub session: Arc<RwLock<SessionStore>>,
    pub catalog: Arc<RwLock<Catalog>>,
    pub uploader: Arc<Mutex<Uploader>>,
    pub nav: Arc<RwLock<Nav>>,
}

impl Portal {
    pub fn new(config: Config) -> Self {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source).expect("unable to load template");
        }

        let data_dir = config.data_dir.unwrap_or_else(|| ".".to_string());

        Self {
            env,
            title: config
                .title
                .unwrap_or_else(|| "University Library".to_string()),
            session: Arc::new(RwLock::new(SessionStore::open(data_dir))),
            catalog: Arc::new(RwLock::new(Catalog::seeded())),
            uploader: Arc::new(Mutex::new(Uploader::default())),
            nav: Arc::new(RwLock::new(Nav::default())),
        }
    }
}

const TEMPLATES: [(&str, &str); 10] = [
    ("base.html", include_str!("../templates/base.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("shell.html", include_str!("../templates/shell.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("library.html", include_str!("../templates/library.html")),
    (
        "library_results.html",
        include_str!("../templates/library_results.html"),
    ),
    ("profile.html", include_str!("../templates/profile.html")),
    (
        "upload_modal.html",
        include_str!("../templates/upload_modal.html"),
    ),
    (
        "upload_submitting.html",
        include_str!("../templates/upload_submitting.html"),
    ),
    (
        "upload_success.html",
        include_str!("../templates/upload_success.html"),
    ),
];

use minijinja::context;

use crate::{
    catalog::{DEPARTMENTS, FILTER_ALL},
    error::AthenaeumError,
    state::{Page, Portal},
    upload::Phase,
};

impl Portal {
    /// Renders the full page for the current state: the login screen while
    /// logged out, otherwise the shell around the selected page.
    pub async fn render_index(&self) -> Result<String, AthenaeumError> {
        let (user_id, page, theme) = {
            let session = self.session.read().await;
            let nav = self.nav.read().await;
            (
                session.user_id().map(str::to_string),
                nav.page,
                nav.theme.as_str(),
            )
        };

        let Some(user_id) = user_id else {
            let template = self.env.get_template("login.html")?;
            return Ok(template.render(context! {
                title => self.title,
                theme => theme,
            })?);
        };

        let content = self.render_page(page, &user_id).await?;

        let template = self.env.get_template("shell.html")?;
        Ok(template.render(context! {
            title => self.title,
            theme => theme,
            user_id => user_id,
            page => page.as_str(),
            content => content,
        })?)
    }

    async fn render_page(&self, page: Page, user_id: &str) -> Result<String, AthenaeumError> {
        match page {
            Page::Dashboard => self.render_dashboard(user_id).await,
            Page::Library => self.render_library().await,
            Page::Profile => self.render_profile(user_id).await,
        }
    }

    async fn render_dashboard(&self, user_id: &str) -> Result<String, AthenaeumError> {
        let catalog = self.catalog.read().await;
        let template = self.env.get_template("dashboard.html")?;
        Ok(template.render(context! {
            user_id => user_id,
            recent => catalog.recent(3),
        })?)
    }

    async fn render_library(&self) -> Result<String, AthenaeumError> {
        let catalog = self.catalog.read().await;
        let template = self.env.get_template("library.html")?;
        Ok(template.render(context! {
            departments => catalog.departments_present(),
            query => "",
            department => FILTER_ALL,
            doc_type => FILTER_ALL,
            docs => catalog.filter("", FILTER_ALL, FILTER_ALL),
            total => catalog.len(),
        })?)
    }

    /// The card list under the library filters, recomputed on every filter
    /// change.
    pub async fn render_library_results(
        &self,
        query: &str,
        department: &str,
        doc_type: &str,
    ) -> Result<String, AthenaeumError> {
        let catalog = self.catalog.read().await;
        let template = self.env.get_template("library_results.html")?;
        Ok(template.render(context! {
            docs => catalog.filter(query, department, doc_type),
            total => catalog.len(),
        })?)
    }

    async fn render_profile(&self, user_id: &str) -> Result<String, AthenaeumError> {
        let catalog = self.catalog.read().await;
        let template = self.env.get_template("profile.html")?;
        Ok(template.render(context! {
            user_id => user_id,
            total_uploads => catalog.len(),
        })?)
    }

    /// Renders the modal for the workflow's current phase, or nothing when
    /// no workflow is live.
    pub async fn render_upload_modal(&self) -> Result<String, AthenaeumError> {
        let uploader = self.uploader.lock().await;
        let Some(workflow) = uploader.workflow() else {
            return Ok(String::new());
        };

        match workflow.phase {
            Phase::Editing => {
                let draft = &workflow.draft;
                let template = self.env.get_template("upload_modal.html")?;
                Ok(template.render(context! {
                    departments => DEPARTMENTS,
                    draft => context! {
                        title => draft.title,
                        author => draft.author,
                        doc_type => draft.doc_type.map(|t| t.as_str()).unwrap_or(""),
                        department => draft.department.clone().unwrap_or_default(),
                    },
                    file => &draft.file,
                    file_size_mb => draft.file.as_ref().map(|f| f.size_mb()).unwrap_or_default(),
                })?)
            }
            Phase::Submitting => {
                let file_name = workflow
                    .draft
                    .file
                    .as_ref()
                    .map(|f| f.name.clone())
                    .unwrap_or_default();
                let template = self.env.get_template("upload_submitting.html")?;
                Ok(template.render(context! { file_name => file_name })?)
            }
            Phase::Complete => {
                let template = self.env.get_template("upload_success.html")?;
                Ok(template.render(context! { title => self.title })?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::state::Portal;
    use crate::upload::PDF_MIME;

    fn portal() -> Portal {
        let dir = std::env::temp_dir().join(format!("athenaeum-views-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        Portal::new(Config {
            title: None,
            data_dir: Some(dir.to_string_lossy().into_owned()),
        })
    }

    #[tokio::test]
    async fn index_shows_login_when_logged_out() {
        let portal = portal();

        let html = portal.render_index().await.unwrap();
        assert!(html.contains("Student Access"));
        assert!(html.contains("Digital Collection Access Portal"));
    }

    #[tokio::test]
    async fn index_shows_dashboard_after_login() {
        let portal = portal();
        portal.session.write().await.login("2024001234");

        let html = portal.render_index().await.unwrap();
        assert!(html.contains("Welcome back, Student 2024001234"));
        assert!(html.contains("Introduction to Computer Science"));
    }

    #[tokio::test]
    async fn empty_catalog_renders_the_empty_dashboard_state() {
        let portal = portal();
        portal.session.write().await.login("s-1");
        *portal.catalog.write().await = Catalog::empty();

        let html = portal.render_index().await.unwrap();
        assert!(html.contains("No documents yet"));
    }

    #[tokio::test]
    async fn unmatched_search_renders_the_no_results_state() {
        let portal = portal();

        let html = portal
            .render_library_results("zzz", "all", "all")
            .await
            .unwrap();
        assert!(html.contains("No documents found"));
        assert!(html.contains("Showing 0 of 3 documents"));
    }

    #[tokio::test]
    async fn library_results_include_matches() {
        let portal = portal();

        let html = portal
            .render_library_results("smith", "all", "all")
            .await
            .unwrap();
        assert!(html.contains("Introduction to Computer Science"));
        assert!(html.contains("Showing 1 of 3 documents"));
    }

    #[tokio::test]
    async fn upload_modal_renders_draft_and_file_states() {
        let portal = portal();
        assert!(portal.render_upload_modal().await.unwrap().is_empty());

        portal.uploader.lock().await.open();
        let html = portal.render_upload_modal().await.unwrap();
        assert!(html.contains("Upload Document"));
        assert!(html.contains("Maximum file size: 50MB"));

        {
            let mut uploader = portal.uploader.lock().await;
            let draft = &mut uploader.workflow_mut().unwrap().draft;
            draft.select_file("algo.pdf".to_string(), PDF_MIME, 1_572_864);
        }
        let html = portal.render_upload_modal().await.unwrap();
        assert!(html.contains("algo.pdf"));
        assert!(html.contains("1.5 MB"));
    }
}

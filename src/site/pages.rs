use chrono::Datelike;
use url::form_urlencoded;

use crate::{
    entities::{
        envelope::Pagination,
        project::{ProjectCategory, ProjectFilter, ProjectListQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    },
    site::{
        html::{Element, Node},
        loader::PortfolioLoader,
        preferences::{Consent, Preferences, Theme},
        sections::{
            render_about, render_education, render_experience, render_gallery, render_projects,
            render_skills, RenderedSection, Section, SectionState,
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Skills,
    Education,
    Experience,
    Work,
    Gallery,
    Contact,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::Skills,
        Page::Education,
        Page::Experience,
        Page::Work,
        Page::Gallery,
        Page::Contact,
    ];

    /// Maps a request filename to a page. `None` means 404.
    pub fn detect(filename: &str) -> Option<Page> {
        match filename {
            "" | "home.html" | "index.html" => Some(Page::Home),
            "skill.html" => Some(Page::Skills),
            "education.html" => Some(Page::Education),
            "experience.html" => Some(Page::Experience),
            "work.html" => Some(Page::Work),
            "gallery.html" => Some(Page::Gallery),
            "contact.html" => Some(Page::Contact),
            _ => None,
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            Page::Home => "home.html",
            Page::Skills => "skill.html",
            Page::Education => "education.html",
            Page::Experience => "experience.html",
            Page::Work => "work.html",
            Page::Gallery => "gallery.html",
            Page::Contact => "contact.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Skills => "Skills",
            Page::Education => "Education",
            Page::Experience => "Experience",
            Page::Work => "Work",
            Page::Gallery => "Gallery",
            Page::Contact => "Contact",
        }
    }

    fn subtitle(&self) -> &'static str {
        match self {
            Page::Home => "Developer, builder and lifelong learner.",
            Page::Skills => "Tools and technologies I work with.",
            Page::Education => "Where I studied and what I learned.",
            Page::Experience => "Where I have worked.",
            Page::Work => "Selected projects.",
            Page::Gallery => "Moments captured along the way.",
            Page::Contact => "Have a question or a project in mind? Send me a message.",
        }
    }
}

/// The mount points a page's markup provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    mounts: Vec<Section>,
}

impl PageTemplate {
    pub fn new(mounts: Vec<Section>) -> Self {
        Self { mounts }
    }

    pub fn for_page(page: Page) -> Self {
        let mounts = match page {
            Page::Home => vec![Section::About, Section::Gallery],
            Page::Skills => vec![Section::Skills],
            Page::Education => vec![Section::Education],
            Page::Experience => vec![Section::Experience],
            Page::Work => vec![Section::Projects],
            Page::Gallery => vec![Section::Gallery],
            Page::Contact => Vec::new(),
        };
        Self::new(mounts)
    }

    pub fn has_mount(&self, section: Section) -> bool {
        self.mounts.contains(&section)
    }

    pub fn mounts(&self) -> &[Section] {
        &self.mounts
    }
}

/// Everything one page render needs, built once per request.
#[derive(Clone)]
pub struct PageContext {
    pub page: Page,
    pub loader: PortfolioLoader,
    pub preferences: Preferences,
    pub consent: Option<Consent>,
    pub first_visit: bool,
    pub project_query: ProjectListQuery,
    pub api_base: String,
}

impl PageContext {
    /// Link that reloads the work page with one more page of projects.
    pub fn next_projects_href(&self, pagination: &Pagination) -> String {
        let limit = (pagination.offset + pagination.limit + DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let filter = ProjectFilter::from(&self.project_query);

        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(category) = &filter.category {
            query.append_pair("category", category);
        }
        if let Some(search) = &filter.search {
            query.append_pair("search", search);
        }
        query.append_pair("limit", &limit.to_string());

        format!("/{}?{}", Page::Work.filename(), query.finish())
    }
}

pub struct RenderedPage {
    pub html: String,
    pub sections: Vec<(Section, SectionState)>,
}

impl RenderedPage {
    pub fn state_of(&self, section: Section) -> Option<SectionState> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, state)| *state)
    }
}

/// Renders every section the page mounts, concurrently, into the full document.
pub async fn render_page(ctx: &PageContext) -> RenderedPage {
    let template = PageTemplate::for_page(ctx.page);

    let (about, skills, education, experience, projects, gallery) = futures::join!(
        render_about(ctx, &template),
        render_skills(ctx, &template),
        render_education(ctx, &template),
        render_experience(ctx, &template),
        render_projects(ctx, &template),
        render_gallery(ctx, &template),
    );

    let rendered: Vec<RenderedSection> = [about, skills, education, experience, projects, gallery]
        .into_iter()
        .flatten()
        .collect();
    let sections = rendered.iter().map(|r| (r.section, r.state)).collect();

    let main = page_main(ctx, rendered);
    let html = format!("<!DOCTYPE html>\n{}", document(ctx, main).to_html());

    RenderedPage { html, sections }
}

fn page_main(ctx: &PageContext, rendered: Vec<RenderedSection>) -> Node {
    let mut body = vec![page_header(ctx.page)];

    if ctx.page == Page::Work {
        body.push(project_filters(&ctx.project_query));
    }

    for section in rendered {
        let heading = match (ctx.page, section.section) {
            (Page::Home, Section::Gallery) => Some(Element::new("h2").class("section-title").text("Photo Gallery")),
            _ => None,
        };
        body.push(
            Element::new("section")
                .class(format!("content-section {}-section", section.section.name()))
                .child(heading)
                .child(section.into_node())
                .into(),
        );
    }

    if ctx.page == Page::Contact {
        body.push(contact_form(&ctx.api_base));
    }

    Element::new("main").class("container").children(body).into()
}

fn page_header(page: Page) -> Node {
    Element::new("header")
        .class("page-header fade-in")
        .child(Element::new("h1").text(page.title()))
        .child(Element::new("p").class("subtitle").text(page.subtitle()))
        .into()
}

fn document(ctx: &PageContext, main: Node) -> Node {
    let theme = ctx.preferences.theme;

    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1.0"),
        )
        .child(Element::new("title").text(format!("{} | Portfolio", ctx.page.title())))
        .child(Element::new("link").attr("rel", "stylesheet").attr("href", "/css/style.css"))
        .child(
            Element::new("link")
                .attr("rel", "stylesheet")
                .attr("href", "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css"),
        );

    let body = Element::new("body")
        .class(theme.body_class())
        .child(navigation(ctx))
        .child(ctx.first_visit.then(welcome_banner))
        .child(main)
        .child(ctx.consent.is_none().then(consent_banner))
        .child(footer())
        .child(Element::new("script").attr("src", "/assets/gallery.js").attr("defer", "defer"));

    Element::new("html")
        .attr("lang", ctx.preferences.language.as_str())
        .child(head)
        .child(body)
        .into()
}

fn navigation(ctx: &PageContext) -> Node {
    let links = Page::ALL.iter().map(|page| {
        let class = if *page == ctx.page { "nav-link active" } else { "nav-link" };
        Element::new("li").child(
            Element::new("a")
                .class(class)
                .attr("href", format!("/{}", page.filename()))
                .text(page.title()),
        )
    });

    let theme = ctx.preferences.theme;
    let toggle_label = match theme.toggled() {
        Theme::Dark => "🌙",
        Theme::Light => "☀️",
    };
    let theme_toggle = Element::new("form")
        .class("theme-form")
        .attr("method", "post")
        .attr("action", "/preferences/theme")
        .child(
            Element::new("input")
                .attr("type", "hidden")
                .attr("name", "theme")
                .attr("value", theme.toggled().as_str()),
        )
        .child(
            Element::new("button")
                .attr("id", "themeToggle")
                .attr("type", "submit")
                .attr("aria-label", "Toggle theme")
                .text(toggle_label),
        );

    Element::new("nav")
        .class("navbar")
        .child(Element::new("a").class("logo").attr("href", "/home.html").text("Portfolio"))
        .child(Element::new("ul").class("nav-links").children(links))
        .child(theme_toggle)
        .into()
}

fn welcome_banner() -> Element {
    Element::new("div")
        .attr("id", "welcomeMessage")
        .class("welcome-banner")
        .child(Element::new("h4").text("👋 Welcome!"))
        .child(
            Element::new("p")
                .text("Thanks for visiting my portfolio! I use cookies to enhance your experience."),
        )
}

fn consent_banner() -> Element {
    let choice = |action: &str, label: &str, class: &str| {
        Element::new("form")
            .attr("method", "post")
            .attr("action", format!("/consent/{action}"))
            .child(
                Element::new("button")
                    .class(class.to_string())
                    .attr("type", "submit")
                    .text(label.to_string()),
            )
    };

    Element::new("div")
        .attr("id", "cookieConsent")
        .class("consent-banner")
        .child(Element::new("p").text(
            "🍪 This website uses cookies to enhance your browsing experience and analyze site traffic.",
        ))
        .child(choice("accept", "Accept All", "btn consent-accept"))
        .child(choice("decline", "Decline", "btn consent-decline"))
}

fn project_filters(query: &ProjectListQuery) -> Node {
    let filter = ProjectFilter::from(query);
    let active = filter.category.as_deref().unwrap_or("all");

    let link = |key: &str, label: &str| {
        let class = if key == active { "filter-btn active" } else { "filter-btn" };
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("category", key);
        if let Some(search) = &filter.search {
            params.append_pair("search", search);
        }
        Element::new("a")
            .class(class)
            .attr("data-category", key.to_string())
            .attr("href", format!("/{}?{}", Page::Work.filename(), params.finish()))
            .text(label.to_string())
    };

    let mut links = vec![link("all", "All")];
    links.extend(
        ProjectCategory::ALL
            .iter()
            .map(|category| link(category.key(), category.label())),
    );

    let search = Element::new("form")
        .class("project-search")
        .attr("method", "get")
        .attr("action", format!("/{}", Page::Work.filename()))
        .child(
            Element::new("input")
                .attr("type", "hidden")
                .attr("name", "category")
                .attr("value", active.to_string()),
        )
        .child(
            Element::new("input")
                .attr("type", "search")
                .attr("name", "search")
                .attr("placeholder", "Search projects...")
                .attr("value", filter.search.clone().unwrap_or_default()),
        )
        .child(Element::new("button").attr("type", "submit").text("Search"));

    Element::new("div")
        .class("project-filters")
        .child(Element::new("div").class("filter-buttons").children(links))
        .child(search)
        .into()
}

fn contact_form(api_base: &str) -> Node {
    let field = |label: &str, input: Element| {
        Element::new("div")
            .class("form-group")
            .child(Element::new("label").text(label.to_string()))
            .child(input)
    };

    Element::new("section")
        .class("contact-section")
        .child(
            Element::new("form")
                .attr("id", "contactForm")
                .class("contact-form")
                .attr("method", "post")
                .attr("action", format!("{api_base}/contact-form.php"))
                .child(field(
                    "Name",
                    Element::new("input")
                        .attr("type", "text")
                        .attr("name", "name")
                        .attr("maxlength", "100")
                        .attr("required", "required"),
                ))
                .child(field(
                    "Email",
                    Element::new("input")
                        .attr("type", "email")
                        .attr("name", "email")
                        .attr("required", "required"),
                ))
                .child(field(
                    "Message",
                    Element::new("textarea")
                        .attr("name", "message")
                        .attr("rows", "6")
                        .attr("maxlength", "5000")
                        .attr("required", "required"),
                ))
                .child(Element::new("button").class("btn").attr("type", "submit").text("Send Message")),
        )
        .into()
}

fn footer() -> Node {
    Element::new("footer")
        .class("footer")
        .child(Element::new("p").text(format!(
            "© {} Portfolio. All rights reserved.",
            chrono::Utc::now().year()
        )))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{
        entities::{
            project::{ProjectPage, ProjectRecord},
            skill::SkillRecord,
        },
        site::client::{LoadError, MockContentSource},
    };

    fn context(page: Page, source: MockContentSource) -> PageContext {
        PageContext {
            page,
            loader: PortfolioLoader::new(Arc::new(source)),
            preferences: Preferences::default(),
            consent: None,
            first_visit: false,
            project_query: ProjectListQuery::first_page(None, None),
            api_base: "/php".into(),
        }
    }

    #[test]
    fn detects_pages_from_filenames() {
        assert_eq!(Page::detect(""), Some(Page::Home));
        assert_eq!(Page::detect("index.html"), Some(Page::Home));
        assert_eq!(Page::detect("work.html"), Some(Page::Work));
        assert_eq!(Page::detect("admin.html"), None);
    }

    #[tokio::test]
    async fn skills_page_without_rows_shows_empty_state() {
        let mut source = MockContentSource::new();
        source.expect_fetch_skills().times(1).returning(|| Ok(vec![]));

        let page = render_page(&context(Page::Skills, source)).await;

        assert_eq!(page.state_of(Section::Skills), Some(SectionState::Empty));
        assert!(page.html.contains("No Skills Data Found"));
        assert!(page.html.contains("class=\"fas fa-code\""));
    }

    #[tokio::test]
    async fn home_page_fetches_only_its_sections() {
        let mut source = MockContentSource::new();
        source
            .expect_fetch_about()
            .times(1)
            .returning(|| Err(LoadError::Transport("down".into())));
        source.expect_fetch_gallery().times(1).returning(|| Ok(vec![]));
        source.expect_fetch_skills().times(0);
        source.expect_fetch_projects().times(0);

        let page = render_page(&context(Page::Home, source)).await;

        assert_eq!(page.sections.len(), 2);
        assert_eq!(page.state_of(Section::Gallery), Some(SectionState::Empty));
        assert!(page.html.contains("class=\"about-container\""));
        assert!(page.html.contains("No Photos Found"));
    }

    #[tokio::test]
    async fn contact_page_has_form_and_no_sections() {
        let source = MockContentSource::new();
        let page = render_page(&context(Page::Contact, source)).await;

        assert!(page.sections.is_empty());
        assert!(page.html.contains("action=\"/php/contact-form.php\""));
        assert!(page.html.contains("id=\"cookieConsent\""));
    }

    #[tokio::test]
    async fn skills_are_grouped_and_escaped() {
        let mut source = MockContentSource::new();
        source.expect_fetch_skills().returning(|| {
            Ok(vec![SkillRecord {
                id: 1,
                name: "<Rust>".into(),
                proficiency_level: 80,
                description: None,
                category_id: 1,
                display_order: 1,
                category_name: "Backend".into(),
                category_description: None,
            }])
        });

        let page = render_page(&context(Page::Skills, source)).await;

        assert_eq!(page.state_of(Section::Skills), Some(SectionState::Populated));
        assert!(page.html.contains("&lt;Rust&gt;"));
        assert!(!page.html.contains("<Rust>"));
    }

    #[tokio::test]
    async fn unsafe_project_link_shows_error_state() {
        let mut source = MockContentSource::new();
        source.expect_fetch_projects().times(1).returning(|_| {
            Ok(ProjectPage {
                data: vec![ProjectRecord {
                    id: 1,
                    title: "Tracker".into(),
                    description: "Tracks things".into(),
                    category: "frontend".into(),
                    image_url: None,
                    live_url: Some("javascript:alert(1)".into()),
                    source_code_url: None,
                    technologies: vec!["Rust".into()],
                    created_date: chrono::Utc::now(),
                    featured: false,
                }],
                pagination: Pagination::new(1, 6, 0),
            })
        });

        let page = render_page(&context(Page::Work, source)).await;

        assert_eq!(page.state_of(Section::Projects), Some(SectionState::Error));
        assert!(page.html.contains("Error Loading Projects"));
        assert!(!page.html.contains("No Projects Found"));
        assert!(!page.html.contains("javascript:"));
    }

    #[test]
    fn next_projects_href_grows_the_limit() {
        let mut ctx = context(Page::Work, MockContentSource::new());
        ctx.project_query = ProjectListQuery::first_page(Some("frontend".into()), Some("react app".into()));

        let href = ctx.next_projects_href(&Pagination::new(10, 6, 0));
        assert_eq!(href, "/work.html?category=frontend&search=react+app&limit=12");
    }
}

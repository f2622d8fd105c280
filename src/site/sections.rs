//! Section renderers: load one resource, then project it into its mount point.

use tracing::{debug, error};

use crate::{
    entities::{about::AboutPayload, skill::group_by_category},
    site::{
        components::{self, RenderError},
        html::{Element, Node},
        pages::{PageContext, PageTemplate},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Skills,
    Education,
    Experience,
    Projects,
    Gallery,
}

impl Section {
    /// The selector of the element this section renders into.
    pub fn selector(&self) -> &'static str {
        match self {
            Section::About => ".about-container",
            Section::Skills => ".skill-categories",
            Section::Education => ".education-timeline",
            Section::Experience => ".experience-timeline",
            Section::Projects => "#project-grid",
            Section::Gallery => ".photo-gallery",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Skills => "skills",
            Section::Education => "education",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Gallery => "gallery",
        }
    }

    /// The mount element itself, holding `content`.
    pub fn mount(&self, content: Node) -> Element {
        let selector = self.selector();
        let element = Element::new("div");
        let element = match selector.strip_prefix('#') {
            Some(id) => element.attr("id", id),
            None => element.class(selector.trim_start_matches('.')),
        };
        element.child(content)
    }
}

/// Lifecycle of one section during one page render. Every path ends in a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Idle,
    Loading,
    Empty,
    Populated,
    Error,
}

impl SectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SectionState::Empty | SectionState::Populated | SectionState::Error)
    }

    /// Moves to `next` if the transition is allowed, otherwise stays put.
    pub fn advance(self, next: SectionState) -> SectionState {
        let allowed = matches!(
            (self, next),
            (SectionState::Idle, SectionState::Loading)
                | (
                    SectionState::Loading,
                    SectionState::Empty | SectionState::Populated | SectionState::Error
                )
        );
        if allowed { next } else { self }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection {
    pub section: Section,
    pub state: SectionState,
    /// Content of the mount point, without the mount element.
    pub body: Node,
    /// Placed right after the mount point.
    pub trailer: Node,
}

impl RenderedSection {
    pub fn with_trailer(mut self, trailer: Node) -> Self {
        self.trailer = trailer;
        self
    }

    pub fn into_node(self) -> Node {
        Node::Fragment(vec![self.section.mount(self.body).into(), self.trailer])
    }
}

struct SectionRun {
    section: Section,
    state: SectionState,
}

impl SectionRun {
    fn start(section: Section) -> Self {
        let state = SectionState::Idle.advance(SectionState::Loading);
        debug!(section = section.name(), "Loading section");
        Self { section, state }
    }

    fn empty(self, body: Node) -> RenderedSection {
        self.finish(SectionState::Empty, body)
    }

    fn settle(self, rendered: Result<Node, RenderError>, error_subject: &str) -> RenderedSection {
        match rendered {
            Ok(body) => self.finish(SectionState::Populated, body),
            Err(e) => {
                error!(section = self.section.name(), error = %e, "Failed to render section");
                self.finish(SectionState::Error, components::error_state(error_subject))
            }
        }
    }

    fn finish(self, next: SectionState, body: Node) -> RenderedSection {
        RenderedSection {
            section: self.section,
            state: self.state.advance(next),
            body,
            trailer: Node::Empty,
        }
    }
}

fn collect_nodes<T>(
    items: &[T],
    render: impl Fn(&T, usize) -> Result<Node, RenderError>,
) -> Result<Node, RenderError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| render(item, index))
        .collect::<Result<Vec<_>, _>>()
        .map(Node::Fragment)
}

pub async fn render_skills(ctx: &PageContext, template: &PageTemplate) -> Option<RenderedSection> {
    if !template.has_mount(Section::Skills) {
        return None;
    }
    let run = SectionRun::start(Section::Skills);
    let skills = ctx.loader.load_skills().await;

    if skills.is_empty() {
        return Some(run.empty(components::empty_state(
            "fas fa-code",
            "No Skills Data Found",
            "Skills data will be loaded from the database. Please ensure your skills table is properly set up.",
        )));
    }

    let groups = group_by_category(&skills);
    let body = Node::Fragment(groups.iter().map(components::skill_group).collect());
    Some(run.settle(Ok(body), "Skills"))
}

pub async fn render_education(ctx: &PageContext, template: &PageTemplate) -> Option<RenderedSection> {
    if !template.has_mount(Section::Education) {
        return None;
    }
    let run = SectionRun::start(Section::Education);
    let education = ctx.loader.load_education().await;

    if education.is_empty() {
        return Some(run.empty(components::empty_state(
            "fas fa-graduation-cap",
            "No Education Data Found",
            "Education data will be loaded from the database. Please ensure your education table is properly set up.",
        )));
    }

    Some(run.settle(collect_nodes(&education, components::education_card), "Education"))
}

pub async fn render_experience(ctx: &PageContext, template: &PageTemplate) -> Option<RenderedSection> {
    if !template.has_mount(Section::Experience) {
        return None;
    }
    let run = SectionRun::start(Section::Experience);
    let experience = ctx.loader.load_experience().await;

    if experience.is_empty() {
        return Some(run.empty(components::empty_state(
            "fas fa-briefcase",
            "No Experience Data Found",
            "Experience data will be loaded from the database. Please ensure your experience table is properly set up.",
        )));
    }

    Some(run.settle(collect_nodes(&experience, components::job_card), "Experience"))
}

/// The project grid, followed by the load-more control when another page exists.
pub async fn render_projects(ctx: &PageContext, template: &PageTemplate) -> Option<RenderedSection> {
    if !template.has_mount(Section::Projects) {
        return None;
    }
    let run = SectionRun::start(Section::Projects);
    let page = ctx.loader.load_projects(&ctx.project_query).await;

    if page.data.is_empty() {
        return Some(run.empty(components::empty_state(
            "fas fa-folder-open",
            "No Projects Found",
            "No projects match this category or search yet. Try another filter.",
        )));
    }

    let cards = page
        .data
        .iter()
        .map(components::project_card)
        .collect::<Result<Vec<_>, _>>()
        .map(Node::Fragment);

    let rendered = run.settle(cards, "Projects");
    let trailer = match rendered.state {
        SectionState::Populated => {
            components::load_more(&page.pagination, ctx.next_projects_href(&page.pagination))
        }
        _ => Node::Empty,
    };
    Some(rendered.with_trailer(trailer))
}

pub async fn render_gallery(ctx: &PageContext, template: &PageTemplate) -> Option<RenderedSection> {
    if !template.has_mount(Section::Gallery) {
        return None;
    }
    let run = SectionRun::start(Section::Gallery);
    let photos = ctx.loader.load_gallery().await;

    if photos.is_empty() {
        return Some(run.empty(components::empty_state(
            "fas fa-camera",
            "No Photos Found",
            "Photos will be loaded from the database. Please ensure your photo_gallery table is properly set up.",
        )));
    }

    let body = collect_nodes(&photos, components::photo_item).map(|items| {
        Node::Fragment(vec![
            components::gallery_filters(&photos),
            Element::new("div").class("photo-grid").child(items).into(),
        ])
    });
    Some(run.settle(body, "Photos"))
}

/// Personal info, hero stats, counters and markdown sections.
///
/// Without data the placeholders stay empty, so the static page copy shows through.
pub async fn render_about(ctx: &PageContext, template: &PageTemplate) -> Option<RenderedSection> {
    if !template.has_mount(Section::About) {
        return None;
    }
    let run = SectionRun::start(Section::About);
    let about = ctx.loader.load_about().await.unwrap_or_default();

    if about.is_empty() {
        return Some(run.empty(about_layout(&AboutPayload::default(), Node::Empty)));
    }

    let personal = match about.personal_info.as_ref() {
        Some(info) => components::personal_info_card(info),
        None => Ok(Node::Empty),
    };
    Some(run.settle(personal.map(|card| about_layout(&about, card)), "About"))
}

fn about_layout(about: &AboutPayload, personal_card: Node) -> Node {
    let sections = Node::Fragment(about.sections.iter().map(components::about_section_card).collect());

    Node::Fragment(vec![
        Element::new("div")
            .class("about-hero")
            .child(
                Element::new("div")
                    .class("about-stats")
                    .child(components::hero_stats(&about.stats)),
            )
            .into(),
        Element::new("div")
            .class("personal-info-placeholder")
            .child(personal_card)
            .into(),
        Element::new("div")
            .class("stats")
            .child(components::counter_stats(&about.stats))
            .into(),
        Element::new("div")
            .class("about-sections-placeholder")
            .child(sections)
            .into(),
    ])
}

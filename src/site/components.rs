//! Typed components: each takes a record and returns a render tree.

use derive_more::Display;
use url::Url;

use crate::{
    entities::{
        about::{AboutSection, AboutStat, PersonalInfo},
        education::EducationRecord,
        envelope::Pagination,
        experience::ExperienceRecord,
        photo::{distinct_categories, PhotoRecord},
        project::ProjectRecord,
        skill::SkillGroup,
    },
    site::html::{Element, Node, SafeHtml},
};

pub const DEFAULT_PROJECT_IMAGE: &str = "img/default-project.jpg";
const DEFAULT_SECTION_ICON: &str = "fas fa-info-circle";

#[derive(Debug, Display, Clone, PartialEq)]
pub enum RenderError {
    #[display("Refusing to render unsafe URL: {_0}")]
    UnsafeUrl(String),
}

/// Accepts absolute http(s) URLs and scheme-less relative paths.
///
/// The result is also safe inside a CSS `url('...')`.
pub fn safe_url(raw: &str) -> Result<String, RenderError> {
    let raw = raw.trim();
    let unsafe_url = || RenderError::UnsafeUrl(raw.to_string());

    let candidate = match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            url.to_string()
        }
        Ok(_) => return Err(unsafe_url()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if raw.is_empty() || raw.starts_with("//") || raw.contains('\\') {
                return Err(unsafe_url());
            }
            raw.to_string()
        }
        Err(_) => return Err(unsafe_url()),
    };

    if candidate.chars().any(char::is_whitespace) {
        return Err(unsafe_url());
    }

    Ok(candidate
        .replace('\'', "%27")
        .replace('(', "%28")
        .replace(')', "%29")
        .replace('"', "%22"))
}

fn icon(class: &str) -> Element {
    Element::new("i").class(class.to_string())
}

fn stagger(index: usize, step_tenths: usize) -> String {
    let tenths = index * step_tenths;
    format!("animation-delay: {}.{}s", tenths / 10, tenths % 10)
}

// ───── State blocks ──────────────────────────────────────────────────

pub fn empty_state(icon_class: &str, heading: &str, guidance: &str) -> Node {
    Element::new("div")
        .class("empty-state")
        .child(icon(icon_class))
        .child(Element::new("h3").text(heading))
        .child(Element::new("p").text(guidance))
        .into()
}

pub fn error_state(subject: &str) -> Node {
    Element::new("div")
        .class("empty-state error-state")
        .child(icon("fas fa-exclamation-triangle"))
        .child(Element::new("h3").text(format!("Error Loading {subject}")))
        .child(Element::new("p").text(format!(
            "There was an error loading your {}. Please try again later.",
            subject.to_lowercase()
        )))
        .into()
}

// ───── Skills ────────────────────────────────────────────────────────

pub fn skill_group(group: &SkillGroup) -> Node {
    let skills = group.skills.iter().map(|skill| {
        let level = skill.proficiency_level.clamp(0, 100);
        Element::new("div")
            .class("skill-item")
            .child(Element::new("span").class("skill-name").text(skill.name.as_str()))
            .child(
                Element::new("div").class("skill-level").child(
                    Element::new("div")
                        .class("skill-bar")
                        .attr("style", format!("width: {level}%")),
                ),
            )
            .child(
                Element::new("span")
                    .class("skill-percentage")
                    .text(format!("{level}%")),
            )
    });

    Element::new("div")
        .class("skill-category fade-in")
        .child(Element::new("h3").text(group.category_name.as_str()))
        .child(
            Element::new("p").text(group.category_description.clone().unwrap_or_default()),
        )
        .child(Element::new("div").class("skills-list").children(skills))
        .into()
}

// ───── Education ─────────────────────────────────────────────────────

pub fn education_card(item: &EducationRecord, index: usize) -> Result<Node, RenderError> {
    let certificate = match item.certificate_url.as_deref() {
        Some(url) => Some(
            Element::new("a")
                .class("certificate-link")
                .attr("href", safe_url(url)?)
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .child(icon("fas fa-certificate"))
                .text(" View certificate"),
        ),
        None => None,
    };

    let field_of_study = item.field_of_study.as_deref().filter(|f| !f.is_empty()).map(|field| {
        Element::new("ul")
            .class("coursework-list")
            .child(Element::new("li").text(format!("Field of Study: {field}")))
    });

    let gpa = item.gpa.filter(|gpa| *gpa > 0.0).map(|gpa| {
        Element::new("div")
            .class("gpa-display")
            .child(icon("fas fa-star"))
            .text(format!(" GPA: {gpa}"))
    });

    let achievements = item.achievement_lines();
    let achievements = (!achievements.is_empty()).then(|| {
        Element::new("div")
            .class("education-achievements")
            .children(achievements.into_iter().map(|line| {
                Element::new("span").class("achievement-tag").text(line)
            }))
    });

    let card = Element::new("div")
        .class("education-card fade-in")
        .attr("data-education-id", item.id.to_string())
        .attr("style", stagger(index, 2))
        .child(
            Element::new("div")
                .class("education-header")
                .child(
                    Element::new("div")
                        .class("education-info")
                        .child(Element::new("h3").class("degree-title").text(item.degree.as_str()))
                        .child(
                            Element::new("h4")
                                .class("institution-name")
                                .child(icon("fas fa-university"))
                                .text(format!(" {}", item.institution)),
                        )
                        .child(
                            Element::new("p")
                                .class("education-location")
                                .child(icon("fas fa-map-marker-alt"))
                                .text(format!(
                                    " {}",
                                    item.location
                                        .as_deref()
                                        .filter(|l| !l.is_empty())
                                        .unwrap_or("Location not specified")
                                )),
                        ),
                )
                .child(
                    Element::new("div").class("education-meta").child(
                        Element::new("span")
                            .class("education-duration")
                            .text(item.duration.as_str()),
                    ),
                ),
        )
        .child(
            Element::new("div")
                .class("education-description")
                .text(item.description.as_str()),
        )
        .child(field_of_study)
        .child(gpa)
        .child(achievements)
        .child(certificate);

    Ok(card.into())
}

// ───── Experience ────────────────────────────────────────────────────

pub fn job_card(item: &ExperienceRecord, index: usize) -> Result<Node, RenderError> {
    let logo = match item.company_logo_url.as_deref() {
        Some(url) => Some(
            Element::new("img")
                .class("company-logo")
                .attr("src", safe_url(url)?)
                .attr("alt", item.company_name.as_str())
                .attr("loading", "lazy"),
        ),
        None => None,
    };

    let achievements = item.achievement_lines();
    let responsibilities = (!achievements.is_empty()).then(|| {
        Element::new("ul")
            .class("job-responsibilities")
            .children(achievements.into_iter().map(|line| Element::new("li").text(line)))
    });

    let skills = (!item.technologies_used.is_empty()).then(|| {
        Element::new("div").class("job-skills").children(
            item.technologies_used
                .iter()
                .map(|tech| Element::new("span").class("skill-tag").text(tech.as_str())),
        )
    });

    let duration = item
        .duration
        .as_deref()
        .map(|d| Element::new("span").class("job-length").text(d));

    let card = Element::new("div")
        .class("job-card fade-in")
        .attr("data-job-id", item.id.to_string())
        .attr("style", stagger(index, 2))
        .child(
            Element::new("div")
                .class("job-header")
                .child(logo)
                .child(
                    Element::new("div")
                        .class("job-info")
                        .child(Element::new("h3").class("job-title").text(item.position.as_str()))
                        .child(
                            Element::new("h4")
                                .class("job-company")
                                .child(icon("fas fa-building"))
                                .text(format!(" {}", item.company_name)),
                        )
                        .child(
                            Element::new("p")
                                .class("job-location")
                                .child(icon("fas fa-map-marker-alt"))
                                .text(format!(" {}", item.location.clone().unwrap_or_default())),
                        ),
                )
                .child(
                    Element::new("div")
                        .class("job-meta")
                        .child(Element::new("span").class("job-duration").text(item.period_label()))
                        .child(duration),
                ),
        )
        .child(Element::new("div").class("job-description").text(item.description.as_str()))
        .child(responsibilities)
        .child(skills);

    Ok(card.into())
}

// ───── Projects ──────────────────────────────────────────────────────

pub fn project_card(project: &ProjectRecord) -> Result<Node, RenderError> {
    let image = safe_url(project.image_url.as_deref().unwrap_or(DEFAULT_PROJECT_IMAGE))?;

    let mut links = Vec::new();
    if let Some(url) = project.live_url.as_deref() {
        links.push(
            Element::new("a")
                .class("project-link")
                .attr("href", safe_url(url)?)
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .child(icon("fas fa-external-link-alt"))
                .text(" Live demo"),
        );
    }
    if let Some(url) = project.source_code_url.as_deref() {
        links.push(
            Element::new("a")
                .class("project-link")
                .attr("href", safe_url(url)?)
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .child(icon("fab fa-github"))
                .text(" Source"),
        );
    }
    let links = (!links.is_empty()).then(|| Element::new("div").class("links").children(links));

    let class = if project.featured { "card featured fade-in" } else { "card fade-in" };

    Ok(Element::new("div")
        .class(class)
        .attr("data-category", project.category.as_str())
        .child(
            Element::new("div")
                .class("thumb")
                .attr("style", format!("background-image:url('{image}')")),
        )
        .child(
            Element::new("div")
                .class("content")
                .child(Element::new("h4").class("title").text(project.title.as_str()))
                .child(Element::new("p").class("desc").text(project.description.as_str()))
                .child(
                    Element::new("div").class("tags").children(
                        project
                            .technologies
                            .iter()
                            .map(|tech| Element::new("span").class("tag").text(tech.as_str())),
                    ),
                )
                .child(links),
        )
        .into())
}

/// The "load more" link, present only when another page exists.
pub fn load_more(pagination: &Pagination, next_href: String) -> Node {
    if !pagination.has_more {
        return Node::Empty;
    }
    Element::new("div")
        .attr("id", "load-more")
        .child(
            Element::new("a")
                .class("btn load-more-btn")
                .attr("href", next_href)
                .text("Load More"),
        )
        .into()
}

// ───── Gallery ───────────────────────────────────────────────────────

pub fn gallery_filters(photos: &[PhotoRecord]) -> Node {
    let buttons = distinct_categories(photos).into_iter().map(|category| {
        Element::new("button")
            .class("filter-btn")
            .attr("data-category", category)
            .text(category)
    });

    Element::new("div")
        .class("gallery-filters")
        .child(
            Element::new("button")
                .class("filter-btn active")
                .attr("data-category", "all")
                .text("All"),
        )
        .children(buttons)
        .into()
}

pub fn photo_item(photo: &PhotoRecord, index: usize) -> Result<Node, RenderError> {
    let src = safe_url(&photo.drive_link)?;

    Ok(Element::new("div")
        .class("photo-item")
        .attr("data-category", photo.category.as_str())
        .attr("style", format!("--i: {index}; {}", stagger(index, 1)))
        .child(
            Element::new("img")
                .attr("src", src)
                .attr("alt", photo.title.as_str())
                .attr("loading", "lazy"),
        )
        .child(
            Element::new("div")
                .class("photo-overlay")
                .child(Element::new("h3").text(photo.title.as_str()))
                .child(Element::new("p").text(photo.description.clone().unwrap_or_default()))
                .child(Element::new("span").class("category").text(photo.category.as_str())),
        )
        .into())
}

// ───── About ─────────────────────────────────────────────────────────

pub fn personal_info_card(info: &PersonalInfo) -> Result<Node, RenderError> {
    let row = |icon_class: &str, text: String| {
        Element::new("div")
            .class("info-row")
            .child(icon(icon_class))
            .child(Element::new("span").text(text))
    };

    let avatar = match info.avatar_url.as_deref() {
        Some(url) => Some(
            Element::new("img")
                .class("avatar")
                .attr("src", safe_url(url)?)
                .attr("alt", info.name.as_str()),
        ),
        None => None,
    };

    Ok(Element::new("div")
        .class("info-card fade-in")
        .child(avatar)
        .child(Element::new("h3").text("Personal Information"))
        .child(row("fas fa-user", info.name.clone()))
        .child(info.title.clone().map(|title| row("fas fa-briefcase", title)))
        .child(info.age.map(|age| row("fas fa-calendar", format!("Age: {age}"))))
        .child(info.location.clone().map(|location| row("fas fa-location-dot", location)))
        .child(info.email.clone().map(|email| row("fas fa-envelope", email)))
        .child(info.phone.clone().map(|phone| row("fas fa-phone", phone)))
        .into())
}

/// Compact stats shown in the about hero.
pub fn hero_stats(stats: &[AboutStat]) -> Node {
    Node::Fragment(
        stats
            .iter()
            .map(|stat| {
                Element::new("div")
                    .class("stat-item")
                    .child(Element::new("span").class("stat-number").text(stat.value.as_str()))
                    .child(Element::new("span").class("stat-label").text(stat.label.as_str()))
                    .into()
            })
            .collect(),
    )
}

/// Animated counters; the script counts up to `data-target`.
pub fn counter_stats(stats: &[AboutStat]) -> Node {
    Node::Fragment(
        stats
            .iter()
            .map(|stat| {
                Element::new("div")
                    .class("stat fade-in")
                    .child(
                        Element::new("div")
                            .class("stat-number")
                            .attr("data-target", stat.numeric_target().to_string())
                            .attr("data-suffix", stat.suffix())
                            .text("0"),
                    )
                    .child(Element::new("div").class("stat-label").text(stat.label.as_str()))
                    .into()
            })
            .collect(),
    )
}

pub fn about_section_card(section: &AboutSection) -> Node {
    Element::new("div")
        .class("info-card fade-in")
        .child(
            Element::new("div")
                .class("info-card-header")
                .child(icon(section.icon.as_deref().unwrap_or(DEFAULT_SECTION_ICON)))
                .child(Element::new("h3").text(section.title.as_str())),
        )
        .child(
            Element::new("div")
                .class("info-content")
                .child(SafeHtml::from_markdown(&section.content)),
        )
        .into()
}

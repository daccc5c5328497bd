//! Template rendering — maps a completed profile onto the fixed slot set
//! and assembles an HTML page. Pure and deterministic: no model calls, no
//! I/O, and identical input always yields byte-identical output.

use crate::schema::{Experience, IdentifiedProfile};

pub mod handlers;

/// The fixed slot set. Template authors may rely on exactly these twelve
/// slots and no others; each holds an already-escaped HTML fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlots {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub links: String,
    pub title: String,
    pub self_summary: String,
    pub experiences: String,
    pub certificates: String,
    pub languages: String,
    pub education: String,
    pub volunteer_work: String,
    pub skills: String,
}

/// Fills every slot from the profile. Empty collections produce empty
/// fragments, never errors.
pub fn fill_slots(profile: &IdentifiedProfile) -> RenderedSlots {
    RenderedSlots {
        full_name: escape(&profile.full_name),
        email: escape(&profile.email),
        phone: escape(&profile.phone),
        links: render_links(profile),
        title: escape(&profile.record.title),
        self_summary: escape(&profile.record.summary),
        experiences: render_experiences(&profile.record.experiences),
        certificates: render_certificates(profile),
        languages: render_languages(profile),
        education: render_education(profile),
        volunteer_work: render_experiences(&profile.record.volunteer),
        skills: render_skills(profile),
    }
}

/// Renders a validated profile to a complete HTML document.
pub fn render_html(profile: &IdentifiedProfile) -> String {
    let slots = fill_slots(profile);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{full_name} — CV</title>
</head>
<body>
<header>
<h1 id="full_name">{full_name}</h1>
<p id="title">{title}</p>
<p id="contact"><span id="email">{email}</span> · <span id="phone">{phone}</span></p>
<ul id="links">{links}</ul>
</header>
<section id="self_summary"><h2>Summary</h2><p>{self_summary}</p></section>
<section id="experiences"><h2>Experience</h2>{experiences}</section>
<section id="skills"><h2>Skills</h2>{skills}</section>
<section id="education"><h2>Education</h2>{education}</section>
<section id="certificates"><h2>Certificates</h2>{certificates}</section>
<section id="languages"><h2>Languages</h2>{languages}</section>
<section id="volunteer_work"><h2>Volunteer Work</h2>{volunteer_work}</section>
</body>
</html>
"#,
        full_name = slots.full_name,
        title = slots.title,
        email = slots.email,
        phone = slots.phone,
        links = slots.links,
        self_summary = slots.self_summary,
        experiences = slots.experiences,
        skills = slots.skills,
        education = slots.education,
        certificates = slots.certificates,
        languages = slots.languages,
        volunteer_work = slots.volunteer_work,
    )
}

fn render_links(profile: &IdentifiedProfile) -> String {
    let mut out = String::new();
    for link in &profile.links {
        match &link.url {
            Some(url) => out.push_str(&format!(
                r#"<li><a href="{}">{}</a></li>"#,
                escape(url),
                escape(&link.label)
            )),
            // A label without a resolvable address still renders.
            None => out.push_str(&format!("<li>{}</li>", escape(&link.label))),
        }
    }
    out
}

fn render_experiences(entries: &[Experience]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "<article><h3>{} — {}</h3><p>{} · {}–{}</p>",
            escape(&entry.position),
            escape(&entry.company),
            escape(&entry.location),
            escape(&entry.start_date),
            escape(&entry.end_date),
        ));
        if !entry.bullets.is_empty() {
            out.push_str("<ul>");
            for bullet in &entry.bullets {
                out.push_str(&format!("<li>{}</li>", escape(bullet)));
            }
            out.push_str("</ul>");
        }
        if let Some(skills) = &entry.skills {
            if !skills.is_empty() {
                let joined = skills.iter().map(|s| escape(s)).collect::<Vec<_>>().join(", ");
                out.push_str(&format!("<p>{joined}</p>"));
            }
        }
        out.push_str("</article>");
    }
    out
}

fn render_certificates(profile: &IdentifiedProfile) -> String {
    let mut out = String::new();
    for cert in &profile.record.certificates {
        out.push_str(&format!(
            "<li>{} — {} ({})",
            escape(&cert.name),
            escape(&cert.issuer),
            escape(&cert.date),
        ));
        if let Some(link) = &cert.link {
            match &link.url {
                Some(url) => out.push_str(&format!(
                    r#" <a href="{}">{}</a>"#,
                    escape(url),
                    escape(&link.label)
                )),
                None => out.push_str(&format!(" {}", escape(&link.label))),
            }
        }
        out.push_str("</li>");
    }
    if out.is_empty() {
        out
    } else {
        format!("<ul>{out}</ul>")
    }
}

fn render_languages(profile: &IdentifiedProfile) -> String {
    let mut out = String::new();
    for lang in &profile.record.languages {
        out.push_str(&format!(
            "<li>{}: {}</li>",
            escape(&lang.language),
            escape(&lang.proficiency)
        ));
    }
    if out.is_empty() {
        out
    } else {
        format!("<ul>{out}</ul>")
    }
}

fn render_education(profile: &IdentifiedProfile) -> String {
    let mut out = String::new();
    for entry in &profile.record.education {
        out.push_str(&format!(
            "<article><h3>{}</h3><p>{} · {}–{}</p>",
            escape(&entry.degree),
            escape(&entry.institution),
            escape(&entry.start_date),
            escape(&entry.end_date),
        ));
        if let Some(details) = &entry.details {
            if !details.is_empty() {
                out.push_str("<ul>");
                for detail in details {
                    out.push_str(&format!("<li>{}</li>", escape(detail)));
                }
                out.push_str("</ul>");
            }
        }
        out.push_str("</article>");
    }
    out
}

fn render_skills(profile: &IdentifiedProfile) -> String {
    let mut out = String::new();
    for group in &profile.record.skills {
        let joined = group
            .skills
            .iter()
            .map(|s| escape(s))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "<li><strong>{}:</strong> {}</li>",
            escape(&group.category),
            joined
        ));
    }
    if out.is_empty() {
        out
    } else {
        format!("<ul>{out}</ul>")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Certificate, Link, ProfileRecord, SkillGroup};

    fn minimal_profile() -> IdentifiedProfile {
        IdentifiedProfile::from_record(
            ProfileRecord {
                title: "Python Developer".to_string(),
                summary: "Python developer at Acme.".to_string(),
                experiences: vec![Experience {
                    position: "Python Developer".to_string(),
                    company: "Acme".to_string(),
                    location: "Remote".to_string(),
                    start_date: "2019".to_string(),
                    end_date: "2023".to_string(),
                    bullets: vec!["Built <internal> tools".to_string()],
                    skills: None,
                }],
                certificates: vec![],
                languages: vec![],
                education: vec![],
                volunteer: vec![],
                skills: vec![SkillGroup {
                    category: "Programming".to_string(),
                    skills: vec!["Python".to_string()],
                }],
            },
            "Jane Doe".to_string(),
            "jane@x.com".to_string(),
            "+1 555 0100".to_string(),
            vec![],
        )
    }

    #[test]
    fn rendering_is_deterministic() {
        let profile = minimal_profile();
        assert_eq!(render_html(&profile), render_html(&profile));
    }

    #[test]
    fn fills_the_contract_slots() {
        let slots = fill_slots(&minimal_profile());
        assert_eq!(slots.full_name, "Jane Doe");
        assert_eq!(slots.email, "jane@x.com");
        assert!(slots.experiences.contains("Acme"));
        assert!(slots.skills.contains("Python"));
    }

    #[test]
    fn empty_collections_render_as_empty_sections() {
        let html = render_html(&minimal_profile());
        assert!(html.contains(r#"<section id="certificates"><h2>Certificates</h2></section>"#));
        assert!(html.contains(r#"<section id="volunteer_work"><h2>Volunteer Work</h2></section>"#));
    }

    #[test]
    fn text_is_html_escaped() {
        let html = render_html(&minimal_profile());
        assert!(html.contains("Built &lt;internal&gt; tools"));
        assert!(!html.contains("Built <internal> tools"));
    }

    #[test]
    fn link_without_url_renders_label_only() {
        let mut profile = minimal_profile();
        profile.links = vec![
            Link {
                label: "GitHub".to_string(),
                url: Some("https://github.com/janedoe".to_string()),
            },
            Link {
                label: "Portfolio".to_string(),
                url: None,
            },
        ];
        let slots = fill_slots(&profile);
        assert!(slots.links.contains(r#"<a href="https://github.com/janedoe">GitHub</a>"#));
        assert!(slots.links.contains("<li>Portfolio</li>"));
        assert!(!slots.links.contains("Portfolio</a>"));
    }

    #[test]
    fn certificate_link_renders_when_present() {
        let mut profile = minimal_profile();
        profile.record.certificates = vec![Certificate {
            name: "CKA".to_string(),
            issuer: "CNCF".to_string(),
            date: "2022".to_string(),
            link: Some(Link {
                label: "Credly".to_string(),
                url: Some("https://credly.example/cka".to_string()),
            }),
        }];
        let slots = fill_slots(&profile);
        assert!(slots.certificates.contains("CKA — CNCF (2022)"));
        assert!(slots.certificates.contains("https://credly.example/cka"));
    }
}

//! Shared catalog fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use content_catalog::domain::{Content, ContentId, Link, LinkId, Module, ModuleId};
use content_catalog::store::CatalogSnapshot;

pub const M1: ModuleId = ModuleId(1);
pub const M2: ModuleId = ModuleId(2);
pub const M3: ModuleId = ModuleId(3);

pub const C1: ContentId = ContentId(1);
pub const C2: ContentId = ContentId(2);
pub const C3: ContentId = ContentId(3);

/// Fixed reference time so time-graph assertions are deterministic
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// C1 "Intro to Go"/Document, C2 "Go Basics"/Code, C3 "Java Intro"/Document;
/// M1 -> {C1, C2}, M2 -> {C2}, M3 has no links.
pub fn scenario() -> CatalogSnapshot {
    let now = reference_now();

    CatalogSnapshot {
        contents: vec![
            Content::new(1, "Intro to Go", "Document").with_created_at(now - Duration::days(2)),
            Content::new(2, "Go Basics", "Code").with_created_at(now - Duration::days(10)),
            Content::new(3, "Java Intro", "Document").with_created_at(now - Duration::days(90)),
        ],
        modules: vec![
            Module::new(1, "Go"),
            Module::new(2, "Basics"),
            Module::new(3, "Empty"),
        ],
        links: vec![
            Link::new(LinkId(1), M1, C1),
            Link::new(LinkId(2), M1, C2),
            Link::new(LinkId(3), M2, C2),
        ],
        ..CatalogSnapshot::new()
    }
}

/// Larger catalog with partially overlapping modules:
/// module 10 holds ids 1..=20, module 20 holds even ids, module 30 holds ids 11..=30.
pub fn overlapping() -> CatalogSnapshot {
    let formats = ["Code", "Document", "Powerpoint"];
    let contents = (1..=30)
        .map(|i| {
            let title = if i % 3 == 0 {
                format!("Rust Lesson {}", i)
            } else {
                format!("Python Lesson {}", i)
            };
            Content::new(i, title, formats[(i % 3) as usize])
        })
        .collect();

    let mut links = Vec::new();
    let mut next_id = 1;
    let mut link = |module: i64, content: i64| {
        links.push(Link::new(LinkId(next_id), ModuleId(module), ContentId(content)));
        next_id += 1;
    };
    for i in 1..=20 {
        link(10, i);
    }
    for i in (2..=30).step_by(2) {
        link(20, i);
    }
    for i in 11..=30 {
        link(30, i);
    }

    CatalogSnapshot {
        contents,
        modules: vec![
            Module::new(10, "Fundamentals"),
            Module::new(20, "Evens"),
            Module::new(30, "Advanced"),
        ],
        links,
        ..CatalogSnapshot::new()
    }
}
